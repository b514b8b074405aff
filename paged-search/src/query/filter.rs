//! Composable filter expressions
//!
//! A [`FilterExpression`] is a predicate tree over record fields. Two ways of
//! composing one from optional parts are provided:
//!
//! - [`FilterBuilder`] accumulates conditions into a single expression,
//!   skipping the ones that are absent.
//! - [`all_of`] takes one `Option<FilterExpression>` per field and drops the
//!   `None` entries before conjoining the rest.
//!
//! Both yield [`FilterExpression::All`] when nothing is present, which
//! matches every record.
//!
//! # Example
//!
//! ```rust
//! use paged_search::query::{all_of, FilterBuilder, FilterCondition, FilterExpression};
//!
//! let team: Option<FilterExpression> = Some(FilterCondition::eq("team_name", "teamB").into());
//! let name: Option<FilterExpression> = None;
//!
//! let built = FilterBuilder::new()
//!     .and_option(name.clone())
//!     .and_option(team.clone())
//!     .build();
//! let composed = all_of([name, team]);
//!
//! assert_eq!(built, composed);
//! ```

use std::fmt;

use super::condition::FilterCondition;
use crate::store::Record;

/// A predicate over record fields
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterExpression {
    /// Matches every record
    #[default]
    All,
    /// A single field comparison
    Compare(FilterCondition),
    /// Every child must match
    And(Vec<FilterExpression>),
    /// At least one child must match
    Or(Vec<FilterExpression>),
}

impl FilterExpression {
    /// Conjoin two expressions.
    ///
    /// `All` is the identity; nested conjunctions are flattened.
    #[must_use]
    pub fn and(self, other: FilterExpression) -> FilterExpression {
        match (self, other) {
            (Self::All, other) => other,
            (this, Self::All) => this,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), other) => {
                left.push(other);
                Self::And(left)
            }
            (this, Self::And(right)) => {
                let mut children = Vec::with_capacity(right.len() + 1);
                children.push(this);
                children.extend(right);
                Self::And(children)
            }
            (this, other) => Self::And(vec![this, other]),
        }
    }

    /// Disjoin two expressions.
    ///
    /// `All` absorbs: anything OR "match everything" matches everything.
    #[must_use]
    pub fn or(self, other: FilterExpression) -> FilterExpression {
        match (self, other) {
            (Self::All, _) | (_, Self::All) => Self::All,
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), other) => {
                left.push(other);
                Self::Or(left)
            }
            (this, Self::Or(right)) => {
                let mut children = Vec::with_capacity(right.len() + 1);
                children.push(this);
                children.extend(right);
                Self::Or(children)
            }
            (this, other) => Self::Or(vec![this, other]),
        }
    }

    /// Whether this expression places no restriction on records
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Names of every field referenced by this expression, in tree order
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::All => {}
            Self::Compare(condition) => out.push(condition.field.as_str()),
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_fields(out);
                }
            }
        }
    }

    /// Evaluate this expression against a record.
    ///
    /// A field the record does not expose is treated as NULL.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Self::All => true,
            Self::Compare(condition) => record
                .field(&condition.field)
                .is_some_and(|value| condition.test(&value)),
            Self::And(children) => children.iter().all(|child| child.matches(record)),
            Self::Or(children) => children.iter().any(|child| child.matches(record)),
        }
    }
}

impl From<FilterCondition> for FilterExpression {
    fn from(condition: FilterCondition) -> Self {
        Self::Compare(condition)
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "TRUE"),
            Self::Compare(condition) => write!(f, "{}", condition),
            Self::And(children) => write_joined(f, children, " AND "),
            Self::Or(children) => write_joined(f, children, " OR "),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    children: &[FilterExpression],
    separator: &str,
) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        match child {
            FilterExpression::And(_) | FilterExpression::Or(_) => write!(f, "({})", child)?,
            _ => write!(f, "{}", child)?,
        }
    }
    Ok(())
}

/// Incremental filter accumulator
///
/// Starts empty; an empty builder builds [`FilterExpression::All`]. Unlike
/// [`FilterExpression::or`], OR-ing into an empty builder yields the operand
/// itself, since there is nothing yet to disjoin with.
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    current: Option<FilterExpression>,
}

impl FilterBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// AND a condition into the accumulator
    #[must_use]
    pub fn and(mut self, expr: impl Into<FilterExpression>) -> Self {
        let expr = expr.into();
        self.current = Some(match self.current.take() {
            Some(current) => current.and(expr),
            None => expr,
        });
        self
    }

    /// AND a condition if present; `None` leaves the accumulator unchanged
    #[must_use]
    pub fn and_option(self, expr: Option<FilterExpression>) -> Self {
        match expr {
            Some(expr) => self.and(expr),
            None => self,
        }
    }

    /// OR a condition into the accumulator
    #[must_use]
    pub fn or(mut self, expr: impl Into<FilterExpression>) -> Self {
        let expr = expr.into();
        self.current = Some(match self.current.take() {
            Some(current) => current.or(expr),
            None => expr,
        });
        self
    }

    /// Whether nothing has been accumulated yet
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Finish building
    pub fn build(self) -> FilterExpression {
        self.current.unwrap_or_default()
    }
}

/// Conjoin optional predicates, treating `None` as the AND identity.
pub fn all_of<I>(parts: I) -> FilterExpression
where
    I: IntoIterator<Item = Option<FilterExpression>>,
{
    parts
        .into_iter()
        .flatten()
        .fold(FilterExpression::All, FilterExpression::and)
}

/// Anything that can be turned into a filter for a search
pub trait SearchCondition {
    /// Build the filter expression for this condition
    fn to_filter(&self) -> FilterExpression;
}

impl SearchCondition for FilterExpression {
    fn to_filter(&self) -> FilterExpression {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FieldValue;

    struct Row {
        name: &'static str,
        age: i64,
    }

    impl Record for Row {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(self.name.into()),
                "age" => Some(self.age.into()),
                _ => None,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "a", age: 10 },
            Row { name: "b", age: 20 },
            Row { name: "c", age: 30 },
        ]
    }

    fn matching(filter: &FilterExpression) -> Vec<&'static str> {
        rows()
            .into_iter()
            .filter(|row| filter.matches(row))
            .map(|row| row.name)
            .collect()
    }

    #[test]
    fn test_all_matches_everything() {
        assert_eq!(matching(&FilterExpression::All), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_and_identity_and_flattening() {
        let a: FilterExpression = FilterCondition::gte("age", 10).into();
        let b: FilterExpression = FilterCondition::lte("age", 20).into();
        let c: FilterExpression = FilterCondition::ne("name", "a").into();

        assert_eq!(FilterExpression::All.and(a.clone()), a);
        assert_eq!(a.clone().and(FilterExpression::All), a);

        let nested = a.clone().and(b.clone()).and(c.clone());
        assert_eq!(nested, FilterExpression::And(vec![a, b, c]));
        assert_eq!(matching(&nested), vec!["b"]);
    }

    #[test]
    fn test_or_absorbs_all() {
        let a: FilterExpression = FilterCondition::eq("name", "a").into();
        assert_eq!(a.clone().or(FilterExpression::All), FilterExpression::All);

        let b: FilterExpression = FilterCondition::eq("name", "c").into();
        assert_eq!(matching(&a.or(b)), vec!["a", "c"]);
    }

    #[test]
    fn test_unknown_field_does_not_match() {
        let filter: FilterExpression = FilterCondition::eq("nickname", "a").into();
        assert!(matching(&filter).is_empty());
    }

    #[test]
    fn test_builder_empty_is_all() {
        let builder = FilterBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.build(), FilterExpression::All);
    }

    #[test]
    fn test_builder_skips_absent_parts() {
        let filter = FilterBuilder::new()
            .and_option(None)
            .and_option(Some(FilterCondition::gte("age", 20).into()))
            .and_option(None)
            .build();
        assert_eq!(filter, FilterExpression::from(FilterCondition::gte("age", 20)));
    }

    #[test]
    fn test_builder_or_on_empty_is_operand() {
        let filter = FilterBuilder::new()
            .or(FilterCondition::eq("name", "b"))
            .build();
        assert_eq!(matching(&filter), vec!["b"]);
    }

    #[test]
    fn test_all_of_matches_builder() {
        let parts = || -> [Option<FilterExpression>; 3] {
            [
                Some(FilterCondition::gte("age", 15).into()),
                None,
                Some(FilterCondition::lte("age", 25).into()),
            ]
        };
        let composed = all_of(parts());
        let built = parts()
            .into_iter()
            .fold(FilterBuilder::new(), FilterBuilder::and_option)
            .build();
        assert_eq!(composed, built);
        assert_eq!(matching(&composed), vec!["b"]);
    }

    #[test]
    fn test_all_of_nothing_is_all() {
        assert_eq!(all_of([None, None]), FilterExpression::All);
    }

    #[test]
    fn test_fields_in_tree_order() {
        let filter = FilterBuilder::new()
            .and(FilterCondition::eq("name", "a"))
            .or(FilterCondition::gte("age", 3))
            .build();
        assert_eq!(filter.fields(), vec!["name", "age"]);
    }

    #[test]
    fn test_display_parenthesises_nested_groups() {
        let filter = FilterExpression::from(FilterCondition::eq("name", "a"))
            .or(FilterCondition::eq("name", "b").into())
            .and(FilterCondition::gte("age", 18).into());
        assert_eq!(
            filter.to_string(),
            "(name = 'a' OR name = 'b') AND age >= 18"
        );
        assert_eq!(FilterExpression::All.to_string(), "TRUE");
    }
}
