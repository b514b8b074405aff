//! Single-field filter conditions and the values they compare against
//!
//! # Example
//!
//! ```rust
//! use paged_search::query::{FilterCondition, FilterOperator, FieldValue};
//!
//! let by_team = FilterCondition::eq("team_name", "teamB");
//! let adults = FilterCondition::gte("age", 18);
//!
//! assert_eq!(by_team.operator, FilterOperator::Equal);
//! assert_eq!(adults.value, FieldValue::Integer(18));
//! ```

use std::cmp::Ordering;
use std::fmt;

/// Comparison operators for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equal to (=)
    Equal,
    /// Not equal to (!=)
    NotEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal to (>=)
    GreaterThanOrEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal to (<=)
    LessThanOrEqual,
    /// Pattern matching (LIKE) with `%` and `_` wildcards
    Like,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
            Self::GreaterThan => write!(f, ">"),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThan => write!(f, "<"),
            Self::LessThanOrEqual => write!(f, "<="),
            Self::Like => write!(f, "LIKE"),
        }
    }
}

/// A value held by a record field or compared against in a filter
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// String value
    String(String),
    /// 64-bit integer value
    Integer(i64),
    /// 64-bit floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Missing value (SQL NULL)
    Null,
}

impl FieldValue {
    /// Whether this value is [`FieldValue::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Compare two non-null values of compatible types.
    ///
    /// Integers and floats compare numerically. Returns `None` when either
    /// side is null or the types cannot be compared.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Ordering used when sorting records: nulls sort after every value.
    pub(crate) fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.compare(other).unwrap_or(Ordering::Equal),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Null => write!(f, "NULL"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A single field comparison
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FieldValue,
}

impl FilterCondition {
    /// Create a new filter condition
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FieldValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// Create a not-equal filter (field != value)
    pub fn ne(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOperator::NotEqual, value.into())
    }

    /// Create a greater-than filter (field > value)
    pub fn gt(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value.into())
    }

    /// Create a greater-than-or-equal filter (field >= value)
    pub fn gte(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThanOrEqual, value.into())
    }

    /// Create a less-than filter (field < value)
    pub fn lt(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOperator::LessThan, value.into())
    }

    /// Create a less-than-or-equal filter (field <= value)
    pub fn lte(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOperator::LessThanOrEqual, value.into())
    }

    /// Create a LIKE pattern filter
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Like, FieldValue::String(pattern.into()))
    }

    /// Test a record's field value against this condition.
    ///
    /// Follows SQL semantics: any comparison involving NULL is false.
    pub fn test(&self, actual: &FieldValue) -> bool {
        if actual.is_null() || self.value.is_null() {
            return false;
        }

        match self.operator {
            FilterOperator::Like => match (actual, &self.value) {
                (FieldValue::String(text), FieldValue::String(pattern)) => {
                    like_matches(text, pattern)
                }
                _ => false,
            },
            operator => match actual.compare(&self.value) {
                Some(ordering) => match operator {
                    FilterOperator::Equal => ordering == Ordering::Equal,
                    FilterOperator::NotEqual => ordering != Ordering::Equal,
                    FilterOperator::GreaterThan => ordering == Ordering::Greater,
                    FilterOperator::GreaterThanOrEqual => ordering != Ordering::Less,
                    FilterOperator::LessThan => ordering == Ordering::Less,
                    FilterOperator::LessThanOrEqual => ordering != Ordering::Greater,
                    FilterOperator::Like => false,
                },
                None => false,
            },
        }
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// SQL LIKE matching: `%` matches any run of characters, `_` exactly one.
fn like_matches(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_operator_display() {
        assert_eq!(format!("{}", FilterOperator::Equal), "=");
        assert_eq!(format!("{}", FilterOperator::NotEqual), "!=");
        assert_eq!(format!("{}", FilterOperator::GreaterThan), ">");
        assert_eq!(format!("{}", FilterOperator::GreaterThanOrEqual), ">=");
        assert_eq!(format!("{}", FilterOperator::LessThan), "<");
        assert_eq!(format!("{}", FilterOperator::LessThanOrEqual), "<=");
        assert_eq!(format!("{}", FilterOperator::Like), "LIKE");
    }

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(FieldValue::from("a"), FieldValue::String("a".to_string()));
        assert_eq!(FieldValue::from(42_i32), FieldValue::Integer(42));
        assert_eq!(FieldValue::from(true), FieldValue::Boolean(true));
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some(7_i64)), FieldValue::Integer(7));
    }

    #[test]
    fn test_mixed_numeric_compare() {
        let int = FieldValue::Integer(10);
        let float = FieldValue::Float(10.5);
        assert_eq!(int.compare(&float), Some(Ordering::Less));
        assert_eq!(float.compare(&int), Some(Ordering::Greater));
        assert_eq!(int.compare(&FieldValue::from("10")), None);
    }

    #[test]
    fn test_sort_cmp_puts_nulls_last() {
        assert_eq!(
            FieldValue::Null.sort_cmp(&FieldValue::Integer(1)),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::Integer(1).sort_cmp(&FieldValue::Null),
            Ordering::Less
        );
    }

    #[test]
    fn test_range_conditions() {
        let goe = FilterCondition::gte("age", 35);
        assert!(goe.test(&FieldValue::Integer(35)));
        assert!(goe.test(&FieldValue::Integer(40)));
        assert!(!goe.test(&FieldValue::Integer(30)));

        let loe = FilterCondition::lte("age", 40);
        assert!(loe.test(&FieldValue::Integer(40)));
        assert!(!loe.test(&FieldValue::Integer(41)));
    }

    #[test]
    fn test_null_never_matches() {
        assert!(!FilterCondition::eq("team_name", "teamA").test(&FieldValue::Null));
        assert!(!FilterCondition::ne("team_name", "teamA").test(&FieldValue::Null));
        assert!(!FilterCondition::eq("team_name", FieldValue::Null).test(&FieldValue::Null));
    }

    #[test]
    fn test_like_patterns() {
        let value = FieldValue::from("member12");
        assert!(FilterCondition::like("username", "member%").test(&value));
        assert!(FilterCondition::like("username", "%12").test(&value));
        assert!(FilterCondition::like("username", "mem_er1_").test(&value));
        assert!(FilterCondition::like("username", "%").test(&value));
        assert!(!FilterCondition::like("username", "team%").test(&value));
        assert!(!FilterCondition::like("username", "member1").test(&value));
    }

    #[test]
    fn test_condition_display_quotes_strings() {
        assert_eq!(
            FilterCondition::eq("username", "o'neil").to_string(),
            "username = 'o''neil'"
        );
        assert_eq!(FilterCondition::gte("age", 18).to_string(), "age >= 18");
    }
}
