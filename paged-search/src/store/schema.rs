//! Field catalogue of a record store
//!
//! The schema lists which field names a store understands and where each one
//! lives: on the root entity, or on a relation that has to be joined in. The
//! executor uses it to reject unknown fields before any store call, and to
//! decide whether a count can skip the joins.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::query::{FilterExpression, Sort};

use super::CountShape;

/// Where a field's value comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Column of the root entity
    Root,
    /// Column of a joined relation
    Joined {
        /// Name of the relation (e.g. `"team"`)
        relation: String,
    },
}

/// Schema of the records a store serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    entity: String,
    fields: BTreeMap<String, FieldSource>,
}

impl Schema {
    /// Create an empty schema for the given root entity
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Register a root entity field
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), FieldSource::Root);
        self
    }

    /// Register a field reached through a joined relation
    #[must_use]
    pub fn joined_field(mut self, relation: impl Into<String>, name: impl Into<String>) -> Self {
        self.fields.insert(
            name.into(),
            FieldSource::Joined {
                relation: relation.into(),
            },
        );
        self
    }

    /// Name of the root entity
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Whether the field is known
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Where the field lives, if known
    pub fn source(&self, name: &str) -> Option<&FieldSource> {
        self.fields.get(name)
    }

    fn require(&self, name: &str) -> Result<()> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(Error::unknown_field(name))
        }
    }

    /// Reject filters referencing unknown fields
    pub fn validate_filter(&self, filter: &FilterExpression) -> Result<()> {
        filter.fields().into_iter().try_for_each(|f| self.require(f))
    }

    /// Reject orderings referencing unknown fields
    pub fn validate_sort(&self, sort: &Sort) -> Result<()> {
        sort.orders().iter().try_for_each(|o| self.require(&o.field))
    }

    /// The cheapest count shape that still honours `filter`.
    ///
    /// Joins are only needed on the count path when the filter touches a
    /// joined field.
    pub fn count_shape(&self, filter: &FilterExpression) -> CountShape {
        let needs_join = filter
            .fields()
            .into_iter()
            .any(|f| matches!(self.source(f), Some(FieldSource::Joined { .. })));

        if needs_join {
            CountShape::Joined
        } else {
            CountShape::Base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FilterBuilder, FilterCondition};

    fn schema() -> Schema {
        Schema::new("member")
            .field("member_id")
            .field("age")
            .joined_field("team", "team_name")
    }

    #[test]
    fn test_sources() {
        let schema = schema();
        assert_eq!(schema.entity(), "member");
        assert_eq!(schema.source("age"), Some(&FieldSource::Root));
        assert_eq!(
            schema.source("team_name"),
            Some(&FieldSource::Joined {
                relation: "team".to_string()
            })
        );
        assert!(schema.source("nickname").is_none());
    }

    #[test]
    fn test_validate_filter_reports_first_unknown_field() {
        let filter = FilterBuilder::new()
            .and(FilterCondition::gte("age", 10))
            .and(FilterCondition::eq("nickname", "x"))
            .build();
        match schema().validate_filter(&filter) {
            Err(Error::UnknownField { field }) => assert_eq!(field, "nickname"),
            other => panic!("expected unknown field, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_sort() {
        let schema = schema();
        assert!(schema.validate_sort(&Sort::desc("age")).is_ok());
        assert!(matches!(
            schema.validate_sort(&Sort::asc("age").then_desc("rank")),
            Err(Error::UnknownField { .. })
        ));
    }

    #[test]
    fn test_count_shape() {
        let schema = schema();
        assert_eq!(schema.count_shape(&FilterExpression::All), CountShape::Base);
        assert_eq!(
            schema.count_shape(&FilterCondition::gte("age", 10).into()),
            CountShape::Base
        );
        assert_eq!(
            schema.count_shape(&FilterCondition::eq("team_name", "teamA").into()),
            CountShape::Joined
        );
    }
}
