//! Record ordering
//!
//! # Example
//!
//! ```rust
//! use paged_search::query::{OrderDirection, Sort};
//!
//! let sort = Sort::desc("username").then_asc("member_id");
//! assert_eq!(sort.to_string(), "username desc, member_id asc");
//! assert_eq!(sort.orders()[0].direction, OrderDirection::Descending);
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::FieldValue;
use crate::store::Record;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    #[serde(alias = "desc")]
    Descending,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// A single ordering key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Field to order by
    pub field: String,
    /// Direction of the ordering
    #[serde(default)]
    pub direction: OrderDirection,
}

impl Order {
    /// Create a new ordering key
    pub fn new(field: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// An ordered sequence of ordering keys; earlier keys take precedence.
///
/// Ties left after the last key fall back to the store's natural order, so
/// callers wanting a deterministic order should end with a unique field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    /// No ordering
    #[must_use]
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Order by a single field
    #[must_use]
    pub fn by(field: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            orders: vec![Order::new(field, direction)],
        }
    }

    /// Order by a single field ascending
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self::by(field, OrderDirection::Ascending)
    }

    /// Order by a single field descending
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self::by(field, OrderDirection::Descending)
    }

    /// Append an ordering key
    #[must_use]
    pub fn then(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.orders.push(Order::new(field, direction));
        self
    }

    /// Append an ascending ordering key
    #[must_use]
    pub fn then_asc(self, field: impl Into<String>) -> Self {
        self.then(field, OrderDirection::Ascending)
    }

    /// Append a descending ordering key
    #[must_use]
    pub fn then_desc(self, field: impl Into<String>) -> Self {
        self.then(field, OrderDirection::Descending)
    }

    /// The ordering keys
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Whether no ordering keys are set
    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    /// Compare two records under this ordering.
    ///
    /// Nulls sort last ascending and first descending.
    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        for order in &self.orders {
            let left = a.field(&order.field).unwrap_or(FieldValue::Null);
            let right = b.field(&order.field).unwrap_or(FieldValue::Null);
            let ordering = match order.direction {
                OrderDirection::Ascending => left.sort_cmp(&right),
                OrderDirection::Descending => right.sort_cmp(&left),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl FromIterator<Order> for Sort {
    fn from_iter<I: IntoIterator<Item = Order>>(iter: I) -> Self {
        Self {
            orders: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, order) in self.orders.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", order.field, order.direction)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: Option<&'static str>,
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

    fn sorted(sort: &Sort, mut rows: Vec<Row>) -> Vec<Option<&'static str>> {
        rows.sort_by(|a, b| sort.compare(a, b));
        rows.into_iter().map(|row| row.name).collect()
    }

    #[test]
    fn test_order_direction_display_and_default() {
        assert_eq!(format!("{}", OrderDirection::Ascending), "asc");
        assert_eq!(format!("{}", OrderDirection::Descending), "desc");
        assert_eq!(OrderDirection::default(), OrderDirection::Ascending);
    }

    #[test]
    fn test_age_desc_then_name_asc_nulls_last() {
        let rows = vec![
            Row { name: None, age: 100 },
            Row { name: Some("member5"), age: 100 },
            Row { name: Some("member6"), age: 100 },
            Row { name: Some("member1"), age: 10 },
        ];
        let sort = Sort::desc("age").then_asc("name");
        assert_eq!(
            sorted(&sort, rows),
            vec![Some("member5"), Some("member6"), None, Some("member1")]
        );
    }

    #[test]
    fn test_unsorted_keeps_input_order() {
        let rows = vec![
            Row { name: Some("b"), age: 1 },
            Row { name: Some("a"), age: 2 },
        ];
        assert_eq!(
            sorted(&Sort::unsorted(), rows),
            vec![Some("b"), Some("a")]
        );
    }

    #[test]
    fn test_deserialize_from_json() {
        let sort: Sort = serde_json::from_str(
            r#"[{"field":"username","direction":"desc"},{"field":"member_id"}]"#,
        )
        .unwrap();
        assert_eq!(sort, Sort::desc("username").then_asc("member_id"));
    }
}
