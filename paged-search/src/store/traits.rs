//! Record store trait definitions
//!
//! The store is the external collaborator that actually runs queries. It is
//! modelled with RPITIT (Return Position Impl Trait In Traits), so async
//! methods need no `async_trait`.
//!
//! # Example
//!
//! ```rust,ignore
//! use paged_search::store::{CountShape, Record, RecordStore, Schema, StoreResult};
//!
//! impl RecordStore for MemberTable {
//!     type Record = MemberTeamRow;
//!
//!     fn schema(&self) -> &Schema {
//!         &self.schema
//!     }
//!
//!     async fn fetch(
//!         &self,
//!         filter: &FilterExpression,
//!         sort: &Sort,
//!         pagination: Option<Pagination>,
//!     ) -> StoreResult<Vec<MemberTeamRow>> {
//!         // SELECT ... FROM member m LEFT JOIN team t ... WHERE {filter} ORDER BY {sort}
//!         todo!()
//!     }
//!
//!     async fn count(&self, filter: &FilterExpression, shape: CountShape) -> StoreResult<u64> {
//!         // CountShape::Base => SELECT COUNT(*) FROM member m WHERE {filter}
//!         todo!()
//!     }
//! }
//! ```

use std::future::Future;

use super::error::StoreError;
use super::schema::Schema;
use crate::page::Pagination;
use crate::query::{FieldValue, FilterExpression, Sort};

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A row that filters and orderings can be evaluated against
pub trait Record: Send + Sync {
    /// Value of the named field.
    ///
    /// `None` means the record has no such field; `Some(FieldValue::Null)`
    /// means the field exists but holds no value.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// Shape of a count query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountShape {
    /// Count the root entity only, without joins
    Base,
    /// Count over the same joins the data query uses
    Joined,
}

/// Read access to a filtered, ordered record source
pub trait RecordStore: Send + Sync {
    /// The row type this store returns
    type Record: Record;

    /// Fields this store recognises
    fn schema(&self) -> &Schema;

    /// Fetch matching records in `sort` order.
    ///
    /// `None` pagination returns every match.
    fn fetch(
        &self,
        filter: &FilterExpression,
        sort: &Sort,
        pagination: Option<Pagination>,
    ) -> impl Future<Output = StoreResult<Vec<Self::Record>>> + Send;

    /// Count records matching `filter`
    fn count(
        &self,
        filter: &FilterExpression,
        shape: CountShape,
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Fetch one window and the total match count together.
    ///
    /// Stores that can do this in a single round trip should override it; the
    /// default issues a fetch followed by a joined count.
    fn fetch_with_count(
        &self,
        filter: &FilterExpression,
        sort: &Sort,
        pagination: Pagination,
    ) -> impl Future<Output = StoreResult<(Vec<Self::Record>, u64)>> + Send {
        async move {
            let records = self.fetch(filter, sort, Some(pagination)).await?;
            let total = self.count(filter, CountShape::Joined).await?;
            Ok((records, total))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FilterCondition;

    struct Number(i64);

    impl Record for Number {
        fn field(&self, name: &str) -> Option<FieldValue> {
            (name == "n").then(|| FieldValue::Integer(self.0))
        }
    }

    // Relies on the default `fetch_with_count`.
    struct Numbers {
        schema: Schema,
        values: Vec<i64>,
    }

    impl RecordStore for Numbers {
        type Record = Number;

        fn schema(&self) -> &Schema {
            &self.schema
        }

        async fn fetch(
            &self,
            filter: &FilterExpression,
            _sort: &Sort,
            pagination: Option<Pagination>,
        ) -> StoreResult<Vec<Number>> {
            let matches = self
                .values
                .iter()
                .map(|v| Number(*v))
                .filter(|n| filter.matches(n));
            Ok(match pagination {
                Some(p) => matches
                    .skip(p.offset as usize)
                    .take(p.limit as usize)
                    .collect(),
                None => matches.collect(),
            })
        }

        async fn count(&self, filter: &FilterExpression, _shape: CountShape) -> StoreResult<u64> {
            Ok(self
                .values
                .iter()
                .filter(|v| filter.matches(&Number(**v)))
                .count() as u64)
        }
    }

    #[tokio::test]
    async fn test_default_fetch_with_count() {
        let store = Numbers {
            schema: Schema::new("numbers").field("n"),
            values: (1..=10).collect(),
        };
        let filter = FilterCondition::gt("n", 3).into();

        let (records, total) = store
            .fetch_with_count(&filter, &Sort::unsorted(), Pagination::new(2, 3))
            .await
            .unwrap();

        assert_eq!(total, 7);
        assert_eq!(
            records.iter().map(|n| n.0).collect::<Vec<_>>(),
            vec![6, 7, 8]
        );
    }
}
