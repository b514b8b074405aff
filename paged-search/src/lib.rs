//! # paged-search
//!
//! Dynamic predicate composition and paged search execution.
//!
//! A sparse search condition (any field may be absent) is turned into one
//! [`FilterExpression`](query::FilterExpression) that ignores the absent
//! fields. [`PagedSearch`](search::PagedSearch) then runs it against a
//! [`RecordStore`](store::RecordStore) and returns a [`Page`](page::Page),
//! obtaining the total with the chosen [`CountStrategy`](page::CountStrategy).
//!
//! ## Features
//!
//! - **Predicate building**: [`FilterBuilder`](query::FilterBuilder) accumulation
//!   or [`all_of`](query::all_of) over optional parts; both agree
//! - **Count strategies**: combined, split (with count skipping and join-free
//!   counts) and none (over-fetch by one)
//! - **Validation**: page size, page index and field names are checked before
//!   the store is touched
//! - **Configuration**: layered Figment config with XDG lookup
//! - **Observability**: structured JSON logging through `tracing`
//!
//! ## Example
//!
//! ```rust,no_run
//! use paged_search::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let store = InMemoryRecordStore::new(member_schema());
//!     store.insert(MemberTeamRow::new(1, "member1", 10).with_team(1, "teamA"))?;
//!
//!     let search = PagedSearch::with_config(store, config.search.clone());
//!     let condition = MemberSearchCondition::new().age_goe(5);
//!     let page = search
//!         .search_default(&condition, Sort::desc("username"), 0)
//!         .await?;
//!
//!     println!("{} of {:?}", page.content.len(), page.total_elements);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod member;
pub mod observability;
pub mod page;
pub mod query;
pub mod search;
pub mod store;

/// Commonly used types
pub mod prelude {
    pub use crate::config::{Config, SearchConfig, ServiceConfig};
    pub use crate::error::{Error, Result};
    pub use crate::member::{member_schema, MemberSearch, MemberSearchCondition, MemberTeamRow};
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::page::{CountStrategy, Page, PageRequest, Pagination};
    pub use crate::query::{
        all_of, FieldValue, FilterBuilder, FilterCondition, FilterExpression, FilterOperator, Order,
        OrderDirection, SearchCondition, Sort,
    };
    pub use crate::search::PagedSearch;
    pub use crate::store::{
        CountShape, InMemoryRecordStore, Record, RecordStore, Schema, StoreError, StoreErrorKind,
        StoreOperation,
    };
}
