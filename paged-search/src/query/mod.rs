//! Predicate building
//!
//! Types for turning sparse search input into a single filter expression
//! plus an ordering, independent of any particular record store.
//!
//! - [`FilterCondition`]: one field compared against one value
//! - [`FilterExpression`]: AND/OR tree of conditions, with `All` as the
//!   match-everything filter
//! - [`FilterBuilder`] and [`all_of`]: the two ways of composing optional
//!   conditions
//! - [`Sort`]: ordering keys
//!
//! # Example
//!
//! ```rust
//! use paged_search::query::{FilterBuilder, FilterCondition, FilterExpression};
//!
//! let filter = FilterBuilder::new()
//!     .and(FilterCondition::eq("team_name", "teamB"))
//!     .and(FilterCondition::gte("age", 35))
//!     .build();
//!
//! assert_eq!(filter.to_string(), "team_name = 'teamB' AND age >= 35");
//! ```

mod condition;
mod filter;
mod order;

pub use condition::{FieldValue, FilterCondition, FilterOperator};
pub use filter::{all_of, FilterBuilder, FilterExpression, SearchCondition};
pub use order::{Order, OrderDirection, Sort};
