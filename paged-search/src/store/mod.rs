//! Record store seam
//!
//! The search executor never talks to a database directly. It depends on a
//! [`RecordStore`]: something that can fetch a filtered, ordered window of
//! records and count matches, and that publishes a [`Schema`] of the fields
//! it understands.
//!
//! # Features
//!
//! - **Store trait**: [`RecordStore`] with `fetch`, `count` and
//!   `fetch_with_count`
//! - **Schema**: [`Schema`] for field validation and count-shape selection
//! - **Errors**: [`StoreError`] with operation and kind
//! - **In-memory store**: [`InMemoryRecordStore`] for tests and demos

mod error;
mod memory;
mod schema;
mod traits;

pub use error::{StoreError, StoreErrorKind, StoreOperation};
pub use memory::InMemoryRecordStore;
pub use schema::{FieldSource, Schema};
pub use traits::{CountShape, Record, RecordStore, StoreResult};
