//! InMemoryRecordStore - Vec-backed record store for testing and development.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use super::{CountShape, Record, RecordStore, Schema, StoreError, StoreOperation, StoreResult};
use crate::page::Pagination;
use crate::query::{FilterExpression, Sort};

/// Call counters, observable from tests.
#[derive(Debug, Default)]
struct StoreStats {
    fetch_calls: AtomicUsize,
    count_calls: AtomicUsize,
    last_count_shape: Mutex<Option<CountShape>>,
}

/// In-memory record store.
///
/// Records are kept in insertion order, which is the natural order used to
/// break ties left by the requested ordering. Clone-friendly via Arc; clones
/// share rows, counters and injected failures.
#[derive(Clone)]
pub struct InMemoryRecordStore<R> {
    schema: Arc<Schema>,
    rows: Arc<RwLock<Vec<R>>>,
    stats: Arc<StoreStats>,
    failure: Arc<RwLock<Option<StoreError>>>,
}

impl<R> fmt::Debug for InMemoryRecordStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows.read().map(|rows| rows.len()).ok();
        f.debug_struct("InMemoryRecordStore")
            .field("schema", &self.schema)
            .field("rows", &rows)
            .finish_non_exhaustive()
    }
}

impl<R> InMemoryRecordStore<R>
where
    R: Record + Clone,
{
    /// Create an empty store serving the given schema
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
            rows: Arc::new(RwLock::new(Vec::new())),
            stats: Arc::new(StoreStats::default()),
            failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Append a record
    pub fn insert(&self, record: R) -> StoreResult<()> {
        self.write_rows()?.push(record);
        Ok(())
    }

    /// Append several records, keeping their order
    pub fn insert_all(&self, records: impl IntoIterator<Item = R>) -> StoreResult<()> {
        self.write_rows()?.extend(records);
        Ok(())
    }

    /// Number of stored records
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_rows(StoreOperation::Fetch)?.len())
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Make every following read fail with `error` until [`clear_failure`](Self::clear_failure)
    pub fn fail_with(&self, error: StoreError) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = Some(error);
        }
    }

    /// Stop injecting failures
    pub fn clear_failure(&self) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = None;
        }
    }

    /// Number of fetch operations served (including combined fetches)
    pub fn fetch_calls(&self) -> usize {
        self.stats.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of count operations served (including combined fetches)
    pub fn count_calls(&self) -> usize {
        self.stats.count_calls.load(Ordering::SeqCst)
    }

    /// Total number of store round trips
    pub fn total_calls(&self) -> usize {
        self.fetch_calls() + self.count_calls()
    }

    /// Shape used by the most recent count
    pub fn last_count_shape(&self) -> Option<CountShape> {
        self.stats.last_count_shape.lock().ok().and_then(|shape| *shape)
    }

    fn check_failure(&self, operation: StoreOperation) -> StoreResult<()> {
        let failure = self
            .failure
            .read()
            .map_err(|_| StoreError::other(operation, "lock poisoned"))?;
        match failure.as_ref() {
            Some(error) => Err(error.clone().with_operation(operation)),
            None => Ok(()),
        }
    }

    fn read_rows(
        &self,
        operation: StoreOperation,
    ) -> StoreResult<std::sync::RwLockReadGuard<'_, Vec<R>>> {
        self.rows
            .read()
            .map_err(|_| StoreError::other(operation, "lock poisoned"))
    }

    fn write_rows(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Vec<R>>> {
        self.rows
            .write()
            .map_err(|_| StoreError::other(StoreOperation::Insert, "lock poisoned"))
    }

    fn record_count(&self, shape: CountShape) {
        self.stats.count_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.stats.last_count_shape.lock() {
            *last = Some(shape);
        }
    }

    /// Filter, order and window the rows in one pass. Returns the window and
    /// the number of matches before windowing.
    fn select(
        &self,
        operation: StoreOperation,
        filter: &FilterExpression,
        sort: &Sort,
        pagination: Option<Pagination>,
    ) -> StoreResult<(Vec<R>, u64)> {
        let rows = self.read_rows(operation)?;

        let mut matches: Vec<&R> = rows.iter().filter(|row| filter.matches(*row)).collect();
        // Stable sort: ties stay in insertion order.
        if !sort.is_unsorted() {
            matches.sort_by(|a, b| sort.compare(*a, *b));
        }

        let total = matches.len() as u64;
        let window = match pagination {
            Some(p) => matches
                .into_iter()
                .skip(usize::try_from(p.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(p.limit).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => matches.into_iter().cloned().collect(),
        };

        Ok((window, total))
    }
}

impl<R> RecordStore for InMemoryRecordStore<R>
where
    R: Record + Clone,
{
    type Record = R;

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn fetch(
        &self,
        filter: &FilterExpression,
        sort: &Sort,
        pagination: Option<Pagination>,
    ) -> StoreResult<Vec<R>> {
        self.stats.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(StoreOperation::Fetch)?;

        let (window, _) = self.select(StoreOperation::Fetch, filter, sort, pagination)?;
        Ok(window)
    }

    async fn count(&self, filter: &FilterExpression, shape: CountShape) -> StoreResult<u64> {
        // Rows are already flattened, so both shapes count the same set.
        self.record_count(shape);
        self.check_failure(StoreOperation::Count)?;

        let rows = self.read_rows(StoreOperation::Count)?;
        Ok(rows.iter().filter(|row| filter.matches(*row)).count() as u64)
    }

    async fn fetch_with_count(
        &self,
        filter: &FilterExpression,
        sort: &Sort,
        pagination: Pagination,
    ) -> StoreResult<(Vec<R>, u64)> {
        self.stats.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.record_count(CountShape::Joined);
        self.check_failure(StoreOperation::FetchWithCount)?;

        self.select(
            StoreOperation::FetchWithCount,
            filter,
            sort,
            Some(pagination),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FieldValue, FilterCondition};
    use crate::store::StoreErrorKind;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        label: &'static str,
    }

    impl Record for Item {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => Some(self.id.into()),
                "label" => Some(self.label.into()),
                _ => None,
            }
        }
    }

    fn store() -> InMemoryRecordStore<Item> {
        let store = InMemoryRecordStore::new(Schema::new("item").field("id").field("label"));
        store
            .insert_all([
                Item { id: 1, label: "b" },
                Item { id: 2, label: "a" },
                Item { id: 3, label: "b" },
                Item { id: 4, label: "c" },
            ])
            .unwrap();
        store
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|item| item.id).collect()
    }

    #[tokio::test]
    async fn test_fetch_filters_sorts_and_windows() {
        let store = store();
        let filter = FilterCondition::ne("label", "c").into();

        let all = store
            .fetch(&filter, &Sort::asc("label"), None)
            .await
            .unwrap();
        // Ties on "b" keep insertion order.
        assert_eq!(ids(&all), vec![2, 1, 3]);

        let window = store
            .fetch(&filter, &Sort::asc("label"), Some(Pagination::new(1, 1)))
            .await
            .unwrap();
        assert_eq!(ids(&window), vec![1]);
    }

    #[tokio::test]
    async fn test_fetch_past_the_end_is_empty() {
        let store = store();
        let window = store
            .fetch(
                &FilterExpression::All,
                &Sort::unsorted(),
                Some(Pagination::new(10, 5)),
            )
            .await
            .unwrap();
        assert!(window.is_empty());
    }

    #[tokio::test]
    async fn test_count_records_shape() {
        let store = store();
        let total = store
            .count(&FilterCondition::eq("label", "b").into(), CountShape::Base)
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(store.count_calls(), 1);
        assert_eq!(store.last_count_shape(), Some(CountShape::Base));
    }

    #[tokio::test]
    async fn test_fetch_with_count_is_one_round_trip() {
        let store = store();
        let (window, total) = store
            .fetch_with_count(&FilterExpression::All, &Sort::desc("id"), Pagination::new(0, 2))
            .await
            .unwrap();
        assert_eq!(ids(&window), vec![4, 3]);
        assert_eq!(total, 4);
        assert_eq!(store.fetch_calls(), 1);
        assert_eq!(store.count_calls(), 1);
        assert_eq!(store.last_count_shape(), Some(CountShape::Joined));
    }

    #[tokio::test]
    async fn test_injected_failure_carries_operation() {
        let store = store();
        store.fail_with(StoreError::connection_failed("refused"));

        let err = store
            .count(&FilterExpression::All, CountShape::Base)
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::ConnectionFailed);
        assert_eq!(err.operation, StoreOperation::Count);

        store.clear_failure();
        assert!(store
            .fetch(&FilterExpression::All, &Sort::unsorted(), None)
            .await
            .is_ok());
    }

    #[test]
    fn test_debug_shows_schema_and_row_count() {
        let debug = format!("{:?}", store());
        assert!(debug.contains("InMemoryRecordStore"));
        assert!(debug.contains("entity: \"item\""));
        assert!(debug.contains("rows: Some(4)"));
    }

    #[test]
    fn test_clone_shares_rows() {
        let store = store();
        let clone = store.clone();
        store.insert(Item { id: 5, label: "d" }).unwrap();
        assert_eq!(clone.len().unwrap(), 5);
        assert!(!clone.is_empty().unwrap());
    }
}
