//! Paged search executor
//!
//! [`PagedSearch`] runs a filter against a [`RecordStore`] and assembles a
//! [`Page`] using one of three count strategies:
//!
//! - [`CountStrategy::Combined`]: content and total from one store call.
//! - [`CountStrategy::Split`]: content first, then a count only if the total
//!   cannot be derived from the content. The count skips the joins when the
//!   filter touches no joined field.
//! - [`CountStrategy::None`]: no count; fetch one extra record to learn
//!   whether a next page exists.
//!
//! Requests are validated (page size, page index, field names) before the
//! store is touched.
//!
//! # Example
//!
//! ```rust
//! use paged_search::member::{member_schema, MemberSearch, MemberSearchCondition, MemberTeamRow};
//! use paged_search::page::CountStrategy;
//! use paged_search::query::Sort;
//! use paged_search::store::InMemoryRecordStore;
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let store = InMemoryRecordStore::new(member_schema());
//! store.insert(MemberTeamRow::new(1, "member1", 10).with_team(1, "teamA"))?;
//! store.insert(MemberTeamRow::new(2, "member2", 20).with_team(2, "teamB"))?;
//!
//! let search = MemberSearch::new(store);
//! let condition = MemberSearchCondition::new().team_name("teamB");
//! let page = search
//!     .search(&condition, Sort::asc("age"), 0, 10, CountStrategy::Split)
//!     .await?;
//!
//! assert_eq!(page.content.len(), 1);
//! assert_eq!(page.total_elements, Some(1));
//! # Ok::<(), paged_search::error::Error>(())
//! # }).unwrap();
//! ```

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::page::{CountStrategy, Page, PageRequest, Pagination};
use crate::query::{FilterExpression, SearchCondition, Sort};
use crate::store::{RecordStore, StoreError};

/// Executes paged searches against a record store
#[derive(Debug, Clone)]
pub struct PagedSearch<S> {
    store: S,
    config: SearchConfig,
}

impl<S> PagedSearch<S>
where
    S: RecordStore,
{
    /// Create an executor with the default search configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, SearchConfig::default())
    }

    /// Create an executor with an explicit search configuration
    pub fn with_config(store: S, config: SearchConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active search configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search one page of records matching `condition`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] if `page_size <= 0`, `page_index < 0` or
    ///   `page_size` exceeds the configured maximum, if one is set
    /// - [`Error::UnknownField`] if the filter or ordering names a field the
    ///   store does not know
    /// - [`Error::Store`] if the store fails
    pub async fn search<C>(
        &self,
        condition: &C,
        sort: Sort,
        page_index: i64,
        page_size: i64,
        strategy: CountStrategy,
    ) -> Result<Page<S::Record>>
    where
        C: SearchCondition + ?Sized,
    {
        let request = PageRequest::new(page_index, page_size)?.with_sort(sort);
        self.search_page(&condition.to_filter(), &request, strategy)
            .await
    }

    /// Search with the configured default page size and count strategy
    pub async fn search_default<C>(
        &self,
        condition: &C,
        sort: Sort,
        page_index: i64,
    ) -> Result<Page<S::Record>>
    where
        C: SearchCondition + ?Sized,
    {
        let page_size = i64::try_from(self.config.default_page_size).unwrap_or(i64::MAX);
        self.search(
            condition,
            sort,
            page_index,
            page_size,
            self.config.default_strategy,
        )
        .await
    }

    /// Search one page using a single combined fetch-and-count
    pub async fn search_simple<C>(
        &self,
        condition: &C,
        request: &PageRequest,
    ) -> Result<Page<S::Record>>
    where
        C: SearchCondition + ?Sized,
    {
        self.search_page(&condition.to_filter(), request, CountStrategy::Combined)
            .await
    }

    /// Search one page with separate, optimised content and count queries
    pub async fn search_complex<C>(
        &self,
        condition: &C,
        request: &PageRequest,
    ) -> Result<Page<S::Record>>
    where
        C: SearchCondition + ?Sized,
    {
        self.search_page(&condition.to_filter(), request, CountStrategy::Split)
            .await
    }

    /// Search one slice: no total, only whether a next page exists
    pub async fn search_slice<C>(
        &self,
        condition: &C,
        request: &PageRequest,
    ) -> Result<Page<S::Record>>
    where
        C: SearchCondition + ?Sized,
    {
        self.search_page(&condition.to_filter(), request, CountStrategy::None)
            .await
    }

    /// Every record matching `condition`, in `sort` order
    pub async fn search_all<C>(&self, condition: &C, sort: &Sort) -> Result<Vec<S::Record>>
    where
        C: SearchCondition + ?Sized,
    {
        let filter = condition.to_filter();
        self.check_fields(&filter, sort)?;

        tracing::debug!(filter = %filter, sort = %sort, "Fetching all matches");
        self.store
            .fetch(&filter, sort, None)
            .await
            .map_err(store_failure)
    }

    /// Search one page for an already composed filter
    pub async fn search_page(
        &self,
        filter: &FilterExpression,
        request: &PageRequest,
        strategy: CountStrategy,
    ) -> Result<Page<S::Record>> {
        self.check_request(filter, request)?;

        tracing::debug!(
            strategy = %strategy,
            page = request.page(),
            size = request.size(),
            filter = %filter,
            sort = %request.sort(),
            "Executing paged search"
        );

        match strategy {
            CountStrategy::Combined => self.combined(filter, request).await,
            CountStrategy::Split if self.config.concurrent_count => {
                self.split_concurrent(filter, request).await
            }
            CountStrategy::Split => self.split(filter, request).await,
            CountStrategy::None => self.slice(filter, request).await,
        }
    }

    fn check_request(&self, filter: &FilterExpression, request: &PageRequest) -> Result<()> {
        if let Some(max) = self.config.max_page_size {
            if request.size() > max {
                return Err(Error::invalid_request(format!(
                    "page size {} exceeds the maximum of {}",
                    request.size(),
                    max
                )));
            }
        }
        self.check_fields(filter, request.sort())
    }

    fn check_fields(&self, filter: &FilterExpression, sort: &Sort) -> Result<()> {
        let schema = self.store.schema();
        schema.validate_filter(filter)?;
        schema.validate_sort(sort)
    }

    async fn combined(
        &self,
        filter: &FilterExpression,
        request: &PageRequest,
    ) -> Result<Page<S::Record>> {
        let (content, total) = self
            .store
            .fetch_with_count(filter, request.sort(), request.pagination())
            .await
            .map_err(store_failure)?;

        Ok(Page::counted(content, request, total))
    }

    async fn split(
        &self,
        filter: &FilterExpression,
        request: &PageRequest,
    ) -> Result<Page<S::Record>> {
        let content = self
            .store
            .fetch(filter, request.sort(), Some(request.pagination()))
            .await
            .map_err(store_failure)?;

        let total = match derive_total(request, content.len()) {
            Some(total) => {
                tracing::debug!(total, rows = content.len(), "Count skipped; total derived from content");
                total
            }
            None => {
                let shape = self.store.schema().count_shape(filter);
                tracing::debug!(shape = ?shape, "Counting matches");
                self.store
                    .count(filter, shape)
                    .await
                    .map_err(store_failure)?
            }
        };

        Ok(Page::counted(content, request, total))
    }

    async fn split_concurrent(
        &self,
        filter: &FilterExpression,
        request: &PageRequest,
    ) -> Result<Page<S::Record>> {
        let shape = self.store.schema().count_shape(filter);
        tracing::debug!(shape = ?shape, "Fetching content and count concurrently");

        let (content, total) = tokio::try_join!(
            self.store
                .fetch(filter, request.sort(), Some(request.pagination())),
            self.store.count(filter, shape),
        )
        .map_err(store_failure)?;

        Ok(Page::counted(content, request, total))
    }

    async fn slice(
        &self,
        filter: &FilterExpression,
        request: &PageRequest,
    ) -> Result<Page<S::Record>> {
        let pagination = Pagination::new(request.offset(), request.size().saturating_add(1));
        let content = self
            .store
            .fetch(filter, request.sort(), Some(pagination))
            .await
            .map_err(store_failure)?;

        Ok(Page::sliced(content, request))
    }
}

/// Total implied by a short page, if the content alone pins it down.
///
/// The first page with fewer than `size` rows holds every match. A later page
/// with some but fewer than `size` rows is the last one. An empty later page
/// says nothing, since the offset may overshoot the matches.
fn derive_total(request: &PageRequest, rows: usize) -> Option<u64> {
    let rows = u64::try_from(rows).unwrap_or(u64::MAX);
    if rows >= request.size() {
        return None;
    }
    if request.offset() == 0 {
        Some(rows)
    } else if rows > 0 {
        Some(request.offset().saturating_add(rows))
    } else {
        None
    }
}

fn store_failure(error: StoreError) -> Error {
    tracing::warn!(
        operation = %error.operation,
        kind = %error.kind,
        retriable = error.is_retriable(),
        "Record store failed: {}",
        error.message
    );
    Error::Store(error)
}
