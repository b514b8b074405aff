//! Page requests, page results and count strategies
//!
//! # Example
//!
//! ```rust
//! use paged_search::page::{CountStrategy, PageRequest};
//! use paged_search::query::Sort;
//!
//! let request = PageRequest::new(2, 20)?.with_sort(Sort::desc("age"));
//! assert_eq!(request.offset(), 40);
//!
//! let strategy: CountStrategy = "split".parse()?;
//! assert_eq!(strategy, CountStrategy::Split);
//! # Ok::<(), paged_search::error::Error>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::query::Sort;

/// Offset/limit window handed to the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    /// Create new pagination parameters
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Create pagination for the first window with the given limit
    #[must_use]
    pub const fn first_page(limit: u64) -> Self {
        Self { offset: 0, limit }
    }
}

/// How the total element count of a page is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountStrategy {
    /// One store call returning content and total together
    #[default]
    Combined,
    /// Content and count as independent calls; the count may be reduced or skipped
    Split,
    /// No count; detect a next page by fetching one extra record
    None,
}

impl fmt::Display for CountStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combined => write!(f, "combined"),
            Self::Split => write!(f, "split"),
            Self::None => write!(f, "none"),
        }
    }
}

impl FromStr for CountStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" => Ok(Self::Combined),
            "split" => Ok(Self::Split),
            "none" => Ok(Self::None),
            other => Err(Error::invalid_request(format!(
                "unknown count strategy '{}' (expected combined, split or none)",
                other
            ))),
        }
    }
}

/// A validated request for one page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
    sort: Sort,
}

impl PageRequest {
    /// Create a page request for the zero-based `page` with `size` elements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if `size <= 0` or `page < 0`.
    pub fn new(page: i64, size: i64) -> Result<Self> {
        if size <= 0 {
            return Err(Error::invalid_request(format!(
                "page size must be greater than zero, got {}",
                size
            )));
        }
        if page < 0 {
            return Err(Error::invalid_request(format!(
                "page index must not be negative, got {}",
                page
            )));
        }

        Ok(Self {
            page: page.unsigned_abs(),
            size: size.unsigned_abs(),
            sort: Sort::unsorted(),
        })
    }

    /// Replace the ordering
    #[must_use]
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Zero-based page index
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Page size
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Requested ordering
    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Number of records before this page
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Store window for this page
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.offset(), self.size)
    }

    /// Request for the following page with the same size and ordering
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page, at most `size` of them
    pub content: Vec<T>,
    /// Total matches across all pages; absent when no count was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_elements: Option<u64>,
    /// Zero-based page index
    pub number: u64,
    /// Requested page size
    pub size: u64,
    /// Whether this is the first page
    pub is_first: bool,
    /// Whether a following page has records
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Assemble a page whose total is known
    pub(crate) fn counted(content: Vec<T>, request: &PageRequest, total: u64) -> Self {
        let seen = request
            .page()
            .saturating_add(1)
            .saturating_mul(request.size());
        Self {
            content,
            total_elements: Some(total),
            number: request.page(),
            size: request.size(),
            is_first: request.page() == 0,
            has_next: seen < total,
        }
    }

    /// Assemble a page from an over-fetch of `size + 1` records, dropping the
    /// extra record if it came back
    pub(crate) fn sliced(mut content: Vec<T>, request: &PageRequest) -> Self {
        let limit = usize::try_from(request.size()).unwrap_or(usize::MAX);
        let has_next = content.len() > limit;
        content.truncate(limit);
        Self {
            content,
            total_elements: None,
            number: request.page(),
            size: request.size(),
            is_first: request.page() == 0,
            has_next,
        }
    }

    /// Number of records on this page
    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    /// Total number of pages, if the total is known
    pub fn total_pages(&self) -> Option<u64> {
        let size = self.size.max(1);
        self.total_elements.map(|total| total.div_ceil(size))
    }

    /// Whether a previous page exists
    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    /// Whether this is the last page
    pub fn is_last(&self) -> bool {
        !self.has_next
    }

    /// Map the records to a new type, keeping the page metadata
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            number: self.number,
            size: self.size,
            is_first: self.is_first,
            has_next: self.has_next,
        }
    }
}
