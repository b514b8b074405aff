//! Record store error types
//!
//! Errors raised by a [`RecordStore`](super::RecordStore) carry the operation
//! that failed and a category, so callers can tell a dropped connection from a
//! broken query without parsing messages.
//!
//! # Example
//!
//! ```rust
//! use paged_search::store::{StoreError, StoreErrorKind, StoreOperation};
//!
//! let error = StoreError::connection_failed("connection refused");
//! assert!(matches!(error.kind, StoreErrorKind::ConnectionFailed));
//! assert!(error.is_retriable());
//! ```

use std::fmt;

/// Operation being performed when the store error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Fetching a window of records
    Fetch,
    /// Counting records matching a filter
    Count,
    /// Fetching a window of records together with the total count
    FetchWithCount,
    /// Writing records into the store
    Insert,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Count => write!(f, "count"),
            Self::FetchWithCount => write!(f, "fetch_with_count"),
            Self::Insert => write!(f, "insert"),
        }
    }
}

/// Category of store error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Failed to reach the store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Constraint violation reported by the store
    ConstraintViolation,
    /// The store rejected or failed to execute the query
    QueryFailed,
    /// Other unclassified error
    Other,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::QueryFailed => write!(f, "query_failed"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured record store error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// The operation being performed when the error occurred
    pub operation: StoreOperation,
    /// The category of error
    pub kind: StoreErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The entity (table, collection) involved, if known
    pub entity: Option<String>,
}

impl StoreError {
    /// Create a new store error
    ///
    /// # Example
    ///
    /// ```rust
    /// use paged_search::store::{StoreError, StoreErrorKind, StoreOperation};
    ///
    /// let error = StoreError::new(
    ///     StoreOperation::Fetch,
    ///     StoreErrorKind::QueryFailed,
    ///     "syntax error near ORDER",
    /// );
    /// assert_eq!(error.operation, StoreOperation::Fetch);
    /// ```
    pub fn new(
        operation: StoreOperation,
        kind: StoreErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity: None,
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(
            StoreOperation::Fetch,
            StoreErrorKind::ConnectionFailed,
            message,
        )
    }

    /// Create a timeout error
    pub fn timeout(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Timeout, message)
    }

    /// Create a constraint violation error
    pub fn constraint_violation(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::ConstraintViolation, message)
    }

    /// Create a query failed error
    pub fn query_failed(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::QueryFailed, message)
    }

    /// Create an unclassified error
    pub fn other(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Other, message)
    }

    /// Attach the entity name to an existing error
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: StoreOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Check if this error is transient.
    ///
    /// The search executor never retries; this is for callers that do.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::ConnectionFailed | StoreErrorKind::Timeout
        )
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref entity) = self.entity {
            write!(f, " [{}]", entity)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {}
