use thiserror::Error;

/// Failures surfaced by the search engine and query sessions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    /// `submit` was called on a disposed session
    #[error("query session is closed")]
    SessionClosed,

    /// `submit` was called outside a tokio runtime
    #[error("query session needs a tokio runtime to schedule searches")]
    NoRuntime,

    /// The compute step died before producing a result
    #[error("search computation failed: {0}")]
    ComputeFailed(String),
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;
