use std::fmt;

use thiserror::Error;

use crate::domain::ContentId;

/// Which feed operation a failed fetch belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Page,
    Refresh,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKind::Page => write!(f, "load"),
            FetchKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Which bookmark mutation failed to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkOp {
    Add,
    Remove,
}

impl fmt::Display for BookmarkOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkOp::Add => write!(f, "add"),
            BookmarkOp::Remove => write!(f, "remove"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DevfeedError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status} for {url}")]
    Server { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to {kind} (page {page}): {source}")]
    FetchFailed {
        kind: FetchKind,
        page: u32,
        #[source]
        source: Box<DevfeedError>,
    },

    #[error("Invalid page number: {0}")]
    InvalidPage(u32),

    #[error("No page after {0}")]
    PageOverflow(u32),

    #[error("Bookmark limit of {capacity} reached, cannot add {id}")]
    CapacityExceeded { id: ContentId, capacity: usize },

    #[error("Failed to persist bookmarks after {op} of {id}: {source}")]
    BookmarkPersistFailed {
        op: BookmarkOp,
        id: ContentId,
        #[source]
        source: Box<DevfeedError>,
    },

    #[error("Item not found: {0}")]
    ItemNotFound(ContentId),

    #[error("Corrupt bookmark data: {0}")]
    CorruptBookmarks(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DevfeedError>;
