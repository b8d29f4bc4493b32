use std::fmt;
use std::io;

use derive_setters::Setters;

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// Errors the engine reports back to its caller. All engine variants are
// recoverable and leave the engine state untouched.
#[derive(Debug)]
pub enum DVError {
    /// A field name that is not part of the column schema.
    UnknownField(String),
    /// Sort requested on a column whose descriptor disallows it.
    NotSortable(String),
    /// Page index past the last valid page of the filtered set.
    PageOutOfRange { requested: usize, pages: usize },
    IoError(io::Error),
}

impl fmt::Display for DVError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DVError::UnknownField(field) => write!(f, "unknown field \"{field}\""),
            DVError::NotSortable(field) => write!(f, "column \"{field}\" is not sortable"),
            DVError::PageOutOfRange { requested, pages } => {
                write!(f, "page {requested} is out of range ({pages} page(s))")
            }
            DVError::IoError(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for DVError {}

impl From<io::Error> for DVError {
    fn from(err: io::Error) -> Self {
        DVError::IoError(err)
    }
}

/// Direction of the single active sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Shared configuration for the engine and the front-end loop.
#[derive(Debug, Clone, Setters)]
#[setters(strip_option)]
pub struct DVConfig {
    /// Rows per page. The engine clamps this to at least 1.
    pub page_size: usize,
    /// Field the free-standing search gesture targets.
    pub default_search_field: Option<String>,
    /// Key event poll timeout in milliseconds.
    pub event_poll_time: u64,
}

impl Default for DVConfig {
    fn default() -> Self {
        DVConfig {
            page_size: DEFAULT_PAGE_SIZE,
            default_search_field: None,
            event_poll_time: 100,
        }
    }
}
