//! Schema driven tabular data browsing: records in, a filtered, sorted,
//! paginated and selectable view out.
//!
//! [`TableEngine`] owns the view state and recomputes its row mapping
//! deterministically on every mutation; renderers re-read
//! [`TableEngine::view`] afterwards and forward user gestures back into
//! the engine. The bundled binary is one such renderer, browsing the
//! sample collections in [`datasets`].

pub mod actions;
pub mod datasets;
pub mod domain;
pub mod engine;
pub mod schema;
pub mod value;

pub use actions::{LogActions, RowActions};
pub use domain::{DEFAULT_PAGE_SIZE, DVConfig, DVError, SortOrder};
pub use engine::{TableEngine, ViewColumn, ViewRow, ViewSnapshot};
pub use schema::{Align, Column, Schema};
pub use value::CellValue;
