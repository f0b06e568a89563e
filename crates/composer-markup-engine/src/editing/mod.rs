//! # Editing Support
//!
//! Caller-side helpers around the live-typing pass: mapping the returned
//! caret offset onto the editable surface's text nodes, and the linear undo
//! stack of previous passes.
//!
//! ## Modules
//!
//! - **`caret`**: `offset_to_position` and its inverse over text segments
//! - **`history`**: `EditHistory`, a bounded undo/redo stack of snapshots

pub mod caret;
pub mod history;

pub use caret::{CaretPosition, offset_to_position, position_to_offset};
pub use history::{EditHistory, HistoryEntry};
