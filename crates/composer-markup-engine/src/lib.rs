pub mod editing;
pub mod error;
pub mod markup;

// Re-export key types for easier usage
pub use editing::{caret::*, history::*};
pub use error::MarkupError;
pub use markup::{
    Entity, EntityKind, FormattedText, LiveMarkup, ParseOptions, entities_to_markup,
    parse_for_editable, parse_formatted_bytes, parse_formatted_text,
};
