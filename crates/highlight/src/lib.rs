#![deny(missing_docs)]
//! fencelight highlighter: replaces fenced code blocks with themed HTML.

/// Engine cache keyed by configuration.
pub mod cache;
/// Highlighting engine trait and the syntect implementation.
pub mod engine;
/// Highlighter error type.
pub mod error;
/// HTML emission.
pub mod html;
/// Grammar bundle and language aliases.
pub mod languages;
/// Built-in themes.
pub mod themes;
/// The document transform.
pub mod transform;

pub use cache::EngineCache;
pub use engine::{HighlightEngine, SyntectEngine};
pub use error::HighlightError;
pub use html::{FALLBACK_CLASS, fallback_html};
pub use themes::{available_themes, load_theme};
pub use transform::{HighlightSummary, Highlighter, highlight};
