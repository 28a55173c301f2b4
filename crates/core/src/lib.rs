#![deny(missing_docs)]
//! fencelight core: document tree, traversal, and highlighter configuration.

/// Highlighter configuration and defaults.
pub mod config;
/// Core error types.
pub mod error;
/// Import of markdown-rs syntax trees.
pub mod mdast;
/// Arena-backed document tree.
pub mod tree;
/// Unist JSON conversion.
pub mod unist;
/// Depth-first node selection.
pub mod visit;

pub use config::{DEFAULT_LANGS, DEFAULT_THEME, HighlightConfig, HighlightOptions, ThemeSetting};
pub use error::{ConfigError, TreeError};
pub use tree::{CodeBlock, Descendants, Document, Fields, Node, NodeId, NodeKind};
pub use visit::{select, select_code, select_type};
