use fencelight_core::{ConfigError, TreeError};
use thiserror::Error;

/// Errors raised while building a highlighter or transforming a document.
#[derive(Debug, Error)]
pub enum HighlightError {
    /// The configured theme is neither built in nor embedded.
    #[error("Unable to load theme `{name}`: no such theme (available: {available})")]
    ThemeNotFound {
        /// Requested theme name.
        name: String,
        /// Comma-separated list of loadable themes.
        available: String,
    },
    /// An embedded theme failed to parse.
    #[error("Unable to load theme `{name}`: {source}")]
    ThemeLoad {
        /// Requested theme name.
        name: String,
        /// Underlying loader error.
        #[source]
        source: syntect::LoadingError,
    },
    /// A code block asked for a language the engine was not initialized with.
    #[error("Language `{lang}` is not loaded; add it to `langs`")]
    LanguageNotLoaded {
        /// Declared language.
        lang: String,
    },
    /// A code block asked for a theme the engine was not initialized with.
    #[error("Theme `{name}` is not loaded by this highlighter")]
    ThemeNotLoaded {
        /// Requested theme name.
        name: String,
    },
    /// The grammar failed while tokenizing a block.
    #[error("Failed to highlight `{lang}` code: {source}")]
    Render {
        /// Declared language.
        lang: String,
        /// Underlying parser error.
        #[source]
        source: syntect::parsing::ParsingError,
    },
    /// Invalid highlighter configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Malformed document tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl HighlightError {
    /// Whether the error stems from configuration rather than document content.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HighlightError::ThemeNotFound { .. }
                | HighlightError::ThemeLoad { .. }
                | HighlightError::Config(_)
        )
    }
}
