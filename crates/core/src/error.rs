use thiserror::Error;

use crate::tree::NodeId;

/// Errors raised while building or addressing a document tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A unist node was not a JSON object.
    #[error("Expected a node object at {path}, found {found}")]
    NotAnObject {
        /// JSON path of the offending value.
        path: String,
        /// Short description of what was found instead.
        found: &'static str,
    },
    /// A unist node had no string `type` property.
    #[error("Node at {path} is missing a string `type`")]
    MissingType {
        /// JSON path of the offending node.
        path: String,
    },
    /// `children` was present but not an array.
    #[error("Node at {path} has a non-array `children` property")]
    InvalidChildren {
        /// JSON path of the offending node.
        path: String,
    },
    /// A field that must be a string (such as `value` on `code`) was not.
    #[error("Field `{field}` of node at {path} must be a string")]
    InvalidField {
        /// JSON path of the offending node.
        path: String,
        /// Field name.
        field: &'static str,
    },
    /// A node id that does not belong to the document.
    #[error("Unknown node id {0}")]
    UnknownNode(NodeId),
}

/// Errors raised while reading or resolving highlighter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration JSON could not be decoded.
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// A theme entry was empty or whitespace.
    #[error("Theme names must not be blank")]
    BlankTheme,
    /// A language entry was empty or whitespace.
    #[error("Language identifiers must not be blank")]
    BlankLanguage,
}
