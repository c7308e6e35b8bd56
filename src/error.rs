use crate::tree::NodeId;
use thiserror::Error;

/// Failures reported by an accessible tree adapter
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The node existed once but has been removed from the tree
    #[error("Accessible {0} is defunct")]
    Defunct(NodeId),

    /// The handle was never issued by this tree
    #[error("Unknown accessible {0}")]
    UnknownNode(NodeId),

    /// The node does not implement the requested interface
    #[error("Accessible {node} does not support the {interface} interface")]
    NotSupported { node: NodeId, interface: &'static str },

    /// A table coordinate outside the table's bounds
    #[error("No cell at row {row}, column {col}")]
    InvalidCoordinate { row: usize, col: usize },
}

/// Result type for adapter calls
pub type TreeResult<T> = std::result::Result<T, TreeError>;

/// Errors surfaced by the navigator
#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("Accessible tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Invalid parameters for command '{command}': {reason}")]
    InvalidParams { command: String, reason: String },

    #[error("Failed to load accessibility snapshot: {0}")]
    Snapshot(String),

    #[error("Invalid navigator settings: {0}")]
    Config(String),
}

/// Result type alias for navigator operations
pub type Result<T> = std::result::Result<T, NavigatorError>;
