//! Error types shared by the history, tools and surface.

use crate::object::ObjectId;
use thiserror::Error;

/// Errors raised by the sketch controller and its collaborators.
#[derive(Debug, Error)]
pub enum SketchError {
    /// Undo or `current()` on a history with no applied entry.
    #[error("no history entry to undo")]
    EmptyHistory,
    /// Redo while the cursor is already at the tail.
    #[error("nothing to redo")]
    RedoUnavailable,
    /// A tool name that matches no registered tool.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// A history entry references an object that is neither on the surface nor detached.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),
    /// A state snapshot could not be encoded or decoded.
    #[error("invalid state snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    /// Configuration or document JSON could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for sketch operations.
pub type SketchResult<T> = Result<T, SketchError>;
