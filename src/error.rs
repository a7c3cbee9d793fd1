//! Error types for vitae operations.

use thiserror::Error;

use crate::model::NodeType;
use crate::schema::Violation;

/// Errors that can occur at the JSON/IO boundary or during a checked edit.
///
/// The record/tree transforms themselves never fail: missing data is
/// substituted, never reported.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Document root must be doc, found {0}")]
    InvalidRoot(NodeType),

    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    #[error("Structural violation: {}", .0.first().map(ToString::to_string).unwrap_or_default())]
    Structure(Vec<Violation>),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, Error>;
