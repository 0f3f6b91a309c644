/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for document ingestion.

use crate::value::DataKind;
use thiserror::Error;

/// Errors that can occur while building a document from serialized text.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The input is not valid JSON.
    #[error("error while parsing json-input: {0}")]
    Json(#[from] serde_json::Error),

    /// The input is valid JSON, but its root is not an object.
    #[error("error while parsing json-input: the root must be an object, found {kind}")]
    NotAMap { kind: DataKind },
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
