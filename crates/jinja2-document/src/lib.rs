/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Hierarchical data documents for template conversion.
//!
//! A document is a map at the root with maps, arrays, and scalars below
//! it. Documents are usually read from JSON:
//!
//! ```
//! use jinja2_document::{DataMap, DataValue};
//!
//! let doc = DataMap::from_json_str(r#"{"user": {"name": "Alice"}}"#).unwrap();
//! let name = doc.get("user").and_then(|u| u.get("name"));
//! assert_eq!(name, Some(&DataValue::from("Alice")));
//! ```

pub mod error;
pub mod json;
pub mod value;

pub use error::{DocumentError, DocumentResult};
pub use value::{DataKind, DataMap, DataValue};
