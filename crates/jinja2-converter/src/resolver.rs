/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Path resolution.
//!
//! A path is a sequence of keys. Each key is looked up in the map reached
//! by the previous one, starting at the document root. Arrays and scalars
//! have no keys, so a lookup through them fails.

use jinja2_document::{DataKind, DataMap, DataValue};

/// The location a path resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Located<'a> {
    /// The empty path: the document root itself.
    Document(&'a DataMap),
    /// A value below the root.
    Value(&'a DataValue),
}

impl Located<'_> {
    /// Kind of the located value; the root is a map.
    pub fn kind(&self) -> DataKind {
        match self {
            Located::Document(_) => DataKind::Map,
            Located::Value(value) => value.kind(),
        }
    }
}

/// Resolve `path` against `document`.
///
/// Returns `None` as soon as a key is missing or the current value is not
/// a map; there is no partial result.
pub fn resolve<'a>(document: &'a DataMap, path: &[String]) -> Option<Located<'a>> {
    let Some((first, rest)) = path.split_first() else {
        return Some(Located::Document(document));
    };

    let mut current = document.get(first)?;
    for key in rest {
        current = current.get(key)?;
    }
    Some(Located::Value(current))
}
