/*
 * coercion.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion of resolved values to text.
//!
//! Only strings and integers can be substituted into a template or
//! compared in a condition. Booleans, floats, null, maps and arrays are
//! not renderable.

use crate::resolver::Located;
use jinja2_document::DataValue;
use std::borrow::Cow;

/// Render a located value as text, or `None` if its kind is not renderable.
pub fn coerce<'a>(located: Located<'a>) -> Option<Cow<'a, str>> {
    match located {
        Located::Value(DataValue::String(s)) => Some(Cow::Borrowed(s.as_str())),
        Located::Value(DataValue::Integer(i)) => Some(Cow::Owned(i.to_string())),
        _ => None,
    }
}
