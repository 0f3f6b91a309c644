/*
 * eval_context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Evaluation context for template rendering.
//!
//! [`EvalContext`] is threaded through all evaluation functions. It holds
//! the document being read (and, for loop bindings, written), the
//! converter options, and the output sink.

use crate::options::{ConvertOptions, LoopBinding};
use jinja2_document::{DataMap, DataValue};

/// The entry a loop binding replaced, kept so it can be put back.
#[derive(Debug)]
pub struct SavedBinding {
    name: String,
    previous: Option<DataValue>,
}

pub struct EvalContext<'a> {
    /// The document. Loops insert their binding into this root map.
    pub document: &'a mut DataMap,

    pub options: &'a ConvertOptions,

    /// Rendered text so far.
    pub output: &'a mut String,
}

impl<'a> EvalContext<'a> {
    /// Create a context that renders into `output`.
    pub fn new(
        document: &'a mut DataMap,
        options: &'a ConvertOptions,
        output: &'a mut String,
    ) -> Self {
        Self {
            document,
            options,
            output,
        }
    }

    /// Bind a loop variable in the root map, overwriting any existing entry.
    pub fn bind(&mut self, name: &str, value: DataValue) {
        self.document.insert(name, value);
    }

    /// Remember the current entry for `name` if bindings are scoped.
    ///
    /// Returns `None` for persistent bindings, which are never restored.
    pub fn save_binding(&self, name: &str) -> Option<SavedBinding> {
        match self.options.loop_binding {
            LoopBinding::Persistent => None,
            LoopBinding::Scoped => Some(SavedBinding {
                name: name.to_string(),
                previous: self.document.get(name).cloned(),
            }),
        }
    }

    /// Put back the entry captured by [`save_binding`](Self::save_binding).
    pub fn restore_binding(&mut self, saved: SavedBinding) {
        match saved.previous {
            Some(value) => {
                self.document.insert(saved.name, value);
            }
            None => {
                self.document.remove(&saved.name);
            }
        }
    }
}
