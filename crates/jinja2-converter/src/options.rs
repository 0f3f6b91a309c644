/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Converter configuration.

use serde::Deserialize;

/// How long a loop variable stays in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopBinding {
    /// The binding is written into the document's root map and left there
    /// after the loop, visible to the rest of the template and to the
    /// caller once conversion returns.
    #[default]
    Persistent,

    /// The binding is written into the root map while the loop runs and
    /// the previous entry (or its absence) is restored afterwards.
    Scoped,
}

/// Options for a [`Converter`](crate::Converter).
///
/// Can be deserialized from an embedding program's configuration:
///
/// ```json
/// { "trace-parsing": false, "loop-binding": "scoped" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConvertOptions {
    /// Emit every template token as a `TRACE` event while parsing.
    pub trace_parsing: bool,

    /// Lifetime of loop variables.
    pub loop_binding: LoopBinding,
}

impl ConvertOptions {
    /// Default options: no token tracing, persistent loop bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the built-in parser traces every token.
    pub fn with_trace_parsing(mut self, trace: bool) -> Self {
        self.trace_parsing = trace;
        self
    }

    /// Set how long loop variables stay in the document.
    pub fn with_loop_binding(mut self, binding: LoopBinding) -> Self {
        self.loop_binding = binding;
        self
    }
}
