/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Jinja2-subset template converter.
//!
//! Renders a template against a hierarchical document (see
//! [`jinja2_document`]). Supported syntax:
//!
//! - Substitution: `{{ name }}`, `{{ employee.salary }}`, `{{ a["key"] }}`
//! - Conditionals: `{% if flag %}...{% else %}...{% endif %}` and
//!   `{% if mode == "fast" %}...{% endif %}`
//! - Loops: `{% for item in items %}...{% endfor %}`
//! - Comments: `{# ignored #}`
//!
//! # Semantics worth knowing
//!
//! - Only strings and integers can be substituted or compared. Anything
//!   else, like a missing path, fails the whole conversion.
//! - A condition holds when the value equals the right-hand literal, or is
//!   exactly `"true"` or `"True"`. A bare `{% if x %}` therefore only holds
//!   for those two strings.
//! - Loop variables are written into the document's root map and stay
//!   there after the loop, unless [`LoopBinding::Scoped`] is configured.
//!
//! # Example
//!
//! ```
//! use jinja2_converter::Converter;
//!
//! let converter = Converter::new();
//! let output = converter
//!     .convert_json(
//!         "{% for x in items %}{{ x }},{% endfor %}",
//!         r#"{"items": [1, 2, 3]}"#,
//!     )
//!     .unwrap();
//! assert_eq!(output, "1,2,3,");
//! ```

pub mod ast;
pub mod coercion;
pub mod converter;
pub mod error;
pub mod eval_context;
pub mod evaluator;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod resolver;

// Re-export main types at crate root
pub use ast::{Conditional, Loop, Node, Span, Substitution, Text, VariableRef};
pub use converter::Converter;
pub use error::{ConvertError, ConvertResult, ParseError, ParseResult};
pub use eval_context::EvalContext;
pub use evaluator::{render_into, render_to_string};
pub use jinja2_document::{DataKind, DataMap, DataValue, DocumentError};
pub use options::{ConvertOptions, LoopBinding};
pub use parser::{Jinja2Parser, TemplateParser};
pub use resolver::{Located, resolve};
