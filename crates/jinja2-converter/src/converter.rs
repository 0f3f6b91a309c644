/*
 * converter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The converter facade: parse a template, render it against a document.

use crate::error::{ConvertError, ConvertResult};
use crate::evaluator::render_into;
use crate::options::ConvertOptions;
use crate::parser::{Jinja2Parser, TemplateParser};
use jinja2_document::DataMap;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Converts templates into text.
///
/// A converter owns one parser. Every call to [`convert`](Self::convert)
/// holds exclusive access to that parser for the whole parse and
/// evaluation, so concurrent callers are served one at a time. A converter
/// can be shared between threads (e.g. behind an `Arc`, or via
/// [`Converter::global`]).
#[derive(Debug)]
pub struct Converter<P = Jinja2Parser> {
    parser: Mutex<P>,
    options: ConvertOptions,
}

impl Converter<Jinja2Parser> {
    /// Create a converter with default options.
    pub fn new() -> Self {
        Self::with_options(ConvertOptions::default())
    }

    /// Create a converter using the built-in parser.
    pub fn with_options(options: ConvertOptions) -> Self {
        let parser = Jinja2Parser::new().with_trace_parsing(options.trace_parsing);
        Self::with_parser(parser, options)
    }

    /// The process-wide converter, created with default options on first use.
    pub fn global() -> &'static Converter {
        static GLOBAL: OnceLock<Converter> = OnceLock::new();
        GLOBAL.get_or_init(Converter::new)
    }
}

impl Default for Converter<Jinja2Parser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: TemplateParser> Converter<P> {
    /// Create a converter around a custom parser.
    ///
    /// The parser keeps its own tracing setting; `options.trace_parsing` is
    /// only applied by [`Converter::with_options`].
    pub fn with_parser(parser: P, options: ConvertOptions) -> Self {
        Self {
            parser: Mutex::new(parser),
            options,
        }
    }

    /// The options this converter renders with.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Render `template` against `document`.
    ///
    /// Blocks while another conversion on this converter is running. Loop
    /// variables are written into `document` and, with the default
    /// [`LoopBinding::Persistent`](crate::LoopBinding::Persistent), remain
    /// there after this call returns.
    pub fn convert(&self, template: &str, document: &mut DataMap) -> ConvertResult<String> {
        // The parser resets itself on every parse, so a panic in an earlier
        // call leaves nothing behind that needs recovering.
        let mut parser = self.parser.lock().unwrap_or_else(PoisonError::into_inner);

        tracing::debug!(template_len = template.len(), "Converting template");

        let nodes = parser.parse(template).map_err(|err| ConvertError::Parse {
            message: err.render(template),
        })?;

        if nodes.is_empty() {
            return Ok(String::new());
        }

        let mut output = String::new();
        render_into(document, &nodes, &self.options, &mut output)?;

        tracing::debug!(
            nodes = nodes.len(),
            output_len = output.len(),
            "Converted template"
        );
        drop(parser);
        Ok(output)
    }

    /// Render `template` against a document given as JSON text.
    ///
    /// The document is parsed first; a malformed document is reported like
    /// a malformed template. The parsed document is dropped afterwards, so
    /// loop bindings never outlive the call.
    pub fn convert_json(&self, template: &str, json: &str) -> ConvertResult<String> {
        let mut document = DataMap::from_json_str(json)?;
        self.convert(template, &mut document)
    }

    /// Tear down the converter, returning its parser.
    pub fn into_parser(self) -> P {
        self.parser
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
