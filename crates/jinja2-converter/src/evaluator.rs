/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template evaluation engine.
//!
//! This module renders parsed template nodes against a document. Nodes are
//! rendered in order into one output buffer; the first failure stops the
//! whole evaluation and discards everything rendered so far.

use crate::ast::{Conditional, Loop, Node, Text, VariableRef};
use crate::coercion::coerce;
use crate::error::{ConvertError, ConvertResult};
use crate::eval_context::EvalContext;
use crate::options::ConvertOptions;
use crate::resolver::{Located, resolve};
use jinja2_document::{DataMap, DataValue};
use std::borrow::Cow;

/// Literal values a condition's left side is always true for, besides the
/// right-hand literal itself.
const TRUE_LITERALS: [&str; 2] = ["True", "true"];

/// Render `nodes` against `document`, appending to `output`.
///
/// On failure `output` is cleared. Loops write their binding into
/// `document` (see [`LoopBinding`](crate::LoopBinding)).
pub fn render_into(
    document: &mut DataMap,
    nodes: &[Node],
    options: &ConvertOptions,
    output: &mut String,
) -> ConvertResult<()> {
    let mut ctx = EvalContext::new(document, options, output);
    let result = render(&mut ctx, nodes);
    if result.is_err() {
        ctx.output.clear();
    }
    result
}

/// Render `nodes` against `document` into a new string.
pub fn render_to_string(
    document: &mut DataMap,
    nodes: &[Node],
    options: &ConvertOptions,
) -> ConvertResult<String> {
    let mut output = String::new();
    render_into(document, nodes, options, &mut output)?;
    Ok(output)
}

/// Render a node sequence.
fn render(ctx: &mut EvalContext, nodes: &[Node]) -> ConvertResult<()> {
    for node in nodes {
        render_node(ctx, node)?;
    }
    Ok(())
}

fn render_node(ctx: &mut EvalContext, node: &Node) -> ConvertResult<()> {
    match node {
        Node::Text(Text { literal, .. }) => {
            ctx.output.push_str(literal);
            Ok(())
        }
        Node::Substitution(sub) => {
            let text = resolve_text(ctx.document, &sub.path)?;
            ctx.output.push_str(&text);
            Ok(())
        }
        Node::Conditional(cond) => render_conditional(ctx, cond),
        Node::Loop(lp) => render_loop(ctx, lp),
    }
}

/// Resolve a path and coerce the value to text.
fn resolve_text<'a>(document: &'a DataMap, var: &VariableRef) -> ConvertResult<Cow<'a, str>> {
    let Some(located) = resolve(document, &var.path) else {
        tracing::debug!(path = %var, "Path not found in document");
        let path = var.dotted();
        return Err(ConvertError::PathNotFound { path });
    };

    coerce(located).ok_or_else(|| {
        tracing::debug!(path = %var, kind = %located.kind(), "Value cannot be rendered as text");
        ConvertError::UnsupportedType {
            path: var.dotted(),
            kind: located.kind(),
        }
    })
}

fn is_true(value: &str, right_literal: &str) -> bool {
    value == right_literal || TRUE_LITERALS.contains(&value)
}

fn render_conditional(ctx: &mut EvalContext, cond: &Conditional) -> ConvertResult<()> {
    let taken = {
        let value = resolve_text(ctx.document, &cond.left)?;
        is_true(&value, &cond.right_literal)
    };

    if taken {
        render(ctx, &cond.then_branch)
    } else if let Some(else_branch) = &cond.else_branch {
        render(ctx, else_branch)
    } else {
        Ok(())
    }
}

fn render_loop(ctx: &mut EvalContext, lp: &Loop) -> ConvertResult<()> {
    // Snapshot the elements: the binding may overwrite the source key.
    let items: Vec<DataValue> = match resolve(ctx.document, &lp.source.path) {
        Some(Located::Value(DataValue::Array(items))) => items.clone(),
        Some(other) => {
            tracing::debug!(
                path = %lp.source,
                kind = %other.kind(),
                "Loop source is not an array"
            );
            return Err(ConvertError::NonIterable {
                path: lp.source.dotted(),
                kind: other.kind(),
            });
        }
        None => {
            tracing::debug!(path = %lp.source, "Path not found in document");
            return Err(ConvertError::PathNotFound {
                path: lp.source.dotted(),
            });
        }
    };

    let saved = ctx.save_binding(&lp.binding);
    let result = render_items(ctx, lp, items);
    if let Some(saved) = saved {
        ctx.restore_binding(saved);
    }
    result
}

fn render_items(ctx: &mut EvalContext, lp: &Loop, items: Vec<DataValue>) -> ConvertResult<()> {
    for (index, item) in items.into_iter().enumerate() {
        tracing::trace!(binding = %lp.binding, index, "Loop iteration");
        ctx.bind(&lp.binding, item);
        render(ctx, &lp.body)?;
    }
    Ok(())
}
