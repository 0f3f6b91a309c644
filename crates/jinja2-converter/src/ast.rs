/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template AST types.
//!
//! A parsed template is a sequence of [`Node`]s. Conditionals and loops own
//! their nested sequences. Each node records the byte range of the template
//! source it came from.

use std::fmt;
use std::ops::Range;

/// Byte range in the template source.
pub type Span = Range<usize>;

/// A node in the template AST.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text to be output as-is.
    Text(Text),

    /// Variable substitution: `{{ a.b }}`
    Substitution(Substitution),

    /// Conditional block: `{% if a == "x" %}...{% else %}...{% endif %}`
    Conditional(Conditional),

    /// For loop: `{% for item in items %}...{% endfor %}`
    Loop(Loop),
}

impl Node {
    /// Byte range of the node in the template source.
    pub fn span(&self) -> &Span {
        match self {
            Node::Text(text) => &text.span,
            Node::Substitution(sub) => &sub.span,
            Node::Conditional(cond) => &cond.span,
            Node::Loop(lp) => &lp.span,
        }
    }
}

/// Literal text node.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub literal: String,
    pub span: Span,
}

/// Variable substitution node.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub path: VariableRef,
    pub span: Span,
}

/// Conditional block.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    /// Path whose value is compared.
    pub left: VariableRef,
    /// Literal form of the right-hand side of `==`.
    ///
    /// A bare `{% if path %}` compares against `"true"`.
    pub right_literal: String,
    /// Rendered when the condition holds.
    pub then_branch: Vec<Node>,
    /// Rendered otherwise, when present.
    pub else_branch: Option<Vec<Node>>,
    pub span: Span,
}

/// For loop over an array.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    /// Path of the array to iterate.
    pub source: VariableRef,
    /// Name each element is bound to while the body renders.
    pub binding: String,
    pub body: Vec<Node>,
    pub span: Span,
}

/// A reference to a location in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableRef {
    /// Path components (e.g., `["employee", "salary"]` for `employee.salary`).
    pub path: Vec<String>,
    /// Source location of this reference.
    pub span: Span,
}

impl VariableRef {
    /// Create a reference to `path`.
    pub fn new(path: Vec<String>, span: Span) -> Self {
        Self { path, span }
    }

    /// The path joined with dots, as shown in diagnostics.
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for VariableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}
