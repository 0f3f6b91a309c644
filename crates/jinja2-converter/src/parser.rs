/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template parser.
//!
//! Turns template text into a sequence of [`Node`]s. The converter only
//! depends on the [`TemplateParser`] trait; [`Jinja2Parser`] is the built-in
//! implementation for the supported Jinja2 subset:
//!
//! - `{{ path }}` where a path is `name`, `a.b.c` or `a["key"]`
//! - `{% if path %}`, `{% if path == literal %}`, `{% else %}`, `{% endif %}`
//! - `{% for name in path %}`, `{% endfor %}`
//! - `{# comment #}`

use crate::ast::{Conditional, Loop, Node, Span, Substitution, Text, VariableRef};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Token, TokenKind, tokenize};

/// Right-hand side used by a bare `{% if path %}`.
const IMPLICIT_RIGHT_LITERAL: &str = "true";

/// Something that can turn template text into nodes.
///
/// Parsers may keep mutable state between calls; the converter guarantees
/// exclusive access for the duration of each call.
pub trait TemplateParser {
    fn parse(&mut self, source: &str) -> ParseResult<Vec<Node>>;
}

/// Parser for the supported Jinja2 subset.
///
/// The token buffer is kept between calls and reset at the start of each
/// parse.
#[derive(Debug, Default)]
pub struct Jinja2Parser {
    trace_parsing: bool,
    tokens: Vec<Token>,
    pos: usize,
    eof: usize,
}

/// The `{% keyword %}` tag that ended a nested sequence.
struct Closer {
    keyword: String,
    span: Span,
}

impl Jinja2Parser {
    /// Create a parser with tracing off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit every token as a `TRACE` event while parsing.
    pub fn with_trace_parsing(mut self, trace: bool) -> Self {
        self.trace_parsing = trace;
        self
    }

    /// Turn per-token tracing on or off.
    pub fn set_trace_parsing(&mut self, trace: bool) {
        self.trace_parsing = trace;
    }

    /// Whether per-token tracing is on.
    pub fn trace_parsing(&self) -> bool {
        self.trace_parsing
    }

    fn reset(&mut self, source: &str) {
        self.tokens.clear();
        self.pos = 0;
        self.eof = source.len();
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eof_span(&self) -> Span {
        self.eof..self.eof
    }

    /// Consume the next token, which must satisfy `accept`.
    fn expect<T>(
        &mut self,
        expected: &str,
        accept: impl FnOnce(&TokenKind) -> Option<T>,
    ) -> ParseResult<(T, Span)> {
        match self.peek() {
            Some(token) => match accept(&token.kind) {
                Some(value) => {
                    let span = token.span.clone();
                    self.pos += 1;
                    Ok((value, span))
                }
                None => Err(ParseError::new(
                    format!("expected {expected}, found {}", token.kind.describe()),
                    token.span.clone(),
                )),
            },
            None => Err(ParseError::new(
                format!("expected {expected}, found end of template"),
                self.eof_span(),
            )),
        }
    }

    fn expect_ident(&mut self, expected: &str) -> ParseResult<(String, Span)> {
        self.expect(expected, |kind| match kind {
            TokenKind::Ident(name) => Some(name.clone()),
            _ => None,
        })
    }

    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<Span> {
        let expected = format!("'{keyword}'");
        self.expect(&expected, |kind| match kind {
            TokenKind::Ident(name) if name == keyword => Some(()),
            _ => None,
        })
        .map(|(_, span)| span)
    }

    fn expect_kind(&mut self, wanted: TokenKind) -> ParseResult<Span> {
        let expected = wanted.describe();
        self.expect(&expected, |kind| (*kind == wanted).then_some(()))
            .map(|(_, span)| span)
    }

    /// The statement keyword of the `{%` tag at the current position.
    fn peek_keyword(&self) -> ParseResult<(String, Span)> {
        match self.tokens.get(self.pos + 1) {
            Some(Token {
                kind: TokenKind::Ident(name),
                span,
            }) => Ok((name.clone(), span.clone())),
            Some(token) => Err(ParseError::new(
                format!(
                    "expected a statement name after '{{%', found {}",
                    token.kind.describe()
                ),
                token.span.clone(),
            )),
            None => Err(ParseError::new(
                "expected a statement name after '{%', found end of template",
                self.eof_span(),
            )),
        }
    }

    /// Parse nodes until end of input or until a `{% keyword %}` tag whose
    /// keyword is in `closers`. The closing tag is consumed and returned.
    fn parse_sequence(&mut self, closers: &[&str]) -> ParseResult<(Vec<Node>, Option<Closer>)> {
        let mut nodes = Vec::new();

        while let Some(token) = self.peek() {
            match &token.kind {
                TokenKind::Text(text) => {
                    nodes.push(Node::Text(Text {
                        literal: text.clone(),
                        span: token.span.clone(),
                    }));
                    self.pos += 1;
                }
                TokenKind::VariableStart => nodes.push(self.parse_substitution()?),
                TokenKind::BlockStart => {
                    let start = token.span.start;
                    let (keyword, keyword_span) = self.peek_keyword()?;

                    if closers.contains(&keyword.as_str()) {
                        self.pos += 2;
                        let end = self.expect_kind(TokenKind::BlockEnd)?.end;
                        return Ok((
                            nodes,
                            Some(Closer {
                                keyword,
                                span: start..end,
                            }),
                        ));
                    }

                    match keyword.as_str() {
                        "if" => nodes.push(self.parse_if()?),
                        "for" => nodes.push(self.parse_for()?),
                        "else" | "endif" | "endfor" => {
                            return Err(ParseError::new(
                                format!("unexpected '{keyword}' without a matching opening block"),
                                keyword_span,
                            ));
                        }
                        _ => {
                            return Err(ParseError::new(
                                format!("unknown statement '{keyword}'"),
                                keyword_span,
                            ));
                        }
                    }
                }
                other => {
                    return Err(ParseError::new(
                        format!("unexpected {}", other.describe()),
                        token.span.clone(),
                    ));
                }
            }
        }

        Ok((nodes, None))
    }

    /// `{{ path }}`
    fn parse_substitution(&mut self) -> ParseResult<Node> {
        let start = self.expect_kind(TokenKind::VariableStart)?.start;
        let path = self.parse_path()?;
        let end = self.expect_kind(TokenKind::VariableEnd)?.end;
        Ok(Node::Substitution(Substitution {
            path,
            span: start..end,
        }))
    }

    /// `{% if path (== literal)? %} ... ({% else %} ...)? {% endif %}`
    fn parse_if(&mut self) -> ParseResult<Node> {
        let start = self.expect_kind(TokenKind::BlockStart)?.start;
        self.expect_keyword("if")?;
        let left = self.parse_path()?;

        let right_literal = if self.peek().is_some_and(|t| t.kind == TokenKind::EqEq) {
            self.pos += 1;
            self.parse_literal()?
        } else {
            IMPLICIT_RIGHT_LITERAL.to_string()
        };
        let opener = start..self.expect_kind(TokenKind::BlockEnd)?.end;

        let (then_branch, closer) = self.parse_sequence(&["else", "endif"])?;
        let closer = closer.ok_or_else(|| unclosed("if", "endif", opener.clone()))?;

        let (else_branch, end) = if closer.keyword == "else" {
            let (body, closer) = self.parse_sequence(&["endif"])?;
            let closer = closer.ok_or_else(|| unclosed("if", "endif", opener.clone()))?;
            (Some(body), closer.span.end)
        } else {
            (None, closer.span.end)
        };

        Ok(Node::Conditional(Conditional {
            left,
            right_literal,
            then_branch,
            else_branch,
            span: start..end,
        }))
    }

    /// `{% for name in path %} ... {% endfor %}`
    fn parse_for(&mut self) -> ParseResult<Node> {
        let start = self.expect_kind(TokenKind::BlockStart)?.start;
        self.expect_keyword("for")?;
        let (binding, _) = self.expect_ident("a loop variable name")?;
        self.expect_keyword("in")?;
        let source = self.parse_path()?;
        let opener = start..self.expect_kind(TokenKind::BlockEnd)?.end;

        let (body, closer) = self.parse_sequence(&["endfor"])?;
        let closer = closer.ok_or_else(|| unclosed("for", "endfor", opener))?;

        Ok(Node::Loop(Loop {
            source,
            binding,
            body,
            span: start..closer.span.end,
        }))
    }

    /// `name ( "." name | "[" (string | integer) "]" )*`
    fn parse_path(&mut self) -> ParseResult<VariableRef> {
        let (first, first_span) = self.expect_ident("a variable name")?;
        let mut path = vec![first];
        let mut end = first_span.end;

        loop {
            match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Dot) => {
                    self.pos += 1;
                    let (key, span) = self.expect_ident("a key name after '.'")?;
                    path.push(key);
                    end = span.end;
                }
                Some(TokenKind::LBracket) => {
                    self.pos += 1;
                    let (key, _) = self.expect("a string or integer key", |kind| match kind {
                        TokenKind::Str(s) => Some(s.clone()),
                        TokenKind::Int(i) => Some(i.to_string()),
                        _ => None,
                    })?;
                    path.push(key);
                    end = self.expect_kind(TokenKind::RBracket)?.end;
                }
                _ => break,
            }
        }

        Ok(VariableRef::new(path, first_span.start..end))
    }

    /// Right-hand side of `==`, in its literal (string) form.
    fn parse_literal(&mut self) -> ParseResult<String> {
        self.expect("a literal after '=='", |kind| match kind {
            TokenKind::Str(s) => Some(s.clone()),
            TokenKind::Int(i) => Some(i.to_string()),
            TokenKind::Ident(word) => Some(word.clone()),
            _ => None,
        })
        .map(|(literal, _)| literal)
    }
}

fn unclosed(statement: &str, closer: &str, opener: Span) -> ParseError {
    ParseError::new(
        format!("missing '{{% {closer} %}}' for this '{statement}' block"),
        opener,
    )
}

impl TemplateParser for Jinja2Parser {
    fn parse(&mut self, source: &str) -> ParseResult<Vec<Node>> {
        self.reset(source);
        tokenize(source, &mut self.tokens)?;

        if self.trace_parsing {
            for token in &self.tokens {
                tracing::trace!(
                    kind = ?token.kind,
                    start = token.span.start,
                    end = token.span.end,
                    "token"
                );
            }
        }

        let (nodes, _) = self.parse_sequence(&[])?;
        Ok(nodes)
    }
}
