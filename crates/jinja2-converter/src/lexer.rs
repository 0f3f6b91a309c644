/*
 * lexer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template tokenizer.
//!
//! Text outside of tags becomes a single [`TokenKind::Text`] token. Inside
//! `{{ ... }}` and `{% ... %}` the lexer produces identifiers, literals and
//! punctuation. Comments (`{# ... #}`) are dropped.

use crate::ast::Span;
use crate::error::{ParseError, ParseResult};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Text(String),
    /// `{{`
    VariableStart,
    /// `}}`
    VariableEnd,
    /// `{%`
    BlockStart,
    /// `%}`
    BlockEnd,
    Ident(String),
    Str(String),
    Int(i64),
    Dot,
    LBracket,
    RBracket,
    /// `==`
    EqEq,
}

impl TokenKind {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Text(_) => "text".to_string(),
            TokenKind::VariableStart => "'{{'".to_string(),
            TokenKind::VariableEnd => "'}}'".to_string(),
            TokenKind::BlockStart => "'{%'".to_string(),
            TokenKind::BlockEnd => "'%}'".to_string(),
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Int(_) => "integer literal".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::EqEq => "'=='".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Which closing delimiter ends the tag being lexed.
#[derive(Clone, Copy)]
enum TagKind {
    Variable,
    Block,
}

impl TagKind {
    fn closer(self) -> &'static [u8] {
        match self {
            TagKind::Variable => b"}}",
            TagKind::Block => b"%}",
        }
    }

    fn end_token(self) -> TokenKind {
        match self {
            TagKind::Variable => TokenKind::VariableEnd,
            TagKind::Block => TokenKind::BlockEnd,
        }
    }
}

struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
}

/// Tokenize `source`, appending to `tokens`.
///
/// The buffer is not cleared first, so callers can reuse its allocation.
pub fn tokenize(source: &str, tokens: &mut Vec<Token>) -> ParseResult<()> {
    let mut lexer = Lexer {
        source,
        bytes: source.as_bytes(),
        pos: 0,
    };

    while lexer.pos < lexer.bytes.len() {
        let start = lexer.pos;
        match lexer.tag_opener() {
            Some(b'{') => {
                lexer.pos += 2;
                tokens.push(Token {
                    kind: TokenKind::VariableStart,
                    span: start..lexer.pos,
                });
                lexer.lex_tag(TagKind::Variable, start, tokens)?;
            }
            Some(b'%') => {
                lexer.pos += 2;
                tokens.push(Token {
                    kind: TokenKind::BlockStart,
                    span: start..lexer.pos,
                });
                lexer.lex_tag(TagKind::Block, start, tokens)?;
            }
            Some(_) => lexer.skip_comment()?,
            None => {
                let text = lexer.lex_text();
                tokens.push(Token {
                    kind: TokenKind::Text(text.to_string()),
                    span: start..lexer.pos,
                });
            }
        }
    }

    Ok(())
}

impl<'src> Lexer<'src> {
    /// If a tag opens at the current position, the byte after `{`.
    fn tag_opener(&self) -> Option<u8> {
        if self.bytes.get(self.pos) != Some(&b'{') {
            return None;
        }
        match self.bytes.get(self.pos + 1) {
            Some(&c) if matches!(c, b'{' | b'%' | b'#') => Some(c),
            _ => None,
        }
    }

    /// Consume text up to the next tag opener or end of input.
    fn lex_text(&mut self) -> &'src str {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.bytes.len() && self.tag_opener().is_none() {
            self.pos += 1;
        }
        // Tag openers are ASCII, so this always lands on a char boundary
        &self.source[start..self.pos]
    }

    fn skip_comment(&mut self) -> ParseResult<()> {
        let start = self.pos;
        self.pos += 2;
        match find(&self.bytes[self.pos..], b"#}") {
            Some(offset) => {
                self.pos += offset + 2;
                Ok(())
            }
            None => Err(ParseError::new(
                "unterminated comment, expected '#}'",
                start..self.bytes.len(),
            )),
        }
    }

    fn lex_tag(
        &mut self,
        tag: TagKind,
        tag_start: usize,
        tokens: &mut Vec<Token>,
    ) -> ParseResult<()> {
        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }

            if self.pos >= self.bytes.len() {
                let closer = String::from_utf8_lossy(tag.closer());
                return Err(ParseError::new(
                    format!("unterminated tag, expected '{closer}'"),
                    tag_start..self.bytes.len(),
                ));
            }

            let start = self.pos;
            if self.bytes[start..].starts_with(tag.closer()) {
                self.pos += 2;
                tokens.push(Token {
                    kind: tag.end_token(),
                    span: start..self.pos,
                });
                return Ok(());
            }

            let kind = self.lex_tag_token()?;
            tokens.push(Token {
                kind,
                span: start..self.pos,
            });
        }
    }

    fn lex_tag_token(&mut self) -> ParseResult<TokenKind> {
        let start = self.pos;
        let ch = self.bytes[start];

        if is_ident_start(ch) {
            while self.pos < self.bytes.len() && is_ident_continue(self.bytes[self.pos]) {
                self.pos += 1;
            }
            return Ok(TokenKind::Ident(self.source[start..self.pos].to_string()));
        }

        if ch.is_ascii_digit()
            || (ch == b'-' && self.bytes.get(start + 1).is_some_and(u8::is_ascii_digit))
        {
            return self.lex_integer();
        }

        match ch {
            b'"' | b'\'' => self.lex_string(ch),
            b'.' => {
                self.pos += 1;
                Ok(TokenKind::Dot)
            }
            b'[' => {
                self.pos += 1;
                Ok(TokenKind::LBracket)
            }
            b']' => {
                self.pos += 1;
                Ok(TokenKind::RBracket)
            }
            b'=' if self.bytes.get(start + 1) == Some(&b'=') => {
                self.pos += 2;
                Ok(TokenKind::EqEq)
            }
            _ => {
                let c = self.source[start..].chars().next().unwrap_or('?');
                Err(ParseError::new(
                    format!("unexpected character '{c}'"),
                    start..start + c.len_utf8(),
                ))
            }
        }
    }

    fn lex_integer(&mut self) -> ParseResult<TokenKind> {
        let start = self.pos;
        if self.bytes[self.pos] == b'-' {
            self.pos += 1;
        }
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        self.source[start..self.pos]
            .parse::<i64>()
            .map(TokenKind::Int)
            .map_err(|_| ParseError::new("integer literal out of range", start..self.pos))
    }

    fn lex_string(&mut self, quote: u8) -> ParseResult<TokenKind> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        let mut run_start = self.pos;

        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                c if c == quote => {
                    value.push_str(&self.source[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(TokenKind::Str(value));
                }
                b'\\' if self.pos + 1 < self.bytes.len() => {
                    value.push_str(&self.source[run_start..self.pos]);
                    match self.bytes[self.pos + 1] {
                        b'n' => value.push('\n'),
                        b't' => value.push('\t'),
                        b'\\' => value.push('\\'),
                        b'"' => value.push('"'),
                        b'\'' => value.push('\''),
                        // Unknown escapes are kept as written
                        _ => {
                            run_start = self.pos;
                            self.pos += 1;
                            continue;
                        }
                    }
                    self.pos += 2;
                    run_start = self.pos;
                }
                _ => self.pos += 1,
            }
        }

        Err(ParseError::new(
            "unterminated string literal",
            start..self.bytes.len(),
        ))
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut tokens = Vec::new();
        tokenize(source, &mut tokens).expect("source should tokenize");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.to_string())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            kinds("Hello, world!"),
            vec![TokenKind::Text("Hello, world!".to_string())]
        );
    }

    #[test]
    fn test_lone_braces_are_text() {
        assert_eq!(
            kinds("a { b } c}"),
            vec![TokenKind::Text("a { b } c}".to_string())]
        );
    }

    #[test]
    fn test_substitution() {
        assert_eq!(
            kinds("Hi {{ user.name }}!"),
            vec![
                TokenKind::Text("Hi ".to_string()),
                TokenKind::VariableStart,
                ident("user"),
                TokenKind::Dot,
                ident("name"),
                TokenKind::VariableEnd,
                TokenKind::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_block_with_comparison() {
        assert_eq!(
            kinds("{% if a == \"x\" %}"),
            vec![
                TokenKind::BlockStart,
                ident("if"),
                ident("a"),
                TokenKind::EqEq,
                TokenKind::Str("x".to_string()),
                TokenKind::BlockEnd,
            ]
        );
    }

    #[test]
    fn test_integers() {
        assert_eq!(
            kinds("{% if n == -42 %}{{ m[7] }}"),
            vec![
                TokenKind::BlockStart,
                ident("if"),
                ident("n"),
                TokenKind::EqEq,
                TokenKind::Int(-42),
                TokenKind::BlockEnd,
                TokenKind::VariableStart,
                ident("m"),
                TokenKind::LBracket,
                TokenKind::Int(7),
                TokenKind::RBracket,
                TokenKind::VariableEnd,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#"{{ a['it\'s'] }}"#)[3],
            TokenKind::Str("it's".to_string())
        );
        assert_eq!(
            kinds(r#"{{ a["x\ny\q"] }}"#)[3],
            TokenKind::Str("x\ny\\q".to_string())
        );
    }

    #[test]
    fn test_string_may_contain_closer() {
        assert_eq!(
            kinds(r#"{{ a["}}"] }}"#)[3],
            TokenKind::Str("}}".to_string())
        );
    }

    #[test]
    fn test_comment_is_dropped() {
        assert_eq!(
            kinds("a{# note {{ x }} #}b"),
            vec![
                TokenKind::Text("a".to_string()),
                TokenKind::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_spans() {
        let mut tokens = Vec::new();
        tokenize("ab{{ x }}", &mut tokens).unwrap();
        let spans: Vec<Span> = tokens.into_iter().map(|t| t.span).collect();
        assert_eq!(spans, vec![0..2, 2..4, 5..6, 7..9]);
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            kinds("grüße {{ x }}"),
            vec![
                TokenKind::Text("grüße ".to_string()),
                TokenKind::VariableStart,
                ident("x"),
                TokenKind::VariableEnd,
            ]
        );
    }

    #[test]
    fn test_unterminated_tag() {
        let mut tokens = Vec::new();
        let err = tokenize("Hello {{ name", &mut tokens).unwrap_err();
        assert_eq!(err.message, "unterminated tag, expected '}}'");
        assert_eq!(err.span, 6..13);
    }

    #[test]
    fn test_unterminated_comment() {
        let mut tokens = Vec::new();
        let err = tokenize("x {# oops", &mut tokens).unwrap_err();
        assert!(err.message.contains("unterminated comment"));
    }

    #[test]
    fn test_unterminated_string() {
        let mut tokens = Vec::new();
        let err = tokenize("{% if a == \"x %}", &mut tokens).unwrap_err();
        assert_eq!(err.message, "unterminated string literal");
    }

    #[test]
    fn test_unexpected_character() {
        let mut tokens = Vec::new();
        let err = tokenize("{{ a + b }}", &mut tokens).unwrap_err();
        assert_eq!(err.message, "unexpected character '+'");
        assert_eq!(err.span, 5..6);
    }

    #[test]
    fn test_integer_out_of_range() {
        let mut tokens = Vec::new();
        let err = tokenize("{% if a == 99999999999999999999 %}", &mut tokens).unwrap_err();
        assert_eq!(err.message, "integer literal out of range");
    }
}
