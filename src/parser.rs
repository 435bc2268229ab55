//! Tokenizer and parser for wire text.
//!
//! Tokenization is a logos-derived lexer; maximal munch gives the required
//! longest-match behavior (a bareword like `1.5a` is never split at the
//! characters the numeric grammar also uses), with explicit priorities
//! breaking equal-length ties in favor of numbers. The parser keeps a stack
//! of open lists and requires the input to be exactly one balanced list.

use logos::Logos;

use crate::error::{CadwireError, Result};
use crate::sexpr::SExpr;
use crate::symbol::{SymbolTable, SYMBOLS};

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Token {
    #[token("(")]
    Open,

    #[token(")")]
    Close,

    #[regex(r"-?[0-9]+\.[0-9]+", priority = 4)]
    Float,

    #[regex(r"-?[0-9]+", priority = 3)]
    Int,

    #[regex(r"[A-Za-z0-9_*.\-]+", priority = 2)]
    Bareword,

    #[regex(r#""(\\.|[^"\\])*""#)]
    Quoted,
}

/// Decodes the backslash escapes of a quoted token (quotes still attached).
fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Parses wire text into a single root expression, interning barewords in
/// the given table.
pub fn parse_in(text: &str, table: &SymbolTable) -> Result<SExpr> {
    let mut lexer = Token::lexer(text);
    let mut stack: Vec<Vec<SExpr>> = Vec::new();
    let mut root: Option<SExpr> = None;

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        let token = token.map_err(|()| {
            if lexer.slice().starts_with('"') || text[span.start..].starts_with('"') {
                CadwireError::syntax("unterminated string", span.start)
            } else {
                CadwireError::syntax(
                    format!("unrecognized token '{}'", lexer.slice()),
                    span.start,
                )
            }
        })?;

        let atom = match token {
            Token::Open => {
                stack.push(Vec::new());
                continue;
            }
            Token::Close => {
                let done = stack
                    .pop()
                    .ok_or_else(|| CadwireError::syntax("unmatched ')'", span.start))?;
                let expr = SExpr::List(done);
                match stack.last_mut() {
                    Some(open) => {
                        open.push(expr);
                        continue;
                    }
                    None => {
                        if root.is_some() {
                            return Err(CadwireError::syntax(
                                "more than one top-level expression",
                                span.start,
                            ));
                        }
                        root = Some(expr);
                        continue;
                    }
                }
            }
            Token::Float => {
                let value: f64 = lexer.slice().parse().map_err(|_| {
                    CadwireError::syntax("malformed float literal", span.start)
                })?;
                SExpr::Float(value)
            }
            Token::Int => {
                let value: i64 = lexer.slice().parse().map_err(|_| {
                    CadwireError::syntax("integer literal out of range", span.start)
                })?;
                SExpr::Int(value)
            }
            Token::Bareword => SExpr::Sym(table.intern(lexer.slice())?),
            Token::Quoted => SExpr::Str(unescape(lexer.slice())),
        };

        match stack.last_mut() {
            Some(open) => open.push(atom),
            None => {
                return Err(CadwireError::syntax(
                    "atom outside of any list",
                    span.start,
                ));
            }
        }
    }

    if !stack.is_empty() {
        return Err(CadwireError::syntax("unmatched '('", text.len()));
    }

    let root = root.ok_or_else(|| CadwireError::syntax("expected one balanced list", 0))?;
    tracing::trace!(bytes = text.len(), "parsed wire text");
    Ok(root)
}

/// Parses with the process-wide symbol table.
pub fn parse(text: &str) -> Result<SExpr> {
    parse_in(text, &SYMBOLS)
}
