//! Deterministic pretty-printer for the wire grammar.
//!
//! Rendering is two-stage: [`flatten`] turns an [`SExpr`] into a tree of
//! already-formatted text fragments, then [`format_flat`] lays the tree out
//! with width-bounded line wrapping. Output is byte-for-byte stable, which
//! the round-trip and diff-stability tests rely on.

use crate::sexpr::SExpr;
use crate::symbol::{SymbolTable, SYMBOLS};

pub const DEFAULT_WIDTH: usize = 120;

/// A flattened s-expression: only text fragments and lists remain.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatSExpr {
    Text(String),
    List(Vec<FlatSExpr>),
}

/// Single-line length of a flattened element: fragment length, or the
/// children's lengths plus one separator between each pair.
fn length(expr: &FlatSExpr) -> usize {
    match expr {
        FlatSExpr::Text(t) => t.len(),
        FlatSExpr::List(children) => {
            if children.is_empty() {
                2
            } else {
                children.iter().map(length).sum::<usize>() + children.len() - 1
            }
        }
    }
}

fn collect(out: &mut String, expr: &FlatSExpr, indent: usize, width: usize) {
    match expr {
        FlatSExpr::Text(t) => out.push_str(t),
        FlatSExpr::List(children) => {
            if children.is_empty() || length(expr) <= width {
                out.push('(');
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    collect(out, child, 0, width);
                }
                out.push(')');
            } else {
                out.push('(');
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                        for _ in 0..indent + 2 {
                            out.push(' ');
                        }
                    }
                    collect(out, child, indent + 2, width.saturating_sub(2));
                }
                out.push('\n');
                for _ in 0..indent {
                    out.push(' ');
                }
                out.push(')');
            }
        }
    }
}

/// Renders a flattened tree with the given width budget.
pub fn format_flat(expr: &FlatSExpr, width: usize) -> String {
    let mut out = String::new();
    collect(&mut out, expr, 0, width);
    out
}

/// Floats are rounded half away from zero at 1e-6 and rendered with at
/// least one fractional digit, so `1.0` stays `1.0`.
pub fn format_float(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}

/// Backslash-escapes and double-quotes a string atom.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Flattens a wire expression to text fragments, resolving symbols against
/// `table`. With `show_unknown`, content that came from an entity's unknown
/// bag gets a visible `?` marker; otherwise it renders indistinguishably
/// from recognized content.
pub fn flatten(expr: &SExpr, table: &SymbolTable, show_unknown: bool) -> FlatSExpr {
    match expr {
        SExpr::Sym(s) => FlatSExpr::Text(table.resolve(*s)),
        SExpr::Str(s) => FlatSExpr::Text(quote_string(s)),
        SExpr::Int(i) => FlatSExpr::Text(i.to_string()),
        SExpr::Float(f) => FlatSExpr::Text(format_float(*f)),
        SExpr::List(items) => {
            FlatSExpr::List(items.iter().map(|e| flatten(e, table, show_unknown)).collect())
        }
        SExpr::Unknown(inner) => {
            let flat = flatten(inner, table, show_unknown);
            if !show_unknown {
                return flat;
            }
            match flat {
                FlatSExpr::Text(t) => FlatSExpr::Text(format!("?{}", t)),
                FlatSExpr::List(mut children) => {
                    children.insert(0, FlatSExpr::Text("?".to_owned()));
                    FlatSExpr::List(children)
                }
            }
        }
    }
}

/// Serializes against an explicitly owned symbol table.
pub fn serialize_in(expr: &SExpr, table: &SymbolTable, width: usize, show_unknown: bool) -> String {
    format_flat(&flatten(expr, table, show_unknown), width)
}

/// Serializes against the process-wide symbol table.
pub fn serialize(expr: &SExpr, width: usize, show_unknown: bool) -> String {
    serialize_in(expr, &SYMBOLS, width, show_unknown)
}
