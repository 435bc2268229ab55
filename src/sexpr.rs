//! The wire grammar value.
//!
//! An [`SExpr`] is either an atom (string, integer, float or interned
//! symbol), an ordered list of sub-expressions, or an [`SExpr::Unknown`]
//! wrapper marking content carried through for round-trip fidelity even
//! though no schema recognized it.

use std::fmt;

use crate::error::Result;
use crate::symbol::Symbol;

#[derive(Debug, Clone, PartialEq)]
pub enum SExpr {
    Sym(Symbol),
    Str(String),
    Int(i64),
    Float(f64),
    List(Vec<SExpr>),
    Unknown(Box<SExpr>),
}

impl SExpr {
    /// Interns `text` in the process-wide table and wraps it as an atom.
    pub fn sym(text: &str) -> Result<SExpr> {
        Ok(SExpr::Sym(Symbol::new(text)?))
    }

    pub fn list(items: Vec<SExpr>) -> SExpr {
        SExpr::List(items)
    }

    /// The expression with any `Unknown` wrapper peeled off.
    pub fn content(&self) -> &SExpr {
        match self {
            SExpr::Unknown(inner) => inner.content(),
            other => other,
        }
    }

    pub fn as_list(&self) -> Option<&[SExpr]> {
        match self.content() {
            SExpr::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sym(&self) -> Option<Symbol> {
        match self.content() {
            SExpr::Sym(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.content() {
            SExpr::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.content() {
            SExpr::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric atoms regardless of wire spelling; `(at 1 2.5)` mixes both.
    pub fn as_f64(&self) -> Option<f64> {
        match self.content() {
            SExpr::Int(i) => Some(*i as f64),
            SExpr::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The leading symbol of a list, if there is one.
    pub fn head(&self) -> Option<Symbol> {
        self.as_list().and_then(|items| items.first()).and_then(SExpr::as_sym)
    }

    /// True for a list of the shape `(name ...)`.
    pub fn is_named(&self, name: Symbol) -> bool {
        self.head() == Some(name)
    }
}

impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", crate::printer::serialize(self, crate::printer::DEFAULT_WIDTH, false))
    }
}
