//! Interned bareword symbols.
//!
//! The wire grammar is full of repeated barewords (`at`, `layer`, `yes`...),
//! so they are interned once into a [`SymbolTable`] and passed around as
//! small [`Symbol`] handles with O(1) equality. A process-wide table backs
//! the convenience constructors; tests and embedders that want isolation can
//! own their own table and hand it to the parser explicitly.

use std::sync::Mutex;

// bimap keeps the one-to-one mapping between bareword text and handles
use bimap::BiMap;
use lazy_static::lazy_static;

use crate::error::{CadwireError, Result};

/// Handle to an interned bareword. Only meaningful together with the table
/// that interned it; the free constructors below use the process-wide table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Interns `text` in the process-wide table.
    pub fn new(text: &str) -> Result<Symbol> {
        SYMBOLS.intern(text)
    }

    /// Resolves this symbol against the process-wide table.
    pub fn name(&self) -> String {
        SYMBOLS.resolve(*self)
    }
}

// ------------- SymbolTable -------------
#[derive(Debug)]
pub struct SymbolTable {
    // double map so lookups work from both text and handle
    kept: Mutex<BiMap<String, u32>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            kept: Mutex::new(BiMap::new()),
        }
    }

    /// Interns a bareword, returning the existing handle when the text is
    /// already known. Fails with `InvalidSymbol` if the text is empty or
    /// contains characters outside the bareword grammar.
    pub fn intern(&self, text: &str) -> Result<Symbol> {
        if !is_bareword(text) {
            return Err(CadwireError::InvalidSymbol(text.to_owned()));
        }
        let mut kept = self.kept.lock().unwrap();
        if let Some(handle) = kept.get_by_left(text) {
            return Ok(Symbol(*handle));
        }
        let handle = kept.len() as u32;
        kept.insert(text.to_owned(), handle);
        Ok(Symbol(handle))
    }

    /// The inverse of [`intern`](Self::intern). Panics when handed a symbol
    /// from a different table, which is a caller bug.
    pub fn resolve(&self, symbol: Symbol) -> String {
        self.kept
            .lock()
            .unwrap()
            .get_by_right(&symbol.0)
            .expect("symbol was not interned in this table")
            .clone()
    }

    pub fn len(&self) -> usize {
        self.kept.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Barewords are alphanumerics plus `_`, `-`, `.` and `*`.
pub fn is_bareword(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '*'))
}

lazy_static! {
    /// The process-wide symbol table, created on first use.
    pub static ref SYMBOLS: SymbolTable = SymbolTable::new();
}
