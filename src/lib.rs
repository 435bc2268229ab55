//! Cadwire – a typed S-expression document engine for CAD design files.
//!
//! Cadwire reads, builds and writes the parenthesized wire format used by
//! KiCad-style design files. The core ideas:
//! * A [`symbol::Symbol`] is an interned bareword handle backed by a
//!   [`symbol::SymbolTable`].
//! * An [`sexpr::SExpr`] is one parsed wire value: symbol, string, number
//!   or nested list, plus an `Unknown` wrapper for round-tripped content
//!   the schema layer did not recognize.
//! * An [`node::Entity`] is a plain struct with a hand-written descriptor
//!   table ([`attr::AttributeMeta`]); the generic engine in [`node`]
//!   derives encoding, decoding, validation and container behavior from
//!   the table alone.
//! * A [`node::Tree`] is an arena owning a whole document; parents and
//!   children are [`node::NodeId`] handles, so there is no ownership cycle
//!   and detached subtrees stay addressable.
//!
//! ## Modules
//! * [`symbol`] – bareword interning.
//! * [`sexpr`] – the wire value type and its accessors.
//! * [`parser`] – logos tokenizer + recursive descent into [`sexpr::SExpr`].
//! * [`printer`] – deterministic width-aware pretty printer.
//! * [`values`] – geometric and identifier wire values (`Vec2`, `Pos2`,
//!   `Rgba`, `Uuid`) and the [`symbol_enum!`] macro.
//! * [`attr`] – attribute descriptors, boolean spellings, the
//!   [`attr::WireValue`] codec trait.
//! * [`node`] – the [`node::Entity`] trait, the [`node::Tree`] arena and
//!   the generic wire conversion.
//! * [`common`] – shared schemas (page setup, fonts, strokes, point lists)
//!   and transparent grouping containers.
//! * [`error`] – the crate-wide [`error::CadwireError`].
//!
//! ## Quick Start
//! ```
//! use cadwire::common::{PageSettings, PaperSize};
//! use cadwire::node::Tree;
//!
//! let mut tree = Tree::new();
//! let page = tree.insert(PageSettings::with_paper_size(PaperSize::A4));
//! assert_eq!(tree.serialize(page, false).unwrap(), "(paper A4)");
//!
//! let parsed = tree.parse_as::<PageSettings>("(paper 210.0 297.0)").unwrap();
//! assert_eq!(tree.get::<PageSettings>(parsed).unwrap().width, Some(210.0));
//! ```
//!
//! Output is byte-for-byte deterministic for a given document, so generated
//! files diff cleanly under version control.

pub mod attr;
pub mod common;
pub mod error;
pub mod node;
pub mod parser;
pub mod printer;
pub mod sexpr;
pub mod symbol;
pub mod values;
