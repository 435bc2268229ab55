//! Attribute descriptors and the per-value wire codec.
//!
//! Every entity type declares a hand-written, ordered table of
//! [`AttributeMeta`] descriptors; the generic engine in `node` derives the
//! whole wire shape from those declarations alone. A descriptor names the
//! attribute, says whether it is optional, whether it is positional (and
//! how many leading atoms it consumes), how booleans are spelled, and
//! carries fn-pointer accessors into the concrete entity type.

use crate::error::{CadwireError, Result};
use crate::sexpr::SExpr;
use crate::symbol::{Symbol, SYMBOLS};
use crate::values::{Pos2, Rgba, Uuid, Vec2, Vec3};

/// How a single attribute value crosses the wire: a short run of atoms (or
/// lists) appended after the attribute's name, or standing alone for
/// positional attributes.
pub trait WireValue: Sized {
    fn encode(&self) -> Vec<SExpr>;
    fn decode(exprs: &[SExpr]) -> Result<Self>;
}

fn expect_number(exprs: &[SExpr], index: usize, what: &str) -> Result<f64> {
    exprs
        .get(index)
        .and_then(SExpr::as_f64)
        .ok_or_else(|| CadwireError::structure(format!("expected a number for {}", what)))
}

impl WireValue for f64 {
    fn encode(&self) -> Vec<SExpr> {
        vec![SExpr::Float(*self)]
    }
    fn decode(exprs: &[SExpr]) -> Result<f64> {
        expect_number(exprs, 0, "a float attribute")
    }
}

impl WireValue for i64 {
    fn encode(&self) -> Vec<SExpr> {
        vec![SExpr::Int(*self)]
    }
    fn decode(exprs: &[SExpr]) -> Result<i64> {
        exprs
            .first()
            .and_then(SExpr::as_i64)
            .ok_or_else(|| CadwireError::structure("expected an integer attribute"))
    }
}

impl WireValue for String {
    fn encode(&self) -> Vec<SExpr> {
        vec![SExpr::Str(self.clone())]
    }
    fn decode(exprs: &[SExpr]) -> Result<String> {
        exprs
            .first()
            .and_then(SExpr::as_str)
            .map(str::to_owned)
            .ok_or_else(|| CadwireError::structure("expected a string attribute"))
    }
}

impl WireValue for Symbol {
    fn encode(&self) -> Vec<SExpr> {
        vec![SExpr::Sym(*self)]
    }
    fn decode(exprs: &[SExpr]) -> Result<Symbol> {
        exprs
            .first()
            .and_then(SExpr::as_sym)
            .ok_or_else(|| CadwireError::structure("expected a symbol attribute"))
    }
}

impl WireValue for Vec2 {
    fn encode(&self) -> Vec<SExpr> {
        vec![SExpr::Float(self.x), SExpr::Float(self.y)]
    }
    fn decode(exprs: &[SExpr]) -> Result<Vec2> {
        Ok(Vec2::new(
            expect_number(exprs, 0, "Vec2 x")?,
            expect_number(exprs, 1, "Vec2 y")?,
        ))
    }
}

impl WireValue for Pos2 {
    fn encode(&self) -> Vec<SExpr> {
        vec![SExpr::Float(self.x), SExpr::Float(self.y), SExpr::Float(self.r)]
    }
    fn decode(exprs: &[SExpr]) -> Result<Pos2> {
        // the rotation is frequently omitted on the wire
        let r = match exprs.get(2) {
            Some(e) => e
                .as_f64()
                .ok_or_else(|| CadwireError::structure("expected a number for Pos2 rotation"))?,
            None => 0.0,
        };
        Ok(Pos2::new(
            expect_number(exprs, 0, "Pos2 x")?,
            expect_number(exprs, 1, "Pos2 y")?,
            r,
        ))
    }
}

impl WireValue for Vec3 {
    fn encode(&self) -> Vec<SExpr> {
        vec![SExpr::Float(self.x), SExpr::Float(self.y), SExpr::Float(self.z)]
    }
    fn decode(exprs: &[SExpr]) -> Result<Vec3> {
        Ok(Vec3::new(
            expect_number(exprs, 0, "Vec3 x")?,
            expect_number(exprs, 1, "Vec3 y")?,
            expect_number(exprs, 2, "Vec3 z")?,
        ))
    }
}

impl WireValue for Rgba {
    fn encode(&self) -> Vec<SExpr> {
        vec![
            SExpr::Float(self.r),
            SExpr::Float(self.g),
            SExpr::Float(self.b),
            SExpr::Float(self.a),
        ]
    }
    fn decode(exprs: &[SExpr]) -> Result<Rgba> {
        Ok(Rgba::new(
            expect_number(exprs, 0, "Rgba r")?,
            expect_number(exprs, 1, "Rgba g")?,
            expect_number(exprs, 2, "Rgba b")?,
            expect_number(exprs, 3, "Rgba a")?,
        ))
    }
}

impl WireValue for Uuid {
    fn encode(&self) -> Vec<SExpr> {
        // held values are validated at construction
        vec![SExpr::Sym(
            SYMBOLS
                .intern(self.value())
                .expect("identifier values fit the bareword grammar"),
        )]
    }
    fn decode(exprs: &[SExpr]) -> Result<Uuid> {
        let sym = exprs
            .first()
            .and_then(SExpr::as_sym)
            .ok_or_else(|| CadwireError::structure("expected a symbol for an identifier"))?;
        Uuid::from_value(sym.name())
    }
}

// ------------- Descriptors -------------

/// The three boolean wire spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolKind {
    /// True emits the bare attribute name, false emits nothing.
    Symbol,
    /// True emits `(name)`, false emits nothing.
    SymbolInList,
    /// Always emits `(name yes)` or `(name no)`.
    YesNo,
}

/// Typed accessors the generic engine calls through; plain fn pointers so
/// descriptor tables can live in leaked `'static` slices.
pub enum AttrAccess<N: 'static> {
    /// A value encoded through [`WireValue`]. `get` returns `None` when the
    /// attribute is unset.
    Value {
        get: fn(&N) -> Option<Vec<SExpr>>,
        set: fn(&mut N, &[SExpr]) -> Result<()>,
    },
    Bool {
        kind: BoolKind,
        get: fn(&N) -> bool,
        set: fn(&mut N, bool),
    },
    /// A position composed through the parent chain at serialization time.
    /// With `vec2` set, only x/y are emitted after composing.
    Transform {
        get: fn(&N) -> Option<Pos2>,
        set: fn(&mut N, &[SExpr]) -> Result<()>,
        vec2: bool,
    },
    /// A unique identifier, regenerated when the entity is cloned.
    Id {
        get: fn(&N) -> Option<Uuid>,
        set: fn(&mut N, Uuid),
    },
    /// A nested entity, spliced in as its own wire list.
    Child {
        get: fn(&N) -> Result<Option<SExpr>>,
        set: fn(&mut N, &SExpr) -> Result<()>,
    },
}

pub struct AttributeMeta<N: 'static> {
    pub name: &'static str,
    pub optional: bool,
    /// `Some(count)`: encoded by position, consuming `count` leading atoms.
    pub positional: Option<usize>,
    pub access: AttrAccess<N>,
}

impl<N: 'static> AttributeMeta<N> {
    pub fn value(
        name: &'static str,
        get: fn(&N) -> Option<Vec<SExpr>>,
        set: fn(&mut N, &[SExpr]) -> Result<()>,
    ) -> Self {
        Self {
            name,
            optional: false,
            positional: None,
            access: AttrAccess::Value { get, set },
        }
    }

    pub fn boolean(
        name: &'static str,
        kind: BoolKind,
        get: fn(&N) -> bool,
        set: fn(&mut N, bool),
    ) -> Self {
        Self {
            name,
            optional: true,
            positional: None,
            access: AttrAccess::Bool { kind, get, set },
        }
    }

    pub fn transform(
        name: &'static str,
        get: fn(&N) -> Option<Pos2>,
        set: fn(&mut N, &[SExpr]) -> Result<()>,
    ) -> Self {
        Self {
            name,
            optional: false,
            positional: None,
            access: AttrAccess::Transform { get, set, vec2: false },
        }
    }

    pub fn id(name: &'static str, get: fn(&N) -> Option<Uuid>, set: fn(&mut N, Uuid)) -> Self {
        Self {
            name,
            optional: false,
            positional: None,
            access: AttrAccess::Id { get, set },
        }
    }

    pub fn child(
        name: &'static str,
        get: fn(&N) -> Result<Option<SExpr>>,
        set: fn(&mut N, &SExpr) -> Result<()>,
    ) -> Self {
        Self {
            name,
            optional: false,
            positional: None,
            access: AttrAccess::Child { get, set },
        }
    }

    /// Marks the attribute positional, consuming one leading atom.
    pub fn positional(mut self) -> Self {
        self.positional = Some(1);
        self
    }

    /// Positional with an explicit leading-atom count.
    pub fn positional_n(mut self, count: usize) -> Self {
        self.positional = Some(count);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The composed transform emits x/y only (a `Vec2`-valued attribute).
    pub fn as_vec2(mut self) -> Self {
        if let AttrAccess::Transform { vec2, .. } = &mut self.access {
            *vec2 = true;
        }
        self
    }
}
