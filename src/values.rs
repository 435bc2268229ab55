//! Geometric and identifier value types with their own atomic wire encoding.

use std::fmt;
use std::ops;

use crate::error::{CadwireError, Result};
use crate::symbol::is_bareword;

/// A plain 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Standard counter-clockwise rotation by degrees.
    pub fn rotate(self, angle: f64) -> Vec2 {
        if angle == 0.0 {
            return self;
        }
        let (s, c) = angle.to_radians().sin_cos();
        Vec2::new(c * self.x - s * self.y, s * self.x + c * self.y)
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Negates y only. A quirk of the target format's two vertical
    /// conventions, not a general transform.
    pub fn flip_y(self) -> Vec2 {
        Vec2::new(self.x, -self.y)
    }
}

impl ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl From<Pos2> for Vec2 {
    fn from(pos: Pos2) -> Vec2 {
        Vec2::new(pos.x, pos.y)
    }
}

/// A 2D position plus a rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pos2 {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Pos2 {
    pub const fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    pub const fn xy(x: f64, y: f64) -> Self {
        Self { x, y, r: 0.0 }
    }

    /// Rotates the offset and adds the angle to the rotation.
    pub fn rotate(self, angle: f64) -> Pos2 {
        if angle == 0.0 {
            return self;
        }
        let v = Vec2::from(self).rotate(angle);
        Pos2::new(v.x, v.y, self.r + angle)
    }

    pub fn set_rotation(self, r: f64) -> Pos2 {
        Pos2::new(self.x, self.y, r)
    }

    pub fn add_rotation(self, r: f64) -> Pos2 {
        Pos2::new(self.x, self.y, self.r + r)
    }

    pub fn flip_y(self) -> Pos2 {
        Pos2::new(self.x, -self.y, self.r)
    }

    pub fn length(self) -> f64 {
        Vec2::from(self).length()
    }

    /// Maps `other` out of this position's local frame: rotates the offset
    /// by this rotation, translates, and sums rotations. This is the
    /// operation the parent chain applies to coordinate-transform
    /// attributes at serialization time.
    pub fn compose(self, other: Pos2) -> Pos2 {
        let v = Vec2::from(other).rotate(self.r);
        Pos2::new(self.x + v.x, self.y + v.y, self.r + other.r)
    }
}

impl From<Vec2> for Pos2 {
    fn from(v: Vec2) -> Pos2 {
        Pos2::xy(v.x, v.y)
    }
}

impl ops::Add<Pos2> for Pos2 {
    type Output = Pos2;
    fn add(self, other: Pos2) -> Pos2 {
        self.compose(other)
    }
}

impl ops::Neg for Pos2 {
    type Output = Pos2;
    fn neg(self) -> Pos2 {
        Pos2::new(-self.x, -self.y, -self.r)
    }
}

impl ops::Sub<Pos2> for Pos2 {
    type Output = Pos2;
    fn sub(self, other: Pos2) -> Pos2 {
        self.compose(-other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Color with floating point channels, serialized as four bare numbers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// A unique identifier attribute (`tstamp` and friends). `Default` rolls a
/// fresh v4 uuid, and cloning an entity through the tree regenerates these
/// so clones are not mistaken for the same design object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uuid(String);

impl Uuid {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wraps a caller-supplied identifier. The text must fit the bareword
    /// grammar, so every held value is guaranteed to serialize.
    pub fn from_value(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if !is_bareword(&value) {
            return Err(CadwireError::InvalidSymbol(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl Default for Uuid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declares a closed symbol enumeration with an `Unrecognized` fallback, so
/// documents written by a newer schema still parse and round-trip.
#[macro_export]
macro_rules! symbol_enum {
    ($(#[$meta:meta])* $vis:vis enum $Name:ident { $($(#[$vmeta:meta])* $Variant:ident = $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        $vis enum $Name {
            $($(#[$vmeta])* $Variant,)+
            /// A symbol outside the known set, preserved as read. Holding
            /// an interned handle keeps construction validated, so
            /// serialization never fails.
            Unrecognized($crate::symbol::Symbol),
        }

        impl $Name {
            pub fn symbol(&self) -> String {
                match self {
                    $(Self::$Variant => $text.to_owned(),)+
                    Self::Unrecognized(sym) => sym.name(),
                }
            }

            pub fn from_symbol(text: &str) -> $crate::error::Result<Self> {
                Ok(match text {
                    $($text => Self::$Variant,)+
                    other => Self::Unrecognized($crate::symbol::Symbol::new(other)?),
                })
            }
        }

        impl $crate::attr::WireValue for $Name {
            fn encode(&self) -> Vec<$crate::sexpr::SExpr> {
                let sym = match self {
                    $(Self::$Variant => $crate::symbol::SYMBOLS
                        .intern($text)
                        .expect("declared enum symbols are valid barewords"),)+
                    Self::Unrecognized(sym) => *sym,
                };
                vec![$crate::sexpr::SExpr::Sym(sym)]
            }

            fn decode(exprs: &[$crate::sexpr::SExpr]) -> $crate::error::Result<Self> {
                let sym = exprs
                    .first()
                    .and_then($crate::sexpr::SExpr::as_sym)
                    .ok_or_else(|| {
                        $crate::error::CadwireError::structure(concat!(
                            "expected a symbol for ",
                            stringify!($Name)
                        ))
                    })?;
                Self::from_symbol(&sym.name())
            }
        }
    };
}
