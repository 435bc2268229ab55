//! Common design-file schemas shared by every document kind: page setup,
//! text styling, stroke and fill definitions, point lists, and the
//! transparent grouping containers that feed coordinate composition.
//!
//! These also serve as the reference declarations for the descriptor
//! engine; between them they exercise positionals, optionals, every boolean
//! spelling, nested entity attributes and transparent frames.

use std::marker::PhantomData;

use crate::attr::{AttributeMeta, BoolKind, WireValue};
use crate::error::{CadwireError, Result};
use crate::node::{child_spec, entity_from_sexpr, entity_to_sexpr, ChildSpec, Entity, NodeId, Tree};
use crate::sexpr::SExpr;
use crate::symbol_enum;
use crate::values::{Pos2, Rgba, Vec2};

symbol_enum! {
    /// The tool that wrote a document, recorded in file headers.
    pub enum Generator {
        PcbNew = "pcbnew",
        EeSchema = "eeschema",
        KicadSymbolEditor = "kicad_symbol_editor",
        Cadwire = "cadwire",
    }
}

symbol_enum! {
    pub enum PaperSize {
        A0 = "A0",
        A1 = "A1",
        A2 = "A2",
        A3 = "A3",
        A4 = "A4",
        A5 = "A5",
        A = "A",
        B = "B",
        C = "C",
        D = "D",
        E = "E",
    }
}

/// Page dimensions: either an explicit width and height in millimeters, or
/// a standard paper size, never both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSettings {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub paper_size: Option<PaperSize>,
    pub unknown: Vec<SExpr>,
}

impl PageSettings {
    pub fn with_paper_size(paper_size: PaperSize) -> Self {
        Self {
            paper_size: Some(paper_size),
            ..Self::default()
        }
    }

    pub fn with_dimensions(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }
}

impl Entity for PageSettings {
    const TAG: Option<&'static str> = Some("paper");

    fn attributes() -> Vec<AttributeMeta<Self>> {
        vec![
            AttributeMeta::value(
                "width",
                |n: &Self| n.width.map(|v| v.encode()),
                |n, e| {
                    n.width = Some(f64::decode(e)?);
                    Ok(())
                },
            )
            .positional()
            .optional(),
            AttributeMeta::value(
                "height",
                |n: &Self| n.height.map(|v| v.encode()),
                |n, e| {
                    n.height = Some(f64::decode(e)?);
                    Ok(())
                },
            )
            .positional()
            .optional(),
            AttributeMeta::value(
                "paper_size",
                |n: &Self| n.paper_size.as_ref().map(WireValue::encode),
                |n, e| {
                    n.paper_size = Some(PaperSize::decode(e)?);
                    Ok(())
                },
            )
            .positional()
            .optional(),
        ]
    }

    fn validate(&self) -> Result<()> {
        let explicit = self.width.is_some() && self.height.is_some() && self.paper_size.is_none();
        let standard = self.width.is_none() && self.height.is_none() && self.paper_size.is_some();
        if explicit || standard {
            Ok(())
        } else {
            Err(CadwireError::validation(
                "PageSettings must define either width and height, or paper_size, but not both",
            ))
        }
    }

    fn unknown(&self) -> &[SExpr] {
        &self.unknown
    }
    fn unknown_mut(&mut self) -> &mut Vec<SExpr> {
        &mut self.unknown
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub face: Option<String>,
    pub size: Vec2,
    pub thickness: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub line_spacing: Option<f64>,
    pub unknown: Vec<SExpr>,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            face: None,
            size: Vec2::new(1.27, 1.27),
            thickness: None,
            bold: false,
            italic: false,
            line_spacing: None,
            unknown: Vec::new(),
        }
    }
}

impl Entity for Font {
    const TAG: Option<&'static str> = Some("font");

    fn attributes() -> Vec<AttributeMeta<Self>> {
        vec![
            AttributeMeta::value(
                "face",
                |n: &Self| n.face.as_ref().map(WireValue::encode),
                |n, e| {
                    n.face = Some(String::decode(e)?);
                    Ok(())
                },
            )
            .optional(),
            AttributeMeta::value(
                "size",
                |n: &Self| Some(n.size.encode()),
                |n, e| {
                    n.size = Vec2::decode(e)?;
                    Ok(())
                },
            ),
            AttributeMeta::value(
                "thickness",
                |n: &Self| n.thickness.map(|v| v.encode()),
                |n, e| {
                    n.thickness = Some(f64::decode(e)?);
                    Ok(())
                },
            )
            .optional(),
            AttributeMeta::boolean(
                "bold",
                BoolKind::Symbol,
                |n: &Self| n.bold,
                |n, v| n.bold = v,
            ),
            AttributeMeta::boolean(
                "italic",
                BoolKind::Symbol,
                |n: &Self| n.italic,
                |n, v| n.italic = v,
            ),
            AttributeMeta::value(
                "line_spacing",
                |n: &Self| n.line_spacing.map(|v| v.encode()),
                |n, e| {
                    n.line_spacing = Some(f64::decode(e)?);
                    Ok(())
                },
            )
            .optional(),
        ]
    }

    fn unknown(&self) -> &[SExpr] {
        &self.unknown
    }
    fn unknown_mut(&mut self) -> &mut Vec<SExpr> {
        &mut self.unknown
    }
}

/// Text anchoring flags. Horizontal and vertical centering are the absence
/// of the respective flags, so an all-false value is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextJustify {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
    pub mirror: bool,
}

impl WireValue for TextJustify {
    fn encode(&self) -> Vec<SExpr> {
        let mut out = Vec::new();
        let mut push = |name: &str| {
            out.push(SExpr::Sym(
                crate::symbol::SYMBOLS
                    .intern(name)
                    .expect("justify flags are valid barewords"),
            ))
        };
        if self.left {
            push("left");
        } else if self.right {
            push("right");
        }
        if self.top {
            push("top");
        } else if self.bottom {
            push("bottom");
        }
        if self.mirror {
            push("mirror");
        }
        out
    }

    fn decode(exprs: &[SExpr]) -> Result<TextJustify> {
        let mut justify = TextJustify::default();
        for e in exprs {
            let sym = e
                .as_sym()
                .ok_or_else(|| CadwireError::structure("expected a symbol in a justify list"))?;
            match sym.name().as_str() {
                "left" => justify.left = true,
                "right" => justify.right = true,
                "top" => justify.top = true,
                "bottom" => justify.bottom = true,
                "mirror" => justify.mirror = true,
                other => {
                    return Err(CadwireError::structure(format!(
                        "unknown justify flag '{}'",
                        other
                    )))
                }
            }
        }
        Ok(justify)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextEffects {
    pub font: Font,
    pub justify: Option<TextJustify>,
    pub hide: bool,
    pub unknown: Vec<SExpr>,
}

impl Entity for TextEffects {
    const TAG: Option<&'static str> = Some("effects");

    fn attributes() -> Vec<AttributeMeta<Self>> {
        vec![
            AttributeMeta::child(
                "font",
                |n: &Self| entity_to_sexpr(&n.font).map(Some),
                |n, e| {
                    n.font = entity_from_sexpr(e)?;
                    Ok(())
                },
            ),
            AttributeMeta::value(
                "justify",
                |n: &Self| n.justify.map(|j| j.encode()),
                |n, e| {
                    n.justify = Some(TextJustify::decode(e)?);
                    Ok(())
                },
            )
            .optional(),
            AttributeMeta::boolean(
                "hide",
                BoolKind::Symbol,
                |n: &Self| n.hide,
                |n, v| n.hide = v,
            ),
        ]
    }

    fn unknown(&self) -> &[SExpr] {
        &self.unknown
    }
    fn unknown_mut(&mut self) -> &mut Vec<SExpr> {
        &mut self.unknown
    }
}

symbol_enum! {
    pub enum StrokeType {
        Default = "default",
        Dash = "dash",
        DashDot = "dash_dot",
        DashDotDot = "dash_dot_dot",
        Dot = "dot",
        Solid = "solid",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    pub width: f64,
    pub kind: StrokeType,
    pub color: Option<Rgba>,
    pub unknown: Vec<SExpr>,
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self {
            width: 0.0,
            kind: StrokeType::Default,
            color: None,
            unknown: Vec::new(),
        }
    }
}

impl Entity for StrokeDefinition {
    const TAG: Option<&'static str> = Some("stroke");

    fn attributes() -> Vec<AttributeMeta<Self>> {
        vec![
            AttributeMeta::value(
                "width",
                |n: &Self| Some(n.width.encode()),
                |n, e| {
                    n.width = f64::decode(e)?;
                    Ok(())
                },
            ),
            AttributeMeta::value(
                "type",
                |n: &Self| Some(n.kind.encode()),
                |n, e| {
                    n.kind = StrokeType::decode(e)?;
                    Ok(())
                },
            ),
            AttributeMeta::value(
                "color",
                |n: &Self| n.color.map(|c| c.encode()),
                |n, e| {
                    n.color = Some(Rgba::decode(e)?);
                    Ok(())
                },
            )
            .optional(),
        ]
    }

    fn unknown(&self) -> &[SExpr] {
        &self.unknown
    }
    fn unknown_mut(&mut self) -> &mut Vec<SExpr> {
        &mut self.unknown
    }
}

symbol_enum! {
    pub enum FillType {
        None = "none",
        Outline = "outline",
        Background = "background",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillDefinition {
    pub kind: FillType,
    pub unknown: Vec<SExpr>,
}

impl Default for FillDefinition {
    fn default() -> Self {
        Self {
            kind: FillType::None,
            unknown: Vec::new(),
        }
    }
}

impl Entity for FillDefinition {
    const TAG: Option<&'static str> = Some("fill");

    fn attributes() -> Vec<AttributeMeta<Self>> {
        vec![AttributeMeta::value(
            "type",
            |n: &Self| Some(n.kind.encode()),
            |n, e| {
                n.kind = FillType::decode(e)?;
                Ok(())
            },
        )]
    }

    fn unknown(&self) -> &[SExpr] {
        &self.unknown
    }
    fn unknown_mut(&mut self) -> &mut Vec<SExpr> {
        &mut self.unknown
    }
}

/// One vertex of an outline, `(xy x y)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinatePoint {
    pub x: f64,
    pub y: f64,
    pub unknown: Vec<SExpr>,
}

impl CoordinatePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            unknown: Vec::new(),
        }
    }
}

impl From<Vec2> for CoordinatePoint {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl Entity for CoordinatePoint {
    const TAG: Option<&'static str> = Some("xy");

    fn attributes() -> Vec<AttributeMeta<Self>> {
        vec![
            AttributeMeta::value(
                "x",
                |n: &Self| Some(n.x.encode()),
                |n, e| {
                    n.x = f64::decode(e)?;
                    Ok(())
                },
            )
            .positional(),
            AttributeMeta::value(
                "y",
                |n: &Self| Some(n.y.encode()),
                |n, e| {
                    n.y = f64::decode(e)?;
                    Ok(())
                },
            )
            .positional(),
        ]
    }

    fn unknown(&self) -> &[SExpr] {
        &self.unknown
    }
    fn unknown_mut(&mut self) -> &mut Vec<SExpr> {
        &mut self.unknown
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinatePointList {
    pub unknown: Vec<SExpr>,
}

impl CoordinatePointList {
    /// Inserts a `pts` list filled from the given vertices and returns its
    /// handle.
    pub fn insert_with(tree: &mut Tree, points: impl IntoIterator<Item = Vec2>) -> Result<NodeId> {
        let list = tree.insert(CoordinatePointList::default());
        for p in points {
            tree.append_new(list, CoordinatePoint::from(p))?;
        }
        Ok(list)
    }
}

impl Entity for CoordinatePointList {
    const TAG: Option<&'static str> = Some("pts");

    fn attributes() -> Vec<AttributeMeta<Self>> {
        Vec::new()
    }

    fn child_specs() -> Vec<ChildSpec> {
        vec![child_spec::<CoordinatePoint>()]
    }

    fn unknown(&self) -> &[SExpr] {
        &self.unknown
    }
    fn unknown_mut(&mut self) -> &mut Vec<SExpr> {
        &mut self.unknown
    }
}

/// Transparent grouping container that places its children at an anchor
/// position. Absent from emitted output; the anchor only shows up folded
/// into descendants' exported positions. The type parameter names the one
/// tagged child type the group accepts, besides nested groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform<C: Entity> {
    pub at: Pos2,
    pub unknown: Vec<SExpr>,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Entity> Transform<C> {
    pub fn new(at: Pos2) -> Self {
        Self {
            at,
            unknown: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl<C: Entity> Default for Transform<C> {
    fn default() -> Self {
        Self::new(Pos2::default())
    }
}

impl<C: Entity> Entity for Transform<C> {
    const TAG: Option<&'static str> = None;

    fn attributes() -> Vec<AttributeMeta<Self>> {
        Vec::new()
    }

    fn child_specs() -> Vec<ChildSpec> {
        vec![
            child_spec::<C>(),
            child_spec::<Transform<C>>(),
            child_spec::<Rotate<C>>(),
        ]
    }

    fn frame(&self) -> Option<Pos2> {
        Some(self.at)
    }

    fn unknown(&self) -> &[SExpr] {
        &self.unknown
    }
    fn unknown_mut(&mut self) -> &mut Vec<SExpr> {
        &mut self.unknown
    }
}

/// Transparent grouping container that rotates its children about the
/// local origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotate<C: Entity> {
    pub angle: f64,
    pub unknown: Vec<SExpr>,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Entity> Rotate<C> {
    pub fn new(angle: f64) -> Self {
        Self {
            angle,
            unknown: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl<C: Entity> Default for Rotate<C> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<C: Entity> Entity for Rotate<C> {
    const TAG: Option<&'static str> = None;

    fn attributes() -> Vec<AttributeMeta<Self>> {
        Vec::new()
    }

    fn child_specs() -> Vec<ChildSpec> {
        vec![
            child_spec::<C>(),
            child_spec::<Transform<C>>(),
            child_spec::<Rotate<C>>(),
        ]
    }

    fn frame(&self) -> Option<Pos2> {
        Some(Pos2::new(0.0, 0.0, self.angle))
    }

    fn unknown(&self) -> &[SExpr] {
        &self.unknown
    }
    fn unknown_mut(&mut self) -> &mut Vec<SExpr> {
        &mut self.unknown
    }
}
