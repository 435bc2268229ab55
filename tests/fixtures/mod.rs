//! Schematic-flavored entity declarations shared by the integration tests.
#![allow(dead_code)]

use cadwire::attr::{AttributeMeta, BoolKind, WireValue};
use cadwire::common::{
    CoordinatePointList, Generator, PageSettings, Rotate, TextEffects, Transform,
};
use cadwire::node::{child_spec, entity_from_sexpr, entity_to_sexpr, ChildSpec, Entity};
use cadwire::sexpr::SExpr;
use cadwire::values::{Pos2, Uuid};

/// Installs a subscriber once, so `RUST_LOG=cadwire=trace` surfaces engine
/// events during test runs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A positioned leaf entity with an identifier attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Junction {
    pub at: Pos2,
    pub diameter: f64,
    pub tstamp: Option<Uuid>,
    pub locked: bool,
    pub unknown: Vec<SExpr>,
}

impl Junction {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            at: Pos2::xy(x, y),
            ..Self::default()
        }
    }
}

impl Entity for Junction {
    const TAG: Option<&'static str> = Some("junction");

    fn attributes() -> Vec<AttributeMeta<Self>> {
        vec![
            AttributeMeta::transform(
                "at",
                |n: &Self| Some(n.at),
                |n, e| {
                    n.at = Pos2::decode(e)?;
                    Ok(())
                },
            ),
            AttributeMeta::value(
                "diameter",
                |n: &Self| Some(n.diameter.encode()),
                |n, e| {
                    n.diameter = f64::decode(e)?;
                    Ok(())
                },
            ),
            AttributeMeta::id(
                "tstamp",
                |n: &Self| n.tstamp.clone(),
                |n, v| n.tstamp = Some(v),
            )
            .optional(),
            AttributeMeta::boolean(
                "locked",
                BoolKind::Symbol,
                |n: &Self| n.locked,
                |n, v| n.locked = v,
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

/// A text-bearing leaf exercising positionals, nested entity attributes
/// and the remaining boolean spellings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Label {
    pub text: String,
    pub effects: Option<TextEffects>,
    pub autoplaced: bool,
    pub hidden: bool,
    pub unknown: Vec<SExpr>,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl Entity for Label {
    const TAG: Option<&'static str> = Some("label");

    fn attributes() -> Vec<AttributeMeta<Self>> {
        vec![
            AttributeMeta::value(
                "text",
                |n: &Self| Some(n.text.encode()),
                |n, e| {
                    n.text = String::decode(e)?;
                    Ok(())
                },
            )
            .positional(),
            AttributeMeta::child(
                "effects",
                |n: &Self| n.effects.as_ref().map(entity_to_sexpr).transpose(),
                |n, e| {
                    n.effects = Some(entity_from_sexpr(e)?);
                    Ok(())
                },
            )
            .optional(),
            AttributeMeta::boolean(
                "fields_autoplaced",
                BoolKind::SymbolInList,
                |n: &Self| n.autoplaced,
                |n, v| n.autoplaced = v,
            ),
            AttributeMeta::boolean(
                "hide",
                BoolKind::YesNo,
                |n: &Self| n.hidden,
                |n, v| n.hidden = v,
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

/// A leaf whose descriptor table is declared in deliberately scrambled
/// order: the named attribute first, then the positionals reversed, with
/// `ORDER` restoring `start` before `end`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub width: f64,
    pub unknown: Vec<SExpr>,
}

impl Entity for Segment {
    const TAG: Option<&'static str> = Some("segment");
    const ORDER: &'static [&'static str] = &["start", "end"];

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
                "end",
                |n: &Self| Some(n.end.encode()),
                |n, e| {
                    n.end = f64::decode(e)?;
                    Ok(())
                },
            )
            .positional(),
            AttributeMeta::value(
                "start",
                |n: &Self| Some(n.start.encode()),
                |n, e| {
                    n.start = f64::decode(e)?;
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

/// The document root used in tests: a container with a required attribute
/// and a closed set of child types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub version: i64,
    pub generator: Option<Generator>,
    pub unknown: Vec<SExpr>,
}

impl Sheet {
    pub fn v(version: i64) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }
}

impl Entity for Sheet {
    const TAG: Option<&'static str> = Some("sheet");

    fn attributes() -> Vec<AttributeMeta<Self>> {
        vec![
            AttributeMeta::value(
                "version",
                |n: &Self| Some(n.version.encode()),
                |n, e| {
                    n.version = i64::decode(e)?;
                    Ok(())
                },
            ),
            AttributeMeta::value(
                "generator",
                |n: &Self| n.generator.as_ref().map(WireValue::encode),
                |n, e| {
                    n.generator = Some(Generator::decode(e)?);
                    Ok(())
                },
            )
            .optional(),
        ]
    }

    fn child_specs() -> Vec<ChildSpec> {
        vec![
            child_spec::<Junction>(),
            child_spec::<Label>(),
            child_spec::<PageSettings>(),
            child_spec::<CoordinatePointList>(),
            child_spec::<Transform<Junction>>(),
            child_spec::<Rotate<Junction>>(),
        ]
    }

    fn unknown(&self) -> &[SExpr] {
        &self.unknown
    }
    fn unknown_mut(&mut self) -> &mut Vec<SExpr> {
        &mut self.unknown
    }
}
