mod fixtures;

use cadwire::common::{
    FillDefinition, FillType, Generator, PageSettings, PaperSize, StrokeDefinition, StrokeType,
    TextEffects,
};
use cadwire::values::{Rgba, Uuid};
use cadwire::error::CadwireError;
use cadwire::node::Tree;
use fixtures::{Junction, Label, Segment, Sheet};

#[test]
fn leaf_encodes_in_descriptor_order() {
    let mut tree = Tree::new();
    let j = tree.insert(Junction::at(1.0, 2.0));
    assert_eq!(
        tree.serialize(j, false).unwrap(),
        "(junction (at 1.0 2.0 0.0) (diameter 0.0))"
    );
}

#[test]
fn document_round_trips() {
    fixtures::init_tracing();
    let text = "(sheet (version 20230121) (generator eeschema) \
                (junction (at 1.0 2.0 0.0) (diameter 0.5)) \
                (label \"net1\" (hide no)))";
    let mut tree = Tree::new();
    let sheet = tree.parse_as::<Sheet>(text).unwrap();

    let root = tree.get::<Sheet>(sheet).unwrap();
    assert_eq!(root.version, 20230121);
    assert_eq!(root.generator, Some(Generator::EeSchema));
    assert_eq!(tree.children(sheet).len(), 2);

    let out = tree.serialize(sheet, false).unwrap();
    // a second pass over its own output must be bit-stable
    let again = tree.parse_as::<Sheet>(&out).unwrap();
    assert_eq!(tree.serialize(again, false).unwrap(), out);
}

#[test]
fn unknown_content_is_preserved() {
    let text = "(junction (at 1.0 2.0 0.0) (diameter 0.5) (zzz 1 2) experimental)";
    let mut tree = Tree::new();
    let j = tree.parse_as::<Junction>(text).unwrap();
    assert_eq!(tree.get::<Junction>(j).unwrap().unknown.len(), 2);

    let out = tree.serialize(j, false).unwrap();
    assert!(out.contains("(zzz 1 2)"), "unknown list dropped: {out}");
    assert!(out.contains("experimental"), "unknown atom dropped: {out}");

    // visible-unknown mode marks the carried content
    let marked = tree.serialize(j, true).unwrap();
    assert!(marked.contains("(? zzz 1 2)"), "missing marker: {marked}");
    assert!(marked.contains("?experimental"), "missing marker: {marked}");
}

#[test]
fn duplicate_named_attributes_overflow_to_unknown() {
    let text = "(junction (at 1.0 2.0 0.0) (diameter 3.0) (diameter 4.0))";
    let mut tree = Tree::new();
    let j = tree.parse_as::<Junction>(text).unwrap();
    let junction = tree.get::<Junction>(j).unwrap();
    assert_eq!(junction.diameter, 3.0, "first occurrence wins");
    assert_eq!(junction.unknown.len(), 1, "second occurrence is kept");
    let out = tree.serialize(j, false).unwrap();
    assert!(out.contains("(diameter 4.0)"));
}

#[test]
fn missing_required_attribute_is_an_error() {
    let mut tree = Tree::new();
    let err = tree.parse_as::<Sheet>("(sheet)").unwrap_err();
    match err {
        CadwireError::Structure(msg) => {
            assert!(msg.contains("requires attribute 'version'"), "{msg}")
        }
        other => panic!("expected a structure error, got {other}"),
    }
}

#[test]
fn tag_mismatch_is_an_error() {
    let mut tree = Tree::new();
    let err = tree.parse_as::<Junction>("(label \"x\")").unwrap_err();
    assert!(matches!(err, CadwireError::Structure(_)), "{err}");
}

#[test]
fn missing_positional_is_an_error() {
    let mut tree = Tree::new();
    let err = tree.parse_as::<Label>("(label)").unwrap_err();
    match err {
        CadwireError::Structure(msg) => {
            assert!(msg.contains("not enough positional arguments"), "{msg}")
        }
        other => panic!("expected a structure error, got {other}"),
    }
}

#[test]
fn boolean_spellings() {
    let mut tree = Tree::new();

    // bare symbol: present means true, absent means false
    let locked = tree
        .parse_as::<Junction>("(junction (at 0.0 0.0 0.0) (diameter 0.1) locked)")
        .unwrap();
    assert!(tree.get::<Junction>(locked).unwrap().locked);
    assert!(tree.serialize(locked, false).unwrap().ends_with(" locked)"));

    // one-element list and yes/no
    let l = tree
        .parse_as::<Label>("(label \"a\" (fields_autoplaced) (hide yes))")
        .unwrap();
    let label = tree.get::<Label>(l).unwrap();
    assert!(label.autoplaced);
    assert!(label.hidden);

    // yes/no is always written out, even when false
    let plain = tree.parse_as::<Label>("(label \"b\" (hide no))").unwrap();
    let out = tree.serialize(plain, false).unwrap();
    assert_eq!(out, "(label \"b\" (hide no))");
}

#[test]
fn nested_entity_attribute_round_trips() {
    let mut tree = Tree::new();
    let mut label = Label::new("title");
    label.effects = Some(TextEffects::default());
    let id = tree.insert(label);
    let out = tree.serialize(id, false).unwrap();
    assert_eq!(
        out,
        "(label \"title\" (effects (font (size 1.27 1.27))) (hide no))"
    );

    let back = tree.parse_as::<Label>(&out).unwrap();
    let effects = tree.get::<Label>(back).unwrap().effects.clone().unwrap();
    assert_eq!(effects.font.size.x, 1.27);
    assert!(!effects.font.bold);
}

#[test]
fn page_settings_accepts_either_form() {
    let mut tree = Tree::new();

    let sized = tree.parse_as::<PageSettings>("(paper A4)").unwrap();
    assert_eq!(
        tree.get::<PageSettings>(sized).unwrap().paper_size,
        Some(PaperSize::A4)
    );

    let explicit = tree.parse_as::<PageSettings>("(paper 210.0 297.0)").unwrap();
    let page = tree.get::<PageSettings>(explicit).unwrap();
    assert_eq!(page.width, Some(210.0));
    assert_eq!(page.height, Some(297.0));
    assert_eq!(page.paper_size, None);
}

#[test]
fn page_settings_validates_exclusivity() {
    let mut tree = Tree::new();

    let both = tree.insert(PageSettings {
        width: Some(210.0),
        height: Some(297.0),
        paper_size: Some(PaperSize::A4),
        unknown: Vec::new(),
    });
    let err = tree.serialize(both, false).unwrap_err();
    assert!(matches!(err, CadwireError::Validation(_)), "{err}");

    let neither = tree.insert(PageSettings::default());
    assert!(tree.serialize(neither, false).is_err());
}

#[test]
fn positionals_lead_and_order_overrides_declaration() {
    let mut tree = Tree::new();
    let s = tree.insert(Segment {
        start: 1.0,
        end: 2.0,
        width: 3.0,
        unknown: Vec::new(),
    });
    // positionals first even though `width` is declared first, and `start`
    // before `end` per the ORDER override
    assert_eq!(
        tree.serialize(s, false).unwrap(),
        "(segment 1.0 2.0 (width 3.0))"
    );

    let back = tree.parse_as::<Segment>("(segment 4.0 5.0 (width 6.0))").unwrap();
    let segment = tree.get::<Segment>(back).unwrap();
    assert_eq!(segment.start, 4.0);
    assert_eq!(segment.end, 5.0);
    assert_eq!(segment.width, 6.0);
}

#[test]
fn stroke_and_fill_round_trip() {
    let mut tree = Tree::new();

    let s = tree
        .parse_as::<StrokeDefinition>("(stroke (width 0.12) (type dash) (color 1.0 0.0 0.0 1.0))")
        .unwrap();
    let stroke = tree.get::<StrokeDefinition>(s).unwrap();
    assert_eq!(stroke.width, 0.12);
    assert_eq!(stroke.kind, StrokeType::Dash);
    assert_eq!(stroke.color, Some(Rgba::new(1.0, 0.0, 0.0, 1.0)));
    assert_eq!(
        tree.serialize(s, false).unwrap(),
        "(stroke (width 0.12) (type dash) (color 1.0 0.0 0.0 1.0))"
    );

    let solid = tree.insert(StrokeDefinition::default());
    assert_eq!(
        tree.serialize(solid, false).unwrap(),
        "(stroke (width 0.0) (type default))"
    );

    let f = tree.parse_as::<FillDefinition>("(fill (type outline))").unwrap();
    assert_eq!(tree.get::<FillDefinition>(f).unwrap().kind, FillType::Outline);
}

#[test]
fn unrecognized_enum_symbols_survive() {
    let mut tree = Tree::new();
    let sheet = tree
        .parse_as::<Sheet>("(sheet (version 1) (generator some_future_tool))")
        .unwrap();
    let generator = tree.get::<Sheet>(sheet).unwrap().generator.clone().unwrap();
    assert_eq!(generator.symbol(), "some_future_tool");
    assert!(matches!(generator, Generator::Unrecognized(_)));
    let out = tree.serialize(sheet, false).unwrap();
    assert!(out.contains("(generator some_future_tool)"));
}

#[test]
fn identifier_values_are_validated_at_construction() {
    assert!(matches!(
        Uuid::from_value("has space").unwrap_err(),
        CadwireError::InvalidSymbol(_)
    ));
    assert!(matches!(
        Generator::from_symbol("not(a)symbol").unwrap_err(),
        CadwireError::InvalidSymbol(_)
    ));

    let mut tree = Tree::new();
    let mut junction = Junction::at(0.0, 0.0);
    junction.tstamp = Some(Uuid::from_value("my-custom-id").unwrap());
    let j = tree.insert(junction);
    let out = tree.serialize(j, false).unwrap();
    assert!(out.contains("(tstamp my-custom-id)"));
}
