use cadwire::error::CadwireError;
use cadwire::parser;
use cadwire::printer;
use cadwire::symbol::{is_bareword, Symbol, SymbolTable, SYMBOLS};

#[test]
fn interning_dedupes() {
    let a = Symbol::new("layer").unwrap();
    let b = Symbol::new("layer").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.name(), "layer");
}

#[test]
fn bareword_grammar() {
    assert!(is_bareword("kicad_sch"));
    assert!(is_bareword("F.Cu"));
    assert!(is_bareword("*.Cu"));
    assert!(is_bareword("-12abc"));
    assert!(!is_bareword(""));
    assert!(!is_bareword("has space"));
    assert!(!is_bareword("quote\"inside"));
    assert!(!is_bareword("tilde~"));
}

#[test]
fn invalid_symbols_are_rejected() {
    let err = SYMBOLS.intern("not a bareword").unwrap_err();
    match err {
        CadwireError::InvalidSymbol(text) => assert_eq!(text, "not a bareword"),
        other => panic!("expected an invalid-symbol error, got {other}"),
    }
}

#[test]
fn an_owned_table_is_isolated() {
    let table = SymbolTable::new();
    assert!(table.is_empty());

    let expr = parser::parse_in("(only_in_this_table 1)", &table).unwrap();
    assert_eq!(table.len(), 1);

    // handles resolve against the table that interned them
    let head = expr.head().unwrap();
    assert_eq!(table.resolve(head), "only_in_this_table");

    // and serialization against the same table reproduces the text
    let out = printer::serialize_in(&expr, &table, printer::DEFAULT_WIDTH, false);
    assert_eq!(out, "(only_in_this_table 1)");
}

#[test]
fn handles_are_dense_per_table() {
    let table = SymbolTable::new();
    table.intern("a").unwrap();
    table.intern("b").unwrap();
    table.intern("a").unwrap();
    assert_eq!(table.len(), 2, "re-interning must not grow the table");
}
