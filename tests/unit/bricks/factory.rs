use super::*;

#[test]
fn standard_registry_covers_all_families() {
    let f = BrickFactory::standard();
    for symbol in "nNpPlLhHz01=23456789xX|udiI .fmMcsa[:]b".chars() {
        assert!(f.contains(symbol), "missing '{symbol}'");
    }
    assert!(!f.contains('q'));
}

#[test]
fn every_symbol_declares_a_period() {
    let f = BrickFactory::standard();
    for symbol in f.symbols() {
        assert!(
            f.params(symbol).iter().any(|(p, _)| *p == Param::Period),
            "'{symbol}' has no period"
        );
    }
}

#[test]
fn tags_drive_families() {
    let f = BrickFactory::standard();
    assert!(f.has_tag('p', Tag::Clock));
    assert!(f.has_tag('l', Tag::Clock));
    assert!(!f.has_tag('z', Tag::Clock));
    assert!(f.has_tag('x', Tag::Data));
    assert!(f.has_tag('|', Tag::Repeat));
    assert!(f.has_tag('c', Tag::Analogue));
    assert!(f.has_tag('b', Tag::Register));
    assert!(!f.has_tag('?', Tag::Data));
}

#[test]
fn parameter_union_keeps_first_default() {
    let params = BrickFactory::standard().get_parameters();
    assert_eq!(params.len(), Param::ALL.len());
    assert_eq!(params[&Param::DutyCycle], ParamValue::Number(0.5));
}

#[test]
fn unknown_symbol_is_reported() {
    let err = BrickFactory::standard()
        .create('?', &BrickArgs::default())
        .unwrap_err();
    assert!(matches!(err, UndulateError::UnknownSymbol { symbol: '?', .. }));
}

#[test]
fn custom_registration_replaces_symbol() {
    fn flat(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
        Ok(Brick::new(symbol, args))
    }
    let mut f = BrickFactory::standard();
    f.register('p', SymbolSpec::new(flat).param(Param::Period, ParamValue::Number(1.0)));
    assert!(f.create('p', &BrickArgs::default()).unwrap().is_blank());
    assert!(!f.has_tag('p', Tag::Clock));
}

#[test]
fn apply_converts_values() {
    let mut args = BrickArgs::default();
    Param::Data.apply(&ParamValue::Number(12.0), &mut args).unwrap();
    assert_eq!(args.digital.data, "12");
    Param::Slewing
        .apply(&ParamValue::Text(" 2.5".to_owned()), &mut args)
        .unwrap();
    assert_eq!(args.slewing, 2.5);
    Param::Equation
        .apply(&ParamValue::Text("VDDA/2".to_owned()), &mut args)
        .unwrap();
    assert_eq!(args.analogue.equation, Equation::Expr("VDDA/2".to_owned()));
    Param::Attribute
        .apply(&ParamValue::Text("RO".to_owned()), &mut args)
        .unwrap();
    assert_eq!(args.field.attributes, vec!["RO".to_owned()]);
    assert!(
        Param::Period
            .apply(&ParamValue::Text("abc".to_owned()), &mut args)
            .is_err()
    );
}

#[test]
fn plural_keys() {
    assert_eq!(Param::Data.plural_key(), "data");
    assert_eq!(Param::DutyCycle.plural_key(), "duty_cycles");
    assert_eq!(Param::ScaleWidth.key(), "scale_width");
}
