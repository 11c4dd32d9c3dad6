use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn numbers_keywords_and_operators() {
    assert_eq!(
        kinds("1.5e2 ** x and not True"),
        vec![
            TokenKind::Number(150.0),
            TokenKind::StarStar,
            TokenKind::Ident("x".to_owned()),
            TokenKind::And,
            TokenKind::Not,
            TokenKind::True,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn leading_dot_number() {
    assert_eq!(kinds(".25"), vec![TokenKind::Number(0.25), TokenKind::Eof]);
}

#[test]
fn comparison_pairs_are_single_tokens() {
    assert_eq!(
        kinds("a<=b!=c"),
        vec![
            TokenKind::Ident("a".to_owned()),
            TokenKind::Le,
            TokenKind::Ident("b".to_owned()),
            TokenKind::Ne,
            TokenKind::Ident("c".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn bad_exponent_reports_offset() {
    let err = lex("3e+").unwrap_err();
    assert_eq!(err.offset, 1);
}

#[test]
fn attribute_access_is_rejected() {
    let err = lex("x.__class__").unwrap_err();
    assert!(err.message.contains("unexpected character"));
    assert_eq!(err.offset, 1);
}
