use nxbasic::lang::token::*;
use nxbasic::lang::{lex, Symbols};

#[test]
fn test_voice_words() {
    let mut symbols = Symbols::new();
    let (ln, v) = lex("10 voice.lfo.a 0,(1):VOICE.EG 1,,", &mut symbols);
    assert_eq!(ln, Some(10));
    let mut x = v.iter();
    assert_eq!(x.next(), Some(&Token::Word(Word::VoiceLfoA)));
    assert_eq!(x.next(), Some(&Token::Number(0.0)));
    assert_eq!(x.next(), Some(&Token::Comma));
    assert_eq!(x.next(), Some(&Token::LParen));
    assert_eq!(x.next(), Some(&Token::Number(1.0)));
    assert_eq!(x.next(), Some(&Token::RParen));
    assert_eq!(x.next(), Some(&Token::Colon));
    assert_eq!(x.next(), Some(&Token::Word(Word::VoiceEg)));
    assert_eq!(x.next(), Some(&Token::Number(1.0)));
    assert_eq!(x.next(), Some(&Token::Comma));
    assert_eq!(x.next(), Some(&Token::Comma));
    assert_eq!(x.next(), None);
}

#[test]
fn test_comparison_operators() {
    let mut symbols = Symbols::new();
    let (ln, v) = lex("1<=2>=3<>4", &mut symbols);
    assert_eq!(ln, Some(1));
    let mut x = v.iter();
    assert_eq!(x.next(), Some(&Token::Operator(Operator::LessEqual)));
    assert_eq!(x.next(), Some(&Token::Number(2.0)));
    assert_eq!(x.next(), Some(&Token::Operator(Operator::GreaterEqual)));
    assert_eq!(x.next(), Some(&Token::Number(3.0)));
    assert_eq!(x.next(), Some(&Token::Operator(Operator::NotEqual)));
    assert_eq!(x.next(), Some(&Token::Number(4.0)));
    assert_eq!(x.next(), None);
}

#[test]
fn test_identifiers_intern() {
    let mut symbols = Symbols::new();
    let (_, v) = lex("a=A$+a", &mut symbols);
    let a = symbols.intern("A");
    let a_string = symbols.intern("A$");
    assert_eq!(
        v,
        vec![
            Token::Ident(a),
            Token::Operator(Operator::Equal),
            Token::Ident(a_string),
            Token::Operator(Operator::Plus),
            Token::Ident(a),
        ]
    );
    assert!(a_string.is_string());
    assert_ne!(a.symbol(), a_string.symbol());
}

#[test]
fn test_remark_ends_line() {
    let mut symbols = Symbols::new();
    let (_, v) = lex(r#"? "HI" ' ? "NO""#, &mut symbols);
    assert_eq!(
        v,
        vec![Token::Word(Word::Print), Token::String("HI".into())]
    );
}

#[test]
fn test_numbers() {
    let mut symbols = Symbols::new();
    let (_, v) = lex("?1.5E3 .25", &mut symbols);
    assert_eq!(
        v,
        vec![
            Token::Word(Word::Print),
            Token::Number(1500.0),
            Token::Number(0.25)
        ]
    );
}
