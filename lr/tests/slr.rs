use lr::{ConflictError, LexError, ParseError, ParserKind, SourceArea};
use pretty_assertions::assert_eq;

mod parse;

#[test]
fn expr() {
  parse::init();
  let grammar = grammar::build(parse::EXPR).unwrap();
  let table = lr::build(&grammar, ParserKind::Slr);

  assert!(table.is_valid());
  assert_eq!(table.is_lr0(), Some(false));
  parse::check_gotos(&grammar, &table);

  assert_eq!(
    parse::parse(&table, "int:1 + int:2 * int:3 $"),
    Ok("E[T[int 1], +, E[T[int 2, *, T[int 3]]]]".to_owned()));
  assert_eq!(
    parse::parse(&table, "( int:7 ) $"),
    Ok("E[T[(, E[T[int 7]], )]]".to_owned()));
}

#[test]
fn parse_errors() {
  let grammar = grammar::build(parse::EXPR).unwrap();
  let table = lr::build(&grammar, ParserKind::Slr);

  assert_eq!(
    parse::parse(&table, "int:1 + int:2"),
    Err(ParseError::NeedMoreTokens {
      area: Some(SourceArea { start: 8, end: 13 }),
    }));

  assert_eq!(
    parse::parse(&table, ""),
    Err(ParseError::NeedMoreTokens { area: None }));

  let err = parse::parse(&table, "int:1 int:2 $").unwrap_err();
  assert!(matches!(
    &err,
    ParseError::NotAcceptable { symbol, .. } if symbol == "int"
  ));
  assert_eq!(err.area(), Some(SourceArea { start: 6, end: 11 }));

  assert_eq!(
    parse::parse(&table, "int:1 + foo $"),
    Err(ParseError::Lex(LexError {
      message: "unknown terminal `foo`".to_owned(),
      area: SourceArea { start: 8, end: 11 },
    })));

  // the table survives failed parses
  assert!(parse::parse(&table, "int:3 $").is_ok());
}

#[test]
fn deterministic() {
  let grammar = grammar::build(parse::EXPR).unwrap();
  let table = lr::build(&grammar, ParserKind::Slr);

  for input in ["int:1 * ( int:2 + int:3 ) $", "int:1 + * $", "int:1 +"] {
    let first = parse::parse(&table, input);
    for _ in 0..3 {
      assert_eq!(parse::parse(&table, input), first);
    }
  }
}

#[test]
fn lr1_only_grammar_conflicts() {
  let grammar = grammar::build(parse::LR1_ONLY).unwrap();
  let table = lr::build(&grammar, ParserKind::Slr);

  assert!(!table.is_valid());
  assert!(table.conflicts().iter().all(|c| matches!(c, ConflictError::ReduceReduce(_))));
}

#[test]
fn lalr_grammar_conflicts() {
  let grammar = grammar::build(parse::LALR).unwrap();
  let table = lr::build(&grammar, ParserKind::Slr);

  assert!(!table.is_valid());
  assert!(table.conflicts().iter().all(|c| matches!(c, ConflictError::ShiftReduce(_))));
}

#[test]
#[should_panic(expected = "conflicting")]
fn parse_with_conflicts() {
  let grammar = grammar::build(parse::LALR).unwrap();
  let table = lr::build(&grammar, ParserKind::Slr);

  let _ = parse::parse(&table, "d c $");
}

#[test]
fn epsilon() {
  let grammar = grammar::build(parse::LL_EXPR).unwrap();
  let table = lr::build(&grammar, ParserKind::Slr);

  assert!(table.is_valid());
  parse::check_gotos(&grammar, &table);
  assert_eq!(
    parse::parse(&table, "num:1 + num:2 $"),
    Ok("E[T[F[num 1], T'[]], E'[+, T[F[num 2], T'[]], E'[]]]".to_owned()));
}
