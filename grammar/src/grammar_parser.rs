//! Grammar text: one `LHS -> alt1 | alt2 | ...` per line, symbols separated
//! by whitespace. Names starting with an uppercase letter are non-terminals,
//! everything else is a terminal. An empty alternative is epsilon. Blank
//! lines and lines starting with `#` are skipped.

use crate::{Grammar, GrammarError, NameGen, Rule};

pub fn build(input: &str) -> Result<Grammar, GrammarError> {
  build_with(input, &NameGen::default())
}

pub fn build_with(input: &str, names: &NameGen) -> Result<Grammar, GrammarError> {
  let rules = parse(input, names)?;
  Grammar::new(&rules, names)
}

fn parse(input: &str, names: &NameGen) -> Result<Vec<Rule>, GrammarError> {
  let mut rules: Vec<Rule> = vec![];

  for (i, line) in input.lines().enumerate() {
    let line_no = i + 1;
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }

    let (lhs, rhs) = line.split_once("->").ok_or_else(|| GrammarError::Syntax {
      line: line_no,
      message: "expected `->`".to_owned(),
    })?;

    let mut lhs_words = lhs.split_whitespace();
    let lhs = match (lhs_words.next(), lhs_words.next()) {
      (Some(lhs), None) => lhs,
      _ => {
        return Err(GrammarError::Syntax {
          line: line_no,
          message: "expected exactly one symbol before `->`".to_owned(),
        });
      }
    };

    check_name(lhs, line_no, names)?;
    if !names.is_nonterminal(lhs) {
      return Err(GrammarError::Syntax {
        line: line_no,
        message: format!("left-hand side `{}` must start with an uppercase letter", lhs),
      });
    }

    let alts = rhs.split('|')
      .map(|alt| {
        alt.split_whitespace()
          .map(|name| check_name(name, line_no, names).map(|_| name.to_owned()))
          .collect::<Result<Vec<_>, _>>()
      })
      .collect::<Result<Vec<_>, _>>()?;

    match rules.iter_mut().find(|rule| rule.lhs == lhs) {
      Some(rule) => rule.alts.extend(alts),
      None => rules.push(Rule {
        lhs: lhs.to_owned(),
        alts,
        line: line_no,
      }),
    }
  }

  Ok(rules)
}

fn check_name(name: &str, line: usize, names: &NameGen) -> Result<(), GrammarError> {
  if name == "$" || names.is_reserved(name) {
    Err(GrammarError::ReservedName {
      line,
      name: name.to_owned(),
    })
  } else {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::SymbolId;
  use insta::assert_snapshot;
  use pretty_assertions::assert_eq;

  #[test]
  fn symbol_ids() {
    let grammar = build("
E -> T + E | T
T -> int | int * T | ( E )
    ").unwrap();

    let names = grammar.terminals()
      .chain(grammar.nonterminals())
      .map(|sym| grammar.symbol_name(sym))
      .collect::<Vec<_>>();
    assert_eq!(names, vec!["$", "+", "int", "*", "(", ")", "E", "T", "__START"]);

    assert_eq!(grammar.num_terminals(), 6);
    assert!(grammar.is_terminal(SymbolId::EOF));
    assert!(!grammar.is_terminal(grammar.symbol_id("E").unwrap()));
    assert_eq!(grammar.prods().len(), 6);
    assert_eq!(grammar.start_production(), 5);
    assert_eq!(grammar.production_text(5), "__START -> E");
    assert_eq!(grammar.production_text(3), "T -> int * T");
  }

  #[test]
  fn productions() {
    let grammar = build("
STMT -> if EXPR then STMT ELSE | id = EXPR
ELSE -> else STMT |
EXPR -> id | num
    ").unwrap();

    let text = (0..grammar.prods().len())
      .map(|prod| grammar.production_text(prod))
      .collect::<Vec<_>>()
      .join("\n");
    assert_snapshot!(text, @r###"
    STMT -> if EXPR then STMT ELSE
    STMT -> id = EXPR
    ELSE -> else STMT
    ELSE -> ε
    EXPR -> id
    EXPR -> num
    __START -> STMT
    "###);
  }

  #[test]
  fn alternatives_accumulate() {
    let grammar = build("
# comment
S -> a S

S -> |
    ").unwrap();

    let s = grammar.symbol_id("S").unwrap();
    assert_eq!(grammar.productions_of(s), &[0, 1, 2]);
    assert_eq!(grammar.production_text(1), "S -> ε");
  }

  #[test]
  fn errors() {
    assert_eq!(build("").unwrap_err(), GrammarError::Empty);
    assert_eq!(
      build("S -> a\nS a b").unwrap_err(),
      GrammarError::Syntax { line: 2, message: "expected `->`".to_owned() });
    assert!(matches!(
      build("s -> a").unwrap_err(),
      GrammarError::Syntax { line: 1, .. }));
    assert_eq!(
      build("S -> a __X").unwrap_err(),
      GrammarError::ReservedName { line: 1, name: "__X".to_owned() });
    assert_eq!(
      build("S -> a $").unwrap_err(),
      GrammarError::ReservedName { line: 1, name: "$".to_owned() });
    assert_eq!(
      build("S -> A b").unwrap_err(),
      GrammarError::UndefinedNonterminal("A".to_owned()));
    assert_eq!(
      build("S -> a\nB -> b").unwrap_err(),
      GrammarError::UnreachableNonterminal("B".to_owned()));
  }

  #[test]
  fn custom_prefix() {
    let names = NameGen::new("@");
    let grammar = build_with("S -> __x", &names).unwrap();

    assert_eq!(grammar.symbol_name(grammar.start_symbol()), "@START");
    assert!(grammar.symbol_id("__x").is_some());
  }
}
