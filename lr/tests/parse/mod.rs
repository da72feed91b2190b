#![allow(dead_code)]

use grammar::Grammar;
use lr::lex::Words;
use lr::{ParseAction, ParseError, ParseTable};
use grammar::automaton::State;

pub static EXPR: &str = "
E -> T + E | T
T -> int | int * T | ( E )
";

/// SLR(1) fails on it, canonical LR(1) does not, LALR(1) merges the two
/// `e` states back into a conflict.
pub static LR1_ONLY: &str = "
S -> a E c | a F d | b F c | b E d
E -> e
F -> e
";

/// SLR(1) fails on it, LALR(1) does not.
pub static LALR: &str = "
S -> A a | b A c | d c | b d a
A -> d
";

pub static LL_EXPR: &str = "
E -> T E'
E' -> + T E' |
T -> F T'
T' -> * F T' |
F -> num | ( E )
";

pub fn init() {
  let _ = env_logger::builder().is_test(true).try_init();
}

pub fn parse(table: &ParseTable, input: &str) -> Result<String, ParseError> {
  let tree = table.parse(Words::new(table, input))?;
  Ok(tree.display(table).to_string())
}

/// Whenever some state can reduce a production and walking its right-hand
/// side from a state `t` leads there, `t` must have a goto on the
/// production's LHS.
pub fn check_gotos(grammar: &Grammar, table: &ParseTable) {
  let reduces = |state: State, prod: usize| {
    grammar.terminals().any(|t| {
      table.actions(state, t).iter()
        .any(|action| matches!(action, ParseAction::Reduce { prod: p, .. } if *p == prod))
    })
  };

  for t in 0..table.num_states() {
    let t = State(t);
    for (prod, production) in grammar.prods().iter().enumerate() {
      if prod == grammar.start_production() {
        continue;
      }

      let mut state = Some(t);
      for &sym in &production.rhs {
        state = state.and_then(|state| match table.actions(state, sym) {
          [ParseAction::Shift(to)] => Some(*to),
          _ => None,
        });
      }

      if let Some(s) = state {
        if reduces(s, prod) {
          assert!(
            matches!(table.actions(t, production.lhs), [ParseAction::Shift(_)]),
            "state {} has no goto on {} after reducing `{}`",
            t, grammar.symbol_name(production.lhs), grammar.production_text(prod));
        }
      }
    }
  }
}
