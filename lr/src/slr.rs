use grammar::{Grammar, SymbolId};
use crate::lr0::Lr0Automaton;
use crate::table::{ParseAction, ParseTable, TableBuilder};
use crate::ParserKind;

/// SLR(1): reduce on every terminal in FOLLOW of the reduced non-terminal.
pub fn build_slr(grammar: &Grammar) -> ParseTable {
  let lr0 = Lr0Automaton::new(grammar);
  build_from_lr0(&lr0)
}

pub fn build_from_lr0(lr0: &Lr0Automaton) -> ParseTable {
  let grammar = lr0.grammar();
  let mut table = TableBuilder::new(grammar, lr0.num_states());
  let mut is_lr0 = true;

  for state in lr0.states() {
    for (&sym, &to) in lr0.transitions(state) {
      table.add(state, sym, ParseAction::Shift(to));
    }

    let num_items = lr0.items_in_state(state).count();

    for item in lr0.reductions(state) {
      if num_items > 1 {
        is_lr0 = false;
      }

      if item.prod == grammar.start_production() {
        continue;
      }

      let lhs = grammar.production(item.prod).lhs;
      for la in grammar.follow(lhs).iter() {
        table.reduce(state, SymbolId::from_index(la), item.prod);
      }
    }
  }

  table.reduce(lr0.accept_state(), SymbolId::EOF, grammar.start_production());

  table.finish(ParserKind::Slr, lr0.start_state(), Some(is_lr0), |state| lr0.state_strings(state))
}

#[cfg(test)]
mod tests {
  use super::*;
  use grammar::automaton::State;
  use insta::assert_snapshot;

  #[test]
  fn lr0_grammar() {
    let grammar = grammar::build("
S -> ( S ) | x
    ").unwrap();
    let table = build_slr(&grammar);

    assert!(table.is_valid());
    assert_eq!(table.is_lr0(), Some(true));
    assert_eq!(table.actions(State(3), SymbolId::EOF), &[ParseAction::Accept]);
  }

  #[test]
  fn needs_lookahead() {
    let grammar = grammar::build("
E -> T + E | T
T -> int
    ").unwrap();
    let table = build_slr(&grammar);

    assert!(table.is_valid());
    assert_eq!(table.is_lr0(), Some(false));
  }

  #[test]
  fn table_dump() {
    let grammar = grammar::build("
S -> C C
C -> c C | d
    ").unwrap();
    let table = build_slr(&grammar);

    assert_snapshot!(table.to_string(), @r###"
    SLR(1) table, 7 states
    state 0
      c => shift 1
      d => shift 2
      S => goto 3
      C => goto 4
    state 1
      c => shift 1
      d => shift 2
      C => goto 5
    state 2
      $ => reduce C -> d
      c => reduce C -> d
      d => reduce C -> d
    state 3
      $ => accept
    state 4
      c => shift 1
      d => shift 2
      C => goto 6
    state 5
      $ => reduce C -> c C
      c => reduce C -> c C
      d => reduce C -> c C
    state 6
      $ => reduce S -> C C
    "###);
  }
}
