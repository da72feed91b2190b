use bit_set::BitSet;
use grammar::automaton::State;
use grammar::{Grammar, SymbolId};
use crate::item::{lr1_key, split_lr1_key, lr1_item_string};
use crate::lr0::Lr0Automaton;
use crate::table::{ParseAction, ParseTable, TableBuilder};
use crate::ParserKind;

/// LALR(1) over the LR(0) automaton, with lookaheads propagated to a
/// fixpoint.
pub fn build_lalr(grammar: &Grammar) -> ParseTable {
  let lr0 = Lr0Automaton::new(grammar);
  let lookaheads = Lookaheads::compute(&lr0);

  let mut table = TableBuilder::new(grammar, lr0.num_states());

  for state in lr0.states() {
    for (&sym, &to) in lr0.transitions(state) {
      table.add(state, sym, ParseAction::Shift(to));
    }

    for (lr0_id, la) in lookaheads.of_state(state) {
      let item = lr0.items().get(lr0_id);
      if item.is_complete(grammar) {
        table.reduce(state, la, item.prod);
      }
    }
  }

  table.finish(ParserKind::Lalr, lr0.start_state(), None, |state| {
    lookaheads.of_state(state)
      .map(|(lr0_id, la)| lr1_item_string(grammar, lr0.items().get(lr0_id), la))
      .collect()
  })
}

/// For every state, the `(item, lookahead)` pairs flowing into it, packed as
/// LR(1) keys.
struct Lookaheads {
  num_terminals: usize,
  /// state -> processed keys
  states: Vec<BitSet>,
}

impl Lookaheads {
  fn compute(lr0: &Lr0Automaton) -> Self {
    let grammar = lr0.grammar();
    let items = lr0.items();
    let num_terminals = grammar.num_terminals();

    let mut states = vec![BitSet::new(); lr0.num_states()];
    let mut queue = vec![];

    let mut enqueue = |state: State, key: usize, queue: &mut Vec<(State, usize)>| {
      if states[state.id()].insert(key) {
        queue.push((state, key));
      }
    };

    let start_item = items.id(grammar.start_production(), 0);
    enqueue(lr0.start_state(), lr1_key(start_item, SymbolId::EOF, num_terminals), &mut queue);

    while let Some((state, key)) = queue.pop() {
      let (lr0_id, la) = split_lr1_key(key, num_terminals);
      let item = items.get(lr0_id);

      let sym = match item.next_symbol(grammar) {
        Some(sym) => sym,
        None => continue,
      };

      let to = lr0.goto(state, sym)
        .expect("every item with a next symbol has a transition");
      enqueue(to, lr1_key(lr0_id + 1, la, num_terminals), &mut queue);

      let nt_prods = grammar.productions_of(sym);
      if nt_prods.is_empty() {
        continue;
      }

      let (mut first, nullable) = grammar.first_of_symbols(item.rest(grammar));
      if nullable {
        first.insert(la.index());
      }

      for &prod in nt_prods {
        let initial = items.id(prod, 0);
        for t in first.iter() {
          enqueue(state, lr1_key(initial, SymbolId::from_index(t), num_terminals), &mut queue);
        }
      }
    }

    log::debug!("LALR(1) lookaheads: {} item/lookahead pairs",
      states.iter().map(|keys| keys.len()).sum::<usize>());

    Self {
      num_terminals,
      states,
    }
  }

  /// Sorted by item, then lookahead.
  fn of_state(&self, state: State) -> impl Iterator<Item = (usize, SymbolId)> + '_ {
    self.states[state.id()].iter()
      .map(move |key| split_lr1_key(key, self.num_terminals))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::slr::build_slr;
  use pretty_assertions::assert_eq;

  #[test]
  fn lookaheads_are_split_per_state() {
    let grammar = grammar::build("
S -> A a | b A c | d c | b d a
A -> d
    ").unwrap();

    assert!(!build_slr(&grammar).is_valid());

    let table = build_lalr(&grammar);
    assert!(table.is_valid(), "{:?}", table.conflicts());
    assert_eq!(table.is_lr0(), None);
  }

  #[test]
  fn merged_states_conflict() {
    let grammar = grammar::build("
S -> a E c | a F d | b F c | b E d
E -> e
F -> e
    ").unwrap();
    let table = build_lalr(&grammar);

    assert_eq!(table.conflicts().len(), 2);
    let mut lookaheads = table.conflicts().iter()
      .map(|conflict| match conflict {
        crate::ConflictError::ReduceReduce(err) => err.lookahead.clone(),
        crate::ConflictError::ShiftReduce(err) => panic!("unexpected {}", err),
      })
      .collect::<Vec<_>>();
    lookaheads.sort();
    assert_eq!(lookaheads, vec!["c", "d"]);
  }
}
