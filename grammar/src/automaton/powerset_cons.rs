use std::collections::BTreeSet;
use std::hash::Hash;
use bit_set::BitSet;
use indexmap::IndexSet;
use super::{Nfa, Dfa, State};
use crate::Map;

/// Result of subset construction: the DFA plus the bookkeeping between its
/// states and the NFA states they are made of.
#[derive(Debug, Clone)]
pub struct Determinized<A> {
  pub dfa: Dfa<A>,
  /// DFA state -> member NFA states
  pub nfa_states: Vec<BitSet>,
  /// NFA state -> DFA states containing it
  pub dfa_states: Vec<Vec<State>>,
}

impl<A> Determinized<A> {
  pub fn members(&self, state: State) -> &BitSet {
    &self.nfa_states[state.0]
  }

  pub fn containing(&self, nfa_state: State) -> &[State] {
    &self.dfa_states[nfa_state.0]
  }
}

pub fn powerset<A>(nfa: &Nfa<A>) -> Determinized<A>
  where A: Eq + Hash + Copy + Ord
{
  let mut sets = IndexSet::<BitSet>::new();
  let mut transitions: Vec<Map<A, State>> = vec![];

  sets.insert(nfa.epsilon_closure(nfa.starts().iter().copied()));
  transitions.push(Map::default());

  let mut i = 0;
  while i < sets.len() {
    let symbols = sets[i].iter()
      .flat_map(|state| nfa.alphabet(State(state)))
      .collect::<BTreeSet<_>>();

    let successors = symbols.into_iter()
      .map(|c| {
        let targets = sets[i].iter()
          .flat_map(|state| nfa.targets(State(state), Some(c)))
          .collect::<Vec<_>>();
        (c, nfa.epsilon_closure(targets))
      })
      .collect::<Vec<_>>();

    for (c, set) in successors {
      let (j, new) = sets.insert_full(set);
      if new {
        transitions.push(Map::default());
      }
      transitions[i].insert(c, State(j));
    }

    i += 1;
  }

  let mut accept_states = BitSet::new();
  let mut dfa_states = vec![vec![]; nfa.num_states()];

  for (i, set) in sets.iter().enumerate() {
    if !set.is_disjoint(nfa.accept_states()) {
      accept_states.insert(i);
    }
    for member in set.iter() {
      dfa_states[member].push(State(i));
    }
  }

  log::debug!("subset construction: {} NFA states -> {} DFA states",
    nfa.num_states(), sets.len());

  Determinized {
    dfa: Dfa {
      start: State(0),
      transitions,
      accept_states,
    },
    nfa_states: sets.into_iter().collect(),
    dfa_states,
  }
}
