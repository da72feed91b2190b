use std::hash::Hash;
use bit_set::BitSet;
use super::{Nfa, State};
use crate::closure::Closures;
use crate::{Map, Set};

pub struct NfaBuilder<A> {
  counter: usize,
  transitions: Map<(State, Option<A>), Set<State>>,
  alphabets: Map<State, Set<A>>,
  starts: Vec<State>,
  accept_states: BitSet,
}

impl<A> NfaBuilder<A>
  where A: Eq + Hash + Copy
{
  pub fn new() -> Self {
    Self {
      counter: 0,
      transitions: Map::default(),
      alphabets: Map::default(),
      starts: vec![],
      accept_states: BitSet::new(),
    }
  }

  pub fn build(self) -> Nfa<A> {
    let mut with_epsilon = BitSet::with_capacity(self.counter);
    let mut edges = vec![];

    for ((src, c), dests) in &self.transitions {
      if c.is_none() {
        with_epsilon.insert(src.0);
        edges.extend(dests.iter().map(|dest| (src.0, dest.0)));
      }
    }

    // every state is its own closure even without epsilon edges
    edges.extend((0..self.counter)
      .filter(|&state| !with_epsilon.contains(state))
      .map(|state| (state, state)));

    Nfa {
      num_states: self.counter,
      transitions: self.transitions,
      alphabets: self.alphabets,
      starts: self.starts,
      accept_states: self.accept_states,
      epsilon: Closures::new(edges),
    }
  }

  pub fn state(&mut self) -> State {
    let i = self.counter;
    self.counter += 1;
    State(i)
  }

  pub fn transition(&mut self, src: State, dest: State, c: Option<A>) {
    self.transitions.entry((src, c)).or_default().insert(dest);
    if let Some(c) = c {
      self.alphabets.entry(src).or_default().insert(c);
    }
  }

  pub fn start(&mut self, state: State) {
    if !self.starts.contains(&state) {
      self.starts.push(state);
    }
  }

  pub fn accept(&mut self, state: State) {
    self.accept_states.insert(state.0);
  }
}

impl<A> Default for NfaBuilder<A>
  where A: Eq + Hash + Copy
{
  fn default() -> Self {
    Self::new()
  }
}
