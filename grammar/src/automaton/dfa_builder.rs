use std::hash::Hash;
use bit_set::BitSet;
use super::{Dfa, State, AutomatonError};
use crate::Map;

pub struct DfaBuilder<A> {
  start: State,
  transitions: Vec<Map<A, State>>,
  accept_states: BitSet,
}

impl<A> DfaBuilder<A>
  where A: Eq + Hash + Copy
{
  pub fn new() -> Self {
    Self {
      start: State(0),
      transitions: vec![],
      accept_states: BitSet::new(),
    }
  }

  pub fn build(self) -> Result<Dfa<A>, AutomatonError> {
    if self.start.0 >= self.transitions.len() {
      return Err(AutomatonError::UnknownState {
        state: self.start.0,
      });
    }

    Ok(Dfa {
      start: self.start,
      transitions: self.transitions,
      accept_states: self.accept_states,
    })
  }

  pub fn state(&mut self) -> State {
    self.transitions.push(Map::default());
    State(self.transitions.len() - 1)
  }

  pub fn start(&mut self, state: State) {
    self.start = state;
  }

  pub fn transition(&mut self, src: State, dest: State, c: A) -> Result<(), AutomatonError> {
    if dest.0 >= self.transitions.len() {
      return Err(AutomatonError::UnknownState {
        state: dest.0,
      });
    }

    let row = self.transitions.get_mut(src.0)
      .ok_or(AutomatonError::UnknownState { state: src.0 })?;
    if row.contains_key(&c) {
      return Err(AutomatonError::DuplicateTransition {
        state: src.0,
      });
    }

    row.insert(c, dest);
    Ok(())
  }

  pub fn accept(&mut self, state: State) {
    self.accept_states.insert(state.0);
  }
}

impl<A> Default for DfaBuilder<A>
  where A: Eq + Hash + Copy
{
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn duplicate_transition() {
    let mut builder = DfaBuilder::new();
    let a = builder.state();
    let b = builder.state();

    assert_eq!(builder.transition(a, b, 'x'), Ok(()));
    assert_eq!(
      builder.transition(a, a, 'x'),
      Err(AutomatonError::DuplicateTransition { state: 0 }));
    assert_eq!(
      builder.transition(a, State(5), 'y'),
      Err(AutomatonError::UnknownState { state: 5 }));
  }
}
