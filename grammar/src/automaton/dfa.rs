use std::collections::VecDeque;
use std::hash::Hash;
use bit_set::BitSet;
use super::{State, DfaBuilder};
use crate::Map;

#[derive(Debug, Clone)]
pub struct Dfa<A> {
  pub(super) start: State,
  pub(super) transitions: Vec<Map<A, State>>,
  pub(super) accept_states: BitSet,
}

impl<A> Dfa<A>
  where A: Eq + Hash + Copy
{
  pub fn builder() -> DfaBuilder<A> {
    DfaBuilder::new()
  }

  pub fn start(&self) -> State {
    self.start
  }

  pub fn num_states(&self) -> usize {
    self.transitions.len()
  }

  pub fn transition(&self, state: State, c: A) -> Option<State> {
    self.transitions.get(state.0)?.get(&c).copied()
  }

  pub fn transitions(&self, state: State) -> &Map<A, State> {
    &self.transitions[state.0]
  }

  pub fn is_accept(&self, state: State) -> bool {
    self.accept_states.contains(state.0)
  }

  pub fn accepts<I>(&self, input: I) -> bool
    where I: IntoIterator<Item = A>
  {
    let mut state = self.start;
    for c in input {
      match self.transition(state, c) {
        Some(next) => state = next,
        None => return false,
      }
    }
    self.is_accept(state)
  }

  /// Walks both automata in lockstep from their start states, pairing states
  /// one-to-one. Any difference in accept status, out-degree or target
  /// pairing makes them inequivalent.
  pub fn equivalent(&self, other: &Dfa<A>) -> bool {
    let mut forward = Map::<State, State>::default();
    let mut backward = Map::<State, State>::default();
    let mut queue = VecDeque::new();

    forward.insert(self.start, other.start);
    backward.insert(other.start, self.start);
    queue.push_back((self.start, other.start));

    while let Some((a, b)) = queue.pop_front() {
      if self.is_accept(a) != other.is_accept(b) {
        return false;
      }

      let a_tx = self.transitions(a);
      let b_tx = other.transitions(b);
      if a_tx.len() != b_tx.len() {
        return false;
      }

      for (c, &a_next) in a_tx {
        let b_next = match b_tx.get(c) {
          Some(&s) => s,
          None => return false,
        };

        match (forward.get(&a_next), backward.get(&b_next)) {
          (None, None) => {
            forward.insert(a_next, b_next);
            backward.insert(b_next, a_next);
            queue.push_back((a_next, b_next));
          }
          (Some(&paired_b), Some(&paired_a)) => {
            if paired_b != b_next || paired_a != a_next {
              return false;
            }
          }
          _ => return false,
        }
      }
    }

    true
  }
}
