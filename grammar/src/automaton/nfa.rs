use std::hash::Hash;
use bit_set::BitSet;
use super::{State, NfaBuilder, Determinized};
use crate::closure::Closures;
use crate::{Map, Set};

#[derive(Debug, Clone)]
pub struct Nfa<A> {
  pub(super) num_states: usize,
  pub(super) transitions: Map<(State, Option<A>), Set<State>>,
  pub(super) alphabets: Map<State, Set<A>>,
  pub(super) starts: Vec<State>,
  pub(super) accept_states: BitSet,
  /// epsilon closures, resolved once when the NFA is built
  pub(super) epsilon: Closures,
}

impl<A> Nfa<A>
  where A: Eq + Hash + Copy
{
  pub fn builder() -> NfaBuilder<A> {
    NfaBuilder::new()
  }

  pub fn num_states(&self) -> usize {
    self.num_states
  }

  pub fn starts(&self) -> &[State] {
    &self.starts
  }

  pub fn is_accept(&self, state: State) -> bool {
    self.accept_states.contains(state.0)
  }

  pub fn accept_states(&self) -> &BitSet {
    &self.accept_states
  }

  /// States reached from `state` on `symbol`; `None` is the empty string.
  pub fn targets(
    &self,
    state: State,
    symbol: Option<A>,
  ) -> impl Iterator<Item = State> + '_ {
    self.transitions.get(&(state, symbol))
      .into_iter()
      .flat_map(|set| set.iter().copied())
  }

  /// Non-epsilon symbols leaving `state`.
  pub fn alphabet(&self, state: State) -> impl Iterator<Item = A> + '_ {
    self.alphabets.get(&state)
      .into_iter()
      .flat_map(|set| set.iter().copied())
  }

  pub fn epsilon_closure<I>(&self, states: I) -> BitSet
    where I: IntoIterator<Item = State>
  {
    self.epsilon.of_nodes(states.into_iter().map(|state| state.0))
  }

  /// Simulates the NFA directly on `input`.
  pub fn accepts<I>(&self, input: I) -> bool
    where I: IntoIterator<Item = A>
  {
    let mut current = self.epsilon_closure(self.starts.iter().copied());

    for symbol in input {
      let next = current.iter()
        .flat_map(|state| self.targets(State(state), Some(symbol)))
        .collect::<Vec<_>>();
      current = self.epsilon_closure(next);
      if current.is_empty() {
        return false;
      }
    }

    !current.is_disjoint(&self.accept_states)
  }
}

impl<A> Nfa<A>
  where A: Eq + Hash + Copy + Ord
{
  pub fn to_dfa(&self) -> Determinized<A> {
    super::powerset_cons::powerset(self)
  }
}
