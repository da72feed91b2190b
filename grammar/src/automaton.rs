//! Epsilon-NFA and DFA models, with subset construction between them.

use std::fmt::{self, Debug};
use thiserror::Error;

pub use dfa::Dfa;
pub use dfa_builder::DfaBuilder;
pub use nfa::Nfa;
pub use nfa_builder::NfaBuilder;
pub use powerset_cons::Determinized;

mod nfa;
mod nfa_builder;
mod dfa;
mod dfa_builder;
mod powerset_cons;

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct State(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
  #[error("state {state} already has a transition on this symbol")]
  DuplicateTransition {
    state: usize,
  },
  #[error("state {state} does not exist")]
  UnknownState {
    state: usize,
  },
}

impl State {
  pub fn id(&self) -> usize {
    self.0
  }
}

impl Debug for State {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "State({})", self.0)
  }
}

impl fmt::Display for State {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
