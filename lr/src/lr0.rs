use std::fmt::Write;
use grammar::automaton::{Determinized, Nfa, State};
use grammar::{Grammar, Map, SymbolId};
use crate::item::{Lr0Item, Lr0Items};

/// The canonical LR(0) automaton of a grammar.
///
/// Built as an NFA whose states are the item ids, then determinized; each
/// DFA state is a parser state.
pub struct Lr0Automaton<'g> {
  grammar: &'g Grammar,
  items: Lr0Items,
  det: Determinized<SymbolId>,
  accept_state: State,
}

impl<'g> Lr0Automaton<'g> {
  pub fn new(grammar: &'g Grammar) -> Self {
    let items = Lr0Items::new(grammar);
    let mut builder = Nfa::builder();
    let states = (0..items.len()).map(|_| builder.state()).collect::<Vec<_>>();

    for (id, &state) in states.iter().enumerate() {
      let item = items.get(id);
      let sym = match item.next_symbol(grammar) {
        Some(sym) => sym,
        None => {
          builder.accept(state);
          continue;
        }
      };

      builder.transition(state, states[id + 1], Some(sym));
      for &prod in grammar.productions_of(sym) {
        builder.transition(state, states[items.id(prod, 0)], None);
      }
    }

    let start_prod = grammar.start_production();
    builder.start(states[items.id(start_prod, 0)]);

    let det = builder.build().to_dfa();

    let start_rhs = grammar.production(start_prod).rhs[0];
    let accept_state = det.dfa.transition(det.dfa.start(), start_rhs)
      .expect("the start item always shifts the start symbol");

    log::debug!("LR(0) automaton: {} items, {} states", items.len(), det.dfa.num_states());

    Self {
      grammar,
      items,
      det,
      accept_state,
    }
  }

  pub fn grammar(&self) -> &'g Grammar {
    self.grammar
  }

  pub fn items(&self) -> &Lr0Items {
    &self.items
  }

  pub fn start_state(&self) -> State {
    self.det.dfa.start()
  }

  pub fn num_states(&self) -> usize {
    self.det.dfa.num_states()
  }

  pub fn states(&self) -> impl Iterator<Item = State> {
    (0..self.num_states()).map(State)
  }

  /// Shift and goto transitions, over terminals and non-terminals alike.
  pub fn transitions(&self, state: State) -> &Map<SymbolId, State> {
    self.det.dfa.transitions(state)
  }

  pub fn goto(&self, state: State, symbol: SymbolId) -> Option<State> {
    self.det.dfa.transition(state, symbol)
  }

  /// The state reached by shifting the start production's only symbol.
  /// It accepts on `$`.
  pub fn accept_state(&self) -> State {
    self.accept_state
  }

  /// Ids of the items making up `state`, ascending.
  pub fn items_in_state(&self, state: State) -> impl Iterator<Item = usize> + '_ {
    self.det.members(state).iter()
  }

  pub fn state_items(&self, state: State) -> Vec<Lr0Item> {
    self.items_in_state(state).map(|id| self.items.get(id)).collect()
  }

  /// Complete items of `state`.
  pub fn reductions(&self, state: State) -> impl Iterator<Item = Lr0Item> + '_ {
    self.items_in_state(state)
      .map(|id| self.items.get(id))
      .filter(|item| item.is_complete(self.grammar))
  }

  pub fn state_strings(&self, state: State) -> Vec<String> {
    self.state_items(state).iter()
      .map(|item| item.display(self.grammar).to_string())
      .collect()
  }

  /// Every state with its items and transitions, one block per state.
  pub fn describe(&self) -> String {
    let mut buf = String::new();

    for state in self.states() {
      writeln!(&mut buf, "state {}", state).unwrap();
      for item in self.state_strings(state) {
        writeln!(&mut buf, "  {}", item).unwrap();
      }

      let mut transitions = self.transitions(state).iter().collect::<Vec<_>>();
      transitions.sort();
      for (&sym, &to) in transitions {
        writeln!(&mut buf, "  {} => {}", self.grammar.symbol_name(sym), to).unwrap();
      }
    }

    buf
  }
}
