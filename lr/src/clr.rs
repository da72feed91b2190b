use std::fmt::Write;
use grammar::automaton::{Determinized, Nfa, State};
use grammar::{Grammar, Map, SymbolId};
use crate::item::{lr1_key, split_lr1_key, lr1_item_string, Lr0Item, Lr0Items};
use crate::table::{ParseAction, ParseTable, TableBuilder};
use crate::ParserKind;

/// Canonical LR(1): a dedicated automaton whose NFA states are
/// `(item, lookahead)` pairs reachable from `__START -> . S, $`.
pub fn build_clr(grammar: &Grammar) -> ParseTable {
  let lr1 = Lr1Automaton::new(grammar);
  let mut table = TableBuilder::new(grammar, lr1.num_states());

  for state in lr1.states() {
    for (&sym, &to) in lr1.transitions(state) {
      table.add(state, sym, ParseAction::Shift(to));
    }

    for (item, la) in lr1.state_items(state) {
      if item.is_complete(grammar) {
        table.reduce(state, la, item.prod);
      }
    }
  }

  table.finish(ParserKind::Clr, lr1.start_state(), None, |state| lr1.state_strings(state))
}

pub struct Lr1Automaton<'g> {
  grammar: &'g Grammar,
  items: Lr0Items,
  /// NFA state -> LR(1) key
  keys: Vec<usize>,
  det: Determinized<SymbolId>,
}

impl<'g> Lr1Automaton<'g> {
  pub fn new(grammar: &'g Grammar) -> Self {
    let items = Lr0Items::new(grammar);
    let num_terminals = grammar.num_terminals();

    let mut builder = Nfa::builder();
    let mut states = Map::<usize, State>::default();
    let mut keys = vec![];
    let mut queue = vec![];

    let mut state_of = |key: usize, queue: &mut Vec<usize>| -> State {
      *states.entry(key).or_insert_with(|| {
        keys.push(key);
        queue.push(key);
        builder.state()
      })
    };

    let start_key = lr1_key(items.id(grammar.start_production(), 0), SymbolId::EOF, num_terminals);
    let start = state_of(start_key, &mut queue);

    // edges are collected first since `state_of` holds the builder
    let mut edges = vec![];

    while let Some(key) = queue.pop() {
      let src = state_of(key, &mut queue);
      let (lr0_id, la) = split_lr1_key(key, num_terminals);
      let item = items.get(lr0_id);

      let sym = match item.next_symbol(grammar) {
        Some(sym) => sym,
        None => continue,
      };

      let dest = state_of(lr1_key(lr0_id + 1, la, num_terminals), &mut queue);
      edges.push((src, dest, Some(sym)));

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
          let dest = state_of(lr1_key(initial, SymbolId::from_index(t), num_terminals), &mut queue);
          edges.push((src, dest, None));
        }
      }
    }

    for (src, dest, sym) in edges {
      builder.transition(src, dest, sym);
    }
    builder.start(start);

    let nfa = builder.build();
    log::debug!("LR(1) item NFA: {} states", nfa.num_states());

    let det = nfa.to_dfa();

    Self {
      grammar,
      items,
      keys,
      det,
    }
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

  pub fn transitions(&self, state: State) -> &Map<SymbolId, State> {
    self.det.dfa.transitions(state)
  }

  /// Items of `state` with their lookaheads, sorted.
  pub fn state_items(&self, state: State) -> Vec<(Lr0Item, SymbolId)> {
    let num_terminals = self.grammar.num_terminals();
    let mut keys = self.det.members(state).iter()
      .map(|nfa_state| self.keys[nfa_state])
      .collect::<Vec<_>>();
    keys.sort_unstable();

    keys.into_iter()
      .map(|key| {
        let (lr0_id, la) = split_lr1_key(key, num_terminals);
        (self.items.get(lr0_id), la)
      })
      .collect()
  }

  pub fn state_strings(&self, state: State) -> Vec<String> {
    self.state_items(state).into_iter()
      .map(|(item, la)| lr1_item_string(self.grammar, item, la))
      .collect()
  }

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
