use std::collections::BTreeSet;
use std::fmt;
use grammar::automaton::State;
use grammar::{Grammar, Map, SymbolId};
use thiserror::Error;
use crate::ParserKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseAction {
  Shift(State),
  Reduce {
    lhs: SymbolId,
    rhs_len: usize,
    prod: usize,
  },
  Accept,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
  #[error(transparent)]
  ShiftReduce(#[from] ShiftReduceConflictError),
  #[error(transparent)]
  ReduceReduce(#[from] ReduceReduceConflictError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("shift-reduce conflict in state {state} on `{shift}`, reducing by `{reduce}`")]
pub struct ShiftReduceConflictError {
  pub state: usize,
  pub state_items: Vec<String>,
  pub shift: String,
  pub reduce: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("reduce-reduce conflict in state {state} on `{lookahead}` between `{reduce1}` and `{reduce2}`")]
pub struct ReduceReduceConflictError {
  pub state: usize,
  pub state_items: Vec<String>,
  pub lookahead: String,
  pub reduce1: String,
  pub reduce2: String,
}

impl ConflictError {
  pub fn state(&self) -> usize {
    match self {
      ConflictError::ShiftReduce(err) => err.state,
      ConflictError::ReduceReduce(err) => err.state,
    }
  }
}

/// Action table of an LR parser. A cell holding more than one action is
/// ambiguous and makes the whole table invalid.
#[derive(Debug, Clone)]
pub struct ParseTable {
  kind: ParserKind,
  start: State,
  /// state -> symbol -> distinct actions
  rows: Vec<Map<SymbolId, Vec<ParseAction>>>,
  /// cells holding more than one action, sorted
  ambiguous: Vec<(State, SymbolId)>,
  conflicts: Vec<ConflictError>,
  is_lr0: Option<bool>,
  /// symbol id -> name
  symbols: Vec<String>,
  num_terminals: usize,
  /// production -> text
  prods: Vec<String>,
}

impl ParseTable {
  pub fn kind(&self) -> ParserKind {
    self.kind
  }

  pub fn start_state(&self) -> State {
    self.start
  }

  pub fn num_states(&self) -> usize {
    self.rows.len()
  }

  pub fn actions(&self, state: State, symbol: SymbolId) -> &[ParseAction] {
    self.rows.get(state.id())
      .and_then(|row| row.get(&symbol))
      .map(|actions| actions.as_slice())
      .unwrap_or(&[])
  }

  pub fn is_valid(&self) -> bool {
    self.ambiguous.is_empty()
  }

  pub fn ambiguous_cells(&self) -> &[(State, SymbolId)] {
    &self.ambiguous
  }

  pub fn conflicts(&self) -> &[ConflictError] {
    &self.conflicts
  }

  /// Whether no state needs a lookahead to pick its reduction. Only known
  /// for SLR(1) tables.
  pub fn is_lr0(&self) -> Option<bool> {
    self.is_lr0
  }

  pub fn symbol_name(&self, symbol: SymbolId) -> &str {
    self.symbols.get(symbol.index()).map(|s| s.as_str()).unwrap_or("?")
  }

  /// Id of the terminal called `name`; non-terminals are not looked up.
  pub fn terminal(&self, name: &str) -> Option<SymbolId> {
    self.symbols[..self.num_terminals].iter()
      .position(|s| s == name)
      .map(SymbolId::from_index)
  }

  pub fn production_text(&self, prod: usize) -> &str {
    &self.prods[prod]
  }
}

impl fmt::Display for ParseTable {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    writeln!(f, "{} table, {} states", self.kind, self.rows.len())?;

    for (state, row) in self.rows.iter().enumerate() {
      writeln!(f, "state {}", state)?;

      let mut cells = row.iter().collect::<Vec<_>>();
      cells.sort_by_key(|cell| *cell.0);

      for (&sym, actions) in cells {
        write!(f, "  {} =>", self.symbol_name(sym))?;
        for (i, action) in actions.iter().enumerate() {
          if i > 0 {
            write!(f, " |")?;
          }
          match *action {
            ParseAction::Shift(to) if sym.index() < self.num_terminals => {
              write!(f, " shift {}", to)?
            }
            ParseAction::Shift(to) => write!(f, " goto {}", to)?,
            ParseAction::Reduce { prod, .. } => write!(f, " reduce {}", self.prods[prod])?,
            ParseAction::Accept => write!(f, " accept")?,
          }
        }
        writeln!(f)?;
      }
    }

    Ok(())
  }
}

/// Collects actions for every builder; conflicts are classified once all
/// actions are in.
pub(crate) struct TableBuilder<'g> {
  grammar: &'g Grammar,
  rows: Vec<Map<SymbolId, Vec<ParseAction>>>,
  ambiguous: BTreeSet<(State, SymbolId)>,
}

impl<'g> TableBuilder<'g> {
  pub fn new(grammar: &'g Grammar, num_states: usize) -> Self {
    Self {
      grammar,
      rows: vec![Map::default(); num_states],
      ambiguous: BTreeSet::new(),
    }
  }

  pub fn add(&mut self, state: State, symbol: SymbolId, action: ParseAction) {
    let cell = self.rows[state.id()].entry(symbol).or_default();
    if cell.contains(&action) {
      return;
    }

    cell.push(action);
    if cell.len() > 1 {
      self.ambiguous.insert((state, symbol));
    }
  }

  pub fn reduce(&mut self, state: State, lookahead: SymbolId, prod: usize) {
    let action = if prod == self.grammar.start_production() {
      ParseAction::Accept
    } else {
      let production = self.grammar.production(prod);
      ParseAction::Reduce {
        lhs: production.lhs,
        rhs_len: production.rhs.len(),
        prod,
      }
    };
    self.add(state, lookahead, action);
  }

  /// `state_items` renders the items of a state for conflict reports.
  pub fn finish<F>(
    self,
    kind: ParserKind,
    start: State,
    is_lr0: Option<bool>,
    state_items: F,
  ) -> ParseTable
    where F: Fn(State) -> Vec<String>
  {
    let grammar = self.grammar;
    let mut conflicts = vec![];

    for &(state, symbol) in &self.ambiguous {
      let cell = &self.rows[state.id()][&symbol];
      let items = state_items(state);
      let shift = cell.iter().any(|action| matches!(action, ParseAction::Shift(_)));
      let reductions = cell.iter()
        .filter_map(|action| match *action {
          ParseAction::Shift(_) => None,
          ParseAction::Reduce { prod, .. } => Some(prod),
          ParseAction::Accept => Some(grammar.start_production()),
        })
        .collect::<Vec<_>>();

      if shift {
        for &prod in &reductions {
          conflicts.push(ConflictError::from(ShiftReduceConflictError {
            state: state.id(),
            state_items: items.clone(),
            shift: grammar.symbol_name(symbol).to_owned(),
            reduce: grammar.production_text(prod),
          }));
        }
      } else {
        for &prod in &reductions[1..] {
          conflicts.push(ConflictError::from(ReduceReduceConflictError {
            state: state.id(),
            state_items: items.clone(),
            lookahead: grammar.symbol_name(symbol).to_owned(),
            reduce1: grammar.production_text(reductions[0]),
            reduce2: grammar.production_text(prod),
          }));
        }
      }
    }

    for conflict in &conflicts {
      log::warn!("{}: {}", kind, conflict);
    }
    log::debug!("{} table: {} states, {} conflicts", kind, self.rows.len(), conflicts.len());

    ParseTable {
      kind,
      start,
      rows: self.rows,
      ambiguous: self.ambiguous.into_iter().collect(),
      conflicts,
      is_lr0,
      symbols: (0..grammar.num_symbols())
        .map(|i| grammar.symbol_name(SymbolId::from_index(i)).to_owned())
        .collect(),
      num_terminals: grammar.num_terminals(),
      prods: (0..grammar.prods().len())
        .map(|prod| grammar.production_text(prod))
        .collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn equal_actions_are_merged() {
    let grammar = grammar::build("
S -> a | b
    ").unwrap();
    let a = grammar.symbol_id("a").unwrap();
    let mut builder = TableBuilder::new(&grammar, 2);

    builder.add(State(0), a, ParseAction::Shift(State(1)));
    builder.add(State(0), a, ParseAction::Shift(State(1)));
    builder.reduce(State(1), SymbolId::EOF, 0);
    builder.reduce(State(1), SymbolId::EOF, 0);

    let table = builder.finish(ParserKind::Slr, State(0), None, |_| vec![]);
    assert!(table.is_valid());
    assert_eq!(table.actions(State(0), a), &[ParseAction::Shift(State(1))]);
    assert_eq!(table.actions(State(1), SymbolId::EOF).len(), 1);
    assert!(table.actions(State(1), a).is_empty());
  }

  #[test]
  fn conflicts_are_classified() {
    let grammar = grammar::build("
S -> a | b
    ").unwrap();
    let a = grammar.symbol_id("a").unwrap();
    let mut builder = TableBuilder::new(&grammar, 1);

    builder.add(State(0), a, ParseAction::Shift(State(0)));
    builder.reduce(State(0), a, 0);
    builder.reduce(State(0), SymbolId::EOF, 0);
    builder.reduce(State(0), SymbolId::EOF, 1);
    builder.reduce(State(0), SymbolId::EOF, grammar.start_production());

    let table = builder.finish(ParserKind::Lalr, State(0), None, |_| vec!["S -> a .".to_owned()]);
    assert!(!table.is_valid());
    assert_eq!(table.conflicts(), &[
      ConflictError::ReduceReduce(ReduceReduceConflictError {
        state: 0,
        state_items: vec!["S -> a .".to_owned()],
        lookahead: "$".to_owned(),
        reduce1: "S -> a".to_owned(),
        reduce2: "S -> b".to_owned(),
      }),
      ConflictError::ReduceReduce(ReduceReduceConflictError {
        state: 0,
        state_items: vec!["S -> a .".to_owned()],
        lookahead: "$".to_owned(),
        reduce1: "S -> a".to_owned(),
        reduce2: "__START -> S".to_owned(),
      }),
      ConflictError::ShiftReduce(ShiftReduceConflictError {
        state: 0,
        state_items: vec!["S -> a .".to_owned()],
        shift: "a".to_owned(),
        reduce: "S -> a".to_owned(),
      }),
    ]);
  }

  #[test]
  fn ambiguous_shifts_invalidate_the_table() {
    let grammar = grammar::build("
S -> a | b
    ").unwrap();
    let a = grammar.symbol_id("a").unwrap();
    let mut builder = TableBuilder::new(&grammar, 2);

    builder.add(State(0), a, ParseAction::Shift(State(0)));
    builder.add(State(0), a, ParseAction::Shift(State(1)));

    let table = builder.finish(ParserKind::Clr, State(0), None, |_| vec![]);
    assert!(table.conflicts().is_empty());
    assert!(!table.is_valid());
    assert_eq!(table.ambiguous_cells(), &[(State(0), a)]);
  }
}
