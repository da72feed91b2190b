use std::sync::OnceLock;
use bit_set::BitSet;
use itertools::Itertools;
use crate::closure;
use crate::names::NameGen;
use crate::{BiMap, GrammarError};

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct SymbolId(u32);

impl SymbolId {
  /// End of input, `$`.
  pub const EOF: SymbolId = SymbolId(0);

  pub fn from_index(index: usize) -> Self {
    Self(index as u32)
  }

  pub fn id(&self) -> u32 {
    self.0
  }

  pub fn index(&self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
  pub lhs: SymbolId,
  pub rhs: Vec<SymbolId>,
}

/// One LHS with its alternatives, by name. An empty alternative is epsilon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
  pub lhs: String,
  pub alts: Vec<Vec<String>>,
  pub line: usize,
}

/// Symbol and production registry of a context-free grammar.
///
/// Symbol ids are dense: `$` is 0, terminals follow in order of first
/// appearance, then non-terminals, the synthetic start symbol last. The
/// synthetic start production `START -> <first LHS>` is the last production.
///
/// Nullable, FIRST and FOLLOW sets are computed on first use and kept.
#[derive(Debug, Clone)]
pub struct Grammar {
  symbols: BiMap<SymbolId, String>,
  num_terminals: usize,
  prods: Vec<Production>,
  /// non-terminal index -> productions
  nt_prods: Vec<Vec<usize>>,
  start: SymbolId,
  start_prod: usize,
  nullable: OnceLock<BitSet>,
  first: OnceLock<Vec<BitSet>>,
  follow: OnceLock<Vec<BitSet>>,
}

impl Grammar {
  /// Builds the registry from user rules. Names carrying the reserved prefix
  /// are rejected.
  pub fn new(rules: &[Rule], names: &NameGen) -> Result<Self, GrammarError> {
    for rule in rules {
      let mut used = std::iter::once(&rule.lhs).chain(rule.alts.iter().flatten());
      if let Some(name) = used.find(|name| names.is_reserved(name)) {
        return Err(GrammarError::ReservedName {
          line: rule.line,
          name: name.clone(),
        });
      }
    }

    Self::with_reserved(rules, names)
  }

  /// Like `new`, but admits reserved names other than the start name.
  pub(crate) fn with_reserved(rules: &[Rule], names: &NameGen) -> Result<Self, GrammarError> {
    if rules.is_empty() {
      return Err(GrammarError::Empty);
    }

    let mut symbols = BiMap::new();
    symbols.insert(SymbolId::EOF, "$".to_owned());

    let start_name = names.start_name();
    for rule in rules {
      let mut used = std::iter::once(&rule.lhs).chain(rule.alts.iter().flatten());
      if let Some(name) = used.find(|&name| *name == start_name) {
        return Err(GrammarError::ReservedName {
          line: rule.line,
          name: name.clone(),
        });
      }
    }

    for rule in rules {
      if !names.is_nonterminal(&rule.lhs) {
        return Err(GrammarError::Syntax {
          line: rule.line,
          message: format!("`{}` is not a non-terminal name", rule.lhs),
        });
      }

      for name in rule.alts.iter().flatten() {
        if !names.is_nonterminal(name) && !symbols.contains_right(name) {
          symbols.insert(SymbolId::from_index(symbols.len()), name.clone());
        }
      }
    }

    let num_terminals = symbols.len();

    for rule in rules {
      let lhs = std::iter::once(&rule.lhs);
      let used = rule.alts.iter().flatten().filter(|name| names.is_nonterminal(name));
      for name in lhs.chain(used) {
        if !symbols.contains_right(name) {
          symbols.insert(SymbolId::from_index(symbols.len()), name.clone());
        }
      }
    }

    let start = SymbolId::from_index(symbols.len());
    symbols.insert(start, names.start_name());

    let num_nts = symbols.len() - num_terminals;
    let id_of = |name: &String| -> SymbolId {
      *symbols.get_by_right(name).expect("every name was registered above")
    };

    let mut prods = vec![];
    let mut nt_prods = vec![vec![]; num_nts];

    for rule in rules {
      let lhs = id_of(&rule.lhs);
      for alt in &rule.alts {
        nt_prods[lhs.index() - num_terminals].push(prods.len());
        prods.push(Production {
          lhs,
          rhs: alt.iter().map(id_of).collect(),
        });
      }
    }

    let start_prod = prods.len();
    nt_prods[start.index() - num_terminals].push(start_prod);
    prods.push(Production {
      lhs: start,
      rhs: vec![id_of(&rules[0].lhs)],
    });

    for (i, nt_prods) in nt_prods.iter().enumerate() {
      if nt_prods.is_empty() {
        let name = symbols.get_by_left(&SymbolId::from_index(num_terminals + i))
          .cloned()
          .unwrap_or_default();
        return Err(GrammarError::UndefinedNonterminal(name));
      }
    }

    let edges = prods.iter().flat_map(|prod| {
      prod.rhs.iter()
        .filter(|sym| sym.index() >= num_terminals)
        .map(move |sym| (prod.lhs.index(), sym.index()))
    });
    let reachable = closure::closure_of_one_node(edges, start.index());

    for nt in num_terminals..symbols.len() {
      if !reachable.contains(nt) {
        let name = symbols.get_by_left(&SymbolId::from_index(nt))
          .cloned()
          .unwrap_or_default();
        return Err(GrammarError::UnreachableNonterminal(name));
      }
    }

    log::debug!("grammar: {} terminals, {} non-terminals, {} productions",
      num_terminals, num_nts, prods.len());

    Ok(Self {
      symbols,
      num_terminals,
      prods,
      nt_prods,
      start,
      start_prod,
      nullable: OnceLock::new(),
      first: OnceLock::new(),
      follow: OnceLock::new(),
    })
  }

  pub fn num_symbols(&self) -> usize {
    self.symbols.len()
  }

  /// Number of terminals, `$` included.
  pub fn num_terminals(&self) -> usize {
    self.num_terminals
  }

  pub fn num_nonterminals(&self) -> usize {
    self.symbols.len() - self.num_terminals
  }

  pub fn is_terminal(&self, symbol: SymbolId) -> bool {
    symbol.index() < self.num_terminals
  }

  pub fn symbol_name(&self, symbol: SymbolId) -> &str {
    self.symbols.get_by_left(&symbol).map(|s| s.as_str()).unwrap_or("?")
  }

  pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
    self.symbols.get_by_right(name).copied()
  }

  pub fn terminals(&self) -> impl Iterator<Item = SymbolId> {
    (0..self.num_terminals).map(SymbolId::from_index)
  }

  pub fn nonterminals(&self) -> impl Iterator<Item = SymbolId> {
    (self.num_terminals..self.symbols.len()).map(SymbolId::from_index)
  }

  pub fn prods(&self) -> &[Production] {
    &self.prods
  }

  pub fn production(&self, prod: usize) -> &Production {
    &self.prods[prod]
  }

  /// Productions headed by `nt`; empty for terminals.
  pub fn productions_of(&self, nt: SymbolId) -> &[usize] {
    nt.index()
      .checked_sub(self.num_terminals)
      .and_then(|i| self.nt_prods.get(i))
      .map(|prods| prods.as_slice())
      .unwrap_or(&[])
  }

  pub fn start_symbol(&self) -> SymbolId {
    self.start
  }

  pub fn start_production(&self) -> usize {
    self.start_prod
  }

  pub fn nullable(&self) -> &BitSet {
    self.nullable.get_or_init(|| crate::first::compute_nullable(self))
  }

  pub fn is_nullable(&self, symbol: SymbolId) -> bool {
    self.nullable().contains(symbol.index())
  }

  /// FIRST sets indexed by symbol id. A terminal's set is itself.
  pub fn first_sets(&self) -> &[BitSet] {
    self.first.get_or_init(|| crate::first::compute_first(self, self.nullable()))
  }

  pub fn first(&self, symbol: SymbolId) -> &BitSet {
    &self.first_sets()[symbol.index()]
  }

  /// FOLLOW sets indexed by symbol id; only non-terminals are populated.
  pub fn follow_sets(&self) -> &[BitSet] {
    self.follow.get_or_init(|| {
      crate::first::compute_follow(self, self.nullable(), self.first_sets())
    })
  }

  pub fn follow(&self, symbol: SymbolId) -> &BitSet {
    &self.follow_sets()[symbol.index()]
  }

  /// FIRST of a symbol string, and whether the whole string is nullable.
  pub fn first_of_symbols(&self, symbols: &[SymbolId]) -> (BitSet, bool) {
    let mut first = BitSet::new();
    for &symbol in symbols {
      first.union_with(self.first(symbol));
      if !self.is_nullable(symbol) {
        return (first, false);
      }
    }
    (first, true)
  }

  pub fn production_text(&self, prod: usize) -> String {
    let prod = &self.prods[prod];
    let rhs = if prod.rhs.is_empty() {
      "ε".to_owned()
    } else {
      prod.rhs.iter().map(|&sym| self.symbol_name(sym)).join(" ")
    };
    format!("{} -> {}", self.symbol_name(prod.lhs), rhs)
  }

  /// The user rules, grouped by LHS in symbol order, without the synthetic
  /// start production.
  pub fn rules(&self) -> Vec<Rule> {
    self.nonterminals()
      .filter(|&nt| nt != self.start)
      .map(|nt| Rule {
        lhs: self.symbol_name(nt).to_owned(),
        alts: self.productions_of(nt).iter().map(|&prod| {
          self.prods[prod].rhs.iter()
            .map(|&sym| self.symbol_name(sym).to_owned())
            .collect()
        }).collect(),
        line: 0,
      })
      .collect()
  }
}
