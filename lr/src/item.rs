use std::fmt;
use grammar::{Grammar, SymbolId};

/// A production with a dot in its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lr0Item {
  pub prod: usize,
  pub dot: usize,
}

/// Dense ids for every `(production, dot)` pair of a grammar. The items of
/// one production are numbered consecutively, dot 0 first.
#[derive(Debug, Clone)]
pub struct Lr0Items {
  /// production -> id of its item with the dot at 0
  offsets: Vec<usize>,
  items: Vec<Lr0Item>,
}

impl Lr0Items {
  pub fn new(grammar: &Grammar) -> Self {
    let mut offsets = vec![];
    let mut items = vec![];

    for (prod, production) in grammar.prods().iter().enumerate() {
      offsets.push(items.len());
      items.extend((0..=production.rhs.len()).map(|dot| Lr0Item { prod, dot }));
    }

    Self {
      offsets,
      items,
    }
  }

  pub fn id(&self, prod: usize, dot: usize) -> usize {
    self.offsets[prod] + dot
  }

  pub fn get(&self, id: usize) -> Lr0Item {
    self.items[id]
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

impl Lr0Item {
  /// The symbol right after the dot, `None` for a complete item.
  pub fn next_symbol(&self, grammar: &Grammar) -> Option<SymbolId> {
    grammar.production(self.prod).rhs.get(self.dot).copied()
  }

  /// Symbols after the one following the dot.
  pub fn rest<'g>(&self, grammar: &'g Grammar) -> &'g [SymbolId] {
    let rhs = &grammar.production(self.prod).rhs;
    rhs.get(self.dot + 1..).unwrap_or(&[])
  }

  pub fn is_complete(&self, grammar: &Grammar) -> bool {
    self.dot == grammar.production(self.prod).rhs.len()
  }

  /// Renders the item as `A -> x . y`.
  pub fn display<'a>(&self, grammar: &'a Grammar) -> ItemDisplay<'a> {
    ItemDisplay {
      item: *self,
      grammar,
    }
  }
}

pub struct ItemDisplay<'a> {
  item: Lr0Item,
  grammar: &'a Grammar,
}

impl fmt::Display for ItemDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let grammar = self.grammar;
    let prod = grammar.production(self.item.prod);

    write!(f, "{} ->", grammar.symbol_name(prod.lhs))?;
    for (i, &sym) in prod.rhs.iter().enumerate() {
      if i == self.item.dot {
        write!(f, " .")?;
      }
      write!(f, " {}", grammar.symbol_name(sym))?;
    }
    if self.item.dot == prod.rhs.len() {
      write!(f, " .")?;
    }

    Ok(())
  }
}

/// An LR(0) item paired with one lookahead terminal, packed into one integer
/// as `lr0 * num_terminals + lookahead`.
pub fn lr1_key(lr0: usize, lookahead: SymbolId, num_terminals: usize) -> usize {
  lr0 * num_terminals + lookahead.index()
}

pub fn split_lr1_key(key: usize, num_terminals: usize) -> (usize, SymbolId) {
  (key / num_terminals, SymbolId::from_index(key % num_terminals))
}

pub fn lr1_item_string(grammar: &Grammar, item: Lr0Item, lookahead: SymbolId) -> String {
  format!("{}, {}", item.display(grammar), grammar.symbol_name(lookahead))
}
