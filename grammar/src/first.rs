//! compute NULLABLE, FIRST, and FOLLOW sets.

use bit_set::BitSet;
use bitvec::prelude::*;
use crate::closure::{Closures, ClosureId};
use crate::{Grammar, Map, SymbolId};

/// The synthetic start symbol is never reported, only user non-terminals.
pub(crate) fn compute_nullable(grammar: &Grammar) -> BitSet {
  let mut nullable = Nullable {
    grammar,
    nullable: bitvec![0; grammar.num_symbols()],
    waiting: Map::default(),
    queue: vec![],
  };

  for prod in 0..grammar.prods().len() {
    if prod == grammar.start_production() {
      continue;
    }
    nullable.advance(prod, 0);
  }

  while let Some(nt) = nullable.queue.pop() {
    if let Some(waiting) = nullable.waiting.remove(&nt) {
      for (prod, pos) in waiting {
        nullable.advance(prod, pos + 1);
      }
    }
  }

  nullable.nullable.iter_ones().collect()
}

struct Nullable<'a> {
  grammar: &'a Grammar,
  nullable: BitVec,
  /// non-terminal -> (production, position) blocked on it
  waiting: Map<SymbolId, Vec<(usize, usize)>>,
  queue: Vec<SymbolId>,
}

impl Nullable<'_> {
  /// Moves past nullable symbols of `prod` from `pos`. Parks the production
  /// on the first non-terminal not yet known nullable; a terminal ends it.
  fn advance(&mut self, prod: usize, mut pos: usize) {
    let prod_ref = self.grammar.production(prod);

    while let Some(&sym) = prod_ref.rhs.get(pos) {
      if self.grammar.is_terminal(sym) {
        return;
      }
      if !self.nullable[sym.index()] {
        self.waiting.entry(sym).or_default().push((prod, pos));
        return;
      }
      pos += 1;
    }

    let lhs = prod_ref.lhs;
    if !self.nullable[lhs.index()] {
      self.nullable.set(lhs.index(), true);
      self.queue.push(lhs);
    }
  }
}

pub(crate) fn compute_first(grammar: &Grammar, nullable: &BitSet) -> Vec<BitSet> {
  let mut direct = vec![BitSet::new(); grammar.num_symbols()];
  let mut edges = vec![];

  for t in grammar.terminals() {
    direct[t.index()].insert(t.index());
  }

  for prod in grammar.prods() {
    for &sym in &prod.rhs {
      if grammar.is_terminal(sym) {
        direct[prod.lhs.index()].insert(sym.index());
        break;
      }

      // FIRST(sym) flows into FIRST(lhs)
      edges.push((prod.lhs.index(), sym.index()));
      if !nullable.contains(sym.index()) {
        break;
      }
    }
  }

  merge_along_closures(direct, edges)
}

pub(crate) fn compute_follow(
  grammar: &Grammar,
  nullable: &BitSet,
  first: &[BitSet],
) -> Vec<BitSet> {
  let mut direct = vec![BitSet::new(); grammar.num_symbols()];
  let mut edges = vec![];

  direct[grammar.start_symbol().index()].insert(SymbolId::EOF.index());

  for prod in grammar.prods() {
    for (i, &sym) in prod.rhs.iter().enumerate() {
      if grammar.is_terminal(sym) {
        continue;
      }

      let mut rest_nullable = true;
      for &next in &prod.rhs[i + 1..] {
        direct[sym.index()].union_with(&first[next.index()]);
        if !nullable.contains(next.index()) {
          rest_nullable = false;
          break;
        }
      }

      // FOLLOW(lhs) flows into FOLLOW(sym)
      if rest_nullable && sym != prod.lhs {
        edges.push((sym.index(), prod.lhs.index()));
      }
    }
  }

  merge_along_closures(direct, edges)
}

/// `result[n]` is the union of `direct[m]` over every `m` in the closure of
/// `n`. Nodes sharing a closure share the computed union.
fn merge_along_closures(direct: Vec<BitSet>, edges: Vec<(usize, usize)>) -> Vec<BitSet> {
  let closures = Closures::new(edges);
  let mut merged = Map::<ClosureId, BitSet>::default();

  (0..direct.len())
    .map(|n| {
      match (closures.get(n), closures.id_of(n)) {
        (Some(closure), Some(id)) => {
          merged.entry(id)
            .or_insert_with(|| {
              let mut set = BitSet::new();
              for m in closure.iter() {
                set.union_with(&direct[m]);
              }
              set
            })
            .clone()
        }
        _ => direct[n].clone(),
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use crate::{build, Grammar};
  use pretty_assertions::assert_eq;

  fn names(grammar: &Grammar, set: &bit_set::BitSet) -> Vec<String> {
    let mut names = set.iter()
      .map(|i| grammar.symbol_name(crate::SymbolId::from_index(i)).to_owned())
      .collect::<Vec<_>>();
    names.sort();
    names
  }

  fn first_of(grammar: &Grammar, name: &str) -> Vec<String> {
    names(grammar, grammar.first(grammar.symbol_id(name).unwrap()))
  }

  fn follow_of(grammar: &Grammar, name: &str) -> Vec<String> {
    names(grammar, grammar.follow(grammar.symbol_id(name).unwrap()))
  }

  #[test]
  fn nullable() {
    let grammar = build("
A -> T
T -> E X | int
X -> q |
E -> | m
    ").unwrap();

    assert_eq!(names(&grammar, grammar.nullable()), vec!["A", "E", "T", "X"]);
  }

  #[test]
  fn nullable_chain_out_of_order() {
    let grammar = build("
S -> A B C d
A -> B C
B -> C
C ->
    ").unwrap();

    assert_eq!(names(&grammar, grammar.nullable()), vec!["A", "B", "C"]);
  }

  #[test]
  fn simple() {
    let grammar = build("
Z -> d | X Y Z
Y -> | c
X -> Y | a
    ").unwrap();

    assert_eq!(first_of(&grammar, "X"), vec!["a", "c"]);
    assert_eq!(first_of(&grammar, "Y"), vec!["c"]);
    assert_eq!(first_of(&grammar, "Z"), vec!["a", "c", "d"]);
    assert_eq!(first_of(&grammar, "c"), vec!["c"]);

    assert_eq!(follow_of(&grammar, "Z"), vec!["$"]);
    assert_eq!(follow_of(&grammar, "X"), vec!["a", "c", "d"]);
    assert_eq!(follow_of(&grammar, "Y"), vec!["a", "c", "d"]);
  }

  #[test]
  fn ll_expr() {
    let grammar = build("
E -> T E'
E' -> + T E' |
T -> F T'
T' -> * F T' |
F -> num | ( E )
    ").unwrap();

    assert_eq!(first_of(&grammar, "E"), vec!["(", "num"]);
    assert_eq!(first_of(&grammar, "E'"), vec!["+"]);
    assert_eq!(first_of(&grammar, "T'"), vec!["*"]);

    assert_eq!(follow_of(&grammar, "E"), vec!["$", ")"]);
    assert_eq!(follow_of(&grammar, "E'"), vec!["$", ")"]);
    assert_eq!(follow_of(&grammar, "T"), vec!["$", ")", "+"]);
    assert_eq!(follow_of(&grammar, "T'"), vec!["$", ")", "+"]);
    assert_eq!(follow_of(&grammar, "F"), vec!["$", ")", "*", "+"]);
  }

  #[test]
  fn left_recursive_cycle() {
    let grammar = build("
S -> A x
A -> B y | a
B -> A z | b
    ").unwrap();

    assert_eq!(first_of(&grammar, "A"), vec!["a", "b"]);
    assert_eq!(first_of(&grammar, "B"), vec!["a", "b"]);
    assert_eq!(follow_of(&grammar, "A"), vec!["x", "z"]);
    assert_eq!(follow_of(&grammar, "B"), vec!["y"]);
  }

  #[test]
  fn first_of_symbols() {
    let grammar = build("
S -> A B c
A -> a |
B -> b |
    ").unwrap();

    let a = grammar.symbol_id("A").unwrap();
    let b = grammar.symbol_id("B").unwrap();
    let c = grammar.symbol_id("c").unwrap();

    let (first, nullable) = grammar.first_of_symbols(&[a, b]);
    assert_eq!(names(&grammar, &first), vec!["a", "b"]);
    assert!(nullable);

    let (first, nullable) = grammar.first_of_symbols(&[b, c, a]);
    assert_eq!(names(&grammar, &first), vec!["b", "c"]);
    assert!(!nullable);
  }
}
