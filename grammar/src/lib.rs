use thiserror::Error;

pub mod closure;
pub mod automaton;
mod grammar;
mod grammar_parser;
mod first;
mod left_factor;
mod names;

pub use self::grammar::*;
pub use grammar_parser::{build, build_with};
pub use names::NameGen;

pub type Map<K, V> = fnv::FnvHashMap<K, V>;
pub type Set<K> = fnv::FnvHashSet<K>;
pub type BiMap<L, R> = bimap::BiMap<L, R>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
  #[error("syntax error at line {line}: {message}")]
  Syntax {
    line: usize,
    message: String,
  },
  #[error("reserved name `{name}` at line {line}")]
  ReservedName {
    line: usize,
    name: String,
  },
  #[error("non-terminal `{0}` is never defined")]
  UndefinedNonterminal(String),
  #[error("non-terminal `{0}` is unreachable from the start symbol")]
  UnreachableNonterminal(String),
  #[error("grammar has no productions")]
  Empty,
}
