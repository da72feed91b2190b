use std::fmt;
use std::str::FromStr;
use grammar::Grammar;
use thiserror::Error;

mod item;
mod lr0;
mod table;
mod slr;
mod lalr;
mod clr;
mod parse;
pub mod lex;
pub mod report;

pub use item::{Lr0Item, Lr0Items, ItemDisplay, lr1_key, split_lr1_key};
pub use lr0::Lr0Automaton;
pub use clr::Lr1Automaton;
pub use table::{
  ParseAction,
  ParseTable,
  ConflictError,
  ShiftReduceConflictError,
  ReduceReduceConflictError,
};
pub use parse::{ParseTree, TreeDisplay, Token, SourceArea, LexError, ParseError};
pub use slr::build_slr;
pub use lalr::build_lalr;
pub use clr::build_clr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserKind {
  Slr,
  Lalr,
  Clr,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown parser kind `{0}`, expected one of SLR, LALR, LR")]
pub struct UnknownParserKind(pub String);

impl FromStr for ParserKind {
  type Err = UnknownParserKind;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "slr" | "slr1" => Ok(ParserKind::Slr),
      "lalr" | "lalr1" => Ok(ParserKind::Lalr),
      "lr" | "lr1" | "clr" => Ok(ParserKind::Clr),
      _ => Err(UnknownParserKind(s.to_owned())),
    }
  }
}

impl fmt::Display for ParserKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      ParserKind::Slr => write!(f, "SLR(1)"),
      ParserKind::Lalr => write!(f, "LALR(1)"),
      ParserKind::Clr => write!(f, "LR(1)"),
    }
  }
}

/// Builds the parse table of `grammar`. Conflicts do not fail the build;
/// check [`ParseTable::is_valid`] before parsing.
pub fn build(grammar: &Grammar, kind: ParserKind) -> ParseTable {
  match kind {
    ParserKind::Slr => build_slr(grammar),
    ParserKind::Lalr => build_lalr(grammar),
    ParserKind::Clr => build_clr(grammar),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parser_kinds() {
    assert_eq!("SLR".parse::<ParserKind>(), Ok(ParserKind::Slr));
    assert_eq!("lalr".parse::<ParserKind>(), Ok(ParserKind::Lalr));
    assert_eq!("LR1".parse::<ParserKind>(), Ok(ParserKind::Clr));
    assert_eq!("Clr".parse::<ParserKind>(), Ok(ParserKind::Clr));
    assert_eq!("ll".parse::<ParserKind>(), Err(UnknownParserKind("ll".to_owned())));
  }
}
