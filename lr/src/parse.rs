use std::fmt;
use grammar::automaton::State;
use grammar::SymbolId;
use itertools::Itertools;
use thiserror::Error;
use crate::table::{ParseAction, ParseTable};

/// Byte range of a token in its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceArea {
  pub start: usize,
  pub end: usize,
}

impl fmt::Display for SourceArea {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}..{}", self.start, self.end)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub symbol: SymbolId,
  pub text: String,
  pub area: SourceArea,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {area}")]
pub struct LexError {
  pub message: String,
  pub area: SourceArea,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error(transparent)]
  Lex(#[from] LexError),
  #[error("unexpected `{symbol}` in state {state} at {area}")]
  NotAcceptable {
    state: usize,
    symbol: String,
    area: SourceArea,
  },
  #[error("unexpected end of input")]
  NeedMoreTokens {
    area: Option<SourceArea>,
  },
}

impl ParseError {
  pub fn area(&self) -> Option<SourceArea> {
    match self {
      ParseError::Lex(err) => Some(err.area),
      ParseError::NotAcceptable { area, .. } => Some(*area),
      ParseError::NeedMoreTokens { area } => *area,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree {
  Term {
    symbol: SymbolId,
    token: Token,
  },
  Mid {
    symbol: SymbolId,
    prod: usize,
    children: Vec<ParseTree>,
  },
}

impl ParseTree {
  pub fn symbol(&self) -> SymbolId {
    match self {
      ParseTree::Term { symbol, .. } => *symbol,
      ParseTree::Mid { symbol, .. } => *symbol,
    }
  }

  /// Renders the tree as `E[T[int 1], +, E[...]]`, naming symbols through
  /// `table`.
  pub fn display<'a>(&'a self, table: &'a ParseTable) -> TreeDisplay<'a> {
    TreeDisplay {
      tree: self,
      table,
    }
  }
}

pub struct TreeDisplay<'a> {
  tree: &'a ParseTree,
  table: &'a ParseTable,
}

impl fmt::Display for TreeDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = self.table.symbol_name(self.tree.symbol());

    match self.tree {
      ParseTree::Term { token, .. } => {
        if token.text == name {
          write!(f, "{}", name)
        } else {
          write!(f, "{} {}", name, token.text)
        }
      }
      ParseTree::Mid { children, .. } => {
        let children = children.iter().map(|child| child.display(self.table));
        write!(f, "{}[{}]", name, children.format(", "))
      }
    }
  }
}

impl ParseTable {
  /// Runs the shift-reduce loop over `tokens`, which must end with `$`.
  ///
  /// # Panics
  ///
  /// Panics if the table has conflicts.
  pub fn parse<I>(&self, tokens: I) -> Result<ParseTree, ParseError>
    where I: IntoIterator<Item = Result<Token, LexError>>
  {
    assert!(self.is_valid(), "cannot parse with a conflicting {} table", self.kind());

    let mut tokens = tokens.into_iter();
    let mut last_area = None;

    // `states` has one more entry than `nodes`: the start state at the bottom
    let mut states = vec![self.start_state()];
    let mut nodes: Vec<ParseTree> = vec![];

    let mut token = next_token(&mut tokens, last_area)?;

    loop {
      let state = *states.last().expect("the start state is never popped");

      let action = match self.actions(state, token.symbol) {
        [] => {
          return Err(ParseError::NotAcceptable {
            state: state.id(),
            symbol: self.symbol_name(token.symbol).to_owned(),
            area: token.area,
          });
        }
        [action] => *action,
        _ => panic!("ambiguous cell in state {} on `{}`", state, self.symbol_name(token.symbol)),
      };

      match action {
        ParseAction::Shift(to) => {
          log::trace!("shift `{}`, goto {}", self.symbol_name(token.symbol), to);

          last_area = Some(token.area);
          states.push(to);
          nodes.push(ParseTree::Term {
            symbol: token.symbol,
            token,
          });
          token = next_token(&mut tokens, last_area)?;
        }
        ParseAction::Reduce { lhs, rhs_len, prod } => {
          let children = nodes.split_off(nodes.len() - rhs_len);
          states.truncate(states.len() - rhs_len);

          let exposed = *states.last().expect("the start state is never popped");
          let to = self.goto(exposed, lhs);

          log::trace!("reduce {}, goto {}", self.production_text(prod), to);

          states.push(to);
          nodes.push(ParseTree::Mid {
            symbol: lhs,
            prod,
            children,
          });
        }
        ParseAction::Accept => {
          log::trace!("accept");

          if nodes.len() != 1 {
            return Err(ParseError::NeedMoreTokens {
              area: Some(token.area),
            });
          }
          return Ok(nodes.remove(0));
        }
      }
    }
  }

  fn goto(&self, state: State, nt: SymbolId) -> State {
    match self.actions(state, nt) {
      [ParseAction::Shift(to)] => *to,
      actions => panic!("no goto from state {} on `{}`: {:?}", state, self.symbol_name(nt), actions),
    }
  }
}

fn next_token<I>(tokens: &mut I, last_area: Option<SourceArea>) -> Result<Token, ParseError>
  where I: Iterator<Item = Result<Token, LexError>>
{
  match tokens.next() {
    Some(token) => Ok(token?),
    None => Err(ParseError::NeedMoreTokens {
      area: last_area,
    }),
  }
}
