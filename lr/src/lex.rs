//! A whitespace-separated token reader for driving parse tables by hand.
//!
//! Each word is either a terminal name (`+`, `$`) or `terminal:text`
//! (`int:42`). Unknown words become a [`LexError`] in the stream.

use crate::parse::{LexError, SourceArea, Token};
use crate::table::ParseTable;

pub struct Words<'a> {
  table: &'a ParseTable,
  input: &'a str,
  pos: usize,
}

impl<'a> Words<'a> {
  pub fn new(table: &'a ParseTable, input: &'a str) -> Self {
    Self {
      table,
      input,
      pos: 0,
    }
  }

  fn token(&self, word: &str, area: SourceArea) -> Result<Token, LexError> {
    if let Some(symbol) = self.table.terminal(word) {
      return Ok(Token {
        symbol,
        text: word.to_owned(),
        area,
      });
    }

    if let Some((name, text)) = word.split_once(':') {
      if let Some(symbol) = self.table.terminal(name) {
        return Ok(Token {
          symbol,
          text: text.to_owned(),
          area,
        });
      }
    }

    Err(LexError {
      message: format!("unknown terminal `{}`", word),
      area,
    })
  }
}

impl Iterator for Words<'_> {
  type Item = Result<Token, LexError>;

  fn next(&mut self) -> Option<Self::Item> {
    let rest = &self.input[self.pos..];
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
      self.pos = self.input.len();
      return None;
    }

    let start = self.pos + (rest.len() - trimmed.len());
    let len = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    let end = start + len;
    self.pos = end;

    Some(self.token(&self.input[start..end], SourceArea { start, end }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn words() {
    let grammar = grammar::build("
E -> int + E | int
    ").unwrap();
    let table = crate::build(&grammar, crate::ParserKind::Slr);

    let tokens = Words::new(&table, "  int:12 +\tint $ bad").collect::<Vec<_>>();
    let int = grammar.symbol_id("int").unwrap();
    let plus = grammar.symbol_id("+").unwrap();

    assert_eq!(tokens, vec![
      Ok(Token { symbol: int, text: "12".to_owned(), area: SourceArea { start: 2, end: 8 } }),
      Ok(Token { symbol: plus, text: "+".to_owned(), area: SourceArea { start: 9, end: 10 } }),
      Ok(Token { symbol: int, text: "int".to_owned(), area: SourceArea { start: 11, end: 14 } }),
      Ok(Token { symbol: grammar::SymbolId::EOF, text: "$".to_owned(), area: SourceArea { start: 15, end: 16 } }),
      Err(LexError { message: "unknown terminal `bad`".to_owned(), area: SourceArea { start: 17, end: 20 } }),
    ]);
  }

  #[test]
  fn nonterminals_are_not_words() {
    let grammar = grammar::build("
E -> x
    ").unwrap();
    let table = crate::build(&grammar, crate::ParserKind::Slr);

    assert!(Words::new(&table, "E").next().unwrap().is_err());
    assert!(Words::new(&table, "E:x").next().unwrap().is_err());
  }
}
