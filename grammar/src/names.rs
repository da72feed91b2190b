/// Generates the names of synthetic non-terminals and recognizes them.
///
/// Every name starting with the prefix is reserved: user grammars may not
/// use it, and any reserved name is a non-terminal.
#[derive(Debug, Clone)]
pub struct NameGen {
  prefix: String,
  counter: usize,
}

impl NameGen {
  pub fn new(prefix: impl Into<String>) -> Self {
    Self {
      prefix: prefix.into(),
      counter: 0,
    }
  }

  pub fn prefix(&self) -> &str {
    &self.prefix
  }

  pub fn is_reserved(&self, name: &str) -> bool {
    name.starts_with(&self.prefix)
  }

  pub fn is_nonterminal(&self, name: &str) -> bool {
    self.is_reserved(name) || name.chars().next().map_or(false, char::is_uppercase)
  }

  pub fn start_name(&self) -> String {
    format!("{}START", self.prefix)
  }

  pub fn fresh(&mut self, base: &str) -> String {
    self.counter += 1;
    let base = base.strip_prefix(self.prefix.as_str()).unwrap_or(base);
    format!("{}{}_{}", self.prefix, base, self.counter)
  }
}

impl Default for NameGen {
  fn default() -> Self {
    Self::new("__")
  }
}
