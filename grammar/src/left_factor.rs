use std::borrow::Cow;
use crate::{Grammar, GrammarError, NameGen, Rule, Set};

impl Grammar {
  /// Pulls common prefixes of alternatives into fresh non-terminals:
  /// `A -> a b | a c` becomes `A -> a A'`, `A' -> b | c`, recursively.
  ///
  /// Returns the grammar itself when no two alternatives of a non-terminal
  /// start with the same symbol.
  pub fn left_factored(&self, names: &mut NameGen) -> Result<Cow<'_, Grammar>, GrammarError> {
    let mut factor = Factor {
      grammar: self,
      names: &mut *names,
      generated: Set::default(),
      rules: vec![],
    };

    let mut changed = false;
    for rule in self.rules() {
      changed |= factor.rule(rule);
    }

    if !changed {
      return Ok(Cow::Borrowed(self));
    }

    let rules = factor.rules;
    log::debug!("left factoring added {} non-terminals", rules.len() - self.rules().len());

    Grammar::with_reserved(&rules, names).map(Cow::Owned)
  }
}

struct Factor<'a> {
  grammar: &'a Grammar,
  names: &'a mut NameGen,
  generated: Set<String>,
  rules: Vec<Rule>,
}

impl Factor<'_> {
  /// Returns whether the rule had to be split.
  fn rule(&mut self, rule: Rule) -> bool {
    let Rule { lhs, alts, line } = rule;

    // alternatives grouped by their first symbol, in order of appearance
    let mut groups: Vec<Vec<Vec<String>>> = vec![];
    for alt in alts {
      let group = groups.iter_mut().find(|group| {
        !alt.is_empty() && group[0].first() == alt.first()
      });
      match group {
        Some(group) => group.push(alt),
        None => groups.push(vec![alt]),
      }
    }

    if groups.iter().all(|group| group.len() == 1) {
      self.rules.push(Rule {
        lhs,
        alts: groups.into_iter().flatten().collect(),
        line,
      });
      return false;
    }

    let index = self.rules.len();
    self.rules.push(Rule {
      lhs: lhs.clone(),
      alts: vec![],
      line,
    });

    let mut alts = vec![];
    for mut group in groups {
      if group.len() == 1 {
        alts.extend(group.pop());
        continue;
      }

      let prefix_len = common_prefix_len(&group);
      let mut alt = group[0][..prefix_len].to_vec();
      let tail = self.fresh_name(&lhs);
      alt.push(tail.clone());
      alts.push(alt);

      let tails = group.into_iter()
        .map(|alt| alt[prefix_len..].to_vec())
        .collect();
      self.rule(Rule {
        lhs: tail,
        alts: tails,
        line,
      });
    }

    self.rules[index].alts = alts;
    true
  }

  fn fresh_name(&mut self, base: &str) -> String {
    loop {
      let name = self.names.fresh(base);
      if self.grammar.symbol_id(&name).is_none() && self.generated.insert(name.clone()) {
        return name;
      }
    }
  }
}

fn common_prefix_len(alts: &[Vec<String>]) -> usize {
  let first = &alts[0];
  (0..first.len())
    .take_while(|&i| alts[1..].iter().all(|alt| alt.get(i) == Some(&first[i])))
    .count()
}
