//! Ordered keyword and regex rules.
//!
//! Intent classification and enum extraction are both expressed as a
//! [`RuleSet`]: an ordered list of `{pattern, target}` pairs evaluated against
//! the lowercased utterance. Input is not diacritic-normalized, so a rule only
//! fires for the spelling it lists.

use regex::Regex;

#[derive(Debug, Clone)]
pub enum Pattern {
    /// Substring match against the lowercased utterance.
    Contains(String),
    /// Regex match against the lowercased utterance.
    Regex(Regex),
}

impl Pattern {
    pub fn contains(keyword: &str) -> Self {
        Pattern::Contains(keyword.to_lowercase())
    }

    pub fn is_match(&self, lowered: &str) -> bool {
        match self {
            Pattern::Contains(keyword) => lowered.contains(keyword.as_str()),
            Pattern::Regex(re) => re.is_match(lowered),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule<T> {
    pub pattern: Pattern,
    pub target: T,
}

#[derive(Debug, Clone)]
pub struct RuleSet<T> {
    rules: Vec<Rule<T>>,
}

impl<T: Copy + PartialEq> RuleSet<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds one substring rule per keyword.
    pub fn keywords(mut self, target: T, keywords: &[&str]) -> Self {
        self.rules.extend(keywords.iter().map(|k| Rule {
            pattern: Pattern::contains(k),
            target,
        }));
        self
    }

    /// Adds a regex rule. The regex sees lowercased input.
    pub fn regex(mut self, target: T, regex: Regex) -> Self {
        self.rules.push(Rule {
            pattern: Pattern::Regex(regex),
            target,
        });
        self
    }

    pub fn push(&mut self, rule: Rule<T>) {
        self.rules.push(rule);
    }

    /// Target of the first rule that matches.
    pub fn first_match(&self, text: &str) -> Option<T> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(&lowered))
            .map(|rule| rule.target)
    }

    /// Every distinct target with at least one matching rule, in rule order.
    pub fn all_matches(&self, text: &str) -> Vec<T> {
        let lowered = text.to_lowercase();
        let mut targets: Vec<T> = Vec::new();
        for rule in &self.rules {
            if !targets.contains(&rule.target) && rule.pattern.is_match(&lowered) {
                targets.push(rule.target);
            }
        }
        targets
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T: Copy + PartialEq> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
