//! The code-entry keypad module.

use crate::catalog::KeypadRule;
use crate::manual::ManualSection;

/// A keypad module: enter the four-digit code derived from the manual.
#[derive(Debug, Clone)]
pub struct KeypadModule {
    code: String,
    entry: String,
    rules: Vec<KeypadRule>,
    solved: bool,
}

impl KeypadModule {
    /// Build a module from its derived code and the rules that produced it,
    /// in code-position order.
    pub fn new(code: String, rules: Vec<KeypadRule>) -> Self {
        Self {
            code,
            entry: String::new(),
            rules,
            solved: false,
        }
    }

    /// The correct code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// What has been typed so far.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// The chosen rules, one per position.
    pub fn rules(&self) -> &[KeypadRule] {
        &self.rules
    }

    /// Whether the correct code has been submitted.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Append a digit. Ignored once the entry is as long as the code.
    pub(crate) fn push_digit(&mut self, digit: char) -> bool {
        if self.entry.chars().count() < self.code.chars().count() {
            self.entry.push(digit);
            true
        } else {
            false
        }
    }

    pub(crate) fn clear_entry(&mut self) {
        self.entry.clear();
    }

    pub(crate) fn entry_matches(&self) -> bool {
        self.entry == self.code
    }

    pub(crate) fn mark_solved(&mut self) {
        self.solved = true;
    }

    /// The manual section for the chosen rules.
    pub fn manual(&self) -> ManualSection {
        ManualSection {
            title: "KEYPAD (4 DIGITS)".to_string(),
            rules: self.rules.iter().map(|r| r.description.to_string()).collect(),
            note: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_capped_at_code_length() {
        let mut m = KeypadModule::new("1234".to_string(), Vec::new());
        for d in ['1', '2', '3', '4', '5'] {
            m.push_digit(d);
        }
        assert_eq!(m.entry(), "1234");
        assert!(m.entry_matches());
    }

    #[test]
    fn clear_resets_entry() {
        let mut m = KeypadModule::new("0007".to_string(), Vec::new());
        assert!(m.push_digit('9'));
        m.clear_entry();
        assert_eq!(m.entry(), "");
        assert!(!m.entry_matches());
    }
}
