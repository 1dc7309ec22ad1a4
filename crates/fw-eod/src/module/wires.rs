//! The wire-cutting module.

use serde::{Deserialize, Serialize};

use crate::catalog::WireRule;
use crate::manual::ManualSection;

/// Wire colors. Wires are drawn uniformly from all five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireColor {
    /// Red.
    Red,
    /// Blue.
    Blue,
    /// Yellow.
    Yellow,
    /// White.
    White,
    /// Black.
    Black,
}

impl WireColor {
    /// The full palette.
    pub const ALL: [Self; 5] = [Self::Red, Self::Blue, Self::Yellow, Self::White, Self::Black];
}

impl std::fmt::Display for WireColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Blue => write!(f, "blue"),
            Self::Yellow => write!(f, "yellow"),
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

/// A wires module: a row of colored wires, exactly one of which is correct.
#[derive(Debug, Clone)]
pub struct WiresModule {
    wires: Vec<WireColor>,
    cut: Vec<usize>,
    rules: Vec<WireRule>,
    solved: bool,
}

impl WiresModule {
    /// Build a module from its wires and rules in resolution order. The rule
    /// list should end in a fallback.
    pub fn new(wires: Vec<WireColor>, rules: Vec<WireRule>) -> Self {
        Self {
            wires,
            cut: Vec::new(),
            rules,
            solved: false,
        }
    }

    /// All wires, cut or not, in position order.
    pub fn wires(&self) -> &[WireColor] {
        &self.wires
    }

    /// Positions of wires already cut.
    pub fn cut_positions(&self) -> &[usize] {
        &self.cut
    }

    /// Whether the wire at `index` has been cut.
    pub fn is_cut(&self, index: usize) -> bool {
        self.cut.contains(&index)
    }

    /// The chosen rules in resolution order.
    pub fn rules(&self) -> &[WireRule] {
        &self.rules
    }

    /// Whether the correct wire has been cut.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// The absolute position of the wire to cut, or `None` if the first
    /// applicable rule points at no wire.
    ///
    /// Rules are evaluated in order against the uncut wires only. The first
    /// rule whose condition holds decides: its target indexes into the
    /// uncut wires and is mapped back to the absolute position. A target
    /// that doesn't exist (no wire of the color, or past the end) leaves the
    /// module without a correct wire; no later rule is consulted.
    pub fn correct_wire(&self) -> Option<usize> {
        let active: Vec<(usize, WireColor)> = self
            .wires
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| !self.is_cut(*i))
            .collect();
        let colors: Vec<WireColor> = active.iter().map(|(_, c)| *c).collect();

        let rule = self.rules.iter().find(|r| r.condition.holds(&colors))?;
        rule.target
            .resolve(&colors)
            .and_then(|i| active.get(i))
            .map(|(pos, _)| *pos)
    }

    pub(crate) fn cut(&mut self, index: usize) {
        if !self.is_cut(index) {
            self.cut.push(index);
        }
    }

    pub(crate) fn mark_solved(&mut self) {
        self.solved = true;
    }

    /// The manual section for the chosen rules.
    pub fn manual(&self) -> ManualSection {
        ManualSection {
            title: "WIRES".to_string(),
            rules: self.rules.iter().map(|r| r.description.to_string()).collect(),
            note: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WIRE_RULES;
    use WireColor::*;

    fn rule(prefix: &str) -> WireRule {
        *WIRE_RULES
            .iter()
            .find(|r| r.description.starts_with(prefix))
            .unwrap()
    }

    #[test]
    fn first_applicable_rule_wins() {
        let m = WiresModule::new(
            vec![Blue, White, Blue, Black],
            vec![
                rule("IF there are no red"),
                rule("IF the last wire is black"),
                rule("OTHERWISE, CUT the first"),
            ],
        );
        // No red wires: the second wire.
        assert_eq!(m.correct_wire(), Some(1));
    }

    #[test]
    fn falls_through_to_fallback() {
        let m = WiresModule::new(
            vec![Red, Red, Blue, Blue],
            vec![
                rule("IF there are no red"),
                rule("IF there is exactly one blue"),
                rule("OTHERWISE, CUT the last red"),
            ],
        );
        assert_eq!(m.correct_wire(), Some(1));
    }

    #[test]
    fn unresolvable_target_yields_no_correct_wire() {
        // Exactly one blue and no white wire: "last white wire" points nowhere.
        let m = WiresModule::new(
            vec![Red, Blue, Red, Black],
            vec![
                rule("IF there is exactly one blue"),
                rule("OTHERWISE, CUT the first"),
            ],
        );
        assert_eq!(m.correct_wire(), None);
    }

    #[test]
    fn fallback_with_missing_color_yields_none() {
        let m = WiresModule::new(
            vec![Blue, Blue, Yellow, White],
            vec![rule("OTHERWISE, CUT the last red")],
        );
        assert_eq!(m.correct_wire(), None);
    }

    #[test]
    fn cut_wires_are_skipped() {
        let mut m = WiresModule::new(
            vec![Yellow, White, Black, Blue, Red],
            vec![rule("OTHERWISE, CUT the first")],
        );
        assert_eq!(m.correct_wire(), Some(0));
        m.cut(0);
        m.cut(0);
        assert_eq!(m.cut_positions(), &[0]);
        assert_eq!(m.correct_wire(), Some(1));
    }

    #[test]
    fn nth_target_maps_back_to_absolute_position() {
        let mut m = WiresModule::new(
            vec![Blue, Yellow, White, Blue, Black],
            vec![rule("IF there are no red")],
        );
        m.cut(0);
        // Uncut: [Yellow@1, White@2, Blue@3, Black@4]; second uncut is position 2.
        assert_eq!(m.correct_wire(), Some(2));
    }

    #[test]
    fn manual_matches_rule_order() {
        let rules = vec![
            rule("IF the last wire is black"),
            rule("IF there are no red"),
            rule("OTHERWISE, CUT the first"),
        ];
        let m = WiresModule::new(vec![Red, Red, Red, Red], rules.clone());
        let manual = m.manual();
        assert_eq!(manual.title, "WIRES");
        let expected: Vec<String> = rules.iter().map(|r| r.description.to_string()).collect();
        assert_eq!(manual.rules, expected);
    }

    #[test]
    fn color_display() {
        assert_eq!(Red.to_string(), "red");
        assert_eq!(Black.to_string(), "black");
    }
}
