//! Wire-cutting rules.

use crate::module::WireColor;

/// When a wire rule applies, evaluated over the uncut wires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireCondition {
    /// No wire of this color.
    NoneOf(WireColor),
    /// Exactly one wire of this color.
    ExactlyOne(WireColor),
    /// More wires of `more` than of `than`.
    MoreThan {
        /// The color that must outnumber.
        more: WireColor,
        /// The color it is compared against.
        than: WireColor,
    },
    /// The last wire has this color and there are at least `min_wires`.
    LastIs {
        /// Required color of the last wire.
        color: WireColor,
        /// Minimum number of wires.
        min_wires: usize,
    },
    /// Always applies. Marks a fallback rule.
    Always,
}

impl WireCondition {
    /// Whether the condition holds for `wires`.
    pub fn holds(self, wires: &[WireColor]) -> bool {
        let count = |color: WireColor| wires.iter().filter(|&&c| c == color).count();
        match self {
            Self::NoneOf(color) => count(color) == 0,
            Self::ExactlyOne(color) => count(color) == 1,
            Self::MoreThan { more, than } => count(more) > count(than),
            Self::LastIs { color, min_wires } => {
                wires.last() == Some(&color) && wires.len() >= min_wires
            }
            Self::Always => true,
        }
    }
}

/// Which wire a rule says to cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireTarget {
    /// The wire at this 0-based position.
    Nth(usize),
    /// The first wire of this color.
    FirstOf(WireColor),
    /// The last wire of this color.
    LastOf(WireColor),
}

impl WireTarget {
    /// Resolve to an index into `wires`, or `None` if no wire matches.
    ///
    /// `Nth` is returned as-is; callers bound-check it.
    pub fn resolve(self, wires: &[WireColor]) -> Option<usize> {
        match self {
            Self::Nth(n) => Some(n),
            Self::FirstOf(color) => wires.iter().position(|&c| c == color),
            Self::LastOf(color) => wires.iter().rposition(|&c| c == color),
        }
    }
}

/// One wire rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireRule {
    /// Manual text.
    pub description: &'static str,
    /// When the rule applies.
    pub condition: WireCondition,
    /// Which wire to cut when it does.
    pub target: WireTarget,
}

impl WireRule {
    /// Whether this is an unconditional fallback.
    pub fn is_fallback(&self) -> bool {
        self.condition == WireCondition::Always
    }
}

/// The wire rule pool. Each module draws three conditional rules and one
/// fallback from it.
pub const WIRE_RULES: &[WireRule] = &[
    WireRule {
        description: "IF there are no red wires, CUT the second wire.",
        condition: WireCondition::NoneOf(WireColor::Red),
        target: WireTarget::Nth(1),
    },
    WireRule {
        description: "IF there is exactly one blue wire, CUT the last white wire.",
        condition: WireCondition::ExactlyOne(WireColor::Blue),
        target: WireTarget::LastOf(WireColor::White),
    },
    WireRule {
        description: "IF there are more yellow than white wires, CUT the first yellow wire.",
        condition: WireCondition::MoreThan {
            more: WireColor::Yellow,
            than: WireColor::White,
        },
        target: WireTarget::FirstOf(WireColor::Yellow),
    },
    WireRule {
        description: "IF the last wire is black, CUT the fourth wire.",
        condition: WireCondition::LastIs {
            color: WireColor::Black,
            min_wires: 4,
        },
        target: WireTarget::Nth(3),
    },
    WireRule {
        description: "OTHERWISE, CUT the last red wire.",
        condition: WireCondition::Always,
        target: WireTarget::LastOf(WireColor::Red),
    },
    WireRule {
        description: "OTHERWISE, CUT the first wire.",
        condition: WireCondition::Always,
        target: WireTarget::Nth(0),
    },
];

/// The conditional (non-fallback) wire rules.
pub fn conditional_rules() -> impl Iterator<Item = &'static WireRule> {
    WIRE_RULES.iter().filter(|r| !r.is_fallback())
}

/// The fallback wire rules.
pub fn fallback_rules() -> impl Iterator<Item = &'static WireRule> {
    WIRE_RULES.iter().filter(|r| r.is_fallback())
}

#[cfg(test)]
mod tests {
    use super::*;
    use WireColor::*;

    #[test]
    fn pool_shape() {
        assert_eq!(conditional_rules().count(), 4);
        assert_eq!(fallback_rules().count(), 2);
        for rule in fallback_rules() {
            assert!(rule.description.starts_with("OTHERWISE"));
        }
    }

    #[test]
    fn none_of() {
        assert!(WireCondition::NoneOf(Red).holds(&[Blue, White, Black, Yellow]));
        assert!(!WireCondition::NoneOf(Red).holds(&[Blue, Red]));
    }

    #[test]
    fn exactly_one() {
        assert!(WireCondition::ExactlyOne(Blue).holds(&[Blue, Red]));
        assert!(!WireCondition::ExactlyOne(Blue).holds(&[Blue, Blue]));
        assert!(!WireCondition::ExactlyOne(Blue).holds(&[Red]));
    }

    #[test]
    fn more_than() {
        let cond = WireCondition::MoreThan {
            more: Yellow,
            than: White,
        };
        assert!(cond.holds(&[Yellow, Red, Red, Red]));
        assert!(!cond.holds(&[Yellow, White, Red, Red]));
    }

    #[test]
    fn last_is_requires_length() {
        let cond = WireCondition::LastIs {
            color: Black,
            min_wires: 4,
        };
        assert!(cond.holds(&[Red, Red, Red, Black]));
        assert!(!cond.holds(&[Red, Red, Black]));
        assert!(!cond.holds(&[Red, Red, Black, Red]));
    }

    #[test]
    fn targets() {
        let wires = [Red, White, Yellow, White, Yellow];
        assert_eq!(WireTarget::Nth(3).resolve(&wires), Some(3));
        assert_eq!(WireTarget::FirstOf(Yellow).resolve(&wires), Some(2));
        assert_eq!(WireTarget::LastOf(White).resolve(&wires), Some(3));
        assert_eq!(WireTarget::LastOf(Black).resolve(&wires), None);
    }
}
