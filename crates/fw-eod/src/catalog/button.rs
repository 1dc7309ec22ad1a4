//! Button rules.

use crate::catalog::RuleContext;
use crate::module::{ButtonAction, ButtonColor, ButtonLabel, ModuleKind, WireColor};

/// When a button rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonCondition {
    /// The button has this color and label.
    Is {
        /// Required color.
        color: ButtonColor,
        /// Required label.
        label: ButtonLabel,
    },
    /// The serial contains a vowel.
    SerialHasVowel,
    /// More than `count` wires of `color`.
    WiresMoreThan {
        /// Wire color to count.
        color: WireColor,
        /// Count to exceed.
        count: u32,
    },
    /// Always applies.
    Always,
}

impl ButtonCondition {
    /// Whether the condition holds for a button of `color`/`label` on the
    /// device described by `ctx`.
    pub fn holds(self, color: ButtonColor, label: ButtonLabel, ctx: &RuleContext<'_>) -> bool {
        match self {
            Self::Is {
                color: c,
                label: l,
            } => color == c && label == l,
            Self::SerialHasVowel => ctx.serial_vowels() > 0,
            Self::WiresMoreThan { color, count } => ctx.wire_count(color) > count,
            Self::Always => true,
        }
    }
}

/// One button rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonRule {
    /// Manual text.
    pub description: &'static str,
    /// Module kind the rule reads from, if any.
    pub depends: Option<ModuleKind>,
    /// When the rule applies.
    pub condition: ButtonCondition,
    /// What to do when it does.
    pub action: ButtonAction,
}

/// The button rules in priority order. The last one always applies.
pub const BUTTON_RULES: &[ButtonRule] = &[
    ButtonRule {
        description: "IF the button is BLUE and says 'ABORT', PRESS AND HOLD.",
        depends: None,
        condition: ButtonCondition::Is {
            color: ButtonColor::Blue,
            label: ButtonLabel::Abort,
        },
        action: ButtonAction::Hold,
    },
    ButtonRule {
        description: "IF the serial number contains a vowel, PRESS AND RELEASE.",
        depends: None,
        condition: ButtonCondition::SerialHasVowel,
        action: ButtonAction::Release,
    },
    ButtonRule {
        description: "IF there are more than 2 RED wires, PRESS AND RELEASE.",
        depends: Some(ModuleKind::Wires),
        condition: ButtonCondition::WiresMoreThan {
            color: WireColor::Red,
            count: 2,
        },
        action: ButtonAction::Release,
    },
    ButtonRule {
        description: "OTHERWISE, PRESS AND HOLD.",
        depends: None,
        condition: ButtonCondition::Always,
        action: ButtonAction::Hold,
    },
];
