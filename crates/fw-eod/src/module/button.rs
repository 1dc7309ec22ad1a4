//! The big-button module.

use serde::{Deserialize, Serialize};

use crate::catalog::{ButtonRule, RuleContext};
use crate::manual::ManualSection;

/// Button colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonColor {
    /// Red.
    Red,
    /// Blue.
    Blue,
    /// White.
    White,
    /// Yellow.
    Yellow,
}

impl ButtonColor {
    /// Every color.
    pub const ALL: [Self; 4] = [Self::Red, Self::Blue, Self::White, Self::Yellow];
}

impl std::fmt::Display for ButtonColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Blue => write!(f, "blue"),
            Self::White => write!(f, "white"),
            Self::Yellow => write!(f, "yellow"),
        }
    }
}

/// Button labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonLabel {
    /// "DETONATE".
    Detonate,
    /// "ABORT".
    Abort,
    /// "HOLD".
    Hold,
    /// "PRESS".
    Press,
}

impl ButtonLabel {
    /// Every label.
    pub const ALL: [Self; 4] = [Self::Detonate, Self::Abort, Self::Hold, Self::Press];
}

impl std::fmt::Display for ButtonLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detonate => write!(f, "DETONATE"),
            Self::Abort => write!(f, "ABORT"),
            Self::Hold => write!(f, "HOLD"),
            Self::Press => write!(f, "PRESS"),
        }
    }
}

/// The correct way to work the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonAction {
    /// Hold, then release when the timer shows the release digit.
    Hold,
    /// Press and release; timing doesn't matter.
    Release,
}

impl std::fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hold => write!(f, "hold"),
            Self::Release => write!(f, "release"),
        }
    }
}

/// A button module.
#[derive(Debug, Clone)]
pub struct ButtonModule {
    color: ButtonColor,
    label: ButtonLabel,
    rules: Vec<ButtonRule>,
    release_digit: u8,
    held: bool,
    solved: bool,
}

impl ButtonModule {
    /// Build a module. `rules` are the eligible rules in priority order and
    /// should end in the unconditional one.
    pub fn new(
        color: ButtonColor,
        label: ButtonLabel,
        rules: Vec<ButtonRule>,
        release_digit: u8,
    ) -> Self {
        Self {
            color,
            label,
            rules,
            release_digit,
            held: false,
            solved: false,
        }
    }

    /// The button's color.
    pub fn color(&self) -> ButtonColor {
        self.color
    }

    /// The button's label.
    pub fn label(&self) -> ButtonLabel {
        self.label
    }

    /// The eligible rules in priority order.
    pub fn rules(&self) -> &[ButtonRule] {
        &self.rules
    }

    /// The digit (1-6) the timer must show when a held button is released.
    pub fn release_digit(&self) -> u8 {
        self.release_digit
    }

    /// Whether the button is currently held down.
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Whether the button has been worked correctly.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// The action of the first rule that holds. Falls back to `Hold`.
    pub fn correct_action(&self, ctx: &RuleContext<'_>) -> ButtonAction {
        self.rules
            .iter()
            .find(|r| r.condition.holds(self.color, self.label, ctx))
            .map(|r| r.action)
            .unwrap_or(ButtonAction::Hold)
    }

    /// Whether releasing with `timer` (an `mm:ss` display) counts as correct.
    pub fn release_succeeds(&self, ctx: &RuleContext<'_>, timer: &str) -> bool {
        match self.correct_action(ctx) {
            ButtonAction::Release => true,
            ButtonAction::Hold => {
                let digit = char::from(b'0' + self.release_digit);
                timer.contains(digit)
            }
        }
    }

    pub(crate) fn set_held(&mut self, held: bool) {
        self.held = held;
    }

    pub(crate) fn mark_solved(&mut self) {
        self.solved = true;
    }

    /// The manual section for the eligible rules and the release digit.
    pub fn manual(&self) -> ManualSection {
        ManualSection {
            title: "BUTTON".to_string(),
            rules: self.rules.iter().map(|r| r.description.to_string()).collect(),
            note: Some(format!(
                "IF HOLDING: Release when the timer has a '{}' in any position.",
                self.release_digit
            )),
        }
    }
}
