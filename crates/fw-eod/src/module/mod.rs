//! Device modules.
//!
//! A module is one sub-puzzle of a device. Each holds its generated state,
//! the rules chosen for it in resolution order, and whether it is solved.

pub mod button;
pub mod keypad;
pub mod wires;

pub use button::{ButtonAction, ButtonColor, ButtonLabel, ButtonModule};
pub use keypad::KeypadModule;
pub use wires::{WireColor, WiresModule};

use serde::{Deserialize, Serialize};

use crate::manual::ManualSection;

/// The kinds of module a device can carry.
///
/// Ordering is generation order: modules that other rules read from come
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// Cut the one correct wire.
    Wires,
    /// Enter a four-digit code.
    Keypad,
    /// Press and release (or hold) a button.
    Button,
}

impl ModuleKind {
    /// Every module kind, in generation order.
    pub const ALL: [Self; 3] = [Self::Wires, Self::Keypad, Self::Button];

    /// Parse a kind from its name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "wires" | "wire" => Some(Self::Wires),
            "keypad" => Some(Self::Keypad),
            "button" => Some(Self::Button),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wires => write!(f, "WIRES"),
            Self::Keypad => write!(f, "KEYPAD"),
            Self::Button => write!(f, "BUTTON"),
        }
    }
}

/// A generated module.
#[derive(Debug, Clone)]
pub enum Module {
    /// Wire-cutting module.
    Wires(WiresModule),
    /// Code-entry module.
    Keypad(KeypadModule),
    /// Button module.
    Button(ButtonModule),
}

impl Module {
    /// The module's kind.
    pub fn kind(&self) -> ModuleKind {
        match self {
            Self::Wires(_) => ModuleKind::Wires,
            Self::Keypad(_) => ModuleKind::Keypad,
            Self::Button(_) => ModuleKind::Button,
        }
    }

    /// Whether the module has been solved.
    pub fn is_solved(&self) -> bool {
        match self {
            Self::Wires(m) => m.is_solved(),
            Self::Keypad(m) => m.is_solved(),
            Self::Button(m) => m.is_solved(),
        }
    }

    /// The manual section describing this module's chosen rules.
    pub fn manual(&self) -> ManualSection {
        match self {
            Self::Wires(m) => m.manual(),
            Self::Keypad(m) => m.manual(),
            Self::Button(m) => m.manual(),
        }
    }

    /// The wires module, if this is one.
    pub fn as_wires(&self) -> Option<&WiresModule> {
        match self {
            Self::Wires(m) => Some(m),
            _ => None,
        }
    }

    /// The keypad module, if this is one.
    pub fn as_keypad(&self) -> Option<&KeypadModule> {
        match self {
            Self::Keypad(m) => Some(m),
            _ => None,
        }
    }

    /// The button module, if this is one.
    pub fn as_button(&self) -> Option<&ButtonModule> {
        match self {
            Self::Button(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display() {
        assert_eq!(ModuleKind::Wires.to_string(), "WIRES");
        assert_eq!(ModuleKind::Keypad.to_string(), "KEYPAD");
        assert_eq!(ModuleKind::Button.to_string(), "BUTTON");
    }

    #[test]
    fn kind_parse() {
        assert_eq!(ModuleKind::parse("Wires"), Some(ModuleKind::Wires));
        assert_eq!(ModuleKind::parse(" keypad "), Some(ModuleKind::Keypad));
        assert_eq!(ModuleKind::parse("BUTTON"), Some(ModuleKind::Button));
        assert_eq!(ModuleKind::parse("simon"), None);
    }

    #[test]
    fn generation_order() {
        assert!(ModuleKind::Wires < ModuleKind::Keypad);
        assert!(ModuleKind::Keypad < ModuleKind::Button);
    }
}
