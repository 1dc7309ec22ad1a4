//! Rule catalog: the static pools every module draws its rules from.
//!
//! Rules are plain data (a condition, an optional module dependency, and an
//! outcome). They are evaluated against a [`RuleContext`], an immutable
//! snapshot of the session taken at decision time. A rule that depends on
//! another module kind is only eligible when the device carries that module.

pub mod button;
pub mod keypad;
pub mod wires;

pub use button::{BUTTON_RULES, ButtonCondition, ButtonRule};
pub use keypad::{DigitPosition, DigitSource, KeypadRule, keypad_pool};
pub use wires::{WIRE_RULES, WireCondition, WireRule, WireTarget};

use crate::module::{ModuleKind, WireColor};

/// A read-only view of the session that rules evaluate against.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The device serial number.
    pub serial: &'a str,
    /// Strikes allowed after skill-check modifiers.
    pub strike_allowance: u32,
    /// Every module kind the device carries.
    pub modules: &'a [ModuleKind],
    /// The full wire sequence, once the wires module is generated.
    pub wires: Option<&'a [WireColor]>,
}

impl<'a> RuleContext<'a> {
    /// Whether the device carries a module of `kind`.
    pub fn has_module(&self, kind: ModuleKind) -> bool {
        self.modules.contains(&kind)
    }

    /// Whether a rule with this dependency is eligible on the device.
    pub fn satisfies(&self, depends: Option<ModuleKind>) -> bool {
        depends.is_none_or(|kind| self.has_module(kind))
    }

    /// Number of wires of `color` on the device (0 without a wires module).
    pub fn wire_count(&self, color: WireColor) -> u32 {
        self.wires
            .map(|w| w.iter().filter(|&&c| c == color).count() as u32)
            .unwrap_or(0)
    }

    /// Total number of wires on the device.
    pub fn total_wires(&self) -> u32 {
        self.wires.map(|w| w.len() as u32).unwrap_or(0)
    }

    /// The serial's decimal digits, in order.
    pub fn serial_digits(&self) -> impl Iterator<Item = u32> + 'a {
        self.serial.chars().filter_map(|c| c.to_digit(10))
    }

    /// Number of vowels in the serial (case-insensitive).
    pub fn serial_vowels(&self) -> u32 {
        self.serial
            .chars()
            .filter(|c| matches!(c.to_ascii_uppercase(), 'A' | 'E' | 'I' | 'O' | 'U'))
            .count() as u32
    }
}
