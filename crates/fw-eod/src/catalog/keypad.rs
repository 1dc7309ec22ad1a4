//! Keypad digit rules.
//!
//! The code has four positions, each with its own small pool. A position's
//! digit is the chosen rule's value truncated to its last decimal digit.

use crate::catalog::RuleContext;
use crate::module::{ModuleKind, WireColor};

/// A position in the four-digit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigitPosition {
    /// First digit.
    First,
    /// Second digit.
    Second,
    /// Third digit.
    Third,
    /// Last digit.
    Last,
}

impl DigitPosition {
    /// Every position, in code order.
    pub const ALL: [Self; 4] = [Self::First, Self::Second, Self::Third, Self::Last];
}

/// Where a digit's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitSource {
    /// The strike allowance after skill-check modifiers.
    StrikeAllowance,
    /// Number of modules on the device.
    ModuleCount,
    /// Number of wires of a color.
    WiresOfColor(WireColor),
    /// One more than the number of wires of a color.
    WiresOfColorPlusOne(WireColor),
    /// First digit in the serial, or 0.
    SerialFirstDigit,
    /// Last digit in the serial, or 0.
    SerialLastDigit,
    /// Number of vowels in the serial.
    SerialVowels,
    /// Total number of wires.
    TotalWires,
}

impl DigitSource {
    /// The raw value, before truncation to one digit.
    pub fn value(self, ctx: &RuleContext<'_>) -> u32 {
        match self {
            Self::StrikeAllowance => ctx.strike_allowance,
            Self::ModuleCount => ctx.modules.len() as u32,
            Self::WiresOfColor(color) => ctx.wire_count(color),
            Self::WiresOfColorPlusOne(color) => ctx.wire_count(color) + 1,
            Self::SerialFirstDigit => ctx.serial_digits().next().unwrap_or(0),
            Self::SerialLastDigit => ctx.serial_digits().last().unwrap_or(0),
            Self::SerialVowels => ctx.serial_vowels(),
            Self::TotalWires => ctx.total_wires(),
        }
    }
}

/// One keypad digit rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeypadRule {
    /// Manual text.
    pub description: &'static str,
    /// Module kind the rule reads from, if any.
    pub depends: Option<ModuleKind>,
    /// Where the digit comes from.
    pub source: DigitSource,
}

impl KeypadRule {
    /// The digit this rule yields: the value's last decimal digit.
    pub fn digit(&self, ctx: &RuleContext<'_>) -> char {
        char::from(b'0' + (self.source.value(ctx) % 10) as u8)
    }
}

const FIRST: &[KeypadRule] = &[
    KeypadRule {
        description: "The first digit is the number of starting strikes.",
        depends: None,
        source: DigitSource::StrikeAllowance,
    },
    KeypadRule {
        description: "The first digit is the total number of modules on the device.",
        depends: None,
        source: DigitSource::ModuleCount,
    },
    KeypadRule {
        description: "The first digit is the number of BLACK wires.",
        depends: Some(ModuleKind::Wires),
        source: DigitSource::WiresOfColor(WireColor::Black),
    },
];

const SECOND: &[KeypadRule] = &[
    KeypadRule {
        description: "The second digit is the first number in the serial number.",
        depends: None,
        source: DigitSource::SerialFirstDigit,
    },
    KeypadRule {
        description: "The second digit is one more than the number of BLUE wires.",
        depends: Some(ModuleKind::Wires),
        source: DigitSource::WiresOfColorPlusOne(WireColor::Blue),
    },
];

const THIRD: &[KeypadRule] = &[
    KeypadRule {
        description: "The third digit is the number of WHITE wires.",
        depends: Some(ModuleKind::Wires),
        source: DigitSource::WiresOfColor(WireColor::White),
    },
    KeypadRule {
        description: "The third digit is the last number in the serial number.",
        depends: None,
        source: DigitSource::SerialLastDigit,
    },
];

const LAST: &[KeypadRule] = &[
    KeypadRule {
        description: "The last digit is the number of vowels in the serial number.",
        depends: None,
        source: DigitSource::SerialVowels,
    },
    KeypadRule {
        description: "The last digit is the total number of wires on the device.",
        depends: Some(ModuleKind::Wires),
        source: DigitSource::TotalWires,
    },
];

/// The rule pool for one code position. Every pool has at least one rule
/// without a dependency, so a position can always be filled.
pub fn keypad_pool(position: DigitPosition) -> &'static [KeypadRule] {
    match position {
        DigitPosition::First => FIRST,
        DigitPosition::Second => SECOND,
        DigitPosition::Third => THIRD,
        DigitPosition::Last => LAST,
    }
}
