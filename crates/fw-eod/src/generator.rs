//! Module generation.
//!
//! Each generator draws a module's visible state and its rules from the
//! catalog using the session's seeded RNG, then derives the solution the
//! player must find from the manual.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::catalog::{self, BUTTON_RULES, DigitPosition, RuleContext, WireRule, keypad_pool};
use crate::module::{
    ButtonColor, ButtonLabel, ButtonModule, KeypadModule, Module, ModuleKind, WireColor,
    WiresModule,
};

/// Fewest wires on a wires module.
pub const MIN_WIRES: usize = 4;

/// Most wires on a wires module.
pub const MAX_WIRES: usize = 6;

/// Conditional rules drawn per wires module (plus one fallback).
pub const CONDITIONAL_WIRE_RULES: usize = 3;

/// Generate a module of `kind` for the device described by `ctx`.
pub fn generate(kind: ModuleKind, ctx: &RuleContext<'_>, rng: &mut StdRng) -> Module {
    let module = match kind {
        ModuleKind::Wires => Module::Wires(generate_wires(rng)),
        ModuleKind::Keypad => Module::Keypad(generate_keypad(ctx, rng)),
        ModuleKind::Button => Module::Button(generate_button(ctx, rng)),
    };
    tracing::debug!(module = %kind, rules = module.manual().rules.len(), "generated module");
    module
}

/// Draw 4-6 wires and three conditional rules plus one fallback.
pub fn generate_wires(rng: &mut StdRng) -> WiresModule {
    let count = rng.random_range(MIN_WIRES..=MAX_WIRES);
    let wires: Vec<WireColor> = (0..count)
        .map(|_| WireColor::ALL[rng.random_range(0..WireColor::ALL.len())])
        .collect();

    let mut rules: Vec<WireRule> = catalog::wires::conditional_rules().copied().collect();
    rules.shuffle(rng);
    rules.truncate(CONDITIONAL_WIRE_RULES);

    let fallbacks: Vec<WireRule> = catalog::wires::fallback_rules().copied().collect();
    rules.push(fallbacks[rng.random_range(0..fallbacks.len())]);

    WiresModule::new(wires, rules)
}

/// Pick one eligible rule per code position and derive the code.
pub fn generate_keypad(ctx: &RuleContext<'_>, rng: &mut StdRng) -> KeypadModule {
    let mut rules = Vec::with_capacity(DigitPosition::ALL.len());
    let mut code = String::with_capacity(DigitPosition::ALL.len());

    for position in DigitPosition::ALL {
        let eligible: Vec<_> = keypad_pool(position)
            .iter()
            .filter(|r| ctx.satisfies(r.depends))
            .collect();
        let rule = *eligible[rng.random_range(0..eligible.len())];
        code.push(rule.digit(ctx));
        rules.push(rule);
    }

    KeypadModule::new(code, rules)
}

/// Draw the button's color, label, and release digit; keep the eligible rules.
pub fn generate_button(ctx: &RuleContext<'_>, rng: &mut StdRng) -> ButtonModule {
    let color = ButtonColor::ALL[rng.random_range(0..ButtonColor::ALL.len())];
    let label = ButtonLabel::ALL[rng.random_range(0..ButtonLabel::ALL.len())];
    let rules = BUTTON_RULES
        .iter()
        .filter(|r| ctx.satisfies(r.depends))
        .copied()
        .collect();
    let release_digit = rng.random_range(1..=6);

    ButtonModule::new(color, label, rules, release_digit)
}
