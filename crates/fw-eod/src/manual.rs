//! The defusal manual: the player's only description of the chosen rules.
//!
//! Sections are built from the exact rule lists the modules resolve with, so
//! the manual can never omit or reorder a rule relative to resolution.

use serde::Serialize;

/// The manual page for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualSection {
    /// Section heading, e.g. `WIRES`.
    pub title: String,
    /// Rule descriptions in resolution order.
    pub rules: Vec<String>,
    /// Trailing note, e.g. the button's release digit.
    pub note: Option<String>,
}

impl std::fmt::Display for ManualSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        for rule in &self.rules {
            writeln!(f, "  - {rule}")?;
        }
        if let Some(note) = &self.note {
            writeln!(f, "  {note}")?;
        }
        Ok(())
    }
}

/// The full manual for a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manual {
    /// One section per module, in generation order.
    pub sections: Vec<ManualSection>,
}

impl std::fmt::Display for Manual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{section}")?;
        }
        Ok(())
    }
}
