//! Device series definitions.

use serde::{Deserialize, Serialize};

use crate::module::ModuleKind;

/// How hard a series is meant to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyTier {
    /// Single module, generous timer.
    Training,
    /// Two modules from a small pool.
    Standard,
    /// Two modules from the full pool, short timer.
    Hard,
}

impl std::fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Training => write!(f, "Training"),
            Self::Standard => write!(f, "Standard"),
            Self::Hard => write!(f, "Hard"),
        }
    }
}

/// A family of devices sharing timer, strikes, and module pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDefinition {
    /// Short identifier, e.g. `M4-S`.
    pub id: String,
    /// Display name, e.g. `M4-S 'Scorpion'`.
    pub display_name: String,
    /// Difficulty tier.
    pub difficulty: DifficultyTier,
    /// Timer before skill-check modifiers, in seconds.
    pub base_time_secs: u32,
    /// Strike allowance before skill-check modifiers.
    pub base_strikes: u32,
    /// Module kinds a device of this series may carry.
    pub module_pool: Vec<ModuleKind>,
    /// How many modules from the pool each device carries.
    pub module_count: usize,
}

impl SeriesDefinition {
    /// The built-in series catalog.
    pub fn builtin() -> Vec<Self> {
        vec![
            Self {
                id: "M1-T".to_string(),
                display_name: "M1-T 'Tutor'".to_string(),
                difficulty: DifficultyTier::Training,
                base_time_secs: 300,
                base_strikes: 3,
                module_pool: vec![ModuleKind::Wires],
                module_count: 1,
            },
            Self {
                id: "M4-S".to_string(),
                display_name: "M4-S 'Scorpion'".to_string(),
                difficulty: DifficultyTier::Standard,
                base_time_secs: 240,
                base_strikes: 2,
                module_pool: vec![ModuleKind::Wires, ModuleKind::Keypad],
                module_count: 2,
            },
            Self {
                id: "M7-B".to_string(),
                display_name: "M7-B 'Spectre'".to_string(),
                difficulty: DifficultyTier::Hard,
                base_time_secs: 180,
                base_strikes: 2,
                module_pool: vec![ModuleKind::Wires, ModuleKind::Keypad, ModuleKind::Button],
                module_count: 2,
            },
        ]
    }

    /// Find a series in `catalog` by id (case-insensitive).
    pub fn find<'a>(catalog: &'a [Self], id: &str) -> Option<&'a Self> {
        let id = id.trim();
        catalog.iter().find(|s| s.id.eq_ignore_ascii_case(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog() {
        let catalog = SeriesDefinition::builtin();
        assert_eq!(catalog.len(), 3);
        for series in &catalog {
            assert!(series.module_count <= series.module_pool.len());
            assert!(series.module_count >= 1);
        }
    }

    #[test]
    fn find_is_case_insensitive() {
        let catalog = SeriesDefinition::builtin();
        let s = SeriesDefinition::find(&catalog, "m7-b").unwrap();
        assert_eq!(s.display_name, "M7-B 'Spectre'");
        assert_eq!(s.difficulty, DifficultyTier::Hard);
        assert!(SeriesDefinition::find(&catalog, "X9").is_none());
    }

    #[test]
    fn scorpion_values() {
        let catalog = SeriesDefinition::builtin();
        let s = SeriesDefinition::find(&catalog, "M4-S").unwrap();
        assert_eq!(s.base_time_secs, 240);
        assert_eq!(s.base_strikes, 2);
        assert_eq!(s.module_pool, vec![ModuleKind::Wires, ModuleKind::Keypad]);
    }

    #[test]
    fn serde_round_trip() {
        let catalog = SeriesDefinition::builtin();
        let json = serde_json::to_string(&catalog).unwrap();
        let back: Vec<SeriesDefinition> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
    }
}
