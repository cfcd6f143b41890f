pub mod abilities;
pub mod actions;
pub mod modifiers;
pub mod proficiency;
pub mod raw;
pub mod rules;
pub mod sheet;
pub mod stats;

use serde::{Deserialize, Serialize};

/// The six ability scores, in stat-block order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }

    pub fn abbrev(self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    /// Upstream stat ids are 1-based in this order.
    pub fn from_stat_id(id: i64) -> Option<Ability> {
        match id {
            1 => Some(Ability::Strength),
            2 => Some(Ability::Dexterity),
            3 => Some(Ability::Constitution),
            4 => Some(Ability::Intelligence),
            5 => Some(Ability::Wisdom),
            6 => Some(Ability::Charisma),
            _ => None,
        }
    }

    pub fn stat_id(self) -> i64 {
        match self {
            Ability::Strength => 1,
            Ability::Dexterity => 2,
            Ability::Constitution => 3,
            Ability::Intelligence => 4,
            Ability::Wisdom => 5,
            Ability::Charisma => 6,
        }
    }

    /// Lowercase name as it appears in modifier subtypes.
    pub fn keyword(self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }

    /// Modifier subtype for a flat score increase, e.g. `strength-score`.
    pub fn score_subtype(self) -> &'static str {
        match self {
            Ability::Strength => "strength-score",
            Ability::Dexterity => "dexterity-score",
            Ability::Constitution => "constitution-score",
            Ability::Intelligence => "intelligence-score",
            Ability::Wisdom => "wisdom-score",
            Ability::Charisma => "charisma-score",
        }
    }

    /// Modifier subtype for save proficiency, e.g. `strength-saving-throws`.
    pub fn save_subtype(self) -> &'static str {
        match self {
            Ability::Strength => "strength-saving-throws",
            Ability::Dexterity => "dexterity-saving-throws",
            Ability::Constitution => "constitution-saving-throws",
            Ability::Intelligence => "intelligence-saving-throws",
            Ability::Wisdom => "wisdom-saving-throws",
            Ability::Charisma => "charisma-saving-throws",
        }
    }
}

/// D&D ability modifier = floor((score - 10) / 2) for integer scores.
pub fn ability_mod(score: i32) -> i32 {
    // `div_euclid` with positive divisor matches mathematical floor division.
    (score - 10).div_euclid(2)
}

pub use abilities::{AbilityScores, ResolvedAbility, apply_save_proficiencies};
pub use actions::{Action, ActionType};
pub use modifiers::{EffectCategory, Modifier, ModifierKind, Origin};
pub use proficiency::{ProficiencyData, Skill, SkillBonus, Training, proficiency_bonus};
pub use rules::{Detection, RuleVersion};
pub use sheet::{DerivedSheet, SheetError, compute_sheet};
pub use stats::{Breakdown, StatSource};
