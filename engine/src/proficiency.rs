//! Proficiency bonus, skill bonuses, and save proficiencies.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::abilities::AbilityScores;
use crate::modifiers::{EffectCategory, Modifier, ModifierKind};
use crate::{Ability, raw};

/// Proficiency bonus is a pure step function of total character level:
/// 2 at levels 1–4, 3 at 5–8, 4 at 9–12, 5 at 13–16, 6 at 17+.
pub fn proficiency_bonus(total_level: i32) -> i32 {
    match total_level {
        ..=4 => 2,
        5..=8 => 3,
        9..=12 => 4,
        13..=16 => 5,
        _ => 6,
    }
}

/// Sum of class levels; a record with no class entries counts as level 1.
pub fn total_level(record: &Value) -> i32 {
    let sum: i64 = raw::arr(record, "classes")
        .iter()
        .map(|c| raw::int_or(c, "level", 0))
        .sum();
    (sum as i32).max(1)
}

/// The eighteen standard skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    pub fn all() -> [Skill; 18] {
        [
            Skill::Acrobatics,
            Skill::AnimalHandling,
            Skill::Arcana,
            Skill::Athletics,
            Skill::Deception,
            Skill::History,
            Skill::Insight,
            Skill::Intimidation,
            Skill::Investigation,
            Skill::Medicine,
            Skill::Nature,
            Skill::Perception,
            Skill::Performance,
            Skill::Persuasion,
            Skill::Religion,
            Skill::SleightOfHand,
            Skill::Stealth,
            Skill::Survival,
        ]
    }

    pub fn ability(self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana | Skill::History | Skill::Investigation | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling | Skill::Insight | Skill::Medicine | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    /// Slug used in modifier subtypes.
    pub fn keyword(self) -> &'static str {
        match self {
            Skill::Acrobatics => "acrobatics",
            Skill::AnimalHandling => "animal-handling",
            Skill::Arcana => "arcana",
            Skill::Athletics => "athletics",
            Skill::Deception => "deception",
            Skill::History => "history",
            Skill::Insight => "insight",
            Skill::Intimidation => "intimidation",
            Skill::Investigation => "investigation",
            Skill::Medicine => "medicine",
            Skill::Nature => "nature",
            Skill::Perception => "perception",
            Skill::Performance => "performance",
            Skill::Persuasion => "persuasion",
            Skill::Religion => "religion",
            Skill::SleightOfHand => "sleight-of-hand",
            Skill::Stealth => "stealth",
            Skill::Survival => "survival",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Training {
    None,
    Proficient,
    Expertise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillBonus {
    pub skill: Skill,
    pub ability: Ability,
    pub bonus: i32,
    pub training: Training,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProficiencyData {
    pub bonus: i32,
    pub save_proficiencies: Vec<Ability>,
    pub skills: Vec<SkillBonus>,
}

impl Default for ProficiencyData {
    fn default() -> Self {
        // Documented fallback: level-1 proficiency, no training.
        Self {
            bonus: 2,
            save_proficiencies: Vec::new(),
            skills: Vec::new(),
        }
    }
}

/// Resolve the proficiency bonus, all eighteen skill bonuses, and the set of
/// save proficiencies. Expertise doubles the proficiency bonus and wins over
/// plain proficiency when both flags are present.
pub fn resolve(
    record: &Value,
    mods: &[Modifier],
    scores: &AbilityScores,
) -> Result<ProficiencyData> {
    let bonus = proficiency_bonus(total_level(record));

    let skills = Skill::all()
        .into_iter()
        .map(|skill| {
            let training = training_for(mods, skill.keyword());
            let multiplier = match training {
                Training::None => 0,
                Training::Proficient => 1,
                Training::Expertise => 2,
            };
            SkillBonus {
                skill,
                ability: skill.ability(),
                bonus: scores.mod_of(skill.ability()) + bonus * multiplier,
                training,
            }
        })
        .collect();

    let mut save_proficiencies = Vec::new();
    for ability in Ability::all() {
        let proficient = mods.iter().any(|m| {
            m.kind == ModifierKind::Proficiency
                && EffectCategory::SaveProficiency(ability)
                    .matches(&m.subtype, &m.friendly_name.to_ascii_lowercase())
        });
        if proficient {
            save_proficiencies.push(ability);
        }
    }

    Ok(ProficiencyData {
        bonus,
        save_proficiencies,
        skills,
    })
}

fn training_for(mods: &[Modifier], keyword: &str) -> Training {
    if mods
        .iter()
        .any(|m| m.kind == ModifierKind::Expertise && m.subtype == keyword)
    {
        Training::Expertise
    } else if mods
        .iter()
        .any(|m| m.kind == ModifierKind::Proficiency && m.subtype == keyword)
    {
        Training::Proficient
    } else {
        Training::None
    }
}
