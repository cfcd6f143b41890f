//! Ability score resolution and the save-bonus fixup pass.
//!
//! Scores resolve in the first pipeline stage, before the proficiency bonus
//! is known, so `save_bonus` starts life equal to the raw modifier.
//! [`apply_save_proficiencies`] runs later, once proficiency data exists,
//! and is the only place save bonuses change.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::modifiers::{self, EffectCategory, Modifier};
use crate::proficiency::ProficiencyData;
use crate::{Ability, ability_mod, raw};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedAbility {
    pub score: i32,
    pub modifier: i32,
    pub save_bonus: i32,
}

impl ResolvedAbility {
    fn from_score(score: i32) -> Self {
        let modifier = ability_mod(score);
        Self {
            score,
            modifier,
            save_bonus: modifier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbilityScores {
    pub strength: ResolvedAbility,
    pub dexterity: ResolvedAbility,
    pub constitution: ResolvedAbility,
    pub intelligence: ResolvedAbility,
    pub wisdom: ResolvedAbility,
    pub charisma: ResolvedAbility,
}

impl Default for AbilityScores {
    fn default() -> Self {
        let ten = ResolvedAbility::from_score(10);
        Self {
            strength: ten,
            dexterity: ten,
            constitution: ten,
            intelligence: ten,
            wisdom: ten,
            charisma: ten,
        }
    }
}

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> ResolvedAbility {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn get_mut(&mut self, ability: Ability) -> &mut ResolvedAbility {
        match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        }
    }

    pub fn mod_of(&self, ability: Ability) -> i32 {
        self.get(ability).modifier
    }
}

/// Resolve all six scores: base stat + builder bonus + score modifiers from
/// any origin (racial increases, improvement choices, item grants), with
/// `set` modifiers and explicit overrides replacing outright. No clamping is
/// enforced here; the 1–30 domain is a convention downstream consumers may
/// apply.
pub fn resolve(record: &Value, mods: &[Modifier]) -> Result<AbilityScores> {
    let stats = raw::expect_array(record, "stats")?;
    let bonus_stats = raw::expect_array(record, "bonusStats")?;
    let override_stats = raw::expect_array(record, "overrideStats")?;

    let mut scores = AbilityScores::default();
    for ability in Ability::all() {
        let base = stat_value(stats, ability).unwrap_or(10);
        let builder_bonus = stat_value(bonus_stats, ability).unwrap_or(0);
        let resolution =
            modifiers::resolve(&modifiers::filter_by_effect(mods, EffectCategory::Score(ability)));

        let mut score = base + builder_bonus + resolution.bonus;
        if let Some(set) = resolution.set {
            score = set;
        }
        if let Some(ovr) = stat_value(override_stats, ability) {
            if ovr > 0 {
                score = ovr;
            }
        }
        *scores.get_mut(ability) = ResolvedAbility::from_score(score);
    }
    Ok(scores)
}

fn stat_value(entries: &[Value], ability: Ability) -> Option<i32> {
    entries
        .iter()
        .find(|e| raw::int(e, "id") == Some(ability.stat_id()))
        .and_then(|e| raw::int(e, "value"))
        .map(|v| v as i32)
}

/// Second-pass fixup: add the proficiency bonus to saves the character is
/// trained in, plus any generic bonus-to-all-saving-throws modifiers (a
/// cloak of protection, say). Pure, returning a new value rather than
/// mutating, and idempotent: a save bonus that no longer equals the raw
/// modifier has already been fixed up and is left alone, so both additions
/// happen together in the single pass that still sees the raw value.
pub fn apply_save_proficiencies(
    scores: &AbilityScores,
    prof: &ProficiencyData,
    mods: &[Modifier],
) -> AbilityScores {
    let generic = modifiers::resolve(&modifiers::filter_by_effect(
        mods,
        EffectCategory::SavingThrows,
    ))
    .bonus;
    let mut out = *scores;
    for ability in Ability::all() {
        let proficient = prof.save_proficiencies.contains(&ability);
        let entry = out.get_mut(ability);
        if entry.save_bonus != entry.modifier {
            continue;
        }
        entry.save_bonus += generic;
        if proficient {
            entry.save_bonus += prof.bonus;
        }
    }
    out
}
