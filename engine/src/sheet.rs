//! Output assembly: runs every calculator in dependency order and merges the
//! partial results into one stable nested structure.
//!
//! Failure isolation: a calculator that errors contributes its default
//! partial result and a warning; every other facet is kept. Only missing
//! identity fields abort the whole character.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::abilities::{self, AbilityScores};
use crate::actions::{self, Action};
use crate::modifiers;
use crate::proficiency::{self, SkillBonus};
use crate::rules::RuleVersion;
use crate::stats::{ArmorClass, Breakdown, HitPoints, Spellcasting};
use crate::stats::{armor_class, hit_points, initiative, speed, spellcasting};
use crate::{Ability, raw};

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("character record is missing identity fields (id={id:?})")]
    MissingIdentity { id: Option<String> },
}

/// The complete derived character sheet. Field names and nesting are stable
/// across runs: the downstream diffing consumer treats structural changes as
/// meaningful deltas.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedSheet {
    pub id: String,
    pub name: String,
    pub rules: RuleVersion,
    pub level: i32,
    pub abilities: AbilityScores,
    pub proficiency_bonus: i32,
    pub save_proficiencies: Vec<Ability>,
    pub hit_points: HitPoints,
    pub armor_class: ArmorClass,
    pub initiative: Breakdown,
    pub speed: Breakdown,
    pub spellcasting: Spellcasting,
    pub skills: Vec<SkillBonus>,
    pub actions: Vec<Action>,
}

/// Run the full pipeline over one raw record. Pure and side-effect-free:
/// identical input yields byte-identical serialized output.
pub fn compute_sheet(record: &Value) -> Result<DerivedSheet, SheetError> {
    let id = identity_id(record);
    let name = raw::str_field(record, "name").map(str::to_string);
    let (Some(id), Some(name)) = (id.clone(), name) else {
        return Err(SheetError::MissingIdentity { id });
    };

    let detection = RuleVersion::detect(record);
    debug!(version = ?detection.version, reason = %detection.reason, "rule version detected");
    let rules = detection.version;

    let mods = modifiers::collect(record);
    let level = proficiency::total_level(record);

    // Abilities first, then proficiency, then the save fixup: the two-phase
    // design that breaks the ability/proficiency circular dependency.
    let resolved = guard("abilities", || abilities::resolve(record, &mods));
    let prof = guard("proficiency", || {
        proficiency::resolve(record, &mods, &resolved)
    });
    let abilities = abilities::apply_save_proficiencies(&resolved, &prof, &mods);

    let hit_points = guard("hit_points", || {
        hit_points::resolve(record, &mods, &abilities, level)
    });
    let armor_class = guard("armor_class", || {
        armor_class::resolve(record, rules, &mods, &abilities)
    });
    let initiative = guard("initiative", || {
        initiative::resolve(record, &mods, &abilities)
    });
    let speed = guard("speed", || speed::resolve(record, rules, &mods));
    let spellcasting = guard("spellcasting", || {
        spellcasting::resolve(record, &abilities, level)
    });
    // Actions last: they read everything above.
    let actions = guard("actions", || {
        actions::extract(record, &mods, &abilities, &prof)
    });

    Ok(DerivedSheet {
        id,
        name,
        rules,
        level,
        abilities,
        proficiency_bonus: prof.bonus,
        save_proficiencies: prof.save_proficiencies,
        hit_points,
        armor_class,
        initiative,
        speed,
        spellcasting,
        skills: prof.skills,
        actions,
    })
}

fn identity_id(record: &Value) -> Option<String> {
    match raw::field(record, "id") {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Calculator boundary: on error, log and substitute the default partial
/// result so one bad facet never takes down the whole character.
fn guard<T: Default>(calculator: &str, f: impl FnOnce() -> Result<T>) -> T {
    match f() {
        Ok(v) => v,
        Err(err) => {
            warn!(calculator, error = %err, "calculator failed; substituting default");
            T::default()
        }
    }
}
