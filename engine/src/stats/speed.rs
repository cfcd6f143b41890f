//! Walking speed calculation.
//!
//! Class-feature speed bonuses are conditionally eligible: Unarmored
//! Movement requires no body armor and no shield, Fast Movement tolerates
//! anything short of heavy armor. Eligibility is decided by scanning
//! equipped inventory each pass, never by a stored flag.

use anyhow::Result;
use serde_json::Value;

use crate::modifiers::{self, EffectCategory, Modifier, ModifierKind};
use crate::rules::{RuleVersion, species_name};
use crate::stats::{Breakdown, Sources, StatSource};
use crate::raw;

const DEFAULT_BASE_SPEED: i32 = 30;

/// Monk Unarmored Movement step table by class level.
fn unarmored_movement_bonus(level: i64) -> i32 {
    match level {
        ..=1 => 0,
        2..=5 => 10,
        6..=9 => 15,
        10..=13 => 20,
        14..=17 => 25,
        _ => 30,
    }
}

/// Species fallback when the record carries no walking speed. The 2024 rules
/// raised the short species to a 30-foot baseline; legacy dwarves and their
/// kin keep 25.
fn species_base_speed(species: &str, rules: RuleVersion) -> i32 {
    let species = species.to_ascii_lowercase();
    if species.contains("wood elf") {
        return 35;
    }
    if rules == RuleVersion::Legacy2014
        && ["dwarf", "halfling", "gnome"].iter().any(|s| species.contains(s))
    {
        return 25;
    }
    DEFAULT_BASE_SPEED
}

pub fn resolve(
    record: &Value,
    rules: RuleVersion,
    mods: &[Modifier],
) -> Result<Breakdown> {
    raw::expect_array(record, "inventory")?;
    let armor = crate::stats::scan_equipped_armor(record);

    let mut sources = Sources::new();
    sources.push("base", base_speed(record, rules));

    for class in raw::arr(record, "classes") {
        let level = raw::int_or(class, "level", 0);
        for feature in raw::arr(class, "classFeatures") {
            let Some(def) = raw::field(feature, "definition") else {
                continue;
            };
            if raw::int_or(def, "requiredLevel", 0) > level {
                continue;
            }
            let name = raw::str_field(def, "name").unwrap_or("").to_ascii_lowercase();
            if name.contains("unarmored movement") {
                sources.push_nonzero(
                    "Unarmored Movement",
                    feature_bonus(unarmored_movement_bonus(level), armor.unarmored()),
                );
            } else if name.contains("fast movement") && level >= 5 {
                sources.push_nonzero(
                    "Fast Movement",
                    feature_bonus(10, !armor.wearing_heavy()),
                );
            }
        }
    }

    // The 2024 revision renamed the speed feat; only the matching name
    // counts under each rule set.
    let speed_feat = match rules {
        RuleVersion::Legacy2014 => "mobile",
        RuleVersion::Current2024 => "speedy",
    };
    for feat in raw::arr(record, "feats") {
        let name = raw::path(feat, &["definition", "name"])
            .and_then(Value::as_str)
            .unwrap_or("");
        if name.eq_ignore_ascii_case(speed_feat) {
            sources.push(name.to_string(), 10);
        }
    }

    let speed_mods = modifiers::filter_by_effect(mods, EffectCategory::Speed);
    for m in &speed_mods {
        if m.kind == ModifierKind::Bonus {
            sources.push_nonzero(m.display_name().to_string(), m.value);
        }
    }
    if let Some(set) = modifiers::resolve(&speed_mods).set {
        // e.g. a condition pinning speed to 0; replaces everything.
        return Ok(Breakdown::from_sources(vec![StatSource {
            source: "override".to_string(),
            value: set,
        }]));
    }

    Ok(sources.into_breakdown())
}

fn base_speed(record: &Value, rules: RuleVersion) -> i32 {
    let race = raw::field(record, "race");
    if let Some(race) = race {
        if let Some(walk) = raw::path(race, &["weightSpeeds", "normal", "walk"])
            .and_then(Value::as_i64)
            .filter(|w| *w > 0)
        {
            return walk as i32;
        }
    }
    let species = race.and_then(species_name).unwrap_or("");
    species_base_speed(species, rules)
}

fn feature_bonus(bonus: i32, eligible: bool) -> i32 {
    if eligible { bonus } else { 0 }
}
