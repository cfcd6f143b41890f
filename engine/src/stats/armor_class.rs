//! Armor class calculation.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::abilities::AbilityScores;
use crate::modifiers::{self, EffectCategory, Modifier, ModifierKind};
use crate::rules::{RuleVersion, species_name};
use crate::stats::{ArmorKind, Sources, StatSource};
use crate::{Ability, raw};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArmorClass {
    pub total: i32,
    /// Calculation method label, preserved for display: "armored",
    /// "unarmored", "natural armor", or "override".
    pub method: String,
    pub sources: Vec<StatSource>,
}

/// Natural-armor bases by species. Returns `(base, dex_applies)`. The 2024
/// revision reprinted only some of these: entries not carried forward apply
/// under the legacy rules alone.
fn natural_armor(species: &str, rules: RuleVersion) -> Option<(i32, bool)> {
    let species = species.to_ascii_lowercase();
    if species.contains("tortle") {
        return Some((17, false));
    }
    if species.contains("lizardfolk") && rules == RuleVersion::Legacy2014 {
        return Some((13, true));
    }
    None
}

pub fn resolve(
    record: &Value,
    rules: RuleVersion,
    mods: &[Modifier],
    scores: &AbilityScores,
) -> Result<ArmorClass> {
    // Surface a wrong-typed inventory as a calculator failure so the
    // assembler degrades just this facet.
    raw::expect_array(record, "inventory")?;
    let armor = crate::stats::scan_equipped_armor(record);
    let dex = scores.mod_of(Ability::Dexterity);

    let mut sources = Sources::new();
    let mut method;
    match armor.body {
        Some((kind, ac)) => {
            method = "armored";
            sources.push("armor", ac);
            let dex_part = match kind {
                ArmorKind::Light => dex,
                ArmorKind::Medium => dex.min(2),
                ArmorKind::Heavy | ArmorKind::Shield => 0,
            };
            sources.push_nonzero("dexterity", dex_part);
        }
        None => {
            let species = raw::field(record, "race").and_then(species_name).unwrap_or("");
            match natural_armor(species, rules) {
                Some((base, dex_applies)) => {
                    method = "natural armor";
                    sources.push("natural armor", base);
                    if dex_applies {
                        sources.push_nonzero("dexterity", dex);
                    }
                }
                None => {
                    method = "unarmored";
                    sources.push("base", 10);
                    sources.push_nonzero("dexterity", dex);
                }
            }
        }
    }

    let ac_mods = modifiers::filter_by_effect(mods, EffectCategory::ArmorClass);
    let resolution = modifiers::resolve(&ac_mods);
    if let Some(set) = resolution.set {
        // A `set` replaces the whole base calculation; shield and bonuses
        // still stack on top.
        method = "override";
        sources = Sources::new();
        sources.push("override", set);
    }
    if armor.shield {
        sources.push("shield", 2);
    }
    for m in &ac_mods {
        if m.kind == ModifierKind::Bonus {
            sources.push_nonzero(m.display_name().to_string(), m.value);
        }
    }

    let breakdown = sources.into_breakdown();
    Ok(ArmorClass {
        total: breakdown.total,
        method: method.to_string(),
        sources: breakdown.sources,
    })
}
