//! Initiative bonus calculation.

use anyhow::Result;
use serde_json::Value;

use crate::abilities::AbilityScores;
use crate::modifiers::{self, EffectCategory, Modifier, ModifierKind};
use crate::stats::{Breakdown, Sources};
use crate::{Ability, raw};

/// Rakish Audacity comes online at rogue level 3.
const SWASHBUCKLER_MIN_LEVEL: i64 = 3;

/// Dexterity modifier, plus the Swashbuckler charisma rider when the
/// subclass grants it, plus any feat- or item-derived initiative bonuses
/// pulled through the modifier aggregator. The itemized sources always sum
/// to the total.
pub fn resolve(record: &Value, mods: &[Modifier], scores: &AbilityScores) -> Result<Breakdown> {
    let mut sources = Sources::new();
    sources.push("dexterity", scores.mod_of(Ability::Dexterity));

    for class in raw::arr(record, "classes") {
        let subclass = raw::path(class, &["subclassDefinition", "name"])
            .and_then(Value::as_str)
            .unwrap_or("");
        if subclass.to_ascii_lowercase().contains("swashbuckler")
            && raw::int_or(class, "level", 0) >= SWASHBUCKLER_MIN_LEVEL
        {
            sources.push_nonzero("Rakish Audacity", scores.mod_of(Ability::Charisma));
        }
    }

    for m in modifiers::filter_by_effect(mods, EffectCategory::Initiative) {
        if m.kind == ModifierKind::Bonus {
            sources.push_nonzero(m.display_name().to_string(), m.value);
        }
    }

    Ok(sources.into_breakdown())
}
