//! Hit point calculation.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::abilities::AbilityScores;
use crate::modifiers::{self, EffectCategory, Modifier, ModifierKind};
use crate::stats::{Sources, StatSource};
use crate::{Ability, raw};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HitPoints {
    pub maximum: i32,
    pub current: i32,
    pub temporary: i32,
    pub sources: Vec<StatSource>,
}

/// `maximum = base + con_mod × level + builder bonus + per-level modifier
/// bonuses × level`, unless an explicit override replaces it outright.
/// `current` subtracts damage taken. Takes the resolved constitution modifier
/// as input so this never drifts from the ability resolver's answer.
pub fn resolve(
    record: &Value,
    mods: &[Modifier],
    scores: &AbilityScores,
    total_level: i32,
) -> Result<HitPoints> {
    let mut sources = Sources::new();

    match raw::int(record, "baseHitPoints") {
        Some(base) => sources.push("base", base as i32),
        None => {
            warn!("record has no baseHitPoints; treating as 0");
            sources.push("base", 0);
        }
    }
    sources.push(
        "constitution",
        scores.mod_of(Ability::Constitution) * total_level,
    );
    sources.push_nonzero("bonus", raw::int_or(record, "bonusHitPoints", 0) as i32);
    for m in modifiers::filter_by_effect(mods, EffectCategory::HitPointsPerLevel) {
        if m.kind == ModifierKind::Bonus {
            sources.push_nonzero(m.display_name().to_string(), m.value * total_level);
        }
    }

    let maximum;
    let itemized;
    if let Some(ovr) = raw::int(record, "overrideHitPoints") {
        maximum = ovr as i32;
        itemized = vec![StatSource {
            source: "override".to_string(),
            value: maximum,
        }];
    } else {
        maximum = sources.total();
        itemized = sources.into_vec();
    }

    let removed = raw::int_or(record, "removedHitPoints", 0) as i32;
    Ok(HitPoints {
        maximum,
        current: (maximum - removed).max(0),
        temporary: raw::int_or(record, "temporaryHitPoints", 0) as i32,
        sources: itemized,
    })
}
