//! Modifier aggregation.
//!
//! The raw record scatters numeric contributions across per-origin buckets
//! (`modifiers.race`, `modifiers.class`, ...) plus modifiers granted by
//! equipped items. This module flattens them into tagged [`Modifier`] values,
//! classifies them by effect category via centralized keyword tables, and
//! resolves bonus-vs-set precedence. Stateless; every calculator that needs a
//! conditional bonus goes through here.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::{Ability, raw};

/// Where a modifier came from. Tagging happens at collection time so
/// downstream breakdowns can attribute each contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Class,
    Race,
    Background,
    Feat,
    Item,
    Condition,
}

impl Origin {
    pub fn label(self) -> &'static str {
        match self {
            Origin::Class => "class",
            Origin::Race => "species",
            Origin::Background => "background",
            Origin::Feat => "feat",
            Origin::Item => "item",
            Origin::Condition => "condition",
        }
    }

    /// Bucket names in the raw record, in the order they are scanned.
    /// That order is also the tiebreak for competing `set` modifiers.
    fn buckets() -> [(&'static str, Origin); 6] {
        [
            ("race", Origin::Race),
            ("class", Origin::Class),
            ("background", Origin::Background),
            ("feat", Origin::Feat),
            ("item", Origin::Item),
            ("condition", Origin::Condition),
        ]
    }
}

/// `bonus` accumulates, `set` overrides. Proficiency/expertise entries carry
/// no numeric value; they flag training for the skill resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    Bonus,
    Set,
    Proficiency,
    Expertise,
    Other,
}

impl ModifierKind {
    fn parse(s: &str) -> ModifierKind {
        match s {
            "bonus" => ModifierKind::Bonus,
            "set" => ModifierKind::Set,
            "proficiency" => ModifierKind::Proficiency,
            "expertise" => ModifierKind::Expertise,
            _ => ModifierKind::Other,
        }
    }
}

/// One tagged contribution, rebuilt fresh from the raw record each pass.
#[derive(Debug, Clone)]
pub struct Modifier {
    pub origin: Origin,
    pub kind: ModifierKind,
    pub subtype: String,
    pub friendly_name: String,
    pub value: i32,
}

impl Modifier {
    /// Label used in source breakdowns: the friendly name when present,
    /// otherwise the origin.
    pub fn display_name(&self) -> &str {
        if self.friendly_name.is_empty() {
            self.origin.label()
        } else {
            &self.friendly_name
        }
    }
}

/// Effect categories a modifier can be filtered by. All keyword tables live
/// here so the string heuristics are auditable in one place; the upstream
/// data has no structured "this is an initiative bonus" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectCategory {
    /// Flat increase or set of one ability score.
    Score(Ability),
    /// Bonus to all saving throws (e.g. a cloak of protection).
    SavingThrows,
    Initiative,
    Speed,
    ArmorClass,
    /// Per-level hit point bonus (e.g. the Tough feat).
    HitPointsPerLevel,
    /// Save proficiency in one ability.
    SaveProficiency(Ability),
}

impl EffectCategory {
    /// Keyword match against a modifier's subtype and friendly name.
    /// Subtypes are the normalized slugs the upstream service emits;
    /// friendly names catch homebrew entries that skip the slug.
    pub fn matches(self, subtype: &str, friendly_lower: &str) -> bool {
        match self {
            EffectCategory::Score(a) => {
                subtype == a.score_subtype()
                    || (friendly_lower.contains(a.keyword()) && friendly_lower.contains("score"))
            }
            EffectCategory::SavingThrows => {
                subtype == "saving-throws" || friendly_lower.contains("saving throw")
            }
            EffectCategory::Initiative => {
                subtype == "initiative" || friendly_lower.contains("initiative")
            }
            EffectCategory::Speed => {
                matches!(subtype, "speed" | "speed-walking" | "unarmored-movement")
                    || friendly_lower.contains("speed")
            }
            EffectCategory::ArmorClass => {
                matches!(
                    subtype,
                    "armor-class" | "armored-armor-class" | "unarmored-armor-class"
                ) || friendly_lower.contains("armor class")
            }
            EffectCategory::HitPointsPerLevel => subtype == "hit-points-per-level",
            EffectCategory::SaveProficiency(a) => subtype == a.save_subtype(),
        }
    }
}

/// Flatten every modifier bucket plus equipped-item grants into tagged
/// modifiers. Malformed entries are skipped with a warning, never fatal.
pub fn collect(record: &Value) -> Vec<Modifier> {
    let mut out = Vec::new();
    if let Some(buckets) = raw::field(record, "modifiers").and_then(Value::as_object) {
        for (bucket, origin) in Origin::buckets() {
            let entries = buckets
                .get(bucket)
                .and_then(Value::as_array)
                .map_or(&[][..], Vec::as_slice);
            for entry in entries {
                match parse_entry(entry, origin) {
                    Some(m) => out.push(m),
                    None => warn!(bucket, "skipping malformed modifier entry"),
                }
            }
        }
    }
    for item in raw::arr(record, "inventory") {
        if !raw::flag(item, "equipped") {
            continue;
        }
        if let Some(grants) = raw::path(item, &["definition", "grantedModifiers"]) {
            for entry in grants.as_array().map_or(&[][..], Vec::as_slice) {
                match parse_entry(entry, Origin::Item) {
                    Some(m) => out.push(m),
                    None => warn!("skipping malformed item-granted modifier"),
                }
            }
        }
    }
    out
}

fn parse_entry(entry: &Value, origin: Origin) -> Option<Modifier> {
    let kind = ModifierKind::parse(raw::str_field(entry, "type")?);
    let subtype = raw::str_field(entry, "subType")
        .unwrap_or_default()
        .to_ascii_lowercase();
    let friendly_name = raw::str_field(entry, "friendlySubtypeName")
        .or_else(|| raw::str_field(entry, "friendlyTypeName"))
        .unwrap_or_default()
        .to_string();
    let value = raw::field(entry, "value").map_or(0, extract_value);
    Some(Modifier {
        origin,
        kind,
        subtype,
        friendly_name,
        value,
    })
}

/// Normalize the heterogeneous `value` encodings seen upstream: a plain
/// integer, a numeric string, or a nested object carrying its own `value`.
/// Anything else normalizes to 0.
pub fn extract_value(v: &Value) -> i32 {
    match v {
        Value::Number(n) => n.as_i64().unwrap_or(0) as i32,
        Value::String(s) => s.trim().parse().unwrap_or(0),
        Value::Object(map) => map.get("value").map_or(0, extract_value),
        _ => 0,
    }
}

/// Keep only modifiers matching the requested effect category.
pub fn filter_by_effect(mods: &[Modifier], category: EffectCategory) -> Vec<Modifier> {
    mods.iter()
        .filter(|m| category.matches(&m.subtype, &m.friendly_name.to_ascii_lowercase()))
        .cloned()
        .collect()
}

/// Combined result of a modifier set: summed bonuses, plus the winning
/// `set` value if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    pub bonus: i32,
    pub set: Option<i32>,
}

/// Bonuses always sum; among competing `set` modifiers the last one in
/// bucket-iteration order wins. True tabletop precedence between competing
/// sets is undocumented upstream, so the iteration order stands in for it.
pub fn resolve(mods: &[Modifier]) -> Resolution {
    let mut r = Resolution::default();
    for m in mods {
        match m.kind {
            ModifierKind::Bonus => r.bonus += m.value,
            ModifierKind::Set => r.set = Some(m.value),
            _ => {}
        }
    }
    r
}
