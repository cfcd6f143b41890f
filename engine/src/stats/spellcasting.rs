//! Spellcasting statistics: per-class save DC and attack bonus, sparse spell
//! slots, pact magic, and the deduplicated merged spell list.

use std::collections::BTreeMap;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::abilities::AbilityScores;
use crate::proficiency::proficiency_bonus;
use crate::{Ability, raw};

/// How the originating class (or non-class origin) relates the character to
/// a spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Preparation {
    /// Spellbook semantics: prepared from a book of scribed spells.
    PreparedFromBook,
    /// Prepared daily from the full class list.
    PreparedFromList,
    /// A fixed list of spells the class simply knows.
    Known,
    /// Granted by a species, feat, or item; always available.
    Granted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassCasting {
    pub class: String,
    pub ability: Ability,
    pub save_dc: i32,
    pub attack_bonus: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellEntry {
    pub name: String,
    pub level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    pub prepared: bool,
    pub preparation: Preparation,
    /// All origins that grant this spell; the same spell can come from more
    /// than one (class list plus a racial lineage, say).
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PactMagic {
    pub level: i32,
    pub slots: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Spellcasting {
    pub classes: Vec<ClassCasting>,
    /// Sparse: only levels with nonzero slots, in ascending order.
    pub slots: BTreeMap<u8, i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pact_magic: Option<PactMagic>,
    pub spells: Vec<SpellEntry>,
}

/// Spellcasting ability by class archetype. Falls back to the record's own
/// ability id when the class name is unrecognized (homebrew).
fn casting_ability(class_name_lower: &str, def: &Value) -> Option<Ability> {
    let by_name = if class_name_lower.contains("wizard") || class_name_lower.contains("artificer")
    {
        Some(Ability::Intelligence)
    } else if ["cleric", "druid", "ranger"]
        .iter()
        .any(|c| class_name_lower.contains(c))
    {
        Some(Ability::Wisdom)
    } else if ["bard", "sorcerer", "warlock", "paladin"]
        .iter()
        .any(|c| class_name_lower.contains(c))
    {
        Some(Ability::Charisma)
    } else {
        None
    };
    by_name.or_else(|| raw::int(def, "spellCastingAbilityId").and_then(Ability::from_stat_id))
}

/// Preparation taxonomy by class archetype.
fn preparation_for(class_name_lower: &str) -> Preparation {
    if class_name_lower.contains("wizard") {
        Preparation::PreparedFromBook
    } else if ["cleric", "druid", "paladin", "artificer"]
        .iter()
        .any(|c| class_name_lower.contains(c))
    {
        Preparation::PreparedFromList
    } else if ["bard", "sorcerer", "ranger", "warlock"]
        .iter()
        .any(|c| class_name_lower.contains(c))
    {
        Preparation::Known
    } else {
        Preparation::Granted
    }
}

pub fn resolve(record: &Value, scores: &AbilityScores, total_level: i32) -> Result<Spellcasting> {
    let prof = proficiency_bonus(total_level);
    let mut out = Spellcasting::default();

    for class in raw::expect_array(record, "classes")? {
        let Some(def) = raw::field(class, "definition") else {
            continue;
        };
        let name = raw::str_field(def, "name").unwrap_or("").to_string();
        let casts = raw::flag(def, "canCastSpells")
            || raw::int(def, "spellCastingAbilityId").is_some();
        if !casts {
            continue;
        }
        let Some(ability) = casting_ability(&name.to_ascii_lowercase(), def) else {
            continue;
        };
        let ability_modifier = scores.mod_of(ability);
        out.classes.push(ClassCasting {
            class: name,
            ability,
            save_dc: 8 + prof + ability_modifier,
            attack_bonus: prof + ability_modifier,
        });
    }

    out.slots = sparse_slots(raw::arr(record, "spellSlots"));
    out.pact_magic = raw::arr(record, "pactMagic")
        .iter()
        .filter_map(|entry| {
            let slots = raw::int_or(entry, "available", 0) as i32;
            (slots > 0).then(|| PactMagic {
                level: raw::int_or(entry, "level", 1) as i32,
                slots,
            })
        })
        .next();
    out.spells = merge_spells(record);
    Ok(out)
}

/// Dense level-indexed slot array → sparse map of nonzero levels. Entries may
/// be `{level, available}` objects or plain counts indexed from level 1.
fn sparse_slots(entries: &[Value]) -> BTreeMap<u8, i32> {
    let mut slots = BTreeMap::new();
    for (idx, entry) in entries.iter().enumerate() {
        let (level, available) = match entry {
            Value::Object(_) => (
                raw::int_or(entry, "level", idx as i64 + 1),
                raw::int_or(entry, "available", 0),
            ),
            other => (idx as i64 + 1, other.as_i64().unwrap_or(0)),
        };
        if available > 0 && (1..=9).contains(&level) {
            slots.insert(level as u8, available as i32);
        }
    }
    slots
}

/// Merge every spell group, deduplicating by name while accumulating the
/// distinct origins that grant each spell. First-seen order is preserved.
fn merge_spells(record: &Value) -> Vec<SpellEntry> {
    let mut merged: IndexMap<String, SpellEntry> = IndexMap::new();

    for group in raw::arr(record, "classSpells") {
        let class_name = class_name_for_id(record, raw::int(group, "characterClassId"))
            .unwrap_or_else(|| "class".to_string());
        let preparation = preparation_for(&class_name.to_ascii_lowercase());
        for spell in raw::arr(group, "spells") {
            add_spell(&mut merged, spell, &class_name, preparation);
        }
    }

    let first_caster = raw::arr(record, "classSpells")
        .first()
        .and_then(|g| class_name_for_id(record, raw::int(g, "characterClassId")));
    if let Some(groups) = raw::field(record, "spells").and_then(Value::as_object) {
        for (origin, entries) in groups {
            let (label, preparation) = match origin.as_str() {
                "class" => {
                    let name = first_caster.clone().unwrap_or_else(|| "class".to_string());
                    let prep = preparation_for(&name.to_ascii_lowercase());
                    (name, prep)
                }
                other => (other.to_string(), Preparation::Granted),
            };
            for spell in entries.as_array().map_or(&[][..], Vec::as_slice) {
                add_spell(&mut merged, spell, &label, preparation);
            }
        }
    }

    merged.into_values().collect()
}

fn add_spell(
    merged: &mut IndexMap<String, SpellEntry>,
    spell: &Value,
    source: &str,
    preparation: Preparation,
) {
    let Some(def) = raw::field(spell, "definition") else {
        return;
    };
    let Some(name) = raw::str_field(def, "name") else {
        return;
    };
    let key = name.to_ascii_lowercase();
    let prepared = raw::flag(spell, "prepared");
    match merged.get_mut(&key) {
        Some(existing) => {
            if !existing.sources.iter().any(|s| s == source) {
                existing.sources.push(source.to_string());
            }
            existing.prepared |= prepared;
        }
        None => {
            merged.insert(
                key,
                SpellEntry {
                    name: name.to_string(),
                    level: raw::int_or(def, "level", 0) as i32,
                    school: raw::str_field(def, "school").map(str::to_string),
                    prepared,
                    preparation,
                    sources: vec![source.to_string()],
                },
            );
        }
    }
}

fn class_name_for_id(record: &Value, id: Option<i64>) -> Option<String> {
    let id = id?;
    raw::arr(record, "classes")
        .iter()
        .find(|c| raw::int(c, "id") == Some(id))
        .and_then(|c| raw::path(c, &["definition", "name"]))
        .and_then(Value::as_str)
        .map(str::to_string)
}
