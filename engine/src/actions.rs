//! Action synthesis.
//!
//! Scans equipped weapons, class features, racial traits, feats, and spells
//! and flattens everything that grants an action into one list. The upstream
//! data has no "grants an action" flag, so inclusion is a keyword heuristic
//! over names and free-text descriptions.

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::abilities::AbilityScores;
use crate::modifiers::{Modifier, ModifierKind};
use crate::proficiency::ProficiencyData;
use crate::{Ability, raw};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Attack,
    Spell,
    Cantrip,
    Class,
    Racial,
    Feat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub name: String,
    pub action_type: ActionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_bonus: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
    /// Usage-limitation note mined from description text, e.g. "(Long Rest)".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    pub source: String,
}

/// Feature names that always grant an action even when the description text
/// doesn't spell it out.
const ACTION_FEATURE_NAMES: &[&str] = &[
    "rage",
    "channel divinity",
    "second wind",
    "action surge",
    "wild shape",
    "bardic inspiration",
    "lay on hands",
    "breath weapon",
];

const ACTION_PHRASES: &[&str] = &[
    "as an action",
    "as a bonus action",
    "bonus action",
    "as a reaction",
    "use your reaction",
];

/// Keyword heuristic: does this named entity provide an action?
pub fn provides_action(name: &str, description: &str) -> bool {
    let name = name.to_ascii_lowercase();
    if ACTION_FEATURE_NAMES.iter().any(|k| name.contains(k)) {
        return true;
    }
    let description = description.to_ascii_lowercase();
    ACTION_PHRASES.iter().any(|p| description.contains(p))
}

/// Extract a usage-limitation snippet from description text. Checks the
/// counted form ("3/rest") before the plain rest phrases.
pub fn usage_snippet(description: &str) -> Option<String> {
    let lower = description.to_ascii_lowercase();
    if let Some(pos) = lower.find("/rest") {
        let count: String = lower[..pos]
            .chars()
            .rev()
            .take_while(char::is_ascii_digit)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if !count.is_empty() {
            return Some(format!("({}/Rest)", count));
        }
    }
    if lower.contains("long rest") {
        return Some("(Long Rest)".to_string());
    }
    if lower.contains("short rest") {
        return Some("(Short Rest)".to_string());
    }
    None
}

pub fn extract(
    record: &Value,
    mods: &[Modifier],
    scores: &AbilityScores,
    prof: &ProficiencyData,
) -> Result<Vec<Action>> {
    let mut out = Vec::new();

    for item in raw::expect_array(record, "inventory")? {
        weapon_actions(item, mods, scores, prof, &mut out);
    }

    for class in raw::arr(record, "classes") {
        let class_name = raw::path(class, &["definition", "name"])
            .and_then(Value::as_str)
            .unwrap_or("class");
        let level = raw::int_or(class, "level", 0);
        for feature in raw::arr(class, "classFeatures") {
            let Some(def) = raw::field(feature, "definition") else {
                continue;
            };
            if raw::int_or(def, "requiredLevel", 0) > level {
                continue;
            }
            push_text_action(def, ActionType::Class, class_name, &mut out);
        }
    }

    if let Some(race) = raw::field(record, "race") {
        let species = crate::rules::species_name(race).unwrap_or("species").to_string();
        for trait_entry in raw::arr(race, "racialTraits") {
            if let Some(def) = raw::field(trait_entry, "definition") {
                push_text_action(def, ActionType::Racial, &species, &mut out);
            }
        }
    }

    for feat in raw::arr(record, "feats") {
        if let Some(def) = raw::field(feat, "definition") {
            push_text_action(def, ActionType::Feat, "feat", &mut out);
        }
    }

    out.extend(spell_actions(record));
    Ok(out)
}

fn push_text_action(def: &Value, action_type: ActionType, source: &str, out: &mut Vec<Action>) {
    let Some(name) = raw::str_field(def, "name") else {
        return;
    };
    let description = raw::str_field(def, "description").unwrap_or("");
    if !provides_action(name, description) {
        return;
    }
    out.push(Action {
        name: name.to_string(),
        action_type,
        attack_bonus: None,
        damage: None,
        snippet: usage_snippet(description),
        source: source.to_string(),
    });
}

fn weapon_actions(
    item: &Value,
    mods: &[Modifier],
    scores: &AbilityScores,
    prof: &ProficiencyData,
    out: &mut Vec<Action>,
) {
    if !raw::flag(item, "equipped") {
        return;
    }
    let Some(def) = raw::field(item, "definition") else {
        return;
    };
    let attack_type = raw::int(def, "attackType");
    let is_weapon =
        attack_type.is_some() || raw::str_field(def, "filterType") == Some("Weapon");
    if !is_weapon {
        return;
    }
    let Some(name) = raw::str_field(def, "name") else {
        return;
    };

    let ranged = attack_type == Some(2);
    let finesse = has_property(def, "Finesse");
    let thrown = has_property(def, "Thrown");

    let str_mod = scores.mod_of(Ability::Strength);
    let dex_mod = scores.mod_of(Ability::Dexterity);
    let ability_modifier = if ranged {
        dex_mod
    } else if finesse {
        str_mod.max(dex_mod)
    } else {
        str_mod
    };
    let prof_part = if weapon_proficient(mods, def, name) {
        prof.bonus
    } else {
        0
    };
    let attack_bonus = ability_modifier + prof_part;
    let damage = damage_string(def, ability_modifier);

    out.push(Action {
        name: name.to_string(),
        action_type: ActionType::Attack,
        attack_bonus: Some(attack_bonus),
        damage: damage.clone(),
        snippet: None,
        source: "weapon".to_string(),
    });
    if thrown && !ranged {
        out.push(Action {
            name: format!("{} (Thrown)", name),
            action_type: ActionType::Attack,
            attack_bonus: Some(attack_bonus),
            damage,
            snippet: None,
            source: "weapon".to_string(),
        });
    }
}

fn has_property(def: &Value, property: &str) -> bool {
    raw::arr(def, "properties")
        .iter()
        .any(|p| raw::str_field(p, "name").is_some_and(|n| n.eq_ignore_ascii_case(property)))
}

/// Proficient when a proficiency modifier names this weapon or covers its
/// weapon category. The category comes from the definition's `categoryId`
/// (1 = simple, 2 = martial) when present; a weapon without a category
/// signal accepts either category proficiency, since the data model gives
/// nothing to gate on. Records with no proficiency data at all default to
/// proficient rather than penalizing every attack.
fn weapon_proficient(mods: &[Modifier], def: &Value, weapon_name: &str) -> bool {
    if !mods.iter().any(|m| m.kind == ModifierKind::Proficiency) {
        return true;
    }
    let slug = weapon_name.to_ascii_lowercase().replace(' ', "-");
    let category = match raw::int(def, "categoryId") {
        Some(1) => Some("simple-weapons"),
        Some(2) => Some("martial-weapons"),
        _ => None,
    };
    mods.iter()
        .filter(|m| m.kind == ModifierKind::Proficiency)
        .any(|m| {
            m.subtype.contains(&slug)
                || match category {
                    Some(cat) => m.subtype == cat,
                    None => m.subtype == "simple-weapons" || m.subtype == "martial-weapons",
                }
        })
}

fn damage_string(def: &Value, ability_modifier: i32) -> Option<String> {
    let dice = raw::path(def, &["damage", "diceString"]).and_then(Value::as_str)?;
    let damage_type = raw::str_field(def, "damageType")
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let mut s = dice.to_string();
    if ability_modifier != 0 {
        s.push_str(&format!("{:+}", ability_modifier));
    }
    if !damage_type.is_empty() {
        s.push(' ');
        s.push_str(&damage_type);
    }
    Some(s)
}

/// Activation type ids for action, bonus action, and reaction casts; spells
/// with longer casting times never appear as actions.
const CASTABLE_ACTIVATIONS: &[i64] = &[1, 3, 4];

fn spell_actions(record: &Value) -> Vec<Action> {
    let mut merged: IndexMap<String, Action> = IndexMap::new();
    let mut add = |spell: &Value| {
        let Some(def) = raw::field(spell, "definition") else {
            return;
        };
        let Some(name) = raw::str_field(def, "name") else {
            return;
        };
        let activation = raw::path(def, &["activation", "activationType"])
            .and_then(Value::as_i64)
            .unwrap_or(0);
        if !CASTABLE_ACTIVATIONS.contains(&activation) {
            return;
        }
        let level = raw::int_or(def, "level", 0);
        merged.entry(name.to_ascii_lowercase()).or_insert(Action {
            name: name.to_string(),
            action_type: if level == 0 {
                ActionType::Cantrip
            } else {
                ActionType::Spell
            },
            attack_bonus: None,
            damage: None,
            snippet: None,
            source: "spell".to_string(),
        });
    };

    for group in raw::arr(record, "classSpells") {
        for spell in raw::arr(group, "spells") {
            add(spell);
        }
    }
    if let Some(groups) = raw::field(record, "spells").and_then(Value::as_object) {
        for entries in groups.values() {
            for spell in entries.as_array().map_or(&[][..], Vec::as_slice) {
                add(spell);
            }
        }
    }
    merged.into_values().collect()
}
