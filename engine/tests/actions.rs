use engine::actions::{self, ActionType, provides_action, usage_snippet};
use engine::{abilities, modifiers, proficiency};
use serde_json::json;

fn extract(record: &serde_json::Value) -> Vec<engine::Action> {
    let mods = modifiers::collect(record);
    let scores = abilities::resolve(record, &mods).unwrap();
    let prof = proficiency::resolve(record, &mods, &scores).unwrap();
    actions::extract(record, &mods, &scores, &prof).unwrap()
}

#[test]
fn action_heuristic_matches_phrases_and_known_names() {
    assert!(provides_action("Second Wind", "regain hit points"));
    assert!(provides_action("Rage", ""));
    assert!(provides_action("Shove", "As an action, you can push a creature."));
    assert!(provides_action("Parry", "you can use your reaction to deflect"));
    assert!(!provides_action("Darkvision", "You can see in dim light."));
}

#[test]
fn usage_snippets_extracted_from_text() {
    assert_eq!(
        usage_snippet("Once you use this feature, you must finish a long rest."),
        Some("(Long Rest)".to_string())
    );
    assert_eq!(
        usage_snippet("Recharges after a short rest."),
        Some("(Short Rest)".to_string())
    );
    assert_eq!(usage_snippet("You may use this 3/rest."), Some("(3/Rest)".to_string()));
    assert_eq!(usage_snippet("Always available."), None);
}

#[test]
fn equipped_weapon_attack_bonus_and_damage() {
    // STR 16 (+3), level 1 (PB 2), proficient by default → +5, "1d8+3 slashing".
    let record = json!({
        "stats": [{"id": 1, "value": 16}],
        "classes": [{"level": 1, "definition": {"name": "Fighter"}}],
        "inventory": [{"equipped": true, "definition": {
            "name": "Longsword", "attackType": 1,
            "damage": {"diceString": "1d8"}, "damageType": "Slashing"
        }}]
    });
    let acts = extract(&record);
    let sword = acts.iter().find(|a| a.name == "Longsword").unwrap();
    assert_eq!(sword.action_type, ActionType::Attack);
    assert_eq!(sword.attack_bonus, Some(5));
    assert_eq!(sword.damage.as_deref(), Some("1d8+3 slashing"));
}

#[test]
fn finesse_uses_better_of_str_dex_and_ranged_uses_dex() {
    let record = json!({
        "stats": [{"id": 1, "value": 10}, {"id": 2, "value": 18}],
        "classes": [{"level": 1, "definition": {"name": "Rogue"}}],
        "inventory": [
            {"equipped": true, "definition": {
                "name": "Rapier", "attackType": 1,
                "properties": [{"name": "Finesse"}],
                "damage": {"diceString": "1d8"}, "damageType": "Piercing"}},
            {"equipped": true, "definition": {
                "name": "Shortbow", "attackType": 2,
                "damage": {"diceString": "1d6"}, "damageType": "Piercing"}}
        ]
    });
    let acts = extract(&record);
    assert_eq!(acts.iter().find(|a| a.name == "Rapier").unwrap().attack_bonus, Some(6));
    assert_eq!(acts.iter().find(|a| a.name == "Shortbow").unwrap().attack_bonus, Some(6));
}

#[test]
fn thrown_melee_weapon_gets_a_second_variant() {
    let record = json!({
        "stats": [{"id": 1, "value": 14}],
        "inventory": [{"equipped": true, "definition": {
            "name": "Handaxe", "attackType": 1,
            "properties": [{"name": "Light"}, {"name": "Thrown"}],
            "damage": {"diceString": "1d6"}, "damageType": "Slashing"
        }}]
    });
    let acts = extract(&record);
    assert!(acts.iter().any(|a| a.name == "Handaxe"));
    let thrown = acts.iter().find(|a| a.name == "Handaxe (Thrown)").unwrap();
    assert_eq!(thrown.attack_bonus, acts.iter().find(|a| a.name == "Handaxe").unwrap().attack_bonus);
}

#[test]
fn weapon_proficiency_gates_the_proficiency_bonus() {
    // Explicit proficiency data that does not cover martial weapons.
    let record = json!({
        "stats": [{"id": 1, "value": 16}],
        "classes": [{"level": 5, "definition": {"name": "Wizard"}}],
        "modifiers": {
            "class": [{"type": "proficiency", "subType": "simple-weapons"}]
        },
        "inventory": [{"equipped": true, "definition": {
            "name": "Club", "attackType": 1,
            "damage": {"diceString": "1d4"}, "damageType": "Bludgeoning"
        }}]
    });
    let acts = extract(&record);
    // Club is covered by simple-weapons → +3 str +3 PB.
    assert_eq!(acts.iter().find(|a| a.name == "Club").unwrap().attack_bonus, Some(6));
}

#[test]
fn category_id_gates_category_proficiency() {
    // Simple-weapons proficiency only: the categorized martial weapon loses
    // the proficiency bonus, the categorized simple weapon keeps it.
    let record = json!({
        "stats": [{"id": 1, "value": 16}],
        "classes": [{"level": 5, "definition": {"name": "Wizard"}}],
        "modifiers": {
            "class": [{"type": "proficiency", "subType": "simple-weapons"}]
        },
        "inventory": [
            {"equipped": true, "definition": {
                "name": "Greatsword", "attackType": 1, "categoryId": 2,
                "damage": {"diceString": "2d6"}, "damageType": "Slashing"}},
            {"equipped": true, "definition": {
                "name": "Mace", "attackType": 1, "categoryId": 1,
                "damage": {"diceString": "1d6"}, "damageType": "Bludgeoning"}}
        ]
    });
    let acts = extract(&record);
    // STR +3 only, no PB.
    assert_eq!(acts.iter().find(|a| a.name == "Greatsword").unwrap().attack_bonus, Some(3));
    // STR +3 plus PB 3.
    assert_eq!(acts.iter().find(|a| a.name == "Mace").unwrap().attack_bonus, Some(6));
}

#[test]
fn class_features_traits_and_feats_become_actions() {
    let record = json!({
        "classes": [{"level": 3, "definition": {"name": "Fighter"},
                     "classFeatures": [
                        {"definition": {"name": "Second Wind", "requiredLevel": 1,
                                        "description": "finish a short or long rest"}},
                        {"definition": {"name": "Indomitable", "requiredLevel": 9,
                                        "description": "as an action"}}]}],
        "race": {"fullName": "Dragonborn",
                 "racialTraits": [{"definition": {"name": "Breath Weapon",
                                                  "description": "exhale as an action"}}]},
        "feats": [{"definition": {"name": "Healer",
                                  "description": "As an action, you can spend one use of a healer's kit."}}]
    });
    let acts = extract(&record);
    assert!(acts.iter().any(|a| a.name == "Second Wind" && a.action_type == ActionType::Class));
    // Above the character's level → excluded.
    assert!(!acts.iter().any(|a| a.name == "Indomitable"));
    assert!(acts.iter().any(|a| a.name == "Breath Weapon" && a.action_type == ActionType::Racial));
    assert!(acts.iter().any(|a| a.name == "Healer" && a.action_type == ActionType::Feat));
}

#[test]
fn only_action_speed_spells_are_included() {
    let record = json!({
        "classSpells": [{"characterClassId": 1, "spells": [
            {"definition": {"name": "Fire Bolt", "level": 0,
                            "activation": {"activationType": 1}}},
            {"definition": {"name": "Shield", "level": 1,
                            "activation": {"activationType": 4}}},
            {"definition": {"name": "Identify", "level": 1,
                            "activation": {"activationType": 6}}}
        ]}]
    });
    let acts = extract(&record);
    assert!(acts.iter().any(|a| a.name == "Fire Bolt" && a.action_type == ActionType::Cantrip));
    assert!(acts.iter().any(|a| a.name == "Shield" && a.action_type == ActionType::Spell));
    assert!(!acts.iter().any(|a| a.name == "Identify"));
}
