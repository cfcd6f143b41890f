use engine::proficiency::{self, Skill, Training, proficiency_bonus};
use engine::{Ability, abilities, modifiers};
use serde_json::json;

#[test]
fn proficiency_bonus_step_table() {
    assert_eq!(proficiency_bonus(1), 2);
    assert_eq!(proficiency_bonus(4), 2);
    assert_eq!(proficiency_bonus(5), 3);
    assert_eq!(proficiency_bonus(8), 3);
    assert_eq!(proficiency_bonus(9), 4);
    assert_eq!(proficiency_bonus(12), 4);
    assert_eq!(proficiency_bonus(13), 5);
    assert_eq!(proficiency_bonus(16), 5);
    assert_eq!(proficiency_bonus(17), 6);
    assert_eq!(proficiency_bonus(20), 6);
}

#[test]
fn total_level_sums_multiclass_and_floors_at_one() {
    let record = json!({"classes": [{"level": 3}, {"level": 2}]});
    assert_eq!(proficiency::total_level(&record), 5);
    assert_eq!(proficiency::total_level(&json!({})), 1);
}

#[test]
fn skill_bonuses_apply_training_multiplier() {
    // DEX 16 (+3), level 5 (PB 3): stealth expertise 3+6, acrobatics
    // proficient 3+3, sleight of hand untrained 3.
    let record = json!({
        "stats": [{"id": 2, "value": 16}],
        "classes": [{"level": 5}],
        "modifiers": {
            "class": [
                {"type": "proficiency", "subType": "stealth"},
                {"type": "expertise", "subType": "stealth"},
                {"type": "proficiency", "subType": "acrobatics"}
            ]
        }
    });
    let mods = modifiers::collect(&record);
    let scores = abilities::resolve(&record, &mods).unwrap();
    let prof = proficiency::resolve(&record, &mods, &scores).unwrap();
    assert_eq!(prof.bonus, 3);
    assert_eq!(prof.skills.len(), 18);

    let find = |skill: Skill| prof.skills.iter().find(|s| s.skill == skill).unwrap();
    let stealth = find(Skill::Stealth);
    assert_eq!(stealth.training, Training::Expertise);
    assert_eq!(stealth.bonus, 9);
    let acrobatics = find(Skill::Acrobatics);
    assert_eq!(acrobatics.training, Training::Proficient);
    assert_eq!(acrobatics.bonus, 6);
    let sleight = find(Skill::SleightOfHand);
    assert_eq!(sleight.training, Training::None);
    assert_eq!(sleight.bonus, 3);
}

#[test]
fn save_proficiencies_extracted_from_subtypes() {
    let record = json!({
        "modifiers": {
            "class": [
                {"type": "proficiency", "subType": "strength-saving-throws"},
                {"type": "proficiency", "subType": "constitution-saving-throws"},
                {"type": "proficiency", "subType": "athletics"}
            ]
        }
    });
    let mods = modifiers::collect(&record);
    let scores = abilities::resolve(&record, &mods).unwrap();
    let prof = proficiency::resolve(&record, &mods, &scores).unwrap();
    assert_eq!(
        prof.save_proficiencies,
        vec![Ability::Strength, Ability::Constitution]
    );
}

#[test]
fn every_skill_maps_to_its_governing_ability() {
    assert_eq!(Skill::Athletics.ability(), Ability::Strength);
    assert_eq!(Skill::Stealth.ability(), Ability::Dexterity);
    assert_eq!(Skill::Arcana.ability(), Ability::Intelligence);
    assert_eq!(Skill::Perception.ability(), Ability::Wisdom);
    assert_eq!(Skill::Persuasion.ability(), Ability::Charisma);
    assert_eq!(Skill::all().len(), 18);
}
