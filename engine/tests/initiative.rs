use engine::stats::initiative;
use engine::{abilities, modifiers};
use serde_json::json;

fn resolve(record: &serde_json::Value) -> engine::Breakdown {
    let mods = modifiers::collect(record);
    let scores = abilities::resolve(record, &mods).unwrap();
    initiative::resolve(record, &mods, &scores).unwrap()
}

#[test]
fn dexterity_modifier_alone() {
    let record = json!({"stats": [{"id": 2, "value": 16}]});
    let init = resolve(&record);
    assert_eq!(init.total, 3);
    assert_eq!(init.sources.len(), 1);
    assert_eq!(init.sources[0].source, "dexterity");
}

#[test]
fn feat_and_item_bonuses_are_itemized() {
    let record = json!({
        "stats": [{"id": 2, "value": 14}],
        "modifiers": {
            "feat": [{"type": "bonus", "subType": "initiative", "value": 5,
                      "friendlySubtypeName": "Alert"}],
            "item": [{"type": "bonus", "subType": "initiative", "value": 2,
                      "friendlySubtypeName": "Weapon of Warning"}]
        }
    });
    let init = resolve(&record);
    assert_eq!(init.total, 2 + 5 + 2);
    assert!(init.sources.iter().any(|s| s.source == "Alert" && s.value == 5));
}

#[test]
fn swashbuckler_adds_charisma_at_level_three() {
    let record = json!({
        "stats": [{"id": 2, "value": 14}, {"id": 6, "value": 16}],
        "classes": [{"level": 3, "definition": {"name": "Rogue"},
                     "subclassDefinition": {"name": "Swashbuckler"}}]
    });
    let init = resolve(&record);
    assert_eq!(init.total, 2 + 3);
    assert!(init.sources.iter().any(|s| s.source == "Rakish Audacity"));

    // Below the subclass level the rider is absent.
    let low = json!({
        "stats": [{"id": 2, "value": 14}, {"id": 6, "value": 16}],
        "classes": [{"level": 2, "definition": {"name": "Rogue"},
                     "subclassDefinition": {"name": "Swashbuckler"}}]
    });
    assert_eq!(resolve(&low).total, 2);
}

#[test]
fn sources_always_sum_to_total() {
    let record = json!({
        "stats": [{"id": 2, "value": 8}],
        "modifiers": {
            "feat": [{"type": "bonus", "subType": "initiative", "value": 5}]
        }
    });
    let init = resolve(&record);
    let sum: i32 = init.sources.iter().map(|s| s.value).sum();
    assert_eq!(sum, init.total);
    assert_eq!(init.total, 4);
}
