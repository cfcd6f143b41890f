//! Derived-stat calculators. Each is a pure function of the raw record plus
//! explicitly passed upstream results (ability scores, rule version); none
//! re-derives another's output.

pub mod armor_class;
pub mod hit_points;
pub mod initiative;
pub mod speed;
pub mod spellcasting;

use serde::Serialize;
use serde_json::Value;

use crate::raw;

pub use armor_class::ArmorClass;
pub use hit_points::HitPoints;
pub use spellcasting::{ClassCasting, PactMagic, Preparation, SpellEntry, Spellcasting};

/// One itemized contribution to a derived stat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatSource {
    pub source: String,
    pub value: i32,
}

/// A derived stat with full provenance. The total is always the sum of the
/// itemized sources; constructing through [`Breakdown::from_sources`] makes
/// that invariant structural.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub total: i32,
    pub sources: Vec<StatSource>,
}

impl Breakdown {
    pub fn from_sources(sources: Vec<StatSource>) -> Self {
        let total = sources.iter().map(|s| s.value).sum();
        Self { total, sources }
    }
}

/// Builder for source lists; totals come from summation, never set directly.
#[derive(Debug, Default)]
pub struct Sources(Vec<StatSource>);

impl Sources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: impl Into<String>, value: i32) {
        self.0.push(StatSource {
            source: source.into(),
            value,
        });
    }

    /// Push only when the contribution is nonzero, to keep breakdowns legible.
    pub fn push_nonzero(&mut self, source: impl Into<String>, value: i32) {
        if value != 0 {
            self.push(source, value);
        }
    }

    pub fn into_breakdown(self) -> Breakdown {
        Breakdown::from_sources(self.0)
    }

    pub fn into_vec(self) -> Vec<StatSource> {
        self.0
    }

    pub fn total(&self) -> i32 {
        self.0.iter().map(|s| s.value).sum()
    }
}

/// Body-armor weight classes plus shields, as classified by the upstream
/// `armorTypeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmorKind {
    Light,
    Medium,
    Heavy,
    Shield,
}

impl ArmorKind {
    fn from_type_id(id: i64) -> Option<ArmorKind> {
        match id {
            1 => Some(ArmorKind::Light),
            2 => Some(ArmorKind::Medium),
            3 => Some(ArmorKind::Heavy),
            4 => Some(ArmorKind::Shield),
            _ => None,
        }
    }
}

/// What the character currently has strapped on, derived by scanning equipped
/// inventory. Eligibility conditions key off this, never off a stored flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquippedArmor {
    /// Highest-AC equipped body armor, if any.
    pub body: Option<(ArmorKind, i32)>,
    pub shield: bool,
}

impl EquippedArmor {
    pub fn wearing_heavy(&self) -> bool {
        matches!(self.body, Some((ArmorKind::Heavy, _)))
    }

    pub fn unarmored(&self) -> bool {
        self.body.is_none() && !self.shield
    }
}

pub fn scan_equipped_armor(record: &Value) -> EquippedArmor {
    let mut out = EquippedArmor::default();
    for item in raw::arr(record, "inventory") {
        if !raw::flag(item, "equipped") {
            continue;
        }
        let Some(def) = raw::field(item, "definition") else {
            continue;
        };
        let Some(kind) = raw::int(def, "armorTypeId").and_then(ArmorKind::from_type_id) else {
            continue;
        };
        let ac = raw::int_or(def, "armorClass", 0) as i32;
        match kind {
            ArmorKind::Shield => out.shield = true,
            body => {
                if out.body.is_none_or(|(_, best)| ac > best) {
                    out.body = Some((body, ac));
                }
            }
        }
    }
    out
}
