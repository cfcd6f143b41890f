//! Rule-version classification.
//!
//! The upstream service serves characters built under either the 2014 rules
//! or the 2024 revision, and the record carries no explicit version field.
//! Detection is heuristic over embedded sourcebook ids and legacy flags,
//! decided once per computation and threaded into every version-dependent
//! calculator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::raw;

/// Which of the two incompatible rule sets governs this character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleVersion {
    #[serde(rename = "2014")]
    Legacy2014,
    #[serde(rename = "2024")]
    Current2024,
}

/// Detection result: the version plus a human-readable justification,
/// surfaced in logs so odd classifications can be audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub version: RuleVersion,
    pub reason: String,
}

/// Sourcebook ids of the 2024 core books (PHB/DMG/MM revisions).
const CORE_2024_SOURCE_IDS: &[i64] = &[145, 146, 147];

impl RuleVersion {
    /// Classify the record. Deterministic, no I/O. When signals conflict or
    /// are absent, defaults to 2014 (the larger installed base upstream).
    pub fn detect(record: &Value) -> Detection {
        for class in raw::arr(record, "classes") {
            if let Some(def) = raw::field(class, "definition") {
                if let Some(id) = source_id_2024(def) {
                    return Detection {
                        version: RuleVersion::Current2024,
                        reason: format!(
                            "class '{}' cites 2024 core source id {}",
                            raw::str_field(def, "name").unwrap_or("?"),
                            id
                        ),
                    };
                }
            }
        }
        if let Some(race) = raw::field(record, "race") {
            if let Some(id) = source_id_2024(race) {
                return Detection {
                    version: RuleVersion::Current2024,
                    reason: format!(
                        "species '{}' cites 2024 core source id {}",
                        species_name(race).unwrap_or("?"),
                        id
                    ),
                };
            }
            if raw::flag(race, "isLegacy") {
                return Detection {
                    version: RuleVersion::Legacy2014,
                    reason: "species carries an explicit legacy flag".to_string(),
                };
            }
        }
        if let Some(class) = raw::arr(record, "classes").first() {
            if raw::path(class, &["definition", "isLegacy"])
                .and_then(Value::as_bool)
                .unwrap_or(false)
            {
                return Detection {
                    version: RuleVersion::Legacy2014,
                    reason: "starting class carries an explicit legacy flag".to_string(),
                };
            }
        }
        Detection {
            version: RuleVersion::Legacy2014,
            reason: "no 2024 source signal; defaulting to 2014".to_string(),
        }
    }
}

fn source_id_2024(def: &Value) -> Option<i64> {
    raw::arr(def, "sources")
        .iter()
        .filter_map(|s| raw::int(s, "sourceId"))
        .find(|id| CORE_2024_SOURCE_IDS.contains(id))
}

pub fn species_name(race: &Value) -> Option<&str> {
    raw::str_field(race, "fullName").or_else(|| raw::str_field(race, "baseName"))
}
