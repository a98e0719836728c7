//! # Stored Data Migration
//!
//! Goals written by earlier versions of the tracker do not always match the
//! current shape: some carry a `categoryId` that no longer exists, some
//! predate transaction history, and some store empty strings where an
//! optional field was left blank.
//!
//! Migration is an ordered list of named steps. Each step is a pure function
//! over one raw JSON record and is idempotent, so the whole pipeline runs on
//! every load and running it over already-migrated data changes nothing.
//! New steps are appended at the end; existing steps are never edited.

use log::debug;
use serde_json::{Map, Value};

/// A single forward migration over one raw goal record
pub struct MigrationStep {
    pub name: &'static str,
    apply: fn(&mut Map<String, Value>),
}

impl MigrationStep {
    pub fn apply(&self, record: &mut Map<String, Value>) {
        (self.apply)(record)
    }
}

/// Every migration step, oldest first
pub const MIGRATIONS: &[MigrationStep] = &[
    MigrationStep {
        name: "strip_category_id",
        apply: strip_category_id,
    },
    MigrationStep {
        name: "default_history",
        apply: default_history,
    },
    MigrationStep {
        name: "drop_blank_optionals",
        apply: drop_blank_optionals,
    },
    MigrationStep {
        name: "default_balance_fields",
        apply: default_balance_fields,
    },
];

/// Version of the stored shape produced by the full pipeline
pub fn current_format_version() -> usize {
    MIGRATIONS.len()
}

/// Bring one raw record up to the current shape.
///
/// Returns `None` when the record is not a JSON object at all.
pub fn migrate_record(record: Value) -> Option<Value> {
    let mut object = match record {
        Value::Object(object) => object,
        other => {
            debug!("Skipping non-object goal record: {}", other);
            return None;
        }
    };

    for step in MIGRATIONS {
        step.apply(&mut object);
    }

    Some(Value::Object(object))
}

/// Bring a whole stored collection up to the current shape.
///
/// Returns `None` when the stored value is not a JSON array. Records that are
/// not objects are dropped.
pub fn migrate_collection(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(records) => Some(records.into_iter().filter_map(migrate_record).collect()),
        _ => None,
    }
}

fn strip_category_id(record: &mut Map<String, Value>) {
    record.remove("categoryId");
}

fn default_history(record: &mut Map<String, Value>) {
    match record.get("history") {
        Some(Value::Array(_)) => {}
        _ => {
            record.insert("history".to_string(), Value::Array(Vec::new()));
        }
    }
}

fn drop_blank_optionals(record: &mut Map<String, Value>) {
    for field in ["targetDate", "icon", "color"] {
        let blank = match record.get(field) {
            Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            _ => false,
        };
        if blank {
            record.remove(field);
        }
    }
}

fn default_balance_fields(record: &mut Map<String, Value>) {
    record
        .entry("isSpent")
        .or_insert(Value::Bool(false));
    record
        .entry("currentAmount")
        .or_insert_with(|| Value::from(0.0));
}
