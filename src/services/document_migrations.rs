//! Versioned upgrades for the persisted board document.
//!
//! Each step is a pure transform over the JSON tree, applied in version order
//! from the version the document was stored with. Documents with no recorded
//! version (imports, rows written before versioning) start at 0. Every step
//! only fills in or removes fields, so re-running it on an up-to-date
//! document changes nothing.

use serde_json::{Map, Value};

/// Schema version of documents written by this build.
pub const CURRENT_DOCUMENT_VERSION: u32 = 3;

type Step = fn(&mut Map<String, Value>);

/// (target version, description, transform), in ascending version order.
const STEPS: &[(u32, &str, Step)] = &[
    (1, "categories gain a tag vocabulary", add_category_tags),
    (2, "per-category ratings replace the single rating", migrate_ratings),
    (3, "services gain per-category tags", add_service_category_tags),
];

/// Applies every step newer than `from_version` and returns the upgraded document.
///
/// Non-object documents are returned untouched; deserialization rejects them later.
pub fn migrate(mut document: Value, from_version: u32) -> Value {
    let Some(root) = document.as_object_mut() else {
        return document;
    };
    for (version, description, step) in STEPS {
        if *version > from_version {
            step(root);
            tracing::debug!(version, description, "upgraded board document");
        }
    }
    document
}

fn for_each_entry(root: &mut Map<String, Value>, field: &str, mut f: impl FnMut(&mut Map<String, Value>)) {
    if let Some(Value::Array(items)) = root.get_mut(field) {
        for item in items.iter_mut().filter_map(Value::as_object_mut) {
            f(item);
        }
    }
}

fn ensure_field(entry: &mut Map<String, Value>, field: &str, default: Value) {
    if matches!(entry.get(field), None | Some(Value::Null)) {
        entry.insert(field.to_string(), default);
    }
}

fn add_category_tags(root: &mut Map<String, Value>) {
    for_each_entry(root, "categories", |category| {
        ensure_field(category, "tags", Value::Array(Vec::new()));
    });
}

/// The old single star rating had no category, so it cannot be carried over.
fn migrate_ratings(root: &mut Map<String, Value>) {
    for_each_entry(root, "services", |service| {
        service.remove("rating");
        ensure_field(service, "ratings", Value::Object(Map::new()));
    });
}

fn add_service_category_tags(root: &mut Map<String, Value>) {
    for_each_entry(root, "services", |service| {
        ensure_field(service, "categoryTags", Value::Object(Map::new()));
    });
}
