//! Unit tests for the in-memory board store: services, categories, category
//! tags, flags, tag filters and the derived views.

use std::collections::BTreeMap;

use pinboard::managers::pinboard_store::{PinboardStore, PinboardStoreTrait, UNCATEGORIZED_ID};
use pinboard::types::category::{Category, CategoryUpdate};
use pinboard::types::errors::StoreError;
use pinboard::types::pinboard::PinboardData;
use pinboard::types::service::{NewService, ServiceUpdate};

fn category(id: &str, name: &str, order: i64) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        order,
        hue: None,
        tags: Vec::new(),
    }
}

fn new_service(name: &str, categories: &[&str]) -> NewService {
    NewService {
        name: name.to_string(),
        url: format!("https://{}.example", name.to_lowercase()),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    }
}

/// A board with two categories ("Writing" and "Coding") and no services.
fn store() -> PinboardStore {
    let mut data = PinboardData::empty("Test Board");
    data.categories = vec![category("w", "Writing", 0), category("c", "Coding", 1)];
    PinboardStore::new(data)
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ─── Seed board ───

#[test]
fn test_default_store_is_seed_board() {
    let store = PinboardStore::default();
    let data = store.data();
    assert_eq!(data.title, "My Pinboard");
    assert_eq!(data.categories.len(), 8);
    assert_eq!(data.services.len(), 1);
    assert_eq!(data.services[0].name, "ChatGPT");
    assert_eq!(data.available_flags, ids(&["paid", "untested", "deprecated"]));

    let web = store.get_category("6").unwrap();
    assert_eq!(web.name, "Web App Development");
    assert_eq!(web.tags, ids(&["Coding", "Hosting"]));
}

#[test]
fn test_set_title() {
    let mut store = store();
    store.set_title("Renamed");
    assert_eq!(store.data().title, "Renamed");
}

// ─── Services ───

#[test]
fn test_add_service_assigns_unique_ids() {
    let mut store = store();
    let a = store.add_service(new_service("A", &["Writing"]));
    let b = store.add_service(new_service("B", &["Writing"]));
    assert_ne!(a, b);
    assert_eq!(store.get_service(&a).unwrap().name, "A");
    assert_eq!(store.get_service(&b).unwrap().name, "B");
}

/// A new service's order is the number of services already sharing one of its categories.
#[test]
fn test_add_service_order_counts_overlapping_services() {
    let mut store = store();
    let a = store.add_service(new_service("A", &["Writing"]));
    let b = store.add_service(new_service("B", &["Writing"]));
    let c = store.add_service(new_service("C", &["Coding"]));
    let d = store.add_service(new_service("D", &["Writing", "Coding"]));
    let u = store.add_service(new_service("U", &[]));

    assert_eq!(store.get_service(&a).unwrap().order, 0);
    assert_eq!(store.get_service(&b).unwrap().order, 1);
    assert_eq!(store.get_service(&c).unwrap().order, 0);
    assert_eq!(store.get_service(&d).unwrap().order, 3);
    assert_eq!(store.get_service(&u).unwrap().order, 0);
}

#[test]
fn test_update_service_merges_fields() {
    let mut store = store();
    let id = store.add_service(new_service("A", &["Writing"]));

    store
        .update_service(
            &id,
            ServiceUpdate {
                description: Some("Edited".to_string()),
                tags: Some(ids(&["ai"])),
                ..Default::default()
            },
        )
        .unwrap();

    let service = store.get_service(&id).unwrap();
    assert_eq!(service.name, "A");
    assert_eq!(service.description, "Edited");
    assert_eq!(service.tags, ids(&["ai"]));
}

#[test]
fn test_update_unknown_service_is_not_found() {
    let mut store = store();
    let before = store.data().clone();
    let err = store.update_service("nope", ServiceUpdate::default()).unwrap_err();
    assert_eq!(err, StoreError::ServiceNotFound("nope".to_string()));
    assert_eq!(store.data(), &before);
}

#[test]
fn test_delete_service_returns_removed() {
    let mut store = store();
    let id = store.add_service(new_service("A", &["Writing"]));
    let removed = store.delete_service(&id).unwrap();
    assert_eq!(removed.name, "A");
    assert!(store.get_service(&id).is_none());
    assert!(matches!(store.delete_service(&id), Err(StoreError::ServiceNotFound(_))));
}

// ─── Flags ───

/// After an update, available flags are pruned to those some service still carries.
#[test]
fn test_update_prunes_unused_flags() {
    let mut store = store();
    store.add_flag("paid");
    store.add_flag("beta");
    let a = store.add_service(NewService {
        flags: ids(&["paid", "beta"]),
        ..new_service("A", &["Writing"])
    });

    store
        .update_service(
            &a,
            ServiceUpdate {
                flags: Some(ids(&["paid"])),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(store.data().available_flags, ids(&["paid"]));
}

#[test]
fn test_delete_prunes_flags_of_removed_service() {
    let mut store = store();
    store.add_flag("paid");
    store.add_flag("deprecated");
    let a = store.add_service(NewService {
        flags: ids(&["paid"]),
        ..new_service("A", &["Writing"])
    });
    store.add_service(NewService {
        flags: ids(&["deprecated"]),
        ..new_service("B", &["Writing"])
    });

    store.delete_service(&a).unwrap();
    assert_eq!(store.data().available_flags, ids(&["deprecated"]));
}

#[test]
fn test_add_flag_rejects_duplicates() {
    let mut store = store();
    assert!(store.add_flag("paid"));
    assert!(!store.add_flag("paid"));
    assert_eq!(store.data().available_flags, ids(&["paid"]));
}

#[test]
fn test_used_flags_in_vocabulary_order() {
    let mut store = store();
    store.add_flag("paid");
    store.add_flag("untested");
    store.add_flag("deprecated");
    store.add_service(NewService {
        flags: ids(&["deprecated", "paid"]),
        ..new_service("A", &["Writing"])
    });
    assert_eq!(store.used_flags(), ids(&["paid", "deprecated"]));
}

// ─── Ratings ───

#[test]
fn test_set_rating_toggles() {
    let mut store = store();
    let id = store.add_service(new_service("A", &["Writing"]));

    assert_eq!(store.set_rating(&id, "Writing", 4).unwrap(), Some(4));
    assert_eq!(store.get_service(&id).unwrap().rating_in("Writing"), Some(4));

    assert_eq!(store.set_rating(&id, "Writing", 3).unwrap(), Some(3));

    // Selecting the current rating clears it.
    assert_eq!(store.set_rating(&id, "Writing", 3).unwrap(), None);
    assert_eq!(store.get_service(&id).unwrap().rating_in("Writing"), None);
}

#[test]
fn test_ratings_are_per_category() {
    let mut store = store();
    let id = store.add_service(new_service("A", &["Writing", "Coding"]));
    store.set_rating(&id, "Writing", 5).unwrap();
    store.set_rating(&id, "Coding", 2).unwrap();
    store.set_rating(&id, "Coding", 0).unwrap();

    let service = store.get_service(&id).unwrap();
    assert_eq!(service.rating_in("Writing"), Some(5));
    assert_eq!(service.rating_in("Coding"), None);
}

// ─── Reordering ───

#[test]
fn test_reorder_services_within_category() {
    let mut store = store();
    let a = store.add_service(new_service("A", &["Writing"]));
    let b = store.add_service(new_service("B", &["Writing"]));
    let c = store.add_service(new_service("C", &["Writing"]));
    let other = store.add_service(new_service("X", &["Coding"]));

    store.reorder_services("Writing", &[c.clone(), a.clone(), b.clone()]);

    let names: Vec<&str> = store
        .services_in_category("Writing")
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["C", "A", "B"]);
    assert_eq!(store.get_service(&c).unwrap().order, 0);
    assert_eq!(store.get_service(&b).unwrap().order, 2);
    assert_eq!(store.get_service(&other).unwrap().order, 0);
    assert_eq!(store.data().services.len(), 4);
}

/// Unknown ids are skipped and unlisted members keep their place after the listed ones.
#[test]
fn test_reorder_services_partial_list() {
    let mut store = store();
    let a = store.add_service(new_service("A", &["Writing"]));
    let b = store.add_service(new_service("B", &["Writing"]));
    let c = store.add_service(new_service("C", &["Writing"]));

    store.reorder_services("Writing", &[c.clone(), "ghost".to_string()]);

    let order: Vec<String> = store
        .services_in_category("Writing")
        .iter()
        .map(|s| s.id.clone())
        .collect();
    assert_eq!(order, vec![c, a, b]);
}

#[test]
fn test_reorder_uncategorized() {
    let mut store = store();
    let a = store.add_service(new_service("A", &[]));
    let b = store.add_service(new_service("B", &[]));

    store.reorder_uncategorized(&[b.clone(), a.clone()]);

    let order: Vec<String> = store.uncategorized_services().iter().map(|s| s.id.clone()).collect();
    assert_eq!(order, vec![b, a]);
}

#[test]
fn test_reorder_categories() {
    let mut store = store();
    store.reorder_categories(&ids(&["c", "w"]));
    let names: Vec<&str> = store.sorted_categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Coding", "Writing"]);
    assert_eq!(store.get_category("c").unwrap().order, 0);
    assert_eq!(store.get_category("w").unwrap().order, 1);
}

// ─── Categories ───

#[test]
fn test_add_category_appends_with_next_order() {
    let mut store = store();
    let id = store.add_category("Music").unwrap();
    let category = store.get_category(&id).unwrap();
    assert_eq!(category.name, "Music");
    assert_eq!(category.order, 2);
    assert!(category.tags.is_empty());
}

/// Names join categories to services, so a second category with a taken name is refused.
#[test]
fn test_add_category_rejects_duplicate_name() {
    let mut store = store();
    let before = store.data().clone();
    let err = store.add_category("Writing").unwrap_err();
    assert_eq!(err, StoreError::DuplicateCategory("Writing".to_string()));
    assert_eq!(store.data(), &before);
}

#[test]
fn test_update_category_hue_set_and_clear() {
    let mut store = store();
    store
        .update_category("w", CategoryUpdate { hue: Some(Some(210.0)), ..Default::default() })
        .unwrap();
    assert_eq!(store.get_category("w").unwrap().hue, Some(210.0));

    store
        .update_category("w", CategoryUpdate { hue: Some(None), ..Default::default() })
        .unwrap();
    assert_eq!(store.get_category("w").unwrap().hue, None);
}

#[test]
fn test_update_unknown_category_is_not_found() {
    let mut store = store();
    let err = store.update_category("zzz", CategoryUpdate::default()).unwrap_err();
    assert_eq!(err, StoreError::CategoryNotFound("zzz".to_string()));
}

/// Renaming carries service membership, per-category tags and ratings to the new name.
#[test]
fn test_rename_category_cascades() {
    let mut store = store();
    let mut category_tags = BTreeMap::new();
    category_tags.insert("Writing".to_string(), ids(&["drafts"]));
    let mut ratings = BTreeMap::new();
    ratings.insert("Writing".to_string(), 5u8);
    let id = store.add_service(NewService {
        category_tags,
        ratings,
        ..new_service("A", &["Writing", "Coding"])
    });

    store.rename_category("w", "Prose").unwrap();

    let service = store.get_service(&id).unwrap();
    assert_eq!(service.categories, ids(&["Prose", "Coding"]));
    assert_eq!(service.category_tags.get("Prose"), Some(&ids(&["drafts"])));
    assert!(!service.category_tags.contains_key("Writing"));
    assert_eq!(service.rating_in("Prose"), Some(5));
    assert_eq!(service.rating_in("Writing"), None);
    assert_eq!(store.services_in_category("Prose").len(), 1);
}

#[test]
fn test_rename_category_rejects_duplicate_name() {
    let mut store = store();
    let before = store.data().clone();
    let err = store.rename_category("w", "Coding").unwrap_err();
    assert_eq!(err, StoreError::DuplicateCategory("Coding".to_string()));
    assert_eq!(store.data(), &before);
}

#[test]
fn test_rename_category_to_same_name_is_noop() {
    let mut store = store();
    store.rename_category("w", "Writing").unwrap();
    assert_eq!(store.get_category("w").unwrap().name, "Writing");
}

/// Deleting a category keeps its services and detaches only that category's name.
#[test]
fn test_delete_category_detaches_services() {
    let mut store = store();
    let only = store.add_service(new_service("Only", &["Writing"]));
    let both = store.add_service(new_service("Both", &["Writing", "Coding"]));

    let removed = store.delete_category("w").unwrap();
    assert_eq!(removed.name, "Writing");
    assert!(store.get_category("w").is_none());

    assert!(store.get_service(&only).unwrap().is_uncategorized());
    assert_eq!(store.get_service(&both).unwrap().categories, ids(&["Coding"]));
    assert_eq!(store.uncategorized_services().len(), 1);
}

#[test]
fn test_delete_unknown_category_is_not_found() {
    let mut store = store();
    assert!(matches!(store.delete_category("nope"), Err(StoreError::CategoryNotFound(_))));
    assert_eq!(store.data().categories.len(), 2);
}

// ─── Category tags ───

#[test]
fn test_add_tags_trims_and_skips_duplicates() {
    let mut store = store();
    let added = store
        .add_tags_to_category("c", &ids(&[" rust ", "", "go", "rust", "  "]))
        .unwrap();
    assert_eq!(added, ids(&["rust", "go"]));
    assert_eq!(store.get_category("c").unwrap().tags, ids(&["rust", "go"]));

    assert!(!store.add_tag_to_category("c", "go").unwrap());
    assert!(store.add_tag_to_category("c", "zig").unwrap());
}

#[test]
fn test_remove_tag_keeps_service_tags_and_clears_filter() {
    let mut store = store();
    store.add_tags_to_category("c", &ids(&["rust", "go"])).unwrap();
    let mut category_tags = BTreeMap::new();
    category_tags.insert("Coding".to_string(), ids(&["rust"]));
    let id = store.add_service(NewService {
        category_tags,
        ..new_service("A", &["Coding"])
    });
    store.toggle_tag_filter("c", "rust");

    store.remove_tag_from_category("c", "rust").unwrap();

    assert_eq!(store.get_category("c").unwrap().tags, ids(&["go"]));
    assert_eq!(
        store.get_service(&id).unwrap().category_tags.get("Coding"),
        Some(&ids(&["rust"]))
    );
    assert!(store.selected_tags("c").is_empty());
}

#[test]
fn test_reorder_category_tags() {
    let mut store = store();
    store.add_tags_to_category("c", &ids(&["a", "b", "c"])).unwrap();
    store.reorder_category_tags("c", ids(&["c", "a", "b"])).unwrap();
    assert_eq!(store.get_category("c").unwrap().tags, ids(&["c", "a", "b"]));
}

#[test]
fn test_available_service_tags_excludes_vocabulary() {
    let mut store = store();
    store.add_tag_to_category("c", "rust").unwrap();
    store.add_service(NewService {
        tags: ids(&["rust", "wasm"]),
        ..new_service("A", &["Coding"])
    });
    store.add_service(NewService {
        tags: ids(&["cli", "wasm"]),
        ..new_service("B", &["Coding"])
    });
    store.add_service(NewService {
        tags: ids(&["prose"]),
        ..new_service("C", &["Writing"])
    });

    assert_eq!(store.available_service_tags("c").unwrap(), ids(&["cli", "wasm"]));
}

// ─── Tag filters ───

#[test]
fn test_tag_filter_matches_any_selected_tag() {
    let mut store = store();
    store.add_service(NewService { tags: ids(&["rust"]), ..new_service("A", &["Coding"]) });
    store.add_service(NewService { tags: ids(&["go"]), ..new_service("B", &["Coding"]) });
    store.add_service(new_service("C", &["Coding"]));

    assert_eq!(store.filtered_services("c").unwrap().len(), 3);

    assert!(store.toggle_tag_filter("c", "rust"));
    let names: Vec<&str> = store.filtered_services("c").unwrap().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["A"]);

    store.toggle_tag_filter("c", "go");
    assert_eq!(store.filtered_services("c").unwrap().len(), 2);

    // Filters are per category.
    assert_eq!(store.filtered_services("w").unwrap().len(), 0);
    assert!(store.selected_tags("w").is_empty());

    assert!(!store.toggle_tag_filter("c", "rust"));
    store.clear_tag_filter("c");
    assert_eq!(store.filtered_services("c").unwrap().len(), 3);
}

#[test]
fn test_uncategorized_section_filter() {
    let mut store = store();
    store.add_service(NewService { tags: ids(&["misc"]), ..new_service("A", &[]) });
    store.add_service(new_service("B", &[]));

    store.toggle_tag_filter(UNCATEGORIZED_ID, "misc");
    assert_eq!(store.filtered_services(UNCATEGORIZED_ID).unwrap().len(), 1);
}

#[test]
fn test_filtered_services_unknown_category() {
    let store = store();
    assert!(matches!(store.filtered_services("nope"), Err(StoreError::CategoryNotFound(_))));
}

#[test]
fn test_replace_data_resets_filters() {
    let mut store = store();
    store.toggle_tag_filter("c", "rust");
    store.replace_data(PinboardData::empty("Imported"));
    assert_eq!(store.data().title, "Imported");
    assert!(store.selected_tags("c").is_empty());
}

#[test]
fn test_category_members_in_display_order() {
    let mut store = store();
    let a = store.add_service(new_service("A", &["Writing"]));
    let b = store.add_service(new_service("B", &["Writing"]));
    store.reorder_services("Writing", &[b.clone(), a.clone()]);
    assert_eq!(store.category_members("w").unwrap(), vec![b, a]);
}
