#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for expanded-section persistence across reloads.

use opsdesk_core::sections::{SectionList, SECTION_EXPANDED_STORAGE_KEY};
use opsdesk_core::traits::{MemoryPreferenceStore, PreferenceStore};
use opsdesk_core::types::Section;
use serde_json::json;

fn invoice_sections() -> Vec<Section> {
    vec![
        Section::new("Overview"),
        Section::new("Line items").expandable(),
        Section::new("Payment plan").expandable(),
    ]
}

#[test]
fn expanded_sections_survive_a_reload() {
    let store = MemoryPreferenceStore::new();
    let mut list = SectionList::new(invoice_sections(), 2);
    list.toggle_expanded(1);
    list.toggle_expanded(2);
    list.persist_expanded(&store, "Invoice").unwrap();

    let mut reloaded = SectionList::new(invoice_sections(), 2);
    reloaded.load_expanded(&store, "Invoice").unwrap();
    assert!(!reloaded.is_expanded(0));
    assert!(reloaded.is_expanded(1));
    assert!(reloaded.is_expanded(2));
}

#[test]
fn root_entities_share_one_key_without_collisions() {
    let store = MemoryPreferenceStore::new();
    let mut invoices = SectionList::new(invoice_sections(), 2);
    invoices.toggle_expanded(1);
    invoices.persist_expanded(&store, "Invoice").unwrap();

    let mut orders = SectionList::new(
        vec![Section::new("Summary"), Section::new("Items").expandable()],
        2,
    );
    orders.toggle_expanded(1);
    orders.persist_expanded(&store, "Order").unwrap();

    // Both entities live under the single shared key.
    let raw = store.get(SECTION_EXPANDED_STORAGE_KEY).unwrap().unwrap();
    let map: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(map["Invoice"], json!([1]));
    assert_eq!(map["Order"], json!([1]));

    let mut reloaded = SectionList::new(invoice_sections(), 2);
    reloaded.load_expanded(&store, "Invoice").unwrap();
    assert!(reloaded.is_expanded(1));
    assert!(!reloaded.is_expanded(0));
}

#[test]
fn absent_key_leaves_defaults_alone() {
    let store = MemoryPreferenceStore::new();
    let mut list = SectionList::new(invoice_sections(), 2);
    list.load_expanded(&store, "Invoice").unwrap();
    assert!(!list.is_expanded(1));
    assert!(!list.is_expanded(2));
}

#[test]
fn stale_indices_are_dropped_on_load() {
    let store = MemoryPreferenceStore::new();
    store
        .set(SECTION_EXPANDED_STORAGE_KEY, r#"{"Invoice": [1, 7]}"#)
        .unwrap();

    let mut list = SectionList::new(invoice_sections(), 2);
    list.load_expanded(&store, "Invoice").unwrap();
    assert!(list.is_expanded(1));
    assert!(!list.is_expanded(7));
}

#[test]
fn unreadable_stored_map_fails_load_without_touching_state() {
    let store = MemoryPreferenceStore::new();
    store.set(SECTION_EXPANDED_STORAGE_KEY, "not-json").unwrap();

    let mut list = SectionList::new(invoice_sections(), 2);
    assert!(list.load_expanded(&store, "Invoice").is_err());
    assert!(!list.is_expanded(1));
}

#[test]
fn unreadable_stored_map_is_replaced_on_persist() {
    let store = MemoryPreferenceStore::new();
    store.set(SECTION_EXPANDED_STORAGE_KEY, "not-json").unwrap();

    let mut list = SectionList::new(invoice_sections(), 2);
    list.toggle_expanded(2);
    list.persist_expanded(&store, "Invoice").unwrap();

    let raw = store.get(SECTION_EXPANDED_STORAGE_KEY).unwrap().unwrap();
    let map: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(map, json!({"Invoice": [2]}));
}
