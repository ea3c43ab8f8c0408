//! Local store: CRUD per kind, the serving write path, order merging,
//! per-day targets and file persistence.

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use portion_core::models::{
    DateRange, Entry, EntryKind, Macros, Meal, OptimalTarget, Serving,
};
use portion_core::traits::{ILocalStore, IOptimalTargetStore};
use portion_core::PortionError;
use portion_storage::migrations::LATEST_VERSION;
use portion_storage::StorageEngine;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

fn oats(grams: f64) -> Entry {
    Entry::new(501, "Oats", at(2024, 5, 1, 9))
        .with_quantity(grams, "g", grams)
        .with_nutrition(Macros::new(370.0, 13.0, 7.0, 60.0))
        .expiring(day(2024, 11, 1))
        .in_category("Grains")
        .owned_by("user-a", "fam-1")
        .from_store(1, "Home Market", 3.5)
}

fn setup() -> StorageEngine {
    StorageEngine::open_in_memory().unwrap()
}

// ─── Schema ───

#[test]
fn fresh_store_is_at_latest_version() {
    let store = setup();
    assert_eq!(store.schema_version().unwrap(), LATEST_VERSION);
}

#[test]
fn reopening_a_file_does_not_rerun_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portion.db");
    {
        let store = StorageEngine::open(&path).unwrap();
        store.insert(EntryKind::Inventory, &oats(500.0)).unwrap();
    }
    let reopened = StorageEngine::open(&path).unwrap();
    assert_eq!(reopened.schema_version().unwrap(), LATEST_VERSION);
    assert_eq!(reopened.list(EntryKind::Inventory).unwrap().len(), 1);
}

// ─── CRUD ───

#[test]
fn kinds_are_isolated() {
    let store = setup();
    store.insert(EntryKind::Inventory, &oats(500.0)).unwrap();
    store.insert(EntryKind::Purchase, &oats(500.0)).unwrap();

    assert_eq!(store.list(EntryKind::Inventory).unwrap().len(), 1);
    assert_eq!(store.list(EntryKind::Purchase).unwrap().len(), 1);
    assert!(store.list(EntryKind::RationLog).unwrap().is_empty());
}

#[test]
fn insert_then_get_preserves_every_field() {
    let store = setup();
    let source = oats(500.0).with_preference("Breakfast");
    let serving = Serving::portion(&source, 80.0, Meal::Breakfast).unwrap();
    let line = Entry::ration_line(&source, serving, at(2024, 5, 2, 8), "user-a");

    let id = store.insert(EntryKind::RationLog, &line).unwrap();
    let read = store.get(EntryKind::RationLog, id).unwrap().unwrap();

    assert_eq!(read.id, Some(id));
    assert_eq!(Entry { id: None, ..read }, line);
}

#[test]
fn save_overwrites_and_unknown_ids_fail() {
    let store = setup();
    let id = store.insert(EntryKind::Inventory, &oats(500.0)).unwrap();
    let mut held = store.get(EntryKind::Inventory, id).unwrap().unwrap();
    held.name = "Rolled oats".into();
    store.save(EntryKind::Inventory, &held).unwrap();
    assert_eq!(
        store.get(EntryKind::Inventory, id).unwrap().unwrap().name,
        "Rolled oats"
    );

    held.id = Some(9_999);
    let err = store.save(EntryKind::Inventory, &held).unwrap_err();
    assert_eq!(err.error_code(), "STORAGE_NOT_FOUND");
}

#[test]
fn delete_removes_and_reports_missing() {
    let store = setup();
    let id = store.insert(EntryKind::Inventory, &oats(500.0)).unwrap();
    store.delete(EntryKind::Inventory, id).unwrap();
    assert!(store.get(EntryKind::Inventory, id).unwrap().is_none());
    assert!(store.delete(EntryKind::Inventory, id).is_err());
}

// ─── Serving write path ───

#[test]
fn logging_a_serving_deducts_and_appends() {
    let store = setup();
    let id = store.insert(EntryKind::Inventory, &oats(500.0)).unwrap();
    let held = store.get(EntryKind::Inventory, id).unwrap().unwrap();
    let serving = Serving::portion(&held, 120.0, Meal::Breakfast).unwrap();
    let line = Entry::ration_line(&held, serving, at(2024, 5, 3, 8), "user-a");

    let deduction = store.log_serving(id, &line).unwrap();
    assert!((deduction.remaining_grams - 380.0).abs() < 1e-9);

    let after = store.get(EntryKind::Inventory, id).unwrap().unwrap();
    assert!((after.volume_grams - 380.0).abs() < 1e-9);
    assert!((after.volume - 380.0).abs() < 1e-9);

    let log = store.list(EntryKind::RationLog).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].served().kcal, serving.served.kcal);
}

#[test]
fn using_up_an_entry_deletes_it() {
    let store = setup();
    let id = store.insert(EntryKind::Inventory, &oats(200.0)).unwrap();
    let held = store.get(EntryKind::Inventory, id).unwrap().unwrap();
    let serving = Serving::portion(&held, 200.0, Meal::Lunch).unwrap();
    let line = Entry::ration_line(&held, serving, at(2024, 5, 3, 13), "user-a");

    assert!(store.log_serving(id, &line).unwrap().exhausts());
    assert!(store.get(EntryKind::Inventory, id).unwrap().is_none());
    assert_eq!(store.list(EntryKind::RationLog).unwrap().len(), 1);
}

#[test]
fn oversized_serving_is_rejected_without_mutation() {
    let store = setup();
    let id = store.insert(EntryKind::Inventory, &oats(500.0)).unwrap();
    let big_batch = oats(900.0);
    let serving = Serving::portion(&big_batch, 700.0, Meal::Dinner).unwrap();
    let line = Entry::ration_line(&big_batch, serving, at(2024, 5, 3, 19), "user-a");

    let err = store.log_serving(id, &line).unwrap_err();
    assert!(matches!(err, PortionError::InsufficientQuantity { .. }));

    let after = store.get(EntryKind::Inventory, id).unwrap().unwrap();
    assert_eq!(after.volume_grams, 500.0);
    assert!(store.list(EntryKind::RationLog).unwrap().is_empty());
}

#[test]
fn serving_from_a_missing_entry_is_not_found() {
    let store = setup();
    let source = oats(500.0);
    let serving = Serving::portion(&source, 10.0, Meal::Lunch).unwrap();
    let line = Entry::ration_line(&source, serving, at(2024, 5, 3, 13), "user-a");
    let err = store.log_serving(42, &line).unwrap_err();
    assert_eq!(err.error_code(), "STORAGE_NOT_FOUND");
    assert!(store.list(EntryKind::RationLog).unwrap().is_empty());
}

// ─── Orders ───

#[test]
fn order_merges_primary_store_items_into_inventory() {
    let store = setup();
    store.insert(EntryKind::Inventory, &oats(500.0)).unwrap();

    let restock = oats(1000.0).expiring(day(2024, 9, 1));
    let other_store = oats(250.0).from_store(7, "Corner Shop", 1.2);
    let new_product = Entry::new(777, "Lentils", at(2024, 5, 4, 10))
        .with_quantity(400.0, "g", 400.0)
        .owned_by("user-a", "fam-1")
        .from_store(1, "Home Market", 2.0);

    let receipt = store
        .record_order(&[restock, other_store, new_product], 1)
        .unwrap();
    assert_eq!(receipt.purchases_recorded, 3);
    assert_eq!(receipt.inventory_merged, 1);
    assert_eq!(receipt.inventory_inserted, 1);

    let inventory = store.list(EntryKind::Inventory).unwrap();
    assert_eq!(inventory.len(), 2);
    let merged = inventory.iter().find(|e| e.product_id == 501).unwrap();
    assert_eq!(merged.volume_grams, 1500.0);
    assert_eq!(merged.total_cost, 7.0);
    assert_eq!(merged.expire_date, day(2024, 9, 1));
    assert_eq!(store.list(EntryKind::Purchase).unwrap().len(), 3);
}

#[test]
fn order_does_not_merge_across_owners() {
    let store = setup();
    store.insert(EntryKind::Inventory, &oats(500.0)).unwrap();
    let theirs = oats(300.0).owned_by("user-b", "fam-1");
    store.record_order(&[theirs], 1).unwrap();
    assert_eq!(store.list(EntryKind::Inventory).unwrap().len(), 2);
}

// ─── Targets ───

#[test]
fn get_or_create_freezes_the_first_target() {
    let store = setup();
    let date = day(2024, 5, 6);
    assert!(store.get_target(date).unwrap().is_none());

    let first = OptimalTarget::new(date, Macros::new(2000.0, 100.0, 70.0, 250.0));
    let later_profile = OptimalTarget::new(date, Macros::new(2600.0, 140.0, 80.0, 300.0));

    assert_eq!(store.get_or_create_target(&first).unwrap(), first);
    assert_eq!(store.get_or_create_target(&later_profile).unwrap(), first);
    assert_eq!(store.get_target(date).unwrap(), Some(first));
}

#[test]
fn targets_in_range_are_ordered() {
    let store = setup();
    for d in [9, 3, 6, 20] {
        let t = OptimalTarget::new(day(2024, 5, d), Macros::new(2000.0 + d as f64, 0.0, 0.0, 0.0));
        store.get_or_create_target(&t).unwrap();
    }
    let found = store
        .targets_in(DateRange::new(day(2024, 5, 1), day(2024, 5, 10)))
        .unwrap();
    let dates: Vec<_> = found.iter().map(|t| t.date).collect();
    assert_eq!(dates, vec![day(2024, 5, 3), day(2024, 5, 6), day(2024, 5, 9)]);
}

#[test]
fn targets_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("targets.db");
    let target = OptimalTarget::new(day(2024, 5, 6), Macros::new(1900.0, 90.0, 60.0, 230.0));
    {
        let store = StorageEngine::open(&path).unwrap();
        store.get_or_create_target(&target).unwrap();
    }
    let store = StorageEngine::open(&path).unwrap();
    assert_eq!(store.get_target(target.date).unwrap(), Some(target));
}

proptest! {
    #[test]
    fn get_or_create_is_idempotent_per_date(kcals in prop::collection::vec(1.0f64..5000.0, 1..8)) {
        let store = setup();
        let date = day(2024, 6, 1);
        let first = OptimalTarget::new(date, Macros::new(kcals[0], 0.0, 0.0, 0.0));
        for kcal in &kcals {
            let candidate = OptimalTarget::new(date, Macros::new(*kcal, 0.0, 0.0, 0.0));
            prop_assert_eq!(store.get_or_create_target(&candidate).unwrap(), first);
        }
        prop_assert_eq!(store.targets_in(DateRange::single(date)).unwrap().len(), 1);
    }
}
