//! End-to-end scenarios over a real SQLite store.

mod common;

use std::sync::Arc;

use portion_core::config::{InventoryConfig, RationConfig, StatisticsConfig};
use portion_core::models::{DateRange, EntryKind, Meal, Period};
use portion_core::traits::{ILocalStore, IOptimalTargetStore};
use portion_core::{PortionConfig, PortionError};
use portion_storage::StorageEngine;
use portion_views::clock::FixedClock;
use portion_views::{
    Deviation, Household, InventoryView, RationView, Recommendation, StatisticsView, ViewStatus,
};

use common::{at, day, eaten, profile, stock, ScriptedFetcher};

fn engine() -> Arc<StorageEngine> {
    Arc::new(StorageEngine::open_in_memory().unwrap())
}

async fn settle(handles: Vec<tokio::task::JoinHandle<()>>) {
    for handle in handles {
        handle.await.unwrap();
    }
}

// ─── Views over local data ───

#[test]
fn full_rations_follow_total_stock() {
    let store = engine();
    store
        .insert(EntryKind::Inventory, &stock(1, 500.0, 200.0))
        .unwrap();
    let view = InventoryView::new(
        store.clone(),
        Arc::new(ScriptedFetcher::new()),
        InventoryConfig::default(),
        Arc::new(FixedClock::new(at(3, 10, 8))),
        Some(profile(2500.0)),
    )
    .unwrap();
    assert_eq!(view.cache().totals.kcal, 1000.0);
    assert_eq!(view.cache().full_rations_remaining, 0);

    store
        .insert(EntryKind::Inventory, &stock(2, 500.0, 200.0))
        .unwrap();
    view.reload_local().unwrap();
    assert_eq!(view.cache().full_rations_remaining, 0);

    store
        .insert(EntryKind::Inventory, &stock(3, 500.0, 200.0))
        .unwrap();
    view.reload_local().unwrap();
    assert_eq!(view.cache().totals.kcal, 3000.0);
    assert_eq!(view.cache().full_rations_remaining, 1);
}

#[test]
fn short_monday_asks_for_more_calories() {
    let store = engine();
    store
        .insert(EntryKind::RationLog, &eaten(3, 11, 1000.0))
        .unwrap();
    store
        .insert(EntryKind::RationLog, &eaten(3, 11, 800.0))
        .unwrap();
    store
        .insert(EntryKind::RationLog, &eaten(3, 12, 900.0))
        .unwrap();

    let view = RationView::new(
        store.clone(),
        store.clone(),
        Arc::new(ScriptedFetcher::new()),
        &RationConfig::default(),
        Some(profile(2000.0)),
        day(3, 11),
    )
    .unwrap();

    let cache = view.cache();
    assert_eq!(cache.entries.len(), 2);
    assert_eq!(cache.totals.kcal, 1800.0);
    assert_eq!(cache.completion_pct, 90.0);
    assert_eq!(cache.deviation, Deviation::Below);
    assert_eq!(cache.recommendation, Recommendation::IncreaseCalories);
    assert!(cache.recommendation.to_string().contains("more calories"));
}

#[test]
fn week_average_counts_only_logged_days() {
    let store = engine();
    store
        .insert(EntryKind::RationLog, &eaten(3, 11, 1800.0))
        .unwrap();
    store
        .insert(EntryKind::RationLog, &eaten(3, 14, 2200.0))
        .unwrap();

    let view = StatisticsView::new(
        store.clone(),
        store.clone(),
        Arc::new(ScriptedFetcher::new()),
        StatisticsConfig::default(),
        Some(profile(2000.0)),
        Period::Week,
        day(3, 13),
    )
    .unwrap();

    let cache = view.cache();
    assert_eq!(cache.range, DateRange::new(day(3, 11), day(3, 17)));
    assert_eq!(cache.daily_sums.len(), 2);
    assert_eq!(cache.averages.kcal, 2000.0);
    assert_eq!(cache.deviation_pct, 0.0);
}

// ─── Per-day targets ───

#[tokio::test]
async fn day_target_is_frozen_once_created() {
    let store = engine();
    let view = RationView::new(
        store.clone(),
        store.clone(),
        Arc::new(ScriptedFetcher::new()),
        &RationConfig::default(),
        Some(profile(2000.0)),
        day(3, 11),
    )
    .unwrap();
    assert_eq!(view.cache().target.targets.kcal, 2000.0);

    view.set_profile(Some(profile(2500.0))).unwrap().await.unwrap();
    assert_eq!(view.cache().target.targets.kcal, 2000.0);

    view.select_date(day(3, 12)).unwrap().await.unwrap();
    assert_eq!(view.cache().target.targets.kcal, 2500.0);

    // Revisiting a day reuses its record.
    view.select_date(day(3, 11)).unwrap().await.unwrap();
    assert_eq!(view.cache().target.targets.kcal, 2000.0);

    let stored = store
        .targets_in(DateRange::new(day(3, 1), day(3, 31)))
        .unwrap();
    assert_eq!(stored.len(), 2);

    let stats = StatisticsView::new(
        store.clone(),
        store.clone(),
        Arc::new(ScriptedFetcher::new()),
        StatisticsConfig::default(),
        Some(profile(1000.0)),
        Period::Week,
        day(3, 13),
    )
    .unwrap();
    assert_eq!(stats.cache().target_averages.kcal, 2250.0);
}

#[tokio::test]
async fn statistics_pick_up_day_targets_stored_later() {
    let store = engine();
    let stats = StatisticsView::new(
        store.clone(),
        store.clone(),
        Arc::new(ScriptedFetcher::new()),
        StatisticsConfig::default(),
        Some(profile(2000.0)),
        Period::Week,
        day(3, 13),
    )
    .unwrap();
    assert_eq!(stats.cache().target_averages.kcal, 2000.0);

    let tuesday = RationView::new(
        store.clone(),
        store.clone(),
        Arc::new(ScriptedFetcher::new()),
        &RationConfig::default(),
        Some(profile(3000.0)),
        day(3, 12),
    )
    .unwrap();
    assert_eq!(tuesday.cache().target.targets.kcal, 3000.0);

    stats.refresh().unwrap().await.unwrap();
    assert_eq!(stats.day_targets().len(), 1);
    assert_eq!(stats.cache().target_averages.kcal, 3000.0);

    RationView::new(
        store.clone(),
        store.clone(),
        Arc::new(ScriptedFetcher::new()),
        &RationConfig::default(),
        Some(profile(2000.0)),
        day(3, 14),
    )
    .unwrap();
    stats.reload_local().unwrap();
    assert_eq!(stats.cache().target_averages.kcal, 2500.0);
}

// ─── Household write path ───

fn household(
    store: &Arc<StorageEngine>,
    signed_in: bool,
) -> (Household<Arc<ScriptedFetcher>>, Arc<ScriptedFetcher>) {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let household = Household::new(
        store.clone(),
        fetcher.clone(),
        &PortionConfig::default(),
        Arc::new(FixedClock::new(at(3, 11, 12))),
        signed_in.then(|| profile(2000.0)),
    )
    .unwrap();
    (household, fetcher)
}

#[tokio::test]
async fn logging_a_serving_updates_every_view() {
    let store = engine();
    let id = store
        .insert(EntryKind::Inventory, &stock(1, 500.0, 200.0))
        .unwrap();
    let (household, fetcher) = household(&store, true);

    let outcome = household
        .log_serving(id, 100.0, Meal::Breakfast)
        .await
        .unwrap();
    assert_eq!(outcome.value.served().kcal, 200.0);
    assert_eq!(outcome.refreshes.len(), 3);
    settle(outcome.refreshes).await;
    assert_eq!(fetcher.calls(), 4);

    let held = store.get(EntryKind::Inventory, id).unwrap().unwrap();
    assert_eq!(held.volume_grams, 400.0);
    assert_eq!(household.inventory().cache().totals.kcal, 800.0);
    assert_eq!(household.ration().cache().totals.kcal, 200.0);
    assert_eq!(household.statistics().cache().averages.kcal, 200.0);

    let logged = store.list(EntryKind::RationLog).unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].served(), outcome.value.served());
}

#[tokio::test]
async fn write_during_a_running_fetch_still_refetches() {
    let store = engine();
    let id = store
        .insert(EntryKind::Inventory, &stock(1, 500.0, 200.0))
        .unwrap();
    let (household, fetcher) = household(&store, true);
    let gate = fetcher.gate(day(3, 11));

    let before_write = household.ration().refresh().unwrap();
    let generation = household.ration().generation();

    let outcome = household
        .log_serving(id, 100.0, Meal::Breakfast)
        .await
        .unwrap();
    assert!(household.ration().generation() > generation);
    assert_eq!(outcome.refreshes.len(), 3);

    let mut handles = vec![before_write];
    handles.extend(outcome.refreshes);
    for handle in handles {
        while !handle.is_finished() {
            gate.notify_one();
            tokio::task::yield_now().await;
        }
        handle.await.unwrap();
    }

    // One ration fetch before the write, then all three views after it.
    assert_eq!(fetcher.calls(), 5);
    assert_eq!(household.ration().status(), ViewStatus::Ready);
    assert_eq!(household.ration().cache().totals.kcal, 200.0);
}

#[tokio::test]
async fn oversized_serving_is_rejected_without_changes() {
    let store = engine();
    let id = store
        .insert(EntryKind::Inventory, &stock(1, 500.0, 200.0))
        .unwrap();
    let (household, fetcher) = household(&store, true);

    let err = household
        .log_serving(id, 600.0, Meal::Dinner)
        .await
        .unwrap_err();
    assert!(matches!(err, PortionError::InsufficientQuantity { .. }));
    assert_eq!(fetcher.calls(), 0);

    let held = store.get(EntryKind::Inventory, id).unwrap().unwrap();
    assert_eq!(held.volume_grams, 500.0);
    assert!(store.list(EntryKind::RationLog).unwrap().is_empty());
    assert_eq!(household.inventory().cache().totals.kcal, 1000.0);
}

#[tokio::test]
async fn eating_everything_removes_the_item() {
    let store = engine();
    let id = store
        .insert(EntryKind::Inventory, &stock(1, 500.0, 200.0))
        .unwrap();
    let (household, _) = household(&store, true);

    let outcome = household.log_serving(id, 500.0, Meal::Lunch).await.unwrap();
    settle(outcome.refreshes).await;

    assert!(store.get(EntryKind::Inventory, id).unwrap().is_none());
    assert!(household.inventory().current().is_empty());
    assert_eq!(household.ration().cache().totals.kcal, 1000.0);
}

#[tokio::test]
async fn writes_need_a_profile() {
    let store = engine();
    let id = store
        .insert(EntryKind::Inventory, &stock(1, 500.0, 200.0))
        .unwrap();
    let (household, _) = household(&store, false);

    let err = household
        .log_serving(id, 100.0, Meal::Lunch)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NO_IDENTITY");
    let err = household.record_order(Vec::new()).await.unwrap_err();
    assert_eq!(err.error_code(), "NO_IDENTITY");
}

#[tokio::test]
async fn placed_order_lands_in_inventory_and_statistics() {
    let store = engine();
    let (household, _) = household(&store, true);
    let me = household.profile().unwrap().identity;
    let mut held = stock(1, 500.0, 200.0).owned_by(me.user_id.to_string(), "0");
    held.recorded_at = at(3, 11, 9);
    store.insert(EntryKind::Inventory, &held).unwrap();
    household.inventory().reload_local().unwrap();

    let mut same_product = stock(1, 250.0, 200.0).from_store(1, "Home Market", 4.0);
    same_product.recorded_at = at(3, 11, 10);
    let mut elsewhere = stock(9, 100.0, 50.0).from_store(4, "Corner Shop", 6.0);
    elsewhere.recorded_at = at(3, 11, 10);

    let outcome = household
        .record_order(vec![same_product, elsewhere])
        .await
        .unwrap();
    assert_eq!(outcome.value.purchases_recorded, 2);
    assert_eq!(outcome.value.inventory_merged, 1);
    assert_eq!(outcome.value.inventory_inserted, 0);
    settle(outcome.refreshes).await;

    let inventory = household.inventory().current();
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].volume_grams, 750.0);

    let stats = household.statistics().cache();
    assert_eq!(stats.cost.total_spend, 10.0);
    let labels: Vec<&str> = stats
        .category_costs
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(labels, vec!["Other", "Legumes"]);
}
