//! Shared fixtures: a scripted remote fetcher and entry builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::Notify;
use uuid::Uuid;

use portion_core::models::{DateRange, Entry, Identity, Macros, Meal, Serving, UserProfile};
use portion_core::traits::IRemoteFetcher;
use portion_core::FetchError;

pub type Reply = Result<Vec<Entry>, FetchError>;

/// Fetcher with canned replies; unscripted calls return an empty list. Ration-by-day calls can be held
/// on a gate until the test releases them.
#[derive(Default)]
pub struct ScriptedFetcher {
    inventory: Mutex<Option<Reply>>,
    rations_by_day: Mutex<HashMap<NaiveDate, Reply>>,
    rations_in_range: Mutex<Option<Reply>>,
    purchases_in_range: Mutex<Option<Reply>>,
    gates: Mutex<HashMap<NaiveDate, Arc<Notify>>>,
    calls: AtomicUsize,
    identities: Mutex<Vec<Identity>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_inventory(&self, reply: Reply) {
        *self.inventory.lock().unwrap() = Some(reply);
    }

    pub fn script_rations_on(&self, day: NaiveDate, reply: Reply) {
        self.rations_by_day.lock().unwrap().insert(day, reply);
    }

    pub fn script_rations_in_range(&self, reply: Reply) {
        *self.rations_in_range.lock().unwrap() = Some(reply);
    }

    pub fn script_purchases_in_range(&self, reply: Reply) {
        *self.purchases_in_range.lock().unwrap() = Some(reply);
    }

    /// Hold every ration fetch for `day` until the returned gate is notified.
    pub fn gate(&self, day: NaiveDate) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(day, Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn identities(&self) -> Vec<Identity> {
        self.identities.lock().unwrap().clone()
    }

    fn record(&self, identity: &Identity) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.identities.lock().unwrap().push(identity.clone());
    }

    fn scripted(slot: &Mutex<Option<Reply>>) -> Reply {
        slot.lock().unwrap().clone().unwrap_or_else(|| Ok(Vec::new()))
    }
}

impl IRemoteFetcher for ScriptedFetcher {
    async fn fetch_inventory(&self, identity: &Identity) -> Result<Vec<Entry>, FetchError> {
        self.record(identity);
        Self::scripted(&self.inventory)
    }

    async fn fetch_rations_on(
        &self,
        identity: &Identity,
        day: NaiveDate,
    ) -> Result<Vec<Entry>, FetchError> {
        self.record(identity);
        let gate = self.gates.lock().unwrap().get(&day).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let reply = self.rations_by_day.lock().unwrap().get(&day).cloned();
        reply.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_rations_between(
        &self,
        identity: &Identity,
        _range: DateRange,
    ) -> Result<Vec<Entry>, FetchError> {
        self.record(identity);
        Self::scripted(&self.rations_in_range)
    }

    async fn fetch_purchases_between(
        &self,
        identity: &Identity,
        _range: DateRange,
    ) -> Result<Vec<Entry>, FetchError> {
        self.record(identity);
        Self::scripted(&self.purchases_in_range)
    }
}

pub fn day(month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, d).unwrap()
}

pub fn at(month: u32, d: u32, hour: u32) -> NaiveDateTime {
    day(month, d).and_hms_opt(hour, 0, 0).unwrap()
}

pub fn profile(kcal: f64) -> UserProfile {
    UserProfile::new(
        Identity::personal(Uuid::new_v4()),
        Macros::new(kcal, 100.0, 70.0, 250.0),
    )
}

/// A ration log line that served `kcal` on the given day.
pub fn eaten(month: u32, d: u32, kcal: f64) -> Entry {
    Entry::new(7, "Soup", at(month, d, 13)).with_serving(Serving {
        meal: Meal::Lunch,
        served_volume: 1.0,
        served_volume_grams: 250.0,
        served: Macros::new(kcal, 40.0, 30.0, 120.0),
    })
}

/// An inventory item of `grams` at `kcal_100g`, expiring in the far future.
pub fn stock(product_id: i64, grams: f64, kcal_100g: f64) -> Entry {
    Entry::new(product_id, "Lentils", at(3, 1, 9))
        .with_quantity(grams, "g", grams)
        .with_nutrition(Macros::new(kcal_100g, 9.0, 0.4, 20.0))
        .expiring(day(12, 31))
        .in_category("Legumes")
}
