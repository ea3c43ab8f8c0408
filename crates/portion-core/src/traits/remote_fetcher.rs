//! `IRemoteFetcher` trait: async per-entity snapshot fetches.
//!
//! Every call takes the identity explicitly. Futures are `Send` so the
//! refresh path can spawn them.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::FetchError;
use crate::models::{DateRange, Entry, Identity};

pub trait IRemoteFetcher: Send + Sync + 'static {
    /// Current inventory for the identity's account.
    fn fetch_inventory(
        &self,
        identity: &Identity,
    ) -> impl Future<Output = Result<Vec<Entry>, FetchError>> + Send;

    /// Ration log lines consumed on `day`.
    fn fetch_rations_on(
        &self,
        identity: &Identity,
        day: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Entry>, FetchError>> + Send;

    /// Ration log lines consumed inside `range`.
    fn fetch_rations_between(
        &self,
        identity: &Identity,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<Entry>, FetchError>> + Send;

    /// Purchase history inside `range`.
    fn fetch_purchases_between(
        &self,
        identity: &Identity,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<Entry>, FetchError>> + Send;
}

impl<T: IRemoteFetcher> IRemoteFetcher for Arc<T> {
    fn fetch_inventory(
        &self,
        identity: &Identity,
    ) -> impl Future<Output = Result<Vec<Entry>, FetchError>> + Send {
        (**self).fetch_inventory(identity)
    }

    fn fetch_rations_on(
        &self,
        identity: &Identity,
        day: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Entry>, FetchError>> + Send {
        (**self).fetch_rations_on(identity, day)
    }

    fn fetch_rations_between(
        &self,
        identity: &Identity,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<Entry>, FetchError>> + Send {
        (**self).fetch_rations_between(identity, range)
    }

    fn fetch_purchases_between(
        &self,
        identity: &Identity,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<Entry>, FetchError>> + Send {
        (**self).fetch_purchases_between(identity, range)
    }
}
