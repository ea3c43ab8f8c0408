//! `HttpFetcher`: JSON POST client for the household service.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use portion_core::config::RemoteConfig;
use portion_core::models::{AccountKind, DateRange, Entry, Identity};
use portion_core::traits::IRemoteFetcher;
use portion_core::{FetchError, PortionError, PortionResult};

use crate::wire;

const INVENTORY_ENDPOINT: &str = "get_main_purch";
const RATION_DAY_ENDPOINT: &str = "get_ration_by_date";
const RATION_RANGE_ENDPOINT: &str = "get_ration_by_daterange";
const PURCHASES_ENDPOINT: &str = "get_allpurch_by_daterange";

/// Remote fetcher over HTTP. One shared connection pool; every request
/// is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    date_format: String,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(config: &RemoteConfig) -> PortionResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PortionError::ConfigError(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            date_format: config.date_format.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    fn now() -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                seconds: self.timeout_secs,
            }
        } else if err.is_decode() {
            FetchError::Decode {
                message: err.to_string(),
            }
        } else {
            FetchError::Transport {
                message: err.to_string(),
            }
        }
    }

    /// POST `body` to `endpoint` and return the row arrays under `field`.
    async fn post_rows(
        &self,
        endpoint: &str,
        body: Value,
        field: &str,
    ) -> Result<Vec<Vec<Value>>, FetchError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, "remote fetch");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        wire::decode_rows(&text, field)
    }

    fn inventory_body(identity: &Identity) -> Value {
        match &identity.account {
            AccountKind::Personal => json!({
                "user_id": identity.user_id.to_string(),
                "family_id": identity.family_id(),
            }),
            AccountKind::Family { family_id } => json!({ "family_id": family_id }),
        }
    }

    fn range_body(&self, identity: &Identity, range: DateRange) -> Value {
        json!({
            "start_date": self.format_date(range.start),
            "end_date": self.format_date(range.end),
            "user_id": identity.user_id.to_string(),
        })
    }
}

impl IRemoteFetcher for HttpFetcher {
    async fn fetch_inventory(&self, identity: &Identity) -> Result<Vec<Entry>, FetchError> {
        let rows = self
            .post_rows(INVENTORY_ENDPOINT, Self::inventory_body(identity), "products")
            .await?;
        let now = Self::now();
        Ok(wire::decode_all(&rows, |row| {
            wire::decode_inventory_row(row, &self.date_format, now)
        }))
    }

    async fn fetch_rations_on(
        &self,
        identity: &Identity,
        day: NaiveDate,
    ) -> Result<Vec<Entry>, FetchError> {
        let body = json!({
            "ration_date": self.format_date(day),
            "user_id": identity.user_id.to_string(),
        });
        let rows = self.post_rows(RATION_DAY_ENDPOINT, body, "rations").await?;
        let now = Self::now();
        Ok(wire::decode_all(&rows, |row| {
            wire::decode_ration_row(row, &self.date_format, now)
        }))
    }

    async fn fetch_rations_between(
        &self,
        identity: &Identity,
        range: DateRange,
    ) -> Result<Vec<Entry>, FetchError> {
        let rows = self
            .post_rows(RATION_RANGE_ENDPOINT, self.range_body(identity, range), "rations")
            .await?;
        let now = Self::now();
        Ok(wire::decode_all(&rows, |row| {
            wire::decode_ration_row(row, &self.date_format, now)
        }))
    }

    async fn fetch_purchases_between(
        &self,
        identity: &Identity,
        range: DateRange,
    ) -> Result<Vec<Entry>, FetchError> {
        let mut body = self.range_body(identity, range);
        body["family_id"] = json!(identity.family_id());
        body["user_acc_type"] = json!(identity.account_type_flag());
        let rows = self.post_rows(PURCHASES_ENDPOINT, body, "purchases").await?;
        let now = Self::now();
        Ok(wire::decode_all(&rows, |row| {
            wire::decode_purchase_row(row, &self.date_format, now)
        }))
    }
}
