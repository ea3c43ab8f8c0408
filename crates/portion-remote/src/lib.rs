//! # portion-remote
//!
//! Remote snapshot fetching for the Portion household ledger.
//! `HttpFetcher` implements `IRemoteFetcher` over JSON POST endpoints;
//! `wire` decodes the positional rows those endpoints return.

pub mod client;
pub mod wire;

pub use client::HttpFetcher;
