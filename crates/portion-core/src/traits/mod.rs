pub mod local_store;
pub mod remote_fetcher;
pub mod target_store;

pub use local_store::{ILocalStore, OrderReceipt};
pub use remote_fetcher::IRemoteFetcher;
pub use target_store::IOptimalTargetStore;
