mod fetch_error;
mod portion_error;
mod storage_error;

pub use fetch_error::FetchError;
pub use portion_error::{PortionError, PortionResult};
pub use storage_error::StorageError;
