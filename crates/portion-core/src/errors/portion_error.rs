use super::{FetchError, StorageError};

/// Top-level error type for the Portion ledger.
/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum PortionError {
    #[error("fetch failed: {0}")]
    FetchFailed(FetchError),

    #[error("decode failed: {0}")]
    DecodeFailed(FetchError),

    #[error(
        "insufficient quantity for product {product_id}: requested {requested_grams}g, available {available_grams}g"
    )]
    InsufficientQuantity {
        product_id: i64,
        available_grams: f64,
        requested_grams: f64,
    },

    #[error("no identity available for {operation}")]
    NoIdentity { operation: String },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<FetchError> for PortionError {
    fn from(err: FetchError) -> Self {
        if err.is_decode() {
            Self::DecodeFailed(err)
        } else {
            Self::FetchFailed(err)
        }
    }
}

impl PortionError {
    /// Stable machine-readable code, carried as a structured log field.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FetchFailed(_) => "FETCH_FAILED",
            Self::DecodeFailed(_) => "DECODE_FAILED",
            Self::InsufficientQuantity { .. } => "INSUFFICIENT_QUANTITY",
            Self::NoIdentity { .. } => "NO_IDENTITY",
            Self::StorageError(e) => e.error_code(),
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}

/// Convenience type alias.
pub type PortionResult<T> = Result<T, PortionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_split_into_fetch_and_decode() {
        let timeout: PortionError = FetchError::Timeout { seconds: 10 }.into();
        assert_eq!(timeout.error_code(), "FETCH_FAILED");

        let decode: PortionError = FetchError::Decode {
            message: "row 3 is not an array".into(),
        }
        .into();
        assert_eq!(decode.error_code(), "DECODE_FAILED");
        assert!(decode.to_string().contains("row 3"));
    }

    #[test]
    fn storage_codes_pass_through() {
        let err: PortionError = StorageError::NotFound {
            kind: "inventory".into(),
            id: 7,
        }
        .into();
        assert_eq!(err.error_code(), "STORAGE_NOT_FOUND");
        assert_eq!(err.to_string(), "storage error: inventory entry 7 not found");
    }

    #[test]
    fn insufficient_quantity_names_the_product() {
        let err = PortionError::InsufficientQuantity {
            product_id: 42,
            available_grams: 100.0,
            requested_grams: 250.0,
        };
        assert_eq!(
            err.to_string(),
            "insufficient quantity for product 42: requested 250g, available 100g"
        );
    }
}
