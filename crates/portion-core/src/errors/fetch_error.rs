/// Typed failure of one remote fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("transport failure: {message}")]
    Transport { message: String },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed payload: {message}")]
    Decode { message: String },
}

impl FetchError {
    /// True when the payload arrived but could not be understood.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
