//! Structured error types for xlgrid.
//!
//! Every fallible operation in the crate returns [`Result`]; commit failures
//! additionally carry the optimistic writes that need reverting (see
//! [`crate::sync::CommitFailure`]).

/// All errors that can occur in the grid engine and its backend bridge.
#[derive(Debug, thiserror::Error)]
pub enum XlgridError {
    /// Malformed address or range string.
    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),

    /// Rejected configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Backend answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Transport failure talking to the backend.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Malformed JSON payload.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend processed the request but refused the edit.
    #[error("Backend rejected edit to {address}: {reason}")]
    Rejected { address: String, reason: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlgridError>;

impl XlgridError {
    pub(crate) fn invalid_address(input: &str) -> Self {
        Self::InvalidAddress(input.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<XlgridError> for wasm_bindgen::JsValue {
    fn from(e: XlgridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
