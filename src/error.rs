//! Error taxonomy shared across the SDK.
//!
//! "Not found" is never an error anywhere in this crate: unregistered
//! identifiers and unknown addresses come back as zero-address, empty-string,
//! empty-vec or `false` sentinels so callers can use reads as cheap existence
//! probes. Everything that *is* an error lands in one of the variants below.

/// All errors surfaced by the SDK.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Malformed or missing input, caught before any network I/O.
    #[error("validation error: {0}")]
    Validation(String),

    /// RPC or HTTP transport failure; no usable response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The node was reached but the contract call reverted or returned
    /// malformed data.
    #[error("contract call `{operation}` failed: {message}")]
    ContractCall { operation: String, message: String },

    /// The relayer responded with a non-2xx status. The body is carried
    /// verbatim so callers can inspect the relayer's structured error.
    #[error("relayer API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Signer rejected the request, the key was malformed, or typed-data
    /// construction was invalid (e.g. chain-id mismatch).
    #[error("signature generation failed: {0}")]
    Signature(String),
}

impl SdkError {
    /// Shorthand for a [`SdkError::Validation`] with a formatted message.
    pub fn validation(message: impl Into<String>) -> Self {
        SdkError::Validation(message.into())
    }

    /// Whether this error is a programmer-error-class validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, SdkError::Validation(_))
    }

    /// Stable short label for the error class, used in operation outcomes.
    pub fn kind(&self) -> &'static str {
        match self {
            SdkError::Validation(_) => "validation",
            SdkError::Network(_) => "network",
            SdkError::ContractCall { .. } => "contract",
            SdkError::Api { .. } => "api",
            SdkError::Signature(_) => "signature",
        }
    }
}

/// Split an alloy contract error into transport failure vs contract-level
/// failure. A JSON-RPC error response means the node processed the call and
/// the contract rejected it; anything else never reached the contract.
pub(crate) fn classify_contract_error(operation: &str, err: alloy::contract::Error) -> SdkError {
    match &err {
        alloy::contract::Error::TransportError(rpc_err) => {
            if rpc_err.as_error_resp().is_some() {
                SdkError::ContractCall {
                    operation: operation.to_string(),
                    message: err.to_string(),
                }
            } else {
                SdkError::Network(format!("{operation}: {err}"))
            }
        }
        _ => SdkError::ContractCall {
            operation: operation.to_string(),
            message: err.to_string(),
        },
    }
}
