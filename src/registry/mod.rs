//! Read-only clients for the three on-chain registries.
//!
//! The mother registry is the chain-agnostic source of truth for identifier
//! existence and nonces; the child registry holds per-chain primary/secondary
//! bindings; the storage-util contract provides fee conversion and the
//! authoritative signature verification.

mod child;
mod mother;
mod reader;
mod storage_util;

pub use child::ChildRegistryClient;
pub use mother::MotherRegistryClient;
pub use reader::RegistryReader;
pub use storage_util::StorageUtilClient;

use alloy::providers::{DynProvider, Provider, ProviderBuilder};

use crate::error::SdkError;

/// Build a read-only HTTP provider for a JSON-RPC endpoint.
pub fn connect_read_only(rpc_url: &str) -> Result<DynProvider, SdkError> {
    let url: reqwest::Url = rpc_url
        .parse()
        .map_err(|e| SdkError::validation(format!("invalid RPC URL `{rpc_url}`: {e}")))?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_read_only_rejects_malformed_url() {
        let err = connect_read_only("not a url").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_connect_read_only_accepts_http_url() {
        // Connection is lazy; building the provider performs no I/O.
        assert!(connect_read_only("http://127.0.0.1:8545").is_ok());
    }
}
