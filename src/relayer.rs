//! Thin HTTP client for the off-chain relayer.
//!
//! The relayer executes the actual state-changing transactions; this client
//! only posts signed payloads and normalizes responses. Three outcome
//! classes are kept distinct: transport failure (no response), API-level
//! failure (non-2xx with the body preserved verbatim), and success.

use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::SdkError;
use crate::types::{OperationKind, RelayerResponse};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub struct RelayerClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl RelayerClient {
    pub fn new(base_url: &str, auth_token: &str) -> Result<Self, SdkError> {
        reqwest::Url::parse(base_url)
            .map_err(|e| SdkError::validation(format!("invalid relayer base URL `{base_url}`: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| SdkError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.to_string(),
        })
    }

    /// POST a signed payload to the operation's endpoint.
    pub async fn submit<T: Serialize>(
        &self,
        kind: OperationKind,
        payload: &T,
    ) -> Result<RelayerResponse, SdkError> {
        let url = format!("{}{}", self.base_url, kind.endpoint());
        debug!(operation = %kind, url = %url, "submitting operation to relayer");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.auth_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| SdkError::Network(format!("relayer request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SdkError::Network(format!("failed to read relayer response: {e}")))?;

        if !status.is_success() {
            return Err(SdkError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<RelayerResponse>(&body).map_err(|_| SdkError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Liveness check against `GET /health`.
    pub async fn health(&self) -> Result<bool, SdkError> {
        self.get_ok("/health").await
    }

    /// Liveness check against `GET /ping`.
    pub async fn ping(&self) -> Result<bool, SdkError> {
        self.get_ok("/ping").await
    }

    async fn get_ok(&self, path: &str) -> Result<bool, SdkError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.auth_token)
            .send()
            .await
            .map_err(|e| SdkError::Network(format!("relayer request failed: {e}")))?;
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegisterPayload;
    use httpmock::prelude::*;
    use serde_json::json;

    fn register_payload() -> RegisterPayload {
        RegisterPayload {
            action: "register",
            unified_id: "alice_01".into(),
            user_address: "0x0000000000000000000000000000000000000001".into(),
            nonce: "0".into(),
            chain_id: 80002,
            master_signature: format!("0x{}", "11".repeat(65)),
            primary_signature: None,
            options: format!("0x{}", "00".repeat(64)),
        }
    }

    #[tokio::test]
    async fn test_submit_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/register")
                .header("authorization", "Bearer token-123")
                .json_body_includes(r#"{"action": "register", "unifiedId": "alice_01"}"#);
            then.status(200)
                .json_body(json!({"success": true, "data": {"txHash": "0xabc"}}));
        });

        let client = RelayerClient::new(&server.base_url(), "token-123").unwrap();
        let response = client
            .submit(OperationKind::Register, &register_payload())
            .await
            .unwrap();

        mock.assert();
        assert!(response.success);
        assert_eq!(response.data.unwrap()["txHash"], "0xabc");
    }

    #[tokio::test]
    async fn test_submit_api_error_preserves_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/add-secondary");
            then.status(400)
                .json_body(json!({"success": false, "error": "stale nonce"}));
        });

        let client = RelayerClient::new(&server.base_url(), "token-123").unwrap();
        let err = client
            .submit(OperationKind::AddSecondary, &register_payload())
            .await
            .unwrap_err();

        match err {
            SdkError::Api { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("stale nonce"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_transport_error_is_network() {
        // No server listening at all.
        let client = RelayerClient::new("http://127.0.0.1:59546", "token-123").unwrap();
        let err = client
            .submit(OperationKind::Register, &register_payload())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Network(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn test_health_and_ping() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200).json_body(json!({"status": "ok"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/ping");
            then.status(503);
        });

        let client = RelayerClient::new(&server.base_url(), "token-123").unwrap();
        assert!(client.health().await.unwrap());
        assert!(!client.ping().await.unwrap());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = RelayerClient::new("not a url", "token").unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url_tolerated() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/remove-secondary");
            then.status(200).json_body(json!({"success": true}));
        });

        let base = format!("{}/", server.base_url());
        let client = RelayerClient::new(&base, "token-123").unwrap();
        let response = client
            .submit(OperationKind::RemoveSecondary, &register_payload())
            .await
            .unwrap();
        mock.assert();
        assert!(response.success);
    }
}
