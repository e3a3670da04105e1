//! Core data types: identifiers, on-chain lookup results, and the JSON
//! payloads posted to the relayer.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::SdkError;

/// Minimum accepted identifier length.
pub const MIN_UNIFIED_ID_LEN: usize = 3;
/// Maximum accepted identifier length.
pub const MAX_UNIFIED_ID_LEN: usize = 32;

/// A validated Unified ID: 3..=32 characters from `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UnifiedId(String);

impl UnifiedId {
    /// Validate and wrap a raw identifier string.
    pub fn new(raw: impl Into<String>) -> Result<Self, SdkError> {
        let raw = raw.into();
        if raw.len() < MIN_UNIFIED_ID_LEN || raw.len() > MAX_UNIFIED_ID_LEN {
            return Err(SdkError::validation(format!(
                "unified id must be {MIN_UNIFIED_ID_LEN}-{MAX_UNIFIED_ID_LEN} characters, got {}",
                raw.len()
            )));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(SdkError::validation(format!(
                "unified id contains invalid character `{bad}`; allowed: letters, digits, underscore, hyphen"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UnifiedId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for UnifiedId {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The five state-changing operations supported by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Register,
    AddSecondary,
    RemoveSecondary,
    ChangePrimary,
    UpdateUnifiedId,
}

impl OperationKind {
    /// The `action` discriminator carried in every relayer request body.
    pub fn action(&self) -> &'static str {
        match self {
            OperationKind::Register => "register",
            OperationKind::AddSecondary => "addSecondary",
            OperationKind::RemoveSecondary => "removeSecondary",
            OperationKind::ChangePrimary => "changePrimary",
            OperationKind::UpdateUnifiedId => "updateUnifiedId",
        }
    }

    /// Relayer endpoint path for this operation.
    pub fn endpoint(&self) -> &'static str {
        match self {
            OperationKind::Register => "/register",
            OperationKind::AddSecondary => "/add-secondary",
            OperationKind::RemoveSecondary => "/remove-secondary",
            OperationKind::ChangePrimary => "/change-primary",
            OperationKind::UpdateUnifiedId => "/update-unified-id",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// Result of a master-address lookup on the mother registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterRecord {
    /// True iff the master address is non-zero.
    pub is_valid: bool,
    pub master_address: Address,
}

/// Role of an address within the child registry.
///
/// The registry treats primary/secondary as mutually exclusive, but both
/// flags are exposed independently; this type never asserts exclusivity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressRole {
    /// Owning identifier, empty when the address is unknown.
    pub unified_id: String,
    pub is_primary: bool,
    pub is_secondary: bool,
}

impl AddressRole {
    /// True when the address resolves to any identifier at all.
    pub fn is_registered(&self) -> bool {
        !self.unified_id.is_empty()
    }
}

/// Chain-scoped primary/secondary binding for an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainData {
    pub primary: Address,
    pub secondaries: Vec<Address>,
    /// True iff the primary address is non-zero.
    pub is_valid: bool,
}

// ---------------------------------------------------------------------------
// Relayer wire types
// ---------------------------------------------------------------------------

/// `register` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub action: &'static str,
    pub unified_id: String,
    pub user_address: String,
    /// Decimal string.
    pub nonce: String,
    pub chain_id: u64,
    pub master_signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_signature: Option<String>,
    /// Hex-encoded `abi.encode(nonce, deadline)` blob.
    pub options: String,
}

/// `addSecondary` request body. Carries both required signatures over the
/// same digest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSecondaryPayload {
    pub action: &'static str,
    pub unified_id: String,
    pub secondary_address: String,
    pub nonce: String,
    pub chain_id: u64,
    pub primary_signature: String,
    pub secondary_signature: String,
    pub options: String,
}

/// `removeSecondary` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSecondaryPayload {
    pub action: &'static str,
    pub unified_id: String,
    pub secondary_address: String,
    pub nonce: String,
    pub chain_id: u64,
    pub signature: String,
    pub options: String,
}

/// `changePrimary` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePrimaryPayload {
    pub action: &'static str,
    pub unified_id: String,
    pub new_address: String,
    pub nonce: String,
    pub chain_id: u64,
    pub current_primary_signature: String,
    pub new_primary_signature: String,
    pub options: String,
}

/// `updateUnifiedId` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnifiedIdPayload {
    pub action: &'static str,
    pub old_unified_id: String,
    pub new_unified_id: String,
    pub nonce: String,
    pub chain_id: u64,
    pub signature: String,
    pub options: String,
}

/// Parsed relayer response body.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayerResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Normalized result of a high-level write operation. Expected failures
/// (network, relayer rejection, signer refusal) land here with
/// `success: false` instead of surfacing as errors.
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
    pub details: Option<String>,
}

impl OperationOutcome {
    pub(crate) fn from_response(response: RelayerResponse) -> Self {
        Self {
            success: response.success,
            data: response.data,
            error: response.error,
            details: None,
        }
    }

    pub(crate) fn from_error(err: &SdkError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.kind().to_string()),
            details: Some(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_id_accepts_allowed_charset() {
        for raw in ["alice_01", "Bob-2", "a_b-c_9", "abc"] {
            assert!(UnifiedId::new(raw).is_ok(), "{raw} should be valid");
        }
    }

    #[test]
    fn test_unified_id_rejects_bad_input() {
        for raw in ["", "ab", "has space", "dot.ted", "ümlaut", "x!"] {
            assert!(UnifiedId::new(raw).is_err(), "{raw} should be rejected");
        }
        let too_long = "a".repeat(MAX_UNIFIED_ID_LEN + 1);
        assert!(UnifiedId::new(too_long).is_err());
    }

    #[test]
    fn test_unified_id_rejection_is_validation_error() {
        let err = UnifiedId::new("bad id").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_operation_kind_actions_and_endpoints() {
        assert_eq!(OperationKind::Register.action(), "register");
        assert_eq!(OperationKind::AddSecondary.endpoint(), "/add-secondary");
        assert_eq!(OperationKind::ChangePrimary.action(), "changePrimary");
        assert_eq!(
            OperationKind::UpdateUnifiedId.endpoint(),
            "/update-unified-id"
        );
    }

    #[test]
    fn test_register_payload_serializes_camel_case() {
        let payload = RegisterPayload {
            action: "register",
            unified_id: "alice_01".into(),
            user_address: "0x0000000000000000000000000000000000000001".into(),
            nonce: "0".into(),
            chain_id: 80002,
            master_signature: "0xabcd".into(),
            primary_signature: None,
            options: "0x00".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["unifiedId"], "alice_01");
        assert_eq!(json["masterSignature"], "0xabcd");
        assert_eq!(json["chainId"], 80002);
        // Optional signature is omitted entirely, not serialized as null.
        assert!(json.get("primarySignature").is_none());
    }

    #[test]
    fn test_relayer_response_defaults() {
        let parsed: RelayerResponse = serde_json::from_str("{}").unwrap();
        assert!(!parsed.success);
        assert!(parsed.data.is_none());
        assert!(parsed.error.is_none());
    }

    #[test]
    fn test_address_role_sentinel() {
        let role = AddressRole::default();
        assert!(!role.is_registered());
        assert!(!role.is_primary);
        assert!(!role.is_secondary);
    }
}
