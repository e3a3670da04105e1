//! Operation builder: turns high-level parameters into fully signed,
//! ready-to-submit relayer payloads.
//!
//! Every build follows the same order: validate inputs (fail fast, before
//! any network or signing call), read the current nonce from the mother
//! registry, compute the packed digest, collect signatures, then serialize
//! the payload with its `(nonce, deadline)` options blob. A payload is
//! immutable once built; any later mutation of the identifier's nonce on
//! chain invalidates it.

use alloy::primitives::{Address, B256, U256};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::config::DEFAULT_DEADLINE_OFFSET_SECS;
use crate::encoding;
use crate::error::SdkError;
use crate::registry::RegistryReader;
use crate::signer::{parse_signature, signature_to_hex, UnifiedSigner};
use crate::types::{
    AddSecondaryPayload, ChangePrimaryPayload, OperationKind, RegisterPayload,
    RemoveSecondaryPayload, UnifiedId, UpdateUnifiedIdPayload,
};

/// One signature slot: either a pre-made 65-byte hex signature or a signer
/// that will produce one over the operation digest.
#[derive(Debug, Clone)]
pub enum SignatureInput<'a> {
    Presigned(String),
    Signer(&'a UnifiedSigner),
}

impl SignatureInput<'_> {
    /// Validate shape without signing. Pre-made signatures must parse as
    /// 65-byte hex; signer handles are always shape-valid.
    fn check(&self, field: &str) -> Result<(), SdkError> {
        match self {
            SignatureInput::Presigned(raw) => parse_signature(raw)
                .map(|_| ())
                .map_err(|e| SdkError::validation(format!("{field}: {e}"))),
            SignatureInput::Signer(_) => Ok(()),
        }
    }

    async fn resolve(&self, digest: B256) -> Result<String, SdkError> {
        match self {
            SignatureInput::Presigned(raw) => {
                let signature = parse_signature(raw)?;
                Ok(signature_to_hex(&signature))
            }
            SignatureInput::Signer(signer) => {
                let signature = signer.sign_digest(digest).await?;
                Ok(signature_to_hex(&signature))
            }
        }
    }
}

/// Require a signature slot to be present, naming the field otherwise.
fn require_signature<'a, 'b>(
    slot: &'a Option<SignatureInput<'b>>,
    field: &str,
) -> Result<&'a SignatureInput<'b>, SdkError> {
    slot.as_ref()
        .ok_or_else(|| SdkError::validation(format!("{field} is required")))
}

/// Parameters for `register`.
#[derive(Debug, Clone)]
pub struct RegisterRequest<'a> {
    pub unified_id: &'a str,
    pub user_address: Address,
    /// Required master signature.
    pub master: Option<SignatureInput<'a>>,
    /// Optional second signature from the primary wallet.
    pub primary: Option<SignatureInput<'a>>,
}

/// Parameters for `addSecondary`. Both wallets sign the same digest.
#[derive(Debug, Clone)]
pub struct AddSecondaryRequest<'a> {
    pub unified_id: &'a str,
    pub secondary_address: Address,
    pub primary: Option<SignatureInput<'a>>,
    pub secondary: Option<SignatureInput<'a>>,
}

/// Parameters for `removeSecondary`.
#[derive(Debug, Clone)]
pub struct RemoveSecondaryRequest<'a> {
    pub unified_id: &'a str,
    pub secondary_address: Address,
    pub signature: Option<SignatureInput<'a>>,
}

/// Parameters for `changePrimary`.
#[derive(Debug, Clone)]
pub struct ChangePrimaryRequest<'a> {
    pub unified_id: &'a str,
    pub current_address: Address,
    pub new_address: Address,
    pub current_primary: Option<SignatureInput<'a>>,
    pub new_primary: Option<SignatureInput<'a>>,
}

/// Parameters for `updateUnifiedId`.
#[derive(Debug, Clone)]
pub struct UpdateUnifiedIdRequest<'a> {
    pub old_unified_id: &'a str,
    pub new_unified_id: &'a str,
    pub signature: Option<SignatureInput<'a>>,
}

pub struct OperationBuilder {
    reader: RegistryReader,
    chain_id: u64,
    deadline_offset: Duration,
}

impl OperationBuilder {
    pub fn new(reader: RegistryReader, chain_id: u64) -> Self {
        Self {
            reader,
            chain_id,
            deadline_offset: Duration::from_secs(DEFAULT_DEADLINE_OFFSET_SECS),
        }
    }

    /// Override the deadline offset applied to every payload.
    pub fn with_deadline_offset(mut self, offset: Duration) -> Self {
        self.deadline_offset = offset;
        self
    }

    /// Deadline and hex options blob for a freshly read nonce.
    fn options(&self, nonce: U256) -> Result<String, SdkError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| SdkError::validation(format!("system clock before unix epoch: {e}")))?;
        let deadline = U256::from(now.as_secs() + self.deadline_offset.as_secs());
        let blob = encoding::options_blob(nonce, deadline);
        Ok(format!("0x{}", hex::encode(blob)))
    }

    /// Build a `register` payload.
    pub async fn register(&self, request: RegisterRequest<'_>) -> Result<RegisterPayload, SdkError> {
        let unified_id = UnifiedId::new(request.unified_id)?;
        let master = require_signature(&request.master, "master signature")?;
        master.check("master signature")?;
        if let Some(primary) = &request.primary {
            primary.check("primary signature")?;
        }

        let nonce = self.reader.get_nonce(unified_id.as_str()).await?;
        let digest = encoding::register_digest(unified_id.as_str(), request.user_address, nonce);
        debug!(unified_id = %unified_id, nonce = %nonce, "built register digest");

        let master_signature = master.resolve(digest).await?;
        let primary_signature = match &request.primary {
            Some(primary) => Some(primary.resolve(digest).await?),
            None => None,
        };

        Ok(RegisterPayload {
            action: OperationKind::Register.action(),
            unified_id: unified_id.to_string(),
            user_address: request.user_address.to_string(),
            nonce: nonce.to_string(),
            chain_id: self.chain_id,
            master_signature,
            primary_signature,
            options: self.options(nonce)?,
        })
    }

    /// Build an `addSecondary` payload. The packed digest is computed once
    /// and independently signed by both the primary and the secondary wallet.
    pub async fn add_secondary(
        &self,
        request: AddSecondaryRequest<'_>,
    ) -> Result<AddSecondaryPayload, SdkError> {
        let unified_id = UnifiedId::new(request.unified_id)?;
        let primary = require_signature(&request.primary, "primary signature")?;
        let secondary = require_signature(&request.secondary, "secondary signature")?;
        primary.check("primary signature")?;
        secondary.check("secondary signature")?;

        let nonce = self.reader.get_nonce(unified_id.as_str()).await?;
        let digest =
            encoding::add_secondary_digest(unified_id.as_str(), request.secondary_address, nonce);

        let primary_signature = primary.resolve(digest).await?;
        let secondary_signature = secondary.resolve(digest).await?;

        Ok(AddSecondaryPayload {
            action: OperationKind::AddSecondary.action(),
            unified_id: unified_id.to_string(),
            secondary_address: request.secondary_address.to_string(),
            nonce: nonce.to_string(),
            chain_id: self.chain_id,
            primary_signature,
            secondary_signature,
            options: self.options(nonce)?,
        })
    }

    /// Build a `removeSecondary` payload.
    pub async fn remove_secondary(
        &self,
        request: RemoveSecondaryRequest<'_>,
    ) -> Result<RemoveSecondaryPayload, SdkError> {
        let unified_id = UnifiedId::new(request.unified_id)?;
        let signature = require_signature(&request.signature, "signature")?;
        signature.check("signature")?;

        let nonce = self.reader.get_nonce(unified_id.as_str()).await?;
        let digest =
            encoding::remove_secondary_digest(unified_id.as_str(), request.secondary_address, nonce);
        let signature = signature.resolve(digest).await?;

        Ok(RemoveSecondaryPayload {
            action: OperationKind::RemoveSecondary.action(),
            unified_id: unified_id.to_string(),
            secondary_address: request.secondary_address.to_string(),
            nonce: nonce.to_string(),
            chain_id: self.chain_id,
            signature,
            options: self.options(nonce)?,
        })
    }

    /// Build a `changePrimary` payload.
    pub async fn change_primary(
        &self,
        request: ChangePrimaryRequest<'_>,
    ) -> Result<ChangePrimaryPayload, SdkError> {
        let unified_id = UnifiedId::new(request.unified_id)?;
        if request.current_address == request.new_address {
            return Err(SdkError::validation(
                "current and new primary addresses cannot be the same",
            ));
        }
        let current_primary = require_signature(&request.current_primary, "current primary signature")?;
        let new_primary = require_signature(&request.new_primary, "new primary signature")?;
        current_primary.check("current primary signature")?;
        new_primary.check("new primary signature")?;

        let nonce = self.reader.get_nonce(unified_id.as_str()).await?;
        let digest =
            encoding::primary_change_digest(unified_id.as_str(), request.new_address, nonce);

        let current_primary_signature = current_primary.resolve(digest).await?;
        let new_primary_signature = new_primary.resolve(digest).await?;

        Ok(ChangePrimaryPayload {
            action: OperationKind::ChangePrimary.action(),
            unified_id: unified_id.to_string(),
            new_address: request.new_address.to_string(),
            nonce: nonce.to_string(),
            chain_id: self.chain_id,
            current_primary_signature,
            new_primary_signature,
            options: self.options(nonce)?,
        })
    }

    /// Build an `updateUnifiedId` payload.
    pub async fn update_unified_id(
        &self,
        request: UpdateUnifiedIdRequest<'_>,
    ) -> Result<UpdateUnifiedIdPayload, SdkError> {
        let old_unified_id = UnifiedId::new(request.old_unified_id)?;
        let new_unified_id = UnifiedId::new(request.new_unified_id)?;
        if old_unified_id == new_unified_id {
            return Err(SdkError::validation(
                "old and new unified ids cannot be the same",
            ));
        }
        let signature = require_signature(&request.signature, "signature")?;
        signature.check("signature")?;

        // The nonce lives with the old identifier; the new one does not
        // exist yet.
        let nonce = self.reader.get_nonce(old_unified_id.as_str()).await?;
        let digest = encoding::update_unified_id_digest(
            old_unified_id.as_str(),
            new_unified_id.as_str(),
            nonce,
        );
        let signature = signature.resolve(digest).await?;

        Ok(UpdateUnifiedIdPayload {
            action: OperationKind::UpdateUnifiedId.action(),
            old_unified_id: old_unified_id.to_string(),
            new_unified_id: new_unified_id.to_string(),
            nonce: nonce.to_string(),
            chain_id: self.chain_id,
            signature,
            options: self.options(nonce)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{contract_addresses, Environment};

    fn builder() -> OperationBuilder {
        let addresses = contract_addresses(Environment::Testnet, 80002).unwrap();
        // Dead endpoint: any build that passes validation fails at the nonce
        // read with a network error, proving validation ran first.
        let reader = RegistryReader::connect("http://127.0.0.1:59545", addresses, 80002).unwrap();
        OperationBuilder::new(reader, 80002)
    }

    fn addr(last_byte: u8) -> Address {
        Address::with_last_byte(last_byte)
    }

    #[tokio::test]
    async fn test_register_requires_master_signature() {
        let builder = builder();
        let err = builder
            .register(RegisterRequest {
                unified_id: "alice_01",
                user_address: addr(1),
                master: None,
                primary: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("master signature"));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_identifier() {
        let builder = builder();
        let signer = UnifiedSigner::random();
        let err = builder
            .register(RegisterRequest {
                unified_id: "bad id!",
                user_address: addr(1),
                master: Some(SignatureInput::Signer(&signer)),
                primary: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_add_secondary_requires_secondary_signature() {
        let builder = builder();
        let signer = UnifiedSigner::random();
        let err = builder
            .add_secondary(AddSecondaryRequest {
                unified_id: "alice_01",
                secondary_address: addr(2),
                primary: Some(SignatureInput::Signer(&signer)),
                secondary: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("secondary signature"));
    }

    #[tokio::test]
    async fn test_change_primary_rejects_same_addresses() {
        let builder = builder();
        let signer = UnifiedSigner::random();
        for _ in 0..2 {
            let err = builder
                .change_primary(ChangePrimaryRequest {
                    unified_id: "alice_01",
                    current_address: addr(5),
                    new_address: addr(5),
                    current_primary: Some(SignatureInput::Signer(&signer)),
                    new_primary: Some(SignatureInput::Signer(&signer)),
                })
                .await
                .unwrap_err();
            assert!(err.is_validation());
            assert!(err.to_string().contains("cannot be the same"));
        }
    }

    #[tokio::test]
    async fn test_update_rejects_identical_ids() {
        let builder = builder();
        let signer = UnifiedSigner::random();
        let err = builder
            .update_unified_id(UpdateUnifiedIdRequest {
                old_unified_id: "alice_01",
                new_unified_id: "alice_01",
                signature: Some(SignatureInput::Signer(&signer)),
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_presigned_shape_checked_before_network() {
        let builder = builder();
        let err = builder
            .remove_secondary(RemoveSecondaryRequest {
                unified_id: "alice_01",
                secondary_address: addr(2),
                signature: Some(SignatureInput::Presigned("0x1234".into())),
            })
            .await
            .unwrap_err();
        // A truncated pre-made signature is caught by shape validation, not
        // by the (unreachable) nonce read.
        assert!(err.is_validation());
        assert!(err.to_string().contains("signature"));
    }

    #[tokio::test]
    async fn test_valid_build_fails_at_nonce_read_on_dead_endpoint() {
        let builder = builder();
        let signer = UnifiedSigner::random();
        let err = builder
            .register(RegisterRequest {
                unified_id: "alice_01",
                user_address: addr(1),
                master: Some(SignatureInput::Signer(&signer)),
                primary: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Network(_)), "got: {err:?}");
    }
}
