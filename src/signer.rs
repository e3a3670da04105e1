//! Signer adapter: produces signatures over operation digests and typed
//! structures, whether the key lives in-process or behind an external signer.

use alloy::primitives::{Address, Signature, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use alloy::sol_types::{Eip712Domain, SolStruct};
use std::fmt;
use std::sync::Arc;

use crate::encoding::{self, EncodingVariant, OperationFields};
use crate::error::SdkError;

/// A signer for Unified ID operations.
///
/// Two variants, selected at construction: in-process key material, or an
/// externally held signer (browser or hardware wallet boundary). External
/// signing may suspend indefinitely awaiting user approval; timeouts are the
/// caller's responsibility.
#[derive(Clone)]
pub enum UnifiedSigner {
    Key(PrivateKeySigner),
    External(Arc<dyn Signer + Send + Sync>),
}

impl fmt::Debug for UnifiedSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnifiedSigner::Key(signer) => f
                .debug_struct("UnifiedSigner::Key")
                .field("address", &signer.address())
                .finish(),
            UnifiedSigner::External(signer) => f
                .debug_struct("UnifiedSigner::External")
                .field("address", &signer.address())
                .finish(),
        }
    }
}

impl UnifiedSigner {
    /// Parse a hex private key, with or without a `0x` prefix.
    pub fn from_private_key(private_key: &str) -> Result<Self, SdkError> {
        let key = private_key.trim_start_matches("0x");
        let signer = key
            .parse::<PrivateKeySigner>()
            .map_err(|e| SdkError::Signature(format!("invalid private key: {e}")))?;
        Ok(UnifiedSigner::Key(signer))
    }

    /// Generate a fresh random in-process signer.
    pub fn random() -> Self {
        UnifiedSigner::Key(PrivateKeySigner::random())
    }

    /// Wrap an externally held signer.
    pub fn external(signer: Arc<dyn Signer + Send + Sync>) -> Self {
        UnifiedSigner::External(signer)
    }

    /// The address signatures from this signer recover to.
    pub fn address(&self) -> Address {
        match self {
            UnifiedSigner::Key(signer) => signer.address(),
            UnifiedSigner::External(signer) => signer.address(),
        }
    }

    /// Sign a 32-byte operation digest with EIP-191 personal-message
    /// semantics (the digest bytes are prefixed and re-hashed by the signer).
    pub async fn sign_digest(&self, digest: B256) -> Result<Signature, SdkError> {
        let result = match self {
            UnifiedSigner::Key(signer) => signer.sign_message(digest.as_slice()).await,
            UnifiedSigner::External(signer) => signer.sign_message(digest.as_slice()).await,
        };
        result.map_err(|e| SdkError::Signature(e.to_string()))
    }

    /// Sign an EIP-712 struct: hash under the domain, then sign the raw hash.
    pub async fn sign_typed<T: SolStruct>(
        &self,
        message: &T,
        domain: &Eip712Domain,
    ) -> Result<Signature, SdkError> {
        let digest = message.eip712_signing_hash(domain);
        let result = match self {
            UnifiedSigner::Key(signer) => signer.sign_hash(&digest).await,
            UnifiedSigner::External(signer) => signer.sign_hash(&digest).await,
        };
        result.map_err(|e| SdkError::Signature(e.to_string()))
    }

    /// Sign one operation under an explicit encoding variant.
    ///
    /// `Packed` signs the packed digest as a personal message; the typed
    /// variants sign the EIP-712 hash directly. `target_chain_id` is only
    /// consulted (and required) by [`EncodingVariant::TypedEnhanced`].
    pub async fn sign_operation(
        &self,
        fields: &OperationFields<'_>,
        variant: EncodingVariant,
        nonce: U256,
        deadline: U256,
        target_chain_id: Option<u64>,
        chain_id: u64,
        mother_contract: Address,
    ) -> Result<Signature, SdkError> {
        let hash = encoding::operation_signing_hash(
            fields,
            variant,
            nonce,
            deadline,
            target_chain_id,
            chain_id,
            mother_contract,
        )?;
        match variant {
            EncodingVariant::Packed => self.sign_digest(hash).await,
            EncodingVariant::TypedLegacy | EncodingVariant::TypedEnhanced => {
                let result = match self {
                    UnifiedSigner::Key(signer) => signer.sign_hash(&hash).await,
                    UnifiedSigner::External(signer) => signer.sign_hash(&hash).await,
                };
                result.map_err(|e| SdkError::Signature(e.to_string()))
            }
        }
    }
}

/// Recover the EIP-191 signer of a 32-byte digest.
pub fn recover_digest_signer(digest: B256, signature: &Signature) -> Result<Address, SdkError> {
    signature
        .recover_address_from_msg(digest.as_slice())
        .map_err(|e| SdkError::Signature(format!("signature recovery failed: {e}")))
}

/// Parse a 65-byte hex signature (with or without `0x`).
pub fn parse_signature(hex_signature: &str) -> Result<Signature, SdkError> {
    let raw = hex::decode(hex_signature.trim_start_matches("0x"))
        .map_err(|e| SdkError::validation(format!("signature is not valid hex: {e}")))?;
    if raw.len() != 65 {
        return Err(SdkError::validation(format!(
            "signature must be 65 bytes, got {}",
            raw.len()
        )));
    }
    Signature::from_raw(&raw)
        .map_err(|e| SdkError::validation(format!("malformed signature: {e}")))
}

/// Render a signature as a 0x-prefixed hex string for the relayer wire.
pub fn signature_to_hex(signature: &Signature) -> String {
    format!("0x{}", hex::encode(signature.as_bytes()))
}
