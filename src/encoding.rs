//! Canonical operation digests.
//!
//! Two encoding families are supported, matching the two verification paths
//! the on-chain contracts use:
//!
//! - **Packed family**: `keccak256(abi.encode(fields) || nonce)` where the
//!   nonce is appended as a raw 32-byte big-endian word (packed, not
//!   ABI-encoded). The resulting digest is signed with EIP-191
//!   personal-message semantics by [`crate::signer::UnifiedSigner`].
//! - **Typed family**: EIP-712 structured data under the `UnifiedID`/`1`
//!   domain. The legacy structs carry `nonce` and `deadline`; the enhanced
//!   structs additionally carry `targetChainId`, which must equal the domain
//!   chain id.
//!
//! Every operation's byte layout lives in this one module; nothing else in
//! the crate hashes operation parameters.

use alloy::primitives::{keccak256, Address, B256, U256};
use alloy::sol_types::{eip712_domain, Eip712Domain, SolValue};

use crate::error::SdkError;

/// EIP-712 domain name shared by both typed variants.
pub const SIGNING_DOMAIN_NAME: &str = "UnifiedID";
/// EIP-712 domain version.
pub const SIGNING_DOMAIN_VERSION: &str = "1";

/// Which encoding family a caller wants a signature constructed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingVariant {
    /// Packed keccak digest signed as an EIP-191 personal message.
    Packed,
    /// EIP-712 typed data without a target chain field.
    TypedLegacy,
    /// EIP-712 typed data with a `targetChainId` field that must equal the
    /// domain chain id.
    TypedEnhanced,
}

fn packed_digest(encoded: Vec<u8>, nonce: U256) -> B256 {
    let mut buf = encoded;
    buf.extend_from_slice(&nonce.to_be_bytes::<32>());
    keccak256(&buf)
}

/// Digest for `register`: `(string unifiedId, address userAddress)` + nonce.
pub fn register_digest(unified_id: &str, user_address: Address, nonce: U256) -> B256 {
    packed_digest((unified_id.to_owned(), user_address).abi_encode(), nonce)
}

/// Digest for `changePrimary`: `(string unifiedId, address newAddress)` + nonce.
pub fn primary_change_digest(unified_id: &str, new_address: Address, nonce: U256) -> B256 {
    packed_digest((unified_id.to_owned(), new_address).abi_encode(), nonce)
}

/// Digest for `addSecondary`: `(string unifiedId, address secondaryAddress)`
/// + nonce. Both the primary and the secondary wallet sign this same digest.
pub fn add_secondary_digest(unified_id: &str, secondary_address: Address, nonce: U256) -> B256 {
    packed_digest((unified_id.to_owned(), secondary_address).abi_encode(), nonce)
}

/// Digest for `removeSecondary`: `(string unifiedId, address secondaryAddress)` + nonce.
pub fn remove_secondary_digest(unified_id: &str, secondary_address: Address, nonce: U256) -> B256 {
    packed_digest((unified_id.to_owned(), secondary_address).abi_encode(), nonce)
}

/// Digest for `updateUnifiedId`: `(string oldUnifiedId, string newUnifiedId)` + nonce.
pub fn update_unified_id_digest(old_unified_id: &str, new_unified_id: &str, nonce: U256) -> B256 {
    packed_digest(
        (old_unified_id.to_owned(), new_unified_id.to_owned()).abi_encode(),
        nonce,
    )
}

/// The opaque options blob attached to every write payload:
/// `abi.encode(uint256 nonce, uint256 deadline)`, exactly 64 bytes. The
/// relayer and contract decode it positionally, so the layout is fixed.
pub fn options_blob(nonce: U256, deadline: U256) -> Vec<u8> {
    (nonce, deadline).abi_encode()
}

/// EIP-712 domain for the typed encoding family.
pub fn signing_domain(chain_id: u64, mother_contract: Address) -> Eip712Domain {
    eip712_domain! {
        name: SIGNING_DOMAIN_NAME,
        version: SIGNING_DOMAIN_VERSION,
        chain_id: chain_id,
        verifying_contract: mother_contract,
    }
}

/// Check the enhanced-variant chain-scoping precondition: the target chain
/// must be the chain the signature's domain is bound to. Cross-chain reuse is
/// rejected here rather than failing on-chain later.
pub fn enhanced_target_chain(target_chain_id: u64, domain_chain_id: u64) -> Result<U256, SdkError> {
    if target_chain_id != domain_chain_id {
        return Err(SdkError::Signature(format!(
            "targetChainId {target_chain_id} does not match signing domain chain id {domain_chain_id}"
        )));
    }
    Ok(U256::from(target_chain_id))
}

/// Identity fields of one operation, shared by both encoding families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationFields<'a> {
    Register {
        unified_id: &'a str,
        user_address: Address,
    },
    AddSecondary {
        unified_id: &'a str,
        secondary_address: Address,
    },
    RemoveSecondary {
        unified_id: &'a str,
        secondary_address: Address,
    },
    PrimaryChange {
        unified_id: &'a str,
        new_address: Address,
    },
    UpdateUnifiedId {
        old_unified_id: &'a str,
        new_unified_id: &'a str,
    },
}

/// Packed-family digest for any operation.
pub fn packed_operation_digest(fields: &OperationFields<'_>, nonce: U256) -> B256 {
    match *fields {
        OperationFields::Register {
            unified_id,
            user_address,
        } => register_digest(unified_id, user_address, nonce),
        OperationFields::AddSecondary {
            unified_id,
            secondary_address,
        } => add_secondary_digest(unified_id, secondary_address, nonce),
        OperationFields::RemoveSecondary {
            unified_id,
            secondary_address,
        } => remove_secondary_digest(unified_id, secondary_address, nonce),
        OperationFields::PrimaryChange {
            unified_id,
            new_address,
        } => primary_change_digest(unified_id, new_address, nonce),
        OperationFields::UpdateUnifiedId {
            old_unified_id,
            new_unified_id,
        } => update_unified_id_digest(old_unified_id, new_unified_id, nonce),
    }
}

/// Signing hash for one operation under the requested encoding variant.
///
/// For [`EncodingVariant::Packed`] this is the packed digest (the EIP-191
/// prefix is applied by the signer, not here). For the typed variants it is
/// the EIP-712 signing hash; the enhanced variant requires `target_chain_id`
/// and rejects values that differ from the domain chain id.
pub fn operation_signing_hash(
    fields: &OperationFields<'_>,
    variant: EncodingVariant,
    nonce: U256,
    deadline: U256,
    target_chain_id: Option<u64>,
    chain_id: u64,
    mother_contract: Address,
) -> Result<B256, SdkError> {
    use alloy::sol_types::SolStruct;

    match variant {
        EncodingVariant::Packed => Ok(packed_operation_digest(fields, nonce)),
        EncodingVariant::TypedLegacy => {
            let domain = signing_domain(chain_id, mother_contract);
            let hash = match *fields {
                OperationFields::Register {
                    unified_id,
                    user_address,
                } => legacy::Register {
                    unifiedId: unified_id.to_owned(),
                    userAddress: user_address,
                    nonce,
                    deadline,
                }
                .eip712_signing_hash(&domain),
                OperationFields::AddSecondary {
                    unified_id,
                    secondary_address,
                } => legacy::AddSecondary {
                    unifiedId: unified_id.to_owned(),
                    secondaryAddress: secondary_address,
                    nonce,
                    deadline,
                }
                .eip712_signing_hash(&domain),
                OperationFields::RemoveSecondary {
                    unified_id,
                    secondary_address,
                } => legacy::RemoveSecondary {
                    unifiedId: unified_id.to_owned(),
                    secondaryAddress: secondary_address,
                    nonce,
                    deadline,
                }
                .eip712_signing_hash(&domain),
                OperationFields::PrimaryChange {
                    unified_id,
                    new_address,
                } => legacy::PrimaryChange {
                    unifiedId: unified_id.to_owned(),
                    newAddress: new_address,
                    nonce,
                    deadline,
                }
                .eip712_signing_hash(&domain),
                OperationFields::UpdateUnifiedId {
                    old_unified_id,
                    new_unified_id,
                } => legacy::UpdateUnifiedId {
                    oldUnifiedId: old_unified_id.to_owned(),
                    newUnifiedId: new_unified_id.to_owned(),
                    nonce,
                    deadline,
                }
                .eip712_signing_hash(&domain),
            };
            Ok(hash)
        }
        EncodingVariant::TypedEnhanced => {
            let target = match target_chain_id {
                Some(target) => enhanced_target_chain(target, chain_id)?,
                None => {
                    return Err(SdkError::Signature(
                        "enhanced typed signing requires targetChainId".into(),
                    ))
                }
            };
            let domain = signing_domain(chain_id, mother_contract);
            let hash = match *fields {
                OperationFields::Register {
                    unified_id,
                    user_address,
                } => enhanced::Register {
                    unifiedId: unified_id.to_owned(),
                    userAddress: user_address,
                    nonce,
                    deadline,
                    targetChainId: target,
                }
                .eip712_signing_hash(&domain),
                OperationFields::AddSecondary {
                    unified_id,
                    secondary_address,
                } => enhanced::AddSecondary {
                    unifiedId: unified_id.to_owned(),
                    secondaryAddress: secondary_address,
                    nonce,
                    deadline,
                    targetChainId: target,
                }
                .eip712_signing_hash(&domain),
                OperationFields::RemoveSecondary {
                    unified_id,
                    secondary_address,
                } => enhanced::RemoveSecondary {
                    unifiedId: unified_id.to_owned(),
                    secondaryAddress: secondary_address,
                    nonce,
                    deadline,
                    targetChainId: target,
                }
                .eip712_signing_hash(&domain),
                OperationFields::PrimaryChange {
                    unified_id,
                    new_address,
                } => enhanced::PrimaryChange {
                    unifiedId: unified_id.to_owned(),
                    newAddress: new_address,
                    nonce,
                    deadline,
                    targetChainId: target,
                }
                .eip712_signing_hash(&domain),
                OperationFields::UpdateUnifiedId {
                    old_unified_id,
                    new_unified_id,
                } => enhanced::UpdateUnifiedId {
                    oldUnifiedId: old_unified_id.to_owned(),
                    newUnifiedId: new_unified_id.to_owned(),
                    nonce,
                    deadline,
                    targetChainId: target,
                }
                .eip712_signing_hash(&domain),
            };
            Ok(hash)
        }
    }
}

/// EIP-712 message structs, legacy variant (no target chain field).
pub mod legacy {
    alloy::sol! {
        struct Register {
            string unifiedId;
            address userAddress;
            uint256 nonce;
            uint256 deadline;
        }

        struct AddSecondary {
            string unifiedId;
            address secondaryAddress;
            uint256 nonce;
            uint256 deadline;
        }

        struct RemoveSecondary {
            string unifiedId;
            address secondaryAddress;
            uint256 nonce;
            uint256 deadline;
        }

        struct PrimaryChange {
            string unifiedId;
            address newAddress;
            uint256 nonce;
            uint256 deadline;
        }

        struct UpdateUnifiedId {
            string oldUnifiedId;
            string newUnifiedId;
            uint256 nonce;
            uint256 deadline;
        }
    }
}

/// EIP-712 message structs, enhanced variant (chain-scoped).
pub mod enhanced {
    alloy::sol! {
        struct Register {
            string unifiedId;
            address userAddress;
            uint256 nonce;
            uint256 deadline;
            uint256 targetChainId;
        }

        struct AddSecondary {
            string unifiedId;
            address secondaryAddress;
            uint256 nonce;
            uint256 deadline;
            uint256 targetChainId;
        }

        struct RemoveSecondary {
            string unifiedId;
            address secondaryAddress;
            uint256 nonce;
            uint256 deadline;
            uint256 targetChainId;
        }

        struct PrimaryChange {
            string unifiedId;
            address newAddress;
            uint256 nonce;
            uint256 deadline;
            uint256 targetChainId;
        }

        struct UpdateUnifiedId {
            string oldUnifiedId;
            string newUnifiedId;
            uint256 nonce;
            uint256 deadline;
            uint256 targetChainId;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::hex;
    use alloy::sol_types::SolStruct;

    fn addr(last_byte: u8) -> Address {
        Address::with_last_byte(last_byte)
    }

    // Golden value computed once from the reference encoding:
    // abi.encode("alice_01", 0x...01) ++ uint256(0), keccak256.
    #[test]
    fn test_register_digest_golden() {
        let digest = register_digest("alice_01", addr(1), U256::ZERO);
        assert_eq!(
            hex::encode(digest),
            "203f8726ddc1b93c6b27f249154b191661f93e889d09c79d2d74184f83ebddb6"
        );
    }

    #[test]
    fn test_update_unified_id_digest_golden() {
        let digest = update_unified_id_digest("alice_01", "alice_02", U256::from(1));
        assert_eq!(
            hex::encode(digest),
            "cd3f0fc6afc4bbb9bbcf0a1f64115566a8c94590738491cd17f12156ad79e9a0"
        );
    }

    #[test]
    fn test_add_secondary_digest_golden() {
        let secondary = "0x000000000000000000000000000000000000beef"
            .parse::<Address>()
            .unwrap();
        let digest = add_secondary_digest("alice_01", secondary, U256::from(7));
        assert_eq!(
            hex::encode(digest),
            "96a61dba3c6969483ff058bd6d8420d5459ed6e98cf3e6ca927b84043f97edad"
        );
    }

    #[test]
    fn test_digests_are_deterministic() {
        let a = primary_change_digest("alice_01", addr(2), U256::from(3));
        let b = primary_change_digest("alice_01", addr(2), U256::from(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_nonce_bump_changes_digest() {
        // The nonce monotonicity probe at the encoding level: same params,
        // bumped nonce, different digest.
        let before = register_digest("alice_01", addr(1), U256::from(4));
        let after = register_digest("alice_01", addr(1), U256::from(5));
        assert_ne!(before, after);
    }

    #[test]
    fn test_operations_with_same_fields_share_tuple_encoding() {
        // addSecondary and removeSecondary encode the same tuple; the
        // operations are distinguished on-chain by the verifier entry point,
        // not the digest.
        let a = add_secondary_digest("alice_01", addr(9), U256::from(1));
        let b = remove_secondary_digest("alice_01", addr(9), U256::from(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_options_blob_layout() {
        let blob = options_blob(U256::from(1), U256::from(2));
        assert_eq!(blob.len(), 64);
        let mut expected = [0u8; 64];
        expected[31] = 1;
        expected[63] = 2;
        assert_eq!(blob, expected);
    }

    #[test]
    fn test_enhanced_target_chain_must_match_domain() {
        assert_eq!(enhanced_target_chain(137, 137).unwrap(), U256::from(137));
        let err = enhanced_target_chain(137, 80002).unwrap_err();
        assert!(matches!(err, SdkError::Signature(_)));
    }

    #[test]
    fn test_typed_signing_hash_is_deterministic() {
        let domain = signing_domain(80002, addr(0xAA));
        let message = legacy::Register {
            unifiedId: "alice_01".into(),
            userAddress: addr(1),
            nonce: U256::ZERO,
            deadline: U256::from(1_700_000_000u64),
        };
        assert_eq!(
            message.eip712_signing_hash(&domain),
            message.eip712_signing_hash(&domain)
        );
    }

    #[test]
    fn test_legacy_and_enhanced_hashes_differ() {
        let domain = signing_domain(80002, addr(0xAA));
        let legacy_message = legacy::Register {
            unifiedId: "alice_01".into(),
            userAddress: addr(1),
            nonce: U256::ZERO,
            deadline: U256::from(1_700_000_000u64),
        };
        let enhanced_message = enhanced::Register {
            unifiedId: "alice_01".into(),
            userAddress: addr(1),
            nonce: U256::ZERO,
            deadline: U256::from(1_700_000_000u64),
            targetChainId: U256::from(80002),
        };
        assert_ne!(
            legacy_message.eip712_signing_hash(&domain),
            enhanced_message.eip712_signing_hash(&domain)
        );
    }

    #[test]
    fn test_operation_signing_hash_packed_matches_direct_digest() {
        let fields = OperationFields::Register {
            unified_id: "alice_01",
            user_address: addr(1),
        };
        let via_variant = operation_signing_hash(
            &fields,
            EncodingVariant::Packed,
            U256::ZERO,
            U256::ZERO,
            None,
            80002,
            addr(0xAA),
        )
        .unwrap();
        assert_eq!(via_variant, register_digest("alice_01", addr(1), U256::ZERO));
    }

    #[test]
    fn test_operation_signing_hash_enhanced_rejects_cross_chain() {
        let fields = OperationFields::PrimaryChange {
            unified_id: "alice_01",
            new_address: addr(2),
        };
        let err = operation_signing_hash(
            &fields,
            EncodingVariant::TypedEnhanced,
            U256::ZERO,
            U256::from(1_700_000_000u64),
            Some(137),
            80002,
            addr(0xAA),
        )
        .unwrap_err();
        assert!(matches!(err, SdkError::Signature(_)));

        // Missing target chain id is also a signature-construction failure.
        let err = operation_signing_hash(
            &fields,
            EncodingVariant::TypedEnhanced,
            U256::ZERO,
            U256::from(1_700_000_000u64),
            None,
            80002,
            addr(0xAA),
        )
        .unwrap_err();
        assert!(matches!(err, SdkError::Signature(_)));
    }

    #[test]
    fn test_domain_changes_typed_hash() {
        let message = legacy::PrimaryChange {
            unifiedId: "alice_01".into(),
            newAddress: addr(3),
            nonce: U256::from(1),
            deadline: U256::from(1_700_000_000u64),
        };
        let amoy = signing_domain(80002, addr(0xAA));
        let base = signing_domain(8453, addr(0xAA));
        assert_ne!(
            message.eip712_signing_hash(&amoy),
            message.eip712_signing_hash(&base)
        );
    }
}
