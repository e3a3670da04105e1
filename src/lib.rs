//! Client SDK for registering and managing Unified IDs — human-readable
//! identifiers bound to a master address, a primary wallet, and optional
//! secondary wallets — across EVM-compatible chains.
//!
//! The SDK is a stateless protocol-encoding layer with three jobs:
//!
//! 1. Construct EIP-191/EIP-712 signatures over canonically encoded
//!    operation payloads ([`encoding`], [`signer`]).
//! 2. Read on-chain state from the mother, child and storage-util
//!    registries over JSON-RPC ([`registry`]).
//! 3. Submit signed operations to the off-chain relayer that executes the
//!    actual transactions ([`relayer`]).
//!
//! [`sdk::UnifiedIdSdk`] ties the pieces together behind one validated
//! configuration. Concurrency control is entirely on-chain: every write
//! references the nonce current at build time, and of two racing operations
//! on the same identifier exactly one succeeds; the loser must rebuild with
//! a fresh nonce.

pub mod builder;
pub mod config;
pub mod encoding;
pub mod error;
pub mod registry;
pub mod relayer;
pub mod sdk;
pub mod signer;
pub mod types;

pub use builder::{
    AddSecondaryRequest, ChangePrimaryRequest, OperationBuilder, RegisterRequest,
    RemoveSecondaryRequest, SignatureInput, UpdateUnifiedIdRequest,
};
pub use config::{contract_addresses, ContractAddresses, Environment, SdkConfig};
pub use encoding::EncodingVariant;
pub use error::SdkError;
pub use registry::RegistryReader;
pub use relayer::RelayerClient;
pub use sdk::{OperationObserver, UnifiedIdSdk};
pub use signer::UnifiedSigner;
pub use types::{
    AddressRole, ChainData, MasterRecord, OperationKind, OperationOutcome, UnifiedId,
};

/// Initialize a default tracing subscriber honoring `RUST_LOG`, for binaries
/// and examples embedding the SDK. Safe to call more than once.
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .try_init();
}
