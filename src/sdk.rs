//! Public facade bundling the operation builder, registry reader and relayer
//! client behind one validated entry point.

use alloy::primitives::{Address, Bytes, U256};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::builder::{
    AddSecondaryRequest, ChangePrimaryRequest, OperationBuilder, RegisterRequest,
    RemoveSecondaryRequest, UpdateUnifiedIdRequest,
};
use crate::config::SdkConfig;
use crate::error::SdkError;
use crate::registry::RegistryReader;
use crate::relayer::RelayerClient;
use crate::types::{
    AddressRole, ChainData, MasterRecord, OperationKind, OperationOutcome, RelayerResponse,
};

/// Observation hook for operation lifecycles. All methods default to no-ops;
/// implement only what you need. The SDK never depends on observer behavior.
pub trait OperationObserver: Send + Sync {
    fn on_start(&self, _operation: OperationKind) {}
    fn on_complete(&self, _operation: OperationKind, _outcome: &OperationOutcome) {}
    fn on_fail(&self, _operation: OperationKind, _error: &SdkError) {}
}

/// The Unified ID SDK.
///
/// Holds no mutable state; every write operation reads the current nonce at
/// build time and races on-chain with any concurrent operation on the same
/// identifier. A stale-nonce rejection from the relayer surfaces as a
/// `success: false` outcome; rebuild and resubmit to retry.
pub struct UnifiedIdSdk {
    config: SdkConfig,
    reader: RegistryReader,
    builder: OperationBuilder,
    relayer: RelayerClient,
    observer: Option<Arc<dyn OperationObserver>>,
}

impl std::fmt::Debug for UnifiedIdSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiedIdSdk")
            .field("config", &self.config)
            .field("has_observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl UnifiedIdSdk {
    /// Validate the configuration and assemble the SDK. Fails before any
    /// network call on bad config, including unsupported
    /// (environment, chain id) combinations.
    pub fn new(config: SdkConfig) -> Result<Self, SdkError> {
        config.validate()?;
        let addresses = config.addresses()?;
        let reader = RegistryReader::connect(&config.rpc_url, addresses, config.chain_id)?;
        let builder = OperationBuilder::new(reader.clone(), config.chain_id)
            .with_deadline_offset(Duration::from_secs(config.deadline_offset_secs));
        let relayer = RelayerClient::new(&config.base_url, &config.auth_token)?;
        info!(
            environment = %config.environment,
            chain_id = config.chain_id,
            "unified id sdk initialized"
        );
        Ok(Self {
            config,
            reader,
            builder,
            relayer,
            observer: None,
        })
    }

    /// Attach a lifecycle observer.
    pub fn with_observer(mut self, observer: Arc<dyn OperationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Direct access to the read-side surface.
    pub fn reader(&self) -> &RegistryReader {
        &self.reader
    }

    /// Direct access to the payload builder, for callers that want to
    /// assemble payloads without submitting them.
    pub fn builder(&self) -> &OperationBuilder {
        &self.builder
    }

    // ------------------------------------------------------------------------
    // Write operations
    // ------------------------------------------------------------------------

    /// Register a new unified id.
    pub async fn register(
        &self,
        request: RegisterRequest<'_>,
    ) -> Result<OperationOutcome, SdkError> {
        let kind = OperationKind::Register;
        self.notify_start(kind);
        let payload = match self.builder.register(request).await {
            Ok(payload) => payload,
            Err(e) => return self.fail(kind, e),
        };
        let result = self.relayer.submit(kind, &payload).await;
        self.settle(kind, result)
    }

    /// Bind an additional secondary address to an identifier.
    pub async fn add_secondary_address(
        &self,
        request: AddSecondaryRequest<'_>,
    ) -> Result<OperationOutcome, SdkError> {
        let kind = OperationKind::AddSecondary;
        self.notify_start(kind);
        let payload = match self.builder.add_secondary(request).await {
            Ok(payload) => payload,
            Err(e) => return self.fail(kind, e),
        };
        let result = self.relayer.submit(kind, &payload).await;
        self.settle(kind, result)
    }

    /// Remove a secondary address from an identifier.
    pub async fn remove_secondary_address(
        &self,
        request: RemoveSecondaryRequest<'_>,
    ) -> Result<OperationOutcome, SdkError> {
        let kind = OperationKind::RemoveSecondary;
        self.notify_start(kind);
        let payload = match self.builder.remove_secondary(request).await {
            Ok(payload) => payload,
            Err(e) => return self.fail(kind, e),
        };
        let result = self.relayer.submit(kind, &payload).await;
        self.settle(kind, result)
    }

    /// Change the active primary address for an identifier.
    pub async fn change_primary_address(
        &self,
        request: ChangePrimaryRequest<'_>,
    ) -> Result<OperationOutcome, SdkError> {
        let kind = OperationKind::ChangePrimary;
        self.notify_start(kind);
        let payload = match self.builder.change_primary(request).await {
            Ok(payload) => payload,
            Err(e) => return self.fail(kind, e),
        };
        let result = self.relayer.submit(kind, &payload).await;
        self.settle(kind, result)
    }

    /// Rename an identifier.
    pub async fn update_unified_id(
        &self,
        request: UpdateUnifiedIdRequest<'_>,
    ) -> Result<OperationOutcome, SdkError> {
        let kind = OperationKind::UpdateUnifiedId;
        self.notify_start(kind);
        let payload = match self.builder.update_unified_id(request).await {
            Ok(payload) => payload,
            Err(e) => return self.fail(kind, e),
        };
        let result = self.relayer.submit(kind, &payload).await;
        self.settle(kind, result)
    }

    // ------------------------------------------------------------------------
    // Read utilities
    // ------------------------------------------------------------------------

    pub async fn is_identifier_registered(&self, unified_id: &str) -> Result<bool, SdkError> {
        self.reader.is_identifier_registered(unified_id).await
    }

    pub async fn identifier_exists_on_mother(
        &self,
        unified_id: &str,
    ) -> Result<MasterRecord, SdkError> {
        self.reader.identifier_exists_on_mother(unified_id).await
    }

    pub async fn identifier_exists_on_child(&self, unified_id: &str) -> Result<bool, SdkError> {
        self.reader.identifier_exists_on_child(unified_id).await
    }

    pub async fn resolve_address_role(&self, address: Address) -> Result<AddressRole, SdkError> {
        self.reader.resolve_address_role(address).await
    }

    pub async fn get_master_wallet(&self, unified_id: &str) -> Result<Address, SdkError> {
        self.reader.get_master_wallet(unified_id).await
    }

    pub async fn get_primary_wallet(&self, unified_id: &str) -> Result<Address, SdkError> {
        self.reader.get_primary_wallet(unified_id).await
    }

    pub async fn get_secondary_wallets(&self, unified_id: &str) -> Result<Vec<Address>, SdkError> {
        self.reader.get_secondary_wallets(unified_id).await
    }

    pub async fn validate_chain_data(
        &self,
        unified_id: &str,
        chain_id: u64,
    ) -> Result<ChainData, SdkError> {
        self.reader.validate_chain_data(unified_id, chain_id).await
    }

    pub async fn get_registration_fee(
        &self,
        token: Address,
        base_fee_wei: U256,
    ) -> Result<U256, SdkError> {
        self.reader.get_registration_fee(token, base_fee_wei).await
    }

    pub async fn verify_signature_on_chain(
        &self,
        data: impl Into<Bytes>,
        expected_signer: Address,
        signature: impl Into<Bytes>,
    ) -> Result<bool, SdkError> {
        self.reader
            .verify_signature_on_chain(data, expected_signer, signature)
            .await
    }

    pub async fn get_nonce(&self, unified_id: &str) -> Result<U256, SdkError> {
        self.reader.get_nonce(unified_id).await
    }

    /// Relayer liveness.
    pub async fn health(&self) -> Result<bool, SdkError> {
        self.relayer.health().await
    }

    /// Relayer reachability.
    pub async fn ping(&self) -> Result<bool, SdkError> {
        self.relayer.ping().await
    }

    // ------------------------------------------------------------------------
    // Outcome plumbing
    // ------------------------------------------------------------------------

    fn notify_start(&self, kind: OperationKind) {
        if let Some(observer) = &self.observer {
            observer.on_start(kind);
        }
    }

    /// Validation failures propagate as errors; everything else becomes a
    /// `success: false` outcome so expected failure modes never throw.
    fn fail(&self, kind: OperationKind, error: SdkError) -> Result<OperationOutcome, SdkError> {
        warn!(operation = %kind, error = %error, "operation failed");
        if let Some(observer) = &self.observer {
            observer.on_fail(kind, &error);
        }
        if error.is_validation() {
            return Err(error);
        }
        Ok(OperationOutcome::from_error(&error))
    }

    fn settle(
        &self,
        kind: OperationKind,
        result: Result<RelayerResponse, SdkError>,
    ) -> Result<OperationOutcome, SdkError> {
        match result {
            Ok(response) => {
                let outcome = OperationOutcome::from_response(response);
                if let Some(observer) = &self.observer {
                    observer.on_complete(kind, &outcome);
                }
                Ok(outcome)
            }
            Err(error) => self.fail(kind, error),
        }
    }
}
