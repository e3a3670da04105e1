//! Client for the mother registry: master addresses, nonces, and
//! chain-scoped data for identifiers.

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    sol,
};

use crate::error::{classify_contract_error, SdkError};

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract MotherRegistry {
        function getMasterAddress(string calldata unifiedId) external view returns (address);
        function nonces(string calldata unifiedId) external view returns (uint256);
        function getNonce(string calldata unifiedId) external view returns (uint256);
        function getChainData(string calldata unifiedId, uint256 chainId) external view returns (address primary, address[] memory secondaries);
        function resolveAddressToUnifiedId(address target, uint256 chainId) external view returns (string memory);
    }
}

use MotherRegistry::MotherRegistryInstance;

#[derive(Clone)]
pub struct MotherRegistryClient<P: Provider + Clone> {
    contract: MotherRegistryInstance<P>,
}

impl<P: Provider + Clone> MotherRegistryClient<P> {
    pub fn new(provider: P, address: Address) -> Self {
        let contract = MotherRegistryInstance::new(address, provider);
        Self { contract }
    }

    /// Get the contract address
    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Master address for an identifier; zero address when unregistered.
    pub async fn master_address(&self, unified_id: &str) -> Result<Address, SdkError> {
        self.contract
            .getMasterAddress(unified_id.to_owned())
            .call()
            .await
            .map_err(|e| classify_contract_error("getMasterAddress", e))
    }

    /// Current operation nonce for an identifier.
    ///
    /// Tries the `nonces` accessor first and falls back to the older
    /// `getNonce` name; if both fail the errors are combined.
    pub async fn nonce(&self, unified_id: &str) -> Result<U256, SdkError> {
        match self.contract.nonces(unified_id.to_owned()).call().await {
            Ok(nonce) => Ok(nonce),
            Err(primary_err) => match self.contract.getNonce(unified_id.to_owned()).call().await {
                Ok(nonce) => Ok(nonce),
                Err(fallback_err) => Err(SdkError::ContractCall {
                    operation: "nonces/getNonce".to_string(),
                    message: format!("nonces: {primary_err}; getNonce: {fallback_err}"),
                }),
            },
        }
    }

    /// Per-chain primary and secondary bindings recorded on the mother.
    pub async fn chain_data(
        &self,
        unified_id: &str,
        chain_id: u64,
    ) -> Result<(Address, Vec<Address>), SdkError> {
        let data = self
            .contract
            .getChainData(unified_id.to_owned(), U256::from(chain_id))
            .call()
            .await
            .map_err(|e| classify_contract_error("getChainData", e))?;
        Ok((data.primary, data.secondaries))
    }

    /// Reverse-resolve an address on a chain; empty string when unknown.
    pub async fn resolve_address(
        &self,
        target: Address,
        chain_id: u64,
    ) -> Result<String, SdkError> {
        self.contract
            .resolveAddressToUnifiedId(target, U256::from(chain_id))
            .call()
            .await
            .map_err(|e| classify_contract_error("resolveAddressToUnifiedId", e))
    }
}
