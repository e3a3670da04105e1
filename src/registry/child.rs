//! Client for the child registry: the chain-local primary/secondary address
//! bindings for identifiers.

use alloy::{primitives::Address, providers::Provider, sol};

use crate::error::{classify_contract_error, SdkError};
use crate::types::AddressRole;

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract ChildRegistry {
        function getPrimaryAddress(string calldata unifiedId) external view returns (address);
        function getSecondaryAddresses(string calldata unifiedId) external view returns (address[] memory);
        function resolveAddressToUnifiedId(address target) external view returns (string memory);
        function resolveAllAddresses(string calldata unifiedId) external view returns (address primary, address[] memory secondaries);
        function resolveAnyAddressToUnifiedId(address target) external view returns (string memory unifiedId, bool isPrimary, bool isSecondary);
    }
}

use ChildRegistry::ChildRegistryInstance;

#[derive(Clone)]
pub struct ChildRegistryClient<P: Provider + Clone> {
    contract: ChildRegistryInstance<P>,
}

impl<P: Provider + Clone> ChildRegistryClient<P> {
    pub fn new(provider: P, address: Address) -> Self {
        let contract = ChildRegistryInstance::new(address, provider);
        Self { contract }
    }

    /// Get the contract address
    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Active primary wallet; zero address when unregistered.
    pub async fn primary_address(&self, unified_id: &str) -> Result<Address, SdkError> {
        self.contract
            .getPrimaryAddress(unified_id.to_owned())
            .call()
            .await
            .map_err(|e| classify_contract_error("getPrimaryAddress", e))
    }

    /// Secondary wallets bound to an identifier; empty when none.
    pub async fn secondary_addresses(&self, unified_id: &str) -> Result<Vec<Address>, SdkError> {
        self.contract
            .getSecondaryAddresses(unified_id.to_owned())
            .call()
            .await
            .map_err(|e| classify_contract_error("getSecondaryAddresses", e))
    }

    /// Reverse-resolve any bound address; empty string when unknown.
    pub async fn resolve_address(&self, target: Address) -> Result<String, SdkError> {
        self.contract
            .resolveAddressToUnifiedId(target)
            .call()
            .await
            .map_err(|e| classify_contract_error("resolveAddressToUnifiedId", e))
    }

    /// Primary plus secondaries in one call.
    pub async fn all_addresses(
        &self,
        unified_id: &str,
    ) -> Result<(Address, Vec<Address>), SdkError> {
        let data = self
            .contract
            .resolveAllAddresses(unified_id.to_owned())
            .call()
            .await
            .map_err(|e| classify_contract_error("resolveAllAddresses", e))?;
        Ok((data.primary, data.secondaries))
    }

    /// Role resolution: owning identifier plus primary/secondary flags.
    ///
    /// The flags come straight from the registry; both are exposed even
    /// though the registry treats them as mutually exclusive.
    pub async fn resolve_role(&self, target: Address) -> Result<AddressRole, SdkError> {
        let role = self
            .contract
            .resolveAnyAddressToUnifiedId(target)
            .call()
            .await
            .map_err(|e| classify_contract_error("resolveAnyAddressToUnifiedId", e))?;
        Ok(AddressRole {
            unified_id: role.unifiedId,
            is_primary: role.isPrimary,
            is_secondary: role.isSecondary,
        })
    }
}
