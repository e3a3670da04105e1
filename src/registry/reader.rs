//! Combined read/resolution surface over the three registries.
//!
//! All methods are stateless lookups. "Not found" always comes back as a
//! zero/empty/false sentinel; validation failures are raised before any
//! network call; transport and contract failures keep their distinct error
//! classes.

use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::DynProvider;
use tracing::debug;

use crate::config::ContractAddresses;
use crate::error::SdkError;
use crate::registry::{
    connect_read_only, ChildRegistryClient, MotherRegistryClient, StorageUtilClient,
};
use crate::types::{AddressRole, ChainData, MasterRecord, UnifiedId};

#[derive(Clone)]
pub struct RegistryReader {
    mother: MotherRegistryClient<DynProvider>,
    child: ChildRegistryClient<DynProvider>,
    storage_util: StorageUtilClient<DynProvider>,
    chain_id: u64,
}

impl RegistryReader {
    /// Connect a reader to a JSON-RPC endpoint and a registry deployment.
    pub fn connect(
        rpc_url: &str,
        addresses: ContractAddresses,
        chain_id: u64,
    ) -> Result<Self, SdkError> {
        let provider = connect_read_only(rpc_url)?;
        Ok(Self::new(provider, addresses, chain_id))
    }

    /// Build a reader over an existing provider.
    pub fn new(provider: DynProvider, addresses: ContractAddresses, chain_id: u64) -> Self {
        Self {
            mother: MotherRegistryClient::new(provider.clone(), addresses.mother),
            child: ChildRegistryClient::new(provider.clone(), addresses.child),
            storage_util: StorageUtilClient::new(provider, addresses.storage_util),
            chain_id,
        }
    }

    /// The chain this reader's child registry is scoped to.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn mother(&self) -> &MotherRegistryClient<DynProvider> {
        &self.mother
    }

    pub fn child(&self) -> &ChildRegistryClient<DynProvider> {
        &self.child
    }

    pub fn storage_util(&self) -> &StorageUtilClient<DynProvider> {
        &self.storage_util
    }

    fn require_id(unified_id: &str) -> Result<(), SdkError> {
        UnifiedId::new(unified_id).map(|_| ())
    }

    // ------------------------------------------------------------------------
    // Existence checks
    // ------------------------------------------------------------------------

    /// Mother-registry existence: valid iff the master address is non-zero.
    pub async fn identifier_exists_on_mother(
        &self,
        unified_id: &str,
    ) -> Result<MasterRecord, SdkError> {
        Self::require_id(unified_id)?;
        let master_address = self.mother.master_address(unified_id).await?;
        Ok(MasterRecord {
            is_valid: master_address != Address::ZERO,
            master_address,
        })
    }

    /// Child-registry existence: a live primary or any secondary binding.
    pub async fn identifier_exists_on_child(&self, unified_id: &str) -> Result<bool, SdkError> {
        Self::require_id(unified_id)?;
        let (primary, secondaries) = self.child.all_addresses(unified_id).await?;
        Ok(primary != Address::ZERO || !secondaries.is_empty())
    }

    /// True when the address resolves to any identifier on the child.
    pub async fn address_present_on_child(&self, address: Address) -> Result<bool, SdkError> {
        let unified_id = self.child.resolve_address(address).await?;
        Ok(!unified_id.is_empty())
    }

    /// True when the address is in the identifier's secondary set on this
    /// reader's chain.
    pub async fn address_in_use_for_identifier(
        &self,
        unified_id: &str,
        address: Address,
    ) -> Result<bool, SdkError> {
        Self::require_id(unified_id)?;
        let secondaries = self.child.secondary_addresses(unified_id).await?;
        Ok(secondaries.contains(&address))
    }

    /// Mother-registry existence as a plain boolean.
    pub async fn is_identifier_registered(&self, unified_id: &str) -> Result<bool, SdkError> {
        Ok(self.identifier_exists_on_mother(unified_id).await?.is_valid)
    }

    // ------------------------------------------------------------------------
    // Role resolution
    // ------------------------------------------------------------------------

    /// Single authoritative role-resolution call.
    ///
    /// Contract-level resolution failures are swallowed into the empty
    /// sentinel so this can be used as a non-throwing existence probe;
    /// transport failures still propagate.
    pub async fn resolve_address_role(&self, address: Address) -> Result<AddressRole, SdkError> {
        match self.child.resolve_role(address).await {
            Ok(role) => Ok(role),
            Err(SdkError::ContractCall { operation, message }) => {
                debug!(
                    operation = %operation,
                    error = %message,
                    "address role resolution failed, treating as unknown"
                );
                Ok(AddressRole::default())
            }
            Err(other) => Err(other),
        }
    }

    /// True when the address is some identifier's primary wallet.
    pub async fn is_primary_address_registered(&self, address: Address) -> Result<bool, SdkError> {
        let role = self.resolve_address_role(address).await?;
        Ok(role.is_registered() && role.is_primary)
    }

    /// True when the address is some identifier's secondary wallet.
    pub async fn is_secondary_address_registered(
        &self,
        address: Address,
    ) -> Result<bool, SdkError> {
        let role = self.resolve_address_role(address).await?;
        Ok(role.is_registered() && role.is_secondary)
    }

    // ------------------------------------------------------------------------
    // Wallet lookups
    // ------------------------------------------------------------------------

    /// Master address; zero address when unregistered, never an error.
    pub async fn get_master_wallet(&self, unified_id: &str) -> Result<Address, SdkError> {
        Self::require_id(unified_id)?;
        self.mother.master_address(unified_id).await
    }

    /// Active primary wallet; zero address when unregistered.
    pub async fn get_primary_wallet(&self, unified_id: &str) -> Result<Address, SdkError> {
        Self::require_id(unified_id)?;
        self.child.primary_address(unified_id).await
    }

    /// Secondary wallets; empty when none.
    pub async fn get_secondary_wallets(&self, unified_id: &str) -> Result<Vec<Address>, SdkError> {
        Self::require_id(unified_id)?;
        self.child.secondary_addresses(unified_id).await
    }

    /// Identifier owning `address` as its primary on `chain_id`; empty
    /// string when none.
    pub async fn get_identifier_by_primary_address(
        &self,
        address: Address,
        chain_id: u64,
    ) -> Result<String, SdkError> {
        self.mother.resolve_address(address, chain_id).await
    }

    // ------------------------------------------------------------------------
    // Chain-scoped mother lookups
    // ------------------------------------------------------------------------

    /// Per-chain binding for an identifier; valid iff the primary is
    /// non-zero.
    pub async fn validate_chain_data(
        &self,
        unified_id: &str,
        chain_id: u64,
    ) -> Result<ChainData, SdkError> {
        Self::require_id(unified_id)?;
        let (primary, secondaries) = self.mother.chain_data(unified_id, chain_id).await?;
        Ok(ChainData {
            is_valid: primary != Address::ZERO,
            primary,
            secondaries,
        })
    }

    /// True when the address is already a secondary for the identifier on
    /// the given chain, per the mother registry.
    pub async fn is_secondary_already_bound_on_mother(
        &self,
        unified_id: &str,
        chain_id: u64,
        address: Address,
    ) -> Result<bool, SdkError> {
        Self::require_id(unified_id)?;
        let (_, secondaries) = self.mother.chain_data(unified_id, chain_id).await?;
        Ok(secondaries.contains(&address))
    }

    /// True when reverse-resolution on the mother maps the address to some
    /// identifier on the given chain.
    pub async fn is_primary_already_in_use_on_mother(
        &self,
        chain_id: u64,
        address: Address,
    ) -> Result<bool, SdkError> {
        let unified_id = self.mother.resolve_address(address, chain_id).await?;
        Ok(!unified_id.is_empty())
    }

    // ------------------------------------------------------------------------
    // Fees, verification, nonces
    // ------------------------------------------------------------------------

    /// Token-denominated registration fee for a base fee in wei.
    ///
    /// Fees are required: a zero base fee is rejected before the contract is
    /// consulted. A zero token address selects the native currency and is
    /// accepted.
    pub async fn get_registration_fee(
        &self,
        token: Address,
        base_fee_wei: U256,
    ) -> Result<U256, SdkError> {
        if base_fee_wei.is_zero() {
            return Err(SdkError::validation(
                "registration fee is required; base fee must be non-zero",
            ));
        }
        self.storage_util
            .required_token_amount(token, base_fee_wei)
            .await
    }

    /// Delegate signature verification to the storage-util contract. This is
    /// the ground truth; local recovery is only a best-effort pre-check.
    pub async fn verify_signature_on_chain(
        &self,
        data: impl Into<Bytes>,
        expected_signer: Address,
        signature: impl Into<Bytes>,
    ) -> Result<bool, SdkError> {
        let signature = signature.into();
        if signature.is_empty() {
            return Err(SdkError::validation("signature is required"));
        }
        self.storage_util
            .verify_signature(data.into(), expected_signer, signature)
            .await
    }

    /// Current operation nonce for an identifier, freshly read from the
    /// mother registry.
    pub async fn get_nonce(&self, unified_id: &str) -> Result<U256, SdkError> {
        Self::require_id(unified_id)?;
        let nonce = self.mother.nonce(unified_id).await?;
        debug!(unified_id = %unified_id, nonce = %nonce, "read operation nonce");
        Ok(nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{contract_addresses, Environment};

    fn reader() -> RegistryReader {
        let addresses = contract_addresses(Environment::Testnet, 80002).unwrap();
        // Nothing listens here; reads that reach the network fail with a
        // transport error, and validation-only tests never get that far.
        RegistryReader::connect("http://127.0.0.1:59545", addresses, 80002).unwrap()
    }

    #[tokio::test]
    async fn test_malformed_id_fails_before_network() {
        // No node is listening on the test endpoint; a validation error
        // proves the check fired before any RPC was attempted.
        let reader = reader();
        let err = reader.get_nonce("bad id").await.unwrap_err();
        assert!(err.is_validation());

        let err = reader.get_secondary_wallets("").await.unwrap_err();
        assert!(err.is_validation());

        let err = reader
            .is_secondary_already_bound_on_mother("bad id", 80002, Address::ZERO)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_zero_registration_fee_rejected_without_contract_call() {
        let reader = reader();
        let err = reader
            .get_registration_fee(Address::ZERO, U256::ZERO)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("fee"));
    }

    #[tokio::test]
    async fn test_empty_signature_rejected_without_contract_call() {
        let reader = reader();
        let err = reader
            .verify_signature_on_chain(vec![1u8, 2, 3], Address::ZERO, Vec::<u8>::new())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_network_error() {
        // Valid inputs against a dead endpoint must classify as a transport
        // failure, not a contract failure.
        let reader = reader();
        let err = reader.get_master_wallet("alice_01").await.unwrap_err();
        assert!(matches!(err, SdkError::Network(_)), "got: {err:?}");
    }
}
