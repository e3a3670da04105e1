//! Client for the storage-util contract: fee conversion and on-chain
//! signature verification.

use alloy::{
    primitives::{Address, Bytes, U256},
    providers::Provider,
    sol,
};

use crate::error::{classify_contract_error, SdkError};

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract StorageUtil {
        function getRequiredTokenAmount(address token, uint256 baseFee) external view returns (uint256);
        function verifySignature(bytes calldata data, address expectedSigner, bytes calldata signature) external view returns (bool);
        function isUnifiedIdValid(string calldata unifiedId) external view returns (bool);
    }
}

use StorageUtil::StorageUtilInstance;

#[derive(Clone)]
pub struct StorageUtilClient<P: Provider + Clone> {
    contract: StorageUtilInstance<P>,
}

impl<P: Provider + Clone> StorageUtilClient<P> {
    pub fn new(provider: P, address: Address) -> Self {
        let contract = StorageUtilInstance::new(address, provider);
        Self { contract }
    }

    /// Get the contract address
    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Convert a base fee into the token-denominated required amount.
    /// Zero-address token means the chain's native currency.
    pub async fn required_token_amount(
        &self,
        token: Address,
        base_fee: U256,
    ) -> Result<U256, SdkError> {
        self.contract
            .getRequiredTokenAmount(token, base_fee)
            .call()
            .await
            .map_err(|e| classify_contract_error("getRequiredTokenAmount", e))
    }

    /// Authoritative signature verification: the contract recomputes the
    /// recovery and decides. Local recovery is a pre-check only.
    pub async fn verify_signature(
        &self,
        data: Bytes,
        expected_signer: Address,
        signature: Bytes,
    ) -> Result<bool, SdkError> {
        self.contract
            .verifySignature(data, expected_signer, signature)
            .call()
            .await
            .map_err(|e| classify_contract_error("verifySignature", e))
    }

    /// Contract-side identifier format check.
    pub async fn is_unified_id_valid(&self, unified_id: &str) -> Result<bool, SdkError> {
        self.contract
            .isUnifiedIdValid(unified_id.to_owned())
            .call()
            .await
            .map_err(|e| classify_contract_error("isUnifiedIdValid", e))
    }
}
