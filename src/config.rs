//! SDK configuration: relayer endpoint, chain selection, and the contract
//! address book resolved per (environment, chain id).
//!
//! Configuration is an explicit struct handed to the facade at construction
//! time. There is no ambient global state; file and environment loading are
//! conveniences that produce the same struct.

use alloy::primitives::{address, Address};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::SdkError;

/// Default payload deadline offset in seconds (one hour).
pub const DEFAULT_DEADLINE_OFFSET_SECS: u64 = 3600;

/// Deployment environment. Each environment supports a fixed set of chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Testnet,
    Mainnet,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Testnet => f.write_str("testnet"),
            Environment::Mainnet => f.write_str("mainnet"),
        }
    }
}

impl FromStr for Environment {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "testnet" => Ok(Environment::Testnet),
            "mainnet" => Ok(Environment::Mainnet),
            other => Err(SdkError::validation(format!(
                "unknown environment `{other}`; expected `testnet` or `mainnet`"
            ))),
        }
    }
}

/// Addresses of the three cooperating registries on one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub mother: Address,
    pub child: Address,
    pub storage_util: Address,
}

/// Chain ids accepted for an environment.
pub fn supported_chain_ids(environment: Environment) -> &'static [u64] {
    match environment {
        Environment::Testnet => &[80002, 84532, 43113],
        Environment::Mainnet => &[137, 8453, 43114],
    }
}

/// Resolve the registry deployment for (environment, chain id).
///
/// Unsupported combinations fail with a validation error before any network
/// call is attempted.
pub fn contract_addresses(
    environment: Environment,
    chain_id: u64,
) -> Result<ContractAddresses, SdkError> {
    let addresses = match (environment, chain_id) {
        // Polygon Amoy
        (Environment::Testnet, 80002) => ContractAddresses {
            mother: address!("0x5b3e2f8c1dd2a9bcf41f8362954cc34b29c27d55"),
            child: address!("0x8a4d9c6fb01e3a27d3f2ce41a6b8e95c70d1b4e8"),
            storage_util: address!("0x2c7e1b9ad4f08c35e6a94db7c21f50e83b6a9d12"),
        },
        // Base Sepolia
        (Environment::Testnet, 84532) => ContractAddresses {
            mother: address!("0x9f1c8e24b7ad05c3e82b64f1a9d30c57e4bb2a86"),
            child: address!("0x3d5a70e9c1bf46a8d2e9573cc80b14fa6e29d7b3"),
            storage_util: address!("0x6e2b95c4a1d87f30b5c16e8da49f23c7081dbe54"),
        },
        // Avalanche Fuji
        (Environment::Testnet, 43113) => ContractAddresses {
            mother: address!("0x4a8d2e95c70b16f3a9d1c84e5b27f40d3c6e8b19"),
            child: address!("0x7b30c5e81da42f96a8d27e14b9f5c03d6e1a8c47"),
            storage_util: address!("0x1e94ad07b52c86f41d3a9e60c78b25f3d40c9e12"),
        },
        // Polygon
        (Environment::Mainnet, 137) => ContractAddresses {
            mother: address!("0xa31c5d98e02b47f6a8e93d15c60b28f47d1e9c03"),
            child: address!("0xc48e2a71d5b09f36e1d84c92a07b53f8d26e0b15"),
            storage_util: address!("0xe57b14c92ad08f63b2c95e80d41a76c3f8b20d94"),
        },
        // Base
        (Environment::Mainnet, 8453) => ContractAddresses {
            mother: address!("0xb82d4c71e95a03f68d1c52e9b47a08c3d5f16e20"),
            child: address!("0xd15f8a30c64e92b7a1d08c53e96b24f7c80a3d61"),
            storage_util: address!("0xf20c6b85d91a47e3b8e12d50c74a96e1d3b58c07"),
        },
        // Avalanche
        (Environment::Mainnet, 43114) => ContractAddresses {
            mother: address!("0x0ad37e92c51b84f60d2a97c15e83b40f6c21d8e5"),
            child: address!("0x2f85c1d90a46e73b5e08d21c69f34a8d7e10b5c2"),
            storage_util: address!("0x5c09e82db71a43f96d3e85c20f17b64a8d42e9f0"),
        },
        (environment, chain_id) => {
            return Err(SdkError::validation(format!(
                "chain id {chain_id} is not supported on {environment}; supported: {:?}",
                supported_chain_ids(environment)
            )))
        }
    };
    Ok(addresses)
}

fn default_deadline_offset_secs() -> u64 {
    DEFAULT_DEADLINE_OFFSET_SECS
}

/// SDK configuration, validated by [`SdkConfig::validate`] before use.
#[derive(Debug, Clone, Deserialize)]
pub struct SdkConfig {
    /// Relayer base URL, e.g. `https://relayer.example.com`.
    pub base_url: String,
    /// Bearer token for the relayer API.
    pub auth_token: String,
    /// Chain the SDK operates against; must be supported by `environment`.
    pub chain_id: u64,
    pub environment: Environment,
    /// JSON-RPC endpoint used for read-only registry queries.
    pub rpc_url: String,
    /// Deadline offset applied to every signed payload.
    #[serde(default = "default_deadline_offset_secs")]
    pub deadline_offset_secs: u64,
}

impl SdkConfig {
    /// Load configuration from a TOML file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SdkError> {
        let raw = fs::read_to_string(path.as_ref()).map_err(|e| {
            SdkError::validation(format!(
                "cannot read config file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let config: SdkConfig = toml::from_str(&raw)
            .map_err(|e| SdkError::validation(format!("invalid config file: {e}")))?;
        Ok(config)
    }

    /// Load configuration from `UNIFIEDID_*` environment variables.
    pub fn from_env() -> Result<Self, SdkError> {
        fn var(name: &str) -> Result<String, SdkError> {
            std::env::var(name)
                .map_err(|_| SdkError::validation(format!("missing environment variable {name}")))
        }

        let chain_id = var("UNIFIEDID_CHAIN_ID")?
            .parse::<u64>()
            .map_err(|e| SdkError::validation(format!("invalid UNIFIEDID_CHAIN_ID: {e}")))?;
        let deadline_offset_secs = match std::env::var("UNIFIEDID_DEADLINE_OFFSET_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                SdkError::validation(format!("invalid UNIFIEDID_DEADLINE_OFFSET_SECS: {e}"))
            })?,
            Err(_) => DEFAULT_DEADLINE_OFFSET_SECS,
        };

        Ok(Self {
            base_url: var("UNIFIEDID_BASE_URL")?,
            auth_token: var("UNIFIEDID_AUTH_TOKEN")?,
            chain_id,
            environment: var("UNIFIEDID_ENVIRONMENT")?.parse()?,
            rpc_url: var("UNIFIEDID_RPC_URL")?,
            deadline_offset_secs,
        })
    }

    /// Validate every field, returning one descriptive error per failure.
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.base_url.trim().is_empty() {
            return Err(SdkError::validation("base_url is required"));
        }
        let base = reqwest::Url::parse(&self.base_url)
            .map_err(|e| SdkError::validation(format!("invalid base_url `{}`: {e}", self.base_url)))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(SdkError::validation(format!(
                "base_url must use http or https, got `{}`",
                base.scheme()
            )));
        }
        if self.auth_token.trim().is_empty() {
            return Err(SdkError::validation("auth_token is required"));
        }
        if self.rpc_url.trim().is_empty() {
            return Err(SdkError::validation("rpc_url is required"));
        }
        reqwest::Url::parse(&self.rpc_url)
            .map_err(|e| SdkError::validation(format!("invalid rpc_url `{}`: {e}", self.rpc_url)))?;
        if self.deadline_offset_secs == 0 {
            return Err(SdkError::validation("deadline_offset_secs must be non-zero"));
        }
        // Also rejects unsupported (environment, chain id) combinations.
        contract_addresses(self.environment, self.chain_id)?;
        Ok(())
    }

    /// The registry deployment this configuration points at.
    pub fn addresses(&self) -> Result<ContractAddresses, SdkError> {
        contract_addresses(self.environment, self.chain_id)
    }
}
