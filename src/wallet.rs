use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ChainParams;

/// EIP-1193 error code for a chain the wallet does not know about.
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;
/// EIP-1193 error code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Chain id reported while no chain is active yet.
pub const NO_ACTIVE_CHAIN: u64 = 0;

/// Closed classification of wallet-boundary failures. Produced once at this
/// boundary; callers match on kinds instead of inspecting codes or strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("no wallet key configured")]
    Unavailable,
    #[error("request rejected by wallet")]
    Rejected,
    #[error("unrecognized chain {0}")]
    UnknownChain(u64),
    #[error("provider error: {0}")]
    Rpc(String),
}

impl WalletError {
    /// Maps a provider error code onto the closed error set.
    pub fn from_code(code: i64, chain_id: u64, message: &str) -> Self {
        match code {
            USER_REJECTED_CODE => WalletError::Rejected,
            UNRECOGNIZED_CHAIN_CODE => WalletError::UnknownChain(chain_id),
            _ => WalletError::Rpc(format!("code {}: {}", code, message)),
        }
    }
}

/// The four wallet operations the client needs, mirroring the EIP-1193
/// surface: account access, chain query, chain switch, chain registration.
#[async_trait]
pub trait WalletProvider {
    async fn request_accounts(&mut self) -> Result<Vec<Address>, WalletError>;

    /// Currently active chain id, [`NO_ACTIVE_CHAIN`] if none selected yet.
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Activates `chain_id`. Fails with [`WalletError::UnknownChain`] when the
    /// chain has not been registered with the wallet.
    async fn switch_chain(&mut self, chain_id: u64) -> Result<(), WalletError>;

    async fn add_chain(&mut self, params: &ChainParams) -> Result<(), WalletError>;

    /// Signing provider for the active chain, used to bind contract handles.
    fn provider(&self) -> Result<DynProvider, WalletError>;
}

/// Wallet backed by a local private key and a per-chain HTTP RPC registry.
pub struct RpcWallet {
    signer: PrivateKeySigner,
    chains: HashMap<u64, ChainParams>,
    active: Option<(u64, DynProvider)>,
}

impl RpcWallet {
    /// Loads the signing key from `PRIVATE_KEY` and any preregistered chains
    /// from `WALLET_CHAINS` (a JSON array of chain parameters).
    pub fn from_env() -> Result<Self, WalletError> {
        let pk = env::var("PRIVATE_KEY").map_err(|_| WalletError::Unavailable)?;
        let signer = PrivateKeySigner::from_str(pk.trim_start_matches("0x"))
            .map_err(|e| WalletError::Rpc(format!("invalid PRIVATE_KEY: {}", e)))?;

        let mut chains = HashMap::new();
        if let Ok(raw) = env::var("WALLET_CHAINS") {
            let preset: Vec<ChainParams> = serde_json::from_str(&raw)
                .map_err(|e| WalletError::Rpc(format!("invalid WALLET_CHAINS: {}", e)))?;
            for params in preset {
                let id = params
                    .numeric_chain_id()
                    .map_err(|e| WalletError::Rpc(e.to_string()))?;
                chains.insert(id, params);
            }
        }
        debug!("wallet initialized with {} registered chain(s)", chains.len());

        Ok(Self {
            signer,
            chains,
            active: None,
        })
    }

    fn connect_rpc(&self, params: &ChainParams) -> Result<DynProvider, WalletError> {
        let url = params
            .rpc_urls
            .first()
            .ok_or_else(|| WalletError::Rpc(format!("no RPC url for {}", params.chain_name)))?;
        let url = url
            .parse()
            .map_err(|e| WalletError::Rpc(format!("invalid RPC url '{}': {}", url, e)))?;
        let wallet = EthereumWallet::from(self.signer.clone());
        Ok(ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(url)
            .erased())
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn request_accounts(&mut self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.signer.address()])
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        let Some((id, provider)) = &self.active else {
            return Ok(NO_ACTIVE_CHAIN);
        };
        // Re-check against the endpoint rather than trusting the cached id.
        let reported = provider
            .get_chain_id()
            .await
            .map_err(|e| WalletError::Rpc(e.to_string()))?;
        if reported != *id {
            return Err(WalletError::Rpc(format!(
                "endpoint reports chain {} while {} is active",
                reported, id
            )));
        }
        Ok(*id)
    }

    async fn switch_chain(&mut self, chain_id: u64) -> Result<(), WalletError> {
        let params = self
            .chains
            .get(&chain_id)
            .ok_or(WalletError::UnknownChain(chain_id))?
            .clone();
        let provider = self.connect_rpc(&params)?;
        let reported = provider
            .get_chain_id()
            .await
            .map_err(|e| WalletError::Rpc(e.to_string()))?;
        if reported != chain_id {
            return Err(WalletError::Rpc(format!(
                "RPC endpoint for {} reports chain {}, expected {}",
                params.chain_name, reported, chain_id
            )));
        }
        info!("switched to {} (chain {})", params.chain_name, chain_id);
        self.active = Some((chain_id, provider));
        Ok(())
    }

    async fn add_chain(&mut self, params: &ChainParams) -> Result<(), WalletError> {
        let id = params
            .numeric_chain_id()
            .map_err(|e| WalletError::Rpc(e.to_string()))?;
        info!("registering chain {} ({})", id, params.chain_name);
        self.chains.insert(id, params.clone());
        Ok(())
    }

    fn provider(&self) -> Result<DynProvider, WalletError> {
        match &self.active {
            Some((_, provider)) => Ok(provider.clone()),
            None => Err(WalletError::Rpc("no active chain".to_string())),
        }
    }
}
