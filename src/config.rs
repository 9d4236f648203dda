use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub const ARC_CHAIN_ID: u64 = 5_042_002;
pub const ARC_CHAIN_ID_HEX: &str = "0x4cef52";
pub const ARC_RPC_URL: &str = "https://rpc.testnet.arc.network";
pub const ARC_EXPLORER: &str = "https://testnet.arcscan.app";
pub const STREAK_CONTRACT: &str = "0xEAEe20a539C550515e22BCaD3eD5e0832b59d1d6";

/// Seconds between eligible check-ins, enforced by the contract.
pub const CHECK_IN_WINDOW_SECS: u64 = 86_400;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Chain registration parameters, in the shape wallets expect for
/// `wallet_addEthereumChain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainParams {
    /// Hex-encoded chain id, e.g. "0x4cef52".
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

impl ChainParams {
    pub fn arc_testnet() -> Self {
        Self {
            chain_id: ARC_CHAIN_ID_HEX.to_string(),
            chain_name: "Arc Testnet".to_string(),
            rpc_urls: vec![ARC_RPC_URL.to_string()],
            native_currency: NativeCurrency {
                name: "USDC".to_string(),
                symbol: "USDC".to_string(),
                decimals: 18,
            },
            block_explorer_urls: vec![ARC_EXPLORER.to_string()],
        }
    }

    pub fn numeric_chain_id(&self) -> Result<u64> {
        let hex = self.chain_id.trim_start_matches("0x");
        u64::from_str_radix(hex, 16)
            .with_context(|| format!("invalid hex chain id '{}'", self.chain_id))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub target_chain: ChainParams,
    pub contract_address: Address,
}

impl AppConfig {
    /// Builds the configuration from environment variables, falling back to
    /// the Arc Testnet defaults.
    pub fn from_env() -> Result<Self> {
        let mut target_chain = ChainParams::arc_testnet();
        if let Ok(url) = env::var("ARC_RPC_URL") {
            target_chain.rpc_urls = vec![url];
        }
        let address = env::var("STREAK_CONTRACT").unwrap_or_else(|_| STREAK_CONTRACT.to_string());
        let contract_address =
            Address::from_str(&address).context("invalid STREAK_CONTRACT address")?;
        Ok(Self {
            target_chain,
            contract_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_testnet_chain_id_matches_hex() {
        let chain = ChainParams::arc_testnet();
        assert_eq!(chain.numeric_chain_id().unwrap(), ARC_CHAIN_ID);
    }

    #[test]
    fn rejects_malformed_chain_id() {
        let mut chain = ChainParams::arc_testnet();
        chain.chain_id = "0xnope".to_string();
        assert!(chain.numeric_chain_id().is_err());
    }

    #[test]
    fn chain_params_serialize_in_wallet_shape() {
        let json = serde_json::to_value(ChainParams::arc_testnet()).unwrap();
        assert_eq!(json["chainId"], ARC_CHAIN_ID_HEX);
        assert_eq!(json["nativeCurrency"]["symbol"], "USDC");
        assert!(json["rpcUrls"].is_array());
        assert!(json["blockExplorerUrls"].is_array());
    }
}
