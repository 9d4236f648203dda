use alloy::primitives::Address;
use tracing::{debug, info};

use crate::config::{AppConfig, CHECK_IN_WINDOW_SECS};
use crate::contract::{self, StreakContract, as_u64};
use crate::guard;
use crate::wallet::{WalletError, WalletProvider};

/// Live wallet connection: signer address, verified chain, contract handle.
/// Created on connect, dropped on disconnect or process exit.
#[derive(Debug)]
pub struct Session {
    pub address: Address,
    pub chain_id: u64,
    contract: StreakContract,
}

impl Session {
    pub fn contract(&self) -> &StreakContract {
        &self.contract
    }

    /// Reads the connected user's record. A failed read means the address has
    /// never checked in, so defaults apply instead of an error.
    pub async fn load_user(&self) -> UserRecord {
        match self.contract.getUserData(self.address).call().await {
            Ok(data) => UserRecord {
                last_check_in: as_u64(data.lastCheckIn),
                streak: as_u64(data.streak),
            },
            Err(e) => {
                debug!("user data read failed, treating {} as new: {}", self.address, e);
                UserRecord::default()
            }
        }
    }
}

/// Requests account access, forces the target chain and binds the contract.
pub async fn connect<W: WalletProvider>(
    wallet: &mut W,
    config: &AppConfig,
) -> Result<Session, WalletError> {
    let accounts = wallet.request_accounts().await?;
    let address = accounts.into_iter().next().ok_or(WalletError::Rejected)?;

    guard::ensure_chain(wallet, &config.target_chain).await?;
    let chain_id = wallet.chain_id().await?;

    let provider = wallet.provider()?;
    let contract = contract::bind(config.contract_address, provider);
    info!("connected {} on chain {}", address, chain_id);

    Ok(Session {
        address,
        chain_id,
        contract,
    })
}

/// Contract-owned check-in record, read-only on this side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserRecord {
    pub last_check_in: u64,
    pub streak: u64,
}

impl UserRecord {
    /// Earliest unix time at which the next check-in will be accepted.
    /// Saturates so an oversized on-chain timestamp cannot wrap.
    pub fn next_eligible(&self) -> u64 {
        self.last_check_in.saturating_add(CHECK_IN_WINDOW_SECS)
    }

    pub fn eligible(&self, now: u64) -> bool {
        now >= self.next_eligible()
    }
}
