use alloy::primitives::TxHash;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::contract;
use crate::guard;
use crate::session::Session;
use crate::wallet::{WalletError, WalletProvider};

/// Revert reason the contract uses for a premature check-in.
pub const COOLDOWN_REVERT: &str = "Come back tomorrow";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Submitting,
    Confirming,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckInError {
    #[error("still in cooldown")]
    Cooldown,
    #[error("transaction failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

/// Splits check-in failures into the expected cooldown rejection and
/// everything else.
pub fn classify_failure(message: &str) -> CheckInError {
    if message.contains(COOLDOWN_REVERT) {
        CheckInError::Cooldown
    } else {
        CheckInError::Failed(message.to_string())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CheckInReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

/// Check-in submission state machine:
/// `Idle -> Submitting -> Confirming -> Idle`. While not idle, callers must
/// refuse further submissions (soft guard, mirrored by the contract).
pub struct CheckInFlow {
    state: FlowState,
}

impl CheckInFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn in_flight(&self) -> bool {
        self.state != FlowState::Idle
    }

    /// Runs one check-in end to end: chain re-check, submit, await the
    /// receipt. Always returns the flow to idle so the user can retry.
    pub async fn run<W: WalletProvider>(
        &mut self,
        wallet: &mut W,
        session: &Session,
        config: &AppConfig,
    ) -> Result<CheckInReceipt, CheckInError> {
        self.state = FlowState::Submitting;
        let result = self.submit(wallet, session, config).await;
        self.state = FlowState::Idle;
        result
    }

    async fn submit<W: WalletProvider>(
        &mut self,
        wallet: &mut W,
        session: &Session,
        config: &AppConfig,
    ) -> Result<CheckInReceipt, CheckInError> {
        // The wallet may have drifted to another chain since connect; a fresh
        // handle picks up the provider the guard settled on.
        guard::ensure_chain(wallet, &config.target_chain).await?;
        let handle = contract::bind(config.contract_address, wallet.provider()?);

        info!("submitting check-in for {}", session.address);
        let pending = handle
            .checkIn()
            .send()
            .await
            .map_err(|e| classify_failure(&e.to_string()))?;
        let tx_hash = *pending.tx_hash();
        debug!("check-in transaction sent: {}", tx_hash);

        self.state = FlowState::Confirming;
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| classify_failure(&e.to_string()))?;
        if !receipt.status() {
            return Err(CheckInError::Failed(format!(
                "transaction {} reverted",
                tx_hash
            )));
        }
        info!("check-in confirmed in block {:?}", receipt.block_number);

        Ok(CheckInReceipt {
            tx_hash,
            block_number: receipt.block_number,
        })
    }
}

impl Default for CheckInFlow {
    fn default() -> Self {
        Self::new()
    }
}
