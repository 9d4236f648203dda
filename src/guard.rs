use tracing::{debug, info};

use crate::config::ChainParams;
use crate::wallet::{WalletError, WalletProvider};

/// Forces the wallet onto `target` before any contract call proceeds.
///
/// On a mismatch a chain switch is requested; if the wallet does not know the
/// chain, it is registered with the fixed parameters and the switch is
/// re-issued. Any other wallet error propagates unchanged.
pub async fn ensure_chain<W: WalletProvider>(
    wallet: &mut W,
    target: &ChainParams,
) -> Result<(), WalletError> {
    let want = target
        .numeric_chain_id()
        .map_err(|e| WalletError::Rpc(e.to_string()))?;
    let current = wallet.chain_id().await?;
    if current == want {
        debug!("already on chain {}", want);
        return Ok(());
    }

    info!("active chain is {}, switching to {}", current, want);
    match wallet.switch_chain(want).await {
        Ok(()) => Ok(()),
        Err(WalletError::UnknownChain(_)) => {
            info!("chain {} not registered with wallet, adding it", want);
            wallet.add_chain(target).await?;
            wallet.switch_chain(want).await
        }
        Err(e) => Err(e),
    }
}
