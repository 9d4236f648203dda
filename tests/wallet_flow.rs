use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use std::sync::Mutex;

use arc_streak::config::{ARC_CHAIN_ID, AppConfig, ChainParams};
use arc_streak::guard::ensure_chain;
use arc_streak::session;
use arc_streak::wallet::{WalletError, WalletProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Accounts,
    ChainId,
    Switch(u64),
    Add(u64),
    Provider,
}

/// Scripted wallet that records every boundary call in order.
struct MockWallet {
    current: u64,
    known: Vec<u64>,
    calls: Mutex<Vec<Call>>,
    reject_accounts: bool,
    fail_switch: Option<String>,
}

impl MockWallet {
    const ADDRESS: Address = Address::repeat_byte(0x11);

    fn new(current: u64, known: Vec<u64>) -> Self {
        Self {
            current,
            known,
            calls: Mutex::new(Vec::new()),
            reject_accounts: false,
            fail_switch: None,
        }
    }

    fn log(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn dummy_provider() -> DynProvider {
        ProviderBuilder::new()
            .connect_http("http://localhost:8545".parse().unwrap())
            .erased()
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&mut self) -> Result<Vec<Address>, WalletError> {
        self.log(Call::Accounts);
        if self.reject_accounts {
            return Err(WalletError::Rejected);
        }
        Ok(vec![Self::ADDRESS])
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        self.log(Call::ChainId);
        Ok(self.current)
    }

    async fn switch_chain(&mut self, chain_id: u64) -> Result<(), WalletError> {
        self.log(Call::Switch(chain_id));
        if let Some(msg) = &self.fail_switch {
            return Err(WalletError::Rpc(msg.clone()));
        }
        if !self.known.contains(&chain_id) {
            return Err(WalletError::UnknownChain(chain_id));
        }
        self.current = chain_id;
        Ok(())
    }

    async fn add_chain(&mut self, params: &ChainParams) -> Result<(), WalletError> {
        let id = params
            .numeric_chain_id()
            .map_err(|e| WalletError::Rpc(e.to_string()))?;
        self.log(Call::Add(id));
        self.known.push(id);
        Ok(())
    }

    fn provider(&self) -> Result<DynProvider, WalletError> {
        self.log(Call::Provider);
        Ok(Self::dummy_provider())
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        target_chain: ChainParams::arc_testnet(),
        contract_address: Address::repeat_byte(0xEA),
    }
}

#[tokio::test]
async fn mismatched_chain_triggers_switch() {
    let mut wallet = MockWallet::new(1, vec![ARC_CHAIN_ID]);
    ensure_chain(&mut wallet, &ChainParams::arc_testnet())
        .await
        .unwrap();
    assert_eq!(
        wallet.calls(),
        vec![Call::ChainId, Call::Switch(ARC_CHAIN_ID)]
    );
    assert_eq!(wallet.current, ARC_CHAIN_ID);
}

#[tokio::test]
async fn matching_chain_needs_no_switch() {
    let mut wallet = MockWallet::new(ARC_CHAIN_ID, vec![ARC_CHAIN_ID]);
    ensure_chain(&mut wallet, &ChainParams::arc_testnet())
        .await
        .unwrap();
    assert_eq!(wallet.calls(), vec![Call::ChainId]);
}

#[tokio::test]
async fn unknown_chain_is_registered_then_switched() {
    let mut wallet = MockWallet::new(1, vec![]);
    ensure_chain(&mut wallet, &ChainParams::arc_testnet())
        .await
        .unwrap();
    assert_eq!(
        wallet.calls(),
        vec![
            Call::ChainId,
            Call::Switch(ARC_CHAIN_ID),
            Call::Add(ARC_CHAIN_ID),
            Call::Switch(ARC_CHAIN_ID),
        ]
    );
    assert_eq!(wallet.current, ARC_CHAIN_ID);
}

#[tokio::test]
async fn other_switch_errors_propagate_without_registration() {
    let mut wallet = MockWallet::new(1, vec![ARC_CHAIN_ID]);
    wallet.fail_switch = Some("rpc unreachable".to_string());
    let err = ensure_chain(&mut wallet, &ChainParams::arc_testnet())
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Rpc(_)));
    assert!(!wallet.calls().iter().any(|c| matches!(c, Call::Add(_))));
}

#[tokio::test]
async fn connect_runs_guard_before_binding_the_contract() {
    let mut wallet = MockWallet::new(1, vec![ARC_CHAIN_ID]);
    let config = test_config();
    let session = session::connect(&mut wallet, &config).await.unwrap();
    assert_eq!(session.address, MockWallet::ADDRESS);
    assert_eq!(session.chain_id, ARC_CHAIN_ID);

    let calls = wallet.calls();
    assert_eq!(calls[0], Call::Accounts);
    let switch = calls
        .iter()
        .position(|c| matches!(c, Call::Switch(_)))
        .unwrap();
    let provider = calls.iter().position(|c| *c == Call::Provider).unwrap();
    assert!(switch < provider);
}

#[tokio::test]
async fn rejected_account_request_fails_the_connect() {
    let mut wallet = MockWallet::new(1, vec![ARC_CHAIN_ID]);
    wallet.reject_accounts = true;
    let err = session::connect(&mut wallet, &test_config())
        .await
        .unwrap_err();
    assert_eq!(err, WalletError::Rejected);
    // Connection stopped at the account request, no chain negotiation ran.
    assert_eq!(wallet.calls(), vec![Call::Accounts]);
}
