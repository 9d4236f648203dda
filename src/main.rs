use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use arc_streak::checkin::{CheckInError, CheckInFlow, FlowState};
use arc_streak::config::AppConfig;
use arc_streak::cooldown::{self, CooldownClock, Tick, unix_now};
use arc_streak::leaderboard;
use arc_streak::log::init_logging;
use arc_streak::session::{self, Session, UserRecord};
use arc_streak::view;
use arc_streak::wallet::{RpcWallet, WalletError, WalletProvider};

/// Application state, created once per run: wallet, session, flow state and
/// the single countdown handle. All mutation happens in the event loop below.
struct App {
    config: AppConfig,
    target_chain_id: u64,
    wallet: Option<RpcWallet>,
    session: Option<Session>,
    user: UserRecord,
    flow: CheckInFlow,
    clock: CooldownClock,
    ticks: mpsc::UnboundedSender<Tick>,
}

impl App {
    /// Returns false when the user asked to quit.
    async fn handle_command(&mut self, input: &str) -> bool {
        match input {
            "" => {}
            "connect" => self.connect().await,
            "checkin" | "check-in" => self.check_in().await,
            "board" | "leaderboard" => self.board().await,
            "status" => self.status(),
            "help" => Self::help(),
            "quit" | "exit" => return false,
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
        true
    }

    async fn connect(&mut self) {
        if self.session.is_some() {
            println!("Already connected.");
            return;
        }
        println!("{}", view::STATUS_INITIALIZING);

        if self.wallet.is_none() {
            match RpcWallet::from_env() {
                Ok(wallet) => self.wallet = Some(wallet),
                Err(WalletError::Unavailable) => {
                    println!("{}", view::INSTALL_HINT);
                    return;
                }
                Err(e) => {
                    warn!("wallet init failed: {}", e);
                    println!("{}", view::STATUS_CONNECT_FAILED);
                    return;
                }
            }
        }
        let Some(wallet) = self.wallet.as_mut() else {
            return;
        };

        if let Ok(current) = wallet.chain_id().await
            && current != self.target_chain_id
        {
            println!("{}", view::STATUS_SWITCHING);
        }

        match session::connect(wallet, &self.config).await {
            Ok(s) => {
                println!("Connected: {}", view::short_address(&s.address));
                println!("{}", view::STATUS_READY);
                self.session = Some(s);
                self.refresh().await;
            }
            Err(WalletError::Unavailable) => println!("{}", view::INSTALL_HINT),
            Err(e) => {
                warn!("connect failed: {}", e);
                println!("{}", view::STATUS_CONNECT_FAILED);
            }
        }
    }

    async fn check_in(&mut self) {
        if self.flow.in_flight() {
            println!("Check-in already in progress.");
            return;
        }
        if self.session.is_none() {
            println!("Connect a wallet first.");
            return;
        }
        // Soft client-side guard; the contract enforces the window for real.
        if !self.user.eligible(unix_now()) {
            println!("[{}]", view::LABEL_COME_BACK);
            println!("{}", view::STATUS_COOLDOWN);
            return;
        }

        println!("{}", view::STATUS_CONFIRMING);
        let result = {
            let (Some(wallet), Some(session)) = (self.wallet.as_mut(), self.session.as_ref())
            else {
                return;
            };
            self.flow.run(wallet, session, &self.config).await
        };

        match result {
            Ok(receipt) => {
                println!("{}", view::STATUS_UPDATED);
                info!(
                    "check-in {} confirmed in block {:?}",
                    receipt.tx_hash, receipt.block_number
                );
                self.refresh().await;
            }
            Err(CheckInError::Cooldown) => println!("{}", view::STATUS_COOLDOWN),
            Err(e) => {
                warn!("check-in failed: {}", e);
                println!("{}", view::STATUS_TX_FAILED);
            }
        }
    }

    /// Reloads user data and the leaderboard, restarting the countdown if the
    /// user is still inside the cooldown window.
    async fn refresh(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        self.user = session.load_user().await;
        println!("Streak: {}", self.user.streak);

        if self.user.eligible(unix_now()) {
            self.clock.stop();
            println!("{}", Tick::Eligible.label());
            println!("{}", view::STATUS_MAINTAIN);
            println!("[{}]", view::LABEL_CLAIM);
        } else {
            self.clock.start(self.user.next_eligible(), self.ticks.clone());
            println!("[{}]", view::LABEL_COME_BACK);
            println!("{}", view::STATUS_COOLDOWN);
        }

        println!("Leaderboard:");
        Self::render_board(session).await;
    }

    async fn board(&self) {
        let Some(session) = &self.session else {
            println!("Connect a wallet first.");
            return;
        };
        println!("Leaderboard:");
        Self::render_board(session).await;
    }

    async fn render_board(session: &Session) {
        match leaderboard::fetch(session.contract()).await {
            Ok(entries) => print!("{}", view::render_leaderboard(&leaderboard::rank(entries))),
            Err(e) => {
                warn!("leaderboard load failed: {:#}", e);
                print!("{}", view::render_leaderboard_error());
            }
        }
    }

    fn status(&self) {
        let Some(session) = &self.session else {
            println!("Disconnected. Type 'connect' to begin.");
            return;
        };
        println!("Wallet: {}", view::short_address(&session.address));
        println!("Chain:  {}", session.chain_id);
        println!("Streak: {}", self.user.streak);
        match self.flow.state() {
            FlowState::Submitting => println!("{}", view::STATUS_CONFIRMING),
            FlowState::Confirming => println!("{}", view::STATUS_VERIFYING),
            FlowState::Idle => match cooldown::remaining(unix_now(), self.user.next_eligible()) {
                None => {
                    println!("{}", Tick::Eligible.label());
                    println!("[{}]", view::LABEL_CLAIM);
                }
                Some((hours, minutes, seconds)) => {
                    println!("Next check-in in {}h {}m {}s", hours, minutes, seconds);
                }
            },
        }
    }

    fn handle_tick(&mut self, tick: Tick) {
        match tick {
            Tick::Remaining { .. } => {
                print!("\r{}   {}   ", tick.label(), view::STATUS_COOLDOWN);
                let _ = std::io::stdout().flush();
            }
            Tick::Eligible => {
                println!();
                println!("{}", Tick::Eligible.label());
                println!("{}", view::STATUS_MAINTAIN);
                println!("[{}]", view::LABEL_CLAIM);
            }
        }
    }

    fn help() {
        println!("Commands: connect, checkin, board, status, help, quit");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let config = AppConfig::from_env()?;
    let target_chain_id = config.target_chain.numeric_chain_id()?;

    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let mut app = App {
        config,
        target_chain_id,
        wallet: None,
        session: None,
        user: UserRecord::default(),
        flow: CheckInFlow::new(),
        clock: CooldownClock::new(),
        ticks: tick_tx,
    };

    println!("Arc Daily Streak");
    println!("Contract: {}", app.config.contract_address);
    App::help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(input) => {
                        if !app.handle_command(input.trim()).await {
                            break;
                        }
                    }
                    None => break,
                }
            }
            Some(tick) = tick_rx.recv() => app.handle_tick(tick),
        }
    }
    app.clock.stop();
    Ok(())
}
