#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anchor_lang::prelude::Pubkey;
use async_trait::async_trait;
use parking_lot::Mutex;
use solana_program::instruction::{CompiledInstruction, Instruction};
use tokio::sync::{mpsc, watch, Notify};
use vault_game_client::ledger::SubscriptionId;
use vault_game_client::{
    AccountKind, AccountSubscription, LedgerClient, LedgerError, LogNotification, LogSubscription,
    TransactionDetail,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// In-memory ledger. Account pushes and log notifications are delivered
/// only when a test calls [`MockLedger::push_account`] or
/// [`MockLedger::push_log`].
#[derive(Default)]
pub struct MockLedger {
    next_id: AtomicU64,
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    account_subs: Mutex<HashMap<SubscriptionId, (Pubkey, mpsc::UnboundedSender<Vec<u8>>)>>,
    log_subs: Mutex<HashMap<SubscriptionId, mpsc::UnboundedSender<LogNotification>>>,
    unsubscribed: Mutex<Vec<SubscriptionId>>,
    transactions: Mutex<HashMap<String, TransactionDetail>>,
    recent_signatures: Mutex<Vec<String>>,
    transaction_fetches: Mutex<HashMap<String, usize>>,
    account_reads: Mutex<HashMap<Pubkey, usize>>,
    submissions: Mutex<Vec<(Instruction, Pubkey)>>,
    fail_reads: AtomicBool,
    fail_signatures: AtomicBool,
    changes_after_read: Mutex<HashMap<Pubkey, Vec<u8>>>,
    held_reads: Mutex<HashMap<Pubkey, Gate>>,
    held_transactions: Mutex<HashMap<String, Gate>>,
}

/// Holds one ledger call open. `entered` fires once the call is waiting;
/// `release` lets it finish.
#[derive(Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

impl MockLedger {
    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().insert(address, data);
    }

    pub fn remove_account(&self, address: &Pubkey) {
        self.accounts.lock().remove(address);
    }

    /// Stores `data` and delivers it to every subscriber of `address`.
    pub fn push_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().insert(address, data.clone());
        for (watched, tx) in self.account_subs.lock().values() {
            if *watched == address {
                let _ = tx.send(data.clone());
            }
        }
    }

    pub fn push_log(&self, signature: &str, logs: &[&str]) {
        let notification = LogNotification {
            signature: signature.to_string(),
            logs: logs.iter().map(|line| line.to_string()).collect(),
        };
        for tx in self.log_subs.lock().values() {
            let _ = tx.send(notification.clone());
        }
    }

    pub fn add_transaction(&self, signature: &str, detail: TransactionDetail) {
        self.transactions.lock().insert(signature.to_string(), detail);
    }

    pub fn set_recent_signatures(&self, signatures: &[&str]) {
        *self.recent_signatures.lock() = signatures.iter().map(|s| s.to_string()).collect();
    }

    /// The next read of `address` returns the current data, then the
    /// account changes to `data` before the caller sees the result.
    pub fn change_after_next_read(&self, address: Pubkey, data: Vec<u8>) {
        self.changes_after_read.lock().insert(address, data);
    }

    /// The next read of `address` waits on the returned gate.
    pub fn hold_next_read(&self, address: Pubkey) -> Gate {
        let gate = Gate::default();
        self.held_reads.lock().insert(address, gate.clone());
        gate
    }

    /// The next fetch of `signature` waits on the returned gate.
    pub fn hold_transaction(&self, signature: &str) -> Gate {
        let gate = Gate::default();
        self.held_transactions.lock().insert(signature.to_string(), gate.clone());
        gate
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_signatures(&self, fail: bool) {
        self.fail_signatures.store(fail, Ordering::SeqCst);
    }

    pub fn transaction_fetches(&self, signature: &str) -> usize {
        self.transaction_fetches.lock().get(signature).copied().unwrap_or(0)
    }

    pub fn account_reads(&self, address: &Pubkey) -> usize {
        self.account_reads.lock().get(address).copied().unwrap_or(0)
    }

    pub fn submissions(&self) -> Vec<(Instruction, Pubkey)> {
        self.submissions.lock().clone()
    }

    pub fn unsubscribed(&self) -> Vec<SubscriptionId> {
        self.unsubscribed.lock().clone()
    }

    pub fn account_subscribers(&self) -> usize {
        self.account_subs.lock().len()
    }

    pub fn log_subscribers(&self) -> usize {
        self.log_subs.lock().len()
    }

    fn next_id(&self) -> SubscriptionId {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError> {
        *self.account_reads.lock().entry(*address).or_default() += 1;
        let gate = self.held_reads.lock().remove(address);
        if let Some(gate) = gate {
            gate.pass().await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::Transport("connection reset".into()));
        }
        let current = self.accounts.lock().get(address).cloned();
        let change = self.changes_after_read.lock().remove(address);
        if let Some(data) = change {
            self.push_account(*address, data);
        }
        Ok(current)
    }

    async fn subscribe_account(&self, address: &Pubkey) -> Result<AccountSubscription, LedgerError> {
        let (tx, updates) = mpsc::unbounded_channel();
        let id = self.next_id();
        self.account_subs.lock().insert(id, (*address, tx));
        Ok(AccountSubscription { id, updates })
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), LedgerError> {
        let known = self.account_subs.lock().remove(&id).is_some() | self.log_subs.lock().remove(&id).is_some();
        if !known {
            return Err(LedgerError::UnknownSubscription(id));
        }
        self.unsubscribed.lock().push(id);
        Ok(())
    }

    async fn get_recent_signatures(
        &self,
        _program_id: &Pubkey,
        limit: usize,
    ) -> Result<Vec<String>, LedgerError> {
        if self.fail_signatures.load(Ordering::SeqCst) {
            return Err(LedgerError::Transport("rate limited".into()));
        }
        Ok(self.recent_signatures.lock().iter().take(limit).cloned().collect())
    }

    async fn get_transaction(&self, signature: &str) -> Result<Option<TransactionDetail>, LedgerError> {
        *self.transaction_fetches.lock().entry(signature.to_string()).or_default() += 1;
        let gate = self.held_transactions.lock().remove(signature);
        if let Some(gate) = gate {
            gate.pass().await;
        }
        Ok(self.transactions.lock().get(signature).cloned())
    }

    async fn subscribe_logs(&self, _program_id: &Pubkey) -> Result<LogSubscription, LedgerError> {
        let (tx, notifications) = mpsc::unbounded_channel();
        let id = self.next_id();
        self.log_subs.lock().insert(id, tx);
        Ok(LogSubscription { id, notifications })
    }

    async fn submit_and_confirm(
        &self,
        instruction: Instruction,
        signer: &Pubkey,
    ) -> Result<String, LedgerError> {
        let mut submissions = self.submissions.lock();
        submissions.push((instruction, *signer));
        Ok(format!("submitted-{}", submissions.len()))
    }
}

/// Account bytes in the program's layout, discriminator included.
pub struct Layout(Vec<u8>);

impl Layout {
    pub fn new(kind: AccountKind) -> Self {
        Self(kind.discriminator().to_vec())
    }

    pub fn key(mut self, key: &Pubkey) -> Self {
        self.0.extend_from_slice(key.as_ref());
        self
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }

    pub fn u64(mut self, v: u64) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i64(mut self, v: i64) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn bytes(mut self, v: &[u8]) -> Self {
        self.0.extend_from_slice(v);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.0
    }
}

pub fn global_state_bytes(authority: &Pubkey, mint: &Pubkey, vault_count: u64) -> Vec<u8> {
    Layout::new(AccountKind::GlobalState)
        .key(authority)
        .key(mint)
        .u64(vault_count)
        .u8(254)
        .finish()
}

/// Live vault, no winner, with the given current fee.
pub fn vault_bytes(creator: &Pubkey, vault_id: u64, current_fee: u64) -> Vec<u8> {
    Layout::new(AccountKind::Vault)
        .key(creator)
        .u8(1)
        .i64(1_700_000_000)
        .i64(1_700_086_400)
        .bytes(&[7; 32])
        .u64(vault_id)
        .u64(1_000)
        .u64(10)
        .u64(current_fee)
        .u64(0)
        .u8(0)
        .key(&Pubkey::new_unique())
        .u64(0)
        .u64(0)
        .u8(0)
        .key(&Pubkey::default())
        .u8(0)
        .i64(0)
        .u8(0)
        .u8(253)
        .finish()
}

pub fn profile_bytes(authority: &Pubkey, attempts: u64, score: u64) -> Vec<u8> {
    Layout::new(AccountKind::PlayerProfile)
        .key(authority)
        .u64(attempts)
        .u64(0)
        .u64(0)
        .u64(score)
        .i64(1_700_000_000)
        .u8(255)
        .finish()
}

pub fn mega_challenge_bytes(authority: &Pubkey, vault: &Pubkey) -> Vec<u8> {
    Layout::new(AccountKind::MegaChallenge)
        .key(authority)
        .key(vault)
        .u8(252)
        .finish()
}

pub const GUESS_LOGS: [&str; 2] = ["Program log: Instruction: MakeGuess", "Program consumed 4000 units"];

/// Guess transaction against `program_id`. Instruction accounts are
/// `[vault, mega_vault, player_profile, player]`.
pub fn guess_transaction(program_id: &Pubkey, vault: &Pubkey, player: &Pubkey) -> TransactionDetail {
    TransactionDetail {
        logs: GUESS_LOGS.iter().map(|l| l.to_string()).collect(),
        account_keys: vec![
            *player,
            *vault,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            *program_id,
        ],
        instructions: vec![CompiledInstruction::new_from_raw_parts(4, vec![1, 2, 3], vec![1, 2, 3, 0])],
        block_time: Some(1_700_000_500),
    }
}

pub async fn wait_until<T, F>(rx: &mut watch::Receiver<T>, done: F)
where
    F: FnMut(&T) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(done))
        .await
        .expect("timed out waiting for live value")
        .expect("live value dropped");
}
