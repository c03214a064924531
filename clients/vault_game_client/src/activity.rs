//! Feed of recent guesses against any vault.
//!
//! Log notifications for the program name a signature; the feed fetches the
//! transaction, keeps it only if it invokes the program and its logs name
//! the guess instruction, and publishes who guessed against which vault.
//! A one-time backfill of recent signatures runs through the same gate, so
//! a signature is published at most once whichever source sees it first.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use anchor_lang::prelude::Pubkey;
use parking_lot::Mutex;
use solana_program::instruction::CompiledInstruction;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::config::ClientConfig;
use crate::constants::{GUESS_LOG_MARKERS, SEEN_SIGNATURE_CAPACITY};
use crate::errors::Result;
use crate::ledger::{
    LedgerClient, LogNotification, LogSubscription, SubscriptionGuard, TransactionDetail,
};
use crate::live::{LiveValue, Teardown, TeardownSignal};
use crate::utils::time::unix_now;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptActivity {
    pub signature: String,
    pub vault: Option<Pubkey>,
    pub player: Option<Pubkey>,
    /// Block time when known, otherwise when the entry was resolved.
    pub observed_at: i64,
}

/// Participants of a guess, read by position from the instruction's
/// account list: `[vault, mega_vault, player_profile, player, ...]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuessAccounts {
    pub vault: Option<Pubkey>,
    pub player: Option<Pubkey>,
}

impl GuessAccounts {
    const VAULT_POSITION: usize = 0;
    const PLAYER_POSITION: usize = 3;

    /// Missing positions or out-of-range key indices leave the field unset.
    pub fn extract(account_keys: &[Pubkey], ix: &CompiledInstruction) -> Self {
        let at = |position: usize| {
            ix.accounts
                .get(position)
                .and_then(|&index| account_keys.get(usize::from(index)))
                .copied()
        };
        Self {
            vault: at(Self::VAULT_POSITION),
            player: at(Self::PLAYER_POSITION),
        }
    }
}

pub fn mentions_guess(logs: &[String]) -> bool {
    logs.iter().any(|line| {
        let line = line.to_ascii_lowercase();
        GUESS_LOG_MARKERS.iter().any(|marker| line.contains(marker))
    })
}

/// First top-level instruction that invokes `program_id`.
fn program_instruction<'a>(
    detail: &'a TransactionDetail,
    program_id: &Pubkey,
) -> Option<&'a CompiledInstruction> {
    detail.instructions.iter().find(|ix| {
        detail
            .account_keys
            .get(usize::from(ix.program_id_index))
            .is_some_and(|key| key == program_id)
    })
}

/// Guess found in `detail`, or `None` when the transaction is not one.
pub fn correlate(detail: &TransactionDetail, program_id: &Pubkey) -> Option<GuessAccounts> {
    if !mentions_guess(&detail.logs) {
        return None;
    }
    let ix = program_instruction(detail, program_id)?;
    Some(GuessAccounts::extract(&detail.account_keys, ix))
}

/// Signatures already offered to the feed, oldest evicted first once
/// `capacity` is reached. An evicted signature can be admitted again; the
/// recent list still keeps it from appearing twice while it is listed.
pub struct SeenSignatures {
    capacity: usize,
    set: HashSet<String>,
    order: VecDeque<String>,
}

impl SeenSignatures {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            set: HashSet::new(),
            order: VecDeque::new(),
        }
    }

    /// True if `signature` was not already present.
    pub fn insert(&mut self, signature: &str) -> bool {
        if self.set.contains(signature) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.set.remove(&oldest);
            }
        }
        self.set.insert(signature.to_string());
        self.order.push_back(signature.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// De-duplication gate and bounded recent list, shared by the live and
/// backfill paths.
pub struct ActivityLog {
    program_id: Pubkey,
    capacity: usize,
    seen: Mutex<SeenSignatures>,
    recent: Mutex<VecDeque<AttemptActivity>>,
    live: LiveValue<Vec<AttemptActivity>>,
}

impl ActivityLog {
    pub fn new(program_id: Pubkey, capacity: usize) -> Self {
        Self {
            program_id,
            capacity,
            seen: Mutex::new(SeenSignatures::new(SEEN_SIGNATURE_CAPACITY)),
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            live: LiveValue::default(),
        }
    }

    /// Returns true the first time `signature` is offered. Must run before
    /// any await on that signature.
    pub fn observe(&self, signature: &str) -> bool {
        self.seen.lock().insert(signature)
    }

    /// Fetches and inspects the transaction. Any failure is a silent miss.
    pub async fn resolve(&self, ledger: &dyn LedgerClient, signature: &str) -> Option<AttemptActivity> {
        let detail = match ledger.get_transaction(signature).await {
            Ok(Some(detail)) => detail,
            Ok(None) => {
                debug!(%signature, "transaction not found");
                return None;
            }
            Err(err) => {
                debug!(%signature, error = %err, "transaction fetch failed");
                return None;
            }
        };
        let Some(guess) = correlate(&detail, &self.program_id) else {
            trace!(%signature, "not a guess");
            return None;
        };
        Some(AttemptActivity {
            signature: signature.to_string(),
            vault: guess.vault,
            player: guess.player,
            observed_at: detail.block_time.unwrap_or_else(unix_now),
        })
    }

    /// Newest first, capped, one entry per signature.
    pub fn publish(&self, entry: AttemptActivity) {
        let mut recent = self.recent.lock();
        if recent.iter().any(|it| it.signature == entry.signature) {
            return;
        }
        info!(signature = %entry.signature, vault = ?entry.vault, player = ?entry.player, "guess observed");
        recent.push_front(entry);
        recent.truncate(self.capacity);
        self.live.update(recent.iter().cloned().collect());
    }

    pub fn recent(&self) -> Vec<AttemptActivity> {
        self.live.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<AttemptActivity>> {
        self.live.subscribe()
    }
}

/// Running activity feed: live log subscription plus startup backfill.
///
/// Dropping the feed stops both sources and releases the log subscription
/// in the background.
pub struct ActivityFeed {
    log: Arc<ActivityLog>,
    subscription: SubscriptionGuard,
    teardown: Teardown,
    live_task: JoinHandle<()>,
    backfill_task: JoinHandle<()>,
}

impl ActivityFeed {
    pub async fn start(ledger: Arc<dyn LedgerClient>, config: &ClientConfig) -> Result<Self> {
        let program_id = config.program_id;
        let log = Arc::new(ActivityLog::new(program_id, config.activity_len));
        let LogSubscription { id, notifications } = ledger.subscribe_logs(&program_id).await?;
        let subscription = SubscriptionGuard::new(ledger.clone(), id);
        let (teardown, signal) = Teardown::new();

        let live_task = tokio::spawn(follow_logs(
            ledger.clone(),
            log.clone(),
            notifications,
            signal.clone(),
        ));
        let backfill_task = tokio::spawn(backfill(
            ledger,
            log.clone(),
            config.backfill_limit,
            signal,
        ));
        debug!(%program_id, subscription = id, "activity feed started");

        Ok(Self {
            log,
            subscription,
            teardown,
            live_task,
            backfill_task,
        })
    }

    pub fn recent(&self) -> Vec<AttemptActivity> {
        self.log.recent()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<AttemptActivity>> {
        self.log.subscribe()
    }

    /// Stops both sources. Resolutions still in flight are dropped.
    pub async fn shutdown(self) -> Result<()> {
        self.teardown.signal();
        let _ = self.live_task.await;
        let _ = self.backfill_task.await;
        let id = self.subscription.id();
        self.subscription.release().await?;
        debug!(subscription = ?id, "activity feed stopped");
        Ok(())
    }
}

async fn follow_logs(
    ledger: Arc<dyn LedgerClient>,
    log: Arc<ActivityLog>,
    mut notifications: mpsc::UnboundedReceiver<LogNotification>,
    mut signal: TeardownSignal,
) {
    loop {
        let notification = tokio::select! {
            biased;
            _ = signal.signalled() => break,
            next = notifications.recv() => match next {
                Some(notification) => notification,
                None => {
                    debug!("log subscription closed");
                    break;
                }
            },
        };
        let LogNotification { signature, logs } = notification;
        if !log.observe(&signature) {
            continue;
        }
        if !mentions_guess(&logs) {
            continue;
        }
        let ledger = ledger.clone();
        let log = log.clone();
        let signal = signal.clone();
        tokio::spawn(async move {
            let resolved = log.resolve(ledger.as_ref(), &signature).await;
            if let Some(entry) = resolved {
                if !signal.is_signalled() {
                    log.publish(entry);
                }
            }
        });
    }
}

async fn backfill(
    ledger: Arc<dyn LedgerClient>,
    log: Arc<ActivityLog>,
    limit: usize,
    mut signal: TeardownSignal,
) {
    let signatures = tokio::select! {
        biased;
        _ = signal.signalled() => return,
        fetched = ledger.get_recent_signatures(&log.program_id, limit) => match fetched {
            Ok(signatures) => signatures,
            Err(err) => {
                warn!(error = %err, "activity backfill failed");
                return;
            }
        },
    };
    // One at a time to keep the request rate down.
    for signature in signatures {
        if signal.is_signalled() {
            return;
        }
        if !log.observe(&signature) {
            continue;
        }
        let resolved = tokio::select! {
            biased;
            _ = signal.signalled() => return,
            resolved = log.resolve(ledger.as_ref(), &signature) => resolved,
        };
        if let Some(entry) = resolved {
            if signal.is_signalled() {
                return;
            }
            log.publish(entry);
        }
    }
}
