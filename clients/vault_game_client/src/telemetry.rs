//! Live views of single accounts.
//!
//! A [`Reconciler`] turns raw account bytes into the cached record plus a
//! bounded history of one numeric sample per decode. [`AccountWatch`] feeds
//! it from a push subscription, [`AccountPoller`] from a fixed interval for
//! accounts with no push channel.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anchor_lang::prelude::Pubkey;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::errors::Result;
use crate::ledger::{AccountSubscription, LedgerClient, SubscriptionGuard};
use crate::live::{LiveValue, Teardown, TeardownSignal};
use crate::state::{AccountRecord, GlobalState, MegaChallenge, PlayerProfile, Vault};

/// Numeric field recorded in the history on every decode.
pub trait Sampled {
    fn sample(&self) -> Option<u64> {
        None
    }
}

impl Sampled for Vault {
    fn sample(&self) -> Option<u64> {
        Some(self.current_fee_amount)
    }
}

impl Sampled for GlobalState {}
impl Sampled for PlayerProfile {}
impl Sampled for MegaChallenge {}

/// Fixed-capacity FIFO of samples, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleHistory {
    capacity: usize,
    samples: VecDeque<u64>,
}

impl SampleHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: u64) {
        if self.capacity == 0 {
            return;
        }
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<u64> {
        self.samples.back().copied()
    }

    pub fn to_vec(&self) -> Vec<u64> {
        self.samples.iter().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    /// `None` until the account exists.
    pub record: Option<T>,
    pub history: SampleHistory,
}

pub struct Reconciler<T> {
    strict: bool,
    live: LiveValue<Snapshot<T>>,
}

impl<T: AccountRecord + Sampled> Reconciler<T> {
    pub fn new(history_len: usize, strict: bool) -> Self {
        Self {
            strict,
            live: LiveValue::new(Snapshot {
                record: None,
                history: SampleHistory::new(history_len),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.live.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.live.get()
    }

    /// Replaces the cached record with the decoded `data`. Missing or empty
    /// data means the account does not exist (yet, or any more). A decode
    /// failure leaves the cache untouched. Subscribers are only woken when
    /// the record or the history changed.
    pub fn ingest(&mut self, data: Option<&[u8]>) -> Result<()> {
        let record = match data {
            Some(bytes) if !bytes.is_empty() => Some(T::decode_with(bytes, self.strict)?),
            _ => None,
        };
        self.live.modify_if(|snapshot| {
            let sample = record.as_ref().and_then(Sampled::sample);
            if let Some(sample) = sample {
                snapshot.history.push(sample);
            }
            let changed = sample.is_some() || snapshot.record != record;
            snapshot.record = record;
            changed
        });
        Ok(())
    }
}

/// Push-fed view of one account.
///
/// Dropping the handle stops the update task and releases the subscription
/// in the background; [`AccountWatch::shutdown`] does both and waits.
pub struct AccountWatch<T> {
    address: Pubkey,
    subscription: SubscriptionGuard,
    rx: watch::Receiver<Snapshot<T>>,
    teardown: Teardown,
    task: JoinHandle<()>,
}

impl<T: AccountRecord + Sampled> AccountWatch<T> {
    /// Subscribes, then reads the account once, then applies every pushed
    /// change in receive order, starting with any queued during the read.
    /// Errors from the subscribe call or the initial read are returned;
    /// errors on later updates are logged and skipped.
    pub async fn start(
        ledger: Arc<dyn LedgerClient>,
        address: Pubkey,
        config: &ClientConfig,
    ) -> Result<Self> {
        let mut reconciler = Reconciler::<T>::new(config.fee_history_len, config.strict_discriminators);
        let AccountSubscription { id, updates } = ledger.subscribe_account(&address).await?;
        let subscription = SubscriptionGuard::new(ledger.clone(), id);

        let primed = match ledger.get_account(&address).await {
            Ok(initial) => reconciler.ingest(initial.as_deref()),
            Err(err) => Err(err.into()),
        };
        if let Err(err) = primed {
            if let Err(release_err) = subscription.release().await {
                debug!(%address, error = %release_err, "failed to release subscription");
            }
            return Err(err);
        }

        let (teardown, signal) = Teardown::new();
        let rx = reconciler.subscribe();
        let task = tokio::spawn(apply_updates(address, reconciler, updates, signal));
        debug!(%address, kind = %T::KIND, subscription = id, "watching account");

        Ok(Self {
            address,
            subscription,
            rx,
            teardown,
            task,
        })
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.rx.borrow().clone()
    }

    pub fn record(&self) -> Option<T> {
        self.rx.borrow().record.clone()
    }

    pub fn history(&self) -> Vec<u64> {
        self.rx.borrow().history.to_vec()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.rx.clone()
    }

    /// Stops applying updates, then releases the subscription. Updates that
    /// arrive after this call are discarded.
    pub async fn shutdown(self) -> Result<()> {
        self.teardown.signal();
        let _ = self.task.await;
        let id = self.subscription.id();
        self.subscription.release().await?;
        debug!(address = %self.address, subscription = ?id, "stopped watching account");
        Ok(())
    }
}

async fn apply_updates<T: AccountRecord + Sampled>(
    address: Pubkey,
    mut reconciler: Reconciler<T>,
    mut updates: mpsc::UnboundedReceiver<Vec<u8>>,
    mut signal: TeardownSignal,
) {
    loop {
        let data = tokio::select! {
            biased;
            _ = signal.signalled() => break,
            update = updates.recv() => match update {
                Some(data) => data,
                None => {
                    debug!(%address, "account subscription closed");
                    break;
                }
            },
        };
        if signal.is_signalled() {
            break;
        }
        if let Err(err) = reconciler.ingest(Some(&data)) {
            warn!(%address, error = %err, "skipping undecodable account update");
        }
    }
}

/// Interval-polled view of one account.
pub struct AccountPoller<T> {
    address: Pubkey,
    rx: watch::Receiver<Snapshot<T>>,
    teardown: Teardown,
    task: JoinHandle<()>,
}

impl<T: AccountRecord + Sampled> AccountPoller<T> {
    /// Reads once (errors returned), then re-reads every
    /// `profile_poll_interval` until shut down. Failed polls are logged and
    /// the next tick tries again.
    pub async fn start(
        ledger: Arc<dyn LedgerClient>,
        address: Pubkey,
        config: &ClientConfig,
    ) -> Result<Self> {
        let mut reconciler = Reconciler::<T>::new(config.fee_history_len, config.strict_discriminators);
        let initial = ledger.get_account(&address).await?;
        reconciler.ingest(initial.as_deref())?;

        let (teardown, signal) = Teardown::new();
        let rx = reconciler.subscribe();
        let period = config.profile_poll_interval();
        let task = tokio::spawn(poll(ledger, address, reconciler, period, signal));
        debug!(%address, kind = %T::KIND, ?period, "polling account");

        Ok(Self {
            address,
            rx,
            teardown,
            task,
        })
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.rx.borrow().clone()
    }

    pub fn record(&self) -> Option<T> {
        self.rx.borrow().record.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.rx.clone()
    }

    pub async fn shutdown(self) {
        self.teardown.signal();
        let _ = self.task.await;
        debug!(address = %self.address, "stopped polling account");
    }
}

async fn poll<T: AccountRecord + Sampled>(
    ledger: Arc<dyn LedgerClient>,
    address: Pubkey,
    mut reconciler: Reconciler<T>,
    period: Duration,
    mut signal: TeardownSignal,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = signal.signalled() => break,
            _ = ticker.tick() => {}
        }
        let fetched = tokio::select! {
            biased;
            _ = signal.signalled() => break,
            fetched = ledger.get_account(&address) => fetched,
        };
        if signal.is_signalled() {
            break;
        }
        match fetched {
            Ok(data) => {
                if let Err(err) = reconciler.ingest(data.as_deref()) {
                    warn!(%address, error = %err, "skipping undecodable poll result");
                }
            }
            Err(err) => warn!(%address, error = %err, "account poll failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::vault::fixtures::{sample_vault, vault_bytes};
    use crate::VaultClientError;

    fn vault_with_fee(fee: u64) -> Vec<u8> {
        let mut vault = sample_vault(1);
        vault.current_fee_amount = fee;
        vault_bytes(&vault)
    }

    #[test]
    fn history_keeps_the_most_recent_thirty() {
        let mut reconciler = Reconciler::<Vault>::new(30, false);
        for fee in 1..=35u64 {
            reconciler.ingest(Some(&vault_with_fee(fee))).unwrap();
        }
        let snapshot = reconciler.snapshot();
        assert_eq!(snapshot.history.to_vec(), (6..=35).collect::<Vec<u64>>());
        assert_eq!(snapshot.record.unwrap().current_fee_amount, 35);
    }

    #[test]
    fn absent_account_clears_record_but_not_history() {
        let mut reconciler = Reconciler::<Vault>::new(30, false);
        reconciler.ingest(Some(&vault_with_fee(10))).unwrap();
        reconciler.ingest(None).unwrap();
        let snapshot = reconciler.snapshot();
        assert!(snapshot.record.is_none());
        assert_eq!(snapshot.history.to_vec(), vec![10]);
    }

    #[test]
    fn decode_failure_keeps_last_good_record() {
        let mut reconciler = Reconciler::<Vault>::new(30, false);
        reconciler.ingest(Some(&vault_with_fee(10))).unwrap();
        let err = reconciler.ingest(Some(&[0u8; 12])).unwrap_err();
        assert!(matches!(err, VaultClientError::AccountTooShort { .. }));
        assert_eq!(reconciler.snapshot().record.unwrap().current_fee_amount, 10);
        assert_eq!(reconciler.snapshot().history.len(), 1);
    }

    #[test]
    fn records_without_samples_leave_history_empty() {
        let mut reconciler = Reconciler::<MegaChallenge>::new(30, false);
        reconciler.ingest(Some(&[0u8; 73])).unwrap();
        assert!(reconciler.snapshot().history.is_empty());
        assert!(reconciler.snapshot().record.is_some());
    }

    #[test]
    fn unchanged_absence_does_not_notify() {
        let mut reconciler = Reconciler::<PlayerProfile>::new(30, false);
        let mut rx = reconciler.subscribe();
        reconciler.ingest(None).unwrap();
        reconciler.ingest(Some(&[])).unwrap();
        assert!(!rx.has_changed().unwrap());

        reconciler.ingest(Some(&[0u8; 81])).unwrap();
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();
        reconciler.ingest(Some(&[0u8; 81])).unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn repeated_fee_is_still_sampled() {
        let mut reconciler = Reconciler::<Vault>::new(30, false);
        reconciler.ingest(Some(&vault_with_fee(7))).unwrap();
        let mut rx = reconciler.subscribe();
        reconciler.ingest(Some(&vault_with_fee(7))).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().history.to_vec(), vec![7, 7]);
    }

    #[test]
    fn zero_capacity_history_stays_empty() {
        let mut history = SampleHistory::new(0);
        history.push(1);
        assert!(history.is_empty());
        assert_eq!(history.latest(), None);
    }
}
