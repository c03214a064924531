//! The remote ledger as this crate sees it.
//!
//! Implementations own transport concerns: RPC endpoints, commitment,
//! timeouts, retries, signing. This crate never retries a failed call.

use std::sync::Arc;

use anchor_lang::prelude::Pubkey;
use async_trait::async_trait;
use solana_program::instruction::{CompiledInstruction, Instruction};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::errors::LedgerError;

pub type SubscriptionId = u64;

pub struct AccountSubscription {
    pub id: SubscriptionId,
    /// Raw account data, one message per change, in receive order.
    pub updates: mpsc::UnboundedReceiver<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogNotification {
    pub signature: String,
    pub logs: Vec<String>,
}

pub struct LogSubscription {
    pub id: SubscriptionId,
    pub notifications: mpsc::UnboundedReceiver<LogNotification>,
}

/// The parts of a confirmed transaction the activity feed inspects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionDetail {
    pub logs: Vec<String>,
    pub account_keys: Vec<Pubkey>,
    pub instructions: Vec<CompiledInstruction>,
    pub block_time: Option<i64>,
}

#[async_trait]
pub trait LedgerClient: Send + Sync + 'static {
    /// `Ok(None)` when no account exists at `address`.
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError>;

    async fn subscribe_account(&self, address: &Pubkey) -> Result<AccountSubscription, LedgerError>;

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), LedgerError>;

    /// Most recent first.
    async fn get_recent_signatures(
        &self,
        program_id: &Pubkey,
        limit: usize,
    ) -> Result<Vec<String>, LedgerError>;

    async fn get_transaction(&self, signature: &str) -> Result<Option<TransactionDetail>, LedgerError>;

    async fn subscribe_logs(&self, program_id: &Pubkey) -> Result<LogSubscription, LedgerError>;

    /// Signs with `signer`, submits and waits for confirmation. Returns the
    /// transaction signature.
    async fn submit_and_confirm(
        &self,
        instruction: Instruction,
        signer: &Pubkey,
    ) -> Result<String, LedgerError>;
}

/// Owns one ledger subscription. [`SubscriptionGuard::release`] ends it and
/// reports the result; dropping an unreleased guard ends it in the
/// background.
pub struct SubscriptionGuard {
    ledger: Arc<dyn LedgerClient>,
    id: Option<SubscriptionId>,
}

impl SubscriptionGuard {
    pub fn new(ledger: Arc<dyn LedgerClient>, id: SubscriptionId) -> Self {
        Self { ledger, id: Some(id) }
    }

    pub fn id(&self) -> Option<SubscriptionId> {
        self.id
    }

    pub async fn release(mut self) -> Result<(), LedgerError> {
        match self.id.take() {
            Some(id) => self.ledger.unsubscribe(id).await,
            None => Ok(()),
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        let Ok(runtime) = Handle::try_current() else {
            warn!(subscription = id, "no runtime to release subscription");
            return;
        };
        let ledger = self.ledger.clone();
        runtime.spawn(async move {
            match ledger.unsubscribe(id).await {
                Ok(()) => debug!(subscription = id, "released dropped subscription"),
                Err(err) => warn!(subscription = id, error = %err, "failed to release dropped subscription"),
            }
        });
    }
}
