use thiserror::Error;

use crate::state::AccountKind;

pub type Result<T, E = VaultClientError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum VaultClientError {
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),
    #[error("invalid vault reference: {0:?}")]
    InvalidVaultRef(String),
    #[error("invalid pin: {0}")]
    InvalidPin(&'static str),
    #[error("{kind} account is {actual} bytes, expected at least {expected}")]
    AccountTooShort {
        kind: AccountKind,
        expected: usize,
        actual: usize,
    },
    #[error("{kind} discriminator mismatch")]
    DiscriminatorMismatch { kind: AccountKind },
    #[error("no viable bump for derived address")]
    NoViableBump,
    #[error("global state not initialized")]
    GlobalStateMissing,
    #[error("failed to serialize instruction data: {0}")]
    Serialize(#[from] std::io::Error),
    #[error("invalid client config: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Failures reported by the [`LedgerClient`](crate::LedgerClient)
/// implementation. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("ledger request failed: {0}")]
    Transport(String),
    #[error("transaction rejected: {0}")]
    Rejected(String),
    #[error("unknown subscription {0}")]
    UnknownSubscription(u64),
}
