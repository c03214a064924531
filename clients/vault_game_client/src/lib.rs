//! Client-side protocol layer for the vault game program.
//!
//! Derives the program's addresses, decodes its accounts, encodes its
//! instructions and keeps live views of vault, flagship and profile state
//! plus a feed of recent guesses. Everything that touches the network goes
//! through a [`LedgerClient`] supplied by the caller.

use anchor_lang::prelude::*;

pub mod activity;
pub mod client;
pub mod config;
pub mod constants;
pub mod discriminator;
pub mod errors;
pub mod instructions;
pub mod ledger;
pub mod live;
pub mod pda;
pub mod state;
pub mod telemetry;
pub mod utils;

declare_id!("B1uj973FayJZYCHVJx3td57zMMBzg4n6UENB3bS24F3t");

pub use activity::{ActivityFeed, AttemptActivity};
pub use client::{CreateVaultRequest, CreatedVault, VaultGameClient};
pub use config::ClientConfig;
pub use discriminator::{account_discriminator, discriminator};
pub use errors::{LedgerError, Result, VaultClientError};
pub use ledger::{AccountSubscription, LedgerClient, LogNotification, LogSubscription, TransactionDetail};
pub use live::LiveValue;
pub use pda::PdaSeed;
pub use state::{
    decode_account, AccountData, AccountKind, AccountRecord, GlobalState, MegaChallenge,
    PlayerProfile, Vault, VaultStatus,
};
pub use telemetry::{AccountPoller, AccountWatch, Snapshot};
