//! One-stop handle over a [`LedgerClient`]: account reads, the four
//! program calls, and the live watchers.

use std::sync::Arc;

use anchor_lang::prelude::Pubkey;
use tracing::{debug, info};

use crate::activity::ActivityFeed;
use crate::config::ClientConfig;
use crate::errors::{Result, VaultClientError};
use crate::instructions::{self, create_vault::VaultTerms};
use crate::ledger::LedgerClient;
use crate::pda;
use crate::state::{AccountRecord, GlobalState, MegaChallenge, PlayerProfile, Vault};
use crate::telemetry::{AccountPoller, AccountWatch};
use crate::utils::secret::{seal_secret, validate_pin};

/// What a creator chooses for a new vault. The PIN never leaves the client;
/// only its hash is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVaultRequest {
    pub pin: String,
    pub prize_amount: u64,
    pub base_fee_amount: u64,
    pub end_ts: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedVault {
    pub signature: String,
    pub vault: Pubkey,
    pub vault_id: u64,
}

#[derive(Clone)]
pub struct VaultGameClient {
    ledger: Arc<dyn LedgerClient>,
    config: ClientConfig,
}

impl VaultGameClient {
    pub fn new(ledger: impl LedgerClient, config: ClientConfig) -> Self {
        Self::from_shared(Arc::new(ledger), config)
    }

    pub fn from_shared(ledger: Arc<dyn LedgerClient>, config: ClientConfig) -> Self {
        Self { ledger, config }
    }

    pub fn program_id(&self) -> Pubkey {
        self.config.program_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn ledger(&self) -> Arc<dyn LedgerClient> {
        self.ledger.clone()
    }

    async fn fetch<T: AccountRecord>(&self, address: &Pubkey) -> Result<Option<T>> {
        let Some(data) = self.ledger.get_account(address).await? else {
            debug!(%address, kind = %T::KIND, "account absent");
            return Ok(None);
        };
        T::decode_with(&data, self.config.strict_discriminators).map(Some)
    }

    pub async fn fetch_global_state(&self) -> Result<Option<GlobalState>> {
        let address = pda::global_state_address(&self.config.program_id)?;
        self.fetch(&address).await
    }

    pub async fn fetch_vault(&self, vault: &Pubkey) -> Result<Option<Vault>> {
        self.fetch(vault).await
    }

    pub async fn fetch_vault_by_id(&self, vault_id: u64) -> Result<Option<Vault>> {
        let address = pda::vault_address(&self.config.program_id, vault_id)?;
        self.fetch(&address).await
    }

    /// Accepts an address or a decimal vault id.
    pub async fn fetch_vault_ref(&self, vault_ref: &str) -> Result<Option<Vault>> {
        let address = pda::parse_vault_ref(vault_ref, &self.config.program_id)?;
        self.fetch(&address).await
    }

    /// `Ok(None)` until the player's first `touch_player`.
    pub async fn fetch_player_profile(&self, player: &Pubkey) -> Result<Option<PlayerProfile>> {
        let address = pda::player_profile_address(&self.config.program_id, player)?;
        self.fetch(&address).await
    }

    pub async fn fetch_mega_challenge(&self) -> Result<Option<MegaChallenge>> {
        let address = pda::mega_challenge_address(&self.config.program_id)?;
        self.fetch(&address).await
    }

    /// The vault currently designated as the flagship, if one is set.
    pub async fn flagship_vault(&self) -> Result<Option<Pubkey>> {
        Ok(self
            .fetch_mega_challenge()
            .await?
            .and_then(|challenge| challenge.flagship()))
    }

    pub async fn initialize_global(&self, authority: &Pubkey, mint: &Pubkey) -> Result<String> {
        let ix = instructions::initialize_global(&self.config.program_id, authority, mint)?;
        let signature = self.ledger.submit_and_confirm(ix, authority).await?;
        info!(%signature, %authority, %mint, "global state initialized");
        Ok(signature)
    }

    /// Creates the next vault. The id is the global `vault_count` read just
    /// before submitting; a concurrent creator can race it, in which case
    /// the program rejects the transaction.
    pub async fn create_vault(
        &self,
        creator: &Pubkey,
        request: &CreateVaultRequest,
    ) -> Result<CreatedVault> {
        let pin_len = validate_pin(&request.pin)?;
        let global = self
            .fetch_global_state()
            .await?
            .ok_or(VaultClientError::GlobalStateMissing)?;

        let program_id = &self.config.program_id;
        let vault_id = global.vault_count;
        let vault = pda::vault_address(program_id, vault_id)?;
        let terms = VaultTerms {
            end_ts: request.end_ts,
            secret_hash: seal_secret(&request.pin),
            prize_amount: request.prize_amount,
            base_fee_amount: request.base_fee_amount,
            pin_len,
            fee_mint: global.mint,
        };
        let ix = instructions::create_vault(program_id, creator, vault_id, &terms)?;
        let signature = self.ledger.submit_and_confirm(ix, creator).await?;
        info!(%signature, %vault, vault_id, pin_len, "vault created");

        Ok(CreatedVault {
            signature,
            vault,
            vault_id,
        })
    }

    pub async fn touch_player(&self, player: &Pubkey) -> Result<String> {
        let ix = instructions::touch_player(&self.config.program_id, player)?;
        let signature = self.ledger.submit_and_confirm(ix, player).await?;
        info!(%signature, %player, "player profile touched");
        Ok(signature)
    }

    pub async fn set_mega_challenge_vault(&self, authority: &Pubkey, vault: &Pubkey) -> Result<String> {
        let ix = instructions::set_mega_challenge_vault(&self.config.program_id, authority, vault)?;
        let signature = self.ledger.submit_and_confirm(ix, authority).await?;
        info!(%signature, %vault, "flagship vault set");
        Ok(signature)
    }

    /// Live vault with the last `fee_history_len` current-fee samples.
    pub async fn watch_vault(&self, vault: &Pubkey) -> Result<AccountWatch<Vault>> {
        AccountWatch::start(self.ledger.clone(), *vault, &self.config).await
    }

    pub async fn watch_mega_challenge(&self) -> Result<AccountWatch<MegaChallenge>> {
        let address = pda::mega_challenge_address(&self.config.program_id)?;
        AccountWatch::start(self.ledger.clone(), address, &self.config).await
    }

    pub async fn poll_player_profile(&self, player: &Pubkey) -> Result<AccountPoller<PlayerProfile>> {
        let address = pda::player_profile_address(&self.config.program_id, player)?;
        AccountPoller::start(self.ledger.clone(), address, &self.config).await
    }

    pub async fn activity_feed(&self) -> Result<ActivityFeed> {
        ActivityFeed::start(self.ledger.clone(), &self.config).await
    }
}
