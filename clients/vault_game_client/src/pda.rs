//! Program-derived addresses used by the vault game.
//!
//! Derivation is the ledger's standard bump search: starting at 255, hash
//! `seeds ++ [bump] ++ program_id` and keep the first result that is not a
//! valid curve point.

use std::str::FromStr;

use anchor_lang::prelude::Pubkey;
use anchor_spl::{associated_token, token};

use crate::constants::{GLOBAL_SEED, MEGA_CHALLENGE_SEED, MEGA_VAULT_SEED, PLAYER_SEED, VAULT_SEED};
use crate::errors::{Result, VaultClientError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdaSeed {
    Global,
    MegaVault,
    MegaChallenge,
    Vault(u64),
    Player(Pubkey),
}

impl PdaSeed {
    fn components(&self) -> Vec<Vec<u8>> {
        match self {
            PdaSeed::Global => vec![GLOBAL_SEED.to_vec()],
            PdaSeed::MegaVault => vec![MEGA_VAULT_SEED.to_vec()],
            PdaSeed::MegaChallenge => vec![MEGA_CHALLENGE_SEED.to_vec()],
            PdaSeed::Vault(vault_id) => vec![VAULT_SEED.to_vec(), vault_id.to_le_bytes().to_vec()],
            PdaSeed::Player(authority) => vec![PLAYER_SEED.to_vec(), authority.to_bytes().to_vec()],
        }
    }

    pub fn find_address(&self, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
        let components = self.components();
        let seeds: Vec<&[u8]> = components.iter().map(Vec::as_slice).collect();
        find_program_address(&seeds, program_id)
    }

    pub fn address(&self, program_id: &Pubkey) -> Result<Pubkey> {
        self.find_address(program_id).map(|(address, _)| address)
    }
}

/// Errors only if all 256 bumps land on the curve.
pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    Pubkey::try_find_program_address(seeds, program_id).ok_or(VaultClientError::NoViableBump)
}

pub fn global_state_address(program_id: &Pubkey) -> Result<Pubkey> {
    PdaSeed::Global.address(program_id)
}

pub fn mega_vault_address(program_id: &Pubkey) -> Result<Pubkey> {
    PdaSeed::MegaVault.address(program_id)
}

pub fn mega_challenge_address(program_id: &Pubkey) -> Result<Pubkey> {
    PdaSeed::MegaChallenge.address(program_id)
}

pub fn vault_address(program_id: &Pubkey, vault_id: u64) -> Result<Pubkey> {
    PdaSeed::Vault(vault_id).address(program_id)
}

pub fn player_profile_address(program_id: &Pubkey, authority: &Pubkey) -> Result<Pubkey> {
    PdaSeed::Player(*authority).address(program_id)
}

/// Token account owned by `owner` for `mint` under the classic token program.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Result<Pubkey> {
    let seeds: [&[u8]; 3] = [owner.as_ref(), token::ID.as_ref(), mint.as_ref()];
    find_program_address(&seeds, &associated_token::ID).map(|(address, _)| address)
}

pub fn parse_address(text: &str) -> Result<Pubkey> {
    Pubkey::from_str(text.trim()).map_err(|_| VaultClientError::InvalidAddress(text.to_string()))
}

/// Resolves either a base58 vault address or a numeric vault id.
pub fn parse_vault_ref(text: &str, program_id: &Pubkey) -> Result<Pubkey> {
    if let Ok(address) = parse_address(text) {
        return Ok(address);
    }
    match text.trim().parse::<u64>() {
        Ok(vault_id) => vault_address(program_id, vault_id),
        Err(_) => Err(VaultClientError::InvalidVaultRef(text.to_string())),
    }
}
