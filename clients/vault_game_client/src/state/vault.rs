use anchor_lang::prelude::Pubkey;

use super::{AccountKind, AccountReader, AccountRecord};
use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultStatus {
    Sealed,
    Live,
    /// Byte the program has not assigned a meaning to yet, kept verbatim.
    Reserved(u8),
}

impl From<u8> for VaultStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => VaultStatus::Sealed,
            1 => VaultStatus::Live,
            other => VaultStatus::Reserved(other),
        }
    }
}

impl From<VaultStatus> for u8 {
    fn from(status: VaultStatus) -> Self {
        match status {
            VaultStatus::Sealed => 0,
            VaultStatus::Live => 1,
            VaultStatus::Reserved(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    pub creator: Pubkey,
    pub status: VaultStatus,
    pub created_at: i64,
    pub end_ts: i64,
    /// Digest of the secret. Only the program compares against it.
    pub secret_hash: [u8; 32],
    pub vault_id: u64,
    pub prize_amount: u64,
    pub starting_fee_amount: u64,
    pub current_fee_amount: u64,
    pub attempt_count: u64,
    pub is_sol_fee: bool,
    /// Meaningful only when `is_sol_fee` is false.
    pub fee_mint: Pubkey,
    pub total_fees_collected: u64,
    pub winner_fee_pool: u64,
    pub winner: Option<Pubkey>,
    pub settled_at: Option<i64>,
    pub paid_out: bool,
    pub bump: u8,
}

impl Vault {
    pub fn is_live(&self) -> bool {
        self.status == VaultStatus::Live
    }

    /// Paid-out vaults are final.
    pub fn is_settled(&self) -> bool {
        self.paid_out
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.end_ts
    }

    /// Prize plus the fee pool that goes to the winner.
    pub fn total_value(&self) -> u64 {
        self.prize_amount.saturating_add(self.winner_fee_pool)
    }

    /// Seconds since creation, `None` for an unset timestamp.
    pub fn sealed_for(&self, now: i64) -> Option<i64> {
        (self.created_at > 0).then(|| now.saturating_sub(self.created_at).max(0))
    }
}

impl AccountRecord for Vault {
    const KIND: AccountKind = AccountKind::Vault;

    fn read(reader: &mut AccountReader<'_>) -> Result<Self> {
        Ok(Self {
            creator: reader.read_pubkey()?,
            status: reader.read_u8()?.into(),
            created_at: reader.read_i64()?,
            end_ts: reader.read_i64()?,
            secret_hash: reader.read_bytes32()?,
            vault_id: reader.read_u64()?,
            prize_amount: reader.read_u64()?,
            starting_fee_amount: reader.read_u64()?,
            current_fee_amount: reader.read_u64()?,
            attempt_count: reader.read_u64()?,
            is_sol_fee: reader.read_bool()?,
            fee_mint: reader.read_pubkey()?,
            total_fees_collected: reader.read_u64()?,
            winner_fee_pool: reader.read_u64()?,
            winner: reader.read_padded_option_pubkey()?,
            settled_at: reader.read_padded_option_i64()?,
            paid_out: reader.read_bool()?,
            bump: reader.read_u8()?,
        })
    }
}
