use anchor_lang::prelude::Pubkey;

use super::{AccountKind, AccountReader, AccountRecord};
use crate::errors::Result;

/// Singleton program state. `vault_count` is the id the next vault will be
/// created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalState {
    pub authority: Pubkey,
    pub mint: Pubkey,
    pub vault_count: u64,
    pub bump: u8,
}

impl AccountRecord for GlobalState {
    const KIND: AccountKind = AccountKind::GlobalState;

    fn read(reader: &mut AccountReader<'_>) -> Result<Self> {
        Ok(Self {
            authority: reader.read_pubkey()?,
            mint: reader.read_pubkey()?,
            vault_count: reader.read_u64()?,
            bump: reader.read_u8()?,
        })
    }
}
