use anchor_lang::prelude::Pubkey;

use super::{AccountKind, AccountReader, AccountRecord};
use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MegaChallenge {
    pub authority: Pubkey,
    /// Flagship vault; the default address means none is designated.
    pub vault: Pubkey,
    pub bump: u8,
}

impl MegaChallenge {
    pub fn flagship(&self) -> Option<Pubkey> {
        (self.vault != Pubkey::default()).then_some(self.vault)
    }
}

impl AccountRecord for MegaChallenge {
    const KIND: AccountKind = AccountKind::MegaChallenge;

    fn read(reader: &mut AccountReader<'_>) -> Result<Self> {
        Ok(Self {
            authority: reader.read_pubkey()?,
            vault: reader.read_pubkey()?,
            bump: reader.read_u8()?,
        })
    }
}
