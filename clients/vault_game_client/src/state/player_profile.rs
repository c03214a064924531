use anchor_lang::prelude::Pubkey;

use super::{AccountKind, AccountReader, AccountRecord};
use crate::errors::Result;
use crate::utils::rank::{rank_for_score, RankTier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub authority: Pubkey,
    pub attempts: u64,
    pub wins: u64,
    pub vaults_created: u64,
    pub score: u64,
    pub last_seen_ts: i64,
    pub bump: u8,
}

impl PlayerProfile {
    pub fn rank(&self) -> RankTier {
        rank_for_score(self.score)
    }
}

impl AccountRecord for PlayerProfile {
    const KIND: AccountKind = AccountKind::PlayerProfile;

    fn read(reader: &mut AccountReader<'_>) -> Result<Self> {
        Ok(Self {
            authority: reader.read_pubkey()?,
            attempts: reader.read_u64()?,
            wins: reader.read_u64()?,
            vaults_created: reader.read_u64()?,
            score: reader.read_u64()?,
            last_seen_ts: reader.read_i64()?,
            bump: reader.read_u8()?,
        })
    }
}
