use anchor_lang::prelude::*;
use solana_program::{instruction::Instruction, system_program};

use super::build_instruction;
use crate::constants::IX_TOUCH_PLAYER;
use crate::discriminator::discriminator;
use crate::errors::Result;
use crate::pda::player_profile_address;

/// Creates the caller's profile on first use and refreshes `last_seen_ts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchPlayer {
    pub player_profile: Pubkey,
    pub player: Pubkey,
    pub system_program: Pubkey,
}

impl TouchPlayer {
    pub fn new(program_id: &Pubkey, player: &Pubkey) -> Result<Self> {
        Ok(Self {
            player_profile: player_profile_address(program_id, player)?,
            player: *player,
            system_program: system_program::ID,
        })
    }
}

impl ToAccountMetas for TouchPlayer {
    fn to_account_metas(&self, is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.player_profile, false),
            AccountMeta::new(self.player, is_signer.unwrap_or(true)),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

pub fn touch_player(program_id: &Pubkey, player: &Pubkey) -> Result<Instruction> {
    let accounts = TouchPlayer::new(program_id, player)?;
    Ok(build_instruction(
        program_id,
        &accounts,
        discriminator(IX_TOUCH_PLAYER).to_vec(),
    ))
}
