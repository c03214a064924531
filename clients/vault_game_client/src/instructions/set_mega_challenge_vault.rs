use anchor_lang::prelude::*;
use solana_program::{instruction::Instruction, system_program};

use super::{build_instruction, instruction_data};
use crate::constants::IX_SET_MEGA_CHALLENGE_VAULT;
use crate::errors::Result;
use crate::pda::{global_state_address, mega_challenge_address};

#[derive(AnchorSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetMegaChallengeVaultArgs {
    pub vault: Pubkey,
}

/// Admin-only: points the flagship at `vault`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetMegaChallengeVault {
    pub global_state: Pubkey,
    pub mega_challenge: Pubkey,
    pub authority: Pubkey,
    pub system_program: Pubkey,
}

impl SetMegaChallengeVault {
    pub fn new(program_id: &Pubkey, authority: &Pubkey) -> Result<Self> {
        Ok(Self {
            global_state: global_state_address(program_id)?,
            mega_challenge: mega_challenge_address(program_id)?,
            authority: *authority,
            system_program: system_program::ID,
        })
    }
}

impl ToAccountMetas for SetMegaChallengeVault {
    fn to_account_metas(&self, is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.global_state, false),
            AccountMeta::new(self.mega_challenge, false),
            AccountMeta::new(self.authority, is_signer.unwrap_or(true)),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

pub fn set_mega_challenge_vault(
    program_id: &Pubkey,
    authority: &Pubkey,
    vault: &Pubkey,
) -> Result<Instruction> {
    let accounts = SetMegaChallengeVault::new(program_id, authority)?;
    let data = instruction_data(
        IX_SET_MEGA_CHALLENGE_VAULT,
        &SetMegaChallengeVaultArgs { vault: *vault },
    )?;
    Ok(build_instruction(program_id, &accounts, data))
}
