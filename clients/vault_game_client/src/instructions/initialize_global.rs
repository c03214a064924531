use anchor_lang::prelude::*;
use solana_program::{instruction::Instruction, system_program};

use super::{build_instruction, instruction_data};
use crate::constants::IX_INITIALIZE_GLOBAL;
use crate::errors::Result;
use crate::pda::{global_state_address, mega_vault_address};

#[derive(AnchorSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitializeGlobalArgs {
    pub mint: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeGlobal {
    pub global_state: Pubkey,
    pub mega_vault: Pubkey,
    pub authority: Pubkey,
    pub system_program: Pubkey,
}

impl InitializeGlobal {
    pub fn new(program_id: &Pubkey, authority: &Pubkey) -> Result<Self> {
        Ok(Self {
            global_state: global_state_address(program_id)?,
            mega_vault: mega_vault_address(program_id)?,
            authority: *authority,
            system_program: system_program::ID,
        })
    }
}

impl ToAccountMetas for InitializeGlobal {
    fn to_account_metas(&self, is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.global_state, false),
            AccountMeta::new(self.mega_vault, false),
            AccountMeta::new(self.authority, is_signer.unwrap_or(true)),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

pub fn initialize_global(program_id: &Pubkey, authority: &Pubkey, mint: &Pubkey) -> Result<Instruction> {
    let accounts = InitializeGlobal::new(program_id, authority)?;
    let data = instruction_data(IX_INITIALIZE_GLOBAL, &InitializeGlobalArgs { mint: *mint })?;
    Ok(build_instruction(program_id, &accounts, data))
}
