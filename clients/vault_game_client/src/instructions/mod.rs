//! Builders for the program's instructions.
//!
//! Each call pairs an accounts struct, whose field order is the order the
//! program expects, with `discriminator ++ borsh(args)` instruction data.
//! Nothing here touches the network.

use anchor_lang::prelude::*;
use solana_program::instruction::Instruction;

use crate::discriminator::discriminator;
use crate::errors::Result;

pub mod create_vault;
pub mod initialize_global;
pub mod set_mega_challenge_vault;
pub mod touch_player;

pub use create_vault::*;
pub use initialize_global::*;
pub use set_mega_challenge_vault::*;
pub use touch_player::*;

fn instruction_data<A: AnchorSerialize>(ix_name: &str, args: &A) -> Result<Vec<u8>> {
    let mut data = discriminator(ix_name).to_vec();
    args.serialize(&mut data)?;
    Ok(data)
}

fn build_instruction(
    program_id: &Pubkey,
    accounts: &impl ToAccountMetas,
    data: Vec<u8>,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data,
    }
}
