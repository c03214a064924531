use anchor_lang::prelude::*;
use anchor_spl::{associated_token, token};
use solana_program::{instruction::Instruction, system_program};

use super::{build_instruction, instruction_data};
use crate::constants::IX_CREATE_VAULT;
use crate::errors::Result;
use crate::pda::{
    associated_token_address, global_state_address, mega_vault_address, player_profile_address,
    vault_address,
};

/// Wire arguments of `create_vault`.
#[derive(AnchorSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateVaultArgs {
    pub end_ts: i64,
    pub secret_hash: [u8; 32],
    pub prize_amount: u64,
    pub base_fee_amount: u64,
    pub pin_len: u8,
    // Always `Some` from this client; see `create_vault`.
    pub fee_mint: Option<Pubkey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVault {
    pub global_state: Pubkey,
    pub mega_vault: Pubkey,
    pub vault: Pubkey,
    pub player_profile: Pubkey,
    pub fee_mint: Pubkey,
    pub creator_fee_token_account: Pubkey,
    pub vault_fee_token_account: Pubkey,
    pub vault_prize_token_account: Pubkey,
    pub mega_vault_fee_token_account: Pubkey,
    pub creator: Pubkey,
    pub token_program: Pubkey,
    pub associated_token_program: Pubkey,
    pub system_program: Pubkey,
}

impl CreateVault {
    /// `vault_count` must be the value currently stored in global state: the
    /// new vault is seeded with it.
    pub fn new(
        program_id: &Pubkey,
        creator: &Pubkey,
        vault_count: u64,
        fee_mint: &Pubkey,
    ) -> Result<Self> {
        let mega_vault = mega_vault_address(program_id)?;
        let vault = vault_address(program_id, vault_count)?;
        // Fees and prize share the vault's token account for the fee mint.
        let vault_token_account = associated_token_address(&vault, fee_mint)?;
        Ok(Self {
            global_state: global_state_address(program_id)?,
            mega_vault,
            vault,
            player_profile: player_profile_address(program_id, creator)?,
            fee_mint: *fee_mint,
            creator_fee_token_account: associated_token_address(creator, fee_mint)?,
            vault_fee_token_account: vault_token_account,
            vault_prize_token_account: vault_token_account,
            mega_vault_fee_token_account: associated_token_address(&mega_vault, fee_mint)?,
            creator: *creator,
            token_program: token::ID,
            associated_token_program: associated_token::ID,
            system_program: system_program::ID,
        })
    }
}

impl ToAccountMetas for CreateVault {
    fn to_account_metas(&self, is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.global_state, false),
            AccountMeta::new(self.mega_vault, false),
            AccountMeta::new(self.vault, false),
            AccountMeta::new(self.player_profile, false),
            AccountMeta::new_readonly(self.fee_mint, false),
            AccountMeta::new(self.creator_fee_token_account, false),
            AccountMeta::new(self.vault_fee_token_account, false),
            AccountMeta::new(self.vault_prize_token_account, false),
            AccountMeta::new(self.mega_vault_fee_token_account, false),
            AccountMeta::new(self.creator, is_signer.unwrap_or(true)),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.associated_token_program, false),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

/// Parameters of a new vault, as chosen by its creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultTerms {
    pub end_ts: i64,
    pub secret_hash: [u8; 32],
    pub prize_amount: u64,
    pub base_fee_amount: u64,
    pub pin_len: u8,
    pub fee_mint: Pubkey,
}

/// The fee mint is always encoded as present. Whether the program accepts
/// an absent fee mint is unconfirmed, so this client never sends one.
pub fn create_vault(
    program_id: &Pubkey,
    creator: &Pubkey,
    vault_count: u64,
    terms: &VaultTerms,
) -> Result<Instruction> {
    let accounts = CreateVault::new(program_id, creator, vault_count, &terms.fee_mint)?;
    let args = CreateVaultArgs {
        end_ts: terms.end_ts,
        secret_hash: terms.secret_hash,
        prize_amount: terms.prize_amount,
        base_fee_amount: terms.base_fee_amount,
        pin_len: terms.pin_len,
        fee_mint: Some(terms.fee_mint),
    };
    let data = instruction_data(IX_CREATE_VAULT, &args)?;
    Ok(build_instruction(program_id, &accounts, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discriminator::discriminator;
    use crate::state::vault::fixtures::{sample_vault, vault_bytes};
    use crate::state::{AccountRecord, Vault};

    fn terms(fee_mint: Pubkey) -> VaultTerms {
        VaultTerms {
            end_ts: 1000,
            secret_hash: [0; 32],
            prize_amount: 500_000_000_000,
            base_fee_amount: 1_000_000,
            pin_len: 8,
            fee_mint,
        }
    }

    #[test]
    fn payload_layout() {
        let fee_mint = Pubkey::new_unique();
        let ix = create_vault(&crate::ID, &Pubkey::new_unique(), 0, &terms(fee_mint)).unwrap();
        let data = &ix.data;

        assert_eq!(data.len(), 98);
        assert_eq!(data[..8], discriminator("create_vault"));
        assert_eq!(data[8..16], 1000i64.to_le_bytes());
        assert_eq!(data[16..48], [0u8; 32]);
        assert_eq!(data[48..56], 500_000_000_000u64.to_le_bytes());
        assert_eq!(data[56..64], 1_000_000u64.to_le_bytes());
        assert_eq!(data[64], 8);
        assert_eq!(data[65], 1);
        assert_eq!(data[66..98], fee_mint.to_bytes());
    }

    #[test]
    fn account_order_and_flags() {
        let creator = Pubkey::new_unique();
        let fee_mint = Pubkey::new_unique();
        let ix = create_vault(&crate::ID, &creator, 5, &terms(fee_mint)).unwrap();
        let vault = vault_address(&crate::ID, 5).unwrap();
        let mega_vault = mega_vault_address(&crate::ID).unwrap();

        let keys: Vec<Pubkey> = ix.accounts.iter().map(|meta| meta.pubkey).collect();
        assert_eq!(
            keys,
            vec![
                global_state_address(&crate::ID).unwrap(),
                mega_vault,
                vault,
                player_profile_address(&crate::ID, &creator).unwrap(),
                fee_mint,
                associated_token::get_associated_token_address(&creator, &fee_mint),
                associated_token::get_associated_token_address(&vault, &fee_mint),
                associated_token::get_associated_token_address(&vault, &fee_mint),
                associated_token::get_associated_token_address(&mega_vault, &fee_mint),
                creator,
                token::ID,
                associated_token::ID,
                system_program::ID,
            ]
        );

        let signers: Vec<usize> = (0..ix.accounts.len())
            .filter(|&i| ix.accounts[i].is_signer)
            .collect();
        assert_eq!(signers, vec![9]);
        assert!(ix.accounts[9].is_writable);
        assert!(!ix.accounts[4].is_writable);
        assert!(ix.accounts[10..].iter().all(|meta| !meta.is_writable));
    }

    #[test]
    fn vault_id_survives_creation_and_decode() {
        let vault_count = 17;
        let ix = create_vault(&crate::ID, &Pubkey::new_unique(), vault_count, &terms(Pubkey::new_unique()))
            .unwrap();
        assert_eq!(ix.accounts[2].pubkey, vault_address(&crate::ID, vault_count).unwrap());

        let record = vault_bytes(&sample_vault(vault_count));
        assert_eq!(Vault::decode(&record).unwrap().vault_id, vault_count);
    }
}
