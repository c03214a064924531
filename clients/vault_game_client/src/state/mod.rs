//! Decoders for the accounts written by the vault game program.
//!
//! Every account is an 8-byte discriminator followed by fixed-width fields.
//! There are no encoders here: only the program writes these accounts.

use std::fmt;

pub mod global_state;
pub mod mega_challenge;
pub mod player_profile;
pub mod reader;
pub mod vault;

pub use global_state::*;
pub use mega_challenge::*;
pub use player_profile::*;
pub use reader::AccountReader;
pub use vault::*;

use crate::constants::{
    DISCRIMINATOR_LEN, GLOBAL_STATE_LEN, MEGA_CHALLENGE_LEN, PLAYER_PROFILE_LEN, VAULT_LEN,
};
use crate::discriminator::account_discriminator;
use crate::errors::{Result, VaultClientError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    GlobalState,
    Vault,
    PlayerProfile,
    MegaChallenge,
}

impl AccountKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            AccountKind::GlobalState => "GlobalState",
            AccountKind::Vault => "Vault",
            AccountKind::PlayerProfile => "PlayerProfile",
            AccountKind::MegaChallenge => "MegaChallenge",
        }
    }

    /// Minimum number of bytes a record of this kind occupies.
    pub fn size(&self) -> usize {
        match self {
            AccountKind::GlobalState => GLOBAL_STATE_LEN,
            AccountKind::Vault => VAULT_LEN,
            AccountKind::PlayerProfile => PLAYER_PROFILE_LEN,
            AccountKind::MegaChallenge => MEGA_CHALLENGE_LEN,
        }
    }

    pub fn discriminator(&self) -> [u8; DISCRIMINATOR_LEN] {
        account_discriminator(self.type_name())
    }

    pub fn check_discriminator(&self, data: &[u8]) -> Result<()> {
        match data.get(..DISCRIMINATOR_LEN) {
            Some(prefix) if prefix == self.discriminator() => Ok(()),
            Some(_) => Err(VaultClientError::DiscriminatorMismatch { kind: *self }),
            None => Err(VaultClientError::AccountTooShort {
                kind: *self,
                expected: self.size(),
                actual: data.len(),
            }),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

pub trait AccountRecord: Sized + Clone + PartialEq + Send + Sync + 'static {
    const KIND: AccountKind;

    /// Reads the fields that follow the discriminator.
    fn read(reader: &mut AccountReader<'_>) -> Result<Self>;

    /// Decodes without looking at the discriminator.
    ///
    /// `data` must be at least the record's fixed width. Longer buffers are
    /// accepted and the bytes past the last field are never inspected, in
    /// this method or in [`AccountRecord::decode_checked`], so a record that
    /// has grown on chain still decodes.
    fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = AccountReader::new(Self::KIND, data)?;
        Self::read(&mut reader)
    }

    fn decode_checked(data: &[u8]) -> Result<Self> {
        Self::KIND.check_discriminator(data)?;
        Self::decode(data)
    }

    fn decode_with(data: &[u8], strict: bool) -> Result<Self> {
        if strict {
            Self::decode_checked(data)
        } else {
            Self::decode(data)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountData {
    GlobalState(GlobalState),
    Vault(Vault),
    PlayerProfile(PlayerProfile),
    MegaChallenge(MegaChallenge),
}

pub fn decode_account(kind: AccountKind, data: &[u8]) -> Result<AccountData> {
    Ok(match kind {
        AccountKind::GlobalState => AccountData::GlobalState(GlobalState::decode(data)?),
        AccountKind::Vault => AccountData::Vault(Vault::decode(data)?),
        AccountKind::PlayerProfile => AccountData::PlayerProfile(PlayerProfile::decode(data)?),
        AccountKind::MegaChallenge => AccountData::MegaChallenge(MegaChallenge::decode(data)?),
    })
}
