use anchor_lang::prelude::Pubkey;

use super::AccountKind;
use crate::constants::{DISCRIMINATOR_LEN, PUBKEY_LEN};
use crate::errors::{Result, VaultClientError};

/// Forward-only cursor over a fixed-layout account, positioned just past
/// the discriminator.
pub struct AccountReader<'a> {
    kind: AccountKind,
    data: &'a [u8],
    offset: usize,
}

impl<'a> AccountReader<'a> {
    /// Fails up front when `data` cannot hold a whole record, so a record is
    /// either fully read or not read at all.
    pub fn new(kind: AccountKind, data: &'a [u8]) -> Result<Self> {
        if data.len() < kind.size() {
            return Err(VaultClientError::AccountTooShort {
                kind,
                expected: kind.size(),
                actual: data.len(),
            });
        }
        Ok(Self {
            kind,
            data,
            offset: DISCRIMINATOR_LEN,
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.offset + N;
        let bytes = self
            .data
            .get(self.offset..end)
            .ok_or(VaultClientError::AccountTooShort {
                kind: self.kind,
                expected: end,
                actual: self.data.len(),
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.offset = end;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    /// Zero is false; every other byte is true.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take()?))
    }

    pub fn read_bytes32(&mut self) -> Result<[u8; 32]> {
        self.take()
    }

    pub fn read_pubkey(&mut self) -> Result<Pubkey> {
        Ok(Pubkey::new_from_array(self.take::<PUBKEY_LEN>()?))
    }

    // Optional fields reserve their payload width whether or not the tag is
    // set, so the payload is always consumed.

    pub fn read_padded_option_pubkey(&mut self) -> Result<Option<Pubkey>> {
        let present = self.read_bool()?;
        let value = self.read_pubkey()?;
        Ok(present.then_some(value))
    }

    pub fn read_padded_option_i64(&mut self) -> Result<Option<i64>> {
        let present = self.read_bool()?;
        let value = self.read_i64()?;
        Ok(present.then_some(value))
    }
}
