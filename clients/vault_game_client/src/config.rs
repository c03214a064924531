use std::str::FromStr;
use std::time::Duration;

use anchor_lang::prelude::Pubkey;
use serde::{Deserialize, Deserializer};

use crate::constants::{
    ACTIVITY_LEN, BACKFILL_SIGNATURE_LIMIT, FEE_HISTORY_LEN, PROFILE_POLL_INTERVAL,
};
use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Program that owns every account this client reads or writes.
    #[serde(deserialize_with = "pubkey_from_str")]
    pub program_id: Pubkey,
    /// Samples kept per watched account.
    pub fee_history_len: usize,
    /// Entries kept in the recent-activity list.
    pub activity_len: usize,
    /// Signatures fetched once at startup by the activity feed.
    pub backfill_limit: usize,
    pub profile_poll_interval_ms: u64,
    /// Reject accounts whose leading 8 bytes are not the expected
    /// discriminator instead of trusting the caller.
    pub strict_discriminators: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program_id: crate::ID,
            fee_history_len: FEE_HISTORY_LEN,
            activity_len: ACTIVITY_LEN,
            backfill_limit: BACKFILL_SIGNATURE_LIMIT,
            profile_poll_interval_ms: PROFILE_POLL_INTERVAL.as_millis() as u64,
            strict_discriminators: false,
        }
    }
}

impl ClientConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn profile_poll_interval(&self) -> Duration {
        Duration::from_millis(self.profile_poll_interval_ms.max(1))
    }
}

fn pubkey_from_str<'de, D>(deserializer: D) -> std::result::Result<Pubkey, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    Pubkey::from_str(&text).map_err(serde::de::Error::custom)
}
