pub mod rank;
pub mod secret;
pub mod time;

pub use rank::{rank_for_score, RankTier};
pub use secret::{clamp_pin_len, seal_secret, starting_fee_preview, validate_pin};
pub use time::{format_duration, unix_now};
