use std::time::Duration;

pub const GLOBAL_SEED: &[u8] = b"global";
pub const MEGA_VAULT_SEED: &[u8] = b"mega_vault";
pub const MEGA_CHALLENGE_SEED: &[u8] = b"mega_challenge";
pub const VAULT_SEED: &[u8] = b"vault";
pub const PLAYER_SEED: &[u8] = b"player";

pub const DISCRIMINATOR_LEN: usize = 8;
pub const PUBKEY_LEN: usize = 32;

// Fixed account widths, discriminator included.
pub const GLOBAL_STATE_LEN: usize = DISCRIMINATOR_LEN + 32 + 32 + 8 + 1;
pub const VAULT_LEN: usize = DISCRIMINATOR_LEN
    + 32 // creator
    + 1 // status
    + 8 + 8 // created_at, end_ts
    + 32 // secret_hash
    + 8 // vault_id
    + 8 + 8 + 8 // prize, starting fee, current fee
    + 8 // attempt_count
    + 1 // is_sol_fee
    + 32 // fee_mint
    + 8 + 8 // total_fees_collected, winner_fee_pool
    + (1 + 32) // winner
    + (1 + 8) // settled_at
    + 1 // paid_out
    + 1; // bump
pub const PLAYER_PROFILE_LEN: usize = DISCRIMINATOR_LEN + 32 + 8 * 4 + 8 + 1;
pub const MEGA_CHALLENGE_LEN: usize = DISCRIMINATOR_LEN + 32 + 32 + 1;

pub const IX_INITIALIZE_GLOBAL: &str = "initialize_global";
pub const IX_CREATE_VAULT: &str = "create_vault";
pub const IX_TOUCH_PLAYER: &str = "touch_player";
pub const IX_SET_MEGA_CHALLENGE_VAULT: &str = "set_mega_challenge_vault";

/// Fragments of the program log naming the guess instruction
/// (`Instruction: MakeGuess`, `make_guess_sol`, ...). Compared lower-cased.
pub const GUESS_LOG_MARKERS: [&str; 2] = ["makeguess", "make_guess"];

pub const FEE_HISTORY_LEN: usize = 30;
pub const ACTIVITY_LEN: usize = 24;
pub const BACKFILL_SIGNATURE_LIMIT: usize = 10;
/// Signatures remembered by the activity de-dup gate.
pub const SEEN_SIGNATURE_CAPACITY: usize = 4096;
pub const PROFILE_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub const STANDARD_PIN_MIN_LEN: usize = 3;
pub const STANDARD_PIN_MAX_LEN: usize = 6;
pub const FLAGSHIP_PIN_LEN: usize = 8;
