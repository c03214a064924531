//! 8-byte routing prefixes: sha256 of a namespaced name, truncated.
//!
//! Instruction data starts with `sha256("global:" + name)[..8]`, account data
//! with `sha256("account:" + TypeName)[..8]`. Program logs name instructions
//! in human-readable form instead; see [`crate::activity`] for that path.

use solana_program::hash::hash;

use crate::constants::DISCRIMINATOR_LEN;

pub fn discriminator(ix_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    namespaced("global", ix_name)
}

pub fn account_discriminator(type_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    namespaced("account", type_name)
}

fn namespaced(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let preimage = format!("{namespace}:{name}");
    let digest = hash(preimage.as_bytes());
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest.to_bytes()[..DISCRIMINATOR_LEN]);
    out
}
