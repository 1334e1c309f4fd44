//! State digests for replay verification.
//!
//! Two runs fed the same seed, content and player inputs must produce the same
//! sequence of digests. Comparing digests is cheaper than comparing states and
//! lets a recorded battle be checked step by step.

use sha2::{Digest, Sha256};

use crate::combat::BattleState;

/// SHA-256 over the bincode encoding of `state`.
pub fn state_digest(state: &BattleState) -> [u8; 32] {
    let mut hasher = Sha256::new();
    // bincode's encoding of these types is deterministic: maps and sets are
    // BTree-ordered and there are no floats in the state.
    match bincode::serialize(state) {
        Ok(bytes) => hasher.update(&bytes),
        Err(err) => tracing::warn!(
            version = state.version,
            error = %err,
            "state encoding failed, digest covers no state bytes"
        ),
    }
    hasher.finalize().into()
}

impl BattleState {
    pub fn digest(&self) -> [u8; 32] {
        state_digest(self)
    }
}

/// Digest over a sequence of states, in order.
pub fn transcript_digest<'a, I>(states: I) -> [u8; 32]
where
    I: IntoIterator<Item = &'a BattleState>,
{
    let mut hasher = Sha256::new();
    for state in states {
        hasher.update(state_digest(state));
    }
    hasher.finalize().into()
}
