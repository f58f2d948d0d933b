//! Hash commitments binding a hidden choice to its owner and to one contract instance.

use cosmwasm_std::{Binary, Timestamp};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::game::Choice;

const DOMAIN: &[u8] = b"rps-commit";
const PLAIN: u8 = 0;
const MASKED: u8 = 1;

/// Reasons a commitment cannot be generated.
#[derive(Error, Debug, PartialEq)]
pub enum CommitError {
    #[error("Invalid choice")]
    InvalidChoice,
    #[error("Mask can not be empty")]
    EmptyMask,
    #[error("Invalid mask timestamp {timestamp}")]
    InvalidTimestamp { timestamp: Timestamp },
}

/// Commits to `choice` under `mask` for `committer`.
pub fn commit(
    choice: Choice,
    mask: &[u8],
    committer: &str,
    namespace: &str,
) -> Result<Binary, CommitError> {
    validate(choice, mask)?;
    Ok(digest(choice, mask, committer, None, namespace))
}

/// Like [`commit`], with the time the mask was drawn mixed in.
///
/// `timestamp` must be non-zero and not later than `now`.
pub fn masked_commit(
    choice: Choice,
    mask: &[u8],
    committer: &str,
    timestamp: Timestamp,
    now: Timestamp,
    namespace: &str,
) -> Result<Binary, CommitError> {
    validate(choice, mask)?;
    if timestamp.nanos() == 0 || timestamp > now {
        return Err(CommitError::InvalidTimestamp { timestamp });
    }
    Ok(digest(choice, mask, committer, Some(timestamp), namespace))
}

/// Checks that `commitment` opens to exactly these values.
pub fn verify(
    commitment: &[u8],
    choice: Choice,
    mask: &[u8],
    committer: &str,
    timestamp: Timestamp,
    namespace: &str,
) -> bool {
    if choice.is_none() || is_empty(mask) || is_empty(commitment) {
        return false;
    }
    digest(choice, mask, committer, Some(timestamp), namespace).as_slice() == commitment
}

/// Zero-length and all-zero byte strings both count as empty.
pub fn is_empty(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == 0)
}

/// Order independent key identifying a pair of players.
pub fn pair_key(a: &str, b: &str) -> Binary {
    let a = Sha256::digest(a.as_bytes());
    let b = Sha256::digest(b.as_bytes());
    let key: Vec<u8> = a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect();
    Binary::from(key)
}

fn validate(choice: Choice, mask: &[u8]) -> Result<(), CommitError> {
    if choice.is_none() {
        return Err(CommitError::InvalidChoice);
    }
    if is_empty(mask) {
        return Err(CommitError::EmptyMask);
    }
    Ok(())
}

fn digest(
    choice: Choice,
    mask: &[u8],
    committer: &str,
    timestamp: Option<Timestamp>,
    namespace: &str,
) -> Binary {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN);
    hasher.update([choice.code()]);
    update_prefixed(&mut hasher, mask);
    update_prefixed(&mut hasher, committer.as_bytes());
    match timestamp {
        Some(timestamp) => {
            hasher.update([MASKED]);
            hasher.update(timestamp.nanos().to_be_bytes());
        }
        None => hasher.update([PLAIN]),
    }
    update_prefixed(&mut hasher, namespace.as_bytes());
    Binary::from(hasher.finalize().to_vec())
}

fn update_prefixed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u32).to_be_bytes());
    hasher.update(bytes);
}
