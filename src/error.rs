use crate::commit::CommitError;
use cosmwasm_std::{Addr, StdError, Timestamp, Uint128};
use thiserror::Error;

/// Broad class of a [`ContractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input.
    Validation,
    /// The sender has no role in the requested operation.
    Authorization,
    /// The operation does not fit the current state of the game.
    State,
    /// A reveal does not open the stored commitment.
    Consistency,
    /// Nothing to pay out.
    NoFunds,
    /// Storage or serialization failure.
    Std,
}

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    StdError(#[from] StdError),
    #[error("{0}")]
    CommitError(#[from] CommitError),
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
    #[error("Only {denom} can be staked, got {got}")]
    InvalidDenom { denom: String, got: String },
    #[error("Both players have the same address {player}")]
    SamePlayers { player: Addr },
    #[error("Commitment can not be empty")]
    EmptyCommitment,
    #[error("Game lifetime {lifetime}s is outside [{min}s, {max}s]")]
    LifetimeOutOfBounds { lifetime: u64, min: u64, max: u64 },
    #[error("Stake {stake} is below the minimum of {min}")]
    StakeBelowMinimum { stake: Uint128, min: Uint128 },
    #[error("Stake {stake} is below the {required} required by game {game_id}")]
    StakeBelowRequired {
        game_id: u64,
        stake: Uint128,
        required: Uint128,
    },
    #[error("Insufficient funds to stake {required}, {available} available")]
    InsufficientFunds {
        required: Uint128,
        available: Uint128,
    },
    #[error("{sender} is not the counterparty of game {game_id}")]
    NotCounterparty { game_id: u64, sender: Addr },
    #[error("{sender} is not a player of game {game_id}")]
    NotPlayer { game_id: u64, sender: Addr },
    #[error("Game {game_id} does not exist or has finished")]
    GameNotFound { game_id: u64 },
    #[error("Game {game_id} expired at {deadline}")]
    GameExpired { game_id: u64, deadline: Timestamp },
    #[error("Game {game_id} has not expired yet, deadline is {deadline}")]
    NotExpired { game_id: u64, deadline: Timestamp },
    #[error("Game {game_id} already has a second player")]
    AlreadyEnrolled { game_id: u64 },
    #[error("No second player has enrolled in game {game_id}")]
    NotEnrolled { game_id: u64 },
    #[error("{player} already revealed in game {game_id}")]
    AlreadyRevealed { game_id: u64, player: Addr },
    #[error("Revealed values do not match the commitment of {player} in game {game_id}")]
    RevealMismatch { game_id: u64, player: Addr },
    #[error("There are no funds to pay out to {payee}")]
    NoFunds { payee: Addr },
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StdError(_) => ErrorKind::Std,
            Self::CommitError(_)
            | Self::InvalidConfig { .. }
            | Self::InvalidDenom { .. }
            | Self::SamePlayers { .. }
            | Self::EmptyCommitment
            | Self::LifetimeOutOfBounds { .. }
            | Self::StakeBelowMinimum { .. }
            | Self::StakeBelowRequired { .. }
            | Self::InsufficientFunds { .. } => ErrorKind::Validation,
            Self::NotCounterparty { .. } | Self::NotPlayer { .. } => ErrorKind::Authorization,
            Self::GameNotFound { .. }
            | Self::GameExpired { .. }
            | Self::NotExpired { .. }
            | Self::AlreadyEnrolled { .. }
            | Self::NotEnrolled { .. }
            | Self::AlreadyRevealed { .. } => ErrorKind::State,
            Self::RevealMismatch { .. } => ErrorKind::Consistency,
            Self::NoFunds { .. } => ErrorKind::NoFunds,
        }
    }
}
