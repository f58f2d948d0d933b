use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128};

/// A hand in the game. `None` is the unset value and can never be committed.
#[cw_serde]
#[derive(Copy)]
pub enum Choice {
    None,
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    /// Wire encoding used by the commitment hash and the outcome function.
    pub fn code(self) -> u8 {
        match self {
            Choice::None => 0,
            Choice::Rock => 1,
            Choice::Paper => 2,
            Choice::Scissors => 3,
        }
    }

    pub fn is_none(self) -> bool {
        self == Choice::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Choice::None => "none",
            Choice::Rock => "rock",
            Choice::Paper => "paper",
            Choice::Scissors => "scissors",
        }
    }
}

/// Result of a round, seen from the first argument of [`outcome`].
#[cw_serde]
#[derive(Copy)]
pub enum Outcome {
    Tie,
    FirstWins,
    SecondWins,
}

/// Resolves two revealed choices.
///
/// With rock, paper and scissors encoded as 1, 2 and 3, `(a + 3 - b) % 3` is 0 on a tie,
/// 1 when `a` beats `b` and 2 when `b` beats `a`. Every choice beats exactly one other.
pub fn outcome(a: Choice, b: Choice) -> Outcome {
    match (a.code() + 3 - b.code()) % 3 {
        0 => Outcome::Tie,
        1 => Outcome::FirstWins,
        _ => Outcome::SecondWins,
    }
}

/// Lifecycle of a game as observed at a given block time.
#[cw_serde]
#[derive(Copy)]
pub enum GameStatus {
    /// Only the creator has committed.
    Created,
    /// Both players committed, nothing revealed.
    Enrolled,
    /// One of the two players revealed.
    PartiallyRevealed,
    /// The deadline passed and the game waits for `settle`.
    Expired,
    /// The game was resolved and erased.
    Finished,
}

/// A live game. Erased from storage as soon as it is resolved.
#[cw_serde]
pub struct Game {
    pub player_one: Addr,
    /// The counterparty designated by the creator.
    pub counterparty: Addr,
    /// Set once the counterparty enrolled.
    pub player_two: Option<Addr>,
    /// Required stake per player.
    pub stake: Uint128,
    /// Value currently escrowed by this game.
    pub pooled: Uint128,
    pub deadline: Timestamp,
    pub last_commit_deadline: Timestamp,
    pub pair_key: Binary,
}

impl Game {
    pub fn is_enrolled(&self) -> bool {
        self.player_two.is_some()
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.deadline
    }

    /// The player facing `player`, if `player` takes part in this game.
    pub fn opponent_of(&self, player: &Addr) -> Option<&Addr> {
        if *player == self.player_one {
            Some(&self.counterparty)
        } else if *player == self.counterparty {
            Some(&self.player_one)
        } else {
            None
        }
    }

    pub fn status(&self, revealed: usize, now: Timestamp) -> GameStatus {
        if self.is_expired(now) {
            GameStatus::Expired
        } else if !self.is_enrolled() {
            GameStatus::Created
        } else if revealed == 0 {
            GameStatus::Enrolled
        } else {
            GameStatus::PartiallyRevealed
        }
    }
}

/// A player's commitment, and its opening once revealed.
#[cw_serde]
pub struct Move {
    pub commitment: Binary,
    pub choice: Choice,
    pub revealed: bool,
}

impl Move {
    pub fn committed(commitment: Binary) -> Self {
        Move {
            commitment,
            choice: Choice::None,
            revealed: false,
        }
    }
}

impl Default for Move {
    fn default() -> Self {
        Move {
            commitment: Binary::default(),
            choice: Choice::None,
            revealed: false,
        }
    }
}
