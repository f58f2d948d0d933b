use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Timestamp, Uint128};

use crate::{
    game::{Choice, Game, GameStatus, Move},
    state::Config,
};

#[cw_serde]
pub struct InstantiateMsg {
    /// The coin accepted as stake.
    pub denom: String,
    pub min_stake: Option<Uint128>,
    /// Shortest game lifetime, in seconds.
    pub min_lifetime: Option<u64>,
    /// Longest game lifetime, in seconds.
    pub max_lifetime: Option<u64>,
    /// Seconds granted to reveal after a late enrolment.
    pub post_commit_wait_window: Option<u64>,
    /// Instance id mixed into commitments. Defaults to the contract address.
    pub namespace: Option<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Open a game against `counterparty` and commit to a choice.
    ///
    /// Attached funds above `stake` are credited to the sender's winnings.
    Create {
        counterparty: String,
        commitment: Binary,
        /// Seconds until the deadline.
        lifetime: u64,
        stake: Uint128,
        /// Cover a shortfall of attached funds from the sender's winnings.
        #[serde(default)]
        stake_from_winnings: bool,
    },
    /// Join a game as its counterparty and commit to a choice.
    Enrol {
        game_id: u64,
        commitment: Binary,
        stake: Uint128,
        #[serde(default)]
        stake_from_winnings: bool,
    },
    /// Open a commitment.
    Reveal {
        game_id: u64,
        choice: Choice,
        mask: Binary,
        /// Timestamp the commitment was generated with.
        timestamp: Timestamp,
    },
    /// Resolve an expired game. Anyone may call it.
    Settle { game_id: u64 },
    /// Withdraw the whole winnings balance of the sender.
    Payout {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(GameResponse)]
    Game { game_id: u64 },
    #[returns(Move)]
    Move { game_id: u64, player: String },
    #[returns(WinningsResponse)]
    Winnings { player: String },
    /// Live games in ascending id order.
    #[returns(ActiveGamesResponse)]
    ActiveGames {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Commitment without a timestamp.
    #[returns(CommitmentResponse)]
    GenerateChoice {
        choice: Choice,
        mask: Binary,
        committer: String,
    },
    /// Commitment as checked by `Reveal`. `timestamp` can not be later than the current block.
    #[returns(CommitmentResponse)]
    GenerateMaskedChoice {
        choice: Choice,
        mask: Binary,
        committer: String,
        timestamp: Timestamp,
    },
}

#[cw_serde]
pub struct GameResponse {
    pub game_id: u64,
    pub status: GameStatus,
    /// `None` once the game is finished.
    pub game: Option<Game>,
}

#[cw_serde]
pub struct WinningsResponse {
    pub balance: Uint128,
}

#[cw_serde]
pub struct ActiveGamesResponse {
    pub games: Vec<GameResponse>,
}

#[cw_serde]
pub struct CommitmentResponse {
    pub commitment: Binary,
}
