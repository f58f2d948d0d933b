use crate::game::{Game, Move};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

/// Parameters fixed at instantiation.
#[cw_serde]
pub struct Config {
    /// The coin accepted as stake.
    pub denom: String,
    pub min_stake: Uint128,
    /// Bounds of a game lifetime, in seconds.
    pub min_lifetime: u64,
    pub max_lifetime: u64,
    /// Seconds added to the deadline when a player enrols late.
    pub post_commit_wait_window: u64,
    /// Mixed into every commitment so it can not be replayed on another instance.
    pub namespace: String,
}

pub const CONFIG: Item<Config> = Item::new("config");
/// Id of the most recently created game. Ids are never reused.
pub const LAST_GAME_ID: Item<u64> = Item::new("last_game_id");
pub const GAMES: Map<u64, Game> = Map::new("games");
pub const MOVES: Map<(u64, &Addr), Move> = Map::new("moves");
pub const WINNINGS: Map<&Addr, Uint128> = Map::new("winnings");
