//! Turns a finished or expired game into ledger credits.
//!
//! Resolution is pure: it only decides who gets what out of the pool. [`apply`] then checks
//! that the pool is paid out exactly once and credits the ledger.

use crate::{
    error::ContractError,
    game::{outcome, Choice, Game, Move, Outcome},
    ledger,
};
use cosmwasm_std::{Addr, Event, StdError, Storage, Uint128};

/// Credits owed to the players of one game, and the notification describing why.
#[derive(Debug, PartialEq)]
pub struct Resolution {
    pub credits: Vec<(Addr, Uint128)>,
    pub event: Event,
}

impl Resolution {
    fn win(
        game_id: u64,
        winner: &Addr,
        loser: &Addr,
        winning_choice: Choice,
        resolver: &Addr,
        pay: Uint128,
    ) -> Self {
        Resolution {
            credits: vec![(winner.clone(), pay)],
            event: Event::new("game_finished")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("winner", winner.to_string())
                .add_attribute("loser", loser.to_string())
                .add_attribute("winning_choice", winning_choice.as_str())
                .add_attribute("resolver", resolver.to_string())
                .add_attribute("payout", pay.to_string()),
        }
    }

    /// Each player gets their own stake back.
    fn tie(game_id: u64, game: &Game, choice: Choice, resolver: &Addr) -> Self {
        Resolution {
            credits: vec![
                (game.player_one.clone(), game.stake),
                (game.counterparty.clone(), game.stake),
            ],
            event: Event::new("game_tied")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("resolver", resolver.to_string())
                .add_attribute("choice", choice.as_str()),
        }
    }

    pub fn total(&self) -> Uint128 {
        self.credits.iter().map(|(_, amount)| *amount).sum()
    }
}

/// Both players revealed: the winner takes the pool, a tie refunds both stakes.
pub fn resolve_reveals(
    game_id: u64,
    game: &Game,
    choice_one: Choice,
    choice_two: Choice,
    resolver: &Addr,
) -> Resolution {
    let (one, two) = (&game.player_one, &game.counterparty);
    match outcome(choice_one, choice_two) {
        Outcome::Tie => Resolution::tie(game_id, game, choice_one, resolver),
        Outcome::FirstWins => {
            Resolution::win(game_id, one, two, choice_one, resolver, game.pooled)
        }
        Outcome::SecondWins => {
            Resolution::win(game_id, two, one, choice_two, resolver, game.pooled)
        }
    }
}

/// The deadline passed. Decides from what was committed and revealed:
///
/// - nobody enrolled: the creator is refunded;
/// - both committed, nothing revealed: tie;
/// - a single reveal: the revealer takes the pool, so withholding a reveal never pays.
pub fn resolve_timeout(
    game_id: u64,
    game: &Game,
    move_one: &Move,
    move_two: Option<&Move>,
    resolver: &Addr,
) -> Resolution {
    let (one, two) = (&game.player_one, &game.counterparty);
    let move_two = match move_two {
        Some(move_two) if game.is_enrolled() => move_two,
        _ => return Resolution::win(game_id, one, two, Choice::None, resolver, game.pooled),
    };

    match (move_one.revealed, move_two.revealed) {
        (false, false) => Resolution::tie(game_id, game, Choice::None, resolver),
        (true, false) => Resolution::win(game_id, one, two, move_one.choice, resolver, game.pooled),
        (false, true) => Resolution::win(game_id, two, one, move_two.choice, resolver, game.pooled),
        (true, true) => resolve_reveals(game_id, game, move_one.choice, move_two.choice, resolver),
    }
}

/// Credits the ledger. Refuses any resolution that does not pay out exactly the pool.
pub fn apply(
    storage: &mut dyn Storage,
    resolution: Resolution,
    pooled: Uint128,
) -> Result<Vec<Event>, ContractError> {
    let total = resolution.total();
    if total != pooled {
        return Err(StdError::generic_err(format!(
            "settlement of {total} does not match pooled stake {pooled}"
        ))
        .into());
    }

    let mut events = Vec::with_capacity(resolution.credits.len() + 1);
    for (participant, amount) in &resolution.credits {
        if !amount.is_zero() {
            events.push(ledger::credit(storage, participant, *amount)?);
        }
    }
    events.push(resolution.event);
    Ok(events)
}
