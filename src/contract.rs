use crate::deadline::{DAY, HOUR, MAX_DURATION};
use crate::state::{Config, CONFIG, LAST_GAME_ID};
use crate::{
    error::ContractError,
    msg::{ExecuteMsg, InstantiateMsg, QueryMsg},
};
use cosmwasm_std::{
    ensure, to_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, Uint128,
};

pub const DEFAULT_MIN_STAKE: Uint128 = Uint128::new(10_000);
pub const DEFAULT_MIN_LIFETIME: u64 = HOUR;
pub const DEFAULT_MAX_LIFETIME: u64 = 10 * DAY;
pub const DEFAULT_POST_COMMIT_WAIT_WINDOW: u64 = 12 * HOUR;

pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let config = Config {
        denom: msg.denom,
        min_stake: msg.min_stake.unwrap_or(DEFAULT_MIN_STAKE),
        min_lifetime: msg.min_lifetime.unwrap_or(DEFAULT_MIN_LIFETIME),
        max_lifetime: msg.max_lifetime.unwrap_or(DEFAULT_MAX_LIFETIME),
        post_commit_wait_window: msg
            .post_commit_wait_window
            .unwrap_or(DEFAULT_POST_COMMIT_WAIT_WINDOW),
        namespace: msg
            .namespace
            .unwrap_or_else(|| env.contract.address.to_string()),
    };

    ensure!(
        !config.denom.is_empty(),
        ContractError::InvalidConfig {
            reason: "denom can not be empty".to_string()
        }
    );
    ensure!(
        !config.min_stake.is_zero(),
        ContractError::InvalidConfig {
            reason: "min_stake must be positive".to_string()
        }
    );
    ensure!(
        config.min_lifetime <= config.max_lifetime,
        ContractError::InvalidConfig {
            reason: format!(
                "min_lifetime {} exceeds max_lifetime {}",
                config.min_lifetime, config.max_lifetime
            )
        }
    );
    ensure!(
        config.max_lifetime <= MAX_DURATION,
        ContractError::InvalidConfig {
            reason: format!("max_lifetime can not exceed {MAX_DURATION} seconds")
        }
    );
    ensure!(
        config.post_commit_wait_window <= MAX_DURATION,
        ContractError::InvalidConfig {
            reason: format!("post_commit_wait_window can not exceed {MAX_DURATION} seconds")
        }
    );
    ensure!(
        !config.namespace.is_empty(),
        ContractError::InvalidConfig {
            reason: "namespace can not be empty".to_string()
        }
    );

    CONFIG.save(deps.storage, &config)?;
    LAST_GAME_ID.save(deps.storage, &0)?;

    Ok(Response::default()
        .add_attribute("action", "instantiate")
        .add_attribute("denom", config.denom)
        .add_attribute("namespace", config.namespace))
}

pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let api = deps.api;

    match msg {
        ExecuteMsg::Create {
            counterparty,
            commitment,
            lifetime,
            stake,
            stake_from_winnings,
        } => {
            let counterparty = api.addr_validate(&counterparty)?;
            let stake = exec::StakeRequest {
                declared: stake,
                from_winnings: stake_from_winnings,
            };
            exec::create(deps, env, info, counterparty, commitment, lifetime, stake)
        }
        ExecuteMsg::Enrol {
            game_id,
            commitment,
            stake,
            stake_from_winnings,
        } => {
            let stake = exec::StakeRequest {
                declared: stake,
                from_winnings: stake_from_winnings,
            };
            exec::enrol(deps, env, info, game_id, commitment, stake)
        }
        ExecuteMsg::Reveal {
            game_id,
            choice,
            mask,
            timestamp,
        } => exec::reveal(deps, env, info, game_id, choice, mask, timestamp),
        ExecuteMsg::Settle { game_id } => exec::settle(deps, env, info, game_id),
        ExecuteMsg::Payout {} => exec::payout(deps, info),
    }
}

mod exec {
    use super::*;
    use crate::{
        commit, deadline,
        game::{Choice, Game, Move},
        ledger, settlement,
        state::{GAMES, MOVES},
    };
    use cosmwasm_std::{coins, Addr, BankMsg, Event, StdError, Storage, Timestamp};

    /// Stake declared by the sender of `Create` or `Enrol`.
    pub struct StakeRequest {
        pub declared: Uint128,
        pub from_winnings: bool,
    }

    /// How the pooled stake of one player is covered.
    struct Funding {
        /// Attached value above the pooled stake, credited back to the sender.
        side_credit: Uint128,
        /// Shortfall taken from the sender's winnings.
        from_winnings: Uint128,
    }

    impl Funding {
        fn new(
            received: Uint128,
            pooled: Uint128,
            from_winnings: bool,
            winnings: Uint128,
        ) -> Result<Self, ContractError> {
            if received >= pooled {
                return Ok(Funding {
                    side_credit: received - pooled,
                    from_winnings: Uint128::zero(),
                });
            }

            let shortfall = pooled - received;
            let available = if from_winnings {
                received.saturating_add(winnings)
            } else {
                received
            };
            ensure!(
                available >= pooled,
                ContractError::InsufficientFunds {
                    required: pooled,
                    available
                }
            );
            Ok(Funding {
                side_credit: Uint128::zero(),
                from_winnings: shortfall,
            })
        }

        /// Moves the sender's ledger balance. Returns the balance notifications.
        fn apply(
            &self,
            storage: &mut dyn Storage,
            sender: &Addr,
        ) -> Result<Vec<Event>, ContractError> {
            let mut events = vec![];
            if !self.from_winnings.is_zero() {
                events.push(ledger::debit(storage, sender, self.from_winnings)?);
            }
            if !self.side_credit.is_zero() {
                events.push(ledger::credit(storage, sender, self.side_credit)?);
            }
            Ok(events)
        }
    }

    /// Sum of the attached coins, all of which must be of the staking denom.
    fn received_funds(info: &MessageInfo, denom: &str) -> Result<Uint128, ContractError> {
        let mut total = Uint128::zero();
        for coin in &info.funds {
            ensure!(
                coin.denom == denom,
                ContractError::InvalidDenom {
                    denom: denom.to_string(),
                    got: coin.denom.clone()
                }
            );
            total = total.checked_add(coin.amount).map_err(StdError::from)?;
        }
        Ok(total)
    }

    fn load_game(storage: &dyn Storage, game_id: u64) -> Result<Game, ContractError> {
        GAMES
            .may_load(storage, game_id)?
            .ok_or(ContractError::GameNotFound { game_id })
    }

    fn ensure_live(game_id: u64, game: &Game, now: Timestamp) -> Result<(), ContractError> {
        ensure!(
            !game.is_expired(now),
            ContractError::GameExpired {
                game_id,
                deadline: game.deadline
            }
        );
        Ok(())
    }

    /// Removes every record of a resolved game. Its id is never handed out again.
    fn erase(storage: &mut dyn Storage, game_id: u64, game: &Game) {
        MOVES.remove(storage, (game_id, &game.player_one));
        MOVES.remove(storage, (game_id, &game.counterparty));
        GAMES.remove(storage, game_id);
    }

    pub fn create(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        counterparty: Addr,
        commitment: Binary,
        lifetime: u64,
        stake: StakeRequest,
    ) -> Result<Response, ContractError> {
        let config = CONFIG.load(deps.storage)?;

        ensure!(
            counterparty != info.sender,
            ContractError::SamePlayers {
                player: info.sender
            }
        );
        ensure!(
            !commit::is_empty(&commitment),
            ContractError::EmptyCommitment
        );
        ensure!(
            (config.min_lifetime..=config.max_lifetime).contains(&lifetime),
            ContractError::LifetimeOutOfBounds {
                lifetime,
                min: config.min_lifetime,
                max: config.max_lifetime
            }
        );
        ensure!(
            stake.declared >= config.min_stake,
            ContractError::StakeBelowMinimum {
                stake: stake.declared,
                min: config.min_stake
            }
        );

        let received = received_funds(&info, &config.denom)?;
        let winnings = ledger::balance(deps.storage, &info.sender)?;
        let funding = Funding::new(received, stake.declared, stake.from_winnings, winnings)?;

        let game_id = LAST_GAME_ID.load(deps.storage)? + 1;
        let deadline = env.block.time.plus_seconds(lifetime);
        let game = Game {
            player_one: info.sender.clone(),
            counterparty: counterparty.clone(),
            player_two: None,
            stake: stake.declared,
            pooled: stake.declared,
            deadline,
            last_commit_deadline: deadline::last_commit_deadline(lifetime, deadline),
            pair_key: commit::pair_key(info.sender.as_str(), counterparty.as_str()),
        };

        LAST_GAME_ID.save(deps.storage, &game_id)?;
        GAMES.save(deps.storage, game_id, &game)?;
        MOVES.save(
            deps.storage,
            (game_id, &info.sender),
            &Move::committed(commitment.clone()),
        )?;
        let mut events = funding.apply(deps.storage, &info.sender)?;

        events.push(
            Event::new("game_created")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("player_one", info.sender.to_string())
                .add_attribute("player_two", counterparty.to_string())
                .add_attribute("commitment", commitment.to_base64())
                .add_attribute("staked", game.stake.to_string())
                .add_attribute("deadline", game.deadline.seconds().to_string())
                .add_attribute("side_credited", funding.side_credit.to_string())
                .add_attribute("staked_from_winnings", funding.from_winnings.to_string()),
        );

        Ok(Response::default()
            .set_data(to_binary(&game_id)?)
            .add_events(events)
            .add_attribute("action", "create")
            .add_attribute("game_id", game_id.to_string())
            .add_attribute("sender", info.sender.to_string()))
    }

    pub fn enrol(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        game_id: u64,
        commitment: Binary,
        stake: StakeRequest,
    ) -> Result<Response, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        let mut game = load_game(deps.storage, game_id)?;
        let now = env.block.time;

        ensure_live(game_id, &game, now)?;
        ensure!(
            !commit::is_empty(&commitment),
            ContractError::EmptyCommitment
        );
        ensure!(
            info.sender == game.counterparty,
            ContractError::NotCounterparty {
                game_id,
                sender: info.sender
            }
        );
        ensure!(
            !game.is_enrolled(),
            ContractError::AlreadyEnrolled { game_id }
        );
        ensure!(
            stake.declared >= game.stake,
            ContractError::StakeBelowRequired {
                game_id,
                stake: stake.declared,
                required: game.stake
            }
        );

        let received = received_funds(&info, &config.denom)?;
        let winnings = ledger::balance(deps.storage, &info.sender)?;
        // Only the game's stake is pooled, whatever the sender declared on top.
        let funding = Funding::new(received, game.stake, stake.from_winnings, winnings)?;

        game.player_two = Some(info.sender.clone());
        game.pooled = game
            .pooled
            .checked_add(game.stake)
            .map_err(StdError::from)?;
        game.deadline = deadline::maybe_extend(
            game.deadline,
            game.last_commit_deadline,
            now,
            config.post_commit_wait_window,
        );

        GAMES.save(deps.storage, game_id, &game)?;
        MOVES.save(
            deps.storage,
            (game_id, &info.sender),
            &Move::committed(commitment),
        )?;
        let mut events = funding.apply(deps.storage, &info.sender)?;

        events.push(
            Event::new("game_enrolled")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("committer", info.sender.to_string())
                .add_attribute("staked", game.stake.to_string())
                .add_attribute("side_credited", funding.side_credit.to_string())
                .add_attribute("staked_from_winnings", funding.from_winnings.to_string())
                .add_attribute("deadline", game.deadline.seconds().to_string()),
        );

        Ok(Response::default()
            .add_events(events)
            .add_attribute("action", "enrol")
            .add_attribute("game_id", game_id.to_string())
            .add_attribute("sender", info.sender.to_string()))
    }

    pub fn reveal(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        game_id: u64,
        choice: Choice,
        mask: Binary,
        timestamp: Timestamp,
    ) -> Result<Response, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        let game = load_game(deps.storage, game_id)?;

        ensure_live(game_id, &game, env.block.time)?;
        let opponent = game
            .opponent_of(&info.sender)
            .ok_or_else(|| ContractError::NotPlayer {
                game_id,
                sender: info.sender.clone(),
            })?
            .clone();
        ensure!(game.is_enrolled(), ContractError::NotEnrolled { game_id });

        let mut player_move = MOVES.load(deps.storage, (game_id, &info.sender))?;
        ensure!(
            !player_move.revealed,
            ContractError::AlreadyRevealed {
                game_id,
                player: info.sender
            }
        );
        ensure!(
            commit::verify(
                &player_move.commitment,
                choice,
                &mask,
                info.sender.as_str(),
                timestamp,
                &config.namespace,
            ),
            ContractError::RevealMismatch {
                game_id,
                player: info.sender
            }
        );

        player_move.choice = choice;
        player_move.revealed = true;

        let mut events = vec![Event::new("choice_revealed")
            .add_attribute("game_id", game_id.to_string())
            .add_attribute("player", info.sender.to_string())
            .add_attribute("choice", choice.as_str())];

        let opponent_move = MOVES.load(deps.storage, (game_id, &opponent))?;
        if opponent_move.revealed {
            let (choice_one, choice_two) = if info.sender == game.player_one {
                (choice, opponent_move.choice)
            } else {
                (opponent_move.choice, choice)
            };
            let resolution =
                settlement::resolve_reveals(game_id, &game, choice_one, choice_two, &info.sender);
            events.extend(settlement::apply(deps.storage, resolution, game.pooled)?);
            erase(deps.storage, game_id, &game);
        } else {
            MOVES.save(deps.storage, (game_id, &info.sender), &player_move)?;
        }

        Ok(Response::default()
            .add_events(events)
            .add_attribute("action", "reveal")
            .add_attribute("game_id", game_id.to_string())
            .add_attribute("sender", info.sender.to_string()))
    }

    pub fn settle(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        game_id: u64,
    ) -> Result<Response, ContractError> {
        let game = load_game(deps.storage, game_id)?;

        ensure!(
            game.is_expired(env.block.time),
            ContractError::NotExpired {
                game_id,
                deadline: game.deadline
            }
        );

        let move_one = MOVES.load(deps.storage, (game_id, &game.player_one))?;
        let move_two = MOVES.may_load(deps.storage, (game_id, &game.counterparty))?;
        let resolution = settlement::resolve_timeout(
            game_id,
            &game,
            &move_one,
            move_two.as_ref(),
            &info.sender,
        );
        let events = settlement::apply(deps.storage, resolution, game.pooled)?;
        erase(deps.storage, game_id, &game);

        Ok(Response::default()
            .add_events(events)
            .add_attribute("action", "settle")
            .add_attribute("game_id", game_id.to_string())
            .add_attribute("sender", info.sender.to_string()))
    }

    pub fn payout(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        let (amount, balance_changed) = ledger::withdraw_all(deps.storage, &info.sender)?;

        Ok(Response::default()
            .add_message(BankMsg::Send {
                to_address: info.sender.to_string(),
                amount: coins(amount.u128(), config.denom),
            })
            .add_event(balance_changed)
            .add_event(
                Event::new("payout")
                    .add_attribute("payee", info.sender.to_string())
                    .add_attribute("amount", amount.to_string()),
            )
            .add_attribute("action", "payout")
            .add_attribute("sender", info.sender.to_string()))
    }
}

pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Config {} => Ok(to_binary(&CONFIG.load(deps.storage)?)?),
        QueryMsg::Game { game_id } => Ok(to_binary(&query::game(deps, &env, game_id)?)?),
        QueryMsg::Move { game_id, player } => {
            let player = deps.api.addr_validate(&player)?;
            Ok(to_binary(&query::player_move(deps, game_id, &player)?)?)
        }
        QueryMsg::Winnings { player } => {
            let player = deps.api.addr_validate(&player)?;
            Ok(to_binary(&query::winnings(deps, &player)?)?)
        }
        QueryMsg::ActiveGames { start_after, limit } => Ok(to_binary(&query::active_games(
            deps,
            &env,
            start_after,
            limit,
        )?)?),
        QueryMsg::GenerateChoice {
            choice,
            mask,
            committer,
        } => {
            let committer = deps.api.addr_validate(&committer)?;
            Ok(to_binary(&query::generate_choice(
                deps, choice, &mask, &committer,
            )?)?)
        }
        QueryMsg::GenerateMaskedChoice {
            choice,
            mask,
            committer,
            timestamp,
        } => {
            let committer = deps.api.addr_validate(&committer)?;
            Ok(to_binary(&query::generate_masked_choice(
                deps, &env, choice, &mask, &committer, timestamp,
            )?)?)
        }
    }
}

mod query {
    use super::*;
    use crate::{
        commit,
        game::{Choice, Game, GameStatus, Move},
        ledger,
        msg::{ActiveGamesResponse, CommitmentResponse, GameResponse, WinningsResponse},
        state::{GAMES, MOVES},
    };
    use cosmwasm_std::{Addr, Order, StdResult, Timestamp};
    use cw_storage_plus::Bound;

    const DEFAULT_LIMIT: u32 = 10;
    const MAX_LIMIT: u32 = 30;

    fn live_game(deps: Deps, env: &Env, game_id: u64, game: Game) -> StdResult<GameResponse> {
        let revealed = [&game.player_one, &game.counterparty]
            .into_iter()
            .map(|player| MOVES.may_load(deps.storage, (game_id, player)))
            .collect::<StdResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .filter(|player_move| player_move.revealed)
            .count();

        Ok(GameResponse {
            game_id,
            status: game.status(revealed, env.block.time),
            game: Some(game),
        })
    }

    pub fn game(deps: Deps, env: &Env, game_id: u64) -> Result<GameResponse, ContractError> {
        if let Some(game) = GAMES.may_load(deps.storage, game_id)? {
            return Ok(live_game(deps, env, game_id, game)?);
        }

        let last_game_id = LAST_GAME_ID.load(deps.storage)?;
        ensure!(
            (1..=last_game_id).contains(&game_id),
            ContractError::GameNotFound { game_id }
        );
        Ok(GameResponse {
            game_id,
            status: GameStatus::Finished,
            game: None,
        })
    }

    pub fn player_move(deps: Deps, game_id: u64, player: &Addr) -> StdResult<Move> {
        Ok(MOVES
            .may_load(deps.storage, (game_id, player))?
            .unwrap_or_default())
    }

    pub fn winnings(deps: Deps, player: &Addr) -> StdResult<WinningsResponse> {
        Ok(WinningsResponse {
            balance: ledger::balance(deps.storage, player)?,
        })
    }

    pub fn active_games(
        deps: Deps,
        env: &Env,
        start_after: Option<u64>,
        limit: Option<u32>,
    ) -> StdResult<ActiveGamesResponse> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
        let start = start_after.map(Bound::exclusive);

        let games = GAMES
            .range(deps.storage, start, None, Order::Ascending)
            .take(limit)
            .map(|item| {
                let (game_id, game) = item?;
                live_game(deps, env, game_id, game)
            })
            .collect::<StdResult<Vec<_>>>()?;

        Ok(ActiveGamesResponse { games })
    }

    pub fn generate_choice(
        deps: Deps,
        choice: Choice,
        mask: &[u8],
        committer: &Addr,
    ) -> Result<CommitmentResponse, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        let commitment = commit::commit(choice, mask, committer.as_str(), &config.namespace)?;
        Ok(CommitmentResponse { commitment })
    }

    pub fn generate_masked_choice(
        deps: Deps,
        env: &Env,
        choice: Choice,
        mask: &[u8],
        committer: &Addr,
        timestamp: Timestamp,
    ) -> Result<CommitmentResponse, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        let commitment = commit::masked_commit(
            choice,
            mask,
            committer.as_str(),
            timestamp,
            env.block.time,
            &config.namespace,
        )?;
        Ok(CommitmentResponse { commitment })
    }
}
