//! Withdrawable balances. The only records that outlive a game.

use crate::{error::ContractError, state::WINNINGS};
use cosmwasm_std::{Addr, Event, StdResult, Storage, Uint128};

pub fn balance(storage: &dyn Storage, participant: &Addr) -> StdResult<Uint128> {
    Ok(WINNINGS
        .may_load(storage, participant)?
        .unwrap_or_default())
}

/// Adds `amount` to the balance of `participant`.
pub fn credit(storage: &mut dyn Storage, participant: &Addr, amount: Uint128) -> StdResult<Event> {
    let old = balance(storage, participant)?;
    let new = old.checked_add(amount)?;
    WINNINGS.save(storage, participant, &new)?;
    Ok(balance_changed(participant, old, new))
}

/// Takes `amount` out of the balance of `participant`, failing if it is not covered.
pub fn debit(
    storage: &mut dyn Storage,
    participant: &Addr,
    amount: Uint128,
) -> Result<Event, ContractError> {
    let old = balance(storage, participant)?;
    let new = old
        .checked_sub(amount)
        .map_err(|_| ContractError::InsufficientFunds {
            required: amount,
            available: old,
        })?;
    WINNINGS.save(storage, participant, &new)?;
    Ok(balance_changed(participant, old, new))
}

/// Zeroes the balance of `payee` and returns what it held.
///
/// The balance is written before any transfer is dispatched, so a nested withdrawal
/// sees nothing left.
pub fn withdraw_all(
    storage: &mut dyn Storage,
    payee: &Addr,
) -> Result<(Uint128, Event), ContractError> {
    let old = balance(storage, payee)?;
    if old.is_zero() {
        return Err(ContractError::NoFunds {
            payee: payee.clone(),
        });
    }
    WINNINGS.remove(storage, payee);
    Ok((old, balance_changed(payee, old, Uint128::zero())))
}

fn balance_changed(participant: &Addr, old: Uint128, new: Uint128) -> Event {
    Event::new("ledger_balance_changed")
        .add_attribute("participant", participant.to_string())
        .add_attribute("old_balance", old.to_string())
        .add_attribute("new_balance", new.to_string())
}
