use cosmwasm_std::{Addr, StdResult, Storage, Uint128, Uint256};

use crate::{
    error::ContractError,
    fees::FeeQuote,
    state::{CURRENT_SNAPSHOT_ID, REFLECTED_SUPPLY, SHARES, TOTAL_REFLECTED},
};

pub const TOKEN_NAME: &str = "Myōbu";
pub const TOKEN_SYMBOL: &str = "MYOBU";
pub const DECIMALS: u8 = 9;
pub const TOTAL_SUPPLY: Uint128 = Uint128::new(1_000_000_000_000 * 1_000_000_000);

pub fn initial_reflected_supply() -> Uint256 {
    let total = Uint256::from(TOTAL_SUPPLY);
    Uint256::MAX - Uint256::MAX % total
}

/// Below this reflected supply one share would be worth more than
/// `1 / TOTAL_SUPPLY` tokens and balances could drift by more than a unit.
pub fn reflection_floor() -> Uint256 {
    let total = Uint256::from(TOTAL_SUPPLY);
    total * total
}

// balance = shares / rate
pub fn rate_for(reflected: Uint256) -> Result<Uint256, ContractError> {
    let total = Uint256::from(TOTAL_SUPPLY);
    let rate = reflected.checked_div(total)?;
    if reflected.checked_rem(total)?.is_zero() {
        Ok(rate)
    } else {
        Ok(rate + Uint256::one())
    }
}

pub fn current_rate(storage: &dyn Storage) -> Result<Uint256, ContractError> {
    rate_for(REFLECTED_SUPPLY.load(storage)?)
}

pub fn tokens_to_shares(amount: Uint128, rate: Uint256) -> Result<Uint256, ContractError> {
    Ok(Uint256::from(amount).checked_mul(rate)?)
}

pub fn shares_to_tokens(shares: Uint256, rate: Uint256) -> Result<Uint128, ContractError> {
    Ok(Uint128::try_from(shares.checked_div(rate)?)?)
}

fn snapshot_height(storage: &dyn Storage) -> StdResult<u64> {
    Ok(CURRENT_SNAPSHOT_ID.may_load(storage)?.unwrap_or_default())
}

pub fn shares_of(storage: &dyn Storage, holder: &Addr) -> StdResult<Uint256> {
    Ok(SHARES.may_load(storage, holder)?.unwrap_or_default())
}

pub fn balance_of(storage: &dyn Storage, holder: &Addr) -> Result<Uint128, ContractError> {
    shares_to_tokens(shares_of(storage, holder)?, current_rate(storage)?)
}

/// Credits the whole supply to `holder`.
pub fn instantiate_ledger(storage: &mut dyn Storage, holder: &Addr) -> Result<(), ContractError> {
    let reflected = initial_reflected_supply();
    CURRENT_SNAPSHOT_ID.save(storage, &0)?;
    REFLECTED_SUPPLY.save(storage, &reflected, 0)?;
    SHARES.save(storage, holder, &reflected, 0)?;
    TOTAL_REFLECTED.save(storage, &Uint128::zero())?;
    Ok(())
}

fn debit(
    storage: &mut dyn Storage,
    holder: &Addr,
    shares: Uint256,
    rate: Uint256,
    height: u64,
) -> Result<(), ContractError> {
    let available = shares_of(storage, holder)?;
    if available < shares {
        return Err(ContractError::InsufficientBalance {
            available: shares_to_tokens(available, rate)?,
            required: shares_to_tokens(shares, rate)?,
        });
    }
    SHARES.save(storage, holder, &(available - shares), height)?;
    Ok(())
}

fn credit(
    storage: &mut dyn Storage,
    holder: &Addr,
    shares: Uint256,
    height: u64,
) -> Result<(), ContractError> {
    SHARES.update(storage, holder, height, |balance| -> Result<_, ContractError> {
        Ok(balance.unwrap_or_default().checked_add(shares)?)
    })?;
    Ok(())
}

/// Moves `shares` between holders without any fee.
pub fn transfer_shares(
    storage: &mut dyn Storage,
    from: &Addr,
    to: &Addr,
    shares: Uint256,
) -> Result<(), ContractError> {
    let rate = current_rate(storage)?;
    let height = snapshot_height(storage)?;
    debit(storage, from, shares, rate, height)?;
    credit(storage, to, shares, height)
}

/// Moves `amount` tokens between holders without any fee.
pub fn transfer(
    storage: &mut dyn Storage,
    from: &Addr,
    to: &Addr,
    amount: Uint128,
) -> Result<(), ContractError> {
    let rate = current_rate(storage)?;
    transfer_shares(storage, from, to, tokens_to_shares(amount, rate)?)
}

/// Debits `amount` from `from`, credits the post-fee amount to `to`, the team
/// portion to `sink` and reflects the rest to every holder.
pub fn transfer_with_fees(
    storage: &mut dyn Storage,
    from: &Addr,
    to: &Addr,
    sink: &Addr,
    amount: Uint128,
    quote: &FeeQuote,
) -> Result<(), ContractError> {
    let rate = current_rate(storage)?;
    let height = snapshot_height(storage)?;

    debit(storage, from, tokens_to_shares(amount, rate)?, rate, height)?;
    credit(storage, to, tokens_to_shares(quote.received, rate)?, height)?;
    if !quote.team.is_zero() {
        credit(storage, sink, tokens_to_shares(quote.team, rate)?, height)?;
    }
    if !quote.reflection.is_zero() {
        reflect(storage, quote.reflection, rate, height)?;
    }
    Ok(())
}

// The reflected shares have already left the payer; dropping them from the
// reflected supply is what lowers the rate.
fn reflect(
    storage: &mut dyn Storage,
    amount: Uint128,
    rate: Uint256,
    height: u64,
) -> Result<(), ContractError> {
    let reflected = REFLECTED_SUPPLY.load(storage)?;
    let remaining = reflected.checked_sub(tokens_to_shares(amount, rate)?)?;
    if remaining < reflection_floor() {
        return Err(ContractError::ReflectionExhausted {});
    }
    REFLECTED_SUPPLY.save(storage, &remaining, height)?;
    TOTAL_REFLECTED.update(storage, |total| -> StdResult<_> {
        Ok(total.checked_add(amount)?)
    })?;
    Ok(())
}

/// Burns `amount` tokens worth of shares from `from` and distributes them to
/// every holder.
pub fn distribute_reflection(
    storage: &mut dyn Storage,
    from: &Addr,
    amount: Uint128,
) -> Result<(), ContractError> {
    let rate = current_rate(storage)?;
    let height = snapshot_height(storage)?;
    debit(storage, from, tokens_to_shares(amount, rate)?, rate, height)?;
    reflect(storage, amount, rate, height)
}

pub fn current_snapshot_id(storage: &dyn Storage) -> StdResult<u64> {
    snapshot_height(storage)
}

/// Checkpoints the share map and reflected supply; writes after this call are
/// tagged with the new id so the changelog keeps the captured values.
pub fn take_snapshot(storage: &mut dyn Storage) -> Result<u64, ContractError> {
    let id = snapshot_height(storage)? + 1;
    SHARES.add_checkpoint(storage, id)?;
    REFLECTED_SUPPLY.add_checkpoint(storage, id)?;
    CURRENT_SNAPSHOT_ID.save(storage, &id)?;
    Ok(id)
}

pub fn rate_at(storage: &dyn Storage, id: u64) -> Result<Uint256, ContractError> {
    if id == 0 || id > snapshot_height(storage)? {
        return Err(ContractError::SnapshotNotFound { id });
    }
    let reflected = REFLECTED_SUPPLY
        .may_load_at_height(storage, id)?
        .ok_or(ContractError::SnapshotNotFound { id })?;
    rate_for(reflected)
}

pub fn balance_at(storage: &dyn Storage, holder: &Addr, id: u64) -> Result<Uint128, ContractError> {
    let rate = rate_at(storage, id)?;
    let shares = SHARES
        .may_load_at_height(storage, holder, id)?
        .unwrap_or_default();
    shares_to_tokens(shares, rate)
}
