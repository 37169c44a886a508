use classic_terraswap::{
    asset::{AssetInfo, PairInfo},
    pair::QueryMsg as PairQueryMsg,
};
use cosmwasm_std::{
    to_json_binary, Addr, BankMsg, Coin, CosmosMsg, Deps, Env, MessageInfo, QuerierWrapper,
    StdError, StdResult, Storage, Uint128, WasmMsg,
};
use cw20::{
    AllowanceResponse, BalanceResponse as Cw20BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg,
    Expiration,
};
use cw20_base::state::{ALLOWANCES, ALLOWANCES_SPENDER};

use crate::{
    error::ContractError,
    fees::TradeCategory,
    ledger,
    state::*,
};

// receive token from a registered pair
pub fn is_buy_operation(storage: &dyn Storage, from: &Addr, to: &Addr) -> bool {
    from != to && DEX_PAIRS.has(storage, from)
}

// send token to a registered pair
pub fn is_sell_operation(storage: &dyn Storage, from: &Addr, to: &Addr) -> bool {
    from != to && DEX_PAIRS.has(storage, to) && !DEX_PAIRS.has(storage, from)
}

pub fn is_taxed_transfer(storage: &dyn Storage, from: &Addr, to: &Addr) -> bool {
    TAXED_TRANSFERS.has(storage, from) || TAXED_TRANSFERS.has(storage, to)
}

/// Router forwarding tokens for a swap the contract itself started.
fn is_swap_in_flight(storage: &dyn Storage, from: &Addr) -> StdResult<bool> {
    let cached = CACHE.may_load(storage)?;
    Ok(matches!(
        cached,
        Some(CachedData {
            locked: true,
            operation: Some(PendingOperation::SwapFees { router, .. }),
        }) if &router == from
    ))
}

fn is_exempt(storage: &dyn Storage, env: &Env, from: &Addr, to: &Addr) -> StdResult<bool> {
    let contract = &env.contract.address;
    if from == contract || to == contract {
        return Ok(true);
    }
    if !TRADING_OPEN.load(storage)? {
        let owner = OWNER.load(storage)?;
        if from == owner || to == owner {
            return Ok(true);
        }
    }
    is_swap_in_flight(storage, from)
}

pub fn classify(
    storage: &dyn Storage,
    env: &Env,
    from: &Addr,
    to: &Addr,
) -> StdResult<TradeCategory> {
    let category = if is_exempt(storage, env, from, to)? {
        TradeCategory::Exempt
    } else if is_buy_operation(storage, from, to) {
        TradeCategory::Buy
    } else if is_sell_operation(storage, from, to) {
        TradeCategory::Sell
    } else if is_taxed_transfer(storage, from, to) {
        TradeCategory::TaxedTransfer
    } else {
        TradeCategory::Transfer
    };
    Ok(category)
}

/// Rejects a sell consuming more than `impact` percent of the pair's token
/// reserve. The reserve is the pair's balance on this ledger at call time.
pub fn check_price_impact(
    storage: &dyn Storage,
    pair: &Addr,
    amount: Uint128,
) -> Result<(), ContractError> {
    let fees = FEES.load(storage)?;
    let reserve = ledger::balance_of(storage, pair)?;
    let max_amount = reserve.multiply_ratio(fees.impact, 100u64);
    if amount.full_mul(100u64) > reserve.full_mul(fees.impact) {
        return Err(ContractError::PriceImpactExceeded { amount, max_amount });
    }
    Ok(())
}

pub fn check_deadline(env: &Env, deadline: u64) -> Result<(), ContractError> {
    let now = env.block.time.seconds();
    if deadline < now {
        return Err(ContractError::DeadlineExpired { deadline, now });
    }
    Ok(())
}

pub fn assert_owner(storage: &dyn Storage, info: &MessageInfo) -> Result<(), ContractError> {
    let owner = OWNER.load(storage)?;
    if info.sender != owner {
        return Err(ContractError::Unauthorized {});
    }
    Ok(())
}

pub fn assert_owner_or_dao(storage: &dyn Storage, info: &MessageInfo) -> Result<(), ContractError> {
    let owner = OWNER.load(storage)?;
    let dao = DAO.may_load(storage)?;
    if info.sender != owner && dao.as_ref() != Some(&info.sender) {
        return Err(ContractError::Unauthorized {});
    }
    Ok(())
}

pub fn assert_owner_or_tax_address(
    storage: &dyn Storage,
    info: &MessageInfo,
) -> Result<(), ContractError> {
    let owner = OWNER.load(storage)?;
    let config = CONFIG.load(storage)?;
    if info.sender != owner && info.sender != config.tax_address {
        return Err(ContractError::Unauthorized {});
    }
    Ok(())
}

/// Liquidity moves are reserved for the swap operator while the anti-bot
/// switch is on and trading is still closed.
pub fn check_anti_bot(storage: &dyn Storage, sender: &Addr) -> Result<(), ContractError> {
    if !ANTI_LIQ_BOT.load(storage)? || TRADING_OPEN.load(storage)? {
        return Ok(());
    }
    match MYOBU_SWAP.may_load(storage)? {
        Some(operator) if &operator == sender => Ok(()),
        _ => Err(ContractError::AntiBotBlock {}),
    }
}

pub fn is_locked(storage: &dyn Storage) -> StdResult<bool> {
    Ok(CACHE
        .may_load(storage)?
        .map(|cached| cached.locked)
        .unwrap_or_default())
}

pub fn ensure_unlocked(storage: &dyn Storage) -> Result<(), ContractError> {
    if is_locked(storage)? {
        return Err(ContractError::ReentrancyBlocked {});
    }
    Ok(())
}

/// Records the operation awaiting its reply and blocks nested guarded calls.
pub fn lock(storage: &mut dyn Storage, operation: PendingOperation) -> Result<(), ContractError> {
    ensure_unlocked(storage)?;
    CACHE.save(
        storage,
        &CachedData {
            locked: true,
            operation: Some(operation),
        },
    )?;
    Ok(())
}

pub fn unlock(storage: &mut dyn Storage) -> Result<PendingOperation, ContractError> {
    let cached = CACHE.load(storage)?;
    let operation = match cached {
        CachedData {
            locked: true,
            operation: Some(operation),
        } => operation,
        _ => return Err(StdError::generic_err("No operation in flight").into()),
    };
    CACHE.save(
        storage,
        &CachedData {
            locked: false,
            operation: None,
        },
    )?;
    Ok(operation)
}

/// Overwrites the allowance `owner` grants `spender`; zero removes it.
pub fn set_allowance(
    storage: &mut dyn Storage,
    owner: &Addr,
    spender: &Addr,
    amount: Uint128,
) -> StdResult<()> {
    if amount.is_zero() {
        ALLOWANCES.remove(storage, (owner, spender));
        ALLOWANCES_SPENDER.remove(storage, (spender, owner));
        return Ok(());
    }
    let allowance = AllowanceResponse {
        allowance: amount,
        expires: Expiration::Never {},
    };
    ALLOWANCES.save(storage, (owner, spender), &allowance)?;
    ALLOWANCES_SPENDER.save(storage, (spender, owner), &allowance)?;
    Ok(())
}

/// Amount of the single `denom` coin attached to the call.
pub fn native_funds(info: &MessageInfo, denom: &str) -> Result<Uint128, ContractError> {
    match info.funds.as_slice() {
        [coin] if coin.denom == denom && !coin.amount.is_zero() => Ok(coin.amount),
        _ => Err(ContractError::InvalidFunds {
            denom: denom.to_string(),
        }),
    }
}

pub fn query_pair_info(deps: Deps, pair: &Addr) -> StdResult<PairInfo> {
    deps.querier
        .query_wasm_smart(pair.to_string(), &PairQueryMsg::Pair {})
}

/// The asset of `pair_info` that is not this token, if this token is one leg.
pub fn counter_asset(pair_info: &PairInfo, token: &Addr) -> Option<AssetInfo> {
    let is_self = |info: &AssetInfo| {
        matches!(info, AssetInfo::Token { contract_addr } if contract_addr == token.as_str())
    };
    match &pair_info.asset_infos {
        [a, b] if is_self(a) && !is_self(b) => Some(b.clone()),
        [a, b] if is_self(b) && !is_self(a) => Some(a.clone()),
        _ => None,
    }
}

pub fn query_asset_balance(
    querier: &QuerierWrapper,
    asset_info: &AssetInfo,
    holder: &Addr,
) -> StdResult<Uint128> {
    match asset_info {
        AssetInfo::NativeToken { denom } => Ok(querier.query_balance(holder, denom)?.amount),
        AssetInfo::Token { contract_addr } => {
            let res: Cw20BalanceResponse = querier.query_wasm_smart(
                contract_addr,
                &Cw20QueryMsg::Balance {
                    address: holder.to_string(),
                },
            )?;
            Ok(res.balance)
        }
    }
}

// moves `amount` of the asset out of the contract
pub fn asset_transfer_msg(
    asset_info: &AssetInfo,
    recipient: &Addr,
    amount: Uint128,
) -> StdResult<CosmosMsg> {
    let msg = match asset_info {
        AssetInfo::NativeToken { denom } => BankMsg::Send {
            to_address: recipient.to_string(),
            amount: vec![Coin {
                denom: denom.clone(),
                amount,
            }],
        }
        .into(),
        AssetInfo::Token { contract_addr } => WasmMsg::Execute {
            contract_addr: contract_addr.clone(),
            msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                recipient: recipient.to_string(),
                amount,
            })?,
            funds: vec![],
        }
        .into(),
    };
    Ok(msg)
}

pub fn asset_label(asset_info: &AssetInfo) -> String {
    match asset_info {
        AssetInfo::NativeToken { denom } => denom.clone(),
        AssetInfo::Token { contract_addr } => contract_addr.clone(),
    }
}
