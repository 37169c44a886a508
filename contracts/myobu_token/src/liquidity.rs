use classic_terraswap::{
    asset::{Asset, AssetInfo, PairInfo},
    pair::{Cw20HookMsg as PairCw20HookMsg, ExecuteMsg as PairExecuteMsg},
};
use cosmwasm_std::{
    attr, to_json_binary, Addr, Coin, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Response,
    StdError, StdResult, SubMsg, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;

use crate::{
    contract::{ADD_LIQUIDITY_REPLY_ID, REMOVE_LIQUIDITY_REPLY_ID},
    error::ContractError,
    helper::{
        asset_label, asset_transfer_msg, assert_owner, check_anti_bot, check_deadline,
        counter_asset, ensure_unlocked, lock, native_funds, query_asset_balance, query_pair_info,
        set_allowance, unlock,
    },
    ledger::{self, TOKEN_SYMBOL},
    msg::{AddLiquidityParams, LiquidityEthParams, LiquidityResponse, RemoveLiquidityParams},
    state::*,
};

/// Seeds the primary native pair with the contract's whole token balance and
/// the attached funds. LP shares go to the owner.
pub fn bootstrap_liquidity(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pair: String,
    router: String,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info)?;
    if PRIMARY_PAIR.exists(deps.storage) {
        return Err(ContractError::LiquidityAlreadyAdded {});
    }

    let pair_addr = deps.api.addr_validate(&pair)?;
    let router_addr = deps.api.addr_validate(&router)?;
    let config = CONFIG.load(deps.storage)?;
    let contract = env.contract.address;

    let (_, counter) = pair_assets(deps.as_ref(), &pair_addr, &contract)?;
    expect_native(&counter, &config.native_denom, &pair_addr)?;
    let native_amount = native_funds(&info, &config.native_denom)?;
    let token_amount = ledger::balance_of(deps.storage, &contract)?;
    if token_amount.is_zero() {
        return Err(ContractError::ZeroAmount {});
    }

    match DEX_PAIRS.may_load(deps.storage, &pair_addr)? {
        Some(registered) if registered != router_addr => {
            return Err(ContractError::RouterMismatch {
                pair,
                router: registered.to_string(),
            });
        }
        Some(_) => {}
        None => {
            DEX_PAIRS.save(deps.storage, &pair_addr, &router_addr)?;
            set_allowance(deps.storage, &contract, &router_addr, Uint128::MAX)?;
        }
    }
    PRIMARY_PAIR.save(deps.storage, &pair_addr)?;
    set_allowance(deps.storage, &contract, &pair_addr, token_amount)?;

    let provide = provide_liquidity_msg(
        &pair_addr,
        &contract,
        token_amount,
        &counter,
        native_amount,
        &info.sender,
        None,
    )?;

    Ok(Response::new().add_message(provide).add_attributes(vec![
        attr("action", "add_liquidity"),
        attr("pair", pair),
        attr("router", router),
        attr("amount_token", token_amount),
        attr("amount_native", native_amount),
    ]))
}

// Pair calls run as reply_on_success sub-messages; the replies settle
// against the balances recorded here and refund whatever the pair left.
pub fn add_liquidity_eth(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: LiquidityEthParams,
) -> Result<Response, ContractError> {
    preflight(deps.as_ref(), &env, &info, params.deadline)?;
    let pair = registered_pair(deps.as_ref(), &params.pair)?;
    let to = deps.api.addr_validate(&params.to)?;
    let config = CONFIG.load(deps.storage)?;
    let contract = env.contract.address;

    let (_, counter) = pair_assets(deps.as_ref(), &pair, &contract)?;
    expect_native(&counter, &config.native_denom, &pair)?;
    let native_amount = native_funds(&info, &config.native_denom)?;
    let amount_token = params.amount_token_or_lp;
    if amount_token.is_zero() {
        return Err(ContractError::ZeroAmount {});
    }

    let token_before = ledger::balance_of(deps.storage, &contract)?;
    ledger::transfer(deps.storage, &info.sender, &contract, amount_token)?;
    // the attached funds are already part of the balance
    let counter_before = query_asset_balance(&deps.querier, &counter, &contract)?
        .checked_sub(native_amount)?;
    set_allowance(deps.storage, &contract, &pair, amount_token)?;

    lock(
        deps.storage,
        PendingOperation::AddLiquidity {
            provider: info.sender.clone(),
            pair: pair.clone(),
            token_supplied: amount_token,
            token_min: params.amount_token_min,
            token_before,
            counter_asset: counter.clone(),
            counter_supplied: native_amount,
            counter_min: params.amount_eth_min,
            counter_before,
        },
    )?;

    let provide = provide_liquidity_msg(
        &pair,
        &contract,
        amount_token,
        &counter,
        native_amount,
        &to,
        Some(params.deadline),
    )?;

    Ok(Response::new()
        .add_submessage(SubMsg::reply_on_success(provide, ADD_LIQUIDITY_REPLY_ID))
        .add_attributes(vec![
            attr("action", "no_fee_add_liquidity_eth"),
            attr("pair", pair),
            attr("provider", info.sender),
            attr("to", to),
            attr("amount_token", amount_token),
            attr("amount_native", native_amount),
        ]))
}

pub fn add_liquidity(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: AddLiquidityParams,
) -> Result<Response, ContractError> {
    preflight(deps.as_ref(), &env, &info, params.deadline)?;
    let pair = registered_pair(deps.as_ref(), &params.pair)?;
    let to = deps.api.addr_validate(&params.to)?;
    let contract = env.contract.address;

    let (_, counter) = pair_assets(deps.as_ref(), &pair, &contract)?;
    let token_b = expect_token(&counter, &pair)?;
    if params.amount_token.is_zero() || params.amount_token_b.is_zero() {
        return Err(ContractError::ZeroAmount {});
    }

    let token_before = ledger::balance_of(deps.storage, &contract)?;
    let counter_before = query_asset_balance(&deps.querier, &counter, &contract)?;
    ledger::transfer(deps.storage, &info.sender, &contract, params.amount_token)?;
    set_allowance(deps.storage, &contract, &pair, params.amount_token)?;

    lock(
        deps.storage,
        PendingOperation::AddLiquidity {
            provider: info.sender.clone(),
            pair: pair.clone(),
            token_supplied: params.amount_token,
            token_min: params.amount_token_min,
            token_before,
            counter_asset: counter.clone(),
            counter_supplied: params.amount_token_b,
            counter_min: params.amount_token_b_min,
            counter_before,
        },
    )?;

    let pull_b = WasmMsg::Execute {
        contract_addr: token_b.clone(),
        msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
            owner: info.sender.to_string(),
            recipient: contract.to_string(),
            amount: params.amount_token_b,
        })?,
        funds: vec![],
    };
    let approve_b = WasmMsg::Execute {
        contract_addr: token_b,
        msg: to_json_binary(&Cw20ExecuteMsg::IncreaseAllowance {
            spender: pair.to_string(),
            amount: params.amount_token_b,
            expires: None,
        })?,
        funds: vec![],
    };
    let provide = provide_liquidity_msg(
        &pair,
        &contract,
        params.amount_token,
        &counter,
        params.amount_token_b,
        &to,
        Some(params.deadline),
    )?;

    Ok(Response::new()
        .add_message(pull_b)
        .add_message(approve_b)
        .add_submessage(SubMsg::reply_on_success(provide, ADD_LIQUIDITY_REPLY_ID))
        .add_attributes(vec![
            attr("action", "no_fee_add_liquidity"),
            attr("pair", pair),
            attr("provider", info.sender),
            attr("to", to),
            attr("amount_token", params.amount_token),
            attr("amount_token_b", params.amount_token_b),
        ]))
}

pub fn remove_liquidity_eth(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: LiquidityEthParams,
) -> Result<Response, ContractError> {
    preflight(deps.as_ref(), &env, &info, params.deadline)?;
    let pair = registered_pair(deps.as_ref(), &params.pair)?;
    let config = CONFIG.load(deps.storage)?;
    let (pair_info, counter) = pair_assets(deps.as_ref(), &pair, &env.contract.address)?;
    expect_native(&counter, &config.native_denom, &pair)?;

    withdraw(
        deps,
        env,
        info,
        Withdrawal {
            pair,
            pair_info,
            counter,
            to: params.to,
            amount_lp: params.amount_token_or_lp,
            token_min: params.amount_token_min,
            counter_min: params.amount_eth_min,
            deadline: params.deadline,
        },
        "no_fee_remove_liquidity_eth",
    )
}

pub fn remove_liquidity(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: RemoveLiquidityParams,
) -> Result<Response, ContractError> {
    preflight(deps.as_ref(), &env, &info, params.deadline)?;
    let pair = registered_pair(deps.as_ref(), &params.pair)?;
    let (pair_info, counter) = pair_assets(deps.as_ref(), &pair, &env.contract.address)?;
    expect_token(&counter, &pair)?;

    withdraw(
        deps,
        env,
        info,
        Withdrawal {
            pair,
            pair_info,
            counter,
            to: params.to,
            amount_lp: params.amount_lp,
            token_min: params.amount_token_min,
            counter_min: params.amount_token_b_min,
            deadline: params.deadline,
        },
        "no_fee_remove_liquidity",
    )
}

struct Withdrawal {
    pair: Addr,
    pair_info: PairInfo,
    counter: AssetInfo,
    to: String,
    amount_lp: Uint128,
    token_min: Uint128,
    counter_min: Uint128,
    deadline: u64,
}

// The caller approves its LP tokens to this contract; the LP token then sends
// them to the pair with a withdraw hook and the pair pays both legs back here.
fn withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    withdrawal: Withdrawal,
    action: &str,
) -> Result<Response, ContractError> {
    if withdrawal.amount_lp.is_zero() {
        return Err(ContractError::ZeroAmount {});
    }
    let recipient = deps.api.addr_validate(&withdrawal.to)?;
    let contract = env.contract.address;

    let token_before = ledger::balance_of(deps.storage, &contract)?;
    let counter_before = query_asset_balance(&deps.querier, &withdrawal.counter, &contract)?;
    lock(
        deps.storage,
        PendingOperation::RemoveLiquidity {
            recipient: recipient.clone(),
            token_min: withdrawal.token_min,
            token_before,
            counter_asset: withdrawal.counter,
            counter_min: withdrawal.counter_min,
            counter_before,
        },
    )?;

    let burn = WasmMsg::Execute {
        contract_addr: withdrawal.pair_info.liquidity_token,
        msg: to_json_binary(&Cw20ExecuteMsg::SendFrom {
            owner: info.sender.to_string(),
            contract: withdrawal.pair.to_string(),
            amount: withdrawal.amount_lp,
            msg: to_json_binary(&PairCw20HookMsg::WithdrawLiquidity {
                min_assets: None,
                deadline: Some(withdrawal.deadline),
            })?,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_submessage(SubMsg::reply_on_success(burn, REMOVE_LIQUIDITY_REPLY_ID))
        .add_attributes(vec![
            attr("action", action),
            attr("pair", withdrawal.pair),
            attr("owner", info.sender),
            attr("to", recipient),
            attr("amount_lp", withdrawal.amount_lp),
        ]))
}

pub fn add_liquidity_reply(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let PendingOperation::AddLiquidity {
        provider,
        pair,
        token_supplied,
        token_min,
        token_before,
        counter_asset,
        counter_supplied,
        counter_min,
        counter_before,
    } = unlock(deps.storage)?
    else {
        return Err(unexpected_operation());
    };
    let contract = env.contract.address;

    let token_residual = ledger::balance_of(deps.storage, &contract)?.checked_sub(token_before)?;
    let amount_token = token_supplied.checked_sub(token_residual)?;
    let counter_residual = query_asset_balance(&deps.querier, &counter_asset, &contract)?
        .checked_sub(counter_before)?;
    let amount_counter = counter_supplied.checked_sub(counter_residual)?;

    check_minimum(TOKEN_SYMBOL, token_min, amount_token)?;
    check_minimum(&asset_label(&counter_asset), counter_min, amount_counter)?;

    let mut messages: Vec<CosmosMsg> = vec![];
    if !token_residual.is_zero() {
        ledger::transfer(deps.storage, &contract, &provider, token_residual)?;
    }
    if !counter_residual.is_zero() {
        messages.push(asset_transfer_msg(&counter_asset, &provider, counter_residual)?);
    }

    set_allowance(deps.storage, &contract, &pair, Uint128::zero())?;
    if let AssetInfo::Token { contract_addr } = &counter_asset {
        messages.push(
            WasmMsg::Execute {
                contract_addr: contract_addr.clone(),
                msg: to_json_binary(&Cw20ExecuteMsg::DecreaseAllowance {
                    spender: pair.to_string(),
                    amount: counter_supplied,
                    expires: None,
                })?,
                funds: vec![],
            }
            .into(),
        );
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attributes(vec![
            attr("action", "no_fee_add_liquidity_reply"),
            attr("amount_token", amount_token),
            attr("amount_counter", amount_counter),
            attr("refund_token", token_residual),
            attr("refund_counter", counter_residual),
        ])
        .set_data(to_json_binary(&LiquidityResponse {
            amount_token,
            amount_counter,
        })?))
}

pub fn remove_liquidity_reply(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let PendingOperation::RemoveLiquidity {
        recipient,
        token_min,
        token_before,
        counter_asset,
        counter_min,
        counter_before,
    } = unlock(deps.storage)?
    else {
        return Err(unexpected_operation());
    };
    let contract = env.contract.address;

    let amount_token = ledger::balance_of(deps.storage, &contract)?.checked_sub(token_before)?;
    let amount_counter = query_asset_balance(&deps.querier, &counter_asset, &contract)?
        .checked_sub(counter_before)?;
    check_minimum(TOKEN_SYMBOL, token_min, amount_token)?;
    check_minimum(&asset_label(&counter_asset), counter_min, amount_counter)?;

    let mut messages: Vec<CosmosMsg> = vec![];
    if !amount_token.is_zero() {
        ledger::transfer(deps.storage, &contract, &recipient, amount_token)?;
    }
    if !amount_counter.is_zero() {
        messages.push(asset_transfer_msg(&counter_asset, &recipient, amount_counter)?);
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attributes(vec![
            attr("action", "no_fee_remove_liquidity_reply"),
            attr("to", recipient),
            attr("amount_token", amount_token),
            attr("amount_counter", amount_counter),
        ])
        .set_data(to_json_binary(&LiquidityResponse {
            amount_token,
            amount_counter,
        })?))
}

fn preflight(deps: Deps, env: &Env, info: &MessageInfo, deadline: u64) -> Result<(), ContractError> {
    check_deadline(env, deadline)?;
    check_anti_bot(deps.storage, &info.sender)?;
    ensure_unlocked(deps.storage)
}

fn registered_pair(deps: Deps, pair: &str) -> Result<Addr, ContractError> {
    let pair_addr = deps.api.addr_validate(pair)?;
    if !DEX_PAIRS.has(deps.storage, &pair_addr) {
        return Err(ContractError::UnsupportedPair {
            pair: pair.to_string(),
        });
    }
    Ok(pair_addr)
}

fn pair_assets(
    deps: Deps,
    pair: &Addr,
    token: &Addr,
) -> Result<(PairInfo, AssetInfo), ContractError> {
    let pair_info = query_pair_info(deps, pair)?;
    let counter = counter_asset(&pair_info, token).ok_or_else(|| ContractError::PairAssetMismatch {
        pair: pair.to_string(),
    })?;
    Ok((pair_info, counter))
}

fn expect_native(counter: &AssetInfo, denom: &str, pair: &Addr) -> Result<(), ContractError> {
    match counter {
        AssetInfo::NativeToken { denom: d } if d == denom => Ok(()),
        _ => Err(ContractError::PairAssetMismatch {
            pair: pair.to_string(),
        }),
    }
}

fn expect_token(counter: &AssetInfo, pair: &Addr) -> Result<String, ContractError> {
    match counter {
        AssetInfo::Token { contract_addr } => Ok(contract_addr.clone()),
        AssetInfo::NativeToken { .. } => Err(ContractError::PairAssetMismatch {
            pair: pair.to_string(),
        }),
    }
}

fn check_minimum(asset: &str, minimum: Uint128, actual: Uint128) -> Result<(), ContractError> {
    if actual < minimum {
        return Err(ContractError::SlippageExceeded {
            asset: asset.to_string(),
            minimum,
            actual,
        });
    }
    Ok(())
}

fn unexpected_operation() -> ContractError {
    StdError::generic_err("Unexpected operation in flight").into()
}

fn provide_liquidity_msg(
    pair: &Addr,
    token: &Addr,
    amount_token: Uint128,
    counter: &AssetInfo,
    amount_counter: Uint128,
    receiver: &Addr,
    deadline: Option<u64>,
) -> StdResult<CosmosMsg> {
    let funds = match counter {
        AssetInfo::NativeToken { denom } => vec![Coin {
            denom: denom.clone(),
            amount: amount_counter,
        }],
        AssetInfo::Token { .. } => vec![],
    };
    let msg = PairExecuteMsg::ProvideLiquidity {
        assets: [
            Asset {
                info: AssetInfo::Token {
                    contract_addr: token.to_string(),
                },
                amount: amount_token,
            },
            Asset {
                info: counter.clone(),
                amount: amount_counter,
            },
        ],
        receiver: Some(receiver.to_string()),
        deadline,
        slippage_tolerance: None,
    };
    Ok(WasmMsg::Execute {
        contract_addr: pair.to_string(),
        msg: to_json_binary(&msg)?,
        funds,
    }
    .into())
}
