use classic_terraswap::{
    asset::AssetInfo,
    router::{Cw20HookMsg as RouterCw20HookMsg, SwapOperation},
};
use cosmwasm_std::{
    attr, coins, to_json_binary, BankMsg, DepsMut, Env, MessageInfo, Response, StdError, Storage,
    SubMsg, SubMsgResult, WasmMsg,
};
use cw20::Cw20ReceiveMsg;

use crate::{
    contract::{AUTO_DISTRIBUTE_REPLY_ID, SWAP_REPLY_ID},
    error::ContractError,
    helper::{assert_owner_or_tax_address, is_locked, lock, unlock},
    ledger,
    msg::ExecuteMsg,
    state::*,
};

/// Self-call that swaps and distributes the fee balance once it reaches the
/// configured threshold. A failure is caught by the reply and never reverts
/// the trade that triggered it.
pub fn auto_swap_msg(storage: &dyn Storage, env: &Env) -> Result<Option<SubMsg>, ContractError> {
    if is_locked(storage)? || !PRIMARY_PAIR.exists(storage) {
        return Ok(None);
    }
    let config = CONFIG.load(storage)?;
    let balance = ledger::balance_of(storage, &env.contract.address)?;
    if balance.is_zero() || balance < config.swap_threshold {
        return Ok(None);
    }

    let msg = WasmMsg::Execute {
        contract_addr: env.contract.address.to_string(),
        msg: to_json_binary(&ExecuteMsg::SwapAndDistribute {})?,
        funds: vec![],
    };
    Ok(Some(SubMsg::reply_on_error(msg, AUTO_DISTRIBUTE_REPLY_ID)))
}

pub fn swap_and_distribute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    if info.sender != env.contract.address {
        return Err(ContractError::Unauthorized {});
    }
    swap_fees(deps, env, true, "swap_and_distribute")
}

pub fn manual_swap(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    assert_owner_or_tax_address(deps.storage, &info)?;
    swap_fees(deps, env, false, "manual_swap")
}

pub fn manual_send(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    assert_owner_or_tax_address(deps.storage, &info)?;

    let config = CONFIG.load(deps.storage)?;
    let balance = deps
        .querier
        .query_balance(&env.contract.address, &config.native_denom)?
        .amount;
    if balance.is_zero() {
        return Err(ContractError::NothingToSend {});
    }

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: config.tax_address.to_string(),
            amount: coins(balance.u128(), config.native_denom),
        })
        .add_attributes(vec![
            attr("action", "manual_send"),
            attr("to", config.tax_address),
            attr("amount", balance),
        ]))
}

fn swap_fees(
    deps: DepsMut,
    env: Env,
    distribute: bool,
    action: &str,
) -> Result<Response, ContractError> {
    let pair = PRIMARY_PAIR
        .may_load(deps.storage)?
        .ok_or(ContractError::LiquidityNotAdded {})?;
    let router = DEX_PAIRS.load(deps.storage, &pair)?;
    let config = CONFIG.load(deps.storage)?;
    let contract = env.contract.address;

    let amount = ledger::balance_of(deps.storage, &contract)?;
    if amount.is_zero() {
        return Err(ContractError::ZeroAmount {});
    }
    let native_before = deps
        .querier
        .query_balance(&contract, &config.native_denom)?
        .amount;

    lock(
        deps.storage,
        PendingOperation::SwapFees {
            router: router.clone(),
            native_before,
            distribute,
        },
    )?;
    ledger::transfer(deps.storage, &contract, &router, amount)?;

    let hook = RouterCw20HookMsg::ExecuteSwapOperations {
        operations: vec![SwapOperation::TerraSwap {
            offer_asset_info: AssetInfo::Token {
                contract_addr: contract.to_string(),
            },
            ask_asset_info: AssetInfo::NativeToken {
                denom: config.native_denom,
            },
        }],
        minimum_receive: None,
        to: Some(contract.to_string()),
        deadline: None,
    };
    let swap_msg = Cw20ReceiveMsg {
        sender: contract.to_string(),
        amount,
        msg: to_json_binary(&hook)?,
    }
    .into_cosmos_msg(router.to_string())?;

    Ok(Response::new()
        .add_submessage(SubMsg::reply_always(swap_msg, SWAP_REPLY_ID))
        .add_attributes(vec![
            attr("action", action),
            attr("router", router),
            attr("amount", amount),
        ]))
}

pub fn swap_reply(deps: DepsMut, env: Env, result: SubMsgResult) -> Result<Response, ContractError> {
    if let SubMsgResult::Err(_) = result {
        return Err(ContractError::SwapFailed {});
    }
    let (native_before, distribute) = match unlock(deps.storage)? {
        PendingOperation::SwapFees {
            native_before,
            distribute,
            ..
        } => (native_before, distribute),
        _ => return Err(StdError::generic_err("Unexpected operation in flight").into()),
    };

    let config = CONFIG.load(deps.storage)?;
    let native_after = deps
        .querier
        .query_balance(&env.contract.address, &config.native_denom)?
        .amount;
    if native_after <= native_before {
        return Err(ContractError::SwapFailed {});
    }

    let mut res = Response::new().add_attributes(vec![
        attr("action", "swap_fees_reply"),
        attr("proceeds", native_after - native_before),
    ]);
    if distribute {
        res = res
            .add_message(BankMsg::Send {
                to_address: config.tax_address.to_string(),
                amount: coins(native_after.u128(), config.native_denom),
            })
            .add_attribute("distributed", native_after);
    }
    Ok(res)
}

pub fn auto_distribute_reply(result: SubMsgResult) -> Result<Response, ContractError> {
    match result {
        SubMsgResult::Err(reason) => Ok(Response::new().add_attributes(vec![
            attr("action", "skip_fee_distribution"),
            attr("reason", reason),
        ])),
        SubMsgResult::Ok(_) => Ok(Response::new()),
    }
}
