use crate::{
    distribute,
    error::ContractError,
    fees::{FeeQuote, TradeCategory},
    helper::*,
    ledger::{self, DECIMALS, TOKEN_NAME, TOKEN_SYMBOL, TOTAL_SUPPLY},
    liquidity,
    msg::*,
    state::*,
};

use cosmwasm_std::{
    attr, to_json_binary, Addr, Attribute, Binary, Deps, DepsMut, Env, MessageInfo, Order, Reply,
    Response, StdResult, Storage, SubMsg, Uint128,
};
use cw2::set_contract_version;
use cw20::{BalanceResponse, Cw20ReceiveMsg, TokenInfoResponse};
use cw20_base::{
    allowances::{
        deduct_allowance, execute_decrease_allowance, execute_increase_allowance, query_allowance,
    },
    enumerable::{query_owner_allowances, query_spender_allowances},
};

// version info for migration info
const CONTRACT_NAME: &str = "myobu-token";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const SWAP_REPLY_ID: u64 = 1;
pub const AUTO_DISTRIBUTE_REPLY_ID: u64 = 2;
pub const ADD_LIQUIDITY_REPLY_ID: u64 = 3;
pub const REMOVE_LIQUIDITY_REPLY_ID: u64 = 4;

const DEFAULT_SWAP_THRESHOLD: Uint128 = Uint128::new(1_000_000_000_000 * 1_000_000_000 / 20_000);

pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let fees = msg.fees.unwrap_or_default();
    fees.validate()?;
    let config = Config {
        tax_address: deps.api.addr_validate(&msg.tax_address)?,
        native_denom: msg.native_denom,
        swap_threshold: msg.swap_threshold.unwrap_or(DEFAULT_SWAP_THRESHOLD),
    };

    CONFIG.save(deps.storage, &config)?;
    FEES.save(deps.storage, &fees)?;
    OWNER.save(deps.storage, &info.sender)?;
    TRADING_OPEN.save(deps.storage, &false)?;
    ANTI_LIQ_BOT.save(deps.storage, &false)?;
    CACHE.save(
        deps.storage,
        &CachedData {
            locked: false,
            operation: None,
        },
    )?;
    ledger::instantiate_ledger(deps.storage, &info.sender)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "instantiate"),
        attr("owner", info.sender),
        attr("total_supply", TOTAL_SUPPLY),
    ]))
}

pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // ======= Token surface =======
        ExecuteMsg::Transfer { recipient, amount } => {
            execute::transfer(deps, env, info, recipient, amount)
        }
        ExecuteMsg::TransferFrom {
            owner,
            recipient,
            amount,
        } => execute::transfer_from(deps, env, info, owner, recipient, amount),
        ExecuteMsg::Send {
            contract,
            amount,
            msg,
        } => execute::send(deps, env, info, contract, amount, msg),
        ExecuteMsg::SendFrom {
            owner,
            contract,
            amount,
            msg,
        } => execute::send_from(deps, env, info, owner, contract, amount, msg),
        ExecuteMsg::Approve { spender, amount } => execute::approve(deps, info, spender, amount),
        ExecuteMsg::IncreaseAllowance {
            spender,
            amount,
            expires,
        } => Ok(execute_increase_allowance(
            deps, env, info, spender, amount, expires,
        )?),
        ExecuteMsg::DecreaseAllowance {
            spender,
            amount,
            expires,
        } => Ok(execute_decrease_allowance(
            deps, env, info, spender, amount, expires,
        )?),

        // ======= Authority =======
        ExecuteMsg::UpdateOwner { new_owner } => execute::update_owner(deps, info, new_owner),
        ExecuteMsg::SetDao { dao } => execute::set_dao(deps, info, dao),
        ExecuteMsg::SetTaxAddress { tax_address } => {
            execute::set_tax_address(deps, info, tax_address)
        }
        ExecuteMsg::SetAntiLiqBot { enabled } => execute::set_anti_liq_bot(deps, info, enabled),
        ExecuteMsg::SetMyobuSwap { operator } => execute::set_myobu_swap(deps, info, operator),
        ExecuteMsg::OpenTrading {} => execute::open_trading(deps, info),
        ExecuteMsg::SetSwapThreshold { threshold } => {
            execute::set_swap_threshold(deps, info, threshold)
        }
        ExecuteMsg::SetFees { fees } => execute::set_fees(deps, info, fees),

        // ======= Pair registry =======
        ExecuteMsg::AddDex { pair, router } => execute::add_dex(deps, env, info, pair, router),
        ExecuteMsg::RemoveDex { pair } => execute::remove_dex(deps, env, info, pair),
        ExecuteMsg::SetTaxedTransferFor { addresses } => {
            execute::set_taxed_transfer_for(deps, info, addresses, true)
        }
        ExecuteMsg::RemoveTaxedTransferFor { addresses } => {
            execute::set_taxed_transfer_for(deps, info, addresses, false)
        }

        // ======= Fee conversion =======
        ExecuteMsg::AddLiquidity { pair, router } => {
            liquidity::bootstrap_liquidity(deps, env, info, pair, router)
        }
        ExecuteMsg::ManualSwap {} => distribute::manual_swap(deps, env, info),
        ExecuteMsg::ManualSend {} => distribute::manual_send(deps, env, info),
        ExecuteMsg::SwapAndDistribute {} => distribute::swap_and_distribute(deps, env, info),
        ExecuteMsg::Snapshot {} => execute::snapshot(deps, info),

        // ======= Fee-free liquidity =======
        ExecuteMsg::NoFeeAddLiquidityEth(params) => {
            liquidity::add_liquidity_eth(deps, env, info, params)
        }
        ExecuteMsg::NoFeeRemoveLiquidityEth(params) => {
            liquidity::remove_liquidity_eth(deps, env, info, params)
        }
        ExecuteMsg::NoFeeAddLiquidity(params) => liquidity::add_liquidity(deps, env, info, params),
        ExecuteMsg::NoFeeRemoveLiquidity(params) => {
            liquidity::remove_liquidity(deps, env, info, params)
        }
    }
}

pub mod execute {
    use super::*;

    /// Result of routing one transfer through the fee pipeline.
    pub struct Movement {
        pub category: TradeCategory,
        pub quote: FeeQuote,
        pub auto_swap: Option<SubMsg>,
    }

    impl Movement {
        fn attributes(&self) -> Vec<Attribute> {
            vec![
                attr("category", self.category.as_str()),
                attr("received", self.quote.received),
                attr("reflection_fee", self.quote.reflection),
                attr("team_fee", self.quote.team),
            ]
        }
    }

    /// Classifies the transfer, applies the sell guard and the category fee,
    /// then settles it on the ledger. A sell that leaves the contract above
    /// the swap threshold also yields the auto-distribution sub-message.
    pub fn move_tokens(
        storage: &mut dyn Storage,
        env: &Env,
        from: &Addr,
        to: &Addr,
        amount: Uint128,
    ) -> Result<Movement, ContractError> {
        if amount.is_zero() {
            return Err(ContractError::ZeroAmount {});
        }

        let category = classify(storage, env, from, to)?;
        let is_trade = matches!(category, TradeCategory::Buy | TradeCategory::Sell);
        if is_trade && !TRADING_OPEN.load(storage)? {
            return Err(ContractError::TradingNotOpen {});
        }
        if category == TradeCategory::Sell {
            check_price_impact(storage, to, amount)?;
        }

        let quote = FEES.load(storage)?.quote(category, amount);
        if quote.received == amount {
            ledger::transfer(storage, from, to, amount)?;
        } else {
            ledger::transfer_with_fees(storage, from, to, &env.contract.address, amount, &quote)?;
        }

        let auto_swap = match category {
            TradeCategory::Sell => distribute::auto_swap_msg(storage, env)?,
            _ => None,
        };
        Ok(Movement {
            category,
            quote,
            auto_swap,
        })
    }

    pub fn transfer(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        recipient: String,
        amount: Uint128,
    ) -> Result<Response, ContractError> {
        let rcpt_addr = deps.api.addr_validate(&recipient)?;
        let movement = move_tokens(deps.storage, &env, &info.sender, &rcpt_addr, amount)?;

        let mut attrs = vec![
            attr("action", "transfer"),
            attr("from", &info.sender),
            attr("to", &recipient),
            attr("amount", amount),
        ];
        attrs.extend(movement.attributes());

        Ok(Response::new()
            .add_submessages(movement.auto_swap)
            .add_attributes(attrs))
    }

    pub fn transfer_from(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        owner: String,
        recipient: String,
        amount: Uint128,
    ) -> Result<Response, ContractError> {
        let owner_addr = deps.api.addr_validate(&owner)?;
        let rcpt_addr = deps.api.addr_validate(&recipient)?;

        // deduct allowance before doing anything else have enough allowance
        deduct_allowance(deps.storage, &owner_addr, &info.sender, &env.block, amount)?;
        let movement = move_tokens(deps.storage, &env, &owner_addr, &rcpt_addr, amount)?;

        let mut attrs = vec![
            attr("action", "transfer_from"),
            attr("from", &owner),
            attr("to", &recipient),
            attr("by", &info.sender),
            attr("amount", amount),
        ];
        attrs.extend(movement.attributes());

        Ok(Response::new()
            .add_submessages(movement.auto_swap)
            .add_attributes(attrs))
    }

    pub fn send(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        contract: String,
        amount: Uint128,
        msg: Binary,
    ) -> Result<Response, ContractError> {
        let rcpt_addr = deps.api.addr_validate(&contract)?;
        let movement = move_tokens(deps.storage, &env, &info.sender, &rcpt_addr, amount)?;

        let mut attrs = vec![
            attr("action", "send"),
            attr("from", &info.sender),
            attr("to", &contract),
            attr("amount", amount),
        ];
        attrs.extend(movement.attributes());

        // the receiver is told what actually arrived
        let receive_msg = Cw20ReceiveMsg {
            sender: info.sender.to_string(),
            amount: movement.quote.received,
            msg,
        }
        .into_cosmos_msg(contract)?;

        Ok(Response::new()
            .add_message(receive_msg)
            .add_submessages(movement.auto_swap)
            .add_attributes(attrs))
    }

    pub fn send_from(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        owner: String,
        contract: String,
        amount: Uint128,
        msg: Binary,
    ) -> Result<Response, ContractError> {
        let owner_addr = deps.api.addr_validate(&owner)?;
        let rcpt_addr = deps.api.addr_validate(&contract)?;

        deduct_allowance(deps.storage, &owner_addr, &info.sender, &env.block, amount)?;
        let movement = move_tokens(deps.storage, &env, &owner_addr, &rcpt_addr, amount)?;

        let mut attrs = vec![
            attr("action", "send_from"),
            attr("from", &owner),
            attr("to", &contract),
            attr("by", &info.sender),
            attr("amount", amount),
        ];
        attrs.extend(movement.attributes());

        let receive_msg = Cw20ReceiveMsg {
            sender: info.sender.to_string(),
            amount: movement.quote.received,
            msg,
        }
        .into_cosmos_msg(contract)?;

        Ok(Response::new()
            .add_message(receive_msg)
            .add_submessages(movement.auto_swap)
            .add_attributes(attrs))
    }

    pub fn approve(
        deps: DepsMut,
        info: MessageInfo,
        spender: String,
        amount: Uint128,
    ) -> Result<Response, ContractError> {
        if spender.is_empty() {
            return Err(ContractError::InvalidSpender {});
        }
        let spender_addr = deps.api.addr_validate(&spender)?;
        if spender_addr == info.sender {
            return Err(ContractError::InvalidSpender {});
        }
        set_allowance(deps.storage, &info.sender, &spender_addr, amount)?;

        Ok(Response::new().add_attributes(vec![
            attr("action", "approve"),
            attr("owner", info.sender),
            attr("spender", spender),
            attr("amount", amount),
        ]))
    }

    pub fn update_owner(
        deps: DepsMut,
        info: MessageInfo,
        new_owner: String,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info)?;
        let new_owner = deps.api.addr_validate(&new_owner)?;
        OWNER.save(deps.storage, &new_owner)?;
        Ok(Response::new().add_attributes(vec![
            attr("action", "update_owner"),
            attr("owner", new_owner),
        ]))
    }

    pub fn set_dao(deps: DepsMut, info: MessageInfo, dao: String) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info)?;
        let dao = deps.api.addr_validate(&dao)?;
        DAO.save(deps.storage, &dao)?;
        Ok(Response::new().add_attributes(vec![attr("action", "set_dao"), attr("dao", dao)]))
    }

    pub fn set_tax_address(
        deps: DepsMut,
        info: MessageInfo,
        tax_address: String,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info)?;
        let tax_address = deps.api.addr_validate(&tax_address)?;
        CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
            config.tax_address = tax_address.clone();
            Ok(config)
        })?;
        Ok(Response::new().add_attributes(vec![
            attr("action", "set_tax_address"),
            attr("tax_address", tax_address),
        ]))
    }

    pub fn set_anti_liq_bot(
        deps: DepsMut,
        info: MessageInfo,
        enabled: bool,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info)?;
        ANTI_LIQ_BOT.save(deps.storage, &enabled)?;
        Ok(Response::new().add_attributes(vec![
            attr("action", "set_anti_liq_bot"),
            attr("enabled", enabled.to_string()),
        ]))
    }

    pub fn set_myobu_swap(
        deps: DepsMut,
        info: MessageInfo,
        operator: String,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info)?;
        let operator = deps.api.addr_validate(&operator)?;
        MYOBU_SWAP.save(deps.storage, &operator)?;
        Ok(Response::new().add_attributes(vec![
            attr("action", "set_myobu_swap"),
            attr("operator", operator),
        ]))
    }

    /// One-way switch; a second call fails with `AlreadyOpen`.
    pub fn open_trading(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info)?;
        if TRADING_OPEN.load(deps.storage)? {
            return Err(ContractError::AlreadyOpen {});
        }
        if !PRIMARY_PAIR.exists(deps.storage) {
            return Err(ContractError::LiquidityNotAdded {});
        }
        TRADING_OPEN.save(deps.storage, &true)?;
        Ok(Response::new().add_attribute("action", "open_trading"))
    }

    pub fn set_swap_threshold(
        deps: DepsMut,
        info: MessageInfo,
        threshold: Uint128,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info)?;
        CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
            config.swap_threshold = threshold;
            Ok(config)
        })?;
        Ok(Response::new().add_attributes(vec![
            attr("action", "set_swap_threshold"),
            attr("threshold", threshold),
        ]))
    }

    pub fn set_fees(
        deps: DepsMut,
        info: MessageInfo,
        fees: FeeParams,
    ) -> Result<Response, ContractError> {
        assert_owner_or_dao(deps.storage, &info)?;
        fees.validate()?;
        FEES.save(deps.storage, &fees)?;
        Ok(Response::new().add_attributes(vec![
            attr("action", "set_fees"),
            attr("impact", fees.impact.to_string()),
            attr("tax_fee", fees.tax_fee.to_string()),
            attr("buy_fee", fees.buy_fee.to_string()),
            attr("sell_fee", fees.sell_fee.to_string()),
            attr("transfer_fee", fees.transfer_fee.to_string()),
        ]))
    }

    /// Registers a taxed pair and lets its router spend the contract's tokens.
    pub fn add_dex(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        pair: String,
        router: String,
    ) -> Result<Response, ContractError> {
        assert_owner_or_dao(deps.storage, &info)?;
        let pair_addr = deps.api.addr_validate(&pair)?;
        let router_addr = deps.api.addr_validate(&router)?;
        if DEX_PAIRS.has(deps.storage, &pair_addr) {
            return Err(ContractError::PairAlreadyRegistered { pair });
        }

        DEX_PAIRS.save(deps.storage, &pair_addr, &router_addr)?;
        set_allowance(
            deps.storage,
            &env.contract.address,
            &router_addr,
            Uint128::MAX,
        )?;

        Ok(Response::new().add_attributes(vec![
            attr("action", "add_dex"),
            attr("pair", pair),
            attr("router", router),
        ]))
    }

    pub fn remove_dex(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        pair: String,
    ) -> Result<Response, ContractError> {
        assert_owner_or_dao(deps.storage, &info)?;
        let pair_addr = deps.api.addr_validate(&pair)?;
        let router = DEX_PAIRS
            .may_load(deps.storage, &pair_addr)?
            .ok_or_else(|| ContractError::PairNotRegistered { pair: pair.clone() })?;
        if PRIMARY_PAIR.may_load(deps.storage)? == Some(pair_addr.clone()) {
            return Err(ContractError::CannotRemovePrimaryPair {});
        }

        DEX_PAIRS.remove(deps.storage, &pair_addr);
        // routers may serve several pairs
        let router_in_use = DEX_PAIRS
            .range(deps.storage, None, None, Order::Ascending)
            .collect::<StdResult<Vec<_>>>()?
            .iter()
            .any(|(_, other)| other == &router);
        if !router_in_use {
            set_allowance(deps.storage, &env.contract.address, &router, Uint128::zero())?;
        }

        Ok(Response::new().add_attributes(vec![
            attr("action", "remove_dex"),
            attr("pair", pair),
            attr("router_revoked", (!router_in_use).to_string()),
        ]))
    }

    pub fn set_taxed_transfer_for(
        deps: DepsMut,
        info: MessageInfo,
        addresses: Vec<String>,
        taxed: bool,
    ) -> Result<Response, ContractError> {
        assert_owner_or_dao(deps.storage, &info)?;
        for address in &addresses {
            let addr = deps.api.addr_validate(address)?;
            if taxed {
                TAXED_TRANSFERS.save(deps.storage, &addr, &true)?;
            } else {
                TAXED_TRANSFERS.remove(deps.storage, &addr);
            }
        }
        let action = if taxed {
            "set_taxed_transfer_for"
        } else {
            "remove_taxed_transfer_for"
        };
        Ok(Response::new().add_attributes(vec![
            attr("action", action),
            attr("addresses", addresses.join(",")),
        ]))
    }

    pub fn snapshot(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
        assert_owner_or_dao(deps.storage, &info)?;
        let snapshot_id = ledger::take_snapshot(deps.storage)?;
        Ok(Response::new()
            .add_attributes(vec![
                attr("action", "snapshot"),
                attr("snapshot_id", snapshot_id.to_string()),
            ])
            .set_data(to_json_binary(&SnapshotIdResponse { snapshot_id })?))
    }
}

pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let res = match msg {
        // ======= Token surface =======
        QueryMsg::Balance { address } => to_json_binary(&query::balance(deps, address)?),
        QueryMsg::TokenInfo {} => to_json_binary(&query::token_info()),
        QueryMsg::Allowance { owner, spender } => {
            to_json_binary(&query_allowance(deps, owner, spender)?)
        }
        QueryMsg::AllAllowances {
            owner,
            start_after,
            limit,
        } => to_json_binary(&query_owner_allowances(deps, owner, start_after, limit)?),
        QueryMsg::AllSpenderAllowances {
            spender,
            start_after,
            limit,
        } => to_json_binary(&query_spender_allowances(
            deps,
            spender,
            start_after,
            limit,
        )?),

        // ======= Fees and registry =======
        QueryMsg::CurrentFees {} => to_json_binary(&FEES.load(deps.storage)?),
        QueryMsg::TaxedPair { pair } => to_json_binary(&query::taxed_pair(deps, pair)?),
        QueryMsg::Dexes {} => to_json_binary(&query::dexes(deps)?),
        QueryMsg::TaxedTransfer { address } => {
            to_json_binary(&query::taxed_transfer(deps, address)?)
        }

        // ======= Authority =======
        QueryMsg::Owner {} => to_json_binary(&OwnerResponse {
            owner: OWNER.load(deps.storage)?,
        }),
        QueryMsg::Dao {} => to_json_binary(&DaoResponse {
            dao: DAO.may_load(deps.storage)?,
        }),
        QueryMsg::Config {} => to_json_binary(&query::config(deps)?),

        // ======= Reflection and snapshots =======
        QueryMsg::ReflectionInfo {} => to_json_binary(&query::reflection_info(deps)?),
        QueryMsg::CurrentSnapshotId {} => to_json_binary(&SnapshotIdResponse {
            snapshot_id: ledger::current_snapshot_id(deps.storage)?,
        }),
        QueryMsg::BalanceAt {
            address,
            snapshot_id,
        } => to_json_binary(&query::balance_at(deps, address, snapshot_id)?),
        QueryMsg::SnapshotRate { snapshot_id } => to_json_binary(&RateResponse {
            rate: ledger::rate_at(deps.storage, snapshot_id)?,
        }),
    }?;
    Ok(res)
}

pub mod query {
    use super::*;

    pub fn balance(deps: Deps, address: String) -> Result<BalanceResponse, ContractError> {
        let address = deps.api.addr_validate(&address)?;
        let balance = ledger::balance_of(deps.storage, &address)?;
        Ok(BalanceResponse { balance })
    }

    pub fn token_info() -> TokenInfoResponse {
        TokenInfoResponse {
            name: TOKEN_NAME.to_string(),
            symbol: TOKEN_SYMBOL.to_string(),
            decimals: DECIMALS,
            total_supply: TOTAL_SUPPLY,
        }
    }

    pub fn taxed_pair(deps: Deps, pair: String) -> StdResult<TaxedPairResponse> {
        let pair = deps.api.addr_validate(&pair)?;
        Ok(TaxedPairResponse {
            taxed: DEX_PAIRS.has(deps.storage, &pair),
        })
    }

    pub fn dexes(deps: Deps) -> StdResult<DexesResponse> {
        let dexes = DEX_PAIRS
            .range(deps.storage, None, None, Order::Ascending)
            .map(|item| item.map(|(pair, router)| DexInfo { pair, router }))
            .collect::<StdResult<Vec<_>>>()?;
        Ok(DexesResponse { dexes })
    }

    pub fn taxed_transfer(deps: Deps, address: String) -> StdResult<TaxedTransferResponse> {
        let address = deps.api.addr_validate(&address)?;
        Ok(TaxedTransferResponse {
            taxed: TAXED_TRANSFERS.has(deps.storage, &address),
        })
    }

    pub fn config(deps: Deps) -> StdResult<ConfigResponse> {
        let config = CONFIG.load(deps.storage)?;
        Ok(ConfigResponse {
            owner: OWNER.load(deps.storage)?,
            dao: DAO.may_load(deps.storage)?,
            tax_address: config.tax_address,
            native_denom: config.native_denom,
            trading_open: TRADING_OPEN.load(deps.storage)?,
            anti_liq_bot: ANTI_LIQ_BOT.load(deps.storage)?,
            myobu_swap: MYOBU_SWAP.may_load(deps.storage)?,
            primary_pair: PRIMARY_PAIR.may_load(deps.storage)?,
            swap_threshold: config.swap_threshold,
        })
    }

    pub fn reflection_info(deps: Deps) -> Result<ReflectionInfoResponse, ContractError> {
        let reflected_supply = REFLECTED_SUPPLY.load(deps.storage)?;
        Ok(ReflectionInfoResponse {
            rate: ledger::rate_for(reflected_supply)?,
            reflected_supply,
            total_reflected: TOTAL_REFLECTED.load(deps.storage)?,
        })
    }

    pub fn balance_at(
        deps: Deps,
        address: String,
        snapshot_id: u64,
    ) -> Result<BalanceResponse, ContractError> {
        let address = deps.api.addr_validate(&address)?;
        let balance = ledger::balance_at(deps.storage, &address, snapshot_id)?;
        Ok(BalanceResponse { balance })
    }
}

pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        SWAP_REPLY_ID => distribute::swap_reply(deps, env, msg.result),
        AUTO_DISTRIBUTE_REPLY_ID => distribute::auto_distribute_reply(msg.result),
        ADD_LIQUIDITY_REPLY_ID => liquidity::add_liquidity_reply(deps, env),
        REMOVE_LIQUIDITY_REPLY_ID => liquidity::remove_liquidity_reply(deps, env),
        id => Err(ContractError::InvalidReplyId { id }),
    }
}

pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new().add_attribute("action", "migrate"))
}
