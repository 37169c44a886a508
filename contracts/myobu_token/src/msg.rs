use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128, Uint256};
use cw20::Expiration;

use crate::state::FeeParams;

#[cw_serde]
pub struct InstantiateMsg {
    /// Receives the native proceeds of swapped fees.
    pub tax_address: String,
    /// Bank denom of the settlement asset the primary pair trades against.
    pub native_denom: String,
    pub fees: Option<FeeParams>,
    pub swap_threshold: Option<Uint128>,
}

#[cw_serde]
pub struct MigrateMsg {}

/// Parameters of the native-asset liquidity calls. For a deposit
/// `amount_token_or_lp` is the token amount and the native leg is attached as
/// funds; for a withdrawal it is the LP amount.
#[cw_serde]
pub struct LiquidityEthParams {
    pub pair: String,
    pub to: String,
    pub amount_token_or_lp: Uint128,
    pub amount_token_min: Uint128,
    pub amount_eth_min: Uint128,
    pub deadline: u64,
}

#[cw_serde]
pub struct AddLiquidityParams {
    pub pair: String,
    pub to: String,
    pub amount_token: Uint128,
    pub amount_token_b: Uint128,
    pub amount_token_min: Uint128,
    pub amount_token_b_min: Uint128,
    pub deadline: u64,
}

#[cw_serde]
pub struct RemoveLiquidityParams {
    pub pair: String,
    pub to: String,
    pub amount_lp: Uint128,
    pub amount_token_min: Uint128,
    pub amount_token_b_min: Uint128,
    pub deadline: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    // ======= Token surface =======
    Transfer {
        recipient: String,
        amount: Uint128,
    },
    TransferFrom {
        owner: String,
        recipient: String,
        amount: Uint128,
    },
    /// Moves tokens to a contract and notifies it with the amount it actually
    /// received.
    Send {
        contract: String,
        amount: Uint128,
        msg: Binary,
    },
    SendFrom {
        owner: String,
        contract: String,
        amount: Uint128,
        msg: Binary,
    },
    /// Overwrites the spender's allowance.
    Approve {
        spender: String,
        amount: Uint128,
    },
    IncreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
    DecreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },

    // ======= Authority =======
    UpdateOwner {
        new_owner: String,
    },
    SetDao {
        dao: String,
    },
    SetTaxAddress {
        tax_address: String,
    },
    SetAntiLiqBot {
        enabled: bool,
    },
    SetMyobuSwap {
        operator: String,
    },
    OpenTrading {},
    SetSwapThreshold {
        threshold: Uint128,
    },
    SetFees {
        fees: FeeParams,
    },

    // ======= Pair registry =======
    AddDex {
        pair: String,
        router: String,
    },
    RemoveDex {
        pair: String,
    },
    SetTaxedTransferFor {
        addresses: Vec<String>,
    },
    RemoveTaxedTransferFor {
        addresses: Vec<String>,
    },

    // ======= Fee conversion =======
    /// Seeds the primary native pair with the contract's token balance and the
    /// attached funds.
    AddLiquidity {
        pair: String,
        router: String,
    },
    ManualSwap {},
    ManualSend {},
    /// Only callable by the contract itself.
    SwapAndDistribute {},

    Snapshot {},

    // ======= Fee-free liquidity =======
    NoFeeAddLiquidityEth(LiquidityEthParams),
    NoFeeRemoveLiquidityEth(LiquidityEthParams),
    NoFeeAddLiquidity(AddLiquidityParams),
    NoFeeRemoveLiquidity(RemoveLiquidityParams),
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    // ======= Token surface =======
    #[returns(cw20::BalanceResponse)]
    Balance { address: String },
    #[returns(cw20::TokenInfoResponse)]
    TokenInfo {},
    #[returns(cw20::AllowanceResponse)]
    Allowance { owner: String, spender: String },
    #[returns(cw20::AllAllowancesResponse)]
    AllAllowances {
        owner: String,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(cw20::AllSpenderAllowancesResponse)]
    AllSpenderAllowances {
        spender: String,
        start_after: Option<String>,
        limit: Option<u32>,
    },

    // ======= Fees and registry =======
    #[returns(FeeParams)]
    CurrentFees {},
    #[returns(TaxedPairResponse)]
    TaxedPair { pair: String },
    #[returns(DexesResponse)]
    Dexes {},
    #[returns(TaxedTransferResponse)]
    TaxedTransfer { address: String },

    // ======= Authority =======
    #[returns(OwnerResponse)]
    Owner {},
    #[returns(DaoResponse)]
    Dao {},
    #[returns(ConfigResponse)]
    Config {},

    // ======= Reflection and snapshots =======
    #[returns(ReflectionInfoResponse)]
    ReflectionInfo {},
    #[returns(SnapshotIdResponse)]
    CurrentSnapshotId {},
    /// Balance of `address` as captured by `snapshot_id`.
    #[returns(cw20::BalanceResponse)]
    BalanceAt { address: String, snapshot_id: u64 },
    #[returns(RateResponse)]
    SnapshotRate { snapshot_id: u64 },
}

#[cw_serde]
pub struct TaxedPairResponse {
    pub taxed: bool,
}

#[cw_serde]
pub struct DexInfo {
    pub pair: Addr,
    pub router: Addr,
}

#[cw_serde]
pub struct DexesResponse {
    pub dexes: Vec<DexInfo>,
}

#[cw_serde]
pub struct TaxedTransferResponse {
    pub taxed: bool,
}

#[cw_serde]
pub struct OwnerResponse {
    pub owner: Addr,
}

#[cw_serde]
pub struct DaoResponse {
    pub dao: Option<Addr>,
}

#[cw_serde]
pub struct ConfigResponse {
    pub owner: Addr,
    pub dao: Option<Addr>,
    pub tax_address: Addr,
    pub native_denom: String,
    pub trading_open: bool,
    pub anti_liq_bot: bool,
    pub myobu_swap: Option<Addr>,
    pub primary_pair: Option<Addr>,
    pub swap_threshold: Uint128,
}

#[cw_serde]
pub struct ReflectionInfoResponse {
    pub rate: Uint256,
    pub reflected_supply: Uint256,
    pub total_reflected: Uint128,
}

#[cw_serde]
pub struct SnapshotIdResponse {
    pub snapshot_id: u64,
}

#[cw_serde]
pub struct RateResponse {
    pub rate: Uint256,
}

/// Data returned by the fee-free liquidity calls: the amounts the pair
/// actually consumed (deposit) or paid out (withdrawal).
#[cw_serde]
pub struct LiquidityResponse {
    pub amount_token: Uint128,
    pub amount_counter: Uint128,
}
