use cosmwasm_std::{
    ConversionOverflowError, DivideByZeroError, OverflowError, StdError, Uint128,
};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    StdError(#[from] StdError),
    #[error("{0}")]
    Overflow(#[from] OverflowError),
    #[error("{0}")]
    DivideByZero(#[from] DivideByZeroError),
    #[error("{0}")]
    ConversionOverflow(#[from] ConversionOverflowError),
    #[error("{0}")]
    Cw20(#[from] cw20_base::ContractError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Zero amount")]
    ZeroAmount {},
    #[error("Invalid spender")]
    InvalidSpender {},
    #[error("Deadline {deadline} expired at {now}")]
    DeadlineExpired { deadline: u64, now: u64 },
    #[error("Price impact ceiling must be between 1 and 100, got {impact}")]
    InvalidPriceImpact { impact: u64 },
    #[error("Total {category} fee must be below 50%, got {total}%")]
    FeeTooHigh { category: String, total: u64 },
    #[error("Expected a single {denom} coin")]
    InvalidFunds { denom: String },

    #[error("Pair {pair} already registered")]
    PairAlreadyRegistered { pair: String },
    #[error("Pair {pair} not registered")]
    PairNotRegistered { pair: String },
    #[error("Primary pair cannot be removed")]
    CannotRemovePrimaryPair {},
    #[error("Pair {pair} is already routed through {router}")]
    RouterMismatch { pair: String, router: String },
    #[error("Pair {pair} is not supported")]
    UnsupportedPair { pair: String },
    #[error("Pair {pair} does not hold the expected assets")]
    PairAssetMismatch { pair: String },
    #[error("Trading is not open")]
    TradingNotOpen {},
    #[error("Trading already open")]
    AlreadyOpen {},
    #[error("Liquidity not added")]
    LiquidityNotAdded {},
    #[error("Liquidity already added")]
    LiquidityAlreadyAdded {},
    #[error("Liquidity operations are restricted until trading opens")]
    AntiBotBlock {},
    #[error("Reentrant call blocked")]
    ReentrancyBlocked {},
    #[error("Snapshot {id} not found")]
    SnapshotNotFound { id: u64 },

    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance {
        available: Uint128,
        required: Uint128,
    },
    #[error("Reflection would exhaust the share supply")]
    ReflectionExhausted {},
    #[error("Sell of {amount} exceeds price impact limit of {max_amount}")]
    PriceImpactExceeded { amount: Uint128, max_amount: Uint128 },

    #[error("Swap failed")]
    SwapFailed {},
    #[error("Nothing to send")]
    NothingToSend {},
    #[error("Received {actual} {asset}, below minimum {minimum}")]
    SlippageExceeded {
        asset: String,
        minimum: Uint128,
        actual: Uint128,
    },
    #[error("Invalid reply id {id}")]
    InvalidReplyId { id: u64 },
}
