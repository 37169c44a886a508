use classic_terraswap::asset::AssetInfo;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128, Uint256};
use cw_storage_plus::{Item, Map, SnapshotItem, SnapshotMap, Strategy};

#[cw_serde]
pub struct Config {
    pub tax_address: Addr,
    pub native_denom: String,
    pub swap_threshold: Uint128,
}
pub const CONFIG: Item<Config> = Item::new("config");

/// Whole percentages. `tax_fee` is the reflection fee, the other three are
/// the per-category fee kept by the contract.
#[cw_serde]
pub struct FeeParams {
    pub impact: u64,
    pub tax_fee: u64,
    pub buy_fee: u64,
    pub sell_fee: u64,
    pub transfer_fee: u64,
}

impl Default for FeeParams {
    fn default() -> Self {
        FeeParams {
            impact: 1,
            tax_fee: 0,
            buy_fee: 10,
            sell_fee: 10,
            transfer_fee: 10,
        }
    }
}
pub const FEES: Item<FeeParams> = Item::new("fees");

pub const OWNER: Item<Addr> = Item::new("owner");
pub const DAO: Item<Addr> = Item::new("dao");
pub const MYOBU_SWAP: Item<Addr> = Item::new("myobu_swap");
pub const TRADING_OPEN: Item<bool> = Item::new("trading_open");
pub const ANTI_LIQ_BOT: Item<bool> = Item::new("anti_liq_bot");

// pair -> router
pub const DEX_PAIRS: Map<&Addr, Addr> = Map::new("dex_pairs");
pub const PRIMARY_PAIR: Item<Addr> = Item::new("primary_pair");
pub const TAXED_TRANSFERS: Map<&Addr, bool> = Map::new("taxed_transfers");

// reflection ledger, versioned by snapshot id
pub const SHARES: SnapshotMap<&Addr, Uint256> = SnapshotMap::new(
    "shares",
    "shares__checkpoints",
    "shares__changelog",
    Strategy::Selected,
);
pub const REFLECTED_SUPPLY: SnapshotItem<Uint256> = SnapshotItem::new(
    "reflected_supply",
    "reflected_supply__checkpoints",
    "reflected_supply__changelog",
    Strategy::Selected,
);
pub const TOTAL_REFLECTED: Item<Uint128> = Item::new("total_reflected");
pub const CURRENT_SNAPSHOT_ID: Item<u64> = Item::new("current_snapshot_id");

#[cw_serde]
pub enum PendingOperation {
    SwapFees {
        router: Addr,
        native_before: Uint128,
        distribute: bool,
    },
    AddLiquidity {
        provider: Addr,
        pair: Addr,
        token_supplied: Uint128,
        token_min: Uint128,
        token_before: Uint128,
        counter_asset: AssetInfo,
        counter_supplied: Uint128,
        counter_min: Uint128,
        counter_before: Uint128,
    },
    RemoveLiquidity {
        recipient: Addr,
        token_min: Uint128,
        token_before: Uint128,
        counter_asset: AssetInfo,
        counter_min: Uint128,
        counter_before: Uint128,
    },
}

#[cw_serde]
pub struct CachedData {
    pub locked: bool,
    pub operation: Option<PendingOperation>,
}
pub const CACHE: Item<CachedData> = Item::new("cache");
