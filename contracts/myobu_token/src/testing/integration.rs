use classic_terraswap::{
    asset::{Asset, AssetInfo},
    pair::{Cw20HookMsg as PairCw20HookMsg, ExecuteMsg as PairExecuteMsg},
};
use cosmwasm_std::{coin, to_json_binary, Addr, Coin, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg, MinterResponse};
use cw20_base::{
    contract::{execute as cw20_execute, instantiate as cw20_instantiate, query as cw20_query},
    msg::InstantiateMsg as Cw20InstantiateMsg,
};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};

use super::{mock_dex, DENOM, OWNER, POOL_NATIVE, POOL_TOKENS, TAX};
use crate::{
    contract::{execute, instantiate, query, reply},
    error::ContractError,
    msg::{
        AddLiquidityParams, ExecuteMsg, InstantiateMsg, LiquidityEthParams, QueryMsg,
        RemoveLiquidityParams,
    },
};

const PROVIDER: &str = "provider";
const BUYER: &str = "buyer";
const SELLER: &str = "seller";
const OPERATOR: &str = "operator";
const WALLET_NATIVE: u128 = 1_000_000_000_000;
const ONE_TOKEN_PCT: u128 = 1_000_000_000_000_000_000;

struct Suite {
    app: App,
    token: Addr,
    pair: Addr,
    router: Addr,
    lp_token: Addr,
}

impl Suite {
    fn new() -> Self {
        let mut app = App::new(|router, _, storage| {
            for (holder, amount) in [
                (OWNER, WALLET_NATIVE * 10),
                (PROVIDER, WALLET_NATIVE),
                (BUYER, WALLET_NATIVE),
                (OPERATOR, WALLET_NATIVE),
            ] {
                router
                    .bank
                    .init_balance(storage, &Addr::unchecked(holder), vec![coin(amount, DENOM)])
                    .unwrap();
            }
        });

        let token_code = ContractWrapper::new(execute, instantiate, query).with_reply(reply);
        let token_code_id = app.store_code(Box::new(token_code));
        let token = app
            .instantiate_contract(
                token_code_id,
                Addr::unchecked(OWNER),
                &InstantiateMsg {
                    tax_address: TAX.to_string(),
                    native_denom: DENOM.to_string(),
                    fees: None,
                    swap_threshold: Some(Uint128::MAX),
                },
                &[],
                "Myobu",
                None,
            )
            .unwrap();

        let (pair, lp_token) = Self::create_pair(
            &mut app,
            [
                AssetInfo::Token {
                    contract_addr: token.to_string(),
                },
                AssetInfo::NativeToken {
                    denom: DENOM.to_string(),
                },
            ],
        );

        let router_code_id = app.store_code(mock_dex::router_contract());
        let router = app
            .instantiate_contract(
                router_code_id,
                Addr::unchecked(OWNER),
                &mock_dex::router::InstantiateMsg {
                    pair: pair.to_string(),
                },
                &[],
                "Router",
                None,
            )
            .unwrap();

        Suite {
            app,
            token,
            pair,
            router,
            lp_token,
        }
    }

    fn cw20_code_id(app: &mut App) -> u64 {
        let code = ContractWrapper::new(cw20_execute, cw20_instantiate, cw20_query);
        app.store_code(Box::new(code))
    }

    fn instantiate_cw20(
        app: &mut App,
        symbol: &str,
        initial_balances: Vec<Cw20Coin>,
    ) -> Addr {
        let code_id = Self::cw20_code_id(app);
        app.instantiate_contract(
            code_id,
            Addr::unchecked(OWNER),
            &Cw20InstantiateMsg {
                name: symbol.to_string(),
                symbol: symbol.to_string(),
                decimals: 6,
                initial_balances,
                mint: Some(MinterResponse {
                    minter: OWNER.to_string(),
                    cap: None,
                }),
                marketing: None,
            },
            &[],
            symbol,
            None,
        )
        .unwrap()
    }

    // pair plus its LP token, minting handed over to the pair
    fn create_pair(app: &mut App, asset_infos: [AssetInfo; 2]) -> (Addr, Addr) {
        let lp_token = Self::instantiate_cw20(app, "MYOBU-LP", vec![]);
        let pair_code_id = app.store_code(mock_dex::pair_contract());
        let pair = app
            .instantiate_contract(
                pair_code_id,
                Addr::unchecked(OWNER),
                &mock_dex::pair::InstantiateMsg {
                    asset_infos,
                    liquidity_token: lp_token.to_string(),
                },
                &[],
                "Pair",
                None,
            )
            .unwrap();
        app.execute_contract(
            Addr::unchecked(OWNER),
            lp_token.clone(),
            &Cw20ExecuteMsg::UpdateMinter {
                new_minter: Some(pair.to_string()),
            },
            &[],
        )
        .unwrap();
        (pair, lp_token)
    }

    /// Seeds the primary pair; trading stays closed.
    fn add_initial_liquidity(&mut self) {
        self.execute(
            OWNER,
            ExecuteMsg::Transfer {
                recipient: self.token.to_string(),
                amount: POOL_TOKENS,
            },
        )
        .unwrap();
        self.app
            .execute_contract(
                Addr::unchecked(OWNER),
                self.token.clone(),
                &ExecuteMsg::AddLiquidity {
                    pair: self.pair.to_string(),
                    router: self.router.to_string(),
                },
                &[coin(POOL_NATIVE, DENOM)],
            )
            .unwrap();
    }

    fn launch() -> Self {
        let mut suite = Suite::new();
        suite.add_initial_liquidity();
        suite.execute(OWNER, ExecuteMsg::OpenTrading {}).unwrap();
        suite
    }

    fn execute(&mut self, sender: &str, msg: ExecuteMsg) -> anyhow::Result<AppResponse> {
        self.execute_with_funds(sender, msg, &[])
    }

    fn execute_with_funds(
        &mut self,
        sender: &str,
        msg: ExecuteMsg,
        funds: &[Coin],
    ) -> anyhow::Result<AppResponse> {
        self.app
            .execute_contract(Addr::unchecked(sender), self.token.clone(), &msg, funds)
    }

    fn balance(&self, address: impl Into<String>) -> Uint128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                self.token.clone(),
                &QueryMsg::Balance {
                    address: address.into(),
                },
            )
            .unwrap();
        res.balance
    }

    fn cw20_balance(&self, token: &Addr, address: impl Into<String>) -> Uint128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                token.clone(),
                &Cw20QueryMsg::Balance {
                    address: address.into(),
                },
            )
            .unwrap();
        res.balance
    }

    fn native(&self, address: impl Into<String>) -> Uint128 {
        self.app
            .wrap()
            .query_balance(address, DENOM)
            .unwrap()
            .amount
    }

    fn deadline(&self) -> u64 {
        self.app.block_info().time.seconds() + 600
    }

    fn fund(&mut self, recipient: &str, amount: u128) {
        self.execute(
            OWNER,
            ExecuteMsg::Transfer {
                recipient: recipient.to_string(),
                amount: Uint128::new(amount),
            },
        )
        .unwrap();
    }

    fn approve_cw20(&mut self, token: &Addr, owner: &str, amount: u128) {
        self.app
            .execute_contract(
                Addr::unchecked(owner),
                token.clone(),
                &Cw20ExecuteMsg::IncreaseAllowance {
                    spender: self.token.to_string(),
                    amount: Uint128::new(amount),
                    expires: None,
                },
                &[],
            )
            .unwrap();
    }

    fn sell(&mut self, seller: &str, amount: u128) -> anyhow::Result<AppResponse> {
        self.execute(
            seller,
            ExecuteMsg::Send {
                contract: self.pair.to_string(),
                amount: Uint128::new(amount),
                msg: to_json_binary(&PairCw20HookMsg::Swap {
                    belief_price: None,
                    max_spread: None,
                    to: None,
                    deadline: None,
                })
                .unwrap(),
            },
        )
    }

    fn buy(&mut self, buyer: &str, native: u128) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            Addr::unchecked(buyer),
            self.pair.clone(),
            &PairExecuteMsg::Swap {
                offer_asset: Asset {
                    info: AssetInfo::NativeToken {
                        denom: DENOM.to_string(),
                    },
                    amount: Uint128::new(native),
                },
                belief_price: None,
                max_spread: None,
                to: None,
                deadline: None,
            },
            &[coin(native, DENOM)],
        )
    }

    fn set_router_halted(&mut self, halted: bool) {
        self.app
            .execute_contract(
                Addr::unchecked(OWNER),
                self.router.clone(),
                &mock_dex::router::ExecuteMsg::SetHalted { halted },
                &[],
            )
            .unwrap();
    }

    fn eth_params(&self, amount: u128, token_min: u128, eth_min: u128) -> LiquidityEthParams {
        LiquidityEthParams {
            pair: self.pair.to_string(),
            to: PROVIDER.to_string(),
            amount_token_or_lp: Uint128::new(amount),
            amount_token_min: Uint128::new(token_min),
            amount_eth_min: Uint128::new(eth_min),
            deadline: self.deadline(),
        }
    }
}

fn has_wasm_attr(res: &AppResponse, key: &str, value: &str) -> bool {
    res.events.iter().any(|event| {
        event.ty == "wasm"
            && event
                .attributes
                .iter()
                .any(|attr| attr.key == key && attr.value == value)
    })
}

#[test]
fn bootstrap_and_buy_through_pair() {
    let mut suite = Suite::launch();
    let contract = suite.token.to_string();
    assert_eq!(suite.balance(suite.pair.to_string()), POOL_TOKENS);
    assert_eq!(suite.native(suite.pair.to_string()), Uint128::new(POOL_NATIVE));
    assert_eq!(suite.cw20_balance(&suite.lp_token, OWNER), POOL_TOKENS);
    assert_eq!(suite.balance(contract.clone()), Uint128::zero());

    let offer = 1_000_000_000u128;
    let bought = POOL_TOKENS.multiply_ratio(offer, POOL_NATIVE + offer);
    let res = suite.buy(BUYER, offer).unwrap();
    assert!(has_wasm_attr(&res, "category", "buy"));

    let received = bought.multiply_ratio(90u128, 100u128);
    assert_eq!(suite.balance(BUYER), received);
    assert_eq!(suite.balance(contract), bought - received);
    assert_eq!(
        suite.native(BUYER),
        Uint128::new(WALLET_NATIVE - offer)
    );
}

#[test]
fn sell_guard_rejects_large_sells() {
    let mut suite = Suite::launch();
    suite.fund(SELLER, 10 * ONE_TOKEN_PCT);

    let err = suite.sell(SELLER, 2 * ONE_TOKEN_PCT).unwrap_err();
    assert_eq!(
        ContractError::PriceImpactExceeded {
            amount: Uint128::new(2 * ONE_TOKEN_PCT),
            max_amount: Uint128::new(ONE_TOKEN_PCT),
        },
        err.downcast().unwrap()
    );
    assert_eq!(suite.balance(SELLER), Uint128::new(10 * ONE_TOKEN_PCT));

    suite.sell(SELLER, ONE_TOKEN_PCT / 2).unwrap();
    assert!(suite.native(SELLER) > Uint128::zero());
}

#[test]
fn auto_swap_sends_proceeds_to_tax_wallet() {
    let mut suite = Suite::launch();
    suite.fund(SELLER, ONE_TOKEN_PCT);
    suite
        .execute(
            OWNER,
            ExecuteMsg::SetSwapThreshold {
                threshold: Uint128::one(),
            },
        )
        .unwrap();

    let res = suite.sell(SELLER, ONE_TOKEN_PCT / 10).unwrap();
    assert!(has_wasm_attr(&res, "action", "swap_and_distribute"));
    assert!(has_wasm_attr(&res, "action", "swap_fees_reply"));

    assert!(suite.native(TAX) > Uint128::zero());
    assert!(suite.native(SELLER) > Uint128::zero());
    assert_eq!(suite.balance(suite.token.to_string()), Uint128::zero());
    assert_eq!(suite.native(suite.token.to_string()), Uint128::zero());
    assert_eq!(suite.balance(suite.router.to_string()), Uint128::zero());
}

#[test]
fn failed_auto_swap_keeps_the_trade() {
    let mut suite = Suite::launch();
    suite.fund(SELLER, ONE_TOKEN_PCT);
    suite
        .execute(
            OWNER,
            ExecuteMsg::SetSwapThreshold {
                threshold: Uint128::one(),
            },
        )
        .unwrap();
    suite.set_router_halted(true);

    let amount = ONE_TOKEN_PCT / 10;
    let res = suite.sell(SELLER, amount).unwrap();
    assert!(has_wasm_attr(&res, "action", "skip_fee_distribution"));

    // the sell settled, the fee stayed with the contract
    assert!(suite.native(SELLER) > Uint128::zero());
    assert_eq!(
        suite.balance(SELLER),
        Uint128::new(ONE_TOKEN_PCT - amount)
    );
    assert_eq!(
        suite.balance(suite.token.to_string()),
        Uint128::new(amount / 10)
    );
    assert_eq!(suite.balance(suite.router.to_string()), Uint128::zero());
    assert_eq!(suite.native(TAX), Uint128::zero());

    // nothing left locked once the router is back
    suite.set_router_halted(false);
    suite.execute(TAX, ExecuteMsg::ManualSwap {}).unwrap();
    assert_eq!(suite.balance(suite.token.to_string()), Uint128::zero());
}

#[test]
fn manual_swap_then_send() {
    let mut suite = Suite::launch();
    suite.buy(BUYER, 1_000_000_000).unwrap();
    let contract = suite.token.to_string();
    assert!(suite.balance(contract.clone()) > Uint128::zero());

    let res = suite.execute(TAX, ExecuteMsg::ManualSwap {}).unwrap();
    assert!(has_wasm_attr(&res, "action", "swap_fees_reply"));
    let proceeds = suite.native(contract.clone());
    assert!(proceeds > Uint128::zero());
    assert_eq!(suite.balance(contract.clone()), Uint128::zero());
    assert_eq!(suite.native(TAX), Uint128::zero());

    let err = suite.execute(OWNER, ExecuteMsg::ManualSwap {}).unwrap_err();
    assert_eq!(ContractError::ZeroAmount {}, err.downcast().unwrap());

    suite.execute(OWNER, ExecuteMsg::ManualSend {}).unwrap();
    assert_eq!(suite.native(TAX), proceeds);
    assert_eq!(suite.native(contract), Uint128::zero());

    let err = suite.execute(OWNER, ExecuteMsg::ManualSend {}).unwrap_err();
    assert_eq!(ContractError::NothingToSend {}, err.downcast().unwrap());
}

#[test]
fn manual_swap_with_halted_router_fails() {
    let mut suite = Suite::launch();
    suite.buy(BUYER, 1_000_000_000).unwrap();
    let fees = suite.balance(suite.token.to_string());
    suite.set_router_halted(true);

    let err = suite.execute(TAX, ExecuteMsg::ManualSwap {}).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        ContractError::SwapFailed {}.to_string()
    );
    assert_eq!(suite.balance(suite.token.to_string()), fees);
}

#[test]
fn native_liquidity_round_trip_is_fee_free() {
    let mut suite = Suite::launch();
    let amount = ONE_TOKEN_PCT;
    suite.fund(PROVIDER, amount);

    let res = suite
        .execute_with_funds(
            PROVIDER,
            ExecuteMsg::NoFeeAddLiquidityEth(suite.eth_params(amount, amount, 10_000_000_000)),
            &[coin(20_000_000_000, DENOM)],
        )
        .unwrap();
    assert!(has_wasm_attr(&res, "refund_counter", "10000000000"));

    assert_eq!(suite.balance(PROVIDER), Uint128::zero());
    assert_eq!(suite.cw20_balance(&suite.lp_token, PROVIDER), Uint128::new(amount));
    assert_eq!(
        suite.native(PROVIDER),
        Uint128::new(WALLET_NATIVE - 10_000_000_000)
    );
    assert_eq!(suite.balance(suite.token.to_string()), Uint128::zero());
    assert_eq!(suite.native(suite.token.to_string()), Uint128::zero());

    let lp_token = suite.lp_token.clone();
    suite.approve_cw20(&lp_token, PROVIDER, amount);
    let res = suite
        .execute(
            PROVIDER,
            ExecuteMsg::NoFeeRemoveLiquidityEth(suite.eth_params(amount, amount, 10_000_000_000)),
        )
        .unwrap();
    assert!(has_wasm_attr(&res, "action", "no_fee_remove_liquidity_reply"));

    assert_eq!(suite.balance(PROVIDER), Uint128::new(amount));
    assert_eq!(suite.native(PROVIDER), Uint128::new(WALLET_NATIVE));
    assert_eq!(suite.cw20_balance(&suite.lp_token, PROVIDER), Uint128::zero());
    assert_eq!(suite.balance(suite.token.to_string()), Uint128::zero());
    assert_eq!(suite.native(suite.token.to_string()), Uint128::zero());
    assert_eq!(suite.balance(suite.pair.to_string()), POOL_TOKENS);
}

#[test]
fn native_liquidity_slippage_reverts() {
    let mut suite = Suite::launch();
    let amount = ONE_TOKEN_PCT;
    suite.fund(PROVIDER, amount);

    let err = suite
        .execute_with_funds(
            PROVIDER,
            ExecuteMsg::NoFeeAddLiquidityEth(suite.eth_params(amount, 0, 15_000_000_000)),
            &[coin(20_000_000_000, DENOM)],
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        ContractError::SlippageExceeded {
            asset: DENOM.to_string(),
            minimum: Uint128::new(15_000_000_000),
            actual: Uint128::new(10_000_000_000),
        }
        .to_string()
    );
    assert_eq!(suite.balance(PROVIDER), Uint128::new(amount));
    assert_eq!(suite.native(PROVIDER), Uint128::new(WALLET_NATIVE));

    let mut params = suite.eth_params(amount, 0, 0);
    params.deadline = suite.app.block_info().time.seconds() - 1;
    let err = suite
        .execute_with_funds(
            PROVIDER,
            ExecuteMsg::NoFeeAddLiquidityEth(params),
            &[coin(20_000_000_000, DENOM)],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::DeadlineExpired { .. }
    ));
}

#[test]
fn token_pair_liquidity_round_trip() {
    let mut suite = Suite::launch();
    let token_b = Suite::instantiate_cw20(
        &mut suite.app,
        "TOKB",
        vec![
            Cw20Coin {
                address: OWNER.to_string(),
                amount: Uint128::new(WALLET_NATIVE),
            },
            Cw20Coin {
                address: PROVIDER.to_string(),
                amount: Uint128::new(WALLET_NATIVE),
            },
        ],
    );
    let (pair_b, lp_b) = Suite::create_pair(
        &mut suite.app,
        [
            AssetInfo::Token {
                contract_addr: suite.token.to_string(),
            },
            AssetInfo::Token {
                contract_addr: token_b.to_string(),
            },
        ],
    );
    suite
        .execute(
            OWNER,
            ExecuteMsg::AddDex {
                pair: pair_b.to_string(),
                router: suite.router.to_string(),
            },
        )
        .unwrap();

    let params = |suite: &Suite, to: &str, amount_b: u128, min_b: u128| AddLiquidityParams {
        pair: pair_b.to_string(),
        to: to.to_string(),
        amount_token: Uint128::new(ONE_TOKEN_PCT),
        amount_token_b: Uint128::new(amount_b),
        amount_token_min: Uint128::new(ONE_TOKEN_PCT),
        amount_token_b_min: Uint128::new(min_b),
        deadline: suite.deadline(),
    };

    // seed at 1e18 : 5e9
    suite.approve_cw20(&token_b, OWNER, 5_000_000_000);
    let seed = params(&suite, OWNER, 5_000_000_000, 0);
    suite.execute(OWNER, ExecuteMsg::NoFeeAddLiquidity(seed)).unwrap();
    assert_eq!(suite.cw20_balance(&lp_b, OWNER), Uint128::new(ONE_TOKEN_PCT));

    suite.fund(PROVIDER, ONE_TOKEN_PCT);
    suite.approve_cw20(&token_b, PROVIDER, 10_000_000_000);
    let add = params(&suite, PROVIDER, 10_000_000_000, 5_000_000_000);
    let res = suite.execute(PROVIDER, ExecuteMsg::NoFeeAddLiquidity(add)).unwrap();
    assert!(has_wasm_attr(&res, "amount_counter", "5000000000"));

    // only half of token b was used, the rest came back
    assert_eq!(suite.balance(PROVIDER), Uint128::zero());
    assert_eq!(
        suite.cw20_balance(&token_b, PROVIDER),
        Uint128::new(WALLET_NATIVE - 5_000_000_000)
    );
    assert_eq!(suite.cw20_balance(&lp_b, PROVIDER), Uint128::new(ONE_TOKEN_PCT));
    assert_eq!(suite.cw20_balance(&token_b, suite.token.to_string()), Uint128::zero());
    let allowance: cw20::AllowanceResponse = suite
        .app
        .wrap()
        .query_wasm_smart(
            token_b.clone(),
            &Cw20QueryMsg::Allowance {
                owner: suite.token.to_string(),
                spender: pair_b.to_string(),
            },
        )
        .unwrap();
    assert_eq!(allowance.allowance, Uint128::zero());

    suite.approve_cw20(&lp_b, PROVIDER, ONE_TOKEN_PCT);
    let remove = RemoveLiquidityParams {
        pair: pair_b.to_string(),
        to: PROVIDER.to_string(),
        amount_lp: Uint128::new(ONE_TOKEN_PCT),
        amount_token_min: Uint128::new(ONE_TOKEN_PCT),
        amount_token_b_min: Uint128::new(5_000_000_000),
        deadline: suite.deadline(),
    };
    suite
        .execute(PROVIDER, ExecuteMsg::NoFeeRemoveLiquidity(remove))
        .unwrap();

    assert_eq!(suite.balance(PROVIDER), Uint128::new(ONE_TOKEN_PCT));
    assert_eq!(
        suite.cw20_balance(&token_b, PROVIDER),
        Uint128::new(WALLET_NATIVE)
    );
    assert_eq!(suite.cw20_balance(&lp_b, PROVIDER), Uint128::zero());
    assert_eq!(suite.balance(suite.token.to_string()), Uint128::zero());
    assert_eq!(suite.cw20_balance(&token_b, suite.token.to_string()), Uint128::zero());
}

#[test]
fn anti_bot_reserves_liquidity_for_operator() {
    let mut suite = Suite::new();
    suite.add_initial_liquidity();
    suite
        .execute(OWNER, ExecuteMsg::SetAntiLiqBot { enabled: true })
        .unwrap();
    suite
        .execute(
            OWNER,
            ExecuteMsg::SetMyobuSwap {
                operator: OPERATOR.to_string(),
            },
        )
        .unwrap();
    suite.fund(PROVIDER, ONE_TOKEN_PCT);
    suite.fund(OPERATOR, ONE_TOKEN_PCT);

    let params = suite.eth_params(ONE_TOKEN_PCT, 0, 0);
    let err = suite
        .execute_with_funds(
            PROVIDER,
            ExecuteMsg::NoFeeAddLiquidityEth(params.clone()),
            &[coin(20_000_000_000, DENOM)],
        )
        .unwrap_err();
    assert_eq!(ContractError::AntiBotBlock {}, err.downcast().unwrap());

    let operator_params = LiquidityEthParams {
        to: OPERATOR.to_string(),
        ..params.clone()
    };
    suite
        .execute_with_funds(
            OPERATOR,
            ExecuteMsg::NoFeeAddLiquidityEth(operator_params),
            &[coin(20_000_000_000, DENOM)],
        )
        .unwrap();
    assert_eq!(
        suite.cw20_balance(&suite.lp_token, OPERATOR),
        Uint128::new(ONE_TOKEN_PCT)
    );

    // the switch only applies before launch
    suite.execute(OWNER, ExecuteMsg::OpenTrading {}).unwrap();
    suite
        .execute_with_funds(
            PROVIDER,
            ExecuteMsg::NoFeeAddLiquidityEth(params),
            &[coin(20_000_000_000, DENOM)],
        )
        .unwrap();
    assert_eq!(suite.balance(PROVIDER), Uint128::zero());
}
