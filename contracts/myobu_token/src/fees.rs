use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

use crate::{error::ContractError, state::FeeParams};

pub const MAX_CATEGORY_FEE: u64 = 50;

#[cw_serde]
#[derive(Copy)]
pub enum TradeCategory {
    Buy,
    Sell,
    TaxedTransfer,
    Transfer,
    Exempt,
}

impl TradeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeCategory::Buy => "buy",
            TradeCategory::Sell => "sell",
            TradeCategory::TaxedTransfer => "taxed_transfer",
            TradeCategory::Transfer => "transfer",
            TradeCategory::Exempt => "exempt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeQuote {
    pub received: Uint128,
    pub reflection: Uint128,
    pub team: Uint128,
}

impl FeeQuote {
    pub fn none(amount: Uint128) -> Self {
        FeeQuote {
            received: amount,
            reflection: Uint128::zero(),
            team: Uint128::zero(),
        }
    }
}

impl FeeParams {
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.impact == 0 || self.impact > 100 {
            return Err(ContractError::InvalidPriceImpact {
                impact: self.impact,
            });
        }
        for (category, fee) in [
            ("buy", self.buy_fee),
            ("sell", self.sell_fee),
            ("transfer", self.transfer_fee),
        ] {
            let total = self.tax_fee.saturating_add(fee);
            if total >= MAX_CATEGORY_FEE {
                return Err(ContractError::FeeTooHigh {
                    category: category.to_string(),
                    total,
                });
            }
        }
        Ok(())
    }

    /// Team fee charged for `category`, zero for untaxed categories.
    pub fn team_fee(&self, category: TradeCategory) -> u64 {
        match category {
            TradeCategory::Buy => self.buy_fee,
            TradeCategory::Sell => self.sell_fee,
            TradeCategory::TaxedTransfer => self.transfer_fee,
            TradeCategory::Transfer | TradeCategory::Exempt => 0,
        }
    }

    pub fn quote(&self, category: TradeCategory, amount: Uint128) -> FeeQuote {
        let (tax_fee, team_fee) = match category {
            TradeCategory::Transfer | TradeCategory::Exempt => return FeeQuote::none(amount),
            _ => (self.tax_fee, self.team_fee(category)),
        };
        let received = amount.multiply_ratio(100 - tax_fee - team_fee, 100u64);
        let reflection = amount.multiply_ratio(tax_fee, 100u64);
        // floor remainders stay with the contract
        let team = amount - received - reflection;
        FeeQuote {
            received,
            reflection,
            team,
        }
    }
}
