//! Fractional-share funds with a per-fund target allocation and fee.

use crate::{
    Result,
    money::{Money, Percent, ShareAmount},
    pricer::SharePricer,
};

pub mod calculator;
pub mod config;
pub mod portfolio;

pub use calculator::{InvestmentPlan, adjust_investments, calculate_investments};
pub use portfolio::FundPortfolio;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fund {
    pub name: String,
    pub shares: ShareAmount,
    pub target_allocation: Percent,
    pub fee_percent: Percent,
}

impl Fund {
    pub fn new(name: impl Into<String>, shares: ShareAmount, target_allocation: Percent) -> Self {
        Self {
            name: name.into(),
            shares,
            target_allocation,
            fee_percent: Percent::ZERO,
        }
    }

    pub fn with_fee(mut self, fee_percent: Percent) -> Self {
        self.fee_percent = fee_percent;
        self
    }

    pub fn value(&self, pricer: &impl SharePricer) -> Result<Money> {
        Ok(self.shares * pricer.share_price(&self.name)?)
    }

    pub fn fee(&self, amount: Money) -> Money {
        amount.percent(self.fee_percent)
    }
}

/// Gross amount to put into a fund. The fee comes out of this amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Investment {
    pub fund: Fund,
    pub amount: Money,
}

impl Investment {
    pub fn new(fund: Fund, amount: Money) -> Self {
        Self { fund, amount }
    }

    pub fn fee(&self) -> Money {
        self.fund.fee(self.amount)
    }

    pub fn real_investment(&self) -> Money {
        self.amount - self.fee()
    }
}
