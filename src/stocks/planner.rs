//! Greedy whole-unit buy planner.
//!
//! Each round tries buying a single unit of every available stock and keeps
//! the purchase that leaves the portfolio closest to the target allocation.
//! Planning stops once no stock fits in the remaining budget.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::{
    Error, Result,
    money::Money,
    pricer::StockPricer,
    stocks::{Buy, Portfolio, Stock, TargetAllocation, merge_buys},
};

#[derive(Clone, Debug, PartialEq)]
pub struct BuyPlan {
    /// One entry per stock, in the order each stock was first bought.
    pub buys: Vec<Buy>,
    pub portfolio: Portfolio,
    pub remaining: Money,
}

impl BuyPlan {
    pub fn spent(&self, budget: Money) -> Money {
        budget - self.remaining
    }
}

struct Candidate<'a> {
    stock: &'a Stock,
    score: Decimal,
    portfolio: Portfolio,
    remaining: Money,
}

impl Candidate<'_> {
    /// Lower score wins, equal scores go to the lower stock.
    fn beats(&self, other: &Candidate<'_>) -> bool {
        (self.score, self.stock) < (other.score, other.stock)
    }
}

/// Squared percentage-point deviation from target summed over all asset
/// classes, plus the unspent fraction of the budget.
pub fn error_score(
    portfolio: &Portfolio,
    target: &TargetAllocation,
    remaining: Money,
    budget: Money,
    pricer: &impl StockPricer,
) -> Result<Decimal> {
    let mut asset_classes = portfolio.asset_classes();
    asset_classes.extend(target.asset_classes());

    let mut error = Decimal::ZERO;
    for asset_class in asset_classes {
        let deviation =
            portfolio.asset_class_percent(asset_class, pricer)? - target.get(asset_class).value();
        error += deviation * deviation;
    }
    error += (remaining.value() / budget.value()).abs();
    Ok(error)
}

pub fn plan_buys(
    portfolio: &Portfolio,
    target: &TargetAllocation,
    available: &[Stock],
    budget: Money,
    pricer: &impl StockPricer,
) -> Result<BuyPlan> {
    if !budget.is_positive() {
        return Err(Error::InvariantViolation(format!(
            "budget must be positive, got {budget}"
        )));
    }

    let mut current = portfolio.clone();
    let mut remaining = budget;
    let mut buys = Vec::new();

    loop {
        let mut best: Option<Candidate> = None;
        for stock in available {
            let price = pricer.price(stock)?;
            if !price.is_positive() {
                return Err(Error::InvariantViolation(format!(
                    "price of {} must be positive, got {price}",
                    stock.symbol
                )));
            }
            let left = remaining - price;
            if left.is_negative() {
                trace!(symbol = %stock.symbol, %price, %remaining, "unaffordable");
                continue;
            }
            let mut next = current.clone();
            next.add_stock(stock.clone(), 1)?;
            let candidate = Candidate {
                stock,
                score: error_score(&next, target, left, budget, pricer)?,
                portfolio: next,
                remaining: left,
            };
            trace!(symbol = %stock.symbol, score = %candidate.score, "candidate");
            if best.as_ref().is_none_or(|b| candidate.beats(b)) {
                best = Some(candidate);
            }
        }

        let Some(chosen) = best else {
            break;
        };
        debug!(symbol = %chosen.stock.symbol, score = %chosen.score, remaining = %chosen.remaining, "buying one unit");
        buys.push(Buy::new(chosen.stock.clone(), 1));
        current = chosen.portfolio;
        remaining = chosen.remaining;
    }

    Ok(BuyPlan {
        buys: merge_buys(buys),
        portfolio: current,
        remaining,
    })
}
