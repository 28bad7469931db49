//! Proportional fund investment calculator.
//!
//! Computes, in closed form, how much each fund needs to reach its target
//! share of the portfolio once the new money is in. Funds that would need a
//! negative investment are dropped and the difference is spread evenly over
//! the rest, so the full amount always gets invested.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    Error, Result,
    funds::{FundPortfolio, Investment},
    money::Money,
    pricer::SharePricer,
};

#[derive(Clone, Debug, PartialEq)]
pub struct InvestmentPlan {
    /// Investments in portfolio order.
    pub investments: Vec<Investment>,
    /// Investments dropped for falling under the minimum investment.
    pub skipped: Vec<Investment>,
    pub portfolio: FundPortfolio,
}

impl InvestmentPlan {
    pub fn total(&self) -> Money {
        self.investments.iter().map(|i| i.amount).sum()
    }

    pub fn total_fees(&self) -> Money {
        self.investments.iter().map(Investment::fee).sum()
    }
}

/// Removes an equal share of the excess over `target_amount` from each
/// investment, dropping investments that would go negative until none do.
///
/// The result sums to exactly `target_amount`. Rounding leftovers are spread
/// a cent at a time over the kept investments in order.
pub fn adjust_investments(
    mut investments: Vec<Investment>,
    target_amount: Money,
) -> Result<Vec<Investment>> {
    let max_passes = investments.len() + 1;
    for pass in 0..max_passes {
        if investments.is_empty() {
            return Err(Error::InvariantViolation(format!(
                "no fund left to invest {target_amount} into"
            )));
        }
        let total: Money = investments.iter().map(|i| i.amount).sum();
        let share = (total - target_amount).value() / Decimal::from(investments.len());

        let before = investments.len();
        investments.retain(|i| i.amount.value() >= share);
        if investments.len() == before {
            debug!(pass, %share, "investments stable");
            return Ok(spread(investments, share, target_amount));
        }
        debug!(pass, %share, excluded = before - investments.len(), "excluded funds");
    }
    Err(Error::InvariantViolation(format!(
        "investment adjustment did not settle within {max_passes} passes"
    )))
}

fn spread(investments: Vec<Investment>, share: Decimal, target_amount: Money) -> Vec<Investment> {
    let mut investments: Vec<Investment> = investments
        .into_iter()
        .map(|i| Investment::new(i.fund, Money::new(i.amount.value() - share)))
        .collect();

    let cent = Money::new(Decimal::new(1, 2));
    let mut residue = target_amount - investments.iter().map(|i| i.amount).sum::<Money>();
    let len = investments.len();
    let mut index = 0;
    while residue != Money::ZERO {
        let investment = &mut investments[index % len];
        index += 1;
        if residue.is_positive() {
            investment.amount += cent;
            residue -= cent;
        } else if investment.amount >= cent {
            investment.amount -= cent;
            residue += cent;
        }
    }
    investments
}

/// Splits off investments below `minimum`.
fn filter_too_low(investments: Vec<Investment>, minimum: Money) -> (Vec<Investment>, Vec<Investment>) {
    let (kept, skipped): (Vec<_>, Vec<_>) = investments
        .into_iter()
        .partition(|i| i.amount >= minimum);
    for investment in &skipped {
        warn!(
            fund = %investment.fund.name,
            amount = %investment.amount,
            %minimum,
            "fund falls under the minimum investment"
        );
    }
    (kept, skipped)
}

/// Spreads `target_amount` over the portfolio's funds. A `min_investment`
/// of zero disables the minimum investment filter.
pub fn calculate_investments(
    portfolio: &FundPortfolio,
    target_amount: Money,
    pricer: &impl SharePricer,
    min_investment: Money,
) -> Result<InvestmentPlan> {
    if !target_amount.is_positive() {
        return Err(Error::InvariantViolation(format!(
            "amount to invest must be positive, got {target_amount}"
        )));
    }

    let new_value = portfolio.value(pricer)? + target_amount;
    let mut investments = Vec::with_capacity(portfolio.funds().len());
    for fund in portfolio.funds() {
        let ideal = new_value.percent(fund.target_allocation) - fund.value(pricer)?;
        debug!(fund = %fund.name, %ideal, "ideal investment");
        investments.push(Investment::new(fund.clone(), ideal));
    }

    let mut investments = adjust_investments(investments, target_amount)?;
    let mut skipped = Vec::new();
    if min_investment.is_positive() {
        let (kept, too_low) = filter_too_low(investments, min_investment);
        skipped = too_low;
        investments = adjust_investments(kept, target_amount)?;
    }

    let new_portfolio = portfolio.with_investments(&investments, pricer)?;
    Ok(InvestmentPlan {
        investments,
        skipped,
        portfolio: new_portfolio,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        funds::Fund,
        money::{Percent, ShareAmount},
        pricer::PriceTable,
    };

    fn pricer() -> PriceTable {
        PriceTable::new()
            .with_price("Eurooppa", dec!(2))
            .with_price("Pohjois-Amer.", dec!(0.5))
            .with_price("Aasia", dec!(1))
    }

    fn asia() -> Fund {
        Fund::new("Aasia", ShareAmount::new(dec!(20)), Percent::new(dec!(20)))
    }

    fn euro() -> Fund {
        Fund::new("Eurooppa", ShareAmount::new(dec!(5)), Percent::new(dec!(30)))
    }

    fn usa() -> Fund {
        Fund::new("Pohjois-Amer.", ShareAmount::new(dec!(60)), Percent::new(dec!(50)))
            .with_fee(Percent::new(dec!(0.1)))
    }

    fn portfolio() -> FundPortfolio {
        FundPortfolio::new(vec![asia(), euro(), usa()]).unwrap()
    }

    fn money(v: Decimal) -> Money {
        Money::new(v)
    }

    #[test]
    fn balanced_investments() {
        let plan = calculate_investments(&portfolio(), money(dec!(100)), &pricer(), Money::ZERO)
            .unwrap();
        assert_eq!(
            plan.investments,
            vec![
                Investment::new(asia(), money(dec!(12))),
                Investment::new(euro(), money(dec!(38))),
                Investment::new(usa(), money(dec!(50))),
            ]
        );
        assert!(plan.skipped.is_empty());
        assert_eq!(plan.total(), money(dec!(100)));
        assert_eq!(plan.total_fees(), money(dec!(0.05)));
    }

    #[test]
    fn over_allocated_fund_gets_nothing() {
        let plan = calculate_investments(&portfolio(), money(dec!(10)), &pricer(), Money::ZERO)
            .unwrap();
        assert_eq!(
            plan.investments,
            vec![
                Investment::new(euro(), money(dec!(8))),
                Investment::new(usa(), money(dec!(2))),
            ]
        );
    }

    #[test]
    fn new_portfolio_holds_bought_shares() {
        let plan = calculate_investments(&portfolio(), money(dec!(100)), &pricer(), Money::ZERO)
            .unwrap();
        let shares: Vec<_> = plan.portfolio.funds().iter().map(|f| f.shares).collect();
        assert_eq!(
            shares,
            vec![
                ShareAmount::new(dec!(32)),
                ShareAmount::new(dec!(24)),
                ShareAmount::new(dec!(159.9)),
            ]
        );
        assert_eq!(portfolio().funds()[0].shares, ShareAmount::new(dec!(20)));
    }

    #[test]
    fn sum_matches_target_for_awkward_amounts() {
        for amount in [dec!(0.01), dec!(0.07), dec!(1), dec!(10.01), dec!(33.33), dec!(99.99), dec!(1234.56)] {
            let plan =
                calculate_investments(&portfolio(), money(amount), &pricer(), Money::ZERO).unwrap();
            assert_eq!(plan.total(), money(amount), "investing {amount}");
            assert!(plan.investments.iter().all(|i| !i.amount.is_negative()));
        }
    }

    #[test]
    fn adjustment_is_stable_once_settled() {
        let plan = calculate_investments(&portfolio(), money(dec!(33.33)), &pricer(), Money::ZERO)
            .unwrap();
        let again = adjust_investments(plan.investments.clone(), money(dec!(33.33))).unwrap();
        assert_eq!(again, plan.investments);
    }

    #[test]
    fn spreads_rounding_residue_by_cents() {
        let investments = vec![
            Investment::new(asia(), money(dec!(1))),
            Investment::new(euro(), money(dec!(1))),
            Investment::new(usa(), money(dec!(1))),
        ];
        let adjusted = adjust_investments(investments, money(dec!(2))).unwrap();
        let amounts: Vec<_> = adjusted.iter().map(|i| i.amount).collect();
        assert_eq!(amounts, vec![money(dec!(0.66)), money(dec!(0.67)), money(dec!(0.67))]);
    }

    #[test]
    fn excludes_funds_over_several_passes() {
        let fund = |name: &str| Fund::new(name, ShareAmount::ZERO, Percent::new(dec!(20)));
        let investments: Vec<_> = [
            ("A", dec!(-10)),
            ("B", dec!(3)),
            ("C", dec!(10)),
            ("D", dec!(20)),
            ("E", dec!(30)),
        ]
        .into_iter()
        .map(|(name, amount)| Investment::new(fund(name), money(amount)))
        .collect();

        // A goes first (share 0.60), which lifts the share to 3.25 and drops B.
        let adjusted = adjust_investments(investments, money(dec!(50))).unwrap();
        let amounts: Vec<_> = adjusted
            .iter()
            .map(|i| (i.fund.name.as_str(), i.amount))
            .collect();
        assert_eq!(
            amounts,
            vec![
                ("C", money(dec!(6.66))),
                ("D", money(dec!(16.67))),
                ("E", money(dec!(26.67))),
            ]
        );
        assert_eq!(adjusted.iter().map(|i| i.amount).sum::<Money>(), money(dec!(50)));
    }

    #[test]
    fn minimum_investment_skips_small_funds_and_reinvests() {
        let plan = calculate_investments(&portfolio(), money(dec!(10)), &pricer(), money(dec!(5)))
            .unwrap();
        assert_eq!(plan.investments, vec![Investment::new(euro(), money(dec!(10)))]);
        assert_eq!(plan.skipped, vec![Investment::new(usa(), money(dec!(2)))]);
        assert_eq!(plan.total(), money(dec!(10)));
    }

    #[test]
    fn everything_under_minimum_is_an_error() {
        let err = calculate_investments(&portfolio(), money(dec!(10)), &pricer(), money(dec!(50)));
        assert!(matches!(err, Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn rejects_non_positive_amount() {
        for amount in [Money::ZERO, money(dec!(-5))] {
            assert!(matches!(
                calculate_investments(&portfolio(), amount, &pricer(), Money::ZERO),
                Err(Error::InvariantViolation(_))
            ));
        }
    }

    #[test]
    fn missing_share_price_aborts() {
        let pricer = PriceTable::new().with_price("Aasia", dec!(1));
        assert!(matches!(
            calculate_investments(&portfolio(), money(dec!(100)), &pricer, Money::ZERO),
            Err(Error::PriceUnavailable(_))
        ));
    }
}
