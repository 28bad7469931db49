use crate::{
    Error, Result,
    funds::{Fund, Investment},
    money::{Money, Percent},
    pricer::SharePricer,
};

/// Funds in a fixed order whose target allocations sum to 100.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FundPortfolio {
    funds: Vec<Fund>,
}

impl FundPortfolio {
    pub fn new(funds: Vec<Fund>) -> Result<Self> {
        let total: Percent = funds.iter().map(|f| f.target_allocation).sum();
        if total != Percent::HUNDRED {
            return Err(Error::Configuration(format!(
                "portfolio fund allocations sum to {total}% != 100%"
            )));
        }
        Ok(Self { funds })
    }

    pub fn funds(&self) -> &[Fund] {
        &self.funds
    }

    pub fn fund(&self, name: &str) -> Option<&Fund> {
        self.funds.iter().find(|f| f.name == name)
    }

    pub fn value(&self, pricer: &impl SharePricer) -> Result<Money> {
        let mut total = Money::ZERO;
        for fund in &self.funds {
            total += fund.value(pricer)?;
        }
        Ok(total)
    }

    /// New portfolio with each investment, net of fees, converted to shares.
    pub fn with_investments(
        &self,
        investments: &[Investment],
        pricer: &impl SharePricer,
    ) -> Result<Self> {
        let mut funds = self.funds.clone();
        for investment in investments {
            let fund = funds
                .iter_mut()
                .find(|f| f.name == investment.fund.name)
                .ok_or_else(|| {
                    Error::InvariantViolation(format!(
                        "investment into {} which is not in the portfolio",
                        investment.fund.name
                    ))
                })?;
            let price = pricer.share_price(&fund.name)?;
            if !price.is_positive() {
                return Err(Error::InvariantViolation(format!(
                    "share price of {} must be positive, got {price}",
                    fund.name
                )));
            }
            fund.shares += investment.real_investment() / price;
        }
        Ok(Self { funds })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{money::ShareAmount, pricer::PriceTable};

    fn fund(name: &str, shares: rust_decimal::Decimal, allocation: rust_decimal::Decimal) -> Fund {
        Fund::new(name, ShareAmount::new(shares), Percent::new(allocation))
    }

    #[test]
    fn rejects_allocations_not_summing_to_hundred() {
        let funds = vec![
            fund("Aasia", dec!(20), dec!(10)),
            fund("Eurooppa", dec!(5), dec!(20)),
            fund("Pohjois-Amer.", dec!(60), dec!(30)),
        ];
        assert!(matches!(
            FundPortfolio::new(funds),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn applies_investments_net_of_fees() {
        let pricer = PriceTable::new()
            .with_price("Aasia", dec!(1))
            .with_price("Eurooppa", dec!(2));
        let aasia = fund("Aasia", dec!(20), dec!(40)).with_fee(Percent::new(dec!(1)));
        let eurooppa = fund("Eurooppa", dec!(5), dec!(60));
        let portfolio = FundPortfolio::new(vec![aasia.clone(), eurooppa.clone()]).unwrap();

        let updated = portfolio
            .with_investments(&[Investment::new(aasia, Money::new(dec!(10)))], &pricer)
            .unwrap();

        assert_eq!(updated.fund("Aasia").unwrap().shares, ShareAmount::new(dec!(29.9)));
        assert_eq!(updated.fund("Eurooppa").unwrap(), &eurooppa);
        assert_eq!(portfolio.fund("Aasia").unwrap().shares, ShareAmount::new(dec!(20)));
        assert_eq!(updated.value(&pricer).unwrap(), Money::new(dec!(39.9)));
    }
}
