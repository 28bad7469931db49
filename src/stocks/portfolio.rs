use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, HashMap},
};

use rust_decimal::Decimal;

use crate::{Error, Result, money::Money, pricer::StockPricer, stocks::Stock};

/// Whole-unit holdings.
///
/// Asset class values are cached per class and dropped when a holding of
/// that class changes. The cache assumes the same pricer is used for the
/// lifetime of the portfolio.
#[derive(Debug, Default)]
pub struct Portfolio {
    holdings: BTreeMap<Stock, u32>,
    class_values: RefCell<HashMap<String, Money>>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_holdings(holdings: impl IntoIterator<Item = (Stock, u32)>) -> Result<Self> {
        let mut portfolio = Portfolio::new();
        for (stock, amount) in holdings {
            portfolio.add_stock(stock, amount)?;
        }
        Ok(portfolio)
    }

    /// Adds `amount` units. Zero is ignored.
    pub fn add_stock(&mut self, stock: Stock, amount: u32) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let held = self.amount(&stock);
        let total = held.checked_add(amount).ok_or_else(|| {
            Error::InvariantViolation(format!(
                "holding of {} overflows: {held} + {amount}",
                stock.symbol
            ))
        })?;
        self.class_values.get_mut().remove(&stock.asset_class);
        self.holdings.insert(stock, total);
        Ok(())
    }

    pub fn amount(&self, stock: &Stock) -> u32 {
        self.holdings.get(stock).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Stock, u32)> {
        self.holdings.iter().map(|(s, a)| (s, *a))
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn asset_classes(&self) -> BTreeSet<&str> {
        self.holdings
            .keys()
            .map(|s| s.asset_class.as_str())
            .collect()
    }

    pub fn asset_class_value(&self, asset_class: &str, pricer: &impl StockPricer) -> Result<Money> {
        if let Some(value) = self.class_values.borrow().get(asset_class) {
            return Ok(*value);
        }
        let mut value = Money::ZERO;
        for (stock, amount) in self.iter().filter(|(s, _)| s.asset_class == asset_class) {
            value += pricer.price(stock)? * amount;
        }
        self.class_values
            .borrow_mut()
            .insert(asset_class.to_string(), value);
        Ok(value)
    }

    pub fn value(&self, pricer: &impl StockPricer) -> Result<Money> {
        let mut total = Money::ZERO;
        for asset_class in self.asset_classes() {
            total += self.asset_class_value(asset_class, pricer)?;
        }
        Ok(total)
    }

    /// Unrounded share of the portfolio value held in `asset_class`.
    pub fn asset_class_percent(
        &self,
        asset_class: &str,
        pricer: &impl StockPricer,
    ) -> Result<Decimal> {
        let total = self.value(pricer)?;
        Ok(self.asset_class_value(asset_class, pricer)?.percent_of(total))
    }
}

impl Clone for Portfolio {
    fn clone(&self) -> Self {
        Portfolio {
            holdings: self.holdings.clone(),
            class_values: RefCell::default(),
        }
    }
}

impl PartialEq for Portfolio {
    fn eq(&self, other: &Self) -> bool {
        self.holdings == other.holdings
    }
}

impl Eq for Portfolio {}
