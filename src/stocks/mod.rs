//! Whole-unit instruments: exchange traded shares bought one unit at a time.

pub mod allocation;
pub mod config;
pub mod planner;
pub mod portfolio;

pub use allocation::TargetAllocation;
pub use config::InvestFile;
pub use planner::{BuyPlan, plan_buys};
pub use portfolio::Portfolio;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stock {
    pub symbol: String,
    pub asset_class: String,
}

impl Stock {
    pub fn new(symbol: impl Into<String>, asset_class: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            asset_class: asset_class.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Buy {
    pub stock: Stock,
    pub amount: u32,
}

impl Buy {
    pub fn new(stock: Stock, amount: u32) -> Self {
        Self { stock, amount }
    }
}

/// Folds buys of the same stock into one, keeping first-seen order.
pub fn merge_buys(buys: impl IntoIterator<Item = Buy>) -> Vec<Buy> {
    let mut merged: Vec<Buy> = Vec::new();
    for buy in buys {
        match merged.iter_mut().find(|b| b.stock == buy.stock) {
            Some(existing) => existing.amount += buy.amount,
            None => merged.push(buy),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_repeated_buys() {
        let bond = Stock::new("SYM2", "bond");
        let emerging = Stock::new("SYM4", "emerging");
        let buys = [
            Buy::new(emerging.clone(), 1),
            Buy::new(bond.clone(), 1),
            Buy::new(emerging.clone(), 1),
            Buy::new(emerging.clone(), 2),
        ];
        assert_eq!(
            merge_buys(buys),
            vec![Buy::new(emerging, 4), Buy::new(bond, 1)]
        );
    }

    #[test]
    fn stocks_compare_by_symbol_and_class() {
        assert_eq!(Stock::new("A", "bond"), Stock::new("A", "bond"));
        assert_ne!(Stock::new("A", "bond"), Stock::new("A", "world"));
        assert!(Stock::new("A", "world") < Stock::new("B", "bond"));
    }
}
