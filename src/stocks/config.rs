use std::{collections::BTreeMap, io::Read, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::{
    Error, Result,
    money::Percent,
    stocks::{Portfolio, Stock, TargetAllocation},
};

/// Everything the buy planner needs from an invest file.
#[derive(Debug)]
pub struct InvestFile {
    pub portfolio: Portfolio,
    pub target: TargetAllocation,
    /// Stocks that may be bought, sorted by symbol.
    pub available: Vec<Stock>,
}

impl InvestFile {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let builder: InvestFileBuilder = serde_yaml::from_reader(reader)?;
        debug!(?builder, "parsed invest file");
        builder.build()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct StockEntry {
    asset_class: String,
    #[serde(default)]
    available: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InvestFileBuilder {
    #[serde(default)]
    portfolio: BTreeMap<String, u32>,
    target_allocation: BTreeMap<String, Percent>,
    stocks: BTreeMap<String, StockEntry>,
}

impl TryFrom<InvestFileBuilder> for InvestFile {
    type Error = Error;

    fn try_from(builder: InvestFileBuilder) -> Result<Self> {
        let lookup = |symbol: &str| {
            builder
                .stocks
                .get(symbol)
                .map(|entry| Stock::new(symbol, entry.asset_class.as_str()))
        };

        let mut portfolio = Portfolio::new();
        for (symbol, &amount) in builder.portfolio.iter() {
            let stock = lookup(symbol).ok_or_else(|| {
                Error::Configuration(format!("holding {symbol} has no stock entry"))
            })?;
            portfolio.add_stock(stock, amount)?;
        }

        let target = TargetAllocation::new(builder.target_allocation.clone())
            .map_err(|e| Error::Configuration(e.to_string()))?;

        let available = builder
            .stocks
            .iter()
            .filter(|(_, entry)| entry.available)
            .map(|(symbol, entry)| Stock::new(symbol.as_str(), entry.asset_class.as_str()))
            .collect();

        Ok(InvestFile {
            portfolio,
            target,
            available,
        })
    }
}

impl InvestFileBuilder {
    fn build(self) -> Result<InvestFile> {
        self.try_into()
    }
}
