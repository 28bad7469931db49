use std::{collections::HashMap, path::Path};

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::{
    Error, Result,
    money::{Money, SharePrice},
    stocks::Stock,
};

/// Unit price lookup for whole-unit instruments.
pub trait StockPricer {
    fn price(&self, stock: &Stock) -> Result<Money>;

    /// Human readable name for reports.
    fn name(&self, stock: &Stock) -> Result<String> {
        Ok(stock.symbol.clone())
    }
}

/// Share price lookup for funds, keyed by fund name.
pub trait SharePricer {
    fn share_price(&self, fund: &str) -> Result<SharePrice>;
}

#[derive(Debug, Clone)]
struct Quote {
    price: Decimal,
    name: Option<String>,
}

/// Static price table, built in code or loaded from a CSV file.
///
/// The same table answers both stock and fund lookups, stock prices at cent
/// precision and share prices at four decimals.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    quotes: HashMap<String, Quote>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PriceRow {
    symbol: String,
    price: Decimal,
    #[serde(default)]
    name: Option<String>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, symbol: impl Into<String>, price: Decimal) -> Self {
        self.insert(symbol, price, None);
        self
    }

    pub fn insert(&mut self, symbol: impl Into<String>, price: Decimal, name: Option<String>) {
        self.quotes.insert(symbol.into(), Quote { price, name });
    }

    /// Reads `Symbol,Price[,Name]` rows.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        let mut table = Self::new();
        for row in reader.deserialize() {
            let row: PriceRow = row?;
            debug!(?row, "parsed price");
            if row.price <= Decimal::ZERO {
                return Err(Error::Configuration(format!(
                    "price for {} must be positive, got {}",
                    row.symbol, row.price
                )));
            }
            table.insert(row.symbol, row.price, row.name.filter(|n| !n.is_empty()));
        }
        Ok(table)
    }

    fn quote(&self, symbol: &str) -> Result<&Quote> {
        self.quotes
            .get(symbol)
            .ok_or_else(|| Error::PriceUnavailable(symbol.to_string()))
    }
}

impl StockPricer for PriceTable {
    fn price(&self, stock: &Stock) -> Result<Money> {
        self.quote(&stock.symbol).map(|q| Money::new(q.price))
    }

    fn name(&self, stock: &Stock) -> Result<String> {
        let quote = self.quote(&stock.symbol)?;
        Ok(quote.name.clone().unwrap_or_else(|| stock.symbol.clone()))
    }
}

impl SharePricer for PriceTable {
    fn share_price(&self, fund: &str) -> Result<SharePrice> {
        self.quote(fund).map(|q| SharePrice::new(q.price))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn unknown_symbol_is_unavailable() {
        let table = PriceTable::new().with_price("SYM1", dec!(4));
        let err = table.price(&Stock::new("NOPE", "bond")).unwrap_err();
        assert!(matches!(err, Error::PriceUnavailable(s) if s == "NOPE"));
        assert!(matches!(
            table.share_price("Aasia"),
            Err(Error::PriceUnavailable(_))
        ));
    }

    #[test]
    fn loads_csv_with_optional_names() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "Symbol,Price,Name\nDBXW.DE,27.64,MSCI World\nEurooppa,2.1363,\n"
        )
        .unwrap();
        let table = PriceTable::load_from_file(file.path()).unwrap();

        let world = Stock::new("DBXW.DE", "world");
        assert_eq!(table.price(&world).unwrap(), Money::new(dec!(27.64)));
        assert_eq!(table.name(&world).unwrap(), "MSCI World");
        assert_eq!(
            table.share_price("Eurooppa").unwrap(),
            SharePrice::new(dec!(2.1363))
        );
        assert_eq!(
            table.name(&Stock::new("Eurooppa", "fund")).unwrap(),
            "Eurooppa"
        );
    }

    #[test]
    fn rejects_non_positive_prices() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Symbol,Price\nSYM1,0\n").unwrap();
        assert!(matches!(
            PriceTable::load_from_file(file.path()),
            Err(Error::Configuration(_))
        ));
    }
}
