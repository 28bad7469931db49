use std::{collections::BTreeMap, io::Read, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::{
    Result,
    funds::{Fund, FundPortfolio},
    money::{Percent, ShareAmount},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct FundEntry {
    shares: ShareAmount,
    allocation: Percent,
    #[serde(default)]
    fee_percent: Percent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FundFileBuilder {
    funds: BTreeMap<String, FundEntry>,
}

impl FundFileBuilder {
    fn build(self) -> Result<FundPortfolio> {
        let funds = self
            .funds
            .into_iter()
            .map(|(name, entry)| {
                Fund::new(name, entry.shares, entry.allocation).with_fee(entry.fee_percent)
            })
            .collect();
        FundPortfolio::new(funds)
    }
}

impl FundPortfolio {
    /// Loads funds ordered by name.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let builder: FundFileBuilder = serde_yaml::from_reader(reader)?;
        debug!(?builder, "parsed fund file");
        builder.build()
    }
}
