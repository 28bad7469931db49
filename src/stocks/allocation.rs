use std::collections::BTreeMap;

use crate::{Error, Result, money::Percent};

/// Target percentage per asset class. Always sums to 100.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetAllocation {
    targets: BTreeMap<String, Percent>,
}

impl TargetAllocation {
    pub fn new<K: Into<String>>(targets: impl IntoIterator<Item = (K, Percent)>) -> Result<Self> {
        let targets: BTreeMap<String, Percent> =
            targets.into_iter().map(|(k, p)| (k.into(), p)).collect();
        let total: Percent = targets.values().copied().sum();
        if total != Percent::HUNDRED {
            return Err(Error::InvariantViolation(format!(
                "target allocation sums to {total}% instead of 100%"
            )));
        }
        Ok(Self { targets })
    }

    /// Target for `asset_class`, zero for classes without a target.
    pub fn get(&self, asset_class: &str) -> Percent {
        self.targets.get(asset_class).copied().unwrap_or(Percent::ZERO)
    }

    pub fn asset_classes(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }
}
