pub mod error;
pub mod funds;
pub mod money;
pub mod pricer;
pub mod report;
pub mod stocks;

pub use error::{Error, Result};
pub use money::{Money, Percent, ShareAmount, SharePrice};
