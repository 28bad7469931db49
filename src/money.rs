//! Fixed-precision decimal quantities.
//!
//! Every type quantizes on construction (round half away from zero), so
//! repeated arithmetic on already-quantized values stays exact.

use std::{
    fmt,
    ops::{Div, Mul},
    str::FromStr,
};

use derive_more::{Add, AddAssign, Sub, SubAssign, Sum};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

macro_rules! quantized {
    ($(#[$meta:meta])* $name:ident, $dp:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
        #[serde(from = "Decimal")]
        pub struct $name(Decimal);

        impl $name {
            pub const ZERO: Self = Self(Decimal::ZERO);

            pub fn new(value: Decimal) -> Self {
                Self(value.round_dp_with_strategy($dp, RoundingStrategy::MidpointAwayFromZero))
            }

            pub fn value(self) -> Decimal {
                self.0
            }
        }

        impl From<Decimal> for $name {
            fn from(value: Decimal) -> Self {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = rust_decimal::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Decimal::from_str(s.trim()).map(Self::new)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s = format!("{:.*}", $dp as usize, self.0);
                f.pad(&s)
            }
        }
    };
}

quantized!(
    /// Amount of money, kept in cents.
    #[derive(Add, Sub, AddAssign, SubAssign, Sum)]
    Money,
    2
);
quantized!(
    /// Fractional number of fund shares.
    #[derive(Add, AddAssign)]
    ShareAmount,
    4
);
quantized!(SharePrice, 4);
quantized!(
    /// Percentage in the 0..=100 range, used for targets and fees.
    #[derive(Add, Sub, Sum)]
    Percent,
    1
);

impl Money {
    /// `self * percent / 100`, rounded to cents.
    pub fn percent(self, percent: Percent) -> Money {
        Money::new(self.0 * percent.0 / Decimal::ONE_HUNDRED)
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Share of `total` in percent, unrounded. Zero when `total` is zero.
    pub fn percent_of(self, total: Money) -> Decimal {
        if total.0.is_zero() {
            return Decimal::ZERO;
        }
        Decimal::ONE_HUNDRED * self.0 / total.0
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, units: u32) -> Money {
        Money(self.0 * Decimal::from(units))
    }
}

impl Div<SharePrice> for Money {
    type Output = ShareAmount;

    fn div(self, price: SharePrice) -> ShareAmount {
        ShareAmount::new(self.0 / price.0)
    }
}

impl Mul<SharePrice> for ShareAmount {
    type Output = Money;

    fn mul(self, price: SharePrice) -> Money {
        Money::new(self.0 * price.0)
    }
}

impl SharePrice {
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl Percent {
    pub const HUNDRED: Percent = Percent(Decimal::ONE_HUNDRED);
}
