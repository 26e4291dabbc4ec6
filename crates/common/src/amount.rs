//! Signed decimal amounts
//!
//! A debit is carried as a negative amount, a credit as a positive one.

use rust_decimal::Decimal;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// Amount represents a signed quantity with decimal precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(pub Decimal);

impl Amount {
    /// Create zero amount
    pub fn zero() -> Self {
        Amount(Decimal::ZERO)
    }

    /// A debit is any strictly negative amount
    pub fn is_debit(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Absolute value of the amount
    pub fn magnitude(&self) -> Self {
        Amount(self.0.abs())
    }

    /// Sum of two amounts, `None` if it leaves the representable range
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Difference of two amounts, `None` if it leaves the representable range
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Create amount from integer with decimals
    /// e.g., from_integer(150, 2) = 1.50
    pub fn from_integer(value: i64, decimals: u32) -> Self {
        Amount(Decimal::new(value, decimals))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Credits may be written with an explicit sign
        let unsigned = match s.strip_prefix('+') {
            Some(rest) if rest.starts_with(['+', '-']) => {
                return Err(rust_decimal::Error::ConversionTo(s.to_string()));
            }
            Some(rest) => rest,
            None => s,
        };
        Ok(Amount(Decimal::from_str(unsigned)?))
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Amount(-self.0)
    }
}

impl From<Decimal> for Amount {
    fn from(decimal: Decimal) -> Self {
        Amount(decimal)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount(Decimal::from(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
