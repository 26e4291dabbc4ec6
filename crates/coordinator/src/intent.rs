//! Description of the transfer to coordinate

use crate::error::{CoordinatorError, Result};
use proven_common::Amount;
use std::fmt;

/// A participant process and the account it should touch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub account: String,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16, account: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            account: account.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Move `amount` from the origin account to the destination account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    pub amount: Amount,
    pub origin: Endpoint,
    pub destination: Endpoint,
}

impl TransferIntent {
    pub fn new(amount: Amount, origin: Endpoint, destination: Endpoint) -> Result<Self> {
        if amount <= Amount::zero() {
            return Err(CoordinatorError::InvalidAmount(amount.to_string()));
        }

        Ok(Self {
            amount,
            origin,
            destination,
        })
    }

    /// Signed change requested from the origin (a debit)
    pub fn origin_change(&self) -> Amount {
        -self.amount
    }

    /// Signed change requested from the destination (a credit)
    pub fn destination_change(&self) -> Amount {
        self.amount
    }
}
