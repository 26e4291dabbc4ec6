//! Holds placed by commit votes
//!
//! A participant that votes commit promises to apply its half of the transfer
//! if the coordinator decides commit. The hold records that promise so that a
//! concurrent session cannot spend the same funds before the decision arrives.

use proven_common::{Amount, SessionId};
use std::collections::HashMap;

/// Funds reserved on one account by one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hold {
    pub account: String,
    pub amount: Amount,
}

/// Result of checking a proposed hold against an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldCheck {
    Fits,
    /// Debit larger than what is left after other sessions' debits
    Insufficient { available: Amount },
    /// Committing the hold could push the balance out of range
    Overflow,
}

/// Manages outstanding holds, at most one per session
#[derive(Debug, Default)]
pub struct HoldBook {
    holds: HashMap<SessionId, Hold>,
}

impl HoldBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total magnitude of debit holds outstanding on an account, `None` on overflow
    pub fn held_debits(&self, account: &str) -> Option<Amount> {
        self.held_total(account, |amount| amount.is_debit())
    }

    /// Total of credit holds outstanding on an account, `None` on overflow
    pub fn held_credits(&self, account: &str) -> Option<Amount> {
        self.held_total(account, |amount| !amount.is_debit())
    }

    fn held_total(&self, account: &str, include: impl Fn(Amount) -> bool) -> Option<Amount> {
        self.holds
            .values()
            .filter(|hold| hold.account == account && include(hold.amount))
            .try_fold(Amount::zero(), |acc, hold| {
                acc.checked_add(hold.amount.magnitude())
            })
    }

    /// Check whether `amount` can be held against an account with `balance`.
    ///
    /// A debit fits when its magnitude does not exceed the balance left after
    /// debits already held by other sessions. A credit fits when the balance
    /// stays representable even if every held credit commits first.
    pub fn check(&self, account: &str, amount: Amount, balance: Amount) -> HoldCheck {
        if amount.is_debit() {
            let Some(available) = self
                .held_debits(account)
                .and_then(|held| balance.checked_sub(held))
            else {
                return HoldCheck::Overflow;
            };

            return if available >= amount.magnitude() {
                HoldCheck::Fits
            } else {
                HoldCheck::Insufficient { available }
            };
        }

        let ceiling = self
            .held_credits(account)
            .and_then(|held| balance.checked_add(held))
            .and_then(|total| total.checked_add(amount));
        match ceiling {
            Some(_) => HoldCheck::Fits,
            None => HoldCheck::Overflow,
        }
    }

    /// Place a hold for a session, replacing any earlier one
    pub fn place(&mut self, session: SessionId, hold: Hold) -> Option<Hold> {
        self.holds.insert(session, hold)
    }

    /// Release the session's hold, if any
    pub fn release(&mut self, session: SessionId) -> Option<Hold> {
        self.holds.remove(&session)
    }

    pub fn get(&self, session: SessionId) -> Option<&Hold> {
        self.holds.get(&session)
    }

    pub fn len(&self) -> usize {
        self.holds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holds.is_empty()
    }
}
