use proven_common::Amount;

/// A named account and its current balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    name: String,
    balance: Amount,
}

impl Account {
    pub fn new(name: impl Into<String>, balance: Amount) -> Self {
        Self {
            name: name.into(),
            balance,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Add a signed amount to the balance, leaving it untouched on overflow
    pub(crate) fn change_balance(&mut self, amount: Amount) -> Option<Amount> {
        self.balance = self.balance.checked_add(amount)?;
        Some(self.balance)
    }
}
