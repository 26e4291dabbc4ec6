//! In-memory ledger loaded from and persisted to a flat record file

use crate::account::Account;
use crate::error::{LedgerError, Result};
use proven_common::Amount;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Ordered collection of uniquely named accounts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    accounts: Vec<Account>,
}

impl Ledger {
    /// Build a ledger from accounts, rejecting duplicate names
    pub fn from_accounts(accounts: impl IntoIterator<Item = Account>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut ledger = Ledger::default();

        for (index, account) in accounts.into_iter().enumerate() {
            if !seen.insert(account.name().to_string()) {
                return Err(LedgerError::DuplicateAccount {
                    line: index + 1,
                    name: account.name().to_string(),
                });
            }
            ledger.accounts.push(account);
        }

        Ok(ledger)
    }

    /// Load the ledger from a record file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| LedgerError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse records of the form `<balance> <name>`, one per line
    pub fn parse(contents: &str) -> Result<Self> {
        let accounts = contents
            .lines()
            .enumerate()
            .map(|(index, record)| parse_record(index + 1, record))
            .collect::<Result<Vec<_>>>()?;

        Self::from_accounts(accounts)
    }

    /// Exact, case-sensitive lookup
    pub fn find(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.name() == name)
    }

    /// Add a signed amount to the named account.
    ///
    /// No sufficiency check is made here; callers validate before applying.
    /// Returns the new balance. The ledger is unchanged on error.
    pub fn apply(&mut self, name: &str, amount: Amount) -> Result<Amount> {
        let account = self
            .accounts
            .iter_mut()
            .find(|account| account.name() == name)
            .ok_or_else(|| LedgerError::UnknownAccount {
                name: name.to_string(),
            })?;

        let balance = account.balance();
        account
            .change_balance(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow {
                name: name.to_string(),
                balance,
                amount,
            })
    }

    /// Accounts in record order
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Render the ledger in record format
    pub fn render(&self) -> String {
        self.accounts
            .iter()
            .map(|account| format!("{} {}\n", account.balance(), account.name()))
            .collect()
    }

    /// Rewrite the destination in full.
    ///
    /// The records go to a temporary file in the destination's directory which
    /// is then renamed over the destination, so readers see either the old or
    /// the new ledger and never a partial one.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let persist_error = |source| LedgerError::Persist {
            path: path.to_path_buf(),
            source,
        };

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(directory).map_err(persist_error)?;
        temp.write_all(self.render().as_bytes())
            .map_err(persist_error)?;
        temp.as_file().sync_all().map_err(persist_error)?;
        temp.persist(path).map_err(|e| persist_error(e.error))?;

        Ok(())
    }
}

fn parse_record(line: usize, record: &str) -> Result<Account> {
    let malformed = || LedgerError::MalformedRecord {
        line,
        record: record.to_string(),
    };

    let (balance, name) = record.split_once(' ').ok_or_else(malformed)?;
    if name.is_empty() {
        return Err(malformed());
    }
    let balance: Amount = balance.parse().map_err(|_| malformed())?;

    Ok(Account::new(name, balance))
}
