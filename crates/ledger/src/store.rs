//! Shared ledger handle used by concurrent participant sessions
//!
//! Lookups, holds and commits all go through one mutex, so the sufficiency
//! check, the hold and the later apply-and-persist never interleave with
//! another session's.

use crate::error::Result;
use crate::hold::{Hold, HoldBook, HoldCheck};
use crate::ledger::Ledger;
use parking_lot::Mutex;
use proven_common::{Amount, SessionId};
use std::path::PathBuf;
use std::sync::Arc;

/// Outcome of asking the store to hold funds for a vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldDecision {
    /// Funds are held; the participant may vote commit
    Held { balance: Amount },
    /// No account with that name
    UnknownAccount,
    /// A debit larger than the available balance
    InsufficientFunds { available: Amount },
    /// Applying the change could take the balance out of representable range
    Overflow,
}

/// A transfer that was applied and persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTransfer {
    pub account: String,
    pub amount: Amount,
    pub balance: Amount,
}

struct StoreInner {
    ledger: Ledger,
    holds: HoldBook,
    path: PathBuf,
}

/// Ledger, outstanding holds and record location behind one lock
#[derive(Clone)]
pub struct LedgerStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl LedgerStore {
    /// Load the ledger from `path`; commits are persisted back to the same path
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let ledger = Ledger::load(&path)?;
        Ok(Self::new(ledger, path))
    }

    pub fn new(ledger: Ledger, path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                ledger,
                holds: HoldBook::new(),
                path: path.into(),
            })),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.inner.lock().path.clone()
    }

    pub fn balance(&self, account: &str) -> Option<Amount> {
        self.inner.lock().ledger.find(account).map(|a| a.balance())
    }

    /// Copy of the current ledger
    pub fn snapshot(&self) -> Ledger {
        self.inner.lock().ledger.clone()
    }

    pub fn outstanding_holds(&self) -> usize {
        self.inner.lock().holds.len()
    }

    /// Validate a proposed change and, if it is acceptable, hold it for the session
    pub fn try_hold(&self, session: SessionId, account: &str, amount: Amount) -> HoldDecision {
        let mut inner = self.inner.lock();

        let Some(balance) = inner.ledger.find(account).map(|a| a.balance()) else {
            return HoldDecision::UnknownAccount;
        };

        match inner.holds.check(account, amount, balance) {
            HoldCheck::Fits => {}
            HoldCheck::Insufficient { available } => {
                return HoldDecision::InsufficientFunds { available };
            }
            HoldCheck::Overflow => return HoldDecision::Overflow,
        }

        inner.holds.place(
            session,
            Hold {
                account: account.to_string(),
                amount,
            },
        );
        HoldDecision::Held { balance }
    }

    /// Drop the session's hold without touching any balance
    pub fn release(&self, session: SessionId) -> Option<Hold> {
        self.inner.lock().holds.release(session)
    }

    /// Apply the session's held change and persist the whole ledger.
    ///
    /// Returns `Ok(None)` if the session holds nothing. If persisting fails
    /// the in-memory change is undone so memory and disk stay in agreement.
    pub fn commit(&self, session: SessionId) -> Result<Option<AppliedTransfer>> {
        let mut inner = self.inner.lock();
        let StoreInner {
            ledger,
            holds,
            path,
        } = &mut *inner;

        let Some(hold) = holds.release(session) else {
            return Ok(None);
        };

        let balance = ledger.apply(&hold.account, hold.amount)?;

        if let Err(err) = ledger.persist(path.as_path()) {
            if let Err(undo) = ledger.apply(&hold.account, -hold.amount) {
                tracing::error!(
                    account = %hold.account,
                    "Unable to undo unpersisted change: {}",
                    undo
                );
            }
            return Err(err);
        }

        Ok(Some(AppliedTransfer {
            account: hold.account,
            amount: hold.amount,
            balance,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(records: &str) -> (tempfile::TempDir, LedgerStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        std::fs::write(&path, records).unwrap();
        let store = LedgerStore::open(&path).unwrap();
        (dir, store)
    }

    #[test]
    fn test_hold_then_commit_persists() {
        let (_dir, store) = store("100 alice\n50 bob\n");
        let session = SessionId::new();

        assert_eq!(
            store.try_hold(session, "alice", Amount::from(-30)),
            HoldDecision::Held {
                balance: Amount::from(100)
            }
        );

        let applied = store.commit(session).unwrap().unwrap();
        assert_eq!(applied.balance, Amount::from(70));
        assert_eq!(store.outstanding_holds(), 0);

        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(on_disk, "70 alice\n50 bob\n");
    }

    #[test]
    fn test_release_leaves_balances_alone() {
        let (_dir, store) = store("100 alice\n");
        let session = SessionId::new();

        store.try_hold(session, "alice", Amount::from(-30));
        assert!(store.release(session).is_some());

        assert_eq!(store.balance("alice"), Some(Amount::from(100)));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "100 alice\n");
        assert!(store.commit(session).unwrap().is_none());
    }

    #[test]
    fn test_unknown_and_insufficient() {
        let (_dir, store) = store("10 alice\n");

        assert_eq!(
            store.try_hold(SessionId::new(), "carol", Amount::from(5)),
            HoldDecision::UnknownAccount
        );
        assert_eq!(
            store.try_hold(SessionId::new(), "alice", Amount::from(-30)),
            HoldDecision::InsufficientFunds {
                available: Amount::from(10)
            }
        );
        assert_eq!(store.outstanding_holds(), 0);
    }

    #[test]
    fn test_concurrent_sessions_cannot_double_spend() {
        let (_dir, store) = store("100 alice\n");
        let first = SessionId::new();
        let second = SessionId::new();

        assert!(matches!(
            store.try_hold(first, "alice", Amount::from(-80)),
            HoldDecision::Held { .. }
        ));
        assert_eq!(
            store.try_hold(second, "alice", Amount::from(-80)),
            HoldDecision::InsufficientFunds {
                available: Amount::from(20)
            }
        );

        store.release(first);
        assert!(matches!(
            store.try_hold(second, "alice", Amount::from(-80)),
            HoldDecision::Held { .. }
        ));
    }

    #[test]
    fn test_credit_overflow_is_refused_before_holding() {
        let (_dir, store) = store("79228162514264337593543950335 whale
");

        assert_eq!(
            store.try_hold(SessionId::new(), "whale", Amount::from(1)),
            HoldDecision::Overflow
        );
        assert_eq!(store.outstanding_holds(), 0);
    }

    #[test]
    fn test_held_credits_count_toward_ceiling() {
        let (_dir, store) = store("0 whale
");
        let half: Amount = "39614081257132168796771975168".parse().unwrap();
        let first = SessionId::new();

        assert!(matches!(
            store.try_hold(first, "whale", half),
            HoldDecision::Held { .. }
        ));
        assert_eq!(
            store.try_hold(SessionId::new(), "whale", half),
            HoldDecision::Overflow
        );

        store.commit(first).unwrap().unwrap();
        assert_eq!(store.balance("whale"), Some(half));
    }

    #[test]
    fn test_failed_persist_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("accounts.txt");
        let store = LedgerStore::new(Ledger::parse("100 alice\n").unwrap(), &path);
        let session = SessionId::new();

        store.try_hold(session, "alice", Amount::from(-30));
        assert!(store.commit(session).is_err());
        assert_eq!(store.balance("alice"), Some(Amount::from(100)));
    }
}
