//! In-memory reputation score keeper
//!
//! Scores are signed accumulators: winners gain, losers lose. The score
//! arithmetic here is deliberately simple - the pipeline only cares about
//! the call succeeding or failing, and the `fail_next` switch lets tests
//! force the failing side.

use grove_core::{AccountId, ReputationService, ServiceError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

const WIN_DELTA: i64 = 10;
const LOSS_DELTA: i64 = 1;

/// Score-map reputation service
#[derive(Default)]
pub struct InMemoryReputation {
    scores: RwLock<HashMap<AccountId, i64>>,
    fail_next: AtomicBool,
}

impl InMemoryReputation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with `ServiceError::Unavailable` until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.fail_next.store(failing, Ordering::SeqCst);
    }

    pub fn score_of(&self, account: AccountId) -> i64 {
        self.scores.read().get(&account).copied().unwrap_or(0)
    }

    fn check_available(&self) -> Result<(), ServiceError> {
        if self.fail_next.load(Ordering::SeqCst) {
            Err(ServiceError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl ReputationService for InMemoryReputation {
    fn initialize(&self, account: AccountId) -> Result<(), ServiceError> {
        self.check_available()?;
        self.scores.write().entry(account).or_insert(0);
        Ok(())
    }

    fn increase(&self, account: AccountId) -> Result<(), ServiceError> {
        self.check_available()?;
        *self.scores.write().entry(account).or_insert(0) += WIN_DELTA;
        Ok(())
    }

    fn decrease(&self, account: AccountId) -> Result<(), ServiceError> {
        self.check_available()?;
        *self.scores.write().entry(account).or_insert(0) -= LOSS_DELTA;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_deltas() {
        let reputation = InMemoryReputation::new();
        let author = AccountId::new([1u8; 32]);

        reputation.initialize(author).unwrap();
        assert_eq!(reputation.score_of(author), 0);

        reputation.increase(author).unwrap();
        assert_eq!(reputation.score_of(author), WIN_DELTA);

        reputation.decrease(author).unwrap();
        assert_eq!(reputation.score_of(author), WIN_DELTA - LOSS_DELTA);
    }

    #[test]
    fn test_failure_switch() {
        let reputation = InMemoryReputation::new();
        let author = AccountId::new([1u8; 32]);

        reputation.set_failing(true);
        assert_eq!(
            reputation.initialize(author),
            Err(ServiceError::Unavailable)
        );

        reputation.set_failing(false);
        assert!(reputation.initialize(author).is_ok());
    }
}
