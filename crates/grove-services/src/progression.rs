//! In-memory voter progression tracker
//!
//! Counts winning votes per voter and reads out the elevated tier a voter
//! has reached. Role grants derived from these tiers are wiring performed by
//! the embedding layer against its role registry - the pipeline never grants
//! capabilities.

use grove_core::{AccountId, ProgressionService, ServiceError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Winning votes needed to qualify as curator
pub const CURATOR_THRESHOLD: u64 = 3;

/// Winning votes needed to qualify as reviewer
pub const REVIEWER_THRESHOLD: u64 = 10;

/// Progression tier reached by a voter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressionTier {
    None,
    Curator,
    Reviewer,
}

/// Counter-map progression service
#[derive(Default)]
pub struct InMemoryProgression {
    winning_votes: RwLock<HashMap<AccountId, u64>>,
    fail_next: AtomicBool,
}

impl InMemoryProgression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with `ServiceError::Unavailable` until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.fail_next.store(failing, Ordering::SeqCst);
    }

    pub fn winning_votes_of(&self, account: AccountId) -> u64 {
        self.winning_votes
            .read()
            .get(&account)
            .copied()
            .unwrap_or(0)
    }

    pub fn tier_of(&self, account: AccountId) -> ProgressionTier {
        let votes = self.winning_votes_of(account);
        if votes >= REVIEWER_THRESHOLD {
            ProgressionTier::Reviewer
        } else if votes >= CURATOR_THRESHOLD {
            ProgressionTier::Curator
        } else {
            ProgressionTier::None
        }
    }
}

impl ProgressionService for InMemoryProgression {
    fn register_winning_vote(&self, account: AccountId) -> Result<(), ServiceError> {
        if self.fail_next.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable);
        }
        *self.winning_votes.write().entry(account).or_insert(0) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_progression() {
        let progression = InMemoryProgression::new();
        let voter = AccountId::new([1u8; 32]);

        assert_eq!(progression.tier_of(voter), ProgressionTier::None);

        for _ in 0..CURATOR_THRESHOLD {
            progression.register_winning_vote(voter).unwrap();
        }
        assert_eq!(progression.tier_of(voter), ProgressionTier::Curator);

        for _ in CURATOR_THRESHOLD..REVIEWER_THRESHOLD {
            progression.register_winning_vote(voter).unwrap();
        }
        assert_eq!(progression.tier_of(voter), ProgressionTier::Reviewer);
        assert_eq!(progression.winning_votes_of(voter), REVIEWER_THRESHOLD);
    }

    #[test]
    fn test_failure_switch() {
        let progression = InMemoryProgression::new();
        let voter = AccountId::new([1u8; 32]);

        progression.set_failing(true);
        assert_eq!(
            progression.register_winning_vote(voter),
            Err(ServiceError::Unavailable)
        );
        assert_eq!(progression.winning_votes_of(voter), 0);
    }
}
