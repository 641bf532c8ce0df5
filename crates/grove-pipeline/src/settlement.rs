//! # Grant Settlement
//!
//! The exactly-once claim path: after a round has closed with a winner, the
//! winning author claims their share of the idea's funding bucket. The
//! author's cut is an integer floor of the configured percentage; everything
//! left in the bucket, dust included, lands in the protocol reserve inside
//! the funding ledger.
//!
//! Settlement acts through its own principal, which externally holds the
//! Grant capability (for the status transition) and the Distributor
//! capability (for the payout).

use crate::funding::FundingLedger;
use crate::gate::Gate;
use crate::ideas::IdeaLedger;
use crate::rounds::RoundEngine;
use grove_core::{
    AccountId, Amount, GroveError, IdeaId, IdeaStatus, Result, RoleRegistry, RoundId,
};
use std::sync::Arc;

/// Exactly-once grant claim for round winners
pub struct GrantSettlement {
    /// Settlement's own principal
    account: AccountId,
    author_share_percent: u8,
    rounds: Arc<RoundEngine>,
    ideas: Arc<IdeaLedger>,
    funding: Arc<FundingLedger>,
    registry: Arc<dyn RoleRegistry>,
    gate: Gate,
}

impl GrantSettlement {
    pub fn new(
        account: AccountId,
        author_share_percent: u8,
        registry: Arc<dyn RoleRegistry>,
        rounds: Arc<RoundEngine>,
        ideas: Arc<IdeaLedger>,
        funding: Arc<FundingLedger>,
    ) -> Self {
        Self {
            account,
            author_share_percent,
            rounds,
            ideas,
            funding,
            registry,
            gate: Gate::new("grant_settlement"),
        }
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    /// Pay the winning author their share of the winner's bucket.
    ///
    /// Only the author of the winning idea may claim, at most once per
    /// round. The idea moves `WonVoting -> Funded` before the payout is
    /// invoked; a payout failure rolls the status back and aborts the claim
    /// whole.
    pub fn claim_grant(&self, caller: AccountId, round_id: RoundId) -> Result<Amount> {
        let _gate = self.gate.enter()?;
        let (winner, _author, bucket) = self.check_claim(caller, round_id)?;

        let payout = bucket * self.author_share_percent as Amount / 100;

        self.ideas
            .update_status(self.account, winner, IdeaStatus::Funded)?;
        if let Err(err) = self
            .funding
            .distribute_funds(self.account, round_id, winner, payout)
        {
            // Undo our own transition so the claim stays retryable.
            if let Err(revert_err) = self.ideas.revert_status(winner, IdeaStatus::WonVoting) {
                tracing::error!(
                    idea = winner,
                    error = %revert_err,
                    "status rollback failed after aborted payout"
                );
            }
            return Err(err);
        }

        tracing::info!(
            round = round_id,
            idea = winner,
            author = %caller,
            payout = %payout,
            "grant claimed"
        );
        Ok(payout)
    }

    /// Dry-run of the claim preconditions, reporting the precise blocking
    /// reason. Pure; stable under repetition.
    pub fn can_claim_grant(&self, caller: AccountId, round_id: RoundId) -> Result<()> {
        self.check_claim(caller, round_id).map(|_| ())
    }

    pub fn pause(&self, caller: AccountId) -> Result<()> {
        self.gate.pause(self.registry.as_ref(), caller)
    }

    pub fn resume(&self, caller: AccountId) -> Result<()> {
        self.gate.resume(self.registry.as_ref(), caller)
    }

    pub fn is_paused(&self) -> bool {
        self.gate.is_paused()
    }

    /// Ordered claim preconditions shared by the claim and its dry-run.
    fn check_claim(
        &self,
        caller: AccountId,
        round_id: RoundId,
    ) -> Result<(IdeaId, AccountId, Amount)> {
        if self.funding.is_distributed(round_id) {
            return Err(GroveError::AlreadyDistributed { round: round_id });
        }
        let round = self
            .rounds
            .round(round_id)
            .ok_or(GroveError::RoundNotFound { round: round_id })?;
        if !round.ended {
            return Err(GroveError::RoundNotEnded { round: round_id });
        }
        let winner = round
            .winning_idea_id
            .ok_or(GroveError::NoWinner { round: round_id })?;

        let status = self.ideas.status_of(winner)?;
        if status != IdeaStatus::WonVoting {
            return Err(GroveError::WrongStatus {
                idea: winner,
                expected: IdeaStatus::WonVoting,
                actual: status,
            });
        }
        let author = self.ideas.author_of(winner)?;
        if author.is_zero() {
            return Err(GroveError::InvalidAuthor { idea: winner });
        }
        if caller != author {
            return Err(GroveError::NotAuthor {
                caller,
                idea: winner,
            });
        }
        let bucket = self.funding.bucket(round_id, winner);
        if bucket == 0 {
            return Err(GroveError::EmptyBucket {
                round: round_id,
                idea: winner,
            });
        }
        Ok((winner, author, bucket))
    }
}
