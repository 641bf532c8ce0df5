//! # Round Engine
//!
//! Owns the voting-round lifecycle: drafting a batch of pending ideas into a
//! round, stake-gated voting, winner determination and the post-round
//! status/reputation fan-out.
//!
//! Rounds live in an arena (`Vec`, id = index + 1) and are never removed -
//! closed rounds stay queryable forever. Timing is evaluated lazily against
//! the injected clock: nothing here schedules anything, and closing a round
//! after its window is the job of external keepers.

use crate::funding::FundingLedger;
use crate::gate::Gate;
use crate::ideas::IdeaLedger;
use grove_core::{
    require_capability, AccountId, Amount, Capability, Clock, GroveConfig, GroveError, IdeaId,
    IdeaStatus, ProgressionService, ReputationService, Result, RoleRegistry, RoundId, ServiceError,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One voting round: a fixed batch of ideas competing over a fixed window
///
/// The aggregate owns all of its per-round state; nothing about a round is
/// stored anywhere else in the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,

    /// The competing ideas, in draft order; fixed at creation
    pub idea_ids: Vec<IdeaId>,

    pub start_time: i64,
    pub end_time: i64,

    /// Accepting votes
    pub active: bool,

    /// Finalized exactly once; winner immutable afterwards
    pub ended: bool,

    /// Sum of all stakes in this round
    pub total_votes: Amount,

    /// `None` until the round closes, and forever on a zero-vote round
    pub winning_idea_id: Option<IdeaId>,

    pub winning_votes: Amount,

    /// Stake totals per competing idea
    pub votes_by_idea: HashMap<IdeaId, Amount>,

    /// Voter identities per idea, append-only, capped
    pub voters_by_idea: HashMap<IdeaId, Vec<AccountId>>,

    /// One vote per address per round
    pub voted: HashSet<AccountId>,
}

fn dependency_failed(
    component: &'static str,
    operation: &'static str,
    err: ServiceError,
) -> GroveError {
    GroveError::DependencyFailed {
        component,
        operation,
        reason: err.to_string(),
    }
}

struct EngineState {
    rounds: Vec<Round>,
    /// Highest idea id ever drafted into a round
    last_used_idea_id: IdeaId,
    /// Close timestamp of the latest ended round; gates the cooldown
    last_round_end: Option<i64>,
}

/// Voting-round lifecycle owner
pub struct RoundEngine {
    state: RwLock<EngineState>,
    config: GroveConfig,
    /// The engine's own principal; holds the Voting capability externally
    account: AccountId,
    ideas: Arc<IdeaLedger>,
    funding: Arc<FundingLedger>,
    registry: Arc<dyn RoleRegistry>,
    reputation: RwLock<Arc<dyn ReputationService>>,
    progression: RwLock<Arc<dyn ProgressionService>>,
    clock: Arc<dyn Clock>,
    gate: Gate,
}

impl RoundEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account: AccountId,
        config: GroveConfig,
        registry: Arc<dyn RoleRegistry>,
        ideas: Arc<IdeaLedger>,
        funding: Arc<FundingLedger>,
        reputation: Arc<dyn ReputationService>,
        progression: Arc<dyn ProgressionService>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: RwLock::new(EngineState {
                rounds: Vec::new(),
                last_used_idea_id: 0,
                last_round_end: None,
            }),
            config,
            account,
            ideas,
            funding,
            registry,
            reputation: RwLock::new(reputation),
            progression: RwLock::new(progression),
            clock,
            gate: Gate::new("round_engine"),
        })
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn config(&self) -> &GroveConfig {
        &self.config
    }

    /// Open a new round over the next batch of pending ideas.
    ///
    /// Keeper-callable. Requires the inter-round cooldown to have elapsed
    /// and a full batch of ideas beyond the watermark, every one `Pending` -
    /// checked before any transition, so a bad idea in the slice fails the
    /// whole intake with no partial application.
    pub fn start_voting_round(&self) -> Result<RoundId> {
        let _gate = self.gate.enter()?;
        let now = self.clock.now();

        let candidates = {
            let state = self.state.read();
            self.check_round_start(&state, now)?;
            let first = state.last_used_idea_id + 1;
            (first..first + self.config.ideas_per_round as u64).collect::<Vec<IdeaId>>()
        };

        for &idea_id in &candidates {
            self.ideas
                .update_status(self.account, idea_id, IdeaStatus::Voting)?;
        }

        let mut state = self.state.write();
        let round_id = state.rounds.len() as RoundId + 1;
        let votes_by_idea = candidates.iter().map(|&id| (id, 0)).collect();
        state.rounds.push(Round {
            id: round_id,
            idea_ids: candidates.clone(),
            start_time: now,
            end_time: now + self.config.voting_duration_secs as i64,
            active: true,
            ended: false,
            total_votes: 0,
            winning_idea_id: None,
            winning_votes: 0,
            votes_by_idea,
            voters_by_idea: HashMap::new(),
            voted: HashSet::new(),
        });
        state.last_used_idea_id += self.config.ideas_per_round as u64;

        tracing::info!(
            round = round_id,
            first_idea = candidates[0],
            last_idea = candidates[candidates.len() - 1],
            end_time = now + self.config.voting_duration_secs as i64,
            "voting round opened"
        );
        Ok(round_id)
    }

    /// Stake `amount` on `idea_id` in an open round. One vote per address
    /// per round; stake must meet the minimum; the idea's voter list is
    /// capped. The stake flows into the funding ledger and the vote is
    /// mirrored into the idea ledger before the engine records anything, so
    /// a collaborator failure aborts the whole vote.
    pub fn vote(
        &self,
        caller: AccountId,
        round_id: RoundId,
        idea_id: IdeaId,
        amount: Amount,
    ) -> Result<()> {
        let _gate = self.gate.enter()?;
        let now = self.clock.now();

        {
            let state = self.state.read();
            let round = locate(&state.rounds, round_id)?;
            if !round.active {
                return Err(GroveError::RoundNotActive { round: round_id });
            }
            if now < round.start_time || now > round.end_time {
                return Err(GroveError::NotInWindow { round: round_id });
            }
            if round.voted.contains(&caller) {
                return Err(GroveError::AlreadyVoted {
                    round: round_id,
                    voter: caller,
                });
            }
            if amount < self.config.min_stake {
                return Err(GroveError::InsufficientStake {
                    provided: amount,
                    required: self.config.min_stake,
                });
            }
            if !round.idea_ids.contains(&idea_id) {
                return Err(GroveError::IdeaNotInRound {
                    round: round_id,
                    idea: idea_id,
                });
            }
            let voters = round
                .voters_by_idea
                .get(&idea_id)
                .map(Vec::len)
                .unwrap_or(0);
            if voters >= self.config.max_voters_per_idea {
                return Err(GroveError::MaxVotersReached {
                    round: round_id,
                    idea: idea_id,
                    cap: self.config.max_voters_per_idea,
                });
            }
        }

        // Pre-check the mirror's own failure modes so a failed mirror cannot
        // strand an already-deposited stake.
        let status = self.ideas.status_of(idea_id)?;
        if status != IdeaStatus::Voting {
            return Err(GroveError::WrongStatus {
                idea: idea_id,
                expected: IdeaStatus::Voting,
                actual: status,
            });
        }

        self.funding
            .deposit_for_idea_from(self.account, caller, round_id, idea_id, amount)?;
        self.ideas.add_vote(self.account, idea_id, amount)?;

        let mut state = self.state.write();
        let round = locate_mut(&mut state.rounds, round_id)?;
        *round.votes_by_idea.entry(idea_id).or_insert(0) += amount;
        round.total_votes += amount;
        round.voters_by_idea.entry(idea_id).or_default().push(caller);
        round.voted.insert(caller);

        tracing::debug!(round = round_id, idea = idea_id, voter = %caller, amount, "vote recorded");
        Ok(())
    }

    /// Close a round after its window. Keeper-callable, exactly once.
    ///
    /// The winner is the strict maximum over the round's idea list in draft
    /// order - the first idea to reach the maximum wins ties. A zero-vote
    /// round rejects every idea and closes with no winner and no
    /// reputation/progression side effects. Otherwise every collaborator
    /// call (reputation per author, winning-vote registration per backer of
    /// the winner) is made before any state flips; a single failure aborts
    /// the close whole.
    pub fn end_voting_round(&self, round_id: RoundId) -> Result<()> {
        let _gate = self.gate.enter()?;
        let now = self.clock.now();

        let (idea_ids, winner, winning_votes, winner_voters) = {
            let state = self.state.read();
            let round = locate(&state.rounds, round_id)?;
            if round.ended {
                return Err(GroveError::RoundAlreadyEnded { round: round_id });
            }
            if now <= round.end_time {
                return Err(GroveError::RoundNotEnded { round: round_id });
            }

            // First-seen-wins tie-break: strictly-greater replaces, equal
            // keeps the earlier idea.
            let mut winner: Option<IdeaId> = None;
            let mut winning_votes: Amount = 0;
            for &idea_id in &round.idea_ids {
                let votes = round.votes_by_idea.get(&idea_id).copied().unwrap_or(0);
                if votes > winning_votes {
                    winning_votes = votes;
                    winner = Some(idea_id);
                }
            }

            let winner_voters = winner
                .and_then(|id| round.voters_by_idea.get(&id).cloned())
                .unwrap_or_default();
            (round.idea_ids.clone(), winner, winning_votes, winner_voters)
        };

        // Statuses can drift while the round is open (any Voting/Grant
        // holder may transition ideas); re-verify the whole batch before a
        // single side effect, so a retry never double-applies the fan-out.
        for &idea_id in &idea_ids {
            let status = self.ideas.status_of(idea_id)?;
            if status != IdeaStatus::Voting {
                return Err(GroveError::WrongStatus {
                    idea: idea_id,
                    expected: IdeaStatus::Voting,
                    actual: status,
                });
            }
        }

        match winner {
            None => {
                // Nobody voted: reject the whole batch, no side effects.
                for &idea_id in &idea_ids {
                    self.ideas
                        .update_status(self.account, idea_id, IdeaStatus::Rejected)?;
                }
                tracing::info!(round = round_id, "round closed with no votes");
            }
            Some(winner_id) => {
                let reputation = self.reputation.read().clone();
                for &idea_id in &idea_ids {
                    let author = self.ideas.author_of(idea_id)?;
                    if idea_id == winner_id {
                        reputation
                            .increase(author)
                            .map_err(|e| dependency_failed("reputation", "increase", e))?;
                    } else {
                        reputation
                            .decrease(author)
                            .map_err(|e| dependency_failed("reputation", "decrease", e))?;
                    }
                }

                let progression = self.progression.read().clone();
                for &voter in &winner_voters {
                    progression
                        .register_winning_vote(voter)
                        .map_err(|e| dependency_failed("progression", "register_winning_vote", e))?;
                }

                for &idea_id in &idea_ids {
                    let target = if idea_id == winner_id {
                        IdeaStatus::WonVoting
                    } else {
                        IdeaStatus::Rejected
                    };
                    self.ideas.update_status(self.account, idea_id, target)?;
                }

                tracing::info!(
                    round = round_id,
                    winner = winner_id,
                    winning_votes = %winning_votes,
                    backers = winner_voters.len(),
                    "round closed"
                );
            }
        }

        let mut state = self.state.write();
        let round = locate_mut(&mut state.rounds, round_id)?;
        round.active = false;
        round.ended = true;
        round.winning_idea_id = winner;
        round.winning_votes = winning_votes;
        state.last_round_end = Some(now);
        Ok(())
    }

    // === Read paths (never mutate) ===

    /// Dry-run of the `start_voting_round` preconditions, reporting the
    /// precise blocking reason.
    pub fn start_round_check(&self) -> Result<()> {
        let state = self.state.read();
        self.check_round_start(&state, self.clock.now())
    }

    pub fn can_start_new_round(&self) -> bool {
        self.start_round_check().is_ok()
    }

    pub fn round(&self, round_id: RoundId) -> Option<Round> {
        let state = self.state.read();
        locate(&state.rounds, round_id).ok().cloned()
    }

    pub fn round_count(&self) -> u64 {
        self.state.read().rounds.len() as u64
    }

    pub fn votes_for(&self, round_id: RoundId, idea_id: IdeaId) -> Amount {
        let state = self.state.read();
        locate(&state.rounds, round_id)
            .ok()
            .and_then(|r| r.votes_by_idea.get(&idea_id).copied())
            .unwrap_or(0)
    }

    pub fn has_voted(&self, round_id: RoundId, voter: AccountId) -> bool {
        let state = self.state.read();
        locate(&state.rounds, round_id)
            .map(|r| r.voted.contains(&voter))
            .unwrap_or(false)
    }

    pub fn voters_of(&self, round_id: RoundId, idea_id: IdeaId) -> Vec<AccountId> {
        let state = self.state.read();
        locate(&state.rounds, round_id)
            .ok()
            .and_then(|r| r.voters_by_idea.get(&idea_id).cloned())
            .unwrap_or_default()
    }

    pub fn winner_of(&self, round_id: RoundId) -> Result<Option<IdeaId>> {
        let state = self.state.read();
        locate(&state.rounds, round_id).map(|r| r.winning_idea_id)
    }

    // === Admin ===

    /// Hot-swap the reputation collaborator. Admin capability.
    pub fn set_reputation_service(
        &self,
        caller: AccountId,
        reputation: Arc<dyn ReputationService>,
    ) -> Result<()> {
        require_capability(self.registry.as_ref(), caller, Capability::Admin)?;
        *self.reputation.write() = reputation;
        tracing::info!("reputation service replaced");
        Ok(())
    }

    /// Hot-swap the progression collaborator. Admin capability.
    pub fn set_progression_service(
        &self,
        caller: AccountId,
        progression: Arc<dyn ProgressionService>,
    ) -> Result<()> {
        require_capability(self.registry.as_ref(), caller, Capability::Admin)?;
        *self.progression.write() = progression;
        tracing::info!("progression service replaced");
        Ok(())
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

    // === Internals ===

    fn check_round_start(&self, state: &EngineState, now: i64) -> Result<()> {
        if let Some(last_end) = state.last_round_end {
            let until = last_end + self.config.round_cooldown_secs as i64;
            if now < until {
                return Err(GroveError::CooldownActive { until });
            }
        }
        let required = self.config.ideas_per_round as u64;
        let available = self.ideas.count().saturating_sub(state.last_used_idea_id);
        if available < required {
            return Err(GroveError::InsufficientIdeas {
                available,
                required,
            });
        }
        // The whole candidate slice must still be Pending - a dry-run that
        // skipped this would report startable while intake refuses.
        let first = state.last_used_idea_id + 1;
        for idea_id in first..first + required {
            let status = self.ideas.status_of(idea_id)?;
            if status != IdeaStatus::Pending {
                return Err(GroveError::IdeaNotPending {
                    idea: idea_id,
                    status,
                });
            }
        }
        Ok(())
    }
}

fn locate(rounds: &[Round], round_id: RoundId) -> Result<&Round> {
    if round_id == 0 || round_id as usize > rounds.len() {
        return Err(GroveError::RoundNotFound { round: round_id });
    }
    Ok(&rounds[round_id as usize - 1])
}

fn locate_mut(rounds: &mut [Round], round_id: RoundId) -> Result<&mut Round> {
    if round_id == 0 || round_id as usize > rounds.len() {
        return Err(GroveError::RoundNotFound { round: round_id });
    }
    Ok(&mut rounds[round_id as usize - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_core::ManualClock;
    use grove_services::{
        InMemoryAssetLedger, InMemoryProgression, InMemoryReputation, InMemoryRoleRegistry,
    };

    fn account(tag: u8) -> AccountId {
        AccountId::new([tag; 32])
    }

    struct Fixture {
        engine: RoundEngine,
        ideas: Arc<IdeaLedger>,
        assets: Arc<InMemoryAssetLedger>,
        reputation: Arc<InMemoryReputation>,
        clock: Arc<ManualClock>,
        config: GroveConfig,
    }

    /// Small-batch config so unit tests stay readable; the canonical batch
    /// of 30 is exercised by the integration suite.
    fn small_config() -> GroveConfig {
        GroveConfig {
            ideas_per_round: 3,
            voting_duration_secs: 100,
            round_cooldown_secs: 50,
            min_stake: 10,
            max_voters_per_idea: 2,
            author_share_percent: 95,
        }
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(InMemoryRoleRegistry::new());
        let reputation = Arc::new(InMemoryReputation::new());
        let progression = Arc::new(InMemoryProgression::new());
        let assets = Arc::new(InMemoryAssetLedger::new());
        let clock = Arc::new(ManualClock::new(1_000));

        let engine_account = account(0xEE);
        registry.grant(engine_account, Capability::Voting);

        let ideas = Arc::new(IdeaLedger::new(
            registry.clone(),
            reputation.clone(),
            clock.clone(),
        ));
        let funding = Arc::new(FundingLedger::new(
            account(0xF0),
            registry.clone(),
            assets.clone(),
            ideas.clone(),
            clock.clone(),
        ));
        let config = small_config();
        let engine = RoundEngine::new(
            engine_account,
            config.clone(),
            registry,
            ideas.clone(),
            funding,
            reputation.clone(),
            progression,
            clock.clone(),
        )
        .unwrap();

        Fixture {
            engine,
            ideas,
            assets,
            reputation,
            clock,
            config,
        }
    }

    fn seed_ideas(fx: &Fixture, count: u8) {
        for i in 0..count {
            fx.ideas
                .create_idea(account(i + 1), "t".into(), "d".into(), "l".into())
                .unwrap();
        }
    }

    fn fund_voter(fx: &Fixture, voter: AccountId) {
        fx.assets.mint(voter, 1_000_000);
    }

    #[test]
    fn test_round_needs_full_batch_of_pending_ideas() {
        let fx = fixture();
        seed_ideas(&fx, 2);

        assert!(!fx.engine.can_start_new_round());
        assert_eq!(
            fx.engine.start_voting_round().unwrap_err(),
            GroveError::InsufficientIdeas {
                available: 2,
                required: 3
            }
        );

        seed_ideas(&fx, 1);
        assert!(fx.engine.can_start_new_round());
        let round_id = fx.engine.start_voting_round().unwrap();
        assert_eq!(round_id, 1);

        // The whole slice moved to Voting and the watermark advanced
        for id in 1..=3 {
            assert_eq!(fx.ideas.status_of(id).unwrap(), IdeaStatus::Voting);
        }
        let round = fx.engine.round(1).unwrap();
        assert_eq!(round.idea_ids, vec![1, 2, 3]);
        assert!(round.active);
        assert_eq!(round.end_time, 1_000 + 100);
    }

    #[test]
    fn test_round_intake_refuses_non_pending_idea() {
        let fx = fixture();
        seed_ideas(&fx, 3);

        // Corrupt the slice: push idea 2 out of Pending
        fx.ideas
            .update_status(fx.engine.account(), 2, IdeaStatus::Voting)
            .unwrap();

        // The dry-run mirrors the intake check and names the offender
        assert!(!fx.engine.can_start_new_round());
        assert_eq!(
            fx.engine.start_round_check().unwrap_err(),
            GroveError::IdeaNotPending {
                idea: 2,
                status: IdeaStatus::Voting
            }
        );

        let err = fx.engine.start_voting_round().unwrap_err();
        assert_eq!(
            err,
            GroveError::IdeaNotPending {
                idea: 2,
                status: IdeaStatus::Voting
            }
        );
        // No partial application: ideas 1 and 3 untouched, no round opened
        assert_eq!(fx.ideas.status_of(1).unwrap(), IdeaStatus::Pending);
        assert_eq!(fx.ideas.status_of(3).unwrap(), IdeaStatus::Pending);
        assert_eq!(fx.engine.round_count(), 0);
    }

    #[test]
    fn test_end_round_refuses_drifted_idea() {
        let fx = fixture();
        seed_ideas(&fx, 3);
        fx.engine.start_voting_round().unwrap();

        let voter = account(0x10);
        fund_voter(&fx, voter);
        fx.engine.vote(voter, 1, 1, 100).unwrap();

        // Idea 2 drifts out of Voting through an external capability holder
        fx.ideas
            .update_status(fx.engine.account(), 2, IdeaStatus::Rejected)
            .unwrap();
        fx.clock.advance(101);

        assert_eq!(
            fx.engine.end_voting_round(1).unwrap_err(),
            GroveError::WrongStatus {
                idea: 2,
                expected: IdeaStatus::Voting,
                actual: IdeaStatus::Rejected
            }
        );
        // Refused before any side effect: no reputation applied, round open
        assert_eq!(fx.reputation.score_of(account(1)), 0);
        assert_eq!(fx.ideas.status_of(1).unwrap(), IdeaStatus::Voting);
        assert!(!fx.engine.round(1).unwrap().ended);
    }

    #[test]
    fn test_vote_precondition_order() {
        let fx = fixture();
        seed_ideas(&fx, 3);
        fx.engine.start_voting_round().unwrap();

        let voter = account(0x10);
        fund_voter(&fx, voter);

        assert_eq!(
            fx.engine.vote(voter, 9, 1, 100).unwrap_err(),
            GroveError::RoundNotFound { round: 9 }
        );
        assert_eq!(
            fx.engine.vote(voter, 1, 1, fx.config.min_stake - 1).unwrap_err(),
            GroveError::InsufficientStake {
                provided: fx.config.min_stake - 1,
                required: fx.config.min_stake
            }
        );
        assert_eq!(
            fx.engine.vote(voter, 1, 99, 100).unwrap_err(),
            GroveError::IdeaNotInRound { round: 1, idea: 99 }
        );

        fx.engine.vote(voter, 1, 1, 100).unwrap();
        assert!(fx.engine.has_voted(1, voter));
        assert_eq!(fx.engine.votes_for(1, 1), 100);

        // One vote per address per round, regardless of idea
        assert_eq!(
            fx.engine.vote(voter, 1, 2, 100).unwrap_err(),
            GroveError::AlreadyVoted {
                round: 1,
                voter
            }
        );
    }

    #[test]
    fn test_vote_window_and_voter_cap() {
        let fx = fixture();
        seed_ideas(&fx, 3);
        fx.engine.start_voting_round().unwrap();

        // Cap is 2 in the small config
        for tag in 0x10..0x12 {
            let voter = account(tag);
            fund_voter(&fx, voter);
            fx.engine.vote(voter, 1, 1, 100).unwrap();
        }
        let overflow = account(0x12);
        fund_voter(&fx, overflow);
        assert_eq!(
            fx.engine.vote(overflow, 1, 1, 100).unwrap_err(),
            GroveError::MaxVotersReached {
                round: 1,
                idea: 1,
                cap: 2
            }
        );

        // Past the window
        fx.clock.advance(101);
        let late = account(0x13);
        fund_voter(&fx, late);
        assert_eq!(
            fx.engine.vote(late, 1, 2, 100).unwrap_err(),
            GroveError::NotInWindow { round: 1 }
        );
    }

    #[test]
    fn test_first_seen_wins_tie_break() {
        let fx = fixture();
        seed_ideas(&fx, 3);
        fx.engine.start_voting_round().unwrap();

        // Equal stakes on ideas 2 and 3; idea 2 comes first in draft order
        let a = account(0x10);
        let b = account(0x11);
        fund_voter(&fx, a);
        fund_voter(&fx, b);
        fx.engine.vote(a, 1, 3, 100).unwrap();
        fx.engine.vote(b, 1, 2, 100).unwrap();

        fx.clock.advance(101);
        fx.engine.end_voting_round(1).unwrap();

        assert_eq!(fx.engine.winner_of(1).unwrap(), Some(2));
        let round = fx.engine.round(1).unwrap();
        assert_eq!(round.winning_votes, 100);
        assert_eq!(fx.ideas.status_of(2).unwrap(), IdeaStatus::WonVoting);
        assert_eq!(fx.ideas.status_of(3).unwrap(), IdeaStatus::Rejected);
    }

    #[test]
    fn test_end_round_exactly_once_and_only_after_window() {
        let fx = fixture();
        seed_ideas(&fx, 3);
        fx.engine.start_voting_round().unwrap();

        assert_eq!(
            fx.engine.end_voting_round(1).unwrap_err(),
            GroveError::RoundNotEnded { round: 1 }
        );

        fx.clock.advance(101);
        fx.engine.end_voting_round(1).unwrap();
        assert_eq!(
            fx.engine.end_voting_round(1).unwrap_err(),
            GroveError::RoundAlreadyEnded { round: 1 }
        );
    }

    #[test]
    fn test_cooldown_between_rounds() {
        let fx = fixture();
        seed_ideas(&fx, 6);
        fx.engine.start_voting_round().unwrap();
        fx.clock.advance(101);
        fx.engine.end_voting_round(1).unwrap();

        let err = fx.engine.start_voting_round().unwrap_err();
        assert_eq!(
            err,
            GroveError::CooldownActive {
                until: 1_101 + 50
            }
        );
        assert!(!fx.engine.can_start_new_round());

        fx.clock.advance(50);
        assert!(fx.engine.can_start_new_round());
        let round_id = fx.engine.start_voting_round().unwrap();
        assert_eq!(round_id, 2);
        let round = fx.engine.round(2).unwrap();
        assert_eq!(round.idea_ids, vec![4, 5, 6]);
    }
}
