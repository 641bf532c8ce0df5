//! # Idea Ledger
//!
//! Owns every idea record and enforces the idea status state machine.
//! Ideas are held in an arena (`Vec`, id = index + 1) and never deleted;
//! mutation happens only through the status DAG and vote accumulation.
//!
//! Status writes are capability-gated: the round engine (Voting) and the
//! grant settlement (Grant) drive the lifecycle; curators and reviewers
//! annotate ideas while they compete; authors close out their own funded
//! work.
//!
//! Every mutating entry point takes a reentrancy latch first - a
//! collaborator reached mid-operation cannot call back in. The ledger has
//! no pause switch.

use crate::gate::Gate;
use grove_core::{
    require_any_capability, require_capability, AccountId, Amount, Capability, Clock, GroveError,
    IdeaId, IdeaStatus, ReputationService, Result, RoleRegistry, ServiceError,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A community proposal
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Idea {
    /// Assigned from a monotonic counter starting at 1; immutable
    pub id: IdeaId,

    /// Submitting identity; immutable
    pub author: AccountId,

    pub title: String,
    pub description: String,
    pub link: String,

    /// Submission timestamp
    pub created_at: i64,

    /// Stake accumulated across the idea's round
    pub total_votes: Amount,

    /// Curator flag; informational, does not affect the lifecycle
    pub is_low_quality: bool,

    pub status: IdeaStatus,
}

/// Reviewer note attached to a competing idea
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: AccountId,
    pub content: String,
    pub created_at: i64,
}

fn dependency_failed(operation: &'static str, err: ServiceError) -> GroveError {
    GroveError::DependencyFailed {
        component: "reputation",
        operation,
        reason: err.to_string(),
    }
}

/// Idea store and status state machine
pub struct IdeaLedger {
    ideas: RwLock<Vec<Idea>>,
    reviews: RwLock<HashMap<IdeaId, Vec<Review>>>,
    reputation: RwLock<Arc<dyn ReputationService>>,
    registry: Arc<dyn RoleRegistry>,
    clock: Arc<dyn Clock>,
    /// Reentrancy latch only; the idea ledger has no pause switch
    gate: Gate,
}

impl IdeaLedger {
    pub fn new(
        registry: Arc<dyn RoleRegistry>,
        reputation: Arc<dyn ReputationService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ideas: RwLock::new(Vec::new()),
            reviews: RwLock::new(HashMap::new()),
            reputation: RwLock::new(reputation),
            registry,
            clock,
            gate: Gate::new("idea_ledger"),
        }
    }

    /// Submit a new idea. The author's reputation record is initialized via
    /// the external reputation service before anything is stored - if that
    /// call fails, the whole creation fails and no record exists.
    pub fn create_idea(
        &self,
        author: AccountId,
        title: String,
        description: String,
        link: String,
    ) -> Result<IdeaId> {
        let _gate = self.gate.enter()?;
        if author.is_zero() {
            return Err(GroveError::ZeroAddress);
        }
        if title.is_empty() {
            return Err(GroveError::EmptyField { field: "title" });
        }
        if description.is_empty() {
            return Err(GroveError::EmptyField {
                field: "description",
            });
        }

        self.reputation
            .read()
            .initialize(author)
            .map_err(|e| dependency_failed("initialize", e))?;

        let mut ideas = self.ideas.write();
        let id = ideas.len() as IdeaId + 1;
        ideas.push(Idea {
            id,
            author,
            title,
            description,
            link,
            created_at: self.clock.now(),
            total_votes: 0,
            is_low_quality: false,
            status: IdeaStatus::Pending,
        });

        tracing::info!(idea = id, author = %author, "idea created");
        Ok(id)
    }

    /// Move an idea along the lifecycle DAG. Voting or Grant capability.
    pub fn update_status(
        &self,
        caller: AccountId,
        idea_id: IdeaId,
        new_status: IdeaStatus,
    ) -> Result<()> {
        let _gate = self.gate.enter()?;

        let mut ideas = self.ideas.write();
        let idea = Self::locate_mut(&mut ideas, idea_id)?;
        require_any_capability(
            self.registry.as_ref(),
            caller,
            &[Capability::Voting, Capability::Grant],
        )?;

        if idea.status == new_status {
            return Err(GroveError::NoOp {
                idea: idea_id,
                status: idea.status,
            });
        }
        if idea.status.is_terminal() {
            return Err(GroveError::TerminalState {
                idea: idea_id,
                status: idea.status,
            });
        }
        if !idea.status.can_transition_to(new_status) {
            return Err(GroveError::IllegalTransition {
                idea: idea_id,
                from: idea.status,
                to: new_status,
            });
        }

        let from = idea.status;
        idea.status = new_status;
        tracing::info!(idea = idea_id, %from, to = %new_status, "idea status updated");
        Ok(())
    }

    /// Undo a status transition made earlier in the same failed atomic
    /// operation. Bypasses the DAG; callers are responsible for only ever
    /// restoring the status they themselves just replaced.
    pub(crate) fn revert_status(&self, idea_id: IdeaId, status: IdeaStatus) -> Result<()> {
        let _gate = self.gate.enter()?;
        let mut ideas = self.ideas.write();
        let idea = Self::locate_mut(&mut ideas, idea_id)?;
        tracing::warn!(idea = idea_id, from = %idea.status, to = %status, "idea status rolled back");
        idea.status = status;
        Ok(())
    }

    /// Mirror a round vote into the idea's accumulator. Voting capability;
    /// the idea must be competing.
    pub fn add_vote(&self, caller: AccountId, idea_id: IdeaId, amount: Amount) -> Result<()> {
        let _gate = self.gate.enter()?;
        if amount == 0 {
            return Err(GroveError::ZeroAmount);
        }
        require_capability(self.registry.as_ref(), caller, Capability::Voting)?;

        let mut ideas = self.ideas.write();
        let idea = Self::locate_mut(&mut ideas, idea_id)?;
        Self::expect_status(idea, IdeaStatus::Voting)?;

        idea.total_votes += amount;
        tracing::debug!(idea = idea_id, amount, total = %idea.total_votes, "vote accumulated");
        Ok(())
    }

    /// Flag a competing idea as low quality. Curator capability; authors
    /// cannot flag their own ideas.
    pub fn mark_low_quality(&self, caller: AccountId, idea_id: IdeaId) -> Result<()> {
        let _gate = self.gate.enter()?;
        require_capability(self.registry.as_ref(), caller, Capability::Curator)?;

        let mut ideas = self.ideas.write();
        let idea = Self::locate_mut(&mut ideas, idea_id)?;
        Self::expect_status(idea, IdeaStatus::Voting)?;
        if idea.author == caller {
            return Err(GroveError::SelfActionForbidden { idea: idea_id });
        }

        idea.is_low_quality = true;
        tracing::info!(idea = idea_id, curator = %caller, "idea flagged low quality");
        Ok(())
    }

    /// Attach a review to a competing idea. Reviewer capability; authors
    /// cannot review their own ideas.
    pub fn add_review(&self, caller: AccountId, idea_id: IdeaId, content: String) -> Result<()> {
        let _gate = self.gate.enter()?;
        if content.is_empty() {
            return Err(GroveError::EmptyField { field: "content" });
        }
        require_capability(self.registry.as_ref(), caller, Capability::Reviewer)?;

        let ideas = self.ideas.read();
        let idea = Self::locate(&ideas, idea_id)?;
        Self::expect_status(idea, IdeaStatus::Voting)?;
        if idea.author == caller {
            return Err(GroveError::SelfActionForbidden { idea: idea_id });
        }
        drop(ideas);

        self.reviews.write().entry(idea_id).or_default().push(Review {
            reviewer: caller,
            content,
            created_at: self.clock.now(),
        });
        Ok(())
    }

    /// Author closes out a funded idea as delivered.
    pub fn mark_as_completed(&self, caller: AccountId, idea_id: IdeaId) -> Result<()> {
        let _gate = self.gate.enter()?;
        let mut ideas = self.ideas.write();
        let idea = Self::locate_mut(&mut ideas, idea_id)?;
        if idea.author != caller {
            return Err(GroveError::NotAuthor {
                caller,
                idea: idea_id,
            });
        }
        Self::expect_status(idea, IdeaStatus::Funded)?;

        idea.status = IdeaStatus::Completed;
        tracing::info!(idea = idea_id, "idea completed");
        Ok(())
    }

    // === Read paths ===

    pub fn get(&self, idea_id: IdeaId) -> Option<Idea> {
        let ideas = self.ideas.read();
        Self::locate(&ideas, idea_id).ok().cloned()
    }

    pub fn status_of(&self, idea_id: IdeaId) -> Result<IdeaStatus> {
        let ideas = self.ideas.read();
        Self::locate(&ideas, idea_id).map(|i| i.status)
    }

    pub fn author_of(&self, idea_id: IdeaId) -> Result<AccountId> {
        let ideas = self.ideas.read();
        Self::locate(&ideas, idea_id).map(|i| i.author)
    }

    pub fn count(&self) -> u64 {
        self.ideas.read().len() as u64
    }

    pub fn reviews_of(&self, idea_id: IdeaId) -> Vec<Review> {
        self.reviews
            .read()
            .get(&idea_id)
            .cloned()
            .unwrap_or_default()
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

    // === Internals ===

    fn locate(ideas: &[Idea], idea_id: IdeaId) -> Result<&Idea> {
        if idea_id == 0 || idea_id as usize > ideas.len() {
            return Err(GroveError::NotFound { idea: idea_id });
        }
        Ok(&ideas[idea_id as usize - 1])
    }

    fn locate_mut(ideas: &mut [Idea], idea_id: IdeaId) -> Result<&mut Idea> {
        if idea_id == 0 || idea_id as usize > ideas.len() {
            return Err(GroveError::NotFound { idea: idea_id });
        }
        Ok(&mut ideas[idea_id as usize - 1])
    }

    fn expect_status(idea: &Idea, expected: IdeaStatus) -> Result<()> {
        if idea.status != expected {
            return Err(GroveError::WrongStatus {
                idea: idea.id,
                expected,
                actual: idea.status,
            });
        }
        Ok(())
    }
}
