//! Error types for Grove pipeline operations
//!
//! Every failure names the violated invariant (which round, which idea,
//! which capability) - operational tooling parses these reasons, so variants
//! carry structured fields rather than free-form text.

use crate::types::{AccountId, Amount, Capability, IdeaId, IdeaStatus, RoundId};
use thiserror::Error;

/// Result type alias for Grove operations
pub type Result<T> = std::result::Result<T, GroveError>;

/// Errors that can occur in the Grove grant pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroveError {
    // === Input Validation ===
    /// Required text field was empty
    #[error("Field must not be empty: {field}")]
    EmptyField { field: &'static str },

    /// Amount was zero where a positive amount is required
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// The zero address is not a valid principal here
    #[error("Zero address is not allowed")]
    ZeroAddress,

    /// Round or idea id outside the valid id space
    #[error("Invalid id: {id}")]
    InvalidId { id: u64 },

    /// Configuration parameter outside its valid range
    #[error("Invalid configuration: {field}")]
    InvalidConfig { field: &'static str },

    /// Idea id not assigned yet
    #[error("Idea not found: {idea}")]
    NotFound { idea: IdeaId },

    /// Round id not assigned yet
    #[error("Round not found: {round}")]
    RoundNotFound { round: RoundId },

    // === Idea State Machine ===
    /// Transition to the current status is a no-op, rejected explicitly
    #[error("Idea {idea} is already {status}")]
    NoOp { idea: IdeaId, status: IdeaStatus },

    /// No edge between the two statuses in the lifecycle DAG
    #[error("Illegal transition for idea {idea}: {from} -> {to}")]
    IllegalTransition {
        idea: IdeaId,
        from: IdeaStatus,
        to: IdeaStatus,
    },

    /// Terminal statuses reject all further transitions
    #[error("Idea {idea} is in terminal state {status}")]
    TerminalState { idea: IdeaId, status: IdeaStatus },

    /// Operation requires the idea to be in a specific status
    #[error("Idea {idea} is {actual}, expected {expected}")]
    WrongStatus {
        idea: IdeaId,
        expected: IdeaStatus,
        actual: IdeaStatus,
    },

    /// Authors cannot curate or review their own ideas
    #[error("Author cannot act on own idea {idea}")]
    SelfActionForbidden { idea: IdeaId },

    /// Only the idea's author may perform this operation
    #[error("Caller {caller} is not the author of idea {idea}")]
    NotAuthor { caller: AccountId, idea: IdeaId },

    // === Round Lifecycle ===
    /// Inter-round cooldown has not elapsed yet
    #[error("Round cooldown active until {until}")]
    CooldownActive { until: i64 },

    /// Not enough pending ideas beyond the watermark to fill a round
    #[error("Not enough ideas for a round: have {available}, need {required}")]
    InsufficientIdeas { available: u64, required: u64 },

    /// An idea in the candidate slice is not Pending; no partial application
    #[error("Idea {idea} is {status}, round intake requires Pending")]
    IdeaNotPending { idea: IdeaId, status: IdeaStatus },

    /// Round exists but is not accepting votes
    #[error("Round {round} is not active")]
    RoundNotActive { round: RoundId },

    /// Vote arrived outside [start_time, end_time]
    #[error("Round {round} voting window is closed")]
    NotInWindow { round: RoundId },

    /// One vote per address per round
    #[error("Address {voter} already voted in round {round}")]
    AlreadyVoted { round: RoundId, voter: AccountId },

    /// Stake below the configured minimum
    #[error("Stake {provided} below minimum {required}")]
    InsufficientStake { provided: Amount, required: Amount },

    /// Idea is not part of this round's fixed set
    #[error("Idea {idea} is not part of round {round}")]
    IdeaNotInRound { round: RoundId, idea: IdeaId },

    /// Per-idea voter list is full
    #[error("Idea {idea} reached the voter cap of {cap} in round {round}")]
    MaxVotersReached {
        round: RoundId,
        idea: IdeaId,
        cap: usize,
    },

    /// end_voting_round before end_time has passed
    #[error("Round {round} has not ended yet")]
    RoundNotEnded { round: RoundId },

    /// Rounds are finalized exactly once
    #[error("Round {round} already ended")]
    RoundAlreadyEnded { round: RoundId },

    /// Round closed without a winner
    #[error("Round {round} has no winner")]
    NoWinner { round: RoundId },

    // === Funding & Settlement ===
    /// At most one distribution per round
    #[error("Round {round} already distributed")]
    AlreadyDistributed { round: RoundId },

    /// Requested amount exceeds the idea's bucket
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Amount,
        available: Amount,
    },

    /// Requested amount exceeds the protocol reserve
    #[error("Insufficient reserve: requested {requested}, available {available}")]
    InsufficientReserve {
        requested: Amount,
        available: Amount,
    },

    /// Idea's funding bucket holds nothing to claim
    #[error("Bucket for idea {idea} in round {round} is empty")]
    EmptyBucket { round: RoundId, idea: IdeaId },

    /// Author resolved from the idea ledger is the zero address
    #[error("Idea {idea} resolves to an invalid author")]
    InvalidAuthor { idea: IdeaId },

    // === Authorization ===
    /// Principal does not hold the required capability
    #[error("Principal {principal} lacks capability {capability}")]
    MissingCapability {
        principal: AccountId,
        capability: Capability,
    },

    // === External Dependencies ===
    /// A collaborator call failed; the enclosing operation is aborted whole
    #[error("Dependency {component}::{operation} failed: {reason}")]
    DependencyFailed {
        component: &'static str,
        operation: &'static str,
        reason: String,
    },

    /// Asset ledger rejected a transfer
    #[error("Token transfer failed during {operation}: {reason}")]
    TransferFailed {
        operation: &'static str,
        reason: String,
    },

    // === Operational ===
    /// Component is paused by an admin
    #[error("Component {component} is paused")]
    Paused { component: &'static str },

    /// Reentrant call into a mutating entry point
    #[error("Reentrant call into {component}")]
    ReentrantCall { component: &'static str },
}

impl GroveError {
    /// Check if the failure came from a collaborator rather than the core.
    ///
    /// Keepers retry these once the dependency is fixed or swapped out;
    /// everything else is a caller error.
    pub fn is_dependency_failure(&self) -> bool {
        matches!(
            self,
            Self::DependencyFailed { .. } | Self::TransferFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_invariant() {
        let err = GroveError::AlreadyDistributed { round: 7 };
        assert!(format!("{}", err).contains('7'));

        let err = GroveError::MissingCapability {
            principal: AccountId::new([1u8; 32]),
            capability: Capability::Distributor,
        };
        assert!(format!("{}", err).contains("Distributor"));
    }

    #[test]
    fn test_dependency_classification() {
        let dep = GroveError::DependencyFailed {
            component: "reputation",
            operation: "increase",
            reason: "unavailable".into(),
        };
        assert!(dep.is_dependency_failure());

        let transfer = GroveError::TransferFailed {
            operation: "distribute_funds",
            reason: "rejected".into(),
        };
        assert!(transfer.is_dependency_failure());

        assert!(!GroveError::ZeroAmount.is_dependency_failure());
    }
}
