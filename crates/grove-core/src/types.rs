//! Core type definitions for the Grove grant pipeline
//!
//! Identities, monotonic id spaces, the idea status state machine and the
//! capability vocabulary checked against the external role registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// AccountId - opaque principal identity
///
/// Principals are addresses resolved by the embedding layer (wallets,
/// component accounts, admin consoles). The pipeline never creates
/// identities, it only compares and records them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AccountId {
    id: [u8; 32],
}

impl AccountId {
    pub fn new(id: [u8; 32]) -> Self {
        Self { id }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.id
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.id)
    }

    /// The zero address. Never a valid author or payer.
    pub const ZERO: Self = Self { id: [0u8; 32] };

    pub fn is_zero(&self) -> bool {
        self.id == [0u8; 32]
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", &self.to_hex()[..12])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..12])
    }
}

/// Idea identifier. Assigned from a monotonic counter starting at 1; 0 is
/// never a valid id.
pub type IdeaId = u64;

/// Voting round identifier. Same id discipline as [`IdeaId`].
pub type RoundId = u64;

/// Token quantity, in the smallest unit of the single stake/reward asset.
pub type Amount = u128;

/// Named permission checked via the external role registry
///
/// The core never grants capabilities to itself; role wiring is entirely an
/// external concern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Drive idea status during rounds, mirror votes, stake on behalf of voters
    Voting,
    /// Settle grants (status transitions around funding)
    Grant,
    /// Execute payouts from the funding pool
    Distributor,
    /// Proxy writes into the idea registry
    IdeaRegistryProxy,
    /// Administer the external reputation service
    ReputationManager,
    /// Operational control: pause/resume, reserve moves, collaborator swaps
    Admin,
    /// Flag low-quality ideas during voting
    Curator,
    /// Attach reviews to ideas during voting
    Reviewer,
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Voting => "Voting",
            Self::Grant => "Grant",
            Self::Distributor => "Distributor",
            Self::IdeaRegistryProxy => "IdeaRegistryProxy",
            Self::ReputationManager => "ReputationManager",
            Self::Admin => "Admin",
            Self::Curator => "Curator",
            Self::Reviewer => "Reviewer",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Idea lifecycle status
///
/// Transitions are monotonic along the DAG
/// `Pending -> Voting -> {WonVoting -> Funded -> Completed} | Rejected`;
/// `Voting` may also fall directly to `Rejected` (lost round, or a round
/// nobody voted in). No idea ever revisits `Pending`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdeaStatus {
    /// Submitted, waiting to be drafted into a round
    Pending,
    /// Competing in an open round
    Voting,
    /// Won its round, grant not yet claimed
    WonVoting,
    /// Grant claimed and paid out
    Funded,
    /// Lost its round or competed in a zero-vote round
    Rejected,
    /// Author marked the funded work as delivered
    Completed,
}

impl IdeaStatus {
    /// Terminal states reject every further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }

    /// Whether the state machine has an edge from `self` to `next`.
    pub fn can_transition_to(&self, next: IdeaStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Voting)
                | (Self::Voting, Self::WonVoting)
                | (Self::Voting, Self::Rejected)
                | (Self::WonVoting, Self::Funded)
                | (Self::Funded, Self::Completed)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Voting => "Voting",
            Self::WonVoting => "WonVoting",
            Self::Funded => "Funded",
            Self::Rejected => "Rejected",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical pipeline parameters
pub mod constants {
    /// Ideas drafted into each voting round
    pub const DEFAULT_IDEAS_PER_ROUND: u32 = 30;

    /// Per-idea voter list cap (bounds round-closing iteration cost)
    pub const MAX_VOTERS_PER_IDEA: usize = 30;

    /// Author share of the winning bucket, in percent
    pub const DEFAULT_AUTHOR_SHARE_PERCENT: u8 = 95;

    /// Voting window per round: 7 days
    pub const DEFAULT_VOTING_DURATION_SECS: u64 = 7 * 24 * 3600;

    /// Cooldown between a round ending and the next one opening: 1 day
    pub const DEFAULT_ROUND_COOLDOWN_SECS: u64 = 24 * 3600;

    /// Minimum stake per vote
    pub const DEFAULT_MIN_STAKE: u128 = 100;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_hex() {
        let id = AccountId::new([0xab; 32]);
        assert_eq!(&id.to_hex()[..4], "abab");
        assert!(!id.is_zero());
        assert!(AccountId::ZERO.is_zero());
    }

    #[test]
    fn test_status_dag_edges() {
        use IdeaStatus::*;

        assert!(Pending.can_transition_to(Voting));
        assert!(Voting.can_transition_to(WonVoting));
        assert!(Voting.can_transition_to(Rejected));
        assert!(WonVoting.can_transition_to(Funded));
        assert!(Funded.can_transition_to(Completed));

        // No backward or skipped edges
        assert!(!Pending.can_transition_to(WonVoting));
        assert!(!Pending.can_transition_to(Rejected));
        assert!(!Voting.can_transition_to(Pending));
        assert!(!Voting.can_transition_to(Funded));
        assert!(!WonVoting.can_transition_to(Voting));
        assert!(!Rejected.can_transition_to(Voting));
        assert!(!Completed.can_transition_to(Funded));
    }

    #[test]
    fn test_terminal_states() {
        assert!(IdeaStatus::Rejected.is_terminal());
        assert!(IdeaStatus::Completed.is_terminal());
        assert!(!IdeaStatus::Pending.is_terminal());
        assert!(!IdeaStatus::WonVoting.is_terminal());
    }

    mod status_machine_props {
        use super::*;
        use proptest::prelude::*;

        fn any_status() -> impl Strategy<Value = IdeaStatus> {
            prop_oneof![
                Just(IdeaStatus::Pending),
                Just(IdeaStatus::Voting),
                Just(IdeaStatus::WonVoting),
                Just(IdeaStatus::Funded),
                Just(IdeaStatus::Rejected),
                Just(IdeaStatus::Completed),
            ]
        }

        proptest! {
            /// Walking arbitrary accepted edges never revisits Pending and
            /// never leaves a terminal state.
            #[test]
            fn random_walks_are_monotonic(steps in proptest::collection::vec(any_status(), 1..20)) {
                let mut current = IdeaStatus::Pending;
                for next in steps {
                    if current.can_transition_to(next) {
                        prop_assert!(!current.is_terminal());
                        prop_assert_ne!(next, IdeaStatus::Pending);
                        current = next;
                    }
                }
            }

            /// Terminal states have no outgoing edges at all.
            #[test]
            fn terminal_states_are_sinks(from in any_status(), to in any_status()) {
                if from.is_terminal() {
                    prop_assert!(!from.can_transition_to(to));
                }
            }
        }
    }
}
