//! Collaborator interfaces consumed by the pipeline
//!
//! The core calls out to four external services: a reputation score keeper,
//! a voter progression tracker, a capability registry and a fungible asset
//! ledger. All calls are synchronous and single-shot - nothing is retried
//! internally, and any failure aborts the enclosing operation whole.
//!
//! Implementations are injected at construction and may be hot-swapped by an
//! admin without redeploying the core.

use crate::error::{GroveError, Result};
use crate::types::{AccountId, Amount, Capability};
use thiserror::Error;

/// Failure reported by a collaborator
///
/// The pipeline maps these to [`GroveError::DependencyFailed`] (or
/// [`GroveError::TransferFailed`] for the asset ledger), naming the failing
/// component and operation - collaborator failures are never swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service refused the call
    #[error("rejected: {0}")]
    Rejected(String),

    /// The service could not be reached or is down
    #[error("unavailable")]
    Unavailable,
}

/// Reputation score keeper for idea authors
///
/// Single-shot, fail-fast: the caller never retries, and a failure blocks
/// the enclosing operation (idea creation, round close) until the service is
/// fixed or swapped out.
pub trait ReputationService: Send + Sync {
    /// Set up a reputation record for a new author
    fn initialize(&self, account: AccountId) -> std::result::Result<(), ServiceError>;

    /// Reward a winning author
    fn increase(&self, account: AccountId) -> std::result::Result<(), ServiceError>;

    /// Penalize a losing author
    fn decrease(&self, account: AccountId) -> std::result::Result<(), ServiceError>;
}

/// Voter progression tracker
///
/// Repeat winning voters earn elevated capabilities (curator, reviewer) -
/// those thresholds and role grants live entirely in the implementation, not
/// in the core. Fire-and-forget from the engine's perspective, except that
/// failure aborts the round close.
pub trait ProgressionService: Send + Sync {
    /// Record that `account` backed the winning idea of a round
    fn register_winning_vote(&self, account: AccountId) -> std::result::Result<(), ServiceError>;
}

/// Capability registry
///
/// Answers "does principal X hold capability Y". The core only ever queries;
/// granting and revoking are external wiring.
pub trait RoleRegistry: Send + Sync {
    fn has_capability(&self, principal: AccountId, capability: Capability) -> bool;
}

/// Fungible asset ledger (ERC20-equivalent balance book)
///
/// Transfer failure - explicit rejection or unavailability - must surface as
/// a typed failure, never as a silent no-op.
pub trait AssetLedger: Send + Sync {
    /// Move `amount` from `payer` into `payee` on the payer's prior approval
    fn transfer_from(
        &self,
        payer: AccountId,
        payee: AccountId,
        amount: Amount,
    ) -> std::result::Result<(), ServiceError>;

    /// Move `amount` from `from` (an account this ledger lets the caller
    /// spend from) to `to`
    fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> std::result::Result<(), ServiceError>;

    fn balance_of(&self, account: AccountId) -> Amount;
}

/// Explicit authorization guard, checked before any state mutation
pub fn require_capability(
    registry: &dyn RoleRegistry,
    principal: AccountId,
    capability: Capability,
) -> Result<()> {
    if registry.has_capability(principal, capability) {
        Ok(())
    } else {
        Err(GroveError::MissingCapability {
            principal,
            capability,
        })
    }
}

/// Authorization guard accepting any one of several capabilities
pub fn require_any_capability(
    registry: &dyn RoleRegistry,
    principal: AccountId,
    capabilities: &[Capability],
) -> Result<()> {
    if capabilities
        .iter()
        .any(|cap| registry.has_capability(principal, *cap))
    {
        Ok(())
    } else {
        Err(GroveError::MissingCapability {
            principal,
            capability: capabilities[0],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SingleCap(AccountId, Capability);

    impl RoleRegistry for SingleCap {
        fn has_capability(&self, principal: AccountId, capability: Capability) -> bool {
            principal == self.0 && capability == self.1
        }
    }

    #[test]
    fn test_require_capability() {
        let holder = AccountId::new([1u8; 32]);
        let other = AccountId::new([2u8; 32]);
        let registry = SingleCap(holder, Capability::Voting);

        assert!(require_capability(&registry, holder, Capability::Voting).is_ok());

        let err = require_capability(&registry, other, Capability::Voting).unwrap_err();
        assert_eq!(
            err,
            GroveError::MissingCapability {
                principal: other,
                capability: Capability::Voting,
            }
        );
    }

    #[test]
    fn test_require_any_capability() {
        let holder = AccountId::new([1u8; 32]);
        let registry = SingleCap(holder, Capability::Grant);

        assert!(require_any_capability(
            &registry,
            holder,
            &[Capability::Voting, Capability::Grant]
        )
        .is_ok());

        assert!(require_any_capability(&registry, holder, &[Capability::Admin]).is_err());
    }
}
