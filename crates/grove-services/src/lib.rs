//! # Grove Services
//!
//! Reference in-memory implementations of the collaborator interfaces the
//! Grove pipeline consumes: capability registry, reputation score keeper,
//! voter progression tracker and fungible asset ledger.
//!
//! These back the integration suite and small deployments; production
//! embeddings substitute their own implementations of the `grove-core`
//! traits. The reputation and progression services carry a failure switch so
//! dependency outages can be exercised end to end.

pub mod assets;
pub mod progression;
pub mod registry;
pub mod reputation;

// Re-exports
pub use assets::InMemoryAssetLedger;
pub use progression::{InMemoryProgression, ProgressionTier, CURATOR_THRESHOLD, REVIEWER_THRESHOLD};
pub use registry::InMemoryRoleRegistry;
pub use reputation::InMemoryReputation;
