//! # Grove Core
//!
//! Shared vocabulary for the Grove grant pipeline: principal identities, the
//! idea status state machine, the capability set, the error taxonomy, the
//! wall-clock seam and the collaborator interfaces the pipeline consumes.
//!
//! The pipeline itself (idea ledger, funding ledger, round engine, grant
//! settlement) lives in `grove-pipeline`; reference in-memory collaborators
//! live in `grove-services`.

pub mod clock;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::GroveConfig;
pub use error::{GroveError, Result};
pub use services::{
    require_any_capability, require_capability, AssetLedger, ProgressionService,
    ReputationService, RoleRegistry, ServiceError,
};
pub use types::{AccountId, Amount, Capability, IdeaId, IdeaStatus, RoundId};
