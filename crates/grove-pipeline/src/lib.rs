//! # Grove Grant Pipeline
//!
//! Core of the grant pipeline: community ideas are registered, drafted in
//! fixed batches into stake-gated voting rounds, and the winner of each
//! round claims a grant carved out of the stakes backing it.
//!
//! Four components, wired by handle:
//!
//! - [`IdeaLedger`] - idea records and their status state machine
//! - [`FundingLedger`] - donor, bucket and reserve balances over an external
//!   asset ledger
//! - [`RoundEngine`] - round lifecycle, voting and the post-round fan-out
//! - [`GrantSettlement`] - the exactly-once claim with the author/protocol
//!   split
//!
//! External concerns (roles, reputation, progression, token custody) stay
//! behind the `grove-core` service traits. Liveness is keeper-driven: rounds
//! open and close only when someone calls in, timing is checked lazily
//! against the injected clock.

pub mod funding;
pub mod gate;
pub mod ideas;
pub mod rounds;
pub mod settlement;

pub use funding::{DistributionRecord, FundingLedger};
pub use gate::{Gate, GateToken};
pub use ideas::{Idea, IdeaLedger, Review};
pub use rounds::{Round, RoundEngine};
pub use settlement::GrantSettlement;
