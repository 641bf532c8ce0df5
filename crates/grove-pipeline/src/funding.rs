//! # Funding Ledger
//!
//! Tracks per-donor balances, per-round-per-idea stake buckets and the
//! protocol reserve, and executes the actual asset transfers. Each round is
//! distributed at most once; the distribution record book is append-only.
//!
//! Accounting invariant: `total_pool_balance` should equal the pool
//! account's real token balance minus `protocol_reserve`. Distribution
//! decrements `total_pool_balance` by the paid amount only, while the
//! bucket remainder moves to the reserve - so the total overstates by the
//! reserve slice until `sync_balance` reconciles it. That discrepancy is
//! observable on purpose; downstream tooling watches it.

use crate::gate::Gate;
use crate::ideas::IdeaLedger;
use grove_core::{
    require_capability, AccountId, Amount, AssetLedger, Capability, Clock, GroveError, IdeaId,
    Result, RoleRegistry, RoundId,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Immutable record of one round's payout
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DistributionRecord {
    pub round_id: RoundId,
    pub idea_id: IdeaId,
    pub amount: Amount,
    pub distributed_at: i64,
}

#[derive(Default)]
struct Books {
    /// Cumulative per-donor deposits; informational
    donor_balances: HashMap<AccountId, Amount>,
    /// Stake buckets, keyed round then idea
    pool: HashMap<RoundId, HashMap<IdeaId, Amount>>,
    /// Leftovers from distributions, admin-reallocatable
    protocol_reserve: Amount,
    /// Running pool total; reconciled against the asset ledger by sync_balance
    total_pool_balance: Amount,
    /// Rounds that have been paid out
    distributed: HashSet<RoundId>,
    /// Append-only payout history
    distributions: Vec<DistributionRecord>,
}

/// Pool balance book and payout executor
pub struct FundingLedger {
    books: RwLock<Books>,
    assets: RwLock<Arc<dyn AssetLedger>>,
    registry: Arc<dyn RoleRegistry>,
    ideas: Arc<IdeaLedger>,
    clock: Arc<dyn Clock>,
    /// The pool's own account on the asset ledger
    pool_account: AccountId,
    gate: Gate,
}

impl FundingLedger {
    pub fn new(
        pool_account: AccountId,
        registry: Arc<dyn RoleRegistry>,
        assets: Arc<dyn AssetLedger>,
        ideas: Arc<IdeaLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            books: RwLock::new(Books::default()),
            assets: RwLock::new(assets),
            registry,
            ideas,
            clock,
            pool_account,
            gate: Gate::new("funding_ledger"),
        }
    }

    pub fn pool_account(&self) -> AccountId {
        self.pool_account
    }

    /// Generic donation into the pool.
    pub fn deposit(&self, donor: AccountId, amount: Amount) -> Result<()> {
        let _gate = self.gate.enter()?;
        if donor.is_zero() {
            return Err(GroveError::ZeroAddress);
        }
        if amount == 0 {
            return Err(GroveError::ZeroAmount);
        }

        self.assets
            .read()
            .transfer_from(donor, self.pool_account, amount)
            .map_err(|e| GroveError::TransferFailed {
                operation: "deposit",
                reason: e.to_string(),
            })?;

        let mut books = self.books.write();
        *books.donor_balances.entry(donor).or_insert(0) += amount;
        books.total_pool_balance += amount;

        tracing::info!(donor = %donor, amount, "donation received");
        Ok(())
    }

    /// Stake deposit into a specific idea's bucket, taken from `payer`.
    /// Voting capability (the round engine stakes on voters' behalf).
    pub fn deposit_for_idea_from(
        &self,
        caller: AccountId,
        payer: AccountId,
        round_id: RoundId,
        idea_id: IdeaId,
        amount: Amount,
    ) -> Result<()> {
        let _gate = self.gate.enter()?;
        if payer.is_zero() {
            return Err(GroveError::ZeroAddress);
        }
        if amount == 0 {
            return Err(GroveError::ZeroAmount);
        }
        if round_id == 0 {
            return Err(GroveError::InvalidId { id: round_id });
        }
        if idea_id == 0 {
            return Err(GroveError::InvalidId { id: idea_id });
        }
        require_capability(self.registry.as_ref(), caller, Capability::Voting)?;

        self.assets
            .read()
            .transfer_from(payer, self.pool_account, amount)
            .map_err(|e| GroveError::TransferFailed {
                operation: "deposit_for_idea_from",
                reason: e.to_string(),
            })?;

        let mut books = self.books.write();
        *books
            .pool
            .entry(round_id)
            .or_default()
            .entry(idea_id)
            .or_insert(0) += amount;
        *books.donor_balances.entry(payer).or_insert(0) += amount;
        books.total_pool_balance += amount;

        tracing::debug!(round = round_id, idea = idea_id, payer = %payer, amount, "stake deposited");
        Ok(())
    }

    /// Pay `amount` from an idea's bucket to the idea's author.
    /// Distributor capability; at most once per round.
    ///
    /// The token transfer happens before the books are committed, so a
    /// rejected transfer leaves no state change. On success the bucket is
    /// zeroed whole: the paid amount leaves the pool, the remainder moves to
    /// the protocol reserve.
    pub fn distribute_funds(
        &self,
        caller: AccountId,
        round_id: RoundId,
        idea_id: IdeaId,
        amount: Amount,
    ) -> Result<()> {
        let _gate = self.gate.enter()?;
        require_capability(self.registry.as_ref(), caller, Capability::Distributor)?;

        let available = {
            let books = self.books.read();
            if books.distributed.contains(&round_id) {
                return Err(GroveError::AlreadyDistributed { round: round_id });
            }
            bucket_of(&books, round_id, idea_id)
        };
        if amount > available {
            return Err(GroveError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        let author = self.ideas.author_of(idea_id)?;
        if author.is_zero() {
            return Err(GroveError::InvalidAuthor { idea: idea_id });
        }

        self.assets
            .read()
            .transfer(self.pool_account, author, amount)
            .map_err(|e| GroveError::TransferFailed {
                operation: "distribute_funds",
                reason: e.to_string(),
            })?;

        let mut books = self.books.write();
        let remainder = available - amount;
        if let Some(buckets) = books.pool.get_mut(&round_id) {
            buckets.insert(idea_id, 0);
        }
        books.protocol_reserve += remainder;
        // The remainder stays counted in the total until sync_balance.
        books.total_pool_balance = books.total_pool_balance.saturating_sub(amount);
        books.distributed.insert(round_id);
        books.distributions.push(DistributionRecord {
            round_id,
            idea_id,
            amount,
            distributed_at: self.clock.now(),
        });

        tracing::info!(
            round = round_id,
            idea = idea_id,
            amount,
            remainder,
            author = %author,
            "funds distributed"
        );
        Ok(())
    }

    /// Move reserve funds into an idea's bucket for a manual top-up, e.g.
    /// after a failed automated distribution. Admin capability.
    pub fn allocate_reserve_to_idea(
        &self,
        caller: AccountId,
        round_id: RoundId,
        idea_id: IdeaId,
        amount: Amount,
    ) -> Result<()> {
        let _gate = self.gate.enter()?;
        if amount == 0 {
            return Err(GroveError::ZeroAmount);
        }
        if round_id == 0 {
            return Err(GroveError::InvalidId { id: round_id });
        }
        if idea_id == 0 {
            return Err(GroveError::InvalidId { id: idea_id });
        }
        require_capability(self.registry.as_ref(), caller, Capability::Admin)?;

        let mut books = self.books.write();
        if amount > books.protocol_reserve {
            return Err(GroveError::InsufficientReserve {
                requested: amount,
                available: books.protocol_reserve,
            });
        }

        books.protocol_reserve -= amount;
        *books
            .pool
            .entry(round_id)
            .or_default()
            .entry(idea_id)
            .or_insert(0) += amount;
        books.total_pool_balance += amount;

        tracing::info!(round = round_id, idea = idea_id, amount, "reserve allocated to bucket");
        Ok(())
    }

    /// Reconcile `total_pool_balance` against the asset ledger:
    /// real pool balance minus the protocol reserve. Admin capability.
    pub fn sync_balance(&self, caller: AccountId) -> Result<()> {
        let _gate = self.gate.enter()?;
        require_capability(self.registry.as_ref(), caller, Capability::Admin)?;

        let real = self.assets.read().balance_of(self.pool_account);
        let mut books = self.books.write();
        let reconciled = real.saturating_sub(books.protocol_reserve);

        if reconciled != books.total_pool_balance {
            tracing::warn!(
                recorded = %books.total_pool_balance,
                reconciled = %reconciled,
                "pool balance drift corrected"
            );
        }
        books.total_pool_balance = reconciled;
        Ok(())
    }

    // === Read paths ===

    pub fn bucket(&self, round_id: RoundId, idea_id: IdeaId) -> Amount {
        bucket_of(&self.books.read(), round_id, idea_id)
    }

    pub fn reserve(&self) -> Amount {
        self.books.read().protocol_reserve
    }

    pub fn total_pool_balance(&self) -> Amount {
        self.books.read().total_pool_balance
    }

    pub fn donor_balance(&self, donor: AccountId) -> Amount {
        self.books
            .read()
            .donor_balances
            .get(&donor)
            .copied()
            .unwrap_or(0)
    }

    pub fn is_distributed(&self, round_id: RoundId) -> bool {
        self.books.read().distributed.contains(&round_id)
    }

    pub fn distribution(&self, round_id: RoundId) -> Option<DistributionRecord> {
        self.books
            .read()
            .distributions
            .iter()
            .find(|d| d.round_id == round_id)
            .cloned()
    }

    // === Admin ===

    /// Hot-swap the asset ledger collaborator. Admin capability.
    pub fn set_asset_ledger(&self, caller: AccountId, assets: Arc<dyn AssetLedger>) -> Result<()> {
        require_capability(self.registry.as_ref(), caller, Capability::Admin)?;
        *self.assets.write() = assets;
        tracing::info!("asset ledger replaced");
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
}

fn bucket_of(books: &Books, round_id: RoundId, idea_id: IdeaId) -> Amount {
    books
        .pool
        .get(&round_id)
        .and_then(|buckets| buckets.get(&idea_id))
        .copied()
        .unwrap_or(0)
}
