//! Pipeline configuration

use crate::error::{GroveError, Result};
use crate::types::{constants, Amount};
use serde::{Deserialize, Serialize};

/// Grant pipeline parameters
///
/// Injected once at construction by the embedding layer. Parameter changes
/// are a redeploy concern - there is no meta-governance over these values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroveConfig {
    /// Ideas drafted into each voting round
    pub ideas_per_round: u32,

    /// Voting window length per round, in seconds
    pub voting_duration_secs: u64,

    /// Cooldown between a round ending and the next opening, in seconds
    pub round_cooldown_secs: u64,

    /// Minimum stake accepted per vote
    pub min_stake: Amount,

    /// Per-idea voter list cap (bounds round-closing iteration cost)
    pub max_voters_per_idea: usize,

    /// Author share of the winning bucket, in percent; the remainder goes
    /// to the protocol reserve
    pub author_share_percent: u8,
}

impl Default for GroveConfig {
    fn default() -> Self {
        Self {
            ideas_per_round: constants::DEFAULT_IDEAS_PER_ROUND,
            voting_duration_secs: constants::DEFAULT_VOTING_DURATION_SECS,
            round_cooldown_secs: constants::DEFAULT_ROUND_COOLDOWN_SECS,
            min_stake: constants::DEFAULT_MIN_STAKE,
            max_voters_per_idea: constants::MAX_VOTERS_PER_IDEA,
            author_share_percent: constants::DEFAULT_AUTHOR_SHARE_PERCENT,
        }
    }
}

impl GroveConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ideas_per_round == 0 {
            return Err(GroveError::InvalidConfig {
                field: "ideas_per_round",
            });
        }
        if self.voting_duration_secs == 0 {
            return Err(GroveError::InvalidConfig {
                field: "voting_duration_secs",
            });
        }
        if self.min_stake == 0 {
            return Err(GroveError::InvalidConfig { field: "min_stake" });
        }
        if self.max_voters_per_idea == 0 {
            return Err(GroveError::InvalidConfig {
                field: "max_voters_per_idea",
            });
        }
        if self.author_share_percent > 100 {
            return Err(GroveError::InvalidConfig {
                field: "author_share_percent",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GroveConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ideas_per_round, 30);
        assert_eq!(config.max_voters_per_idea, 30);
        assert_eq!(config.author_share_percent, 95);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let mut config = GroveConfig::default();
        config.author_share_percent = 101;
        assert!(config.validate().is_err());

        let mut config = GroveConfig::default();
        config.ideas_per_round = 0;
        assert!(config.validate().is_err());

        let mut config = GroveConfig::default();
        config.min_stake = 0;
        assert!(config.validate().is_err());
    }
}
