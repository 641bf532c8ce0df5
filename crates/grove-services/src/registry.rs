//! In-memory capability registry
//!
//! Role wiring is an external concern: adjacent layers (deploy scripts,
//! admin consoles) grant and revoke here, the pipeline only queries.

use grove_core::{AccountId, Capability, RoleRegistry};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// HashMap-backed role registry
#[derive(Default)]
pub struct InMemoryRoleRegistry {
    grants: RwLock<HashMap<AccountId, HashSet<Capability>>>,
}

impl InMemoryRoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, principal: AccountId, capability: Capability) {
        self.grants
            .write()
            .entry(principal)
            .or_default()
            .insert(capability);
    }

    pub fn revoke(&self, principal: AccountId, capability: Capability) {
        if let Some(caps) = self.grants.write().get_mut(&principal) {
            caps.remove(&capability);
        }
    }

    /// Capabilities currently held by a principal
    pub fn capabilities_of(&self, principal: AccountId) -> Vec<Capability> {
        self.grants
            .read()
            .get(&principal)
            .map(|caps| caps.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl RoleRegistry for InMemoryRoleRegistry {
    fn has_capability(&self, principal: AccountId, capability: Capability) -> bool {
        self.grants
            .read()
            .get(&principal)
            .is_some_and(|caps| caps.contains(&capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_and_revoke() {
        let registry = InMemoryRoleRegistry::new();
        let principal = AccountId::new([1u8; 32]);

        assert!(!registry.has_capability(principal, Capability::Voting));

        registry.grant(principal, Capability::Voting);
        assert!(registry.has_capability(principal, Capability::Voting));
        assert!(!registry.has_capability(principal, Capability::Admin));

        registry.revoke(principal, Capability::Voting);
        assert!(!registry.has_capability(principal, Capability::Voting));
    }

    #[test]
    fn test_capabilities_of() {
        let registry = InMemoryRoleRegistry::new();
        let principal = AccountId::new([2u8; 32]);

        registry.grant(principal, Capability::Curator);
        registry.grant(principal, Capability::Reviewer);

        let caps = registry.capabilities_of(principal);
        assert_eq!(caps.len(), 2);
        assert!(caps.contains(&Capability::Curator));
    }
}
