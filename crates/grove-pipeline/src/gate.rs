//! Operational gate: pause flag and reentrancy latch
//!
//! Execution is strictly serialized per mutating operation, but the
//! multi-step protocols (transition status, then distribute) cross component
//! boundaries, so a reentrant callback arriving through a collaborator must
//! be blocked explicitly. Every externally reachable mutating entry point
//! takes its component's gate first.
//!
//! Each component owns an independent gate - operational runbooks pause
//! funding, rounds and settlement selectively, never through one switch.
//! The idea ledger's gate is latch-only; its pause flag is never raised.

use grove_core::{require_capability, AccountId, Capability, GroveError, Result, RoleRegistry};
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-component pause flag and reentrancy latch
#[derive(Debug)]
pub struct Gate {
    component: &'static str,
    paused: AtomicBool,
    busy: AtomicBool,
}

/// RAII token holding the reentrancy latch; released on drop
#[derive(Debug)]
pub struct GateToken<'a> {
    gate: &'a Gate,
}

impl Gate {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            paused: AtomicBool::new(false),
            busy: AtomicBool::new(false),
        }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    /// Take the gate for one mutating call: rejects when paused, rejects
    /// reentrant entry, otherwise holds the latch until the token drops.
    pub fn enter(&self) -> Result<GateToken<'_>> {
        if self.paused.load(Ordering::SeqCst) {
            return Err(GroveError::Paused {
                component: self.component,
            });
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(GroveError::ReentrantCall {
                component: self.component,
            });
        }
        Ok(GateToken { gate: self })
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Admin-gated pause. Read paths stay available while paused.
    pub fn pause(&self, registry: &dyn RoleRegistry, caller: AccountId) -> Result<()> {
        require_capability(registry, caller, Capability::Admin)?;
        self.paused.store(true, Ordering::SeqCst);
        tracing::info!(component = self.component, "component paused");
        Ok(())
    }

    /// Admin-gated resume.
    pub fn resume(&self, registry: &dyn RoleRegistry, caller: AccountId) -> Result<()> {
        require_capability(registry, caller, Capability::Admin)?;
        self.paused.store(false, Ordering::SeqCst);
        tracing::info!(component = self.component, "component resumed");
        Ok(())
    }
}

impl Drop for GateToken<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AdminOnly(AccountId);

    impl RoleRegistry for AdminOnly {
        fn has_capability(&self, principal: AccountId, capability: Capability) -> bool {
            principal == self.0 && capability == Capability::Admin
        }
    }

    #[test]
    fn test_reentrancy_blocked_while_held() {
        let gate = Gate::new("test");

        let token = gate.enter().unwrap();
        assert_eq!(
            gate.enter().unwrap_err(),
            GroveError::ReentrantCall { component: "test" }
        );

        drop(token);
        assert!(gate.enter().is_ok());
    }

    #[test]
    fn test_pause_requires_admin() {
        let gate = Gate::new("test");
        let admin = AccountId::new([1u8; 32]);
        let intruder = AccountId::new([2u8; 32]);
        let registry = AdminOnly(admin);

        assert!(gate.pause(&registry, intruder).is_err());
        assert!(!gate.is_paused());

        gate.pause(&registry, admin).unwrap();
        assert!(gate.is_paused());
        assert_eq!(
            gate.enter().unwrap_err(),
            GroveError::Paused { component: "test" }
        );

        gate.resume(&registry, admin).unwrap();
        assert!(gate.enter().is_ok());
    }
}
