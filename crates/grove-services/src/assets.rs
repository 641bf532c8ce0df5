//! In-memory fungible asset ledger
//!
//! ERC20-equivalent balance book for the single stake/reward asset. The
//! `transfer_from` here does not model allowances - the embedding layer is
//! trusted to have collected approvals before wiring payers in.

use grove_core::{AccountId, Amount, AssetLedger, ServiceError};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Balance-map asset ledger
#[derive(Default)]
pub struct InMemoryAssetLedger {
    balances: RwLock<HashMap<AccountId, Amount>>,
}

impl InMemoryAssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit fresh tokens to an account (faucet/genesis concern)
    pub fn mint(&self, account: AccountId, amount: Amount) {
        *self.balances.write().entry(account).or_insert(0) += amount;
    }

    /// Destroy tokens, saturating at zero. Lets tests knock an account's
    /// real balance out from under book-keeping layers.
    pub fn burn(&self, account: AccountId, amount: Amount) {
        let mut balances = self.balances.write();
        let entry = balances.entry(account).or_insert(0);
        *entry = entry.saturating_sub(amount);
    }

    fn move_tokens(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), ServiceError> {
        if from.is_zero() || to.is_zero() {
            return Err(ServiceError::Rejected("zero address".into()));
        }

        let mut balances = self.balances.write();
        let available = balances.get(&from).copied().unwrap_or(0);
        if available < amount {
            return Err(ServiceError::Rejected(format!(
                "insufficient funds: have {available}, need {amount}"
            )));
        }

        *balances.get_mut(&from).expect("balance checked above") -= amount;
        *balances.entry(to).or_insert(0) += amount;
        Ok(())
    }
}

impl AssetLedger for InMemoryAssetLedger {
    fn transfer_from(
        &self,
        payer: AccountId,
        payee: AccountId,
        amount: Amount,
    ) -> Result<(), ServiceError> {
        self.move_tokens(payer, payee, amount)
    }

    fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), ServiceError> {
        self.move_tokens(from, to, amount)
    }

    fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.read().get(&account).copied().unwrap_or(0)
    }
}
