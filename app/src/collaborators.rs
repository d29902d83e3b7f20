//! Minimal in-memory implementations of the collaborator traits, for
//! tests and for embedding this workspace behind a substrate that has
//! no real bank/staking modules of its own yet. A production node binds
//! `Keepers` to its actual bank/staking keepers instead.

use std::collections::BTreeMap;

use paw_compute::{BankKeeper, ProofVerifier};
use paw_oracle::StakingKeeper;
use paw_types::{Amount, Ratio};

#[derive(Default)]
pub struct InMemoryBank {
    balances: BTreeMap<String, Amount>,
    module_balance: Amount,
}

impl InMemoryBank {
    pub fn fund(&mut self, account: &str, amount: Amount) {
        let bal = self.balance(account);
        self.balances.insert(account.to_string(), bal + amount);
    }

    pub fn balance(&self, account: &str) -> Amount {
        self.balances.get(account).copied().unwrap_or_else(Amount::zero)
    }
}

impl BankKeeper for InMemoryBank {
    fn transfer_to_module(&mut self, from: &str, amount: Amount) -> Result<(), paw_compute::ContractError> {
        let bal = self.balance(from);
        if bal < amount {
            return Err(paw_compute::ContractError::BankTransferFailed(format!("{from} has insufficient balance")));
        }
        self.balances.insert(from.to_string(), bal - amount);
        self.module_balance += amount;
        Ok(())
    }

    fn transfer_from_module(&mut self, to: &str, amount: Amount) -> Result<(), paw_compute::ContractError> {
        if self.module_balance < amount {
            return Err(paw_compute::ContractError::BankTransferFailed("module balance underflow".to_string()));
        }
        self.module_balance -= amount;
        let bal = self.balance(to);
        self.balances.insert(to.to_string(), bal + amount);
        Ok(())
    }
}

/// Bonded power mirrors registered stake and `slash` just records calls;
/// a real binary wires this to its actual staking module instead.
#[derive(Default)]
pub struct InMemoryStaking {
    stakes: BTreeMap<String, Amount>,
    pub slashes: Vec<(String, u64)>,
}

impl InMemoryStaking {
    pub fn set_stake(&mut self, validator: &str, amount: Amount) {
        self.stakes.insert(validator.to_string(), amount);
    }
}

impl StakingKeeper for InMemoryStaking {
    fn bonded_power(&self, validator: &str) -> Result<Amount, paw_oracle::ContractError> {
        Ok(self.stakes.get(validator).copied().unwrap_or_else(Amount::zero))
    }

    fn slash(&mut self, validator: &str, _slash_fraction: Ratio, infraction_height: u64, _power: Amount) -> Result<(), paw_oracle::ContractError> {
        self.slashes.push((validator.to_string(), infraction_height));
        Ok(())
    }
}

/// Accepts every proof. The real verifier is an opaque ZK-proof checker
/// out of scope per spec.md §1; production code binds a genuine one.
pub struct AcceptAllVerifier;

impl ProofVerifier for AcceptAllVerifier {
    fn verify(&self, _request_id: u64, _proof_blob: &[u8]) -> bool {
        true
    }
}
