//! Failure injection.
//!
//! A fault makes every matching operation on a partition fail with a store
//! error until it is healed. Subscriptions already open on a partition fail
//! on their next notification.

use std::collections::HashSet;

use flix_core::{DomainError, Partition};

/// Store operation that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Write,
    Delete,
    Subscribe,
    /// Creating a reaction ledger
    LedgerCreate,
    /// Dropping a reaction ledger
    LedgerDelete,
}

#[derive(Debug, Default)]
pub struct FaultPlan {
    faults: HashSet<(StoreOp, Option<Partition>)>,
}

impl FaultPlan {
    /// Fail `op` on `partition` (`None` for ledger operations)
    pub fn inject(&mut self, op: StoreOp, partition: Option<Partition>) {
        self.faults.insert((op, partition));
    }

    pub fn heal(&mut self, op: StoreOp, partition: Option<Partition>) {
        self.faults.remove(&(op, partition));
    }

    pub fn heal_all(&mut self) {
        self.faults.clear();
    }

    pub fn check(&self, op: StoreOp, partition: Option<Partition>) -> Result<(), DomainError> {
        if self.faults.contains(&(op, partition)) {
            let target = partition.map_or_else(|| "ledger".to_string(), |p| p.name());
            return Err(DomainError::StoreError(format!(
                "{op:?} unavailable on {target}"
            )));
        }
        Ok(())
    }
}
