//! Group allocation engine (application-level orchestration).
//!
//! The engine runs one enrollment as a single unit per product:
//!
//! ```text
//! enroll(product, student)
//!   ↓
//! 1. Read the product's student bounds from the catalog
//!   ↓
//! 2. Acquire the product lock (other products are not blocked)
//!   ↓
//! 3. Load the product's group set (with its version)
//!   ↓
//! 4. Plan the enrollment (pure: placement or full rebalance)
//!   ↓
//! 5. Save the complete group set, expecting the loaded version
//! ```
//!
//! Nothing is written when the plan is a no-op (student already placed) or a
//! rejection (product full). A failed save leaves the stored groups exactly as
//! they were; the caller may retry, since enrolling a placed student is a no-op.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use classroom_core::{DomainError, ExpectedVersion, GroupId, ProductId, StudentId};
use classroom_groups::{Capacity, EnrollOutcome, Group, plan_enrollment};

use crate::catalog::Catalog;
use crate::group_store::{GroupStore, GroupStoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The product is not in the catalog.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The stored group set changed between load and save.
    #[error("concurrent modification: {0}")]
    Conflict(String),

    /// Loading or saving groups failed; nothing was persisted.
    #[error("group storage failure: {0}")]
    Storage(GroupStoreError),

    /// Stored data or the computed plan broke a domain invariant.
    #[error("allocation invariant violated: {0}")]
    Invariant(String),
}

impl From<GroupStoreError> for AllocationError {
    fn from(value: GroupStoreError) -> Self {
        match value {
            GroupStoreError::Conflict(msg) => AllocationError::Conflict(msg),
            other => AllocationError::Storage(other),
        }
    }
}

impl From<DomainError> for AllocationError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Conflict(msg) => AllocationError::Conflict(msg),
            err @ DomainError::UnknownReference { .. } => AllocationError::Invariant(err.to_string()),
            DomainError::Validation(msg)
            | DomainError::InvariantViolation(msg)
            | DomainError::InvalidId(msg) => AllocationError::Invariant(msg),
        }
    }
}

impl AllocationError {
    /// Whether retrying the same enrollment may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AllocationError::Conflict(_) | AllocationError::Storage(_))
    }
}

/// Places students into capacity-bounded groups, one product at a time.
///
/// ## Concurrency
///
/// Each product has its own mutex, created on first use. Enrollments for the
/// same product are serialized for the whole read-plan-write sequence, so two
/// students can never both be placed into the last free seat of a group or
/// trigger competing rebalances. Enrollments for different products run in
/// parallel. The lock is never held while the caller does other work.
///
/// The versioned save is a second line: if another writer (e.g. a second
/// engine sharing the store) changed the groups in between, the save fails
/// with [`AllocationError::Conflict`] and nothing is written.
#[derive(Debug)]
pub struct AllocationEngine<S, C> {
    store: S,
    catalog: C,
    locks: Mutex<HashMap<ProductId, Arc<Mutex<()>>>>,
}

impl<S, C> AllocationEngine<S, C> {
    pub fn new(store: S, catalog: C) -> Self {
        Self {
            store,
            catalog,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    fn product_lock(&self, product_id: ProductId) -> Result<Arc<Mutex<()>>, AllocationError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| AllocationError::Storage(GroupStoreError::Unavailable("lock table poisoned".to_string())))?;
        Ok(locks.entry(product_id).or_default().clone())
    }

    /// Number of products with a lock entry.
    #[cfg(test)]
    pub(crate) fn locked_products(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }
}

impl<S, C> AllocationEngine<S, C>
where
    S: GroupStore,
    C: Catalog,
{
    /// Place `student_id` into one of the product's groups.
    ///
    /// Returns the placement, a full rebalance (every student's new group), the
    /// existing group for an already placed student, or a `ProductFull`
    /// rejection. Existing students may change groups when a rebalance runs.
    #[tracing::instrument(level = "debug", skip_all, fields(product_id = %product_id, student_id = %student_id))]
    pub fn enroll(
        &self,
        product_id: ProductId,
        student_id: StudentId,
    ) -> Result<EnrollOutcome, AllocationError> {
        // Unknown products never get a lock entry.
        let capacity = self.capacity(product_id)?;

        let lock = self.product_lock(product_id)?;
        // Guards no data; poisoning only means an earlier enroll panicked.
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let current = self.store.load_groups(product_id)?;
        let loaded_version = current.version;

        let plan = plan_enrollment(product_id, current.groups, capacity, student_id, GroupId::new)?;
        tracing::debug!(outcome = ?plan.outcome, changed = plan.changed, "enrollment planned");

        if plan.changed {
            let group_count = plan.groups.len();
            match self
                .store
                .save_groups(product_id, plan.groups, ExpectedVersion::Exact(loaded_version))
            {
                Ok(version) => {
                    tracing::debug!(version, group_count, "group set saved");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "saving groups failed; nothing persisted");
                    return Err(e.into());
                }
            }
        }

        match &plan.outcome {
            EnrollOutcome::Placed { group_id } => {
                tracing::info!(group_id = %group_id, "student placed");
            }
            EnrollOutcome::AlreadyPlaced { group_id } => {
                tracing::info!(group_id = %group_id, "student already placed");
            }
            EnrollOutcome::Rebalanced {
                group_id,
                assignments,
            } => {
                tracing::info!(
                    group_id = %group_id,
                    students = assignments.len(),
                    "new group opened; students redistributed"
                );
            }
            EnrollOutcome::Rejected { reason } => {
                tracing::warn!(%reason, "enrollment rejected");
            }
        }

        Ok(plan.outcome)
    }

    /// Current groups of a product, ordered by number.
    pub fn groups(&self, product_id: ProductId) -> Result<Vec<Group>, AllocationError> {
        if self.catalog.product(product_id).is_none() {
            return Err(AllocationError::NotFound(product_id));
        }
        Ok(self.store.load_groups(product_id)?.groups)
    }

    fn capacity(&self, product_id: ProductId) -> Result<Capacity, AllocationError> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or(AllocationError::NotFound(product_id))?;
        Ok(Capacity::new(product.min_students(), product.max_students())?)
    }
}
