use std::sync::Arc;

use thiserror::Error;

use classroom_core::{ExpectedVersion, ProductId};
use classroom_groups::Group;

/// All groups of one product plus the version they were read at.
///
/// `version` starts at 0 (no groups stored yet) and increases by one per
/// successful save. Groups are ordered by number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSet {
    pub version: u64,
    pub groups: Vec<Group>,
}

impl GroupSet {
    pub fn total_students(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }
}

/// Group store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// domain errors. A failed save leaves the stored group set untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GroupStoreError {
    /// Optimistic concurrency check failed (stale version).
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    /// The group set violates a storage invariant (foreign product, student in two groups).
    #[error("invalid write: {0}")]
    InvalidWrite(String),

    /// The backend could not complete the operation.
    #[error("group store unavailable: {0}")]
    Unavailable(String),
}

/// Storage of product group sets.
///
/// ## Load Semantics
///
/// `load_groups()` returns the product's groups ordered by number, or an
/// empty set at version 0 when nothing was stored for the product.
///
/// ## Save Semantics
///
/// `save_groups()` replaces the complete group set of a product:
/// - checks `expected_version` against the stored version
/// - validates that every group belongs to the product and that no student
///   appears in two groups
/// - persists all groups or none
/// - returns the new version
pub trait GroupStore: Send + Sync {
    fn load_groups(&self, product_id: ProductId) -> Result<GroupSet, GroupStoreError>;

    fn save_groups(
        &self,
        product_id: ProductId,
        groups: Vec<Group>,
        expected_version: ExpectedVersion,
    ) -> Result<u64, GroupStoreError>;
}

impl<S> GroupStore for Arc<S>
where
    S: GroupStore + ?Sized,
{
    fn load_groups(&self, product_id: ProductId) -> Result<GroupSet, GroupStoreError> {
        (**self).load_groups(product_id)
    }

    fn save_groups(
        &self,
        product_id: ProductId,
        groups: Vec<Group>,
        expected_version: ExpectedVersion,
    ) -> Result<u64, GroupStoreError> {
        (**self).save_groups(product_id, groups, expected_version)
    }
}
