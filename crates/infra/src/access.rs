//! Access gateway: records access grants and places granted students.
//!
//! Granting access is an explicit call that runs the allocation engine right
//! after the grant is recorded. A grant that cannot be honoured (product
//! full, unknown product or student) is recorded as denied.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use classroom_core::{ProductId, StudentId};
use classroom_groups::{EnrollOutcome, Rejection};

use crate::allocation::{AllocationEngine, AllocationError};
use crate::catalog::Catalog;
use crate::group_store::GroupStore;
use crate::record_store::{InMemoryRecordStore, RecordStore};

/// A request to grant (or withdraw) a student's access to a product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub product_id: ProductId,
    pub student_id: StudentId,
    pub granted: bool,
}

impl AccessGrant {
    pub fn granted(product_id: ProductId, student_id: StudentId) -> Self {
        Self {
            product_id,
            student_id,
            granted: true,
        }
    }
}

/// Recorded state of a student's access to a product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessStatus {
    Granted,
    Denied,
    /// The last grant had `granted = false`.
    Withheld,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub grant: AccessGrant,
    pub status: AccessStatus,
}

/// What the gateway did with a grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access granted; the student is in a group.
    Granted(EnrollOutcome),
    /// Access refused by the allocation engine.
    Denied(Rejection),
    /// `granted = false`: recorded, nobody placed.
    Ignored,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("student {0} not found")]
    StudentNotFound(StudentId),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error(transparent)]
    Allocation(AllocationError),
}

impl From<AllocationError> for AccessError {
    fn from(value: AllocationError) -> Self {
        match value {
            AllocationError::NotFound(product_id) => AccessError::ProductNotFound(product_id),
            other => AccessError::Allocation(other),
        }
    }
}

/// Entry point for access grants.
#[derive(Debug)]
pub struct AccessGateway<S, C> {
    engine: Arc<AllocationEngine<S, C>>,
    records: InMemoryRecordStore<(ProductId, StudentId), AccessRecord>,
}

impl<S, C> AccessGateway<S, C>
where
    S: GroupStore,
    C: Catalog,
{
    pub fn new(engine: Arc<AllocationEngine<S, C>>) -> Self {
        Self {
            engine,
            records: InMemoryRecordStore::new(),
        }
    }

    pub fn engine(&self) -> &Arc<AllocationEngine<S, C>> {
        &self.engine
    }

    /// Record `grant` and, if it grants access, place the student.
    ///
    /// Engine errors are returned as-is; the gateway never retries.
    ///
    /// A `granted = false` grant only updates the record to `Withheld`. A
    /// student who is already placed stays in their group, while
    /// [`has_access`](Self::has_access) reports `false` from then on.
    pub fn grant(&self, grant: AccessGrant) -> Result<AccessDecision, AccessError> {
        if !grant.granted {
            self.record(grant, AccessStatus::Withheld);
            tracing::info!(
                product_id = %grant.product_id,
                student_id = %grant.student_id,
                "access withheld; no placement"
            );
            return Ok(AccessDecision::Ignored);
        }

        if self.engine.catalog().student(grant.student_id).is_none() {
            self.record(grant, AccessStatus::Denied);
            return Err(AccessError::StudentNotFound(grant.student_id));
        }

        let outcome = match self.engine.enroll(grant.product_id, grant.student_id) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.record(grant, AccessStatus::Denied);
                return Err(e.into());
            }
        };

        match outcome {
            EnrollOutcome::Rejected { reason } => {
                self.record(grant, AccessStatus::Denied);
                Ok(AccessDecision::Denied(reason))
            }
            placed => {
                self.record(grant, AccessStatus::Granted);
                Ok(AccessDecision::Granted(placed))
            }
        }
    }

    pub fn record_for(&self, product_id: ProductId, student_id: StudentId) -> Option<AccessRecord> {
        self.records.get(&(product_id, student_id))
    }

    pub fn has_access(&self, product_id: ProductId, student_id: StudentId) -> bool {
        matches!(
            self.record_for(product_id, student_id),
            Some(AccessRecord {
                status: AccessStatus::Granted,
                ..
            })
        )
    }

    fn record(&self, grant: AccessGrant, status: AccessStatus) {
        self.records
            .upsert((grant.product_id, grant.student_id), AccessRecord { grant, status });
    }
}
