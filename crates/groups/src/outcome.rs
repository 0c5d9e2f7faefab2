use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use classroom_core::{GroupId, StudentId};

/// Why an enrollment was refused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Every group of the product is at `max_students`.
    ProductFull,
}

impl core::fmt::Display for Rejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Rejection::ProductFull => f.write_str("all groups are filled"),
        }
    }
}

/// Result of enrolling a student into a product's groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnrollOutcome {
    /// The student joined `group_id`; nobody else moved.
    Placed { group_id: GroupId },
    /// The student was already a member of `group_id`; nothing changed.
    AlreadyPlaced { group_id: GroupId },
    /// A new group was opened and every student was redistributed.
    ///
    /// `assignments` holds the new group of every student of the product,
    /// so callers can notify students whose group changed.
    Rebalanced {
        group_id: GroupId,
        assignments: BTreeMap<StudentId, GroupId>,
    },
    /// The student could not be placed.
    Rejected { reason: Rejection },
}

impl EnrollOutcome {
    /// Group the student ended up in, if any.
    pub fn group_id(&self) -> Option<GroupId> {
        match self {
            EnrollOutcome::Placed { group_id }
            | EnrollOutcome::AlreadyPlaced { group_id }
            | EnrollOutcome::Rebalanced { group_id, .. } => Some(*group_id),
            EnrollOutcome::Rejected { .. } => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, EnrollOutcome::Rejected { .. })
    }
}
