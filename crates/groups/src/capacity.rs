use serde::{Deserialize, Serialize};

use classroom_core::{DomainError, DomainResult, ValueObject};

/// Per-group student bounds of a product.
///
/// `min_students` drives when a new group is opened, `max_students` is the
/// hard per-group limit. Always `1 <= min_students <= max_students`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCapacity")]
pub struct Capacity {
    min_students: u32,
    max_students: u32,
}

#[derive(Deserialize)]
struct RawCapacity {
    min_students: u32,
    max_students: u32,
}

impl TryFrom<RawCapacity> for Capacity {
    type Error = DomainError;

    fn try_from(raw: RawCapacity) -> Result<Self, Self::Error> {
        Capacity::new(raw.min_students, raw.max_students)
    }
}

impl Capacity {
    pub fn new(min_students: u32, max_students: u32) -> DomainResult<Self> {
        if min_students == 0 {
            return Err(DomainError::validation("min_students must be at least 1"));
        }
        if min_students > max_students {
            return Err(DomainError::validation(format!(
                "min_students ({min_students}) cannot exceed max_students ({max_students})"
            )));
        }
        Ok(Self {
            min_students,
            max_students,
        })
    }

    pub fn min_students(&self) -> u32 {
        self.min_students
    }

    pub fn max_students(&self) -> u32 {
        self.max_students
    }

    pub(crate) fn min(&self) -> usize {
        self.min_students as usize
    }

    pub(crate) fn max(&self) -> usize {
        self.max_students as usize
    }
}

impl ValueObject for Capacity {}
