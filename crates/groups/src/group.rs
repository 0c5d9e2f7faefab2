use serde::{Deserialize, Serialize};

use classroom_core::{DomainError, DomainResult, Entity, GroupId, ProductId, StudentId};

use crate::capacity::Capacity;

/// A capacity-bounded cohort of students within one product.
///
/// `number` is 1-based creation order within the product; it orders groups
/// and breaks ties between equally populated groups. Members keep the order
/// in which they joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    product_id: ProductId,
    number: u32,
    students: Vec<StudentId>,
}

impl Group {
    /// Create an empty group.
    pub fn new(id: GroupId, product_id: ProductId, number: u32) -> Self {
        Self {
            id,
            product_id,
            number,
            students: Vec::new(),
        }
    }

    pub fn id_typed(&self) -> GroupId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn name(&self) -> String {
        format!("Group {}", self.number)
    }

    pub fn students(&self) -> &[StudentId] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn contains(&self, student: StudentId) -> bool {
        self.students.contains(&student)
    }

    pub fn is_full(&self, capacity: Capacity) -> bool {
        self.students.len() >= capacity.max()
    }

    /// Add a student. Membership is unique within a group.
    pub fn add(&mut self, student: StudentId) -> DomainResult<()> {
        if self.contains(student) {
            return Err(DomainError::conflict(format!(
                "student {student} is already a member of {}",
                self.name()
            )));
        }
        self.students.push(student);
        Ok(())
    }

    /// Remove and return every member, leaving the group empty.
    pub fn take_students(&mut self) -> Vec<StudentId> {
        std::mem::take(&mut self.students)
    }
}

impl Entity for Group {
    type Id = GroupId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Group {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Group {} ({} students)", self.number, self.students.len())
    }
}
