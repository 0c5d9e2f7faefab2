//! Applying a capacity decision to a product's groups.

use std::collections::BTreeMap;

use classroom_core::{DomainError, DomainResult, GroupId, ProductId, StudentId};

use crate::capacity::Capacity;
use crate::distribution::distribute;
use crate::group::Group;
use crate::outcome::{EnrollOutcome, Rejection};
use crate::policy::{Decision, decide};

/// Next state of a product's groups after one enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentPlan {
    /// Every group of the product, ordered by number.
    pub groups: Vec<Group>,
    pub outcome: EnrollOutcome,
    /// Whether `groups` differs from the input and must be persisted.
    pub changed: bool,
}

/// Compute where `student` goes and the resulting groups.
///
/// `groups` must be the product's complete group set ordered by number.
/// New groups get ids from `next_group_id` and the next free number. The
/// returned groups never exceed `capacity.max_students()`; the new state is
/// built on an owned copy so callers persist it (or drop it) as a whole.
pub fn plan_enrollment(
    product_id: ProductId,
    mut groups: Vec<Group>,
    capacity: Capacity,
    student: StudentId,
    mut next_group_id: impl FnMut() -> GroupId,
) -> DomainResult<EnrollmentPlan> {
    if let Some(foreign) = groups.iter().find(|g| g.product_id() != product_id) {
        return Err(DomainError::invariant(format!(
            "{} belongs to product {}, not {product_id}",
            foreign.name(),
            foreign.product_id()
        )));
    }

    let mut changed = false;
    if groups.is_empty() {
        groups.push(Group::new(next_group_id(), product_id, 1));
        changed = true;
    }

    let outcome = match decide(&groups, capacity, student) {
        Decision::AlreadyPlaced { index } => EnrollOutcome::AlreadyPlaced {
            group_id: groups[index].id_typed(),
        },
        Decision::ProductFull => EnrollOutcome::Rejected {
            reason: Rejection::ProductFull,
        },
        Decision::PlaceInEmpty { index } | Decision::PlaceInLeastPopulated { index } => {
            groups[index].add(student)?;
            changed = true;
            EnrollOutcome::Placed {
                group_id: groups[index].id_typed(),
            }
        }
        Decision::Rebalance { groups: k } => {
            rebalance(product_id, &mut groups, k, capacity, student, &mut next_group_id)?;
            changed = true;

            let assignments: BTreeMap<StudentId, GroupId> = groups
                .iter()
                .flat_map(|g| g.students().iter().map(move |s| (*s, g.id_typed())))
                .collect();
            let group_id = assignments.get(&student).copied().ok_or_else(|| {
                DomainError::invariant(format!("student {student} lost during rebalance"))
            })?;

            EnrollOutcome::Rebalanced {
                group_id,
                assignments,
            }
        }
    };

    ensure_within_capacity(&groups, capacity)?;

    Ok(EnrollmentPlan {
        groups,
        outcome,
        changed,
    })
}

fn rebalance(
    product_id: ProductId,
    groups: &mut Vec<Group>,
    k: usize,
    capacity: Capacity,
    student: StudentId,
    next_group_id: &mut impl FnMut() -> GroupId,
) -> DomainResult<()> {
    while groups.len() < k {
        let number = groups.iter().map(Group::number).max().unwrap_or(0) + 1;
        groups.push(Group::new(next_group_id(), product_id, number));
    }

    let mut pool: Vec<StudentId> = groups.iter_mut().flat_map(Group::take_students).collect();
    pool.push(student);

    for (group, slice) in groups.iter_mut().zip(distribute(pool, k, capacity)) {
        for member in slice {
            group.add(member)?;
        }
    }

    Ok(())
}

fn ensure_within_capacity(groups: &[Group], capacity: Capacity) -> DomainResult<()> {
    match groups.iter().find(|g| g.len() > capacity.max()) {
        Some(g) => Err(DomainError::invariant(format!(
            "{} holds {} students, above max_students {}",
            g.name(),
            g.len(),
            capacity.max_students()
        ))),
        None => Ok(()),
    }
}
