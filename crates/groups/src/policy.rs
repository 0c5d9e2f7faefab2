//! Capacity policy: where does the next student go?
//!
//! The decision is a pure function of the current groups (in group-number
//! order), the product's [`Capacity`] and the student being enrolled:
//!
//! ```text
//! already a member?                     -> AlreadyPlaced
//! every group at max_students?          -> ProductFull
//! no group has members yet?             -> PlaceInEmpty (first empty group)
//! (total + 1) / min > open groups?      -> Rebalance { groups: open + 1 }
//! least populated open group is full?   -> Rebalance { groups: open + 1 }
//! otherwise                             -> PlaceInLeastPopulated
//! ```

use classroom_core::StudentId;

use crate::capacity::Capacity;
use crate::group::Group;

/// Whether a product with `population` students (the new one included) needs
/// more than `open_groups` groups.
///
/// Integer floor division: `population / min_students > open_groups`.
/// A zero minimum never opens a group.
pub fn should_open_group(population: usize, min_students: u32, open_groups: usize) -> bool {
    population
        .checked_div(min_students as usize)
        .is_some_and(|needed| needed > open_groups)
}

/// Outcome of the capacity policy for one enrollment.
///
/// Indices refer to the group slice passed to [`decide`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The student is already a member of the group at `index`.
    AlreadyPlaced { index: usize },
    /// Every group is at `max_students`.
    ProductFull,
    /// Nobody is enrolled yet; join the first empty group.
    PlaceInEmpty { index: usize },
    /// Join the least populated open group (lowest number on ties).
    PlaceInLeastPopulated { index: usize },
    /// Open a new group: redistribute all students over the first `groups` groups.
    Rebalance { groups: usize },
}

/// Decide where `student` goes.
///
/// `groups` must be ordered by group number. An empty slice yields
/// `PlaceInEmpty { index: 0 }`; the caller is expected to create the first
/// group before applying it.
pub fn decide(groups: &[Group], capacity: Capacity, student: StudentId) -> Decision {
    if let Some(index) = groups.iter().position(|g| g.contains(student)) {
        return Decision::AlreadyPlaced { index };
    }

    if !groups.is_empty() && groups.iter().all(|g| g.is_full(capacity)) {
        return Decision::ProductFull;
    }

    let open_groups = groups.iter().filter(|g| !g.is_empty()).count();
    if open_groups == 0 {
        let index = groups.iter().position(Group::is_empty).unwrap_or(0);
        return Decision::PlaceInEmpty { index };
    }

    let total: usize = groups.iter().map(Group::len).sum();
    if should_open_group(total + 1, capacity.min_students(), open_groups) {
        return Decision::Rebalance {
            groups: open_groups + 1,
        };
    }

    match least_populated_open(groups) {
        Some(index) if !groups[index].is_full(capacity) => {
            Decision::PlaceInLeastPopulated { index }
        }
        // Every open group is full but the threshold was not crossed
        // (max_students < 2 * min_students - 1): open a group anyway.
        _ => Decision::Rebalance {
            groups: open_groups + 1,
        },
    }
}

fn least_populated_open(groups: &[Group]) -> Option<usize> {
    groups
        .iter()
        .enumerate()
        .filter(|(_, g)| !g.is_empty())
        .min_by_key(|(_, g)| (g.len(), g.number()))
        .map(|(index, _)| index)
}
