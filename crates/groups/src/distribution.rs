//! Even redistribution of a product's students over `k` groups.

use classroom_core::StudentId;

use crate::capacity::Capacity;

/// Split `pool` into `groups` contiguous slices.
///
/// Slice `i` gets `pool[per * i .. per * (i + 1)]` with `per = pool.len() / groups`.
/// The remainder (`pool.len() % groups` trailing students) is appended to the
/// last slice. When that would push the last slice over `max_students`, the
/// remainder is dealt one student per slice instead, starting from the last
/// slice and walking backwards.
///
/// Callers guarantee `groups >= 1` and `pool.len() <= groups * max_students`.
pub fn distribute(pool: Vec<StudentId>, groups: usize, capacity: Capacity) -> Vec<Vec<StudentId>> {
    debug_assert!(groups > 0, "cannot distribute over zero groups");
    debug_assert!(pool.len() <= groups * capacity.max(), "pool exceeds total capacity");

    let per = pool.len() / groups;
    let mut students = pool.into_iter();

    let mut slices: Vec<Vec<StudentId>> = (0..groups)
        .map(|_| students.by_ref().take(per).collect())
        .collect();

    let remainder: Vec<StudentId> = students.collect();
    if remainder.is_empty() {
        return slices;
    }

    if per + remainder.len() <= capacity.max() {
        if let Some(last) = slices.last_mut() {
            last.extend(remainder);
        }
    } else {
        for (slice, student) in slices.iter_mut().rev().zip(remainder) {
            slice.push(student);
        }
    }

    slices
}
