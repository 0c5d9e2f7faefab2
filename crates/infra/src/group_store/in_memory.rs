use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use classroom_core::{ExpectedVersion, ProductId};
use classroom_groups::Group;

use super::r#trait::{GroupSet, GroupStore, GroupStoreError};

/// In-memory group store.
///
/// Intended for tests/dev. A save validates the new set completely before
/// swapping it in, so readers see either the old or the new set.
#[derive(Debug, Default)]
pub struct InMemoryGroupStore {
    sets: RwLock<HashMap<ProductId, GroupSet>>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(product_id: ProductId, groups: &[Group]) -> Result<(), GroupStoreError> {
        let mut seen_numbers = HashSet::new();
        let mut seen_students = HashSet::new();

        for (idx, group) in groups.iter().enumerate() {
            if group.product_id() != product_id {
                return Err(GroupStoreError::InvalidWrite(format!(
                    "group at index {idx} belongs to product {}",
                    group.product_id()
                )));
            }
            if !seen_numbers.insert(group.number()) {
                return Err(GroupStoreError::InvalidWrite(format!(
                    "duplicate group number {}",
                    group.number()
                )));
            }
            for student in group.students() {
                if !seen_students.insert(*student) {
                    return Err(GroupStoreError::InvalidWrite(format!(
                        "student {student} appears in more than one group"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl GroupStore for InMemoryGroupStore {
    fn load_groups(&self, product_id: ProductId) -> Result<GroupSet, GroupStoreError> {
        let sets = self
            .sets
            .read()
            .map_err(|_| GroupStoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(sets.get(&product_id).cloned().unwrap_or_default())
    }

    fn save_groups(
        &self,
        product_id: ProductId,
        mut groups: Vec<Group>,
        expected_version: ExpectedVersion,
    ) -> Result<u64, GroupStoreError> {
        Self::validate(product_id, &groups)?;
        groups.sort_by_key(Group::number);

        let mut sets = self
            .sets
            .write()
            .map_err(|_| GroupStoreError::Unavailable("lock poisoned".to_string()))?;

        let set = sets.entry(product_id).or_default();
        if !expected_version.matches(set.version) {
            return Err(GroupStoreError::Conflict(format!(
                "expected {expected_version:?}, found {}",
                set.version
            )));
        }

        set.version += 1;
        set.groups = groups;
        Ok(set.version)
    }
}
