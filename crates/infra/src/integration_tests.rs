//! Integration tests for the enrollment pipeline.
//!
//! Tests: AccessGateway → AllocationEngine → GroupStore
//!
//! Verifies:
//! - Placement and rebalancing are persisted exactly as planned
//! - Rejections, no-ops and failed saves leave stored groups untouched
//! - Concurrent enrollments never overfill a group or lose a student

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::{Duration, Utc};

    use classroom_catalog::{Author, NewProduct, PersonName, Price, Product, Student};
    use classroom_core::{AuthorId, ExpectedVersion, ProductId, StudentId};
    use classroom_groups::{EnrollOutcome, Group, Rejection};

    use crate::access::{AccessDecision, AccessError, AccessGateway, AccessGrant, AccessStatus};
    use crate::allocation::{AllocationEngine, AllocationError};
    use crate::catalog::{Catalog, InMemoryCatalog};
    use crate::group_store::{GroupSet, GroupStore, GroupStoreError, InMemoryGroupStore};

    type Engine<S> = AllocationEngine<S, Arc<InMemoryCatalog>>;

    fn catalog_with_product(min: u32, max: u32) -> (Arc<InMemoryCatalog>, ProductId) {
        let catalog = InMemoryCatalog::new();
        let author = Author::new(AuthorId::new(), PersonName::new("Ivan", "Petrov", None).unwrap());
        catalog.insert_author(author.clone());

        let product_id = ProductId::new();
        catalog
            .insert_product(
                Product::create(NewProduct {
                    id: product_id,
                    name: "Rust".to_string(),
                    author: author.id,
                    start_date: Utc::now() + Duration::days(30),
                    price: Price::from_minor_units(10_000_00),
                    min_students: min,
                    max_students: max,
                })
                .unwrap(),
            )
            .unwrap();

        (Arc::new(catalog), product_id)
    }

    fn add_student(catalog: &InMemoryCatalog) -> StudentId {
        let id = StudentId::new();
        catalog.insert_student(Student::new(id, PersonName::new("Anna", "Ivanova", None).unwrap()));
        id
    }

    fn setup(min: u32, max: u32) -> (Engine<Arc<InMemoryGroupStore>>, ProductId) {
        let (catalog, product_id) = catalog_with_product(min, max);
        let store = Arc::new(InMemoryGroupStore::new());
        (AllocationEngine::new(store, catalog), product_id)
    }

    fn stored_members<S: GroupStore>(engine: &Engine<S>, product_id: ProductId) -> Vec<Vec<StudentId>> {
        engine
            .groups(product_id)
            .unwrap()
            .iter()
            .map(|g| g.students().to_vec())
            .collect()
    }

    /// Store wrapper whose saves can be switched to fail.
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: InMemoryGroupStore,
        fail_saves: AtomicBool,
    }

    impl GroupStore for FlakyStore {
        fn load_groups(&self, product_id: ProductId) -> Result<GroupSet, GroupStoreError> {
            self.inner.load_groups(product_id)
        }

        fn save_groups(
            &self,
            product_id: ProductId,
            groups: Vec<Group>,
            expected_version: ExpectedVersion,
        ) -> Result<u64, GroupStoreError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(GroupStoreError::Unavailable("disk full".to_string()));
            }
            self.inner.save_groups(product_id, groups, expected_version)
        }
    }

    /// Store wrapper where another writer commits between every load and save.
    #[derive(Debug, Default)]
    struct RacingStore {
        inner: InMemoryGroupStore,
    }

    impl GroupStore for RacingStore {
        fn load_groups(&self, product_id: ProductId) -> Result<GroupSet, GroupStoreError> {
            self.inner.load_groups(product_id)
        }

        fn save_groups(
            &self,
            product_id: ProductId,
            groups: Vec<Group>,
            expected_version: ExpectedVersion,
        ) -> Result<u64, GroupStoreError> {
            let current = self.inner.load_groups(product_id)?;
            self.inner
                .save_groups(product_id, current.groups, ExpectedVersion::Any)?;
            self.inner.save_groups(product_id, groups, expected_version)
        }
    }

    #[test]
    fn threshold_scenario_is_persisted() {
        let (engine, product_id) = setup(2, 4);
        let s: Vec<StudentId> = (0..5).map(|_| StudentId::new()).collect();

        engine.enroll(product_id, s[0]).unwrap();
        assert_eq!(stored_members(&engine, product_id), vec![vec![s[0]]]);

        engine.enroll(product_id, s[1]).unwrap();
        engine.enroll(product_id, s[2]).unwrap();
        assert_eq!(stored_members(&engine, product_id), vec![vec![s[0], s[1], s[2]]]);

        let outcome = engine.enroll(product_id, s[3]).unwrap();
        assert!(matches!(outcome, EnrollOutcome::Rebalanced { .. }));
        assert_eq!(
            stored_members(&engine, product_id),
            vec![vec![s[0], s[1]], vec![s[2], s[3]]]
        );

        engine.enroll(product_id, s[4]).unwrap();
        assert_eq!(
            stored_members(&engine, product_id),
            vec![vec![s[0], s[1], s[4]], vec![s[2], s[3]]]
        );
    }

    #[test]
    fn re_enrolling_writes_nothing() {
        let (engine, product_id) = setup(2, 4);
        let student = StudentId::new();

        let first = engine.enroll(product_id, student).unwrap();
        let version = engine.store().load_groups(product_id).unwrap().version;

        let second = engine.enroll(product_id, student).unwrap();
        assert_eq!(second, EnrollOutcome::AlreadyPlaced {
            group_id: first.group_id().unwrap()
        });
        assert_eq!(engine.store().load_groups(product_id).unwrap().version, version);
    }

    #[test]
    fn unknown_product_is_not_found() {
        let (engine, _) = setup(2, 4);
        let missing = ProductId::new();
        assert_eq!(
            engine.enroll(missing, StudentId::new()),
            Err(AllocationError::NotFound(missing))
        );
        assert_eq!(engine.store().load_groups(missing).unwrap().version, 0);
    }

    #[test]
    fn unknown_products_leave_no_lock_entries() {
        let (engine, product_id) = setup(2, 4);

        for _ in 0..1000 {
            let missing = ProductId::new();
            assert_eq!(
                engine.enroll(missing, StudentId::new()),
                Err(AllocationError::NotFound(missing))
            );
        }
        assert_eq!(engine.locked_products(), 0);

        engine.enroll(product_id, StudentId::new()).unwrap();
        assert_eq!(engine.locked_products(), 1);
    }

    #[test]
    fn full_product_rejects_without_writing() {
        // min == max == 1: the first student fills Group 1, and a full
        // product never opens another group.
        let (engine, product_id) = setup(1, 1);
        engine.enroll(product_id, StudentId::new()).unwrap();

        let before = engine.store().load_groups(product_id).unwrap();
        let outcome = engine.enroll(product_id, StudentId::new()).unwrap();

        assert_eq!(outcome, EnrollOutcome::Rejected {
            reason: Rejection::ProductFull
        });
        assert_eq!(engine.store().load_groups(product_id).unwrap(), before);
    }

    #[test]
    fn failed_save_keeps_previous_groups() {
        let (catalog, product_id) = catalog_with_product(2, 4);
        let engine = AllocationEngine::new(FlakyStore::default(), catalog);
        let s: Vec<StudentId> = (0..4).map(|_| StudentId::new()).collect();
        for student in &s[..3] {
            engine.enroll(product_id, *student).unwrap();
        }
        let before = engine.store().load_groups(product_id).unwrap();

        // The 4th student triggers a rebalance; its save fails.
        engine.store().fail_saves.store(true, Ordering::SeqCst);
        let err = engine.enroll(product_id, s[3]).unwrap_err();
        assert!(matches!(err, AllocationError::Storage(GroupStoreError::Unavailable(_))));
        assert!(err.is_transient());
        assert_eq!(engine.store().load_groups(product_id).unwrap(), before);

        // Retrying once storage recovers applies the rebalance.
        engine.store().fail_saves.store(false, Ordering::SeqCst);
        let outcome = engine.enroll(product_id, s[3]).unwrap();
        assert!(matches!(outcome, EnrollOutcome::Rebalanced { .. }));
        assert_eq!(engine.store().load_groups(product_id).unwrap().groups.len(), 2);
    }

    #[test]
    fn stale_write_is_a_conflict() {
        let (catalog, product_id) = catalog_with_product(2, 4);
        let engine = AllocationEngine::new(RacingStore::default(), catalog);

        let err = engine.enroll(product_id, StudentId::new()).unwrap_err();
        assert!(matches!(err, AllocationError::Conflict(_)));
        assert!(engine.store().load_groups(product_id).unwrap().groups.is_empty());
    }

    #[test]
    fn concurrent_enrollments_never_overfill() {
        let (engine, product_id) = setup(3, 6);
        let engine = Arc::new(engine);
        let students: Vec<StudentId> = (0..64).map(|_| StudentId::new()).collect();

        std::thread::scope(|scope| {
            for chunk in students.chunks(8) {
                let engine = engine.clone();
                scope.spawn(move || {
                    for s in chunk {
                        let outcome = engine.enroll(product_id, *s).unwrap();
                        assert!(!outcome.is_rejected());
                    }
                });
            }
        });

        let groups = engine.groups(product_id).unwrap();
        assert!(groups.iter().all(|g| g.len() <= 6));

        let placed: Vec<StudentId> = groups.iter().flat_map(|g| g.students().to_vec()).collect();
        let unique: HashSet<StudentId> = placed.iter().copied().collect();
        assert_eq!(placed.len(), students.len());
        assert_eq!(unique, students.iter().copied().collect());
    }

    #[test]
    fn products_are_allocated_independently() {
        let (catalog, first) = catalog_with_product(2, 4);
        let author = catalog.products()[0].author();
        let second = ProductId::new();
        catalog
            .insert_product(
                Product::create(NewProduct {
                    id: second,
                    name: "Go".to_string(),
                    author,
                    start_date: Utc::now(),
                    price: Price::from_minor_units(1),
                    min_students: 1,
                    max_students: 3,
                })
                .unwrap(),
            )
            .unwrap();
        let engine = Arc::new(AllocationEngine::new(Arc::new(InMemoryGroupStore::new()), catalog));

        std::thread::scope(|scope| {
            for product_id in [first, second] {
                let engine = engine.clone();
                scope.spawn(move || {
                    for _ in 0..10 {
                        engine.enroll(product_id, StudentId::new()).unwrap();
                    }
                });
            }
        });

        let first_total: usize = engine.groups(first).unwrap().iter().map(Group::len).sum();
        let second_total: usize = engine.groups(second).unwrap().iter().map(Group::len).sum();
        assert_eq!(first_total, 10);
        // min 1: each student ends up alone in a group
        assert_eq!(second_total, 10);
        assert_eq!(engine.groups(second).unwrap().len(), 10);
    }

    #[test]
    fn gateway_grants_and_records_access() {
        let (catalog, product_id) = catalog_with_product(2, 4);
        let student = add_student(&catalog);
        let gateway = AccessGateway::new(Arc::new(AllocationEngine::new(
            Arc::new(InMemoryGroupStore::new()),
            catalog,
        )));

        let decision = gateway.grant(AccessGrant::granted(product_id, student)).unwrap();
        assert!(matches!(decision, AccessDecision::Granted(EnrollOutcome::Placed { .. })));
        assert!(gateway.has_access(product_id, student));
    }

    #[test]
    fn gateway_ignores_withheld_access() {
        let (catalog, product_id) = catalog_with_product(2, 4);
        let student = add_student(&catalog);
        let gateway = AccessGateway::new(Arc::new(AllocationEngine::new(
            Arc::new(InMemoryGroupStore::new()),
            catalog,
        )));

        let decision = gateway
            .grant(AccessGrant {
                product_id,
                student_id: student,
                granted: false,
            })
            .unwrap();
        assert_eq!(decision, AccessDecision::Ignored);
        assert!(gateway.engine().groups(product_id).unwrap().is_empty());
        assert_eq!(
            gateway.record_for(product_id, student).map(|r| r.status),
            Some(AccessStatus::Withheld)
        );
    }

    #[test]
    fn gateway_rejects_unknown_student_and_product() {
        let (catalog, product_id) = catalog_with_product(2, 4);
        let student = add_student(&catalog);
        let gateway = AccessGateway::new(Arc::new(AllocationEngine::new(
            Arc::new(InMemoryGroupStore::new()),
            catalog,
        )));

        let stranger = StudentId::new();
        assert_eq!(
            gateway.grant(AccessGrant::granted(product_id, stranger)),
            Err(AccessError::StudentNotFound(stranger))
        );

        let missing = ProductId::new();
        assert_eq!(
            gateway.grant(AccessGrant::granted(missing, student)),
            Err(AccessError::ProductNotFound(missing))
        );
        assert!(!gateway.has_access(missing, student));
    }

    #[test]
    fn gateway_denies_when_product_is_full() {
        // min 2, max 3: Group 1 fills up before a second group can open.
        let (catalog, product_id) = catalog_with_product(2, 3);
        let students: Vec<StudentId> = (0..4).map(|_| add_student(&catalog)).collect();
        let gateway = AccessGateway::new(Arc::new(AllocationEngine::new(
            Arc::new(InMemoryGroupStore::new()),
            catalog,
        )));

        for s in &students[..3] {
            assert!(matches!(
                gateway.grant(AccessGrant::granted(product_id, *s)).unwrap(),
                AccessDecision::Granted(_)
            ));
        }

        let decision = gateway.grant(AccessGrant::granted(product_id, students[3])).unwrap();
        assert_eq!(decision, AccessDecision::Denied(Rejection::ProductFull));
        assert_eq!(
            gateway.record_for(product_id, students[3]).map(|r| r.status),
            Some(AccessStatus::Denied)
        );
        assert!(!gateway.has_access(product_id, students[3]));
    }

    #[test]
    fn gateway_reports_rebalance_with_every_assignment() {
        let (catalog, product_id) = catalog_with_product(2, 4);
        let s: Vec<StudentId> = (0..4).map(|_| add_student(&catalog)).collect();
        let gateway = AccessGateway::new(Arc::new(AllocationEngine::new(
            Arc::new(InMemoryGroupStore::new()),
            catalog,
        )));

        for student in &s[..3] {
            gateway.grant(AccessGrant::granted(product_id, *student)).unwrap();
        }

        let decision = gateway.grant(AccessGrant::granted(product_id, s[3])).unwrap();
        let AccessDecision::Granted(EnrollOutcome::Rebalanced {
            group_id,
            assignments,
        }) = decision
        else {
            panic!("expected a rebalance, got {decision:?}");
        };

        let groups = gateway.engine().groups(product_id).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(group_id, groups[1].id_typed());
        assert_eq!(assignments.len(), 4);
        assert_eq!(assignments[&s[0]], groups[0].id_typed());
        assert_eq!(assignments[&s[1]], groups[0].id_typed());
        assert_eq!(assignments[&s[2]], groups[1].id_typed());
        assert_eq!(assignments[&s[3]], groups[1].id_typed());
        assert!(s.iter().all(|student| gateway.has_access(product_id, *student)));
    }

    #[test]
    fn withholding_access_keeps_existing_placement() {
        let (catalog, product_id) = catalog_with_product(2, 4);
        let student = add_student(&catalog);
        let gateway = AccessGateway::new(Arc::new(AllocationEngine::new(
            Arc::new(InMemoryGroupStore::new()),
            catalog,
        )));

        gateway.grant(AccessGrant::granted(product_id, student)).unwrap();
        let decision = gateway
            .grant(AccessGrant {
                product_id,
                student_id: student,
                granted: false,
            })
            .unwrap();

        assert_eq!(decision, AccessDecision::Ignored);
        assert!(!gateway.has_access(product_id, student));
        assert_eq!(stored_members(gateway.engine(), product_id), vec![vec![student]]);
    }
}
