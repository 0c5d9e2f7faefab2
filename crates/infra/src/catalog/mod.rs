//! Catalog lookup boundary used by the allocation engine, the access gateway
//! and the product listing.

pub mod seed;

pub use seed::{CatalogSeed, SeedError};

use std::sync::Arc;

use classroom_catalog::{Author, Lesson, Product, Student};
use classroom_core::{AuthorId, DomainError, DomainResult, Entity, LessonId, ProductId, StudentId};

use crate::record_store::{InMemoryRecordStore, RecordStore};

/// Read access to catalog records.
pub trait Catalog: Send + Sync {
    fn product(&self, id: ProductId) -> Option<Product>;
    fn products(&self) -> Vec<Product>;
    fn author(&self, id: AuthorId) -> Option<Author>;
    fn student(&self, id: StudentId) -> Option<Student>;
    fn lessons_for(&self, product_id: ProductId) -> Vec<Lesson>;
}

impl<C> Catalog for Arc<C>
where
    C: Catalog + ?Sized,
{
    fn product(&self, id: ProductId) -> Option<Product> {
        (**self).product(id)
    }

    fn products(&self) -> Vec<Product> {
        (**self).products()
    }

    fn author(&self, id: AuthorId) -> Option<Author> {
        (**self).author(id)
    }

    fn student(&self, id: StudentId) -> Option<Student> {
        (**self).student(id)
    }

    fn lessons_for(&self, product_id: ProductId) -> Vec<Lesson> {
        (**self).lessons_for(product_id)
    }
}

/// In-memory catalog.
///
/// Inserts enforce references: a product needs a known author, a lesson a
/// known product.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    authors: InMemoryRecordStore<AuthorId, Author>,
    students: InMemoryRecordStore<StudentId, Student>,
    products: InMemoryRecordStore<ProductId, Product>,
    lessons: InMemoryRecordStore<LessonId, Lesson>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from seed records, inserting authors and students
    /// before the products and lessons referencing them.
    pub fn from_seed(seed: CatalogSeed) -> DomainResult<Self> {
        let catalog = Self::new();
        for author in seed.authors {
            catalog.insert_author(author);
        }
        for student in seed.students {
            catalog.insert_student(student);
        }
        for product in seed.products {
            catalog.insert_product(product)?;
        }
        for lesson in seed.lessons {
            catalog.insert_lesson(lesson)?;
        }
        Ok(catalog)
    }

    pub fn insert_author(&self, author: Author) {
        self.authors.upsert(author.id, author);
    }

    pub fn insert_student(&self, student: Student) {
        self.students.upsert(student.id, student);
    }

    pub fn insert_product(&self, product: Product) -> DomainResult<()> {
        if self.authors.get(&product.author()).is_none() {
            return Err(DomainError::unknown_reference("author", product.author()));
        }
        self.products.upsert(product.id_typed(), product);
        Ok(())
    }

    pub fn insert_lesson(&self, lesson: Lesson) -> DomainResult<()> {
        if self.products.get(&lesson.product_id()).is_none() {
            return Err(DomainError::unknown_reference("product", lesson.product_id()));
        }
        self.lessons.upsert(*lesson.id(), lesson);
        Ok(())
    }
}

impl Catalog for InMemoryCatalog {
    fn product(&self, id: ProductId) -> Option<Product> {
        self.products.get(&id)
    }

    fn products(&self) -> Vec<Product> {
        self.products.list()
    }

    fn author(&self, id: AuthorId) -> Option<Author> {
        self.authors.get(&id)
    }

    fn student(&self, id: StudentId) -> Option<Student> {
        self.students.get(&id)
    }

    fn lessons_for(&self, product_id: ProductId) -> Vec<Lesson> {
        self.lessons
            .list()
            .into_iter()
            .filter(|l| l.product_id() == product_id)
            .collect()
    }
}
