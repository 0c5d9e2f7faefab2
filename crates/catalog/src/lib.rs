//! Catalog records: authors, students, products and lessons.
//!
//! These are flat records with validating constructors. They carry no
//! allocation logic; the group allocation domain only reads a product's
//! student bounds.

pub mod lesson;
pub mod person;
pub mod product;

pub use lesson::Lesson;
pub use person::{Author, PersonName, Student};
pub use product::{DEFAULT_MAX_STUDENTS, DEFAULT_MIN_STUDENTS, NewProduct, Price, Product};
