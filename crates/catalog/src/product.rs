use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classroom_core::{AuthorId, DomainError, DomainResult, Entity, ProductId};

/// Default lower bound of students per group.
pub const DEFAULT_MIN_STUDENTS: u32 = 10;

/// Default upper bound of students per group.
pub const DEFAULT_MAX_STUDENTS: u32 = 30;

/// Product price in minor currency units (kopecks).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    pub fn from_minor_units(minor: u64) -> Self {
        Self(minor)
    }

    pub fn minor_units(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02} rub", self.0 / 100, self.0 % 100)
    }
}

/// Input for creating a product.
///
/// This is also the on-disk shape used by catalog seed files; bounds default
/// to [`DEFAULT_MIN_STUDENTS`] / [`DEFAULT_MAX_STUDENTS`] when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub id: ProductId,
    pub name: String,
    pub author: AuthorId,
    pub start_date: DateTime<Utc>,
    pub price: Price,
    #[serde(default = "default_min_students")]
    pub min_students: u32,
    #[serde(default = "default_max_students")]
    pub max_students: u32,
}

fn default_min_students() -> u32 {
    DEFAULT_MIN_STUDENTS
}

fn default_max_students() -> u32 {
    DEFAULT_MAX_STUDENTS
}

/// A course students can be granted access to.
///
/// Every product carries the bounds used when its students are split into
/// groups: `1 <= min_students <= max_students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NewProduct", into = "NewProduct")]
pub struct Product {
    id: ProductId,
    name: String,
    author: AuthorId,
    start_date: DateTime<Utc>,
    price: Price,
    min_students: u32,
    max_students: u32,
}

impl Product {
    pub fn create(new: NewProduct) -> DomainResult<Self> {
        if new.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }

        if new.min_students == 0 {
            return Err(DomainError::validation("min_students must be at least 1"));
        }

        if new.min_students > new.max_students {
            return Err(DomainError::validation(format!(
                "min_students ({}) cannot exceed max_students ({})",
                new.min_students, new.max_students
            )));
        }

        Ok(Self {
            id: new.id,
            name: new.name,
            author: new.author,
            start_date: new.start_date,
            price: new.price,
            min_students: new.min_students,
            max_students: new.max_students,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn author(&self) -> AuthorId {
        self.author
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn min_students(&self) -> u32 {
        self.min_students
    }

    pub fn max_students(&self) -> u32 {
        self.max_students
    }

    /// Whether the product starts strictly after `now`.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_date > now
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TryFrom<NewProduct> for Product {
    type Error = DomainError;

    fn try_from(value: NewProduct) -> Result<Self, Self::Error> {
        Product::create(value)
    }
}

impl From<Product> for NewProduct {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            author: p.author,
            start_date: p.start_date,
            price: p.price,
            min_students: p.min_students,
            max_students: p.max_students,
        }
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_product(min: u32, max: u32) -> NewProduct {
        NewProduct {
            id: ProductId::new(),
            name: "Rust for backend developers".to_string(),
            author: AuthorId::new(),
            start_date: Utc::now() + Duration::days(7),
            price: Price::from_minor_units(1_500_00),
            min_students: min,
            max_students: max,
        }
    }

    #[test]
    fn create_accepts_valid_bounds() {
        let product = Product::create(new_product(2, 4)).unwrap();
        assert_eq!(product.min_students(), 2);
        assert_eq!(product.max_students(), 4);
    }

    #[test]
    fn create_accepts_equal_bounds() {
        assert!(Product::create(new_product(5, 5)).is_ok());
    }

    #[test]
    fn create_rejects_min_above_max() {
        let err = Product::create(new_product(5, 4)).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("min_students")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn create_rejects_zero_min() {
        assert!(matches!(
            Product::create(new_product(0, 4)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn create_rejects_blank_name() {
        let mut new = new_product(1, 2);
        new.name = "   ".to_string();
        assert!(matches!(Product::create(new), Err(DomainError::Validation(_))));
    }

    #[test]
    fn price_displays_in_rubles() {
        assert_eq!(Price::from_minor_units(1_500_00).to_string(), "1500.00 rub");
        assert_eq!(Price::from_minor_units(1_05).to_string(), "1.05 rub");
    }

    #[test]
    fn upcoming_is_strictly_after_now() {
        let product = Product::create(new_product(1, 2)).unwrap();
        assert!(product.is_upcoming(Utc::now()));
        assert!(!product.is_upcoming(product.start_date()));
    }

    #[test]
    fn deserialize_applies_default_bounds() {
        let json = serde_json::json!({
            "id": ProductId::new(),
            "name": "Python",
            "author": AuthorId::new(),
            "start_date": "2030-01-01T10:00:00Z",
            "price": 99900,
        });
        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.min_students(), DEFAULT_MIN_STUDENTS);
        assert_eq!(product.max_students(), DEFAULT_MAX_STUDENTS);
    }

    #[test]
    fn deserialize_rejects_inverted_bounds() {
        let json = serde_json::json!({
            "id": ProductId::new(),
            "name": "Python",
            "author": AuthorId::new(),
            "start_date": "2030-01-01T10:00:00Z",
            "price": 99900,
            "min_students": 8,
            "max_students": 3,
        });
        assert!(serde_json::from_value::<Product>(json).is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: bounds are accepted exactly when 1 <= min <= max.
            #[test]
            fn bounds_validation_matches_ordering(min in 0u32..50, max in 0u32..50) {
                let result = Product::create(new_product(min, max));
                prop_assert_eq!(result.is_ok(), min >= 1 && min <= max);
            }
        }
    }
}
