//! Upcoming product listing (read-only projection over the catalog).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classroom_catalog::Product;

use crate::catalog::Catalog;

/// One row of the public product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListing {
    pub name: String,
    pub author: String,
    pub start_date: DateTime<Utc>,
    pub lessons_count: usize,
    pub price: String,
}

/// Products starting strictly after `now`, earliest first (ties by name).
pub fn upcoming_products<C>(catalog: &C, now: DateTime<Utc>) -> Vec<ProductListing>
where
    C: Catalog + ?Sized,
{
    let mut upcoming: Vec<Product> = catalog
        .products()
        .into_iter()
        .filter(|p| p.is_upcoming(now))
        .collect();
    upcoming.sort_by(|a, b| {
        a.start_date()
            .cmp(&b.start_date())
            .then_with(|| a.name().cmp(b.name()))
    });

    upcoming
        .into_iter()
        .map(|product| ProductListing {
            author: catalog
                .author(product.author())
                .map(|a| a.to_string())
                .unwrap_or_else(|| product.author().to_string()),
            lessons_count: catalog.lessons_for(product.id_typed()).len(),
            name: product.name().to_string(),
            start_date: product.start_date(),
            price: product.price().to_string(),
        })
        .collect()
}
