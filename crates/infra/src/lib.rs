//! Infrastructure layer: group storage, catalog storage, allocation engine,
//! access gateway and the product listing.

pub mod access;
pub mod allocation;
pub mod catalog;
pub mod group_store;
pub mod listing;
pub mod record_store;

#[cfg(test)]
mod integration_tests;

pub use access::{AccessDecision, AccessError, AccessGateway, AccessGrant, AccessRecord, AccessStatus};
pub use allocation::{AllocationEngine, AllocationError};
pub use catalog::{Catalog, CatalogSeed, InMemoryCatalog, SeedError};
pub use group_store::{GroupSet, GroupStore, GroupStoreError, InMemoryGroupStore};
pub use listing::{ProductListing, upcoming_products};
pub use record_store::{InMemoryRecordStore, RecordStore};
