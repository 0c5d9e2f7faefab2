//! Versioned storage of each product's group set.
//!
//! A product's groups are always read and written as one unit: a rebalance
//! touches every group, so partial writes must never become visible.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryGroupStore;
pub use r#trait::{GroupSet, GroupStore, GroupStoreError};
