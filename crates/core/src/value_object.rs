//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// - **Value Object**: no identity (a group capacity of `2..=4` equals any other `2..=4`)
/// - **Entity**: has identity (two groups with the same members are still different groups)
///
/// Value objects are immutable; to "modify" one, construct a new value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
