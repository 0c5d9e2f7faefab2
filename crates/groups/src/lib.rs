//! Group allocation domain (pure).
//!
//! Decides which group of a product a newly granted student joins, and when
//! the product's population justifies opening another group and
//! redistributing everybody across the larger group count.
//!
//! Nothing here performs IO or locking: [`plan_enrollment`] takes the current
//! groups by value and returns the complete next state, which the
//! infrastructure layer persists in one write.

pub mod capacity;
pub mod distribution;
pub mod group;
pub mod outcome;
pub mod plan;
pub mod policy;

pub use capacity::Capacity;
pub use distribution::distribute;
pub use group::Group;
pub use outcome::{EnrollOutcome, Rejection};
pub use plan::{EnrollmentPlan, plan_enrollment};
pub use policy::{Decision, decide, should_open_group};
