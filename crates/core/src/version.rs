//! Optimistic concurrency expectations for versioned state.

/// Optimistic concurrency expectation for a versioned record set
/// (e.g. the groups of one product).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (seeding, migrations).
    Any,
    /// Require the stored state to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }
}
