//! Port supplying randomness for simulated outcomes and references.

/// Source of random decisions.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Return `true` with probability `percent / 100`.
    ///
    /// Values above 100 behave like 100.
    fn chance(&self, percent: u8) -> bool;

    /// Return `len` characters drawn from `A-Z0-9`.
    fn alphanumeric(&self, len: usize) -> String;
}
