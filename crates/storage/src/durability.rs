//! Durability mode for write transactions.
//!
//! Defines when a committed write transaction reaches stable storage.

/// Durability mode for write transactions.
///
/// # Mode Comparison
///
/// | Mode | fsync | Data Loss Window |
/// |------|-------|------------------|
/// | None | Never on its own | Everything since the last durable commit |
/// | Buffered | Deferred to a later durable commit | Recent commits |
/// | Strict | Every commit | Zero |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// Commits become visible but are only persisted by a later durable commit.
    ///
    /// Use case: Tests, bulk loads that finish with a strict commit.
    None,

    /// Commits are persisted eventually.
    ///
    /// Good balance of speed and safety. A crash may lose the most recent
    /// commits but never tears a batch.
    Buffered,

    /// fsync on every commit (slowest, maximum durability).
    #[default]
    Strict,
}

impl DurabilityMode {
    /// Human-readable description of the mode.
    pub fn description(&self) -> &'static str {
        match self {
            DurabilityMode::None => "No durability (fastest, unsynced commits lost on crash)",
            DurabilityMode::Buffered => "Deferred fsync (balanced speed/safety)",
            DurabilityMode::Strict => "Sync fsync (safest, slowest)",
        }
    }
}

impl From<DurabilityMode> for redb::Durability {
    fn from(mode: DurabilityMode) -> Self {
        match mode {
            DurabilityMode::None => redb::Durability::None,
            DurabilityMode::Buffered => redb::Durability::Eventual,
            DurabilityMode::Strict => redb::Durability::Immediate,
        }
    }
}
