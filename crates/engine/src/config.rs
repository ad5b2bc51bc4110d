//! Shard configuration.
//!
//! ```ignore
//! use chronoshard_engine::Shard;
//!
//! // Production: one redb file per database, fsync on every commit
//! let shard = Shard::builder()
//!     .path("/data/shards/0001")
//!     .strict()
//!     .open()?;
//!
//! // Integration testing: files on disk, deferred fsync
//! let shard = Shard::builder()
//!     .path(temp_dir.path())
//!     .buffered()
//!     .open()?;
//!
//! // Unit testing: no disk at all
//! let shard = Shard::ephemeral();
//! ```

use crate::shard::Shard;
use chronoshard_core::{Error, Result};
use chronoshard_storage::{DurabilityMode, MemoryEngine, RedbEngine, StorageEngine};
use std::path::{Path, PathBuf};
use tracing::info;

/// Plain configuration a [`ShardBuilder`] produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardConfig {
    /// Base directory holding one store file per database
    pub path: Option<PathBuf>,
    /// Durability of write transactions (redb engine only)
    pub durability: DurabilityMode,
    /// Create the base directory if it does not exist
    pub create_dir: bool,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            path: None,
            durability: DurabilityMode::default(),
            create_dir: true,
        }
    }
}

/// Builder for shard configuration.
#[derive(Debug, Clone, Default)]
pub struct ShardBuilder {
    config: ShardConfig,
}

impl ShardBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shard's base directory.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the durability mode explicitly.
    pub fn durability(mut self, durability: DurabilityMode) -> Self {
        self.config.durability = durability;
        self
    }

    /// Use strict mode (default, safest, slowest).
    ///
    /// Syncs to disk on every commit. Zero data loss on crash.
    pub fn strict(self) -> Self {
        self.durability(DurabilityMode::Strict)
    }

    /// Use buffered mode.
    ///
    /// Commits are persisted eventually. A crash may lose recent batches but
    /// never part of one.
    pub fn buffered(self) -> Self {
        self.durability(DurabilityMode::Buffered)
    }

    /// Skip fsync entirely. Files are still created.
    pub fn no_durability(self) -> Self {
        self.durability(DurabilityMode::None)
    }

    /// Whether to create the base directory when it is missing (default `true`).
    pub fn create_dir(mut self, create: bool) -> Self {
        self.config.create_dir = create;
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &ShardConfig {
        &self.config
    }

    /// Open a redb-backed shard.
    pub fn open(self) -> Result<Shard<RedbEngine>> {
        let engine = RedbEngine::new(self.config.durability);
        self.open_with(engine)
    }

    /// Open a shard over any storage engine.
    pub fn open_with<E: StorageEngine>(self, engine: E) -> Result<Shard<E>> {
        let path = self
            .config
            .path
            .ok_or_else(|| Error::InvalidInput("shard path not set".into()))?;

        if !path.exists() {
            if !self.config.create_dir {
                return Err(Error::Open {
                    reason: "base directory does not exist".into(),
                    path,
                });
            }
            std::fs::create_dir_all(&path)?;
        }

        info!(
            path = %path.display(),
            engine = engine.name(),
            durability = self.config.durability.description(),
            "opening shard"
        );
        Ok(Shard::new(path, engine))
    }

    /// Open a shard backed by [`MemoryEngine`].
    ///
    /// The configured path only namespaces the in-memory stores; nothing is
    /// created on disk.
    pub fn open_ephemeral(self) -> Shard<MemoryEngine> {
        let path = self.config.path.unwrap_or_else(|| PathBuf::from("memory"));
        Shard::new(path, MemoryEngine::new())
    }
}
