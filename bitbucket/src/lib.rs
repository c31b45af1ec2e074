//! An in-memory filesystem exposed over FUSE, paired with a shared-memory
//! fast path (`finesse`) for clients that want to bypass the kernel for
//! reads, writes, and metadata lookups on files they already hold open.
//!
//! This crate implements the filesystem core: the inode store, the
//! whole-file lock manager, rename, and per-operation call statistics. The
//! FUSE dispatch surface lives in [`fuse_handlers`]; the wire encoding it
//! shares with `finesse` lives in [`wire`].

pub mod config;
pub mod error;
pub mod fuse_handlers;
pub mod inode;
pub mod lock;
pub mod rename;
pub mod stats;
pub mod wire;

use std::sync::Arc;

use config::Config;
use inode::Store;
use stats::CallStats;

/// The filesystem state shared by every FUSE request handler and every
/// finesse connection.
///
/// A single `Core` is constructed at startup and handed to both the FUSE
/// dispatcher and the finesse server, so a file created through one
/// interface is immediately visible through the other.
pub struct Core {
	pub inodes: Store,
	pub stats: CallStats,
	pub config: Config,
}

impl Core {
	#[must_use]
	pub fn new(config: Config) -> Arc<Core> {
		Arc::new(Core {
			inodes: Store::new(config.inode_table_size),
			stats: CallStats::new(),
			config,
		})
	}
}
