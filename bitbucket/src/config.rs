//! Runtime-tunable behavior shared by the FUSE dispatcher and the finesse
//! server, factored out of `bitbucketd`'s `clap` argument struct so both
//! dispatch seams can read it from one place without depending on the CLI
//! crate.

use std::time::Duration;

/// Behavior flags and tunables accepted at launch (`bitbucketd`'s CLI parses
/// these; tests construct this directly with [`Config::default`]).
#[derive(Clone, Debug)]
pub struct Config {
	/// Clears `FUSE_WRITEBACK_CACHE` from the negotiated init flags.
	pub disable_writeback: bool,
	/// Clears the caching-related init flags (`FUSE_AUTO_INVAL_DATA`,
	/// `FUSE_EXPORT_SUPPORT`).
	pub disable_cache: bool,
	/// Seconds of validity returned to the kernel on entry/attr replies.
	pub attribute_timeout: Duration,
	/// When false, `fsync`/`fsyncdir` are a no-op that always succeeds.
	pub enable_fsync: bool,
	/// Advertises xattr support in the init reply; `listxattr` stays
	/// not-supported regardless.
	pub enable_xattr: bool,
	/// When false, `flush` always succeeds without doing anything.
	pub enable_flush: bool,
	/// Enables a full read-locked walk of a directory's entries after every
	/// mutation, asserting no duplicate names and that every child still
	/// carries a lookup reference for the entry naming it.
	pub verify_directories: bool,
	/// Fixed bucket count for the inode hash table.
	pub inode_table_size: u64,
}

impl Default for Config {
	fn default() -> Config {
		Config {
			disable_writeback: false,
			disable_cache: false,
			attribute_timeout: Duration::from_secs(1),
			enable_fsync: false,
			enable_xattr: false,
			enable_flush: false,
			verify_directories: false,
			inode_table_size: 64,
		}
	}
}
