//! Command-line configuration surface, parsed with `clap`'s derive API and
//! mapped onto [`bitbucket::config::Config`], [`fuse::os::linux::MountOptions`],
//! and [`fuse::operations::fuse_init::FuseInitFlags`].

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use fuse::operations::fuse_init::{FuseInitFlag, FuseInitFlags};
use fuse::os::linux as fuse_os_linux;

/// Offered to the kernel as the negotiated `max_write`/`max_readahead`; large
/// enough to avoid fragmenting writes against the in-memory file buffers.
pub(crate) const MAX_WRITE: u32 = 128 * 1024;
pub(crate) const MAX_READAHEAD: u32 = 128 * 1024;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogLevel {
	Off,
	Error,
	Warn,
	Info,
	Debug,
	Trace,
}

impl LogLevel {
	pub fn to_level_filter(self) -> log::LevelFilter {
		match self {
			LogLevel::Off => log::LevelFilter::Off,
			LogLevel::Error => log::LevelFilter::Error,
			LogLevel::Warn => log::LevelFilter::Warn,
			LogLevel::Info => log::LevelFilter::Info,
			LogLevel::Debug => log::LevelFilter::Debug,
			LogLevel::Trace => log::LevelFilter::Trace,
		}
	}
}

/// An in-memory FUSE filesystem with an optional shared-memory fast path.
#[derive(Parser, Debug)]
#[command(name = "bitbucketd", version, about)]
pub struct Cli {
	/// Target directory to mount on.
	pub mount_point: PathBuf,

	/// Disable the writeback caching capability flag.
	#[arg(long)]
	pub disable_writeback: bool,

	/// Directory for temporary on-disk storage (accepted for compatibility;
	/// this server keeps all file data in memory).
	#[arg(long)]
	pub storagedir: Option<PathBuf>,

	/// File to append per-operation call statistics to on shutdown.
	#[arg(long)]
	pub callstat: Option<PathBuf>,

	/// Seconds of attribute/entry cache validity returned to the kernel.
	#[arg(long, default_value_t = 1.0)]
	pub attribute_timeout: f64,

	/// Disable the caching-related init flags.
	#[arg(long)]
	pub disable_cache: bool,

	/// Make `fsync`/`fsyncdir` perform a real (no-op, in-memory) flush
	/// instead of always succeeding immediately.
	#[arg(long)]
	pub enable_fsync: bool,

	/// Advertise extended-attribute support.
	#[arg(long)]
	pub enable_xattr: bool,

	/// Process kernel `forget` notifications on a background thread instead
	/// of inline with the calling dispatcher thread.
	#[arg(long)]
	pub bg_forget: bool,

	/// Honour `flush` calls instead of treating them as a no-op.
	#[arg(long)]
	pub enable_flush: bool,

	/// Enable the full-walk directory consistency check after mutations.
	#[arg(long)]
	pub verify_directories: bool,

	/// Append diagnostics to this file instead of stderr.
	#[arg(long)]
	pub logfile: Option<PathBuf>,

	/// Minimum log level to emit.
	#[arg(long, value_enum, default_value = "error")]
	pub loglevel: LogLevel,

	/// Fixed bucket count for the inode hash table.
	#[arg(long, default_value_t = 64)]
	pub inode_table_size: u64,

	/// Override the derived finesse socket path.
	#[arg(long)]
	pub finesse_socket: Option<PathBuf>,

	/// Run FUSE-only, skipping the shared-memory fast path entirely.
	#[arg(long)]
	pub disable_finesse: bool,
}

impl Cli {
	#[must_use]
	pub fn to_core_config(&self) -> bitbucket::config::Config {
		bitbucket::config::Config {
			disable_writeback: self.disable_writeback,
			disable_cache: self.disable_cache,
			attribute_timeout: Duration::from_secs_f64(self.attribute_timeout.max(0.0)),
			enable_fsync: self.enable_fsync,
			enable_xattr: self.enable_xattr,
			enable_flush: self.enable_flush,
			verify_directories: self.verify_directories,
			inode_table_size: self.inode_table_size.max(1),
		}
	}

	/// Builds the `FUSE_INIT` capability flags to offer the kernel.
	///
	/// Baseline flags match what a single-threaded in-memory filesystem can
	/// honor unconditionally (async reads, splice plumbing, parallel
	/// directory operations, `flock`-based locking per §4.C6);
	/// `--disable-writeback`/`--disable-cache` withhold the flags that would
	/// otherwise let the kernel cache data or attributes across round trips.
	#[must_use]
	pub fn init_flags(&self) -> FuseInitFlags {
		let mut flags = FuseInitFlags::new();
		flags.set(FuseInitFlag::ASYNC_READ);
		flags.set(FuseInitFlag::BIG_WRITES);
		flags.set(FuseInitFlag::FILE_OPS);
		flags.set(FuseInitFlag::ATOMIC_O_TRUNC);
		flags.set(FuseInitFlag::PARALLEL_DIROPS);
		flags.set(FuseInitFlag::FLOCK_LOCKS);
		if !self.disable_writeback {
			flags.set(FuseInitFlag::WRITEBACK_CACHE);
		}
		if !self.disable_cache {
			flags.set(FuseInitFlag::AUTO_INVAL_DATA);
			flags.set(FuseInitFlag::EXPORT_SUPPORT);
		}
		if self.enable_xattr {
			flags.set(FuseInitFlag::POSIX_ACL);
		}
		flags
	}

	/// Builds the Linux `mount(2)` option set for `fuse_linux::mount`.
	///
	/// `root_mode`/`user_id`/`group_id` are left unset: `fuse_linux::mount`
	/// fills them in from the target directory and the calling process.
	#[must_use]
	pub fn mount_options(&self) -> fuse_os_linux::MountOptions<'static> {
		let mut opts = fuse_os_linux::MountOptions::new();
		opts.set_max_read(Some(MAX_READAHEAD));
		opts
	}

	/// Derives the finesse socket path from the mount point unless
	/// `--finesse-socket` overrides it, mirroring §6's
	/// `<prefix>/<service-name>` convention.
	#[must_use]
	pub fn finesse_socket_path(&self) -> PathBuf {
		if let Some(path) = &self.finesse_socket {
			return path.clone();
		}
		let service_name = self
			.mount_point
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_else(|| "bitbucketd".to_string());
		std::env::temp_dir().join(format!("finesse-{service_name}.sock"))
	}
}
