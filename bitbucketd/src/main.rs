//! The `bitbucketd` launcher: parses configuration, mounts the FUSE
//! filesystem, spawns the finesse listener, and runs both to completion.
//!
//! Grounded on the teacher's `examples/helloworld.rs` mount sequence
//! (read-only reference, not copied), generalized with `clap` for the much
//! larger configuration surface this server accepts, and `fuse_std::serve_fuse`
//! for the worker pool instead of a hand-rolled loop.

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use fuse::server::{FuseConnection, FuseInitRequest, FuseInitResponse};

use bitbucketd::cli;
use bitbucketd::error::Error;

static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn request_shutdown(_signum: libc::c_int) {
	SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

fn main() -> ExitCode {
	let cli = cli::Cli::parse();
	init_logging(&cli);

	match run(cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			log::error!("{err}");
			ExitCode::FAILURE
		},
	}
}

fn init_logging(cli: &cli::Cli) {
	let mut builder = env_logger::Builder::new();
	builder.filter_level(cli.loglevel.to_level_filter());
	if let Some(logfile) = &cli.logfile {
		match std::fs::OpenOptions::new().create(true).append(true).open(logfile) {
			Ok(file) => {
				builder.target(env_logger::Target::Pipe(Box::new(file)));
			},
			Err(err) => {
				eprintln!("warning: could not open --logfile {}: {err}", logfile.display());
			},
		}
	}
	builder.init();
}

fn run(cli: cli::Cli) -> Result<(), Error> {
	if let Some(storagedir) = &cli.storagedir {
		if !storagedir.is_dir() {
			return Err(Error::Config(format!(
				"--storagedir {} is not a directory",
				storagedir.display(),
			)));
		}
		log::debug!(
			"--storagedir {} accepted for CLI compatibility; this server keeps all file \
			 data in memory and never spills to disk",
			storagedir.display(),
		);
	}

	if cli.bg_forget {
		log::debug!(
			"--bg-forget accepted for CLI compatibility; releasing a kernel reference is an \
			 O(1) refcount decrement here, so there is no round trip worth moving off the \
			 dispatcher thread",
		);
	}

	let config = cli.to_core_config();
	let core = bitbucket::Core::new(config);

	let target = path_to_cstring(&cli.mount_point)?;
	let mount_options = cli.mount_options();
	let socket = fuse_linux::mount(&target, mount_options).map_err(|source| Error::Mount {
		path: cli.mount_point.display().to_string(),
		source,
	})?;
	log::info!("mounted {} via /dev/fuse", cli.mount_point.display());

	let init_flags = cli.init_flags();
	let conn = FuseConnection::connect(socket, |_request: &FuseInitRequest, reply: &mut FuseInitResponse| {
		reply.set_flags(init_flags);
		reply.set_max_write(cli::MAX_WRITE);
		reply.set_max_readahead(cli::MAX_READAHEAD);
		reply.set_time_granularity(1);
	})
	.map_err(|err| Error::Config(format!("FUSE handshake failed: {err:?}")))?;

	let finesse_listener = if cli.disable_finesse {
		None
	} else {
		let socket_path = cli.finesse_socket_path();
		log::info!("finesse socket at {}", socket_path.display());
		let listener = Arc::new(finesse::Listener::new(core.clone(), socket_path));
		let handle = listener.clone().serve()?;
		Some((listener, handle))
	};

	let _unmount_thread = install_signal_handler(cli.mount_point.clone());

	let handlers = bitbucket::fuse_handlers::Handlers::new(core.clone(), &conn);
	let errors = fuse_std::serve_fuse(&conn, &handlers);
	for err in errors {
		log::warn!("fuse worker error: {err:?}");
	}

	if let Some((listener, handle)) = finesse_listener {
		listener.shutdown();
		let _ = handle.join();
	}

	if let Some(callstat_path) = &cli.callstat {
		std::fs::write(callstat_path, core.stats.format())?;
	}

	Ok(())
}

fn path_to_cstring(path: &std::path::Path) -> Result<std::ffi::CString, Error> {
	use std::os::unix::ffi::OsStrExt;
	std::ffi::CString::new(path.as_os_str().as_bytes())
		.map_err(|_| Error::Config(format!("mount point {} contains a NUL byte", path.display())))
}

/// Installs `SIGINT`/`SIGTERM` handlers that request an unmount.
///
/// `fuse_std::serve_fuse`'s worker threads only stop once the kernel closes
/// `/dev/fuse`, which normally happens when something runs `fusermount -u`.
/// A caller that instead sends this process a signal needs that same
/// close-the-device effect, so the background thread spawned here polls the
/// flag the signal handler sets and calls `umount2` itself once it fires.
fn install_signal_handler(mount_point: std::path::PathBuf) -> std::thread::JoinHandle<()> {
	unsafe {
		libc::signal(libc::SIGINT, request_shutdown as libc::sighandler_t);
		libc::signal(libc::SIGTERM, request_shutdown as libc::sighandler_t);
	}
	std::thread::spawn(move || {
		while !SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
			std::thread::sleep(Duration::from_millis(200));
		}
		log::info!("shutdown signal received, unmounting {}", mount_point.display());
		match path_to_cstring(&mount_point) {
			Ok(target) => unsafe {
				if libc::umount2(target.as_ptr(), 0) != 0 {
					log::warn!(
						"umount2({}) failed: {}",
						mount_point.display(),
						std::io::Error::last_os_error(),
					);
				}
			},
			Err(err) => log::warn!("{err}"),
		}
	})
}
