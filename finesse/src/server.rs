//! The finesse connection listener and per-request dispatcher (C12).
//!
//! One [`Listener`] owns the registration socket and the set of active
//! client channels; each accepted client gets its own shared-memory
//! [`Channel`](shm::Channel) and its own worker thread pulling requests off
//! it. Dispatch reuses the same [`bitbucket::Core`] the FUSE side serves
//! from, so a file created through one path is immediately visible through
//! the other, and it is counted through the same [`bitbucket::stats::
//! CallStats`] table under a `finesse.*` namespace — mirroring the
//! `call!`/`dispatch` shape of `bitbucket::fuse_handlers` but keyed by
//! [`Key`](bitbucket::inode::Key) instead of a FUSE node id.

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use bitbucket::inode::{Inode, Key, Kind, RefClass};

use crate::error::{Error, Result};
use crate::handshake;
use crate::message::{self, Tag};
use crate::shm::Channel;

/// Accepts finesse clients and serves their requests against a shared
/// [`bitbucket::Core`].
pub struct Listener {
	core: Arc<bitbucket::Core>,
	socket_path: PathBuf,
	shutting_down: std::sync::atomic::AtomicBool,
	channels: Mutex<Vec<Arc<Channel>>>,
	next_id: AtomicU64,
}

impl Listener {
	#[must_use]
	pub fn new(core: Arc<bitbucket::Core>, socket_path: impl Into<PathBuf>) -> Listener {
		Listener {
			core,
			socket_path: socket_path.into(),
			shutting_down: std::sync::atomic::AtomicBool::new(false),
			channels: Mutex::new(Vec::new()),
			next_id: AtomicU64::new(1),
		}
	}

	/// Binds the registration socket and spawns the accept loop on a
	/// background thread, returning its handle so the caller (`bitbucketd`)
	/// can join it at shutdown.
	pub fn serve(self: Arc<Self>) -> Result<JoinHandle<()>> {
		let listener = handshake::bind_listener(&self.socket_path)?;
		let this = self.clone();
		Ok(std::thread::spawn(move || {
			for stream in listener.incoming() {
				if this.shutting_down.load(Ordering::Acquire) {
					break;
				}
				let Ok(stream) = stream else { break };
				let this = this.clone();
				std::thread::spawn(move || {
					if let Err(err) = this.accept_client(stream) {
						log::warn!("finesse client registration failed: {err}");
					}
				});
			}
		}))
	}

	/// Signals every active channel to unblock its worker thread and stops
	/// accepting new clients. Connects once to its own socket to unblock an
	/// `accept()` already in progress, matching the way `shm::Channel`'s own
	/// shutdown unblocks condvar waiters.
	pub fn shutdown(&self) {
		self.shutting_down.store(true, Ordering::Release);
		for channel in self.channels.lock().expect("finesse channel list lock poisoned").iter() {
			channel.signal_shutdown();
		}
		let _ = std::os::unix::net::UnixStream::connect(&self.socket_path);
	}

	fn accept_client(&self, mut stream: std::os::unix::net::UnixStream) -> Result<()> {
		let hello = handshake::recv_client_hello(&mut stream)?;
		let client_ordinal = self.next_id.fetch_add(1, Ordering::AcqRel);
		let server_id = std::process::id() as u64;
		let shm_name = shm_name_for(&self.socket_path, hello.client_id, client_ordinal);

		let channel = Arc::new(Channel::create(&shm_name, hello.client_id, server_id)?);
		handshake::send_server_hello(
			&mut stream,
			&handshake::ServerHello { server_id, shm_name: shm_name.clone() },
		)?;
		self.channels.lock().expect("finesse channel list lock poisoned").push(channel.clone());

		self.worker_loop(&channel);
		Ok(())
	}

	fn worker_loop(&self, channel: &Channel) {
		while let Some(index) = channel.wait_for_request() {
			let (request_id, _result, tag, body) = channel.read_slot(index);
			let (result, payload) = self.dispatch(tag, &body);
			channel.write_slot(index, request_id, result, tag, &payload);
			channel.publish_response(index);
		}
	}

	fn dispatch(&self, tag_raw: u32, body: &[u8]) -> (i32, Vec<u8>) {
		let Some(tag) = Tag::from_u32(tag_raw) else {
			return (linux_errno::EINVAL.get() as i32, Vec::new());
		};

		macro_rules! respond {
			($body:expr) => {{
				let start = Instant::now();
				let result: bitbucket::error::Result<Vec<u8>> = $body;
				self.core.stats.record(tag.stat_name(), result.is_ok(), start.elapsed());
				match result {
					Ok(payload) => (0, payload),
					Err(err) => (err.to_errno().get() as i32, Vec::new()),
				}
			}};
		}

		match tag {
			Tag::Test => respond!(self.op_test(body)),
			Tag::ServerStat => respond!(self.op_server_stat(body)),
			Tag::Map => respond!(self.op_map(body)),
			Tag::MapRelease => respond!(self.op_map_release(body)),
			Tag::Lookup => respond!(self.op_lookup(body)),
			Tag::GetAttr => respond!(self.op_getattr(body)),
			Tag::SetAttr => respond!(self.op_setattr(body)),
			Tag::Readlink => respond!(self.op_readlink(body)),
			Tag::Open => respond!(self.op_open(body)),
			Tag::Read => respond!(self.op_read(body)),
			Tag::Write => respond!(self.op_write(body)),
			Tag::Release => respond!(self.op_release(body)),
			Tag::Statfs => respond!(self.op_statfs()),
			Tag::Create => respond!(self.op_create(body)),
			Tag::Mkdir => respond!(self.op_mkdir(body)),
			Tag::Unlink => respond!(self.op_unlink(body)),
			Tag::Rmdir => respond!(self.op_rmdir(body)),
			_ => {
				self.core.stats.record("finesse.unmirrored", false, Duration::ZERO);
				(linux_errno::ENOSYS.get() as i32, Vec::new())
			},
		}
	}

	fn with_inode<T>(&self, key: Key, f: impl FnOnce(&Arc<Inode>) -> bitbucket::error::Result<T>) -> bitbucket::error::Result<T> {
		let inode = self.core.inodes.lookup_by_key(key).ok_or(bitbucket::error::Error::NotFound)?;
		let result = f(&inode);
		self.core.inodes.release(&inode, RefClass::Lookup, 1);
		result
	}

	fn attr_reply(&self, inode: &Arc<Inode>) -> Vec<u8> {
		let attr = inode.attr();
		bitbucket::wire::encode_attr_out(inode.id().get(), &attr, inode.kind(), self.core.config.attribute_timeout)
	}

	fn op_test(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_test_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		Ok(message::encode_test_response(req.echo))
	}

	fn op_server_stat(&self, _body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let rows = self
			.core
			.stats
			.snapshot()
			.into_iter()
			.map(|(name, stat)| message::StatRow {
				name: name.to_string(),
				calls: stat.calls,
				success: stat.success,
				failure: stat.failure,
				elapsed_ns: stat.elapsed.as_nanos() as u64,
			})
			.collect::<Vec<_>>();
		Ok(message::encode_server_stat_response(&rows))
	}

	/// Resolves `req.path`'s `/`-separated components starting from
	/// `req.start` (or the root, when `req.start` is the zero key),
	/// leaving one lookup reference held on the resolved inode — the
	/// reference a client's later `MapRelease` call is expected to drop.
	fn op_map(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_map_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;

		let mut current = if req.start.0 == 0 {
			self.core.inodes.root()
		} else {
			self.core.inodes.lookup_by_key(req.start).ok_or(bitbucket::error::Error::NotFound)?
		};

		for component in path_components(&req.path) {
			let dir = current.as_directory().ok_or(bitbucket::error::Error::NotADirectory)?;
			let next = dir
				.read()
				.expect("directory lock poisoned")
				.get(component)
				.cloned()
				.ok_or(bitbucket::error::Error::NotFound)?;
			self.core.inodes.add_reference(&next, RefClass::Lookup);
			self.core.inodes.release(&current, RefClass::Lookup, 1);
			current = next;
		}

		Ok(message::encode_map_response(current.key()))
	}

	fn op_map_release(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_map_release_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		let inode = self.core.inodes.lookup_by_key(req.key).ok_or(bitbucket::error::Error::NotFound)?;
		// Undo the lookup reference this call itself just added, plus the
		// one `Map` left behind on the client's behalf.
		self.core.inodes.release(&inode, RefClass::Lookup, 2);
		Ok(Vec::new())
	}

	fn op_lookup(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_named_child_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		self.with_inode(req.parent, |parent| {
			let dir = parent.as_directory().ok_or(bitbucket::error::Error::NotADirectory)?;
			let child = dir.read().expect("directory lock poisoned").get(&req.name).cloned().ok_or(bitbucket::error::Error::NotFound)?;
			self.core.inodes.add_reference(&child, RefClass::Lookup);
			Ok(encode_key_and_attr(child.key(), &self.attr_reply(&child)))
		})
	}

	fn op_getattr(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_key_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		self.with_inode(req.key, |inode| Ok(self.attr_reply(inode)))
	}

	fn op_setattr(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_setattr_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		const FATTR_SIZE: u32 = 1 << 3;
		const FATTR_MODE: u32 = 1 << 0;
		const FATTR_UID: u32 = 1 << 1;
		const FATTR_GID: u32 = 1 << 2;
		self.with_inode(req.key, |inode| {
			if req.valid & FATTR_SIZE != 0 {
				let data = inode.as_file().ok_or(bitbucket::error::Error::IsADirectory)?;
				data.write().expect("file data lock poisoned").resize(req.size as usize, 0);
				inode.attr_mut().size = req.size;
			}
			if req.valid & FATTR_MODE != 0 {
				let mut attr = inode.attr_mut();
				let file_bits = attr.mode.get() & !0o7777;
				attr.mode = fuse::node::Mode::new(file_bits | (req.mode & 0o7777));
			}
			if req.valid & FATTR_UID != 0 {
				inode.attr_mut().user_id = req.user_id;
			}
			if req.valid & FATTR_GID != 0 {
				inode.attr_mut().group_id = req.group_id;
			}
			Ok(self.attr_reply(inode))
		})
	}

	fn op_readlink(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_key_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		self.with_inode(req.key, |inode| {
			let target = inode.as_symlink().ok_or(bitbucket::error::Error::InvalidArgument)?;
			Ok(target.as_bytes().to_vec())
		})
	}

	fn op_open(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_key_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		self.with_inode(req.key, |inode| {
			if inode.as_file().is_none() && !matches!(inode.kind(), Kind::Symlink) && inode.as_directory().is_none() {
				return Err(bitbucket::error::Error::InvalidArgument);
			}
			self.core.inodes.add_reference(inode, RefClass::Kernel);
			Ok(Vec::new())
		})
	}

	fn op_read(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_read_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		self.with_inode(req.key, |inode| {
			let data = inode.as_file().ok_or(bitbucket::error::Error::IsADirectory)?;
			let data = data.read().expect("file data lock poisoned");
			let offset = req.offset as usize;
			if offset >= data.len() {
				return Ok(Vec::new());
			}
			let end = (offset + req.size as usize).min(data.len());
			Ok(data[offset..end].to_vec())
		})
	}

	fn op_write(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_write_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		self.with_inode(req.key, |inode| {
			let data = inode.as_file().ok_or(bitbucket::error::Error::IsADirectory)?;
			let mut data = data.write().expect("file data lock poisoned");
			let offset = req.offset as usize;
			let end = offset + req.data.len();
			if data.len() < end {
				data.resize(end, 0);
			}
			data[offset..end].copy_from_slice(&req.data);
			inode.attr_mut().size = data.len() as u64;
			Ok(message::encode_write_response(req.data.len() as u32))
		})
	}

	fn op_release(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_key_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		// Matches `fuse_handlers::op_release`: only the kernel-side
		// reference `op_open` added is dropped here.
		if let Some(inode) = self.core.inodes.lookup_by_key(req.key) {
			self.core.inodes.release(&inode, RefClass::Kernel, 1);
		}
		Ok(Vec::new())
	}

	fn op_statfs(&self) -> bitbucket::error::Result<Vec<u8>> {
		Ok(bitbucket::wire::encode_statfs_out(1 << 20, 1 << 20, 1 << 20, 1 << 16, 1 << 16, 4096, 255, 4096))
	}

	fn create_child(&self, req: message::NamedChildRequest, kind: Kind) -> bitbucket::error::Result<Vec<u8>> {
		bitbucket::inode::check_name(&req.name)?;
		self.with_inode(req.parent, |parent| {
			let dir = parent.as_directory().ok_or(bitbucket::error::Error::NotADirectory)?;
			let mut dir = dir.write().expect("directory lock poisoned");
			if dir.contains_key(&req.name) {
				return Err(bitbucket::error::Error::Exists);
			}
			let child = self.core.inodes.create(kind, req.mode);
			dir.insert(req.name.clone(), child.clone());
			self.core.inodes.add_reference(&child, RefClass::Kernel);
			if self.core.config.verify_directories {
				bitbucket::inode::verify_directory(&dir);
			}
			Ok(encode_key_and_attr(child.key(), &self.attr_reply(&child)))
		})
	}

	fn op_create(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_named_child_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		self.create_child(req, Kind::Regular)
	}

	fn op_mkdir(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_named_child_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		self.create_child(req, Kind::Directory)
	}

	fn remove_child(&self, req: message::NamedChildRequest, want_dir: bool) -> bitbucket::error::Result<()> {
		self.with_inode(req.parent, |parent| {
			let dir = parent.as_directory().ok_or(bitbucket::error::Error::NotADirectory)?;
			let mut dir = dir.write().expect("directory lock poisoned");
			let child = dir.get(&req.name).cloned().ok_or(bitbucket::error::Error::NotFound)?;
			if want_dir != matches!(child.kind(), Kind::Directory) {
				return Err(if want_dir { bitbucket::error::Error::NotADirectory } else { bitbucket::error::Error::IsADirectory });
			}
			if let Some(entries) = child.as_directory() {
				if !entries.read().expect("directory lock poisoned").is_empty() {
					return Err(bitbucket::error::Error::NotEmpty);
				}
			}
			dir.remove(&req.name);
			if self.core.config.verify_directories {
				bitbucket::inode::verify_directory(&dir);
			}
			drop(dir);
			self.core.inodes.release(&child, RefClass::Lookup, 1);
			Ok(())
		})
	}

	fn op_unlink(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_named_child_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		self.remove_child(req, false)?;
		Ok(Vec::new())
	}

	fn op_rmdir(&self, body: &[u8]) -> bitbucket::error::Result<Vec<u8>> {
		let req = message::decode_named_child_request(body).ok_or(bitbucket::error::Error::InvalidArgument)?;
		self.remove_child(req, true)?;
		Ok(Vec::new())
	}
}

fn shm_name_for(socket_path: &Path, client_id: u64, ordinal: u64) -> String {
	let stem = socket_path.file_stem().and_then(|s| s.to_str()).unwrap_or("finesse");
	format!("/{stem}-{client_id:016x}-{ordinal}")
}

/// Splits a `Map` request's path on `/`, discarding empty components so a
/// leading, trailing, or doubled slash does not produce a spurious lookup.
fn path_components(path: &OsStr) -> Vec<&OsStr> {
	path.as_bytes().split(|&b| b == b'/').filter(|c| !c.is_empty()).map(OsStr::from_bytes).collect()
}

fn encode_key_and_attr(key: Key, attr: &[u8]) -> Vec<u8> {
	let mut w = bitbucket::wire::Writer::new();
	w.u64((key.0 >> 64) as u64).u64(key.0 as u64).bytes(attr);
	w.into_vec()
}

#[cfg(test)]
mod server_test;
