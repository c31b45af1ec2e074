//! The FUSE call dispatcher (C8).
//!
//! Grounded on the teacher's `fuse-vfs::Filesystem::dispatch` (match on
//! opcode, build the reply sender up front, decode the request body, reply)
//! generalized per the spec: every arm is additionally timed and fed into
//! [`crate::stats::CallStats`], and not-supported operations are counted the
//! same way a real one would be.
//!
//! The inherited `fuse::operations::*` request/response types never got a
//! working `TryFrom<FuseRequest>` impl anywhere in this tree (not even in
//! `fuse-vfs` itself, which calls them), so this module decodes request
//! bodies directly off [`fuse::server::FuseRequest::body`] with
//! [`crate::wire::Reader`] instead of going through that layer.

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::sync::Arc;
use std::time::Instant;

use fuse::node;
use fuse::server::{FuseConnection, FuseHandlers, FuseRequest, FuseSocket};

use crate::error::{Error, Result};
use crate::inode::{Inode, Kind, RefClass};
use crate::lock::Blocking;
use crate::wire::{Reader, Writer};
use crate::Core;

const FATTR_MODE: u32 = 1 << 0;
const FATTR_UID: u32 = 1 << 1;
const FATTR_GID: u32 = 1 << 2;
const FATTR_SIZE: u32 = 1 << 3;
const FATTR_ATIME: u32 = 1 << 4;
const FATTR_MTIME: u32 = 1 << 5;
const FATTR_ATIME_NOW: u32 = 1 << 7;
const FATTR_MTIME_NOW: u32 = 1 << 8;
const FATTR_CTIME: u32 = 1 << 10;

const FUSE_LK_FLOCK: u32 = 1 << 0;
const O_TRUNC: u32 = 0o1000;

const XATTR_CREATE: u32 = 1;
const XATTR_REPLACE: u32 = 2;

/// A FUSE call dispatcher bound to one filesystem [`Core`] and one kernel
/// connection.
///
/// `fh` values handed out by `open`/`opendir`/`create` are simply the target
/// inode's id: this in-memory store has no per-descriptor cursor or buffer
/// state beyond the explicit offsets already carried in every `read`/`write`
/// request, so a second handle table would track nothing a lookup by node id
/// doesn't already give for free.
pub struct Handlers<'a, S> {
	core: Arc<Core>,
	conn: &'a FuseConnection<S>,
}

impl<'a, S> Handlers<'a, S> {
	#[must_use]
	pub fn new(core: Arc<Core>, conn: &'a FuseConnection<S>) -> Handlers<'a, S> {
		Handlers { core, conn }
	}
}

impl<S: FuseSocket> Handlers<'_, S> {
	fn with_node<T>(&self, id: node::Id, f: impl FnOnce(&Arc<Inode>) -> Result<T>) -> Result<T> {
		let inode = self.core.inodes.lookup_by_id(id).ok_or(Error::NotFound)?;
		let result = f(&inode);
		self.core.inodes.release(&inode, RefClass::Lookup, 1);
		result
	}

	fn node_id_of(&self, request: FuseRequest<'_>) -> Result<node::Id> {
		request.header().node_id().ok_or(Error::InvalidArgument)
	}

	fn entry_reply(&self, child: &Arc<Inode>) -> Vec<u8> {
		self.core.inodes.add_reference(child, RefClass::Kernel);
		let attr = child.attr();
		crate::wire::encode_entry_out(
			child.id().get(),
			child.epoch(),
			&attr,
			child.kind(),
			self.core.config.attribute_timeout,
			self.core.config.attribute_timeout,
		)
	}

	fn attr_reply(&self, inode: &Arc<Inode>) -> Vec<u8> {
		let attr = inode.attr();
		crate::wire::encode_attr_out(
			inode.id().get(),
			&attr,
			inode.kind(),
			self.core.config.attribute_timeout,
		)
	}

	fn create_child(
		&self,
		parent_id: node::Id,
		name: &OsStr,
		kind: Kind,
		mode_bits: u32,
	) -> Result<Vec<u8>> {
		crate::inode::check_name(name)?;
		self.with_node(parent_id, |parent| {
			let dir = parent.as_directory().ok_or(Error::NotADirectory)?;
			let mut dir = dir.write().expect("directory lock poisoned");
			if dir.contains_key(name) {
				return Err(Error::Exists);
			}
			let child = self.core.inodes.create(kind, mode_bits);
			dir.insert(name.to_os_string(), child.clone());
			if self.core.config.verify_directories {
				crate::inode::verify_directory(&dir);
			}
			Ok(self.entry_reply(&child))
		})
	}

	fn remove_child(&self, parent_id: node::Id, name: &OsStr, want_dir: bool) -> Result<()> {
		self.with_node(parent_id, |parent| {
			let dir = parent.as_directory().ok_or(Error::NotADirectory)?;
			let mut dir = dir.write().expect("directory lock poisoned");
			let child = dir.get(name).cloned().ok_or(Error::NotFound)?;
			if child.id().is_root() {
				return Err(Error::InvalidArgument);
			}
			let is_dir = child.as_directory().is_some();
			if want_dir && !is_dir {
				return Err(Error::NotADirectory);
			}
			if !want_dir && is_dir {
				return Err(Error::IsADirectory);
			}
			if is_dir {
				let entries = child.as_directory().expect("checked above");
				if !entries.read().expect("directory lock poisoned").is_empty() {
					return Err(Error::NotEmpty);
				}
			}
			dir.remove(name);
			self.core.inodes.release(&child, RefClass::Lookup, 1);
			if self.core.config.verify_directories {
				crate::inode::verify_directory(&dir);
			}
			Ok(())
		})
	}

	fn apply_setattr(&self, inode: &Arc<Inode>, r: &mut Reader<'_>, valid: u32) -> Result<()> {
		let fh = r.u64().ok_or(Error::InvalidArgument)?;
		let size = r.u64().ok_or(Error::InvalidArgument)?;
		let _lock_owner = r.u64().ok_or(Error::InvalidArgument)?;
		let atime = r.u64().ok_or(Error::InvalidArgument)?;
		let mtime = r.u64().ok_or(Error::InvalidArgument)?;
		let _ctime = r.u64().ok_or(Error::InvalidArgument)?;
		let atimensec = r.u32().ok_or(Error::InvalidArgument)?;
		let mtimensec = r.u32().ok_or(Error::InvalidArgument)?;
		let _ctimensec = r.u32().ok_or(Error::InvalidArgument)?;
		let mode = r.u32().ok_or(Error::InvalidArgument)?;
		r.skip(4);
		let uid = r.u32().ok_or(Error::InvalidArgument)?;
		let gid = r.u32().ok_or(Error::InvalidArgument)?;
		let _ = fh;

		if valid & FATTR_SIZE != 0 {
			let data = inode.as_file().ok_or(Error::IsADirectory)?;
			let mut data = data.write().expect("file data lock poisoned");
			data.resize(size as usize, 0);
			drop(data);
		}
		let mut attr = inode.attr_mut();
		if valid & FATTR_SIZE != 0 {
			attr.size = size;
		}
		if valid & FATTR_MODE != 0 {
			attr.mode = node::Mode::new((attr.mode.get() & !0o7777) | (mode & 0o7777));
		}
		if valid & FATTR_UID != 0 {
			attr.user_id = uid;
		}
		if valid & FATTR_GID != 0 {
			attr.group_id = gid;
		}
		if valid & FATTR_ATIME_NOW != 0 {
			attr.atime = std::time::SystemTime::now();
		} else if valid & FATTR_ATIME != 0 {
			attr.atime = std::time::UNIX_EPOCH
				+ std::time::Duration::new(atime, atimensec);
		}
		if valid & FATTR_MTIME_NOW != 0 {
			attr.mtime = std::time::SystemTime::now();
		} else if valid & FATTR_MTIME != 0 {
			attr.mtime = std::time::UNIX_EPOCH
				+ std::time::Duration::new(mtime, mtimensec);
		}
		if valid & FATTR_CTIME != 0 {
			attr.ctime = std::time::SystemTime::now();
		}
		Ok(())
	}

	// -- individual operations, each returning the reply payload bytes --

	fn op_lookup(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let parent_id = self.node_id_of(request)?;
		let name = OsStr::from_bytes(request.body().split(|&b| b == 0).next().unwrap_or(&[]));
		crate::inode::check_name(name)?;
		self.with_node(parent_id, |parent| {
			let dir = parent.as_directory().ok_or(Error::NotADirectory)?;
			let child = dir.read().expect("directory lock poisoned").get(name).cloned().ok_or(Error::NotFound)?;
			Ok(self.entry_reply(&child))
		})
	}

	fn op_forget(&self, request: FuseRequest<'_>) {
		let Some(id) = request.header().node_id() else { return };
		let mut r = Reader::new(request.body());
		let Some(nlookup) = r.u64() else { return };
		if let Some(inode) = self.core.inodes.lookup_by_id(id) {
			self.core.inodes.release(&inode, RefClass::Lookup, 1);
			if nlookup > 0 {
				self.core.inodes.release(&inode, RefClass::Kernel, nlookup);
			}
		}
	}

	fn op_batch_forget(&self, request: FuseRequest<'_>) {
		let mut r = Reader::new(request.body());
		let Some(count) = r.u32() else { return };
		r.skip(4);
		for _ in 0..count {
			let Some(nodeid) = r.u64() else { break };
			let Some(nlookup) = r.u64() else { break };
			let Some(id) = node::Id::new(nodeid) else { continue };
			if let Some(inode) = self.core.inodes.lookup_by_id(id) {
				self.core.inodes.release(&inode, RefClass::Lookup, 1);
				if nlookup > 0 {
					self.core.inodes.release(&inode, RefClass::Kernel, nlookup);
				}
			}
		}
	}

	fn op_getattr(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let id = self.node_id_of(request)?;
		self.with_node(id, |inode| Ok(self.attr_reply(inode)))
	}

	fn op_setattr(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let valid = r.u32().ok_or(Error::InvalidArgument)?;
		r.skip(4);
		self.with_node(id, |inode| {
			self.apply_setattr(inode, &mut r, valid)?;
			Ok(self.attr_reply(inode))
		})
	}

	fn op_readlink(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let id = self.node_id_of(request)?;
		self.with_node(id, |inode| match &inode.payload {
			crate::inode::Payload::Symlink(target) => Ok(target.as_bytes().to_vec()),
			_ => Err(Error::InvalidArgument),
		})
	}

	fn op_mkdir(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let parent_id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let mode = r.u32().ok_or(Error::InvalidArgument)?;
		let umask = r.u32().ok_or(Error::InvalidArgument)?;
		let name = r.c_string().ok_or(Error::InvalidArgument)?;
		self.create_child(parent_id, name, Kind::Directory, mode & !umask)
	}

	fn op_symlink(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let parent_id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let name = r.c_string().ok_or(Error::InvalidArgument)?.to_os_string();
		let target = r.c_string().ok_or(Error::InvalidArgument)?.to_os_string();
		crate::inode::check_name(&name)?;
		self.with_node(parent_id, |parent| {
			let dir = parent.as_directory().ok_or(Error::NotADirectory)?;
			let mut dir = dir.write().expect("directory lock poisoned");
			if dir.contains_key(&name) {
				return Err(Error::Exists);
			}
			let child = self.core.inodes.create_symlink(target.clone());
			dir.insert(name.clone(), child.clone());
			if self.core.config.verify_directories {
				crate::inode::verify_directory(&dir);
			}
			Ok(self.entry_reply(&child))
		})
	}

	fn op_unlink(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let parent_id = self.node_id_of(request)?;
		let name = OsStr::from_bytes(request.body().split(|&b| b == 0).next().unwrap_or(&[]));
		self.remove_child(parent_id, name, false)?;
		Ok(Vec::new())
	}

	fn op_rmdir(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let parent_id = self.node_id_of(request)?;
		let name = OsStr::from_bytes(request.body().split(|&b| b == 0).next().unwrap_or(&[]));
		self.remove_child(parent_id, name, true)?;
		Ok(Vec::new())
	}

	fn op_rename(&self, request: FuseRequest<'_>, with_flags: bool) -> Result<Vec<u8>> {
		let parent_id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let newdir = r.u64().ok_or(Error::InvalidArgument)?;
		let flags = if with_flags {
			let f = r.u32().ok_or(Error::InvalidArgument)?;
			r.skip(4);
			f
		} else {
			0
		};
		let oldname = r.c_string().ok_or(Error::InvalidArgument)?.to_os_string();
		let newname = r.c_string().ok_or(Error::InvalidArgument)?.to_os_string();
		let newparent = node::Id::new(newdir).ok_or(Error::InvalidArgument)?;
		crate::rename::rename(
			&self.core.inodes,
			parent_id,
			&oldname,
			newparent,
			&newname,
			flags,
			self.core.config.verify_directories,
		)?;
		Ok(Vec::new())
	}

	fn op_link(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let newparent_id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let oldnodeid = r.u64().ok_or(Error::InvalidArgument)?;
		let name = r.c_string().ok_or(Error::InvalidArgument)?.to_os_string();
		crate::inode::check_name(&name)?;
		let old_id = node::Id::new(oldnodeid).ok_or(Error::InvalidArgument)?;
		self.with_node(old_id, |target| {
			if target.as_directory().is_some() {
				return Err(Error::IsADirectory);
			}
			self.with_node(newparent_id, |parent| {
				let dir = parent.as_directory().ok_or(Error::NotADirectory)?;
				let mut dir = dir.write().expect("directory lock poisoned");
				if dir.contains_key(&name) {
					return Err(Error::Exists);
				}
				self.core.inodes.add_reference(target, RefClass::Lookup);
				dir.insert(name.clone(), target.clone());
				target.attr_mut().link_count += 1;
				if self.core.config.verify_directories {
					crate::inode::verify_directory(&dir);
				}
				Ok(self.entry_reply(target))
			})
		})
	}

	fn op_open(&self, request: FuseRequest<'_>, want_dir: bool) -> Result<Vec<u8>> {
		let id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let flags = r.u32().unwrap_or(0);
		self.with_node(id, |inode| {
			if want_dir {
				if inode.as_directory().is_none() {
					return Err(Error::NotADirectory);
				}
			} else {
				if inode.as_file().is_none() && !matches!(inode.kind(), Kind::Symlink) {
					return Err(Error::IsADirectory);
				}
				if flags & O_TRUNC != 0 {
					if let Some(data) = inode.as_file() {
						data.write().expect("file data lock poisoned").clear();
						inode.attr_mut().size = 0;
					}
				}
			}
			self.core.inodes.add_reference(inode, RefClass::Kernel);
			Ok(crate::wire::encode_open_out(inode.id().get(), 0))
		})
	}

	fn op_create(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let parent_id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let _flags = r.u32().ok_or(Error::InvalidArgument)?;
		let mode = r.u32().ok_or(Error::InvalidArgument)?;
		let umask = r.u32().ok_or(Error::InvalidArgument)?;
		let _open_flags = r.u32().ok_or(Error::InvalidArgument)?;
		let name = r.c_string().ok_or(Error::InvalidArgument)?.to_os_string();
		crate::inode::check_name(&name)?;
		self.with_node(parent_id, |parent| {
			let dir = parent.as_directory().ok_or(Error::NotADirectory)?;
			let mut dir = dir.write().expect("directory lock poisoned");
			if dir.contains_key(&name) {
				return Err(Error::Exists);
			}
			let child = self.core.inodes.create(Kind::Regular, mode & !umask);
			dir.insert(name.clone(), child.clone());
			self.core.inodes.add_reference(&child, RefClass::Kernel);
			if self.core.config.verify_directories {
				crate::inode::verify_directory(&dir);
			}
			let mut out = Vec::new();
			out.extend_from_slice(&self.entry_reply(&child));
			out.extend_from_slice(&crate::wire::encode_open_out(child.id().get(), 0));
			Ok(out)
		})
	}

	fn op_release(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let fh = r.u64().ok_or(Error::InvalidArgument)?;
		let _flags = r.u32().ok_or(Error::InvalidArgument)?;
		let release_flags = r.u32().ok_or(Error::InvalidArgument)?;
		let lock_owner = r.u64().ok_or(Error::InvalidArgument)?;
		let _ = fh;
		if let Some(inode) = self.core.inodes.lookup_by_id(id) {
			if release_flags & fuse::kernel::FUSE_RELEASE_FLOCK_UNLOCK != 0 {
				if let Some(owner) = fuse::lock::ProcessId::new(lock_owner as u32) {
					let _ = self.unlock_and_notify(&inode, owner);
				}
			}
			self.core.inodes.release(&inode, RefClass::Kernel, 1);
		}
		Ok(Vec::new())
	}

	// Nothing in this in-memory store is ever unflushed, so there is no
	// durability work to do either way; `enable_flush`/`enable_fsync` only
	// gate whether the call is acknowledged as a real flush/fsync in the
	// log, matching on-disk backends that would do work here.
	fn op_flush(&self, _request: FuseRequest<'_>) -> Result<Vec<u8>> {
		if self.core.config.enable_flush {
			log::trace!("flush");
		}
		Ok(Vec::new())
	}

	fn op_fsync(&self, _request: FuseRequest<'_>) -> Result<Vec<u8>> {
		if self.core.config.enable_fsync {
			log::trace!("fsync");
		}
		Ok(Vec::new())
	}

	fn op_read(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let fh = r.u64().ok_or(Error::InvalidArgument)?;
		let offset = r.u64().ok_or(Error::InvalidArgument)?;
		let size = r.u32().ok_or(Error::InvalidArgument)?;
		let _ = fh;
		self.with_node(id, |inode| {
			let data = inode.as_file().ok_or(Error::IsADirectory)?;
			let data = data.read().expect("file data lock poisoned");
			let offset = offset as usize;
			if offset >= data.len() {
				return Ok(Vec::new());
			}
			let end = (offset + size as usize).min(data.len());
			Ok(data[offset..end].to_vec())
		})
	}

	fn op_write(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let fh = r.u64().ok_or(Error::InvalidArgument)?;
		let offset = r.u64().ok_or(Error::InvalidArgument)?;
		let size = r.u32().ok_or(Error::InvalidArgument)?;
		r.skip(4 + 8 + 4 + 4); // write_flags, lock_owner, flags, padding
		let _ = fh;
		let payload = r.rest();
		let len = (size as usize).min(payload.len());
		let payload = &payload[..len];
		self.with_node(id, |inode| {
			let data = inode.as_file().ok_or(Error::IsADirectory)?;
			let mut data = data.write().expect("file data lock poisoned");
			let end = offset as usize + payload.len();
			if end > data.len() {
				data.resize(end, 0);
			}
			data[offset as usize..end].copy_from_slice(payload);
			let new_len = data.len() as u64;
			drop(data);
			inode.attr_mut().size = new_len;
			Ok(crate::wire::encode_write_out(payload.len() as u32))
		})
	}

	fn op_statfs(&self, _request: FuseRequest<'_>) -> Result<Vec<u8>> {
		Ok(crate::wire::encode_statfs_out(1 << 20, 1 << 20, 1 << 20, 1 << 16, 1 << 16, 4096, 255, 4096))
	}

	fn op_setxattr(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		if !self.core.config.enable_xattr {
			return Err(Error::NotSupported);
		}
		let id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let size = r.u32().ok_or(Error::InvalidArgument)?;
		let flags = r.u32().ok_or(Error::InvalidArgument)?;
		r.skip(4 + 4);
		let name = r.c_string().ok_or(Error::InvalidArgument)?.to_os_string();
		let rest = r.rest();
		let value = rest.get(..size as usize).ok_or(Error::InvalidArgument)?.to_vec();
		self.with_node(id, |inode| {
			let mut xattrs = inode.xattrs_mut();
			let exists = xattrs.contains_key(&name);
			if flags & XATTR_CREATE != 0 && exists {
				return Err(Error::Exists);
			}
			if flags & XATTR_REPLACE != 0 && !exists {
				return Err(Error::NoData);
			}
			xattrs.insert(name, value);
			Ok(Vec::new())
		})
	}

	fn op_getxattr(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		if !self.core.config.enable_xattr {
			return Err(Error::NotSupported);
		}
		let id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let size = r.u32().ok_or(Error::InvalidArgument)?;
		r.skip(4);
		let name = r.c_string().ok_or(Error::InvalidArgument)?.to_os_string();
		self.with_node(id, |inode| {
			let xattrs = inode.xattrs();
			let value = xattrs.get(&name).ok_or(Error::NoData)?;
			if size == 0 {
				return Ok(crate::wire::encode_size_out(value.len() as u32));
			}
			if value.len() > size as usize {
				return Err(Error::Overflow);
			}
			Ok(value.clone())
		})
	}

	fn op_removexattr(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		if !self.core.config.enable_xattr {
			return Err(Error::NotSupported);
		}
		let id = self.node_id_of(request)?;
		let name = OsStr::from_bytes(request.body().split(|&b| b == 0).next().unwrap_or(&[]));
		self.with_node(id, |inode| {
			inode.xattrs_mut().remove(name).ok_or(Error::NoData)?;
			Ok(Vec::new())
		})
	}

	fn op_access(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let id = self.node_id_of(request)?;
		self.with_node(id, |_inode| Ok(Vec::new()))
	}

	fn unlock_and_notify(&self, inode: &Arc<Inode>, owner: fuse::lock::ProcessId) -> Result<()> {
		let mut state = inode.lock_state.write().expect("lock state poisoned");
		let granted = state.unlock(owner)?;
		drop(state);
		// Waiters granted by this unlock are blocked FUSE_SETLKW requests;
		// this in-memory port does not keep a parked-reply table for them
		// (see DESIGN.md), so a granted waiter simply becomes eligible for
		// its next retry rather than being woken immediately.
		let _ = granted;
		Ok(())
	}

	fn op_fallocate(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let _fh = r.u64().ok_or(Error::InvalidArgument)?;
		let offset = r.u64().ok_or(Error::InvalidArgument)?;
		let length = r.u64().ok_or(Error::InvalidArgument)?;
		self.with_node(id, |inode| {
			let data = inode.as_file().ok_or(Error::IsADirectory)?;
			let mut data = data.write().expect("file data lock poisoned");
			let needed = (offset + length) as usize;
			if needed > data.len() {
				data.resize(needed, 0);
			}
			let new_len = data.len() as u64;
			drop(data);
			inode.attr_mut().size = new_len;
			Ok(Vec::new())
		})
	}

	fn op_copy_file_range(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let src_id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let _fh_in = r.u64().ok_or(Error::InvalidArgument)?;
		let off_in = r.u64().ok_or(Error::InvalidArgument)?;
		let nodeid_out = r.u64().ok_or(Error::InvalidArgument)?;
		let _fh_out = r.u64().ok_or(Error::InvalidArgument)?;
		let off_out = r.u64().ok_or(Error::InvalidArgument)?;
		let len = r.u64().ok_or(Error::InvalidArgument)?;

		let dst_id = node::Id::new(nodeid_out).ok_or(Error::InvalidArgument)?;
		let src = self.core.inodes.lookup_by_id(src_id).ok_or(Error::NotFound)?;
		let result = (|| {
			let dst = self.core.inodes.lookup_by_id(dst_id).ok_or(Error::NotFound)?;
			let result = (|| {
				let copied = if Arc::ptr_eq(&src, &dst) {
					let data = src.as_file().ok_or(Error::IsADirectory)?;
					let mut data = data.write().expect("file data lock poisoned");
					let avail = (data.len() as u64).saturating_sub(off_in);
					let copy_len = len.min(avail) as usize;
					let mut buf = vec![0u8; copy_len];
					buf.copy_from_slice(&data[off_in as usize..off_in as usize + copy_len]);
					let end = off_out as usize + copy_len;
					if end > data.len() {
						data.resize(end, 0);
					}
					data[off_out as usize..end].copy_from_slice(&buf);
					copy_len as u64
				} else {
					let src_data = src.as_file().ok_or(Error::IsADirectory)?;
					let src_data = src_data.read().expect("file data lock poisoned");
					let avail = (src_data.len() as u64).saturating_sub(off_in);
					let copy_len = len.min(avail) as usize;
					let buf = src_data[off_in as usize..off_in as usize + copy_len].to_vec();
					drop(src_data);
					let dst_data = dst.as_file().ok_or(Error::IsADirectory)?;
					let mut dst_data = dst_data.write().expect("file data lock poisoned");
					let end = off_out as usize + copy_len;
					if end > dst_data.len() {
						dst_data.resize(end, 0);
					}
					dst_data[off_out as usize..end].copy_from_slice(&buf);
					copy_len as u64
				};
				if copied > 0 {
					let new_len = dst.attr().size.max(off_out + copied);
					dst.attr_mut().size = new_len;
				}
				let mut w = Writer::new();
				w.u64(copied).u32(0);
				Ok(w.into_vec())
			})();
			self.core.inodes.release(&dst, RefClass::Lookup, 1);
			result
		})();
		self.core.inodes.release(&src, RefClass::Lookup, 1);
		result
	}

	fn op_lseek(&self, request: FuseRequest<'_>) -> Result<Vec<u8>> {
		let mut r = Reader::new(request.body());
		let _fh = r.u64().ok_or(Error::InvalidArgument)?;
		let offset = r.u64().ok_or(Error::InvalidArgument)?;
		let _whence = r.u32().ok_or(Error::InvalidArgument)?;
		let mut w = Writer::new();
		w.u64(offset);
		Ok(w.into_vec())
	}
}

/// Runs `f`, records `name`'s outcome and elapsed time, and sends the
/// resulting reply (or error) to the kernel. Errors from the socket send
/// itself are logged and otherwise swallowed: the kernel connection loop
/// (`fuse_std::serve_fuse`) is what decides whether a send failure is fatal.
fn finish<S: FuseSocket>(
	core: &Core,
	conn: &FuseConnection<S>,
	name: &str,
	request: FuseRequest<'_>,
	result: Result<Vec<u8>>,
) {
	let send_reply = conn.reply(request.id());
	match result {
		Ok(bytes) => {
			if let Err(err) = send_reply.ok_buf(&bytes) {
				log::error!("{name}: failed to send reply: {err:?}");
			}
		},
		Err(err) => {
			log::debug!("{name}: {err}");
			if let Err(err) = send_reply.err(fuse::Error::from(err)) {
				log::error!("{name}: failed to send error reply: {err:?}");
			}
		},
	}
}

impl<S: FuseSocket> FuseHandlers for Handlers<'_, S> {
	fn unimplemented(&self, request: FuseRequest<'_>) {
		log::trace!("unimplemented opcode {:?}", request.header().opcode());
		let send_reply = self.conn.reply(request.id());
		let _ = send_reply.err(fuse::Error::from(Error::NotSupported));
	}

	fn dispatch(&self, request: FuseRequest<'_>) {
		use fuse::Opcode as op;

		let opcode = request.header().opcode();
		log::trace!("dispatch {opcode:?}");

		macro_rules! call {
			($name:literal, $body:expr) => {{
				let start = Instant::now();
				let result = $body;
				let elapsed = start.elapsed();
				self.core.stats.record($name, result.is_ok(), elapsed);
				finish(&self.core, self.conn, $name, request, result);
			}};
		}

		match opcode {
			// FUSE_INIT is consumed entirely by `FuseConnection::connect`'s
			// handshake loop before a connection (and so this dispatcher) is
			// ever reached; seeing one here means the kernel re-sent it
			// mid-session, which is a protocol violation rather than a
			// retryable error.
			op::FUSE_INIT => call!("init", Err(Error::InvalidArgument)),
			op::FUSE_DESTROY => call!("destroy", Ok(Vec::new())),
			op::FUSE_LOOKUP => call!("lookup", self.op_lookup(request)),
			op::FUSE_FORGET => {
				let start = Instant::now();
				self.op_forget(request);
				self.core.stats.record("forget", true, start.elapsed());
			},
			op::FUSE_BATCH_FORGET => {
				let start = Instant::now();
				self.op_batch_forget(request);
				self.core.stats.record("forget_multi", true, start.elapsed());
			},
			op::FUSE_GETATTR => call!("getattr", self.op_getattr(request)),
			op::FUSE_SETATTR => call!("setattr", self.op_setattr(request)),
			op::FUSE_READLINK => call!("readlink", self.op_readlink(request)),
			op::FUSE_MKNOD => call!("mknod", Err(Error::NotSupported)),
			op::FUSE_MKDIR => call!("mkdir", self.op_mkdir(request)),
			op::FUSE_UNLINK => call!("unlink", self.op_unlink(request)),
			op::FUSE_RMDIR => call!("rmdir", self.op_rmdir(request)),
			op::FUSE_SYMLINK => call!("symlink", self.op_symlink(request)),
			op::FUSE_RENAME => call!("rename", self.op_rename(request, false)),
			op::FUSE_RENAME2 => call!("rename", self.op_rename(request, true)),
			op::FUSE_LINK => call!("link", self.op_link(request)),
			op::FUSE_OPEN => call!("open", self.op_open(request, false)),
			op::FUSE_READ => call!("read", self.op_read(request)),
			op::FUSE_WRITE => call!("write", self.op_write(request)),
			op::FUSE_FLUSH => call!("flush", self.op_flush(request)),
			op::FUSE_RELEASE => call!("release", self.op_release(request)),
			op::FUSE_FSYNC => call!("fsync", self.op_fsync(request)),
			op::FUSE_OPENDIR => call!("opendir", self.op_open(request, true)),
			op::FUSE_READDIR => call!("readdir", self.op_readdir(request, false)),
			op::FUSE_READDIRPLUS => call!("readdirplus", self.op_readdir(request, true)),
			op::FUSE_RELEASEDIR => call!("releasedir", self.op_release(request)),
			op::FUSE_FSYNCDIR => call!("fsyncdir", self.op_fsync(request)),
			op::FUSE_STATFS => call!("statfs", self.op_statfs(request)),
			op::FUSE_SETXATTR => call!("setxattr", self.op_setxattr(request)),
			op::FUSE_GETXATTR => call!("getxattr", self.op_getxattr(request)),
			op::FUSE_LISTXATTR => call!("listxattr", Err(Error::NotSupported)),
			op::FUSE_REMOVEXATTR => call!("removexattr", self.op_removexattr(request)),
			op::FUSE_ACCESS => call!("access", self.op_access(request)),
			op::FUSE_CREATE => call!("create", self.op_create(request)),
			op::FUSE_GETLK => call!("getlk", Err(Error::NotSupported)),
			op::FUSE_SETLK => call!("setlk", self.op_setlk(request, false)),
			op::FUSE_SETLKW => call!("setlk", self.op_setlk(request, true)),
			op::FUSE_BMAP => call!("bmap", Err(Error::NotSupported)),
			op::FUSE_IOCTL => call!("ioctl", Err(Error::NotSupported)),
			op::FUSE_POLL => call!("poll", Err(Error::NotSupported)),
			op::FUSE_FALLOCATE => call!("fallocate", self.op_fallocate(request)),
			op::FUSE_COPY_FILE_RANGE => call!("copy_file_range", self.op_copy_file_range(request)),
			op::FUSE_LSEEK => call!("lseek", self.op_lseek(request)),
			_ => self.unimplemented(request),
		}
	}
}

impl<S: FuseSocket> Handlers<'_, S> {
	/// `FUSE_SETLK`/`FUSE_SETLKW`: only whole-file `flock()` requests (the
	/// kernel tags these with `FUSE_LK_FLOCK` in `fuse_lk_in::lk_flags`) are
	/// implemented, against [`crate::lock::LockState`]; POSIX byte-range
	/// locks are a named Non-goal and reply not-supported.
	fn op_setlk(&self, request: FuseRequest<'_>, blocking: bool) -> Result<Vec<u8>> {
		let id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let _fh = r.u64().ok_or(Error::InvalidArgument)?;
		let owner = r.u64().ok_or(Error::InvalidArgument)?;
		let _start = r.u64().ok_or(Error::InvalidArgument)?;
		let _end = r.u64().ok_or(Error::InvalidArgument)?;
		let ltype = r.u32().ok_or(Error::InvalidArgument)?;
		let _pid = r.u32().ok_or(Error::InvalidArgument)?;
		let lk_flags = r.u32().ok_or(Error::InvalidArgument)?;

		if lk_flags & FUSE_LK_FLOCK == 0 {
			return Err(Error::NotSupported);
		}

		const F_RDLCK: u32 = 0;
		const F_WRLCK: u32 = 1;
		const F_UNLCK: u32 = 2;

		let blocking = if blocking { Blocking::Block } else { Blocking::NonBlock };
		let owner = fuse::lock::ProcessId::new(owner as u32).ok_or(Error::InvalidArgument)?;
		self.with_node(id, |inode| {
			let mut state = inode.lock_state.write().expect("lock state poisoned");
			match ltype {
				F_UNLCK => {
					state.unlock(owner)?;
				},
				F_RDLCK => {
					state.lock_shared(owner, blocking)?;
				},
				F_WRLCK => {
					state.lock_exclusive(owner, blocking)?;
				},
				_ => return Err(Error::InvalidArgument),
			}
			Ok(Vec::new())
		})
	}

	fn op_readdir(&self, request: FuseRequest<'_>, plus: bool) -> Result<Vec<u8>> {
		let id = self.node_id_of(request)?;
		let mut r = Reader::new(request.body());
		let _fh = r.u64().ok_or(Error::InvalidArgument)?;
		let offset = r.u64().ok_or(Error::InvalidArgument)?;
		let size = r.u32().ok_or(Error::InvalidArgument)?;

		self.with_node(id, |inode| {
			let dir = inode.as_directory().ok_or(Error::NotADirectory)?;
			let dir = dir.read().expect("directory lock poisoned");
			let mut entries: Vec<(&std::ffi::OsString, &Arc<Inode>)> = dir.iter().collect();
			entries.sort_by(|a, b| a.0.cmp(b.0));

			let mut out = Vec::new();
			let mut off = 1u64;
			for (name, child) in entries {
				if off <= offset {
					off += 1;
					continue;
				}
				let kind = crate::wire::dirent_type(child.kind());
				let name_bytes = name.as_bytes();
				if plus {
					let attr = child.attr();
					let entry = crate::wire::encode_entry_out(
						child.id().get(),
						child.epoch(),
						&attr,
						child.kind(),
						self.core.config.attribute_timeout,
						self.core.config.attribute_timeout,
					);
					drop(attr);
					let mut record = Vec::new();
					let written = crate::wire::encode_dirent(&mut record, child.id().get(), off, kind, name_bytes);
					if out.len() + entry.len() + written > size as usize {
						break;
					}
					out.extend_from_slice(&entry);
					out.extend_from_slice(&record);
					self.core.inodes.add_reference(child, RefClass::Kernel);
				} else {
					let written = crate::wire::encode_dirent(&mut out, child.id().get(), off, kind, name_bytes);
					if out.len() > size as usize {
						out.truncate(out.len() - written);
						break;
					}
				}
				off += 1;
			}
			Ok(out)
		})
	}
}
