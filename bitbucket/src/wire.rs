//! Hand-rolled encoding and decoding for the subset of the FUSE kernel wire
//! ABI this crate's dispatcher needs.
//!
//! The inherited `fuse` crate keeps its kernel-struct definitions behind a
//! private `internal` module and its response `encode` methods behind
//! crate-private visibility (see [`crate::fuse_handlers`] for where that
//! gap was discovered), so there is no public way to turn a decoded request
//! or a filesystem attribute into the bytes the kernel expects. This module
//! fills that gap directly against the documented `fuse_kernel.h` layout,
//! in the same fixed-offset, no-serde style already used by the `finesse`
//! message schema.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fuse::node;

use crate::inode::{Attr, Kind};

/// Reads fixed-width little-endian fields out of a request body, tracking
/// position and refusing to read past the end.
pub struct Reader<'a> {
	buf: &'a [u8],
	pos: usize,
}

impl<'a> Reader<'a> {
	#[must_use]
	pub fn new(buf: &'a [u8]) -> Reader<'a> {
		Reader { buf, pos: 0 }
	}

	fn take(&mut self, n: usize) -> Option<&'a [u8]> {
		if self.buf.len() < self.pos + n {
			return None;
		}
		let slice = &self.buf[self.pos..self.pos + n];
		self.pos += n;
		Some(slice)
	}

	pub fn u32(&mut self) -> Option<u32> {
		self.take(4).map(|b| u32::from_le_bytes(b.try_into().unwrap()))
	}

	pub fn u64(&mut self) -> Option<u64> {
		self.take(8).map(|b| u64::from_le_bytes(b.try_into().unwrap()))
	}

	pub fn skip(&mut self, n: usize) -> Option<()> {
		self.take(n).map(|_| ())
	}

	/// Reads exactly `n` bytes, such as a variable-length name preceded by
	/// its own length field.
	pub fn bytes(&mut self, n: usize) -> Option<&'a [u8]> {
		self.take(n)
	}

	/// Everything from the current position to the end of the buffer, such
	/// as a write payload or a name string that follows a fixed header.
	pub fn rest(&mut self) -> &'a [u8] {
		let rest = &self.buf[self.pos..];
		self.pos = self.buf.len();
		rest
	}

	/// A NUL-terminated name field, as used by `rename`/`link`/`symlink`
	/// requests whose fixed header is followed by one or two C strings.
	pub fn c_string(&mut self) -> Option<&'a std::ffi::OsStr> {
		use std::os::unix::ffi::OsStrExt;

		let rest = &self.buf[self.pos..];
		let nul = rest.iter().position(|&b| b == 0)?;
		let s = &rest[..nul];
		self.pos += nul + 1;
		Some(std::ffi::OsStr::from_bytes(s))
	}
}

/// Accumulates fixed-width little-endian fields into a reply body.
#[derive(Default)]
pub struct Writer {
	buf: Vec<u8>,
}

impl Writer {
	#[must_use]
	pub fn new() -> Writer {
		Writer { buf: Vec::new() }
	}

	pub fn u32(&mut self, v: u32) -> &mut Writer {
		self.buf.extend_from_slice(&v.to_le_bytes());
		self
	}

	pub fn u64(&mut self, v: u64) -> &mut Writer {
		self.buf.extend_from_slice(&v.to_le_bytes());
		self
	}

	pub fn bytes(&mut self, v: &[u8]) -> &mut Writer {
		self.buf.extend_from_slice(v);
		self
	}

	pub fn zero_pad(&mut self, n: usize) -> &mut Writer {
		self.buf.extend(std::iter::repeat(0u8).take(n));
		self
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.buf
	}
}

fn to_unix(t: SystemTime) -> (u64, u32) {
	match t.duration_since(UNIX_EPOCH) {
		Ok(d) => (d.as_secs(), d.subsec_nanos()),
		Err(_) => (0, 0),
	}
}

fn kind_type_bits(kind: Kind) -> u32 {
	let ty = match kind {
		Kind::Directory => node::Type::Directory,
		Kind::Regular => node::Type::Regular,
		Kind::Symlink => node::Type::Symlink,
	};
	ty.as_mode().get() & 0o170000
}

/// Encodes a `struct fuse_attr` (88 bytes) for the given inode id and
/// attributes.
pub fn encode_attr(ino: u64, attr: &Attr, kind: Kind) -> Writer {
	let (atime, atimensec) = to_unix(attr.atime);
	let (mtime, mtimensec) = to_unix(attr.mtime);
	let (ctime, ctimensec) = to_unix(attr.ctime);
	let mut w = Writer::new();
	w.u64(ino)
		.u64(attr.size)
		.u64(attr.block_count())
		.u64(atime)
		.u64(mtime)
		.u64(ctime)
		.u32(atimensec)
		.u32(mtimensec)
		.u32(ctimensec)
		.u32(kind_type_bits(kind) | (attr.mode.get() & 0o7777))
		.u32(attr.link_count)
		.u32(attr.user_id)
		.u32(attr.group_id)
		.u32(attr.device_number)
		.u32(attr.block_size)
		.u32(0); // flags
	w
}

/// Encodes a `struct fuse_attr_out` reply body.
pub fn encode_attr_out(ino: u64, attr: &Attr, kind: Kind, attr_valid: Duration) -> Vec<u8> {
	let mut w = Writer::new();
	w.u64(attr_valid.as_secs()).u32(attr_valid.subsec_nanos()).u32(0);
	w.bytes(&encode_attr(ino, attr, kind).into_vec());
	w.into_vec()
}

/// Encodes a `struct fuse_entry_out` reply body.
pub fn encode_entry_out(
	ino: u64,
	generation: u64,
	attr: &Attr,
	kind: Kind,
	entry_valid: Duration,
	attr_valid: Duration,
) -> Vec<u8> {
	let mut w = Writer::new();
	w.u64(ino)
		.u64(generation)
		.u64(entry_valid.as_secs())
		.u64(attr_valid.as_secs())
		.u32(entry_valid.subsec_nanos())
		.u32(attr_valid.subsec_nanos());
	w.bytes(&encode_attr(ino, attr, kind).into_vec());
	w.into_vec()
}

/// Encodes a `struct fuse_open_out` reply body.
pub fn encode_open_out(fh: u64, open_flags: u32) -> Vec<u8> {
	let mut w = Writer::new();
	w.u64(fh).u32(open_flags).u32(0);
	w.into_vec()
}

/// Encodes a `struct fuse_write_out` reply body.
pub fn encode_write_out(size: u32) -> Vec<u8> {
	let mut w = Writer::new();
	w.u32(size).u32(0);
	w.into_vec()
}

/// Encodes a `struct fuse_statfs_out` (`fuse_kstatfs`) reply body.
pub fn encode_statfs_out(
	blocks: u64,
	bfree: u64,
	bavail: u64,
	files: u64,
	ffree: u64,
	bsize: u32,
	namelen: u32,
	frsize: u32,
) -> Vec<u8> {
	let mut w = Writer::new();
	w.u64(blocks).u64(bfree).u64(bavail).u64(files).u64(ffree);
	w.u32(bsize).u32(namelen).u32(frsize).u32(0);
	w.zero_pad(4 * 6);
	w.into_vec()
}

/// Encodes a `struct fuse_getxattr_out` / `fuse_lk_out`-shaped size reply,
/// used by `getxattr`/`listxattr` when returning only a required buffer
/// size (the `size`-query form of both calls).
pub fn encode_size_out(size: u32) -> Vec<u8> {
	let mut w = Writer::new();
	w.u32(size).u32(0);
	w.into_vec()
}

/// Encodes a `struct fuse_init_out` reply body.
pub fn encode_init_out(
	major: u32,
	minor: u32,
	max_readahead: u32,
	flags: u32,
	max_background: u16,
	congestion_threshold: u16,
	max_write: u32,
	time_gran: u32,
) -> Vec<u8> {
	let mut w = Writer::new();
	w.u32(major).u32(minor).u32(max_readahead).u32(flags);
	w.bytes(&max_background.to_le_bytes());
	w.bytes(&congestion_threshold.to_le_bytes());
	w.u32(max_write).u32(time_gran);
	w.zero_pad(4); // max_pages + map_alignment, both unset (u16 each)
	w.u32(0); // flags2
	w.zero_pad(4 * 7);
	w.into_vec()
}

/// Appends one `struct fuse_dirent` record (header + name, padded to an
/// 8-byte boundary) to `out`, matching `FUSE_DIRENT_ALIGN`. Returns the
/// number of bytes that would be required to do so even if `out` already
/// exceeds the caller's requested size, so the caller can detect and stop
/// before the buffer overflows.
pub fn encode_dirent(out: &mut Vec<u8>, ino: u64, off: u64, kind: u32, name: &[u8]) -> usize {
	let header_len = 8 + 8 + 4 + 4;
	let unpadded = header_len + name.len();
	let padded = (unpadded + 7) & !7;

	out.reserve(padded);
	out.extend_from_slice(&ino.to_le_bytes());
	out.extend_from_slice(&off.to_le_bytes());
	out.extend_from_slice(&(name.len() as u32).to_le_bytes());
	out.extend_from_slice(&kind.to_le_bytes());
	out.extend_from_slice(name);
	out.extend(std::iter::repeat(0u8).take(padded - unpadded));
	padded
}

/// The `d_type` value fuse_dirent expects for each inode kind (the upper
/// nibble of `st_mode >> 12`, same as `dirent.h`'s `DT_*` constants).
#[must_use]
pub fn dirent_type(kind: Kind) -> u32 {
	match kind {
		Kind::Directory => 4,  // DT_DIR
		Kind::Regular => 8,    // DT_REG
		Kind::Symlink => 10,   // DT_LNK
	}
}

#[cfg(test)]
mod wire_test;
