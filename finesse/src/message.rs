//! The finesse wire schema: a tag identifying how to interpret a slot's
//! payload, plus fixed-layout encode/decode for each tag's request and
//! response bodies.
//!
//! Tags are grounded on `finesse_fuse_msg.h`'s `FINESSE_FUSE_REQ_*` /
//! `FINESSE_FUSE_RSP_*` enums (the filesystem-mirror half) and
//! `finesse_msg.h`'s native message structs (`finesse_name_map_request_t`,
//! `finesse_map_release_request_t`, `finesse_test_message_t`, the server
//! stat call). Bodies reuse [`bitbucket::wire::Reader`]/[`bitbucket::wire::
//! Writer`] rather than introducing a second ad hoc cursor type, so the
//! finesse fast path is encoded in the same style as the FUSE dispatcher.

use bitbucket::inode::Key;
use bitbucket::wire::{Reader, Writer};

/// Identifies how to interpret a slot's payload. Numbered in two bands, the
/// way the original source separates its native calls (128+) from its
/// filesystem-mirror calls (42-ish and up): native operations have no FUSE
/// equivalent, while mirror operations shadow a FUSE handler so a client
/// that already holds a key can skip the kernel round trip entirely.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Tag {
	Lookup = 42,
	Forget = 43,
	GetAttr = 44,
	SetAttr = 45,
	Readlink = 46,
	Mkdir = 47,
	Unlink = 48,
	Rmdir = 49,
	Symlink = 50,
	Rename = 51,
	Link = 52,
	Open = 53,
	Read = 54,
	Write = 55,
	Flush = 56,
	Release = 57,
	Fsync = 58,
	Opendir = 59,
	Readdir = 60,
	Releasedir = 61,
	Fsyncdir = 62,
	Statfs = 63,
	Setxattr = 64,
	Getxattr = 65,
	Listxattr = 66,
	Removexattr = 67,
	Access = 68,
	Create = 69,
	Getlk = 70,
	Setlk = 71,
	Bmap = 72,
	Ioctl = 73,
	Poll = 74,
	Fallocate = 75,
	Lseek = 76,
	Map = 128,
	Test = 129,
	ServerStat = 130,
	MapRelease = 131,
}

impl Tag {
	#[must_use]
	pub fn from_u32(v: u32) -> Option<Tag> {
		Some(match v {
			42 => Tag::Lookup,
			43 => Tag::Forget,
			44 => Tag::GetAttr,
			45 => Tag::SetAttr,
			46 => Tag::Readlink,
			47 => Tag::Mkdir,
			48 => Tag::Unlink,
			49 => Tag::Rmdir,
			50 => Tag::Symlink,
			51 => Tag::Rename,
			52 => Tag::Link,
			53 => Tag::Open,
			54 => Tag::Read,
			55 => Tag::Write,
			56 => Tag::Flush,
			57 => Tag::Release,
			58 => Tag::Fsync,
			59 => Tag::Opendir,
			60 => Tag::Readdir,
			61 => Tag::Releasedir,
			62 => Tag::Fsyncdir,
			63 => Tag::Statfs,
			64 => Tag::Setxattr,
			65 => Tag::Getxattr,
			66 => Tag::Listxattr,
			67 => Tag::Removexattr,
			68 => Tag::Access,
			69 => Tag::Create,
			70 => Tag::Getlk,
			71 => Tag::Setlk,
			72 => Tag::Bmap,
			73 => Tag::Ioctl,
			74 => Tag::Poll,
			75 => Tag::Fallocate,
			76 => Tag::Lseek,
			128 => Tag::Map,
			129 => Tag::Test,
			130 => Tag::ServerStat,
			131 => Tag::MapRelease,
			_ => return None,
		})
	}

	/// The `CallStats` entry name this tag's calls are recorded under. Every
	/// mirror tag this crate does not yet give its own handler shares the
	/// `finesse.unmirrored` counter rather than going uncounted.
	#[must_use]
	pub fn stat_name(self) -> &'static str {
		match self {
			Tag::Lookup => "finesse.lookup",
			Tag::GetAttr => "finesse.getattr",
			Tag::SetAttr => "finesse.setattr",
			Tag::Readlink => "finesse.readlink",
			Tag::Open => "finesse.open",
			Tag::Read => "finesse.read",
			Tag::Write => "finesse.write",
			Tag::Release => "finesse.release",
			Tag::Statfs => "finesse.statfs",
			Tag::Create => "finesse.create",
			Tag::Mkdir => "finesse.mkdir",
			Tag::Unlink => "finesse.unlink",
			Tag::Rmdir => "finesse.rmdir",
			Tag::Test => "finesse.test",
			Tag::ServerStat => "finesse.server_stat",
			Tag::Map => "finesse.map",
			Tag::MapRelease => "finesse.map_release",
			_ => "finesse.unmirrored",
		}
	}
}

fn write_key(w: &mut Writer, key: Key) {
	let bits = key.0;
	w.u64((bits >> 64) as u64);
	w.u64(bits as u64);
}

fn read_key(r: &mut Reader) -> Option<Key> {
	let hi = r.u64()?;
	let lo = r.u64()?;
	Some(Key((u128::from(hi) << 64) | u128::from(lo)))
}

/// `Test`: a liveness probe the client can send at any time; the server
/// echoes the value back unchanged.
pub struct TestRequest {
	pub echo: u64,
}

pub fn encode_test_request(req: &TestRequest) -> Vec<u8> {
	let mut w = Writer::new();
	w.u64(req.echo);
	w.into_vec()
}

pub fn decode_test_request(body: &[u8]) -> Option<TestRequest> {
	let mut r = Reader::new(body);
	Some(TestRequest { echo: r.u64()? })
}

pub fn encode_test_response(echo: u64) -> Vec<u8> {
	let mut w = Writer::new();
	w.u64(echo);
	w.into_vec()
}

/// `Map`: resolve a `/`-separated path, relative to `start` (the zero key
/// means the root), into a [`Key`] the caller can address directly over
/// the fast path from then on.
pub struct MapRequest {
	pub start: Key,
	pub path: std::ffi::OsString,
}

pub fn encode_map_request(req: &MapRequest) -> Vec<u8> {
	use std::os::unix::ffi::OsStrExt;
	let mut w = Writer::new();
	write_key(&mut w, req.start);
	w.bytes(req.path.as_bytes());
	w.into_vec()
}

pub fn decode_map_request(body: &[u8]) -> Option<MapRequest> {
	use std::os::unix::ffi::OsStrExt;
	let mut r = Reader::new(body);
	let start = read_key(&mut r)?;
	let path = std::ffi::OsStr::from_bytes(r.rest()).to_os_string();
	Some(MapRequest { start, path })
}

pub fn encode_map_response(key: Key) -> Vec<u8> {
	let mut w = Writer::new();
	write_key(&mut w, key);
	w.into_vec()
}

pub fn decode_map_response(body: &[u8]) -> Option<Key> {
	read_key(&mut Reader::new(body))
}

/// `MapRelease`: drop the lookup claim a prior `Map` call placed on `key`.
pub struct MapReleaseRequest {
	pub key: Key,
}

pub fn encode_map_release_request(req: &MapReleaseRequest) -> Vec<u8> {
	let mut w = Writer::new();
	write_key(&mut w, req.key);
	w.into_vec()
}

pub fn decode_map_release_request(body: &[u8]) -> Option<MapReleaseRequest> {
	let mut r = Reader::new(body);
	Some(MapReleaseRequest { key: read_key(&mut r)? })
}

/// A request naming a parent directory (by key) and a child name, shared by
/// `Lookup`, `Mkdir`, `Create`, `Unlink`, and `Rmdir`.
pub struct NamedChildRequest {
	pub parent: Key,
	pub name: std::ffi::OsString,
	pub mode: u32,
}

pub fn encode_named_child_request(req: &NamedChildRequest) -> Vec<u8> {
	use std::os::unix::ffi::OsStrExt;
	let mut w = Writer::new();
	write_key(&mut w, req.parent);
	w.u32(req.mode);
	w.bytes(req.name.as_bytes());
	w.into_vec()
}

pub fn decode_named_child_request(body: &[u8]) -> Option<NamedChildRequest> {
	use std::os::unix::ffi::OsStrExt;
	let mut r = Reader::new(body);
	let parent = read_key(&mut r)?;
	let mode = r.u32()?;
	let name = std::ffi::OsStr::from_bytes(r.rest()).to_os_string();
	Some(NamedChildRequest { parent, name, mode })
}

/// A request naming only a key, shared by `GetAttr`, `Readlink`, `Open`,
/// and `Release`.
pub struct KeyRequest {
	pub key: Key,
	pub flags: u32,
}

pub fn encode_key_request(req: &KeyRequest) -> Vec<u8> {
	let mut w = Writer::new();
	write_key(&mut w, req.key);
	w.u32(req.flags);
	w.into_vec()
}

pub fn decode_key_request(body: &[u8]) -> Option<KeyRequest> {
	let mut r = Reader::new(body);
	let key = read_key(&mut r)?;
	let flags = r.u32().unwrap_or(0);
	Some(KeyRequest { key, flags })
}

/// `SetAttr`: the subset of attribute fields the FUSE dispatcher's
/// `apply_setattr` accepts, addressed by key instead of node id.
pub struct SetAttrRequest {
	pub key: Key,
	pub valid: u32,
	pub size: u64,
	pub mode: u32,
	pub user_id: u32,
	pub group_id: u32,
}

pub fn encode_setattr_request(req: &SetAttrRequest) -> Vec<u8> {
	let mut w = Writer::new();
	write_key(&mut w, req.key);
	w.u32(req.valid).u64(req.size).u32(req.mode).u32(req.user_id).u32(req.group_id);
	w.into_vec()
}

pub fn decode_setattr_request(body: &[u8]) -> Option<SetAttrRequest> {
	let mut r = Reader::new(body);
	let key = read_key(&mut r)?;
	let valid = r.u32()?;
	let size = r.u64()?;
	let mode = r.u32()?;
	let user_id = r.u32()?;
	let group_id = r.u32()?;
	Some(SetAttrRequest { key, valid, size, mode, user_id, group_id })
}

/// `Read`: `key` plus a byte range.
pub struct ReadRequest {
	pub key: Key,
	pub offset: u64,
	pub size: u32,
}

pub fn encode_read_request(req: &ReadRequest) -> Vec<u8> {
	let mut w = Writer::new();
	write_key(&mut w, req.key);
	w.u64(req.offset).u32(req.size);
	w.into_vec()
}

pub fn decode_read_request(body: &[u8]) -> Option<ReadRequest> {
	let mut r = Reader::new(body);
	let key = read_key(&mut r)?;
	let offset = r.u64()?;
	let size = r.u32()?;
	Some(ReadRequest { key, offset, size })
}

/// `Write`: `key`, an offset, and the bytes to write (the remainder of the
/// slot's payload).
pub struct WriteRequest {
	pub key: Key,
	pub offset: u64,
	pub data: Vec<u8>,
}

pub fn encode_write_request(req: &WriteRequest) -> Vec<u8> {
	let mut w = Writer::new();
	write_key(&mut w, req.key);
	w.u64(req.offset);
	w.bytes(&req.data);
	w.into_vec()
}

pub fn decode_write_request(body: &[u8]) -> Option<WriteRequest> {
	let mut r = Reader::new(body);
	let key = read_key(&mut r)?;
	let offset = r.u64()?;
	let data = r.rest().to_vec();
	Some(WriteRequest { key, offset, data })
}

pub fn encode_write_response(written: u32) -> Vec<u8> {
	let mut w = Writer::new();
	w.u32(written);
	w.into_vec()
}

pub fn decode_write_response(body: &[u8]) -> Option<u32> {
	Reader::new(body).u32()
}

/// One (name, `calls`/`success`/`failure`/`elapsed_ns`) row in a
/// `ServerStat` response.
pub struct StatRow {
	pub name: String,
	pub calls: u64,
	pub success: u64,
	pub failure: u64,
	pub elapsed_ns: u64,
}

pub fn encode_server_stat_response(rows: &[StatRow]) -> Vec<u8> {
	let mut w = Writer::new();
	w.u32(rows.len() as u32);
	for row in rows {
		let name = row.name.as_bytes();
		w.u32(name.len() as u32);
		w.bytes(name);
		w.u64(row.calls).u64(row.success).u64(row.failure).u64(row.elapsed_ns);
	}
	w.into_vec()
}

pub fn decode_server_stat_response(body: &[u8]) -> Option<Vec<StatRow>> {
	let mut r = Reader::new(body);
	let count = r.u32()?;
	let mut rows = Vec::with_capacity(count as usize);
	for _ in 0..count {
		let name_len = r.u32()? as usize;
		let name = String::from_utf8(r.bytes(name_len)?.to_vec()).ok()?;
		let calls = r.u64()?;
		let success = r.u64()?;
		let failure = r.u64()?;
		let elapsed_ns = r.u64()?;
		rows.push(StatRow { name, calls, success, failure, elapsed_ns });
	}
	Some(rows)
}

#[cfg(test)]
mod message_test;
