//! The inode store: id/key lookup, two-class reference counting, and the
//! directory/xattr/file-data payloads attached to each inode.
//!
//! Grounded on `finesse/bitbucket/bitbucket.c` and the teacher's
//! `fuse-vfs::NodeMap`, generalizing the latter's single `HashMap` guarded by
//! one mutex into a sharded table with two independent reference classes.

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use fuse::node;

use crate::error::{Error, Result};
use crate::lock::LockState;

/// Which reference class is being adjusted. See §3 of the data model: lookup
/// references are held by in-process handles, kernel-visible references are
/// held by the FUSE kernel driver and cleared by `forget`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RefClass {
	Lookup,
	Kernel,
}

/// An opaque 128-bit identity distinct from the node id, used by the
/// finesse channel so clients can address an inode without learning its
/// kernel-visible integer id.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Key(pub u128);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
	Directory,
	Regular,
	Symlink,
}

pub enum Payload {
	Directory(RwLock<HashMap<OsString, Arc<Inode>>>),
	Regular(RwLock<Vec<u8>>),
	Symlink(OsString),
}

/// A single filesystem object.
///
/// The two reference counters are plain `AtomicU64`s rather than fields
/// behind the same lock as the rest of the inode: incrementing a lookup or
/// kernel reference never needs to observe or change the inode's attributes,
/// so giving them independent atomics avoids taking the attribute lock on
/// the hot `lookup`/`forget` path.
pub struct Inode {
	id: node::Id,
	key: Key,
	epoch: u64,
	lookup_refs: AtomicU64,
	kernel_refs: AtomicU64,
	kind: Kind,
	attr: RwLock<Attr>,
	xattrs: RwLock<HashMap<OsString, Vec<u8>>>,
	pub(crate) payload: Payload,
	pub(crate) lock_state: RwLock<LockState>,
}

/// The mutable POSIX-stat-like fields carried by every inode, independent of
/// its variant payload.
pub struct Attr {
	pub mode: node::Mode,
	pub size: u64,
	pub block_size: u32,
	pub link_count: u32,
	pub user_id: u32,
	pub group_id: u32,
	pub device_number: u32,
	pub atime: SystemTime,
	pub mtime: SystemTime,
	pub ctime: SystemTime,
}

impl Attr {
	pub(crate) fn new(kind: Kind, mode_bits: u32) -> Attr {
		let now = SystemTime::now();
		let file_type = match kind {
			Kind::Directory => node::Type::Directory,
			Kind::Regular => node::Type::Regular,
			Kind::Symlink => node::Type::Symlink,
		};
		Attr {
			mode: file_type.as_mode() | (mode_bits & 0o7777),
			size: 0,
			block_size: 4096,
			link_count: 1,
			user_id: 0,
			group_id: 0,
			device_number: 0,
			atime: now,
			mtime: now,
			ctime: now,
		}
	}

	pub fn block_count(&self) -> u64 {
		self.size.div_ceil(u64::from(self.block_size))
	}
}

impl Inode {
	#[must_use]
	pub fn id(&self) -> node::Id {
		self.id
	}

	#[must_use]
	pub fn key(&self) -> Key {
		self.key
	}

	#[must_use]
	pub fn epoch(&self) -> u64 {
		self.epoch
	}

	#[must_use]
	pub fn kind(&self) -> Kind {
		self.kind
	}

	pub fn attr(&self) -> std::sync::RwLockReadGuard<'_, Attr> {
		self.attr.read().expect("inode attr lock poisoned")
	}

	pub fn attr_mut(&self) -> std::sync::RwLockWriteGuard<'_, Attr> {
		self.attr.write().expect("inode attr lock poisoned")
	}

	pub fn xattrs(&self) -> std::sync::RwLockReadGuard<'_, HashMap<OsString, Vec<u8>>> {
		self.xattrs.read().expect("xattr lock poisoned")
	}

	pub fn xattrs_mut(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<OsString, Vec<u8>>> {
		self.xattrs.write().expect("xattr lock poisoned")
	}

	#[must_use]
	pub fn as_directory(&self) -> Option<&RwLock<HashMap<OsString, Arc<Inode>>>> {
		match &self.payload {
			Payload::Directory(dir) => Some(dir),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_file(&self) -> Option<&RwLock<Vec<u8>>> {
		match &self.payload {
			Payload::Regular(data) => Some(data),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_symlink(&self) -> Option<&OsStr> {
		match &self.payload {
			Payload::Symlink(target) => Some(target),
			_ => None,
		}
	}

	#[must_use]
	pub fn lookup_count(&self) -> u64 {
		self.lookup_refs.load(Ordering::Acquire)
	}

	#[must_use]
	pub fn kernel_count(&self) -> u64 {
		self.kernel_refs.load(Ordering::Acquire)
	}

	fn add_ref(&self, class: RefClass) {
		match class {
			RefClass::Lookup => self.lookup_refs.fetch_add(1, Ordering::AcqRel),
			RefClass::Kernel => self.kernel_refs.fetch_add(1, Ordering::AcqRel),
		};
	}

	/// Releases `count` references of `class`. Panics if more references are
	/// released than are held — a fatal invariant violation per §7, matching
	/// the original source's `assert()` on over-release.
	fn release_ref(&self, class: RefClass, count: u64) {
		let counter = match class {
			RefClass::Lookup => &self.lookup_refs,
			RefClass::Kernel => &self.kernel_refs,
		};
		let previous = counter.fetch_sub(count, Ordering::AcqRel);
		assert!(
			previous >= count,
			"released {count} references of a class with only {previous} held (inode {:?})",
			self.id,
		);
	}

	#[must_use]
	fn is_unreachable(&self) -> bool {
		self.lookup_count() == 0 && self.kernel_count() == 0
	}
}

struct Shard {
	by_id: RwLock<HashMap<node::Id, Arc<Inode>>>,
	by_key: RwLock<HashMap<Key, Arc<Inode>>>,
}

/// Sharded inode table: id- and key-keyed maps split across `bucket_count`
/// independently-locked shards, generalizing `fuse-vfs::NodeMap`'s single
/// `Mutex<HashMap<...>>` so unrelated inodes never contend for the same lock.
pub struct Store {
	shards: Vec<Shard>,
	bucket_count: u64,
	next_id: AtomicU64,
	next_key: AtomicU64,
	root: Arc<Inode>,
}

impl Store {
	#[must_use]
	pub fn new(bucket_count: u64) -> Store {
		let bucket_count = bucket_count.max(1);
		let mut shards = Vec::with_capacity(bucket_count as usize);
		for _ in 0..bucket_count {
			shards.push(Shard {
				by_id: RwLock::new(HashMap::new()),
				by_key: RwLock::new(HashMap::new()),
			});
		}

		let root = Arc::new(Inode {
			id: node::Id::ROOT,
			key: Key(0),
			epoch: 0,
			lookup_refs: AtomicU64::new(1),
			kernel_refs: AtomicU64::new(1),
			kind: Kind::Directory,
			attr: RwLock::new(Attr::new(Kind::Directory, 0o755)),
			xattrs: RwLock::new(HashMap::new()),
			payload: Payload::Directory(RwLock::new(HashMap::new())),
			lock_state: RwLock::new(LockState::new()),
		});

		let mut store = Store {
			shards,
			bucket_count,
			next_id: AtomicU64::new(node::Id::ROOT.get() + 1),
			next_key: AtomicU64::new(1),
			root: root.clone(),
		};
		store.insert(root);
		store
	}

	fn shard_for_id(&self, id: node::Id) -> &Shard {
		&self.shards[(id.get() % self.bucket_count) as usize]
	}

	fn shard_for_key(&self, key: Key) -> &Shard {
		&self.shards[((key.0 as u64) % self.bucket_count) as usize]
	}

	fn insert(&mut self, inode: Arc<Inode>) {
		let id = inode.id;
		let key = inode.key;
		{
			let shard = self.shard_for_id(id);
			shard.by_id.write().expect("inode table lock poisoned").insert(id, inode.clone());
		}
		let shard = self.shard_for_key(key);
		shard.by_key.write().expect("inode table lock poisoned").insert(key, inode);
	}

	#[must_use]
	pub fn root(&self) -> Arc<Inode> {
		self.root.add_ref(RefClass::Lookup);
		self.root.clone()
	}

	/// Allocates a fresh inode with one lookup reference and inserts it into
	/// the table.
	pub fn create(&self, kind: Kind, mode_bits: u32) -> Arc<Inode> {
		let payload = match kind {
			Kind::Directory => Payload::Directory(RwLock::new(HashMap::new())),
			Kind::Regular => Payload::Regular(RwLock::new(Vec::new())),
			Kind::Symlink => Payload::Symlink(OsString::new()),
		};
		self.create_with_payload(kind, mode_bits, payload)
	}

	/// Allocates a fresh symlink inode whose target is `target`, with one
	/// lookup reference, and inserts it into the table.
	pub fn create_symlink(&self, target: OsString) -> Arc<Inode> {
		self.create_with_payload(Kind::Symlink, 0o777, Payload::Symlink(target))
	}

	fn create_with_payload(&self, kind: Kind, mode_bits: u32, payload: Payload) -> Arc<Inode> {
		let id_bits = self.next_id.fetch_add(1, Ordering::AcqRel);
		let id = node::Id::new(id_bits).expect("node id counter overflowed u64");
		let key = Key(u128::from(self.next_key.fetch_add(1, Ordering::AcqRel)));

		let inode = Arc::new(Inode {
			id,
			key,
			epoch: 0,
			lookup_refs: AtomicU64::new(1),
			kernel_refs: AtomicU64::new(0),
			kind,
			attr: RwLock::new(Attr::new(kind, mode_bits)),
			xattrs: RwLock::new(HashMap::new()),
			payload,
			lock_state: RwLock::new(LockState::new()),
		});

		let shard = self.shard_for_id(id);
		shard.by_id.write().expect("inode table lock poisoned").insert(id, inode.clone());
		let shard = self.shard_for_key(key);
		shard.by_key.write().expect("inode table lock poisoned").insert(key, inode.clone());
		inode
	}

	/// The read lock is held across both the clone and the reference bump so
	/// that a concurrent [`Store::release`] on the same inode can never
	/// observe the refcount as zero in between: `release` takes the same
	/// shard's write lock around its own decrement-and-teardown, and a
	/// `RwLock` never grants a write guard while a read guard is alive.
	#[must_use]
	pub fn lookup_by_id(&self, id: node::Id) -> Option<Arc<Inode>> {
		if id.is_root() {
			return Some(self.root());
		}
		let shard = self.shard_for_id(id);
		let by_id = shard.by_id.read().expect("inode table lock poisoned");
		let inode = by_id.get(&id)?.clone();
		inode.add_ref(RefClass::Lookup);
		Some(inode)
	}

	/// See [`Store::lookup_by_id`] for why the read lock spans the add-ref.
	#[must_use]
	pub fn lookup_by_key(&self, key: Key) -> Option<Arc<Inode>> {
		let shard = self.shard_for_key(key);
		let by_key = shard.by_key.read().expect("inode table lock poisoned");
		let inode = by_key.get(&key)?.clone();
		inode.add_ref(RefClass::Lookup);
		Some(inode)
	}

	pub fn add_reference(&self, inode: &Arc<Inode>, class: RefClass) {
		inode.add_ref(class);
	}

	/// Releases references and tears the inode down once both counters
	/// reach zero.
	///
	/// The decrement, the unreachability check, and the table removal all
	/// happen under the id shard's and key shard's write locks (locked in
	/// that fixed order everywhere in this module, so no two calls can ever
	/// want them in the opposite order). Without this, a concurrent
	/// [`Store::lookup_by_id`]/[`Store::lookup_by_key`] could clone the
	/// `Arc` just before this decrement and add its own reference just
	/// after this teardown decided to remove the entry, leaving a caller
	/// holding a live-looking reference to an inode the table no longer
	/// tracks. Holding the same locks [`Store::lookup_by_id`]/
	/// [`Store::lookup_by_key`] hold while they clone-and-add-ref closes
	/// that window: the two critical sections can't interleave.
	pub fn release(&self, inode: &Arc<Inode>, class: RefClass, count: u64) {
		if inode.id.is_root() {
			inode.release_ref(class, count);
			return;
		}

		let id_shard = self.shard_for_id(inode.id);
		let key_shard = self.shard_for_key(inode.key);
		let mut by_id = id_shard.by_id.write().expect("inode table lock poisoned");
		let mut by_key = key_shard.by_key.write().expect("inode table lock poisoned");

		inode.release_ref(class, count);
		if inode.is_unreachable() {
			by_id.remove(&inode.id);
			by_key.remove(&inode.key);
		}
	}
}

pub fn check_name(name: &std::ffi::OsStr) -> Result<()> {
	if name.is_empty() {
		return Err(Error::InvalidArgument);
	}
	if name == "." || name == ".." {
		return Err(Error::InvalidArgument);
	}
	Ok(())
}

/// Walks a directory's entries and asserts internal consistency: no two
/// entries alias the same name, and every child is still carrying at least
/// the lookup reference this directory's entry accounts for. Gated behind
/// `Config::verify_directories` since it adds an O(entries) scan to every
/// mutation; a failure here means the in-memory model has been corrupted by
/// a bug elsewhere, not that a caller passed bad arguments, so it panics
/// rather than returning an error.
pub fn verify_directory(dir: &HashMap<OsString, Arc<Inode>>) {
	let mut seen = std::collections::HashSet::with_capacity(dir.len());
	for name in dir.keys() {
		assert!(seen.insert(name), "duplicate directory entry name: {name:?}");
	}
	for (name, child) in dir {
		assert!(
			child.lookup_count() >= 1,
			"directory entry {name:?} references an inode with no lookup reference"
		);
	}
}

#[cfg(test)]
mod inode_test;
