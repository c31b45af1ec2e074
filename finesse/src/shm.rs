//! The shared-memory message channel: a `shm_open`/`mmap`-backed region
//! holding a fixed slot table, a per-direction bitmap of which slots carry
//! pending work, and a `PTHREAD_PROCESS_SHARED` mutex/condvar pair guarding
//! each bitmap.
//!
//! Grounded on `finesse/include/fincomm.h`'s `fincomm_shared_memory_region`
//! and `fincomm_message_block`: a header (signature, peer ids, the two
//! bitmaps, their mutex/condvar pairs, an allocation bitmap and hint, a
//! monotonic request-id counter, a shutdown flag) followed by a fixed table
//! of fixed-size message slots. The original lays the header out to land on
//! exactly one 4 KiB page so the slot table that follows stays page-aligned;
//! this crate's region is mapped and owned entirely by this crate's own
//! binary on both ends (`bitbucketd` and whatever links `finesse` as a
//! client library), so there is no second implementation to byte-match
//! against, and the header is left at its natural `repr(C)` size instead of
//! being hand-padded to 4 KiB. `libc`'s raw `shm_open`/`mmap`/`pthread_*`
//! calls are the one seam in this crate where `unsafe` is unavoidable and
//! idiomatic, in the same spirit as `fuse-linux`'s raw `mount(2)` wrapper.

use std::ffi::CString;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::error::{Error, Result};

/// Number of message slots in a region.
pub const SLOT_COUNT: usize = 64;

/// Fixed size of one message slot's payload, chosen so the whole slot
/// (header plus payload) fits in one page.
pub const SLOT_DATA_LEN: usize = 4096 - 16;

const SIGNATURE: [u8; 8] = *b"FINESSE\0";

/// The fixed-layout header of one message slot: which request it carries,
/// the result code once answered, and the message tag identifying how to
/// interpret the payload that follows.
#[repr(C)]
pub struct SlotHeader {
	pub request_id: u64,
	pub result: i32,
	pub tag: u32,
}

#[repr(C)]
pub struct Slot {
	pub header: SlotHeader,
	pub data: [u8; SLOT_DATA_LEN],
}

#[repr(C)]
struct RegionHeader {
	signature: [u8; 8],
	client_id: u64,
	server_id: u64,

	request_bitmap: AtomicU64,
	request_mutex: libc::pthread_mutex_t,
	request_cond: libc::pthread_cond_t,

	response_bitmap: AtomicU64,
	response_mutex: libc::pthread_mutex_t,
	response_cond: libc::pthread_cond_t,

	allocation_bitmap: AtomicU64,
	alloc_hint: AtomicU32,
	request_scan_hint: AtomicU32,
	next_request_id: AtomicU64,
	shutdown: AtomicU32,
}

#[repr(C)]
struct Region {
	header: RegionHeader,
	slots: [Slot; SLOT_COUNT],
}

fn region_size() -> usize {
	std::mem::size_of::<Region>()
}

unsafe fn init_process_shared_mutex(mutex: *mut libc::pthread_mutex_t) -> Result<()> {
	let mut attr: libc::pthread_mutexattr_t = std::mem::zeroed();
	if libc::pthread_mutexattr_init(&mut attr) != 0 {
		return Err(Error::last_errno());
	}
	libc::pthread_mutexattr_setpshared(&mut attr, libc::PTHREAD_PROCESS_SHARED);
	let rc = libc::pthread_mutex_init(mutex, &attr);
	libc::pthread_mutexattr_destroy(&mut attr);
	if rc != 0 {
		return Err(Error::Errno(rc));
	}
	Ok(())
}

unsafe fn init_process_shared_cond(cond: *mut libc::pthread_cond_t) -> Result<()> {
	let mut attr: libc::pthread_condattr_t = std::mem::zeroed();
	if libc::pthread_condattr_init(&mut attr) != 0 {
		return Err(Error::last_errno());
	}
	libc::pthread_condattr_setpshared(&mut attr, libc::PTHREAD_PROCESS_SHARED);
	let rc = libc::pthread_cond_init(cond, &attr);
	libc::pthread_condattr_destroy(&mut attr);
	if rc != 0 {
		return Err(Error::Errno(rc));
	}
	Ok(())
}

/// Which side of the channel is waiting: the server blocks on
/// `request_{mutex,cond}` for work to arrive; a client blocks on
/// `response_{mutex,cond}` for its slot to be answered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Direction {
	Request,
	Response,
}

/// A mapped shared-memory region, owned either by creating it (the server,
/// at mount time) or by attaching to one a peer already created (a client,
/// during the handshake in [`crate::handshake`]).
pub struct Channel {
	ptr: *mut Region,
	name: CString,
	owner: bool,
}

// The region is deliberately shared across threads and processes; every
// access to its fields goes through an atomic or a `PTHREAD_PROCESS_SHARED`
// lock, so handing the pointer across thread boundaries inside this
// process is sound.
unsafe impl Send for Channel {}
unsafe impl Sync for Channel {}

impl Channel {
	/// Creates and initializes a new region under `/dev/shm/<name>`. Called
	/// once by the server when a client's handshake asks for a fresh
	/// channel.
	pub fn create(name: &str, client_id: u64, server_id: u64) -> Result<Channel> {
		let cname = CString::new(name).map_err(|_| Error::MalformedMessage)?;
		let size = region_size();

		// SAFETY: `shm_open`/`ftruncate`/`mmap`/`close` are used exactly as
		// documented by POSIX; the fd is closed immediately after mapping,
		// since the mapping keeps the object alive.
		unsafe {
			let fd = libc::shm_open(
				cname.as_ptr(),
				libc::O_CREAT | libc::O_EXCL | libc::O_RDWR,
				0o600,
			);
			if fd < 0 {
				return Err(Error::last_errno());
			}
			if libc::ftruncate(fd, size as libc::off_t) != 0 {
				let err = Error::last_errno();
				libc::close(fd);
				let _ = libc::shm_unlink(cname.as_ptr());
				return Err(err);
			}
			let map = libc::mmap(
				std::ptr::null_mut(),
				size,
				libc::PROT_READ | libc::PROT_WRITE,
				libc::MAP_SHARED,
				fd,
				0,
			);
			libc::close(fd);
			if map == libc::MAP_FAILED {
				let err = Error::last_errno();
				let _ = libc::shm_unlink(cname.as_ptr());
				return Err(err);
			}

			let region = map.cast::<Region>();
			std::ptr::write_bytes(region.cast::<u8>(), 0, size);

			let header = std::ptr::addr_of_mut!((*region).header);
			std::ptr::write(std::ptr::addr_of_mut!((*header).signature), SIGNATURE);
			std::ptr::write(std::ptr::addr_of_mut!((*header).client_id), client_id);
			std::ptr::write(std::ptr::addr_of_mut!((*header).server_id), server_id);

			if let Err(e) = init_process_shared_mutex(std::ptr::addr_of_mut!((*header).request_mutex)) {
				libc::munmap(map, size);
				let _ = libc::shm_unlink(cname.as_ptr());
				return Err(e);
			}
			if let Err(e) = init_process_shared_cond(std::ptr::addr_of_mut!((*header).request_cond)) {
				libc::munmap(map, size);
				let _ = libc::shm_unlink(cname.as_ptr());
				return Err(e);
			}
			if let Err(e) = init_process_shared_mutex(std::ptr::addr_of_mut!((*header).response_mutex)) {
				libc::munmap(map, size);
				let _ = libc::shm_unlink(cname.as_ptr());
				return Err(e);
			}
			if let Err(e) = init_process_shared_cond(std::ptr::addr_of_mut!((*header).response_cond)) {
				libc::munmap(map, size);
				let _ = libc::shm_unlink(cname.as_ptr());
				return Err(e);
			}

			Ok(Channel { ptr: region, name: cname, owner: true })
		}
	}

	/// Attaches to a region a peer already created.
	pub fn open(name: &str) -> Result<Channel> {
		let cname = CString::new(name).map_err(|_| Error::MalformedMessage)?;
		let size = region_size();

		// SAFETY: same POSIX contract as `create`, without initializing
		// the header — it was already initialized by whoever created it.
		unsafe {
			let fd = libc::shm_open(cname.as_ptr(), libc::O_RDWR, 0o600);
			if fd < 0 {
				return Err(Error::last_errno());
			}
			let map = libc::mmap(
				std::ptr::null_mut(),
				size,
				libc::PROT_READ | libc::PROT_WRITE,
				libc::MAP_SHARED,
				fd,
				0,
			);
			libc::close(fd);
			if map == libc::MAP_FAILED {
				return Err(Error::last_errno());
			}
			Ok(Channel { ptr: map.cast::<Region>(), name: cname, owner: false })
		}
	}

	fn header(&self) -> *mut RegionHeader {
		unsafe { std::ptr::addr_of_mut!((*self.ptr).header) }
	}

	fn slot_ptr(&self, index: u32) -> *mut Slot {
		unsafe { std::ptr::addr_of_mut!((*self.ptr).slots[index as usize]) }
	}

	/// Reads one slot's header and payload by copying it out, so the caller
	/// never holds a reference into memory another process can concurrently
	/// write.
	pub fn read_slot(&self, index: u32) -> (u64, i32, u32, Vec<u8>) {
		unsafe {
			let slot = self.slot_ptr(index);
			let request_id = std::ptr::read(std::ptr::addr_of!((*slot).header.request_id));
			let result = std::ptr::read(std::ptr::addr_of!((*slot).header.result));
			let tag = std::ptr::read(std::ptr::addr_of!((*slot).header.tag));
			let data = (*slot).data.to_vec();
			(request_id, result, tag, data)
		}
	}

	/// Writes one slot's header and payload.
	pub fn write_slot(&self, index: u32, request_id: u64, result: i32, tag: u32, payload: &[u8]) {
		assert!(payload.len() <= SLOT_DATA_LEN, "finesse message payload exceeds one slot");
		unsafe {
			let slot = self.slot_ptr(index);
			std::ptr::write(std::ptr::addr_of_mut!((*slot).header.request_id), request_id);
			std::ptr::write(std::ptr::addr_of_mut!((*slot).header.result), result);
			std::ptr::write(std::ptr::addr_of_mut!((*slot).header.tag), tag);
			std::ptr::write_bytes(std::ptr::addr_of_mut!((*slot).data).cast::<u8>(), 0, SLOT_DATA_LEN);
			let dst = std::slice::from_raw_parts_mut(std::ptr::addr_of_mut!((*slot).data).cast::<u8>(), payload.len());
			dst.copy_from_slice(payload);
		}
	}

	fn allocation_bitmap(&self) -> &AtomicU64 {
		unsafe { &(*self.header()).allocation_bitmap }
	}

	fn alloc_hint(&self) -> &AtomicU32 {
		unsafe { &(*self.header()).alloc_hint }
	}

	/// Claims a free slot, starting the search from the last successful
	/// allocation (`alloc_hint`) the way the original's
	/// `FinesseFindFreeIndexAndInsertMessage` does, to spread allocations
	/// across the table rather than always contending on slot zero.
	pub fn allocate(&self) -> Result<u32> {
		let hint = self.alloc_hint().load(Ordering::Relaxed) as usize % SLOT_COUNT;
		let bitmap = self.allocation_bitmap();
		for offset in 0..SLOT_COUNT {
			let index = (hint + offset) % SLOT_COUNT;
			let bit = 1u64 << index;
			let previous = bitmap.fetch_or(bit, Ordering::AcqRel);
			if previous & bit == 0 {
				self.alloc_hint().store(((index + 1) % SLOT_COUNT) as u32, Ordering::Relaxed);
				return Ok(index as u32);
			}
		}
		Err(Error::SlotExhausted)
	}

	pub fn free(&self, index: u32) {
		let bit = 1u64 << index;
		self.allocation_bitmap().fetch_and(!bit, Ordering::AcqRel);
	}

	pub fn next_request_id(&self) -> u64 {
		unsafe { (*self.header()).next_request_id.fetch_add(1, Ordering::AcqRel).max(1) }
	}

	fn lock(&self, direction: Direction) {
		unsafe {
			let header = self.header();
			let mutex = match direction {
				Direction::Request => std::ptr::addr_of_mut!((*header).request_mutex),
				Direction::Response => std::ptr::addr_of_mut!((*header).response_mutex),
			};
			libc::pthread_mutex_lock(mutex);
		}
	}

	fn unlock(&self, direction: Direction) {
		unsafe {
			let header = self.header();
			let mutex = match direction {
				Direction::Request => std::ptr::addr_of_mut!((*header).request_mutex),
				Direction::Response => std::ptr::addr_of_mut!((*header).response_mutex),
			};
			libc::pthread_mutex_unlock(mutex);
		}
	}

	fn broadcast(&self, direction: Direction) {
		unsafe {
			let header = self.header();
			let cond = match direction {
				Direction::Request => std::ptr::addr_of_mut!((*header).request_cond),
				Direction::Response => std::ptr::addr_of_mut!((*header).response_cond),
			};
			libc::pthread_cond_broadcast(cond);
		}
	}

	fn bitmap(&self, direction: Direction) -> &AtomicU64 {
		unsafe {
			let header = self.header();
			match direction {
				Direction::Request => &(*header).request_bitmap,
				Direction::Response => &(*header).response_bitmap,
			}
		}
	}

	fn is_shutdown(&self) -> bool {
		unsafe { (*self.header()).shutdown.load(Ordering::Acquire) != 0 }
	}

	fn request_scan_hint(&self) -> &AtomicU32 {
		unsafe { &(*self.header()).request_scan_hint }
	}

	/// Picks the lowest set bit at or after `hint`, wrapping around the
	/// bitmap's width instead of always starting from bit 0. Rotating the
	/// bitmap so `hint` lands on bit 0 turns the circular scan into a single
	/// `trailing_zeros` call.
	fn scan_from(bits: u64, hint: usize) -> u32 {
		let rotated = bits.rotate_right(hint as u32);
		let index = rotated.trailing_zeros() as usize;
		((index + hint) % SLOT_COUNT) as u32
	}

	/// Marks `index` pending in `direction`'s bitmap and wakes one waiter.
	fn publish(&self, direction: Direction, index: u32) {
		self.lock(direction);
		self.bitmap(direction).fetch_or(1u64 << index, Ordering::AcqRel);
		self.broadcast(direction);
		self.unlock(direction);
	}

	/// Marks a request slot ready for the server to pick up.
	pub fn publish_request(&self, index: u32) {
		self.publish(Direction::Request, index);
	}

	/// Marks a response slot ready for the waiting client to pick up.
	pub fn publish_response(&self, index: u32) {
		self.publish(Direction::Response, index);
	}

	/// Blocks until some request slot is pending, clears its bit, and
	/// returns its index. Returns `None` once shutdown has been signaled
	/// and no request remains pending.
	///
	/// The scan starts from `request_scan_hint` rather than always from bit
	/// 0, the same way `allocate` rotates through `alloc_hint`, so a run of
	/// low-index slots can't starve the higher ones out under sustained
	/// load.
	pub fn wait_for_request(&self) -> Option<u32> {
		self.lock(Direction::Request);
		loop {
			let bits = self.bitmap(Direction::Request).load(Ordering::Acquire);
			if bits != 0 {
				let hint = self.request_scan_hint().load(Ordering::Relaxed) as usize % SLOT_COUNT;
				let index = Self::scan_from(bits, hint);
				self.bitmap(Direction::Request).fetch_and(!(1u64 << index), Ordering::AcqRel);
				self.request_scan_hint().store((index + 1) % (SLOT_COUNT as u32), Ordering::Relaxed);
				self.unlock(Direction::Request);
				return Some(index);
			}
			if self.is_shutdown() {
				self.unlock(Direction::Request);
				return None;
			}
			unsafe {
				let header = self.header();
				libc::pthread_cond_wait(
					std::ptr::addr_of_mut!((*header).request_cond),
					std::ptr::addr_of_mut!((*header).request_mutex),
				);
			}
		}
	}

	/// Blocks until `index`'s response bit is set, then clears it.
	pub fn wait_for_response(&self, index: u32) -> Result<()> {
		self.lock(Direction::Response);
		let bit = 1u64 << index;
		loop {
			let bits = self.bitmap(Direction::Response).load(Ordering::Acquire);
			if bits & bit != 0 {
				self.bitmap(Direction::Response).fetch_and(!bit, Ordering::AcqRel);
				self.unlock(Direction::Response);
				return Ok(());
			}
			if self.is_shutdown() {
				self.unlock(Direction::Response);
				return Err(Error::ShutdownInProgress);
			}
			unsafe {
				let header = self.header();
				libc::pthread_cond_wait(
					std::ptr::addr_of_mut!((*header).response_cond),
					std::ptr::addr_of_mut!((*header).response_mutex),
				);
			}
		}
	}

	/// Sets the shutdown flag and wakes every waiter on both condvars so
	/// blocked clients and the server's receive loop unwind promptly.
	pub fn signal_shutdown(&self) {
		unsafe {
			(*self.header()).shutdown.store(1, Ordering::Release);
		}
		self.lock(Direction::Request);
		self.broadcast(Direction::Request);
		self.unlock(Direction::Request);
		self.lock(Direction::Response);
		self.broadcast(Direction::Response);
		self.unlock(Direction::Response);
	}
}

impl Drop for Channel {
	fn drop(&mut self) {
		unsafe {
			libc::munmap(self.ptr.cast(), region_size());
			if self.owner {
				let _ = libc::shm_unlink(self.name.as_ptr());
			}
		}
	}
}

#[cfg(test)]
mod shm_test;
