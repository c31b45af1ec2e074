//! The whole-file advisory lock manager (`flock`).
//!
//! Grounded on `finesse/bitbucket/flock.c`. Each regular-file inode owns one
//! [`LockState`], guarded by the same lock as everything else on the inode
//! (`Inode::lock_state` sits behind its own `RwLock` here only because the
//! inode's attribute lock and its lock-manager state are logically separate
//! concerns; callers that need both take them in attr-then-lock order).
//!
//! Unlike the C source, the four counters (`Readers`, `Writers`,
//! `WaitingReaders`, `WaitingWriters`) are not maintained as separately
//! updated fields — they are derived from the length of the owner/waiter
//! queues, which makes the desync bugs the original has to guard against
//! with `assert()` structurally impossible here.

use std::collections::VecDeque;

use fuse::lock::ProcessId;

use crate::error::{Error, Result};

/// Whether a lock request blocks the caller until it can be granted, or
/// fails immediately with [`Error::WouldBlock`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Blocking {
	Block,
	NonBlock,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Record {
	owner: ProcessId,
	exclusive: bool,
}

/// One file's flock state: who currently holds the lock, and who is queued
/// waiting for it.
pub struct LockState {
	owners: VecDeque<Record>,
	waiters: VecDeque<Record>,
}

impl LockState {
	#[must_use]
	pub fn new() -> LockState {
		LockState {
			owners: VecDeque::new(),
			waiters: VecDeque::new(),
		}
	}

	#[must_use]
	pub fn readers(&self) -> usize {
		self.owners.iter().filter(|r| !r.exclusive).count()
	}

	#[must_use]
	pub fn writers(&self) -> usize {
		self.owners.iter().filter(|r| r.exclusive).count()
	}

	#[must_use]
	pub fn waiting_readers(&self) -> usize {
		self.waiters.iter().filter(|r| !r.exclusive).count()
	}

	#[must_use]
	pub fn waiting_writers(&self) -> usize {
		self.waiters.iter().filter(|r| r.exclusive).count()
	}

	/// Attempts to grant a shared lock, queuing it if blocking and
	/// unavailable.
	///
	/// Returns `Ok(true)` if granted immediately, `Ok(false)` if queued.
	pub fn lock_shared(&mut self, owner: ProcessId, blocking: Blocking) -> Result<bool> {
		if self.writers() > 0 || self.waiting_writers() > 0 {
			return match blocking {
				Blocking::NonBlock => Err(Error::WouldBlock),
				Blocking::Block => {
					self.waiters.push_back(Record { owner, exclusive: false });
					Ok(false)
				},
			};
		}
		self.owners.push_back(Record { owner, exclusive: false });
		Ok(true)
	}

	/// Attempts to grant an exclusive lock, queuing it if blocking and
	/// unavailable. Blocking exclusive requests must wait behind any
	/// currently-queued waiter (shared or exclusive) to preserve fairness;
	/// non-blocking requests only check current owners, matching the C
	/// source's `LOCK_NB | LOCK_EX` arm exactly.
	pub fn lock_exclusive(&mut self, owner: ProcessId, blocking: Blocking) -> Result<bool> {
		let blocked = match blocking {
			Blocking::Block => {
				self.readers() > 0
					|| self.writers() > 0
					|| self.waiting_writers() > 0
					|| self.waiting_readers() > 0
			},
			Blocking::NonBlock => self.writers() > 0 || self.readers() > 0,
		};
		if blocked {
			return match blocking {
				Blocking::NonBlock => Err(Error::WouldBlock),
				Blocking::Block => {
					self.waiters.push_back(Record { owner, exclusive: true });
					Ok(false)
				},
			};
		}
		self.owners.push_back(Record { owner, exclusive: true });
		Ok(true)
	}

	/// Releases every lock record owned by `owner`, then drains as many
	/// waiters as the shared-grant-batch wake policy allows.
	///
	/// Returns the list of waiter owners granted by this unlock, in the
	/// order they should be replied to: the caller is responsible for
	/// mapping each back to its blocked reply handle.
	pub fn unlock(&mut self, owner: ProcessId) -> Result<Vec<ProcessId>> {
		let before = self.owners.len();
		self.owners.retain(|r| r.owner != owner);
		if self.owners.len() == before {
			return Err(Error::InvalidArgument);
		}
		Ok(self.drain_waiters())
	}

	/// Forced cleanup on file teardown: every waiter is abandoned (the
	/// caller replies `EBADF` to each), and the owners list is asserted
	/// empty, matching `bitbucket_cleanup_flock`.
	pub fn force_cleanup(&mut self) -> Vec<ProcessId> {
		let abandoned: Vec<ProcessId> = self.waiters.drain(..).map(|r| r.owner).collect();
		assert!(self.owners.is_empty(), "flock cleanup with live owners remaining");
		abandoned
	}

	fn drain_waiters(&mut self) -> Vec<ProcessId> {
		let mut granted = Vec::new();
		loop {
			let Some(head) = self.waiters.front().copied() else { break };
			if head.exclusive {
				if self.readers() + self.writers() == 0 {
					self.waiters.pop_front();
					self.owners.push_back(head);
					granted.push(head.owner);
				}
				break;
			}
			// Grant every contiguous shared waiter from the head, stopping
			// at the first exclusive waiter so it is never starved.
			self.waiters.pop_front();
			self.owners.push_back(head);
			granted.push(head.owner);
		}
		granted
	}
}

impl Default for LockState {
	fn default() -> LockState {
		LockState::new()
	}
}

#[cfg(test)]
mod lock_test;
