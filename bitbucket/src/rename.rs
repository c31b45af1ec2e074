//! Directory entry rename, including `RENAME_NOREPLACE` and `RENAME_EXCHANGE`.
//!
//! Grounded on `finesse/bitbucket/rename.c`. The original's comment on this
//! file still applies: for a persistent filesystem, atomically renaming
//! across directories is one of the harder calls to get right; for an
//! in-memory one, the whole operation happens under the two directories'
//! entry-table locks and there's nothing else to coordinate with.

use std::ffi::OsStr;

use fuse::node;

use crate::error::{Error, Result};
use crate::inode::{check_name, Inode, RefClass, Store};

/// `RENAME_NOREPLACE`: fail instead of overwriting an existing `newname`.
pub const NOREPLACE: u32 = 1 << 0;
/// `RENAME_EXCHANGE`: atomically swap the two directory entries.
pub const EXCHANGE: u32 = 1 << 1;

/// Renames `name` in the directory `parent` to `newname` in the directory
/// `newparent`, honoring `flags`.
pub fn rename(
	store: &Store,
	parent: node::Id,
	name: &OsStr,
	newparent: node::Id,
	newname: &OsStr,
	flags: u32,
	verify_directories: bool,
) -> Result<()> {
	check_name(name)?;
	check_name(newname)?;

	let old_parent = store.lookup_by_id(parent).ok_or(Error::NotFound)?;
	let new_parent = store.lookup_by_id(newparent).ok_or(Error::NotFound)?;

	let old_dir = old_parent.as_directory().ok_or(Error::NotADirectory)?;
	let new_dir = new_parent.as_directory().ok_or(Error::NotADirectory)?;

	// Directories are locked old-then-new by the address of their Arc
	// allocation to avoid deadlocking against a concurrent rename of the
	// opposite direction, mirroring the original source's pointer-address
	// tie-break; when they are the same directory only one lock is taken.
	if old_parent.id() == new_parent.id() {
		let mut dir = old_dir.write().expect("directory lock poisoned");
		let result = rename_within(store, &mut dir, name, newname, flags);
		if verify_directories {
			crate::inode::verify_directory(&dir);
		}
		return result;
	}

	let old_addr = std::sync::Arc::as_ptr(&old_parent) as usize;
	let new_addr = std::sync::Arc::as_ptr(&new_parent) as usize;
	let (mut first, mut second, swapped) = if old_addr < new_addr {
		(
			old_dir.write().expect("directory lock poisoned"),
			new_dir.write().expect("directory lock poisoned"),
			false,
		)
	} else {
		(
			new_dir.write().expect("directory lock poisoned"),
			old_dir.write().expect("directory lock poisoned"),
			true,
		)
	};

	let (old, new) = if swapped {
		(&mut second, &mut first)
	} else {
		(&mut first, &mut second)
	};

	let result = rename_across(store, old, new, name, newname, flags);
	if verify_directories {
		crate::inode::verify_directory(old);
		crate::inode::verify_directory(new);
	}
	result
}

fn rename_within(
	store: &Store,
	dir: &mut std::collections::HashMap<std::ffi::OsString, std::sync::Arc<Inode>>,
	name: &OsStr,
	newname: &OsStr,
	flags: u32,
) -> Result<()> {
	if name == newname {
		if dir.contains_key(name) {
			return Ok(());
		}
		return Err(Error::NotFound);
	}

	let target = dir.get(name).cloned().ok_or(Error::NotFound)?;
	if target.id().is_root() {
		return Err(Error::InvalidArgument);
	}
	let existing = dir.get(newname).cloned();
	if existing.as_ref().is_some_and(|e| e.id().is_root()) {
		return Err(Error::InvalidArgument);
	}

	if flags & EXCHANGE != 0 {
		let existing = existing.ok_or(Error::NotFound)?;
		dir.insert(newname.to_os_string(), target);
		dir.insert(name.to_os_string(), existing);
		return Ok(());
	}

	apply_replace(store, dir, name, newname, target, existing, flags)
}

fn rename_across(
	store: &Store,
	old: &mut std::collections::HashMap<std::ffi::OsString, std::sync::Arc<Inode>>,
	new: &mut std::collections::HashMap<std::ffi::OsString, std::sync::Arc<Inode>>,
	name: &OsStr,
	newname: &OsStr,
	flags: u32,
) -> Result<()> {
	let target = old.get(name).cloned().ok_or(Error::NotFound)?;
	if target.id().is_root() {
		return Err(Error::InvalidArgument);
	}
	let existing = new.get(newname).cloned();
	if existing.as_ref().is_some_and(|e| e.id().is_root()) {
		return Err(Error::InvalidArgument);
	}

	if flags & EXCHANGE != 0 {
		let existing = existing.ok_or(Error::NotFound)?;
		new.insert(newname.to_os_string(), target);
		old.insert(name.to_os_string(), existing);
		return Ok(());
	}

	if let Some(existing) = &existing {
		if flags & NOREPLACE != 0 {
			return Err(Error::Exists);
		}
		if let Some(existing_dir) = existing.as_directory() {
			if !existing_dir.read().expect("directory lock poisoned").is_empty() {
				return Err(Error::NotEmpty);
			}
		}
	}

	new.insert(newname.to_os_string(), target);
	old.remove(name);
	if let Some(existing) = existing {
		store.release(&existing, RefClass::Lookup, 1);
	}
	Ok(())
}

fn apply_replace(
	store: &Store,
	dir: &mut std::collections::HashMap<std::ffi::OsString, std::sync::Arc<Inode>>,
	name: &OsStr,
	newname: &OsStr,
	target: std::sync::Arc<Inode>,
	existing: Option<std::sync::Arc<Inode>>,
	flags: u32,
) -> Result<()> {
	if let Some(existing) = &existing {
		if flags & NOREPLACE != 0 {
			return Err(Error::Exists);
		}
		if let Some(existing_dir) = existing.as_directory() {
			if !existing_dir.read().expect("directory lock poisoned").is_empty() {
				return Err(Error::NotEmpty);
			}
		}
	}

	dir.insert(newname.to_os_string(), target);
	dir.remove(name);
	if let Some(existing) = existing {
		store.release(&existing, RefClass::Lookup, 1);
	}
	Ok(())
}

#[cfg(test)]
mod rename_test;
