//! The error type returned by internal `bitbucket` operations.
//!
//! These variants mirror the POSIX error kinds the filesystem can surface to
//! the kernel; they are converted to [`fuse::Error`] at the dispatcher seam
//! rather than carried across the FUSE wire directly.

use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
	#[error("no such file or directory")]
	NotFound,

	#[error("file exists")]
	Exists,

	#[error("not a directory")]
	NotADirectory,

	#[error("is a directory")]
	IsADirectory,

	#[error("directory not empty")]
	NotEmpty,

	#[error("invalid argument")]
	InvalidArgument,

	#[error("bad file descriptor")]
	BadDescriptor,

	#[error("operation would block")]
	WouldBlock,

	#[error("cannot allocate memory")]
	NoMemory,

	#[error("no data available")]
	NoData,

	#[error("operation not supported")]
	NotSupported,

	#[error("value too large")]
	Overflow,

	#[error("read-only file system")]
	ReadOnly,
}

impl Error {
	/// Returns the `linux-errno` value this error kind maps to.
	#[must_use]
	pub fn to_errno(self) -> linux_errno::Error {
		match self {
			Error::NotFound => linux_errno::ENOENT,
			Error::Exists => linux_errno::EEXIST,
			Error::NotADirectory => linux_errno::ENOTDIR,
			Error::IsADirectory => linux_errno::EISDIR,
			Error::NotEmpty => linux_errno::ENOTEMPTY,
			Error::InvalidArgument => linux_errno::EINVAL,
			Error::BadDescriptor => linux_errno::EBADF,
			Error::WouldBlock => linux_errno::EWOULDBLOCK,
			Error::NoMemory => linux_errno::ENOMEM,
			Error::NoData => linux_errno::ENODATA,
			Error::NotSupported => linux_errno::ENOSYS,
			Error::Overflow => linux_errno::EOVERFLOW,
			Error::ReadOnly => linux_errno::EROFS,
		}
	}
}

impl From<Error> for fuse::Error {
	fn from(err: Error) -> fuse::Error {
		fuse::Error::from(err.to_errno())
	}
}

pub type Result<T> = core::result::Result<T, Error>;
