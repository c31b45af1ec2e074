//! The error type returned by the shared-memory channel and its handshake.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	#[error("no free slot available in the shared-memory region")]
	SlotExhausted,

	#[error("handshake refused by peer")]
	HandshakeRefused,

	#[error("another server is already bound to this socket")]
	AlreadyRunning,

	#[error("channel shutdown in progress")]
	ShutdownInProgress,

	#[error("malformed message")]
	MalformedMessage,

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error("libc call failed with errno {0}")]
	Errno(i32),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// Wraps the current value of `errno` as an [`Error::Errno`].
	#[must_use]
	pub fn last_errno() -> Error {
		Error::Errno(std::io::Error::last_os_error().raw_os_error().unwrap_or(-1))
	}
}
