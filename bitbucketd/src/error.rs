//! The top-level error type returned by `main`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("failed to mount {path}: errno {source:?}")]
	Mount { path: String, source: linux_errno::Error },

	#[error(transparent)]
	Finesse(#[from] finesse::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
