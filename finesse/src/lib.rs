//! The shared-memory fast path paired with the `bitbucket` FUSE filesystem.
//!
//! A client that already holds an open file can bypass the kernel's FUSE
//! round trip entirely: it registers over a UNIX-domain socket
//! ([`handshake`]), is handed a dedicated shared-memory region
//! ([`shm`]), and from then on exchanges fixed-layout messages
//! ([`message`]) with the [`server::Listener`] thread running alongside
//! the FUSE dispatcher, against the same [`bitbucket::Core`].

pub mod error;
pub mod handshake;
pub mod message;
pub mod server;
pub mod shm;

pub use error::{Error, Result};
pub use server::Listener;
