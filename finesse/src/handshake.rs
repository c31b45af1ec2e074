//! Client registration over a well-known UNIX-domain stream socket.
//!
//! Grounded on `finesse/include/fincomm.h`'s `client_connection_state_t` /
//! `server_connection_state_t` and the registration exchange described in
//! the original `finesse` daemon: a client connects to a socket path
//! derived from the mount point, sends a small fixed handshake, and the
//! server answers with the name of a freshly created shared-memory region
//! (see [`crate::shm`]) dedicated to that client. The socket carries only
//! this one-time exchange; all request/response traffic afterward goes
//! through the mapped region, never back over the socket.

use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;

use crate::error::{Error, Result};

const MAGIC: [u8; 4] = *b"FNSH";
const VERSION: u32 = 1;

/// What a client sends immediately after connecting.
pub struct ClientHello {
	pub client_id: u64,
}

/// What the server answers with: the client's dedicated region's name and
/// the server's own id, so both ends can correlate later reconnects.
pub struct ServerHello {
	pub server_id: u64,
	pub shm_name: String,
}

pub fn send_client_hello(stream: &mut UnixStream, hello: &ClientHello) -> Result<()> {
	let mut buf = Vec::with_capacity(16);
	buf.extend_from_slice(&MAGIC);
	buf.extend_from_slice(&VERSION.to_le_bytes());
	buf.extend_from_slice(&hello.client_id.to_le_bytes());
	stream.write_all(&buf)?;
	Ok(())
}

pub fn recv_client_hello(stream: &mut UnixStream) -> Result<ClientHello> {
	let mut buf = [0u8; 16];
	stream.read_exact(&mut buf)?;
	if buf[0..4] != MAGIC {
		return Err(Error::HandshakeRefused);
	}
	let version = u32::from_le_bytes(buf[4..8].try_into().unwrap());
	if version != VERSION {
		return Err(Error::HandshakeRefused);
	}
	let client_id = u64::from_le_bytes(buf[8..16].try_into().unwrap());
	Ok(ClientHello { client_id })
}

pub fn send_server_hello(stream: &mut UnixStream, hello: &ServerHello) -> Result<()> {
	let name_bytes = hello.shm_name.as_bytes();
	let mut buf = Vec::with_capacity(12 + name_bytes.len());
	buf.extend_from_slice(&hello.server_id.to_le_bytes());
	buf.extend_from_slice(&(name_bytes.len() as u32).to_le_bytes());
	buf.extend_from_slice(name_bytes);
	stream.write_all(&buf)?;
	Ok(())
}

pub fn recv_server_hello(stream: &mut UnixStream) -> Result<ServerHello> {
	let mut header = [0u8; 12];
	stream.read_exact(&mut header)?;
	let server_id = u64::from_le_bytes(header[0..8].try_into().unwrap());
	let name_len = u32::from_le_bytes(header[8..12].try_into().unwrap()) as usize;
	if name_len > 4096 {
		return Err(Error::MalformedMessage);
	}
	let mut name_bytes = vec![0u8; name_len];
	stream.read_exact(&mut name_bytes)?;
	let shm_name = String::from_utf8(name_bytes).map_err(|_| Error::MalformedMessage)?;
	Ok(ServerHello { server_id, shm_name })
}

/// Binds the registration socket at `path`, refusing to start if another
/// server already holds it and clearing away a stale socket file left by a
/// server that crashed without unlinking it.
///
/// Mirrors the original daemon's startup probe: attempt a connection to
/// any existing socket file before binding. A successful connect means a
/// live server is already listening, which is fatal; a connection refusal
/// or a missing file means the path is safe to unlink and rebind.
pub fn bind_listener(path: &Path) -> Result<UnixListener> {
	if path.exists() {
		match UnixStream::connect(path) {
			Ok(_) => return Err(Error::AlreadyRunning),
			Err(_) => {
				std::fs::remove_file(path)?;
			}
		}
	}
	Ok(UnixListener::bind(path)?)
}

/// Connects to `path` and exchanges hellos, returning the region name the
/// caller should [`crate::shm::Channel::open`].
pub fn connect_and_register(path: &Path, client_id: u64) -> Result<(UnixStream, ServerHello)> {
	let mut stream = UnixStream::connect(path)?;
	send_client_hello(&mut stream, &ClientHello { client_id })?;
	let server_hello = recv_server_hello(&mut stream)?;
	Ok((stream, server_hello))
}

#[cfg(test)]
mod handshake_test;
