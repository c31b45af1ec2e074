use std::os::unix::net::{UnixListener, UnixStream};

use super::*;

#[test]
fn client_hello_round_trips_over_a_socketpair() {
	let (mut a, mut b) = UnixStream::pair().unwrap();
	send_client_hello(&mut a, &ClientHello { client_id: 99 }).unwrap();
	let hello = recv_client_hello(&mut b).unwrap();
	assert_eq!(hello.client_id, 99);
}

#[test]
fn server_hello_round_trips_over_a_socketpair() {
	let (mut a, mut b) = UnixStream::pair().unwrap();
	send_server_hello(&mut a, &ServerHello { server_id: 7, shm_name: "/finesse-abc".to_string() }).unwrap();
	let hello = recv_server_hello(&mut b).unwrap();
	assert_eq!(hello.server_id, 7);
	assert_eq!(hello.shm_name, "/finesse-abc");
}

#[test]
fn recv_client_hello_rejects_bad_magic() {
	let (mut a, mut b) = UnixStream::pair().unwrap();
	std::io::Write::write_all(&mut a, &[0u8; 16]).unwrap();
	assert!(matches!(recv_client_hello(&mut b), Err(Error::HandshakeRefused)));
}

#[test]
fn bind_listener_removes_a_stale_socket_file() {
	let dir = std::env::temp_dir().join(format!("finesse-test-{}", std::process::id()));
	std::fs::create_dir_all(&dir).unwrap();
	let path = dir.join("stale.sock");

	// Create a socket file and immediately drop the listener so the path
	// exists on disk but nothing is listening on it.
	{
		let _listener = UnixListener::bind(&path).unwrap();
	}
	assert!(path.exists());

	let listener = bind_listener(&path).unwrap();
	drop(listener);
	std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn bind_listener_refuses_when_a_server_is_already_listening() {
	let dir = std::env::temp_dir().join(format!("finesse-test-live-{}", std::process::id()));
	std::fs::create_dir_all(&dir).unwrap();
	let path = dir.join("live.sock");

	let _listener = UnixListener::bind(&path).unwrap();
	assert!(matches!(bind_listener(&path), Err(Error::AlreadyRunning)));

	drop(_listener);
	std::fs::remove_dir_all(&dir).unwrap();
}
