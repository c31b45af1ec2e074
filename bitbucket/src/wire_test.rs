use super::*;

#[test]
fn reader_reads_fields_in_order() {
	let mut buf = Vec::new();
	buf.extend_from_slice(&42u64.to_le_bytes());
	buf.extend_from_slice(&7u32.to_le_bytes());

	let mut r = Reader::new(&buf);
	assert_eq!(r.u64(), Some(42));
	assert_eq!(r.u32(), Some(7));
	assert_eq!(r.u32(), None);
}

#[test]
fn reader_c_string_splits_on_first_nul() {
	let mut buf = b"hello\0world".to_vec();
	buf.push(0);
	let mut r = Reader::new(&buf);
	assert_eq!(r.c_string().unwrap(), std::ffi::OsStr::new("hello"));
	assert_eq!(r.c_string().unwrap(), std::ffi::OsStr::new("world"));
}

#[test]
fn encode_attr_out_is_fixed_size() {
	let attr = Attr::new(Kind::Regular, 0o644);
	let bytes = encode_attr_out(5, &attr, Kind::Regular, Duration::from_secs(1));
	// attr_valid(8) + attr_valid_nsec(4) + dummy(4) + fuse_attr(88)
	assert_eq!(bytes.len(), 8 + 4 + 4 + 88);
}

#[test]
fn encode_entry_out_is_fixed_size() {
	let attr = Attr::new(Kind::Directory, 0o755);
	let bytes = encode_entry_out(5, 0, &attr, Kind::Directory, Duration::from_secs(1), Duration::from_secs(1));
	// nodeid+gen+entry_valid+attr_valid (4*8) + 2 nsec (2*4) + fuse_attr(88)
	assert_eq!(bytes.len(), 4 * 8 + 2 * 4 + 88);
}

#[test]
fn encode_dirent_pads_to_eight_byte_boundary() {
	let mut out = Vec::new();
	let written = encode_dirent(&mut out, 1, 1, dirent_type(Kind::Regular), b"abc");
	assert_eq!(written, out.len());
	assert_eq!(out.len() % 8, 0);
}

