use super::*;

#[test]
fn tag_from_u32_recognizes_every_declared_tag() {
	for tag in [
		Tag::Lookup, Tag::Forget, Tag::GetAttr, Tag::SetAttr, Tag::Readlink, Tag::Mkdir,
		Tag::Unlink, Tag::Rmdir, Tag::Symlink, Tag::Rename, Tag::Link, Tag::Open, Tag::Read,
		Tag::Write, Tag::Flush, Tag::Release, Tag::Fsync, Tag::Opendir, Tag::Readdir,
		Tag::Releasedir, Tag::Fsyncdir, Tag::Statfs, Tag::Setxattr, Tag::Getxattr,
		Tag::Listxattr, Tag::Removexattr, Tag::Access, Tag::Create, Tag::Getlk, Tag::Setlk,
		Tag::Bmap, Tag::Ioctl, Tag::Poll, Tag::Fallocate, Tag::Lseek, Tag::Map, Tag::Test,
		Tag::ServerStat, Tag::MapRelease,
	] {
		assert_eq!(Tag::from_u32(tag as u32), Some(tag));
	}
	assert_eq!(Tag::from_u32(9999), None);
}

#[test]
fn map_request_round_trips_a_multi_component_path() {
	let req = MapRequest { start: Key(0), path: std::ffi::OsString::from("a/b/c") };
	let encoded = encode_map_request(&req);
	let decoded = decode_map_request(&encoded).unwrap();
	assert_eq!(decoded.start.0, 0);
	assert_eq!(decoded.path, req.path);
}

#[test]
fn map_response_round_trips_a_128_bit_key() {
	let key = Key(0xdead_beef_0000_0001_0000_0002_0000_0003);
	let encoded = encode_map_response(key);
	assert_eq!(decode_map_response(&encoded).unwrap().0, key.0);
}

#[test]
fn named_child_request_round_trips_parent_mode_and_name() {
	let req = NamedChildRequest { parent: Key(7), name: std::ffi::OsString::from("newfile"), mode: 0o644 };
	let encoded = encode_named_child_request(&req);
	let decoded = decode_named_child_request(&encoded).unwrap();
	assert_eq!(decoded.parent.0, 7);
	assert_eq!(decoded.mode, 0o644);
	assert_eq!(decoded.name, req.name);
}

#[test]
fn write_request_round_trips_payload_bytes() {
	let req = WriteRequest { key: Key(3), offset: 128, data: vec![1, 2, 3, 4, 5] };
	let encoded = encode_write_request(&req);
	let decoded = decode_write_request(&encoded).unwrap();
	assert_eq!(decoded.key.0, 3);
	assert_eq!(decoded.offset, 128);
	assert_eq!(decoded.data, req.data);
}

#[test]
fn server_stat_response_round_trips_multiple_rows() {
	let rows = vec![
		StatRow { name: "finesse.lookup".to_string(), calls: 10, success: 9, failure: 1, elapsed_ns: 4200 },
		StatRow { name: "finesse.write".to_string(), calls: 3, success: 3, failure: 0, elapsed_ns: 900 },
	];
	let encoded = encode_server_stat_response(&rows);
	let decoded = decode_server_stat_response(&encoded).unwrap();
	assert_eq!(decoded.len(), 2);
	assert_eq!(decoded[0].name, "finesse.lookup");
	assert_eq!(decoded[0].calls, 10);
	assert_eq!(decoded[1].name, "finesse.write");
	assert_eq!(decoded[1].elapsed_ns, 900);
}
