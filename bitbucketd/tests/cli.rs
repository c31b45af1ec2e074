use std::time::Duration;

use clap::Parser;

use bitbucketd::cli::Cli;

#[test]
fn parses_a_bare_mount_point_with_every_default() {
	let cli = Cli::try_parse_from(["bitbucketd", "/mnt/bitbucket"]).unwrap();
	assert_eq!(cli.mount_point.to_str(), Some("/mnt/bitbucket"));
	assert!(!cli.disable_writeback);
	assert!(!cli.disable_cache);
	assert!(!cli.disable_finesse);
	assert!((cli.attribute_timeout - 1.0).abs() < f64::EPSILON);
	assert_eq!(cli.inode_table_size, 64);
}

#[test]
fn rejects_a_missing_mount_point() {
	assert!(Cli::try_parse_from(["bitbucketd"]).is_err());
}

#[test]
fn parses_behavior_flags() {
	let cli = Cli::try_parse_from([
		"bitbucketd",
		"/mnt/bitbucket",
		"--disable-writeback",
		"--disable-cache",
		"--enable-fsync",
		"--enable-xattr",
		"--enable-flush",
		"--verify-directories",
		"--inode-table-size",
		"128",
		"--attribute-timeout",
		"2.5",
	])
	.unwrap();
	assert!(cli.disable_writeback);
	assert!(cli.disable_cache);
	assert!(cli.enable_fsync);
	assert!(cli.enable_xattr);
	assert!(cli.enable_flush);
	assert!(cli.verify_directories);
	assert_eq!(cli.inode_table_size, 128);

	let config = cli.to_core_config();
	assert!(config.disable_writeback);
	assert!(config.disable_cache);
	assert!(config.enable_fsync);
	assert!(config.enable_xattr);
	assert!(config.enable_flush);
	assert!(config.verify_directories);
	assert_eq!(config.inode_table_size, 128);
	assert_eq!(config.attribute_timeout, Duration::from_secs_f64(2.5));
}

#[test]
fn init_flags_withhold_writeback_and_cache_when_disabled() {
	use fuse::operations::fuse_init::FuseInitFlag;

	let enabled = Cli::try_parse_from(["bitbucketd", "/mnt/bitbucket"]).unwrap();
	let flags = enabled.init_flags();
	assert!(flags.get(FuseInitFlag::WRITEBACK_CACHE));
	assert!(flags.get(FuseInitFlag::AUTO_INVAL_DATA));

	let disabled = Cli::try_parse_from([
		"bitbucketd",
		"/mnt/bitbucket",
		"--disable-writeback",
		"--disable-cache",
	])
	.unwrap();
	let flags = disabled.init_flags();
	assert!(!flags.get(FuseInitFlag::WRITEBACK_CACHE));
	assert!(!flags.get(FuseInitFlag::AUTO_INVAL_DATA));
}

#[test]
fn finesse_socket_path_is_derived_from_the_mount_point_basename() {
	let cli = Cli::try_parse_from(["bitbucketd", "/mnt/bitbucket"]).unwrap();
	let path = cli.finesse_socket_path();
	assert_eq!(path.file_name().unwrap().to_str(), Some("finesse-bitbucket.sock"));
}

#[test]
fn finesse_socket_override_is_used_verbatim() {
	let cli = Cli::try_parse_from([
		"bitbucketd",
		"/mnt/bitbucket",
		"--finesse-socket",
		"/tmp/custom.sock",
	])
	.unwrap();
	assert_eq!(cli.finesse_socket_path().to_str(), Some("/tmp/custom.sock"));
}

#[test]
fn rejects_an_unknown_loglevel() {
	assert!(Cli::try_parse_from(["bitbucketd", "/mnt/bitbucket", "--loglevel", "chatty"]).is_err());
}
