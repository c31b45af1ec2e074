//! The parts of `bitbucketd` worth exercising without actually mounting a
//! filesystem: argument parsing and its mapping onto [`bitbucket::config`]
//! and the FUSE mount/init option types.

pub mod cli;
pub mod error;
