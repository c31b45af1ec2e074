// Copyright 2022 John Millikin and the rust-fuse contributors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! Commonly used imports for async CUSE and FUSE servers.

pub use crate::server_async::{
	CuseConnection,
	FuseConnection,
};

pub use crate::server_async::io::{
	CuseSocket,
	FuseSocket,
};

pub use crate::operations::access::*;
pub use crate::operations::bmap::*;
pub use crate::operations::copy_file_range::*;
pub use crate::operations::create::*;
pub use crate::operations::cuse_init::*;
pub use crate::operations::destroy::*;
pub use crate::operations::fallocate::*;
pub use crate::operations::flush::*;
pub use crate::operations::forget::*;
pub use crate::operations::fsync::*;
pub use crate::operations::fsyncdir::*;
pub use crate::operations::fuse_init::*;
pub use crate::operations::getattr::*;
pub use crate::operations::getlk::*;
pub use crate::operations::getxattr::*;
pub use crate::operations::interrupt::*;
pub use crate::operations::ioctl::*;
pub use crate::operations::link::*;
pub use crate::operations::listxattr::*;
pub use crate::operations::lookup::*;
pub use crate::operations::lseek::*;
pub use crate::operations::mkdir::*;
pub use crate::operations::mknod::*;
pub use crate::operations::open::*;
pub use crate::operations::opendir::*;
pub use crate::operations::poll::*;
pub use crate::operations::read::*;
pub use crate::operations::readdir::*;
pub use crate::operations::readdirplus::*;
pub use crate::operations::readlink::*;
pub use crate::operations::release::*;
pub use crate::operations::releasedir::*;
pub use crate::operations::removexattr::*;
pub use crate::operations::rename::*;
pub use crate::operations::rmdir::*;
pub use crate::operations::setattr::*;
pub use crate::operations::setlk::*;
pub use crate::operations::setxattr::*;
pub use crate::operations::statfs::*;
pub use crate::operations::symlink::*;
pub use crate::operations::syncfs::*;
pub use crate::operations::unlink::*;
pub use crate::operations::write::*;
