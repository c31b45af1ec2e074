// Copyright 2020 John Millikin and the rust-fuse contributors.
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

#![allow(missing_docs)] // TODO

pub mod access;
pub mod bmap;
pub mod copy_file_range;
pub mod create;
pub mod cuse_init;
pub mod destroy;
pub mod fallocate;
pub mod flush;
pub mod forget;
pub mod fsync;
pub mod fsyncdir;
pub mod fuse_init;
pub mod getattr;
pub mod getlk;
pub mod getxattr;
pub mod interrupt;
pub mod ioctl;
pub mod link;
pub mod listxattr;
pub mod lookup;
pub mod lseek;
pub mod mkdir;
pub mod mknod;
pub mod open;
pub mod opendir;
pub mod poll;
pub mod read;
pub mod readdir;
pub mod readdirplus;
pub mod readlink;
pub mod release;
pub mod releasedir;
pub mod removexattr;
pub mod rename;
pub mod rmdir;
pub mod setattr;
pub mod setlk;
pub mod setxattr;
pub mod statfs;
pub mod symlink;
pub mod syncfs;
pub mod unlink;
pub mod write;
