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

//! Implements the `FUSE_LOOKUP` operation.

use core::fmt;

use crate::internal::fuse_kernel;
use crate::node;
use crate::server;
use crate::server::decode;
use crate::server::encode;

// LookupRequest {{{

/// Request type for `FUSE_LOOKUP`.
///
/// See the [module-level documentation](self) for an overview of the
/// `FUSE_LOOKUP` operation.
pub struct LookupRequest<'a> {
	parent_id: node::Id,
	name: &'a node::Name,
}

impl LookupRequest<'_> {
	#[must_use]
	pub fn parent_id(&self) -> node::Id {
		self.parent_id
	}

	#[must_use]
	pub fn name(&self) -> &node::Name {
		self.name
	}
}

impl server::sealed::Sealed for LookupRequest<'_> {}

impl<'a> server::FuseRequest<'a> for LookupRequest<'a> {
	fn from_request(
		request: server::Request<'a>,
		_options: server::FuseRequestOptions,
	) -> Result<Self, server::RequestError> {
		let mut dec = request.decoder();
		dec.expect_opcode(fuse_kernel::FUSE_LOOKUP)?;
		Ok(Self {
			parent_id: decode::node_id(dec.header().nodeid)?,
			name: dec.next_node_name()?,
		})
	}
}

impl fmt::Debug for LookupRequest<'_> {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		fmt.debug_struct("LookupRequest")
			.field("parent_id", &self.parent_id())
			.field("name", &self.name())
			.finish()
	}
}

// }}}

// LookupResponse {{{

/// Response type for `FUSE_LOOKUP`.
///
/// See the [module-level documentation](self) for an overview of the
/// `FUSE_LOOKUP` operation.
pub struct LookupResponse {
	entry: Option<node::Entry>,
}

impl LookupResponse {
	/// Creates a response indicating the named node was found.
	#[inline]
	#[must_use]
	pub fn new(entry: Option<node::Entry>) -> LookupResponse {
		Self { entry }
	}

	#[inline]
	#[must_use]
	pub fn entry(&self) -> Option<&node::Entry> {
		self.entry.as_ref()
	}

	#[inline]
	#[must_use]
	pub fn entry_mut(&mut self) -> Option<&mut node::Entry> {
		self.entry.as_mut()
	}
}

impl fmt::Debug for LookupResponse {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		fmt.debug_struct("LookupResponse")
			.field("entry", &self.entry())
			.finish()
	}
}

impl server::sealed::Sealed for LookupResponse {}

impl server::FuseResponse for LookupResponse {
	fn to_response<'a>(
		&'a self,
		header: &'a mut crate::ResponseHeader,
		options: server::FuseResponseOptions,
	) -> server::Response<'a> {
		let entry = match &self.entry {
			Some(entry) => entry,
			// In early versions of FUSE, `fuse_entry_out::nodeid` was a
			// required field and must be non-zero. FUSE v7.4 relaxed this
			// so that a zero node ID was the same as returning `ENOENT`,
			// but with a cache hint. Since this crate targets >= v7.4, a
			// missing entry is encoded the same way as a zero-ID entry.
			None => return encode::error(header, crate::Error::NOT_FOUND),
		};
		if options.version_minor() >= 9 {
			return encode::sized(header, entry.as_v7p9());
		}
		encode::sized(header, entry.as_v7p1())
	}
}

// }}}
