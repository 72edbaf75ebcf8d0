// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Hash functions for shard routing.
//!
//! Every id is mapped to a node index with `crc32c(id) % node_count`. The
//! checksum must be:
//! - Deterministic: same input always produces same output, on every process
//! - Uniform: ids spread evenly over the node list
//! - Keyless: no per-process seed, so restarts keep the same mapping
//!
//! This is modulo hashing, not consistent hashing. Changing the node count
//! remaps nearly every id; objects are not moved.

/// Compute the routing checksum of an id: CRC32-Castagnoli over its raw bytes.
#[inline]
#[must_use]
pub fn shard_checksum(id: &str) -> u32 {
    crc32c::crc32c(id.as_bytes())
}

/// Compute the owning node index of an id.
///
/// Returns an index in the range [0, node_count), or `None` when there are
/// no nodes to own it.
#[inline]
#[must_use]
pub fn shard_index(id: &str, node_count: usize) -> Option<usize> {
    u64::from(shard_checksum(id)).checked_rem(node_count as u64).map(|idx| idx as usize)
}
