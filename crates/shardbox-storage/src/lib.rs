// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Storage layer for shardbox.
//!
//! This crate provides:
//! - The `ObjectStore` contract shared by node clients and the shard router
//! - `NodeClient`, uniform access to one backend node's bucket
//! - `ShardRouter`, the CRC32C modulo partitioning of ids across nodes
//! - Node backends: S3-compatible (`S3Backend`) and in-process (`MemoryBackend`)

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod hash;
pub mod memory;
pub mod metrics;
pub mod node;
pub mod router;
pub mod s3;
pub mod stream;

pub use backend::{NodeBackend, ObjectStore};
pub use memory::MemoryBackend;
pub use node::NodeClient;
pub use router::ShardRouter;
pub use s3::S3Backend;
pub use stream::{collect_stream, stream_from_bytes, ObjectStream};
