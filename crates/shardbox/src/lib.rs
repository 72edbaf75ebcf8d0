// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Process assembly and lifecycle for the shardbox server.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assembly;
pub mod lifecycle;

pub use assembly::build_shard_router;
pub use lifecycle::{Server, ShutdownSignals};
