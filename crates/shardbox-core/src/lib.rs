// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Core types and utilities for shardbox.
//!
//! This crate provides the building blocks shared by every shardbox component:
//! - Configuration management
//! - Error types for routing and backend node access
//! - Object identifiers and node descriptors

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, DiscoveryMode, LogFormat, StorageBackendKind};
pub use error::{Error, Result};
pub use types::{NodeDescriptor, ObjectId};
