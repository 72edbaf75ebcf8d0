// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Shard routing metrics.

use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Initialize storage metric descriptions (call once at startup).
pub fn init_storage_metrics() {
    describe_gauge!("shardbox_nodes_total", "Number of backend nodes in the shard list");
    describe_counter!(
        "shardbox_shard_operations_total",
        "Operations dispatched to each shard, by operation and outcome"
    );
}

/// Record the size of the frozen node list.
pub fn record_node_count(count: usize) {
    gauge!("shardbox_nodes_total").set(count as f64);
}

/// Record one operation dispatched to a shard.
pub fn record_shard_operation(shard: usize, operation: &'static str, success: bool) {
    counter!("shardbox_shard_operations_total",
        "shard" => shard.to_string(),
        "operation" => operation,
        "success" => if success { "true" } else { "false" }
    )
    .increment(1);
}
