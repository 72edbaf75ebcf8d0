// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Streaming I/O utilities.

use std::io;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures::{stream, Stream, TryStreamExt};

/// A lazily consumed sequence of object bytes.
pub type ObjectStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Wrap an in-memory buffer as a single-chunk stream.
#[must_use]
pub fn stream_from_bytes(data: Bytes) -> ObjectStream {
    Box::pin(stream::once(async move { Ok(data) }))
}

/// Drain a stream into one contiguous buffer.
///
/// A stream of exactly one chunk hands that chunk back without copying.
/// Otherwise `size_hint` pre-sizes the buffer; it is not a limit.
///
/// # Errors
///
/// Returns the first error produced by the stream.
pub async fn collect_stream(mut body: ObjectStream, size_hint: usize) -> io::Result<Bytes> {
    let Some(first) = body.try_next().await? else {
        return Ok(Bytes::new());
    };
    let Some(second) = body.try_next().await? else {
        return Ok(first);
    };

    let mut buf = BytesMut::with_capacity(size_hint.max(first.len() + second.len()));
    buf.extend_from_slice(&first);
    buf.extend_from_slice(&second);
    while let Some(chunk) = body.try_next().await? {
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}
