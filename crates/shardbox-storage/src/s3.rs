// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! S3-compatible node backend.
//!
//! Talks to one storage node over the S3 protocol with path-style
//! addressing and static credentials.

use std::io;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use futures::stream;
use shardbox_core::{Error, NodeDescriptor, Result};
use tracing::debug;

use crate::backend::NodeBackend;
use crate::stream::{collect_stream, ObjectStream};

const DEFAULT_REGION: &str = "us-east-1";

/// A backend node reached through the S3 API.
#[derive(Debug, Clone)]
pub struct S3Backend {
    client: Client,
    endpoint: String,
    region: String,
}

impl S3Backend {
    /// Build a client for the node described by `node`.
    ///
    /// No request is made here; connectivity is first exercised by the
    /// bucket check in [`crate::NodeClient::connect`].
    #[must_use]
    pub fn new(node: &NodeDescriptor, region: &str) -> Self {
        let credentials =
            Credentials::new(&node.access_key, &node.secret_key, None, None, "shardbox");

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .endpoint_url(&node.endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(config),
            endpoint: node.endpoint.clone(),
            region: region.to_string(),
        }
    }

    fn error(&self, err: impl std::error::Error) -> Error {
        Error::backend(&self.endpoint, DisplayErrorContext(err).to_string())
    }
}

#[async_trait]
impl NodeBackend for S3Backend {
    fn name(&self) -> &str {
        &self.endpoint
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let not_found = err.as_service_error().is_some_and(|e| e.is_not_found())
                    || err.raw_response().map(|r| r.status().as_u16()) == Some(404);
                if not_found {
                    Ok(false)
                } else {
                    Err(self.error(err))
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut request = self.client.create_bucket().bucket(bucket);
        if self.region != DEFAULT_REGION {
            let location = CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                .build();
            request = request.create_bucket_configuration(location);
        }

        request.send().await.map_err(|err| self.error(err))?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, id: &str) -> Result<ObjectStream> {
        let output = match self.client.get_object().bucket(bucket).key(id).send().await {
            Ok(output) => output,
            Err(err) => {
                let missing = err.as_service_error().is_some_and(|e| e.is_no_such_key())
                    || err.raw_response().map(|r| r.status().as_u16()) == Some(404);
                if missing {
                    return Err(Error::not_found(id, "NoSuchKey"));
                }
                return Err(self.error(err));
            }
        };

        let body = stream::try_unfold(output.body, |mut body| async move {
            let chunk = body.try_next().await.map_err(io::Error::other)?;
            Ok::<_, io::Error>(chunk.map(|bytes| (bytes, body)))
        });
        Ok(Box::pin(body))
    }

    async fn put_object(
        &self,
        bucket: &str,
        id: &str,
        body: ObjectStream,
        length: u64,
    ) -> Result<()> {
        // The SDK needs a replayable body for signing and retries, so the
        // object is buffered before upload.
        let data = collect_stream(body, usize::try_from(length).unwrap_or(0)).await?;
        if data.len() as u64 != length {
            return Err(Error::InvalidRequest(format!(
                "declared length {length} but body produced {} bytes",
                data.len()
            )));
        }

        debug!(node = %self.endpoint, bucket, id, length, "Uploading object");
        self.client
            .put_object()
            .bucket(bucket)
            .key(id)
            .content_length(data.len() as i64)
            .content_type("application/octet-stream")
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|err| self.error(err))?;
        Ok(())
    }
}
