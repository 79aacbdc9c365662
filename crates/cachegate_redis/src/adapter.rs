// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Remote key-value adapter storing HTTP-response-shaped values.

use std::any::Any;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use cachegate_tier::{Cache, CacheEntry, CachedResponse, Error, Headers, effective_ttl};
use tracing::{debug, warn};

use crate::store::KvStore;

/// Namespace prefix of the key holding a record's body blob.
const CONTENT_PREFIX: &str = "cachegate:content:";
/// Namespace prefix of the key holding a record's metadata document.
const METADATA_PREFIX: &str = "cachegate:meta:";

/// The JSON metadata document stored beside each content blob.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseMetadata {
    status: u16,
    headers: Headers,
    time_to_live: u64,
}

/// Adapter exposing a remote key-value store as a
/// [`Cache`]`<String, CachedResponse>`.
///
/// Each logical key is stored as two independently-TTLed string keys: the
/// body as a base64 blob under the content prefix, and a JSON document with
/// status, headers, and the effective TTL under the metadata prefix. Both
/// are written with the same effective TTL, resolved against the resource's
/// configured ceiling like every other backend.
///
/// A record with only one of its two keys left (they expire independently)
/// is treated as a miss, as is a record that no longer decodes; neither
/// case fails the read.
#[derive(Debug)]
pub struct RemoteCache<S> {
    name: String,
    store: S,
    time_to_live_seconds: u64,
}

impl<S> RemoteCache<S>
where
    S: KvStore,
{
    /// Wraps a key-value store with the resource's configured TTL.
    ///
    /// `time_to_live_seconds == 0` means records have no TTL ceiling.
    pub fn new(name: impl Into<String>, store: S, time_to_live_seconds: u64) -> Self {
        Self {
            name: name.into(),
            store,
            time_to_live_seconds,
        }
    }

    /// Returns a reference to the underlying store.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.store
    }

    fn decode(key: &str, content: &str, metadata: &str) -> Option<CacheEntry<CachedResponse>> {
        let body = match BASE64.decode(content) {
            Ok(body) => body,
            Err(error) => {
                warn!(key, %error, "undecodable content blob, treating as a miss");
                return None;
            }
        };
        let metadata: ResponseMetadata = match serde_json::from_str(metadata) {
            Ok(metadata) => metadata,
            Err(error) => {
                warn!(key, %error, "undecodable metadata record, treating as a miss");
                return None;
            }
        };

        let response = CachedResponse::from_parts(metadata.status, metadata.headers, body.into());
        Some(if metadata.time_to_live > 0 {
            CacheEntry::with_ttl(response, Duration::from_secs(metadata.time_to_live))
        } else {
            CacheEntry::new(response)
        })
    }
}

fn content_key(key: &str) -> String {
    format!("{CONTENT_PREFIX}{key}")
}

fn metadata_key(key: &str) -> String {
    format!("{METADATA_PREFIX}{key}")
}

impl<S> Cache<String, CachedResponse> for RemoteCache<S>
where
    S: KvStore + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn native(&self) -> &(dyn Any + Send + Sync) {
        &self.store
    }

    async fn get(&self, key: &String) -> Result<Option<CacheEntry<CachedResponse>>, Error> {
        let content = self.store.get(&content_key(key)).await?;
        let metadata = self.store.get(&metadata_key(key)).await?;

        match (content, metadata) {
            (Some(content), Some(metadata)) => Ok(Self::decode(key, &content, &metadata)),
            (None, None) => Ok(None),
            _ => {
                debug!(key = %key, "partial record (one of two keys expired), treating as a miss");
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &String, entry: CacheEntry<CachedResponse>) -> Result<(), Error> {
        let ttl = effective_ttl(self.time_to_live_seconds, entry.ttl());
        let response = entry.into_value();

        let metadata = ResponseMetadata {
            status: response.status(),
            headers: response.headers().clone(),
            time_to_live: ttl,
        };
        // A record that cannot be serialized aborts this single write.
        let metadata_json = serde_json::to_string(&metadata).map_err(Error::from_message)?;
        let content = BASE64.encode(response.body());

        let expiry = (ttl > 0).then(|| Duration::from_secs(ttl));
        self.store.put(&content_key(key), content, expiry).await?;
        self.store.put(&metadata_key(key), metadata_json, expiry).await?;
        Ok(())
    }

    async fn evict(&self, key: &String) -> Result<(), Error> {
        // Both derived keys go together; the historical delete-by-logical-key
        // matched neither of them.
        self.store.delete(&[content_key(key), metadata_key(key)]).await
    }

    /// Flushes the **entire** connected database, not just this cache's
    /// records.
    async fn clear(&self) -> Result<(), Error> {
        self.store.flush_all().await
    }
}
