//! Destination for published exchange rate documents.

use anyhow::Result;
use async_trait::async_trait;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A bucket-scoped object store. Every `put_object` is a single full write that
/// creates or replaces the object at `key` without reading it first.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;

    /// Human readable location of `key`, used in log lines.
    fn location(&self, key: &str) -> String;
}
