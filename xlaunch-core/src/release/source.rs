use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Where an experience's releases are published.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    /// Optional bearer token, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    pub url: String,
    pub size_bytes: u64,
}

/// Latest release metadata. Fetched per check, never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    pub tag: String,
    pub assets: Vec<ReleaseAsset>,
}

/// A streaming asset body.
#[async_trait]
pub trait AssetStream: Send {
    /// Body length when the transport knows it up front.
    fn content_length(&self) -> Option<u64>;

    /// Next chunk of the body, `None` at the end.
    async fn next_chunk(&mut self) -> Result<Option<Bytes>>;
}

#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn latest_release(&self, repo: &RepoRef) -> Result<ReleaseDescriptor>;

    async fn fetch_asset(
        &self,
        repo: &RepoRef,
        asset: &ReleaseAsset,
    ) -> Result<Box<dyn AssetStream>>;
}
