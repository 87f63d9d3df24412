use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use super::source::{AssetStream, ReleaseAsset, ReleaseDescriptor, ReleaseSource, RepoRef};
use crate::config::LauncherConfig;
use crate::error::{LaunchError, Result};

const ACCEPT_JSON: &str = "application/vnd.github.v3+json";
const ACCEPT_BINARY: &str = "application/octet-stream";

#[derive(Deserialize)]
struct WireRelease {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    assets: Vec<WireAsset>,
}

#[derive(Deserialize)]
struct WireAsset {
    name: String,
    url: String,
    #[serde(default)]
    size: u64,
}

/// Release source backed by the GitHub REST API.
pub struct GithubReleaseSource {
    client: Client,
    api_base: String,
    user_agent: String,
}

impl GithubReleaseSource {
    pub fn new(api_base: impl Into<String>, user_agent: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
        })
    }

    pub fn from_config(cfg: &LauncherConfig) -> Result<Self> {
        Self::new(cfg.api_base.clone(), cfg.user_agent.clone())
    }

    fn request(&self, url: &str, repo: &RepoRef, accept: &str) -> RequestBuilder {
        let mut req = self
            .client
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", accept);
        if let Some(token) = &repo.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!("{} failed status={}", what, status.as_u16());
            return Err(LaunchError::Network(format!(
                "{what}: HTTP {}",
                status.as_u16()
            )));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ReleaseSource for GithubReleaseSource {
    async fn latest_release(&self, repo: &RepoRef) -> Result<ReleaseDescriptor> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base, repo.owner, repo.repo
        );
        let resp = self
            .send(self.request(&url, repo, ACCEPT_JSON), "latest release")
            .await?;
        let body = resp.text().await?;
        let wire: WireRelease = serde_json::from_str(&body)
            .map_err(|e| LaunchError::MalformedResponse(e.to_string()))?;

        let tag = match wire.tag_name {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(LaunchError::MalformedResponse("missing tag_name".into())),
        };
        debug!(owner = %repo.owner, repo = %repo.repo, %tag, assets = wire.assets.len(), "latest release");

        Ok(ReleaseDescriptor {
            tag,
            assets: wire
                .assets
                .into_iter()
                .map(|a| ReleaseAsset {
                    name: a.name,
                    url: a.url,
                    size_bytes: a.size,
                })
                .collect(),
        })
    }

    async fn fetch_asset(
        &self,
        repo: &RepoRef,
        asset: &ReleaseAsset,
    ) -> Result<Box<dyn AssetStream>> {
        let resp = self
            .send(self.request(&asset.url, repo, ACCEPT_BINARY), "asset fetch")
            .await?;
        Ok(Box::new(HttpAssetStream { resp }))
    }
}

struct HttpAssetStream {
    resp: Response,
}

#[async_trait]
impl AssetStream for HttpAssetStream {
    fn content_length(&self) -> Option<u64> {
        self.resp.content_length()
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        Ok(self.resp.chunk().await?)
    }
}
