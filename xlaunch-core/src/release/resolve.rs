use std::sync::Arc;

use super::source::{ReleaseAsset, ReleaseDescriptor, ReleaseSource, RepoRef};
use crate::error::{LaunchError, Result};
use crate::util::size::format_size;

/// `My-Addon-Pack.zip` -> `My Addon Pack`: drop everything from the last `.`, dashes become spaces.
pub fn normalize_asset_name(raw: &str) -> String {
    let stem = match raw.rfind('.') {
        Some(i) => &raw[..i],
        None => raw,
    };
    stem.replace('-', " ")
}

/// Finds the asset whose normalised name equals `name`. The last match wins.
pub fn asset_by_semantic_name<'a>(
    assets: &'a [ReleaseAsset],
    name: &str,
) -> Option<&'a ReleaseAsset> {
    assets
        .iter()
        .rev()
        .find(|a| normalize_asset_name(&a.name) == name)
}

/// Queries the release source and picks assets out of the answer.
#[derive(Clone)]
pub struct ReleaseResolver {
    source: Arc<dyn ReleaseSource>,
}

impl ReleaseResolver {
    pub fn new(source: Arc<dyn ReleaseSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<dyn ReleaseSource> {
        &self.source
    }

    pub async fn latest_release(&self, repo: &RepoRef) -> Result<ReleaseDescriptor> {
        self.source.latest_release(repo).await
    }

    /// The payload of an experience: the named asset when one is configured, else the first.
    pub fn primary_asset<'a>(
        release: &'a ReleaseDescriptor,
        asset_name: Option<&str>,
    ) -> Result<&'a ReleaseAsset> {
        match asset_name {
            Some(name) => asset_by_semantic_name(&release.assets, name)
                .ok_or_else(|| LaunchError::AssetNotFound(name.to_string())),
            None => release.assets.first().ok_or_else(|| {
                LaunchError::MalformedResponse(format!("release {} has no assets", release.tag))
            }),
        }
    }

    /// `v1.2.0 (24.00 MB)`, or the bare tag when the release has no matching asset.
    pub fn summary(release: &ReleaseDescriptor, asset_name: Option<&str>) -> String {
        match Self::primary_asset(release, asset_name) {
            Ok(asset) => format!("{} ({})", release.tag, format_size(asset.size_bytes)),
            Err(_) => release.tag.clone(),
        }
    }
}
