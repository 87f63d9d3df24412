pub mod github;
pub mod resolve;
pub mod source;

pub use github::GithubReleaseSource;
pub use resolve::{ReleaseResolver, asset_by_semantic_name, normalize_asset_name};
pub use source::{AssetStream, ReleaseAsset, ReleaseDescriptor, ReleaseSource, RepoRef};
