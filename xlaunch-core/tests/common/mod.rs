#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use xlaunch_core::error::{LaunchError, Result};
use xlaunch_core::release::{AssetStream, ReleaseAsset, ReleaseDescriptor, ReleaseSource, RepoRef};
use xlaunch_core::report::{BaseStrings, ErrorReporter};
use xlaunch_core::{ExperienceData, Launcher, LauncherConfig};

/// In-memory release source. `release == None` answers with a network failure.
#[derive(Default)]
pub struct FakeSource {
    release: Mutex<Option<ReleaseDescriptor>>,
    payloads: Mutex<HashMap<String, Vec<u8>>>,
    /// After the first chunk the stream never ends.
    pub stall: AtomicBool,
    pub latest_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Publishes `tag` with the given assets, replacing the previous release.
    pub fn publish(&self, tag: &str, assets: Vec<(&str, Vec<u8>)>) {
        let mut payloads = self.payloads.lock().unwrap();
        let mut list = Vec::new();
        for (name, data) in assets {
            let url = format!("mem://{tag}/{name}");
            list.push(ReleaseAsset {
                name: name.to_string(),
                url: url.clone(),
                size_bytes: data.len() as u64,
            });
            payloads.insert(url, data);
        }
        *self.release.lock().unwrap() = Some(ReleaseDescriptor {
            tag: tag.to_string(),
            assets: list,
        });
    }

    pub fn go_offline(&self) {
        *self.release.lock().unwrap() = None;
    }
}

#[async_trait]
impl ReleaseSource for FakeSource {
    async fn latest_release(&self, _repo: &RepoRef) -> Result<ReleaseDescriptor> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        self.release
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| LaunchError::Network("latest release: HTTP 503".into()))
    }

    async fn fetch_asset(
        &self,
        _repo: &RepoRef,
        asset: &ReleaseAsset,
    ) -> Result<Box<dyn AssetStream>> {
        let data = self
            .payloads
            .lock()
            .unwrap()
            .get(&asset.url)
            .cloned()
            .ok_or_else(|| LaunchError::Network(format!("asset fetch: HTTP 404 {}", asset.url)))?;
        let len = data.len() as u64;
        let chunks = data
            .chunks(1024)
            .map(Bytes::copy_from_slice)
            .collect::<VecDeque<_>>();
        Ok(Box::new(FakeStream {
            chunks,
            len,
            stall: self.stall.load(Ordering::SeqCst),
        }))
    }
}

struct FakeStream {
    chunks: VecDeque<Bytes>,
    len: u64,
    stall: bool,
}

#[async_trait]
impl AssetStream for FakeStream {
    fn content_length(&self) -> Option<u64> {
        Some(self.len)
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if let Some(chunk) = self.chunks.pop_front() {
            if self.stall {
                self.chunks.clear();
            }
            return Ok(Some(chunk));
        }
        if self.stall {
            std::future::pending::<()>().await;
        }
        Ok(None)
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report_error(&self, message: &str, _duration: Duration) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Zip archive in memory. Names ending in `/` become directory entries.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut w = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default();
    for (name, data) in entries {
        if name.ends_with('/') {
            w.add_directory(*name, opts).unwrap();
        } else {
            w.start_file(*name, opts).unwrap();
            w.write_all(data).unwrap();
        }
    }
    w.finish().unwrap().into_inner()
}

pub fn experience(name: &str, repo: &str, exe: Option<&str>, protected: &[&str]) -> ExperienceData {
    ExperienceData {
        name: name.to_string(),
        result_folders: Some(protected.iter().map(|s| s.to_string()).collect()),
        github_owner: "acme".to_string(),
        github_repo: repo.to_string(),
        github_token: None,
        executable_name: exe.map(str::to_string),
        asset_name: None,
        image_urls: None,
    }
}

/// Writes a catalogue (the launcher entry first) and boots a launcher on `root`.
pub fn boot(
    root: &Path,
    source: Arc<FakeSource>,
    entries: Vec<ExperienceData>,
) -> (Launcher, Arc<RecordingReporter>) {
    let config = LauncherConfig::default().with_root(root.to_path_buf());
    let mut all = vec![config.launcher_entry()];
    all.extend(entries);
    let doc = serde_json::json!({ "allExperiencesData": all });
    std::fs::write(
        root.join("settings.json"),
        serde_json::to_vec_pretty(&doc).unwrap(),
    )
    .unwrap();

    let reporter = Arc::new(RecordingReporter::default());
    let launcher =
        Launcher::with_services(config, source, reporter.clone(), Arc::new(BaseStrings)).unwrap();
    (launcher, reporter)
}
