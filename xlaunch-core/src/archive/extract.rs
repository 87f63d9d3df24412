use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{LaunchError, Result};
use crate::util::progress::ProgressGate;

#[derive(Clone, Debug)]
pub struct ExtractOptions {
    pub buffer_bytes: usize,
    /// Checked between entries.
    pub cancel: Option<CancellationToken>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            buffer_bytes: 1 << 16,
            cancel: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub files: usize,
    pub bytes: u64,
}

/// Extracts every file entry of a zip archive under `dest`, reporting a monotonically
/// non-decreasing fraction of uncompressed bytes written. Directory entries are skipped;
/// parents are created on demand.
///
/// A failure leaves whatever was already written in place.
pub fn extract<F>(
    archive: &Path,
    dest: &Path,
    opts: &ExtractOptions,
    mut on_progress: F,
) -> Result<ExtractReport>
where
    F: FnMut(f32),
{
    if archive.extension().and_then(|e| e.to_str()) != Some("zip") {
        return Err(LaunchError::ArchiveCorrupt(format!(
            "not a zip archive: {}",
            archive.display()
        )));
    }
    if !archive.is_file() {
        return Err(LaunchError::MissingLocalAsset(archive.to_path_buf()));
    }

    let f = File::open(archive).map_err(|e| LaunchError::denied(archive, e))?;
    let mut zip = ZipArchive::new(BufReader::new(f)).map_err(corrupt)?;

    let mut total = 0u64;
    for i in 0..zip.len() {
        let entry = zip.by_index_raw(i).map_err(corrupt)?;
        if entry.is_dir() {
            continue;
        }
        total = total.saturating_add(entry.size());
    }
    debug!(archive = %archive.display(), entries = zip.len(), total, "extract begin");

    fs::create_dir_all(dest).map_err(|e| LaunchError::denied(dest, e))?;

    let mut gate = ProgressGate::new(total);
    let mut report = ExtractReport::default();
    let mut buf = vec![0u8; opts.buffer_bytes.max(4096)];

    for i in 0..zip.len() {
        if opts.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Err(LaunchError::Cancelled);
        }

        let mut entry = zip.by_index(i).map_err(corrupt)?;
        if entry.is_dir() {
            continue;
        }
        let rel = entry.enclosed_name().ok_or_else(|| {
            LaunchError::ArchiveCorrupt(format!("unsafe path: {}", entry.name()))
        })?;
        let outp = dest.join(rel);
        if let Some(parent) = outp.parent() {
            fs::create_dir_all(parent).map_err(|e| LaunchError::denied(parent, e))?;
        }
        let mut out = File::create(&outp).map_err(|e| LaunchError::denied(&outp, e))?;

        let mut written = 0u64;
        loop {
            let k = entry.read(&mut buf).map_err(corrupt)?;
            if k == 0 {
                break;
            }
            out.write_all(&buf[..k])
                .map_err(|e| LaunchError::denied(&outp, e))?;
            written += k as u64;
            if let Some(frac) = gate.advance(k as u64) {
                on_progress(frac);
            }
        }

        if written != entry.size() {
            return Err(LaunchError::ArchiveCorrupt(format!(
                "extracted size mismatch: {}",
                entry.name()
            )));
        }
        report.files += 1;
        report.bytes += written;
    }

    if let Some(frac) = gate.finish() {
        on_progress(frac);
    }
    info!(
        archive = %archive.display(),
        files = report.files,
        bytes = report.bytes,
        "extract done"
    );
    Ok(report)
}

fn corrupt(e: impl std::fmt::Display) -> LaunchError {
    LaunchError::ArchiveCorrupt(e.to_string())
}
