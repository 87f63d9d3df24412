use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{LaunchError, Result};

/// Deletes every directory under `root` (and `root` itself) whose subtree holds no
/// directory named in `protected`. Protection pins the whole ancestor chain up to
/// `root`; loose files inside pinned directories are left for the next extraction
/// to overwrite. Returns whether `root` itself was deleted.
///
/// The first refused delete aborts the pass.
pub fn clean<S: AsRef<str>>(root: &Path, protected: &[S]) -> Result<bool> {
    if !root.is_dir() {
        return Ok(false);
    }
    let names: HashSet<&str> = protected.iter().map(|s| s.as_ref()).collect();
    let pinned = pinned_dirs(root, &names)?;

    if !pinned.contains(root) {
        debug!(root = %root.display(), "no protected folders, removing whole tree");
        fs::remove_dir_all(root).map_err(|e| LaunchError::denied(root, e))?;
        return Ok(true);
    }

    prune(root, &pinned, &names)?;
    Ok(false)
}

/// Every directory that has a protected folder somewhere below it.
fn pinned_dirs(root: &Path, names: &HashSet<&str>) -> Result<HashSet<PathBuf>> {
    let mut pinned = HashSet::new();
    let mut it = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter();

    while let Some(entry) = it.next() {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !names.contains(name.as_ref()) {
            continue;
        }
        // nothing inside a protected folder is ever touched
        it.skip_current_dir();

        let mut cur = entry.path().parent();
        while let Some(dir) = cur {
            if !pinned.insert(dir.to_path_buf()) || dir == root {
                break;
            }
            cur = dir.parent();
        }
    }
    Ok(pinned)
}

fn prune(dir: &Path, pinned: &HashSet<PathBuf>, names: &HashSet<&str>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| LaunchError::denied(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| LaunchError::denied(dir, e))?;
        let path = entry.path();
        let ft = entry.file_type().map_err(|e| LaunchError::denied(&path, e))?;
        if !ft.is_dir() {
            continue;
        }
        if names.contains(entry.file_name().to_string_lossy().as_ref()) {
            continue;
        }
        if pinned.contains(&path) {
            prune(&path, pinned, names)?;
        } else {
            fs::remove_dir_all(&path).map_err(|e| LaunchError::denied(&path, e))?;
        }
    }
    Ok(())
}

/// Removes everything inside `dir` but keeps `dir`. Creates it when absent.
pub fn empty_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| LaunchError::denied(dir, e))?;
        return Ok(());
    }
    let entries = fs::read_dir(dir).map_err(|e| LaunchError::denied(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| LaunchError::denied(dir, e))?;
        let path = entry.path();
        let ft = entry.file_type().map_err(|e| LaunchError::denied(&path, e))?;
        let res = if ft.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        res.map_err(|e| LaunchError::denied(&path, e))?;
    }
    Ok(())
}

fn walk_error(e: walkdir::Error) -> LaunchError {
    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
    match e.into_io_error() {
        Some(io) => LaunchError::denied(path, io),
        None => LaunchError::denied(path, std::io::Error::other("filesystem loop")),
    }
}
