use std::collections::BTreeSet;
use std::path::Path;

use walkdir::WalkDir;
use xlaunch_core::util::sanitize::{clean, empty_dir};

const TREE: &[&str] = &[
    "a/b/Results/run1.csv",
    "a/b/other/x.bin",
    "a/c/d/e.bin",
    "f/g/h.bin",
    "f/Saves/slot0",
    "i/j/k/Results/deep.csv",
    "i/empty/",
    "loose.txt",
];

fn build(root: &Path, order: &[usize]) {
    for &i in order {
        let rel = TREE[i];
        let path = root.join(rel.trim_end_matches('/'));
        if rel.ends_with('/') {
            std::fs::create_dir_all(&path).unwrap();
        } else {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, rel).unwrap();
        }
    }
}

fn snapshot(root: &Path) -> BTreeSet<String> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| {
            e.unwrap()
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn result_does_not_depend_on_traversal_order() {
    let orders: [&[usize]; 3] = [
        &[0, 1, 2, 3, 4, 5, 6, 7],
        &[7, 6, 5, 4, 3, 2, 1, 0],
        &[3, 0, 6, 2, 7, 5, 1, 4],
    ];
    let mut results = Vec::new();
    for order in orders {
        let dir = tempfile::tempdir().unwrap();
        build(dir.path(), order);
        let removed = clean(dir.path(), &["Results", "Saves"]).unwrap();
        assert!(!removed);
        results.push(snapshot(dir.path()));
    }

    assert!(results.windows(2).all(|w| w[0] == w[1]));
    let kept = &results[0];
    for path in [
        "a",
        "a/b",
        "a/b/Results/run1.csv",
        "f",
        "f/Saves/slot0",
        "i/j/k/Results/deep.csv",
        "loose.txt",
    ] {
        assert!(kept.contains(path), "{path} should survive");
    }
    for path in ["a/b/other", "a/c", "f/g", "i/empty"] {
        assert!(!kept.contains(path), "{path} should be gone");
    }
}

#[test]
fn unprotected_tree_is_removed_entirely() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("build");
    build(&root, &[1, 2, 3]);

    assert!(clean(&root, &["Results"]).unwrap());
    assert!(!root.exists());
}

#[test]
fn empty_dir_keeps_the_folder() {
    let dir = tempfile::tempdir().unwrap();
    build(dir.path(), &[0, 6, 7]);

    empty_dir(dir.path()).unwrap();
    assert!(dir.path().is_dir());
    assert!(snapshot(dir.path()).is_empty());

    let fresh = dir.path().join("download");
    empty_dir(&fresh).unwrap();
    assert!(fresh.is_dir());
}
