//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A test fixture that provides source and destination directories.
pub struct TestFixture {
    pub src: TempDir,
    pub dst: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with fresh source and destination directories.
    pub fn new() -> Self {
        Self {
            src: TempDir::new().expect("Failed to create temp source dir"),
            dst: TempDir::new().expect("Failed to create temp dest dir"),
        }
    }

    /// Write `content` to `rel` under the source directory, creating parents.
    pub fn write_src(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.src.path().join(rel);
        write_file(&path, content);
        path
    }

    /// Write `content` to `rel` under the destination directory, creating parents.
    pub fn write_dst(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dst.path().join(rel);
        write_file(&path, content);
        path
    }

    /// Check if a file exists and has the expected content.
    pub fn assert_file_content(&self, path: &Path, expected: &str) {
        assert!(path.exists(), "File does not exist: {:?}", path);
        let actual = fs::read_to_string(path).expect("Failed to read file");
        assert_eq!(actual, expected, "File content mismatch");
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a file, creating its parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create directory");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// One node of a directory snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Dir,
    File(Vec<u8>),
    Symlink(PathBuf),
}

/// Snapshot a tree as relative path -> node, without following symlinks.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Node> {
    let mut nodes = BTreeMap::new();
    walk(root, root, &mut nodes);
    nodes
}

fn walk(root: &Path, dir: &Path, nodes: &mut BTreeMap<PathBuf, Node>) {
    for entry in fs::read_dir(dir).expect("Failed to read directory") {
        let entry = entry.expect("Failed to read entry");
        let path = entry.path();
        let rel = path
            .strip_prefix(root)
            .expect("entry outside root")
            .to_path_buf();
        let file_type = entry.file_type().expect("Failed to read file type");

        if file_type.is_symlink() {
            let target = fs::read_link(&path).expect("Failed to read link");
            nodes.insert(rel, Node::Symlink(target));
        } else if file_type.is_dir() {
            nodes.insert(rel, Node::Dir);
            walk(root, &path, nodes);
        } else {
            let content = fs::read(&path).expect("Failed to read file");
            nodes.insert(rel, Node::File(content));
        }
    }
}

/// Build a source tree with nested directories, files and (on Unix) symlinks.
pub fn populate_sample_tree(root: &Path) {
    write_file(&root.join("README.md"), "# sample");
    write_file(&root.join("src/main.rs"), "fn main() {}");
    write_file(&root.join("src/util/mod.rs"), "pub fn util() {}");
    write_file(&root.join("assets/img/logo.svg"), "<svg/>");
    fs::create_dir_all(root.join("empty")).expect("Failed to create directory");

    #[cfg(unix)]
    {
        use std::os::unix::fs::symlink;
        symlink("src/main.rs", root.join("main-link")).expect("Failed to create symlink");
        symlink("../README.md", root.join("src/readme-link")).expect("Failed to create symlink");
        symlink("assets/img", root.join("img-dir-link")).expect("Failed to create symlink");
        symlink("does/not/exist", root.join("dangling")).expect("Failed to create symlink");
    }
}
