//! Tree copy and move integration tests.
//!
//! These tests verify:
//! - A copy reproduces the source tree node for node
//! - Copying twice leaves the same tree as copying once
//! - Moves merge into partially overlapping destinations
//! - Pruning removes the emptied source directories
//! - Timestamps and permissions survive the copy

#[path = "../common/mod.rs"]
mod common;

use common::{Node, TestFixture, populate_sample_tree, snapshot, write_file};
use nestfs::{Error, TreeBuilder, TreeOptions, copy_tree_with, copytree, move_tree_with, movetree};
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};

#[test]
fn test_copy_reproduces_tree() {
    let fixture = TestFixture::new();
    populate_sample_tree(fixture.src.path());
    let dst = fixture.dst.path().join("mirror");

    copytree(fixture.src.path(), &dst).unwrap();

    assert_eq!(snapshot(fixture.src.path()), snapshot(&dst));
}

#[test]
fn test_copy_is_idempotent() {
    let fixture = TestFixture::new();
    populate_sample_tree(fixture.src.path());
    let dst = fixture.dst.path().join("mirror");

    copytree(fixture.src.path(), &dst).unwrap();
    let once = snapshot(&dst);
    let stats = copy_tree_with(fixture.src.path(), &dst, &TreeOptions::default()).unwrap();

    assert_eq!(snapshot(&dst), once);
    assert_eq!(stats.entries_copied, 0);
    assert_eq!(stats.dirs_created, 0);
    assert!(stats.entries_overwritten > 0);
}

#[test]
fn test_copy_keeps_destination_extras() {
    let fixture = TestFixture::new();
    fixture.write_src("conf/app.toml", "new = true");
    fixture.write_dst("conf/app.toml", "old = true");
    fixture.write_dst("conf/local.toml", "mine");

    copytree(fixture.src.path(), fixture.dst.path()).unwrap();

    let conf = fixture.dst.path().join("conf");
    fixture.assert_file_content(&conf.join("app.toml"), "new = true");
    fixture.assert_file_content(&conf.join("local.toml"), "mine");
}

#[test]
fn test_copy_file_over_directory_fails() {
    let fixture = TestFixture::new();
    fixture.write_src("entry", "file");
    fs::create_dir_all(fixture.dst.path().join("entry/inner")).unwrap();

    let result = copytree(fixture.src.path(), fixture.dst.path());

    assert!(matches!(result, Err(Error::IsADirectory(p)) if p == fixture.dst.path().join("entry")));
    assert!(fixture.dst.path().join("entry/inner").is_dir());
}

#[test]
fn test_copy_preserves_timestamps() {
    use filetime::{FileTime, set_file_mtime};

    let fixture = TestFixture::new();
    let src = fixture.write_src("old.txt", "dusty");
    let mtime = FileTime::from_unix_time(1_000_000_000, 0);
    set_file_mtime(&src, mtime).unwrap();

    let dst = fixture.dst.path().join("old.txt");
    copytree(&src, &dst).unwrap();

    let copied = FileTime::from_last_modification_time(&fs::metadata(&dst).unwrap());
    assert_eq!(copied, mtime);
}

#[cfg(unix)]
#[rstest]
#[case::preserved(TreeOptions::default(), 0o640)]
#[case::umask_default(TreeOptions::default().without_permissions(), 0o666)]
fn test_copy_file_permissions(#[case] options: TreeOptions, #[case] expected: u32) {
    use std::os::unix::fs::PermissionsExt;

    let fixture = TestFixture::new();
    let src = fixture.write_src("secret", "s");
    fs::set_permissions(&src, fs::Permissions::from_mode(0o640)).unwrap();

    let dst = fixture.dst.path().join("secret");
    copy_tree_with(&src, &dst, &options).unwrap();

    let mode = fs::metadata(&dst).unwrap().permissions().mode() & 0o777;
    if options.preserve_permissions {
        assert_eq!(mode, expected);
    } else {
        // Whatever the umask leaves of rw-rw-rw-, and never the execute bits.
        assert_eq!(mode & !expected, 0);
    }
}

#[test]
fn test_move_merges_partial_overlap() {
    let fixture = TestFixture::new();
    fixture.write_src("docs/guide.md", "guide v2");
    fixture.write_src("docs/new.md", "new");
    fixture.write_src("bin/tool", "tool");
    fixture.write_dst("docs/guide.md", "guide v1");
    fixture.write_dst("docs/keep.md", "keep");

    let stats = move_tree_with(fixture.src.path(), fixture.dst.path(), &TreeOptions::default())
        .unwrap();

    let dst = fixture.dst.path();
    fixture.assert_file_content(&dst.join("docs/guide.md"), "guide v2");
    fixture.assert_file_content(&dst.join("docs/new.md"), "new");
    fixture.assert_file_content(&dst.join("docs/keep.md"), "keep");
    fixture.assert_file_content(&dst.join("bin/tool"), "tool");

    // `bin` had no counterpart, so it moved whole; `docs` was merged and stays.
    assert!(!fixture.src.path().join("bin").exists());
    assert!(fixture.src.path().join("docs").is_dir());
    assert_eq!(stats.entries_overwritten, 1);
    assert_eq!(stats.entries_moved, 2);
}

#[test]
fn test_move_with_prune_empties_source() {
    let fixture = TestFixture::new();
    let src = fixture.src.path().join("tree");
    let dst = fixture.dst.path().join("tree");
    write_file(&src.join("a/b/one.txt"), "1");
    write_file(&src.join("a/two.txt"), "2");
    fs::create_dir_all(dst.join("a/b")).unwrap();

    let stats = TreeBuilder::new(&src, &dst)
        .prune_merged_dirs()
        .move_tree()
        .unwrap();

    assert!(!src.exists());
    assert_eq!(stats.dirs_pruned, 3);
    fixture.assert_file_content(&dst.join("a/b/one.txt"), "1");
    fixture.assert_file_content(&dst.join("a/two.txt"), "2");
}

#[test]
fn test_move_then_copy_back_matches() {
    let fixture = TestFixture::new();
    let original = fixture.src.path().join("original");
    populate_sample_tree(&original);
    let expected = snapshot(&original);

    let moved = fixture.dst.path().join("moved");
    movetree(&original, &moved).unwrap();
    assert_eq!(snapshot(&moved), expected);

    let restored = fixture.src.path().join("restored");
    copytree(&moved, &restored).unwrap();
    assert_eq!(snapshot(&restored), expected);
}

#[cfg(unix)]
#[test]
fn test_move_relocates_dangling_symlink() {
    use std::os::unix::fs::symlink;

    let fixture = TestFixture::new();
    let link = fixture.src.path().join("dangling");
    symlink("nowhere", &link).unwrap();
    let dst = fixture.dst.path().join("nested/dangling");

    movetree(&link, &dst).unwrap();

    let nodes = snapshot(fixture.dst.path());
    assert_eq!(
        nodes.get(Path::new("nested/dangling")),
        Some(&Node::Symlink(PathBuf::from("nowhere")))
    );
}

#[rstest]
#[case::copy(false)]
#[case::move_tree(true)]
fn test_destination_inside_source_rejected(#[case] moving: bool) {
    let fixture = TestFixture::new();
    populate_sample_tree(fixture.src.path());
    let before = snapshot(fixture.src.path());
    let inner = fixture.src.path().join("src/nested-copy");

    let builder = TreeBuilder::new(fixture.src.path(), &inner);
    let result = if moving { builder.move_tree() } else { builder.copy() };

    assert!(matches!(result, Err(Error::DestinationInsideSource { .. })));
    assert_eq!(snapshot(fixture.src.path()), before);
}
