//! Confinement and path relation integration tests.
//!
//! These tests verify:
//! - Containment answers for the classic `/usr` layouts
//! - `nest_path` never hands out a path outside its root
//! - Leading separators are stripped before joining
//! - Relative path computation from the current directory
//! - Glob pattern detection

#[path = "../common/mod.rs"]
mod common;

use nestfs::{Error, is_glob_pattern, is_nested_in, nest_path, relative_path};
use rstest::rstest;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[cfg(unix)]
#[rstest]
#[case("/usr", "/usr/share")]
#[case("/usr", "/usr/share/locale")]
#[case("/usr/local/../", "/usr/share/locale")]
fn test_usr_nested(#[case] parent: &str, #[case] child: &str) {
    assert!(is_nested_in(Path::new(parent), Path::new(child)));
}

#[cfg(unix)]
#[rstest]
#[case("/usr/share/locale", "/usr")]
#[case("/usr/local", "/usr/share/locale")]
#[case("/usr/share/locale", "/usr/local")]
fn test_usr_not_nested(#[case] parent: &str, #[case] child: &str) {
    assert!(!is_nested_in(Path::new(parent), Path::new(child)));
}

#[cfg(unix)]
#[test]
fn test_nest_path_strips_leading_separators() {
    assert_eq!(
        nest_path(Path::new("/usr"), Path::new("/share/locale")).unwrap(),
        Path::new("/usr/share/locale")
    );
    assert_eq!(
        nest_path(Path::new("/usr"), Path::new("share/locale")).unwrap(),
        Path::new("/usr/share/locale")
    );
}

#[test]
fn test_nesting_is_asymmetric() {
    let root = TempDir::new().unwrap();
    let a = root.path().join("a");
    let b = root.path().join("a/b");
    fs::create_dir_all(&b).unwrap();

    assert!(is_nested_in(&a, &b));
    assert!(!is_nested_in(&b, &a));

    // Both directions only hold for the same resolved location.
    let a_again = root.path().join("a/b/..");
    assert!(is_nested_in(&a, &a_again) && is_nested_in(&a_again, &a));
    assert_eq!(fs::canonicalize(&a).unwrap(), fs::canonicalize(&a_again).unwrap());
}

#[rstest]
#[case("plain/file.txt")]
#[case("/absolute/looking")]
#[case("a/../b")]
#[case("a/b/../../c")]
#[case("..")]
#[case("../sibling")]
#[case("a/../../escape")]
#[case("a/b/c/../../../../x")]
#[case("./././..")]
#[case("deep/./../..//..")]
fn test_nest_path_never_escapes(#[case] untrusted: &str) {
    let root = TempDir::new().unwrap();

    match nest_path(root.path(), Path::new(untrusted)) {
        Ok(joined) => assert!(
            is_nested_in(root.path(), &joined),
            "{untrusted} produced {} outside the root",
            joined.display()
        ),
        Err(Error::ConfinementViolation { root: r, .. }) => assert_eq!(r, root.path()),
        Err(other) => panic!("unexpected error for {untrusted}: {other}"),
    }
}

#[rstest]
#[case("..", false)]
#[case("a/../../escape", false)]
#[case("a/../b", true)]
#[case("/etc/passwd", true)]
fn test_nest_path_outcomes(#[case] untrusted: &str, #[case] allowed: bool) {
    let root = TempDir::new().unwrap();
    assert_eq!(nest_path(root.path(), Path::new(untrusted)).is_ok(), allowed);
}

#[cfg(unix)]
#[test]
fn test_nest_path_rejects_symlink_escape() {
    use std::os::unix::fs::symlink;

    let root = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    symlink(outside.path(), root.path().join("uploads")).unwrap();

    let result = nest_path(root.path(), Path::new("uploads/evil.sh"));
    assert!(matches!(result, Err(Error::ConfinementViolation { .. })));
}

#[cfg(unix)]
#[test]
fn test_nest_path_allows_symlink_within_root() {
    use std::os::unix::fs::symlink;

    let root = TempDir::new().unwrap();
    fs::create_dir(root.path().join("real")).unwrap();
    symlink("real", root.path().join("alias")).unwrap();

    let joined = nest_path(root.path(), Path::new("alias/new.txt")).unwrap();
    assert_eq!(joined, root.path().join("alias/new.txt"));
}

#[test]
fn test_unresolvable_paths_are_not_nested() {
    let root = TempDir::new().unwrap();
    let file = root.path().join("file");
    fs::write(&file, "x").unwrap();

    // A regular file used as a directory cannot be resolved.
    assert!(!is_nested_in(root.path(), &file.join("child")));
}

#[test]
#[serial]
fn test_relative_path_uses_current_dir() {
    let dir = TempDir::new().unwrap();
    let previous = std::env::current_dir().unwrap();
    let _restore = scopeguard::guard(previous, |p| {
        let _ = std::env::set_current_dir(p);
    });
    std::env::set_current_dir(dir.path()).unwrap();

    let cwd = std::env::current_dir().unwrap();
    assert_eq!(
        relative_path(Path::new("store/pkg"), &cwd.join("farm/bin")),
        Path::new("../../store/pkg")
    );
    assert_eq!(
        relative_path(&cwd.join("x"), Path::new("x")),
        Path::new(".")
    );
}

#[test]
#[serial]
fn test_nest_path_relative_root() {
    let dir = TempDir::new().unwrap();
    let previous = std::env::current_dir().unwrap();
    let _restore = scopeguard::guard(previous, |p| {
        let _ = std::env::set_current_dir(p);
    });
    std::env::set_current_dir(dir.path()).unwrap();
    fs::create_dir("root").unwrap();

    assert_eq!(
        nest_path(Path::new("root"), Path::new("/a/b")).unwrap(),
        PathBuf::from("root/a/b")
    );
    assert!(nest_path(Path::new("root"), Path::new("../outside")).is_err());
}

#[rstest]
#[case("*.png", true)]
#[case("a/b/**/*.png", true)]
#[case("a/**/a.png", true)]
#[case("a/*/a.png", true)]
#[case("a/b/a.png", false)]
fn test_is_glob_pattern(#[case] pattern: &str, #[case] expected: bool) {
    assert_eq!(is_glob_pattern(pattern), expected);
    assert_eq!(is_glob_pattern(Path::new(pattern)), expected);
}

#[test]
fn test_nest_path_result_usable_for_writes() {
    let fixture = common::TestFixture::new();
    let target = nest_path(fixture.dst.path(), Path::new("/reports/2024/summary.txt")).unwrap();

    common::write_file(&target, "ok");
    fixture.assert_file_content(&fixture.dst.path().join("reports/2024/summary.txt"), "ok");
}
