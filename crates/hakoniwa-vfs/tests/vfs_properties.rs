//! Integration tests for the VFS through its public API.
//!
//! Archives are written to a tempdir with `zip::ZipWriter` and imported the
//! same way the shell does it, via `VirtualFs::load`.

use std::io::Write;
use std::path::{Path, PathBuf};

use hakoniwa_vfs::import::{self, ERROR_FILE};
use hakoniwa_vfs::{Content, DirEntry, Origin, Touched, VfsError, VirtualFs};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

// ============================================================================
// Helpers
// ============================================================================

fn write_zip(dir: &Path, members: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join("seed.zip");
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, bytes) in members {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(bytes).unwrap();
        }
    }
    writer.finish().unwrap();
    path
}

fn names(fs: &VirtualFs, path: &str) -> Vec<String> {
    fs.list_directory(path)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn round_trip_create_then_read() {
    let mut fs = VirtualFs::new();
    for (path, content) in [
        ("/tmp/a.txt", "plain"),
        ("/home/unicode.txt", "データ ✓"),
        ("/tmp/empty", ""),
        ("/tmp/multi.txt", "line one\nline two\n"),
    ] {
        fs.create_file(path, content, false).unwrap();
        assert_eq!(fs.read_file(path).unwrap(), &Content::Text(content.to_string()));
    }
}

#[test]
fn touch_only_moves_modified_forward() {
    let mut fs = VirtualFs::new();
    fs.create_file("/tmp/t.txt", "keep me", false).unwrap();
    let first = fs.file("/tmp/t.txt").unwrap().clone();

    assert_eq!(fs.create_file("/tmp/t.txt", "", false).unwrap(), Touched::TimestampUpdated);
    let second = fs.file("/tmp/t.txt").unwrap().clone();
    assert_eq!(fs.create_file("/tmp/t.txt", "", false).unwrap(), Touched::TimestampUpdated);
    let third = fs.file("/tmp/t.txt").unwrap().clone();

    for file in [&second, &third] {
        assert_eq!(file.content().as_str(), "keep me");
        assert_eq!(file.created(), first.created());
        assert!(file.modified() >= file.created());
    }
    assert!(second.modified() >= first.modified());
    assert!(third.modified() >= second.modified());
}

#[test]
fn root_escape_is_an_error_not_a_clamp() {
    let fs = VirtualFs::new();
    let err = fs.resolve("/../../x").unwrap_err();
    assert!(matches!(err, VfsError::PathEscapesRoot(_)));
    assert_eq!(err.kind().to_string(), "PathEscapesRoot");

    assert!(matches!(fs.list_directory(".."), Err(VfsError::PathEscapesRoot(_))));
}

#[test]
fn scaffold_listing_order() {
    let fs = VirtualFs::new();
    assert_eq!(
        fs.list_directory("/").unwrap(),
        vec![
            DirEntry::directory("home"),
            DirEntry::directory("tmp"),
            DirEntry::file("readme.txt"),
        ]
    );
    assert_eq!(names(&fs, "/home"), ["text.txt"]);
    assert!(names(&fs, "/tmp").is_empty());
}

#[test]
fn archive_nesting() {
    let tmp = TempDir::new().unwrap();
    let zip = write_zip(tmp.path(), &[("a/b/c.txt", b"nested content")]);

    let fs = VirtualFs::load(Some(&zip));
    assert_eq!(fs.origin(), &Origin::Archive(zip.clone()));
    assert_eq!(fs.list_directory("/").unwrap(), vec![DirEntry::directory("a")]);
    assert_eq!(fs.list_directory("/a").unwrap(), vec![DirEntry::directory("b")]);
    assert_eq!(fs.list_directory("/a/b").unwrap(), vec![DirEntry::file("c.txt")]);
    assert_eq!(
        fs.read_file("/a/b/c.txt").unwrap(),
        &Content::Text("nested content".into())
    );
}

#[test]
fn archive_preserves_member_order_and_empty_dirs() {
    let tmp = TempDir::new().unwrap();
    let zip = write_zip(
        tmp.path(),
        &[
            ("zeta.txt", b"z"),
            ("docs/", b""),
            ("alpha/one.txt", b"1"),
            ("docs/readme.md", b"# hi"),
            ("empty/", b""),
        ],
    );

    let fs = VirtualFs::load(Some(&zip));
    assert_eq!(names(&fs, "/"), ["zeta.txt", "docs", "alpha", "empty"]);
    assert_eq!(names(&fs, "/docs"), ["readme.md"]);
    assert!(names(&fs, "/empty").is_empty());
}

#[test]
fn archive_binary_member_keeps_tag() {
    let tmp = TempDir::new().unwrap();
    let zip = write_zip(tmp.path(), &[("bin/tool", &[0x7f, 0x45, 0x4c, 0x46, 0xff])]);

    let fs = VirtualFs::load(Some(&zip));
    let content = fs.read_file("/bin/tool").unwrap();
    assert!(content.is_binary());
    assert_eq!(content.as_str(), "f0VMRv8=");
}

#[test]
fn archive_collision_degrades() {
    let tmp = TempDir::new().unwrap();
    let zip = write_zip(tmp.path(), &[("a", b"file"), ("a/b", b"nested")]);

    let fs = VirtualFs::load(Some(&zip));
    assert!(fs.origin().is_degraded());
    assert_eq!(names(&fs, "/"), [ERROR_FILE]);
    let text = fs.read_file(&format!("/{ERROR_FILE}")).unwrap();
    assert!(text.as_str().contains("conflicts"));
}

#[test]
fn not_a_zip_degrades_but_stays_usable() {
    let tmp = TempDir::new().unwrap();
    let bogus = tmp.path().join("bogus.zip");
    std::fs::write(&bogus, "this is not an archive").unwrap();

    let mut fs = VirtualFs::load(Some(&bogus));
    match fs.origin() {
        Origin::Degraded { source, reason } => {
            assert_eq!(source, &bogus);
            assert!(!reason.is_empty());
        }
        other => panic!("expected degraded origin, got {other:?}"),
    }

    // Degraded, but every operation still works.
    fs.create_file("/scratch.txt", "ok", false).unwrap();
    assert_eq!(names(&fs, "/"), [ERROR_FILE, "scratch.txt"]);
    assert_eq!(fs.current_path(), "/");
}

#[test]
fn backslash_member_is_reachable() {
    let tmp = TempDir::new().unwrap();
    let zip = write_zip(tmp.path(), &[("win\\note.txt", b"from windows")]);

    let mut fs = VirtualFs::load(Some(&zip));
    assert_eq!(fs.origin(), &Origin::Archive(zip.clone()));
    assert_eq!(fs.list_directory("/").unwrap(), vec![DirEntry::directory("win")]);
    assert_eq!(fs.read_file("win/note.txt").unwrap().as_str(), "from windows");
    assert_eq!(fs.read_file("win\\note.txt").unwrap().as_str(), "from windows");

    fs.remove_file("/win/note.txt").unwrap();
    assert!(names(&fs, "/win").is_empty());
}

#[test]
fn deletion_isolation() {
    let mut fs = VirtualFs::new();
    fs.create_file("/tmp/x.txt", "x", false).unwrap();
    fs.create_file("/tmp/y.txt", "y", false).unwrap();

    fs.remove_file("/tmp/x.txt").unwrap();
    assert_eq!(fs.list_directory("/tmp").unwrap(), vec![DirEntry::file("y.txt")]);
    assert_eq!(fs.read_file("/tmp/y.txt").unwrap().as_str(), "y");
}

#[test]
fn directory_deletion_rejected() {
    let mut fs = VirtualFs::new();
    let before = fs.list_directory("/").unwrap();

    let err = fs.remove_file("/home").unwrap_err();
    assert!(matches!(err, VfsError::IsADirectory(_)));

    assert_eq!(fs.list_directory("/").unwrap(), before);
    assert_eq!(names(&fs, "/home"), ["text.txt"]);
}

#[test]
fn failed_cd_leaves_current_path() {
    let mut fs = VirtualFs::new();
    fs.change_directory("/tmp").unwrap();
    assert!(fs.change_directory("/nope").is_err());
    assert_eq!(fs.current_path(), "/tmp");
}

#[test]
fn cd_normalizes_relative_paths() {
    let mut fs = VirtualFs::new();
    fs.create_file("/home/f", "", false).unwrap();
    fs.change_directory("home/../tmp/../home/.").unwrap();
    assert_eq!(fs.current_path(), "/home");
    assert_eq!(names(&fs, "."), ["text.txt", "f"]);
}

#[test]
fn strict_reader_reports_errors() {
    let err = import::read_archive(std::io::Cursor::new(Vec::new()), chrono::Utc::now())
        .unwrap_err();
    assert_eq!(err.kind(), hakoniwa_vfs::ErrorKind::ArchiveLoadError);
}
