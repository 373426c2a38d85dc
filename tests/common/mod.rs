#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use dircache::artifacts::index::index_entry::{CacheTime, EntryMetadata, IndexEntry};
use dircache::artifacts::objects::object_id::ObjectId;
use std::path::{Path, PathBuf};

pub fn dircache(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dircache").expect("dircache binary is built");
    cmd.current_dir(dir)
        .env_remove("DB_ENVIRONMENT")
        .env_remove("COMMITTER_NAME")
        .env_remove("COMMITTER_EMAIL")
        .env_remove("COMMITTER_DATE")
        .env("USER", "tester")
        .env("HOSTNAME", "example.org");
    cmd
}

/// Fresh directory with `init-db` already run in it
pub fn init_repository() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    dircache(dir.path()).arg("init-db").assert().success();
    dir
}

pub fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("command runs");
    assert!(output.status.success(), "command failed: {output:?}");
    String::from_utf8(output.stdout).expect("utf-8 stdout").trim().to_string()
}

pub fn sample_entries() -> Vec<IndexEntry> {
    vec![
        IndexEntry::new(
            PathBuf::from("Makefile"),
            ObjectId::hash(b"blob 0\0"),
            EntryMetadata {
                ctime: CacheTime::new(1_112_911_993, 0),
                mtime: CacheTime::new(1_112_911_993, 5),
                dev: 769,
                ino: 1_466_218,
                mode: 0o100644,
                uid: 1000,
                gid: 1000,
                size: 0,
            },
        ),
        IndexEntry::new(
            PathBuf::from("src/read-cache.c"),
            ObjectId::hash(b"blob 4\0code"),
            EntryMetadata {
                mode: 0o100755,
                size: 4,
                ..Default::default()
            },
        ),
    ]
}

// Helper function to create hexdump representation
pub fn to_hexdump(data: &[u8]) -> String {
    let mut result = String::new();
    for (i, chunk) in data.chunks(16).enumerate() {
        result.push_str(&format!("{:08x}: ", i * 16));

        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                result.push(' ');
            }
            result.push_str(&format!("{:02x} ", byte));
        }

        for j in chunk.len()..16 {
            if j == 8 {
                result.push(' ');
            }
            result.push_str("   ");
        }

        result.push_str(" |");
        for byte in chunk {
            if byte.is_ascii_graphic() {
                result.push(*byte as char);
            } else {
                result.push('.');
            }
        }
        result.push_str("|\n");
    }
    result
}

// Compare two index images, showing a hexdump diff on failure
#[macro_export]
macro_rules! assert_index_eq {
    ($actual:expr, $expected:expr) => {
        if $actual != $expected {
            pretty_assertions::assert_eq!(
                common::to_hexdump($actual),
                common::to_hexdump($expected),
                "\n=== INDEX CONTENTS DIFFER ===\nactual ({} bytes) vs expected ({} bytes)",
                $actual.len(),
                $expected.len()
            );
        }
    };
}
