// src/packages/rpm_query.rs

//! Read package metadata from RPM archives
//!
//! This module queries archives with the `rpm` command-line tool and turns
//! its output into `PackageRecord` values. The tool itself sits behind the
//! `QueryService` trait so parsing can be exercised without rpm installed.

use crate::error::{Error, Result};
use crate::packages::traits::{PackageRecord, PayloadEntry, QueryService};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Query format for name, release and source flag
const INFO_QUERY_FORMAT: &str = "%{name} %{release} %{sourcepackage}";

/// `--dump` column indexes
const DUMP_PATH: usize = 0;
const DUMP_DIGEST: usize = 3;
const DUMP_MODE: usize = 4;
const DUMP_USER: usize = 5;
const DUMP_GROUP: usize = 6;
const DUMP_CONFIG: usize = 7;
const DUMP_LINK: usize = 10;

/// `QueryService` backed by the rpm binary
#[derive(Debug, Clone)]
pub struct RpmCommand {
    binary: String,
}

impl RpmCommand {
    /// Use the given rpm binary (name on PATH or absolute path)
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for RpmCommand {
    fn default() -> Self {
        Self::new("rpm")
    }
}

impl QueryService for RpmCommand {
    fn invoke(&self, args: &[&str]) -> Result<String> {
        // output() waits for the child and drops its pipes on every path
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| {
                Error::QueryError(format!(
                    "Failed to run {}: {}. Is rpm installed?",
                    self.binary, e
                ))
            })?;

        if !output.status.success() {
            return Err(Error::QueryError(format!(
                "{} {} failed: {}",
                self.binary,
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Reads `PackageRecord`s from archives through a `QueryService`
#[derive(Debug, Clone, Default)]
pub struct RpmReader<Q> {
    query: Q,
}

impl<Q: QueryService> RpmReader<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }

    /// Read name, distribution, payload and scriptlets of an archive
    pub fn read(&self, path: &Path) -> Result<PackageRecord> {
        let display = path.to_string_lossy();
        let file: &str = &display;
        debug!("Reading package metadata: {}", file);

        let read_err = |e: Error| Error::ReadError {
            path: file.to_string(),
            reason: e.to_string(),
        };

        let info = self
            .query
            .invoke(&["-qp", "--qf", INFO_QUERY_FORMAT, file])
            .map_err(read_err)?;
        let (name, dist, is_source) = parse_package_info(&info);

        let dump = self
            .query
            .invoke(&["-qp", "--dump", file])
            .map_err(read_err)?;
        let payload = parse_dump(&dump);

        let scriptlets = self
            .query
            .invoke(&["-qp", "--scripts", file])
            .map_err(read_err)?;

        let record = PackageRecord {
            name,
            dist,
            scriptlets,
            payload,
            is_source,
        };

        debug!("Read package {}: {}", file, record);
        Ok(record)
    }

    /// Check that the file is a readable rpm package
    pub fn is_package(&self, path: &Path) -> bool {
        let display = path.to_string_lossy();
        self.query.invoke(&["-qp", &*display]).is_ok()
    }
}

/// Parse `%{name} %{release} %{sourcepackage}` output
fn parse_package_info(data: &str) -> (String, String, bool) {
    let mut fields = data.split_whitespace();

    let name = fields.next().unwrap_or_default().to_string();
    let dist = extract_dist(fields.next().unwrap_or_default());
    let is_source = fields.next() == Some("1");

    (name, dist, is_source)
}

/// Distribution tag is whatever follows the last '.' of the release
pub fn extract_dist(release: &str) -> String {
    match release.rfind('.') {
        Some(idx) => release[idx + 1..].to_string(),
        None => release.to_string(),
    }
}

/// Parse `rpm --dump` output into payload entries
pub fn parse_dump(data: &str) -> Vec<PayloadEntry> {
    data.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_dump_line)
        .collect()
}

/// Parse a single `--dump` line
///
/// Format: path size mtime digest mode owner group isconfig isdoc rdev symlink
pub fn parse_dump_line(line: &str) -> PayloadEntry {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let field = |idx: usize| fields.get(idx).copied().unwrap_or_default();

    let empty_digest = field(DUMP_DIGEST).trim_matches('0').is_empty();
    let link = field(DUMP_LINK);

    PayloadEntry {
        path: field(DUMP_PATH).to_string(),
        user: field(DUMP_USER).to_string(),
        group: field(DUMP_GROUP).to_string(),
        mode: parse_mode(field(DUMP_MODE)),
        is_config: field(DUMP_CONFIG) == "1",
        is_dir: link == "X" && empty_digest,
        is_link: link != "X" && empty_digest,
    }
}

/// Permission bits from the last four octal digits of the raw mode
///
/// Malformed values degrade to zero.
fn parse_mode(raw: &str) -> u32 {
    let start = raw.char_indices().rev().nth(3).map_or(0, |(idx, _)| idx);
    let tail = &raw[start..];

    match u32::from_str_radix(tail, 8) {
        Ok(mode) => mode,
        Err(_) => {
            debug!("Malformed mode field '{}', using 0", raw);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Canned rpm responses keyed by the query kind
    struct FakeRpm {
        info: String,
        dump: String,
        scripts: String,
        fail: bool,
        calls: RefCell<Vec<String>>,
    }

    impl FakeRpm {
        fn new(info: &str, dump: &str, scripts: &str) -> Self {
            Self {
                info: info.to_string(),
                dump: dump.to_string(),
                scripts: scripts.to_string(),
                fail: false,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new("", "", "")
            }
        }
    }

    impl QueryService for FakeRpm {
        fn invoke(&self, args: &[&str]) -> Result<String> {
            self.calls.borrow_mut().push(args.join(" "));

            if self.fail {
                return Err(Error::QueryError("not an rpm package".to_string()));
            }

            Ok(match args.get(1).copied() {
                Some("--qf") => self.info.clone(),
                Some("--dump") => self.dump.clone(),
                Some("--scripts") => self.scripts.clone(),
                _ => String::new(),
            })
        }
    }

    const ZERO_DIGEST: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    #[test]
    fn test_extract_dist() {
        assert_eq!(extract_dist("1.el7"), "el7");
        assert_eq!(extract_dist("0.3.rc1.el8_4"), "el8_4");
        assert_eq!(extract_dist("1"), "1");
        assert_eq!(extract_dist(""), "");
    }

    #[test]
    fn test_parse_package_info() {
        assert_eq!(
            parse_package_info("demo 2.el7 (none)"),
            ("demo".to_string(), "el7".to_string(), false)
        );
        assert_eq!(
            parse_package_info("demo 2.el7 1"),
            ("demo".to_string(), "el7".to_string(), true)
        );
    }

    #[test]
    fn test_parse_dump_regular_file() {
        let line = "/usr/bin/demo 1024 1600000000 \
                    3f2a6c1e9b0d4a7f8e5c2b1a0f9e8d7c6b5a4f3e2d1c0b9a8f7e6d5c4b3a2f1e \
                    0100755 root root 0 0 0 X";
        let entry = parse_dump_line(line);

        assert_eq!(entry.path, "/usr/bin/demo");
        assert_eq!(entry.mode, 0o755);
        assert_eq!(entry.user, "root");
        assert_eq!(entry.group, "root");
        assert!(!entry.is_config);
        assert!(!entry.is_dir);
        assert!(!entry.is_link);
    }

    #[test]
    fn test_parse_dump_directory_and_link() {
        let dir = parse_dump_line(&format!(
            "/etc/demo 4096 1600000000 {} 040750 demo demo 1 0 0 X",
            ZERO_DIGEST
        ));
        assert!(dir.is_dir);
        assert!(!dir.is_link);
        assert!(dir.is_config);
        assert_eq!(dir.mode, 0o750);

        let link = parse_dump_line(&format!(
            "/usr/lib64/libdemo.so.1 16 1600000000 {} 0120777 root root 0 0 0 libdemo.so.1.2.3",
            ZERO_DIGEST
        ));
        assert!(link.is_link);
        assert!(!link.is_dir);
    }

    #[test]
    fn test_parse_dump_malformed_mode_degrades() {
        let entry = parse_dump_line("/usr/bin/demo 1 1 abc 01x0zz root root 0 0 0 X");
        assert_eq!(entry.mode, 0);
        assert_eq!(entry.path, "/usr/bin/demo");
    }

    #[test]
    fn test_parse_dump_short_line() {
        let entry = parse_dump_line("/usr/bin/demo");
        assert_eq!(entry.path, "/usr/bin/demo");
        assert_eq!(entry.mode, 0);
        assert!(entry.user.is_empty());
        // No digest and no link marker
        assert!(entry.is_link);
    }

    #[test]
    fn test_parse_dump_skips_blank_lines() {
        let dump = "\n/usr/bin/a 1 1 ab 0100755 root root 0 0 0 X\n\n";
        assert_eq!(parse_dump(dump).len(), 1);
    }

    #[test]
    fn test_parse_mode_keeps_special_bits() {
        assert_eq!(parse_mode("0104755"), 0o4755);
        assert_eq!(parse_mode("755"), 0o755);
        assert_eq!(parse_mode(""), 0);
    }

    #[test]
    fn test_reader_builds_record() {
        let rpm = FakeRpm::new(
            "demo 1.el7 (none)",
            "/usr/bin/demo 1 1 ab 0100755 root root 0 0 0 X\n",
            "postinstall scriptlet (using /bin/sh):\nuseradd -r demo\n",
        );
        let reader = RpmReader::new(&rpm);

        let record = reader.read(Path::new("/tmp/demo.rpm")).unwrap();

        assert_eq!(record.name, "demo");
        assert_eq!(record.dist, "el7");
        assert!(!record.is_source);
        assert_eq!(record.payload.len(), 1);
        assert!(record.scriptlets.contains("useradd -r demo"));

        let calls = rpm.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.starts_with("-qp") && c.ends_with("/tmp/demo.rpm")));
    }

    #[test]
    fn test_reader_failure_is_read_error() {
        let reader = RpmReader::new(FakeRpm::failing());

        let err = reader.read(Path::new("/tmp/broken.rpm")).unwrap_err();
        match err {
            Error::ReadError { path, reason } => {
                assert_eq!(path, "/tmp/broken.rpm");
                assert!(reason.contains("not an rpm package"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_is_package() {
        let ok = RpmReader::new(FakeRpm::new("", "", ""));
        assert!(ok.is_package(Path::new("/tmp/demo.rpm")));

        let bad = RpmReader::new(FakeRpm::failing());
        assert!(!bad.is_package(Path::new("/tmp/demo.txt")));
    }

    #[test]
    fn test_rpm_command_missing_binary() {
        let rpm = RpmCommand::new("/nonexistent/bin/rpm-for-tests");
        let err = rpm.invoke(&["--version"]).unwrap_err();
        assert!(matches!(err, Error::QueryError(_)));
    }
}
