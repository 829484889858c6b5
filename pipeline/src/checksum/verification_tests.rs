//! Tests for checksum verification against real and in-memory files.

use super::*;
use crate::checksum::digest::sha256_reader;
use crate::fs::{MockFileSystem, SystemFileSystem};
use crate::test_utils::{FailingWriter, RecordingFileSystem};
use rstest::{fixture, rstest};
use std::io;
use tempfile::TempDir;

const PAYLOAD: &[u8] = b"EkoScape release payload";
const DEADBEEF: &str = "deadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef";

struct Workspace {
    _temp: TempDir,
    dir: Utf8PathBuf,
}

impl Workspace {
    fn write(&self, name: &str, bytes: &[u8]) -> Utf8PathBuf {
        let path = self.dir.join(name);
        std::fs::write(&path, bytes).expect("write file");
        path
    }
}

#[fixture]
fn workspace() -> Workspace {
    let temp = tempfile::tempdir().expect("temp dir");
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp path");
    Workspace { _temp: temp, dir }
}

fn digest_of(bytes: &[u8]) -> String {
    sha256_reader(bytes).expect("hash")
}

fn lines(out: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(out).lines().map(str::to_owned).collect()
}

#[rstest]
#[case::same("abc", "abc", "   ")]
#[case::middle("abc", "aXc", " ^ ")]
#[case::longer_actual("ab", "abcd", "  ^^")]
#[case::longer_expected("abcd", "a", " ^^^")]
#[case::empty("", "", "")]
fn diff_marker_flags_differences(#[case] expected: &str, #[case] actual: &str, #[case] marker: &str) {
    assert_eq!(diff_marker(expected, actual), marker);
}

#[rstest]
fn matching_file_is_ok_on_repeat(workspace: Workspace) {
    let file = workspace.write("EkoScape.zip", PAYLOAD);
    let expected = digest_of(PAYLOAD);

    for _ in 0..2 {
        let mut out = Vec::new();
        let result = verify_one(&SystemFileSystem, &file, &expected, false, &mut out).expect("verify");
        assert_eq!(result, CheckResult::Ok);
        assert_eq!(lines(&out), [format!("[ok]      {file}")]);
    }
}

#[rstest]
fn mutated_byte_reports_bad_hex_with_diff(workspace: Workspace) {
    let expected = digest_of(PAYLOAD);
    let mut mutated = PAYLOAD.to_vec();
    if let Some(byte) = mutated.first_mut() {
        *byte ^= 0xff;
    }
    let file = workspace.write("EkoScape.zip", &mutated);

    let mut out = Vec::new();
    let result = verify_one(&SystemFileSystem, &file, &expected, false, &mut out).expect("verify");

    let CheckResult::Mismatch { actual, .. } = &result else {
        panic!("expected mismatch, got {result:?}");
    };
    let report = lines(&out);
    let [tag_row, expected_row, actual_row, diff_row] = report.as_slice() else {
        panic!("expected four rows, got {report:?}");
    };
    assert_eq!(tag_row, &format!("[BAD hex] {file}"));
    assert_eq!(expected_row, &format!("          expected: {expected}"));
    assert_eq!(actual_row, &format!("          actual:   {actual}"));
    let marker = diff_row.strip_prefix("          diff:     ").expect("diff row");
    assert_eq!(marker.len(), expected.len().max(actual.len()));
    assert!(marker.contains('^'));
}

#[rstest]
fn uppercase_digest_does_not_match(workspace: Workspace) {
    let file = workspace.write("EkoScape.zip", PAYLOAD);
    let expected = digest_of(PAYLOAD).to_uppercase();
    let result =
        verify_one(&SystemFileSystem, &file, &expected, false, &mut Vec::new()).expect("verify");
    assert!(!result.is_ok());
}

#[rstest]
fn missing_file_is_reported_without_error(workspace: Workspace) {
    let file = workspace.dir.join("absent.zip");
    let mut out = Vec::new();
    let result = verify_one(&SystemFileSystem, &file, "deadbeef", false, &mut out).expect("verify");
    assert_eq!(result, CheckResult::MissingFile);
    assert_eq!(lines(&out), [format!("[NO file] {file}")]);
}

#[rstest]
fn dry_run_reports_ok_without_reading(workspace: Workspace) {
    let file = workspace.dir.join("absent.zip");
    let mut out = Vec::new();
    let result = verify_one(&SystemFileSystem, &file, "deadbeef", true, &mut out).expect("verify");
    assert_eq!(result, CheckResult::Ok);
    assert_eq!(lines(&out), [format!("[ok]      {file}")]);
}

#[rstest]
fn manifest_reports_every_entry_and_ands_results(workspace: Workspace) {
    workspace.write("good.zip", PAYLOAD);
    workspace.write("bad.zip", b"tampered");
    let manifest = workspace.write(
        "release.sha256",
        format!(
            "{good}  bad.zip\n{good} *good.zip\n\n{good}  gone.zip\n",
            good = digest_of(PAYLOAD)
        )
        .as_bytes(),
    );

    let mut out = Vec::new();
    let ok = verify_manifest(&SystemFileSystem, &manifest, false, &mut out).expect("verify");

    assert!(!ok);
    let tags: Vec<String> = lines(&out)
        .into_iter()
        .filter(|line| line.starts_with('['))
        .collect();
    assert_eq!(
        tags,
        [
            format!("[BAD hex] {}", workspace.dir.join("bad.zip")),
            format!("[ok]      {}", workspace.dir.join("good.zip")),
            format!("[NO file] {}", workspace.dir.join("gone.zip")),
        ]
    );
}

#[rstest]
fn dry_run_manifest_passes_every_well_formed_entry(workspace: Workspace) {
    let manifest = workspace.write("release.sha256", b"aaaa  one.zip\nbbbb  two.zip\njunk\n");
    let mut out = Vec::new();
    assert!(verify_manifest(&SystemFileSystem, &manifest, true, &mut out).expect("verify"));
    assert_eq!(lines(&out).len(), 2);
    assert!(lines(&out).iter().all(|line| line.starts_with("[ok]")));
}

#[rstest]
fn empty_manifest_passes(workspace: Workspace) {
    let manifest = workspace.write("release.sha256", b"\n\n");
    assert!(verify_manifest(&SystemFileSystem, &manifest, false, &mut Vec::new()).expect("verify"));
}

#[rstest]
fn unreadable_manifest_is_an_io_error(workspace: Workspace) {
    let manifest = workspace.dir.join("absent.sha256");
    let err = verify_manifest(&SystemFileSystem, &manifest, false, &mut Vec::new())
        .expect_err("missing manifest");
    assert!(matches!(err, PipelineError::Io { path, .. } if path == manifest));
}

#[test]
fn target_existence_is_asked_of_the_filesystem() {
    let mut fs = MockFileSystem::new();
    fs.expect_is_file()
        .withf(|path| path.as_str() == "build/artifacts/EkoScape.zip")
        .times(1)
        .return_const(false);
    fs.expect_open().never();

    let mut out = Vec::new();
    let result = verify_one(
        &fs,
        Utf8Path::new("build/artifacts/EkoScape.zip"),
        DEADBEEF,
        false,
        &mut out,
    )
    .expect("verify");

    assert_eq!(result, CheckResult::MissingFile);
    assert_eq!(lines(&out), ["[NO file] build/artifacts/EkoScape.zip"]);
}

#[test]
fn unreadable_target_is_an_io_error() {
    let mut fs = MockFileSystem::new();
    fs.expect_is_file().return_const(true);
    fs.expect_open()
        .returning(|_| Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked")));

    let err = verify_one(
        &fs,
        Utf8Path::new("build/artifacts/EkoScape.zip"),
        DEADBEEF,
        false,
        &mut Vec::new(),
    )
    .expect_err("unreadable");

    assert!(matches!(
        err,
        PipelineError::Io { ref path, .. } if path == "build/artifacts/EkoScape.zip"
    ));
}

#[test]
fn report_write_failure_is_returned() {
    let err = verify_one(
        &RecordingFileSystem::new(),
        Utf8Path::new("build/artifacts/EkoScape.zip"),
        DEADBEEF,
        true,
        &mut FailingWriter,
    )
    .expect_err("write fails");

    assert!(
        matches!(err, PipelineError::WriteFailed { .. }),
        "expected WriteFailed error, got: {err:?}"
    );
}
