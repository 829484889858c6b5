//! Behaviour-driven tests for checksum manifest verification.
//!
//! Scenarios write real artifact and manifest files into a temporary
//! directory and check the report rows the verifier prints.

use artifacts_pipeline::checksum::digest::sha256_reader;
use artifacts_pipeline::checksum::verify_manifest;
use artifacts_pipeline::fs::SystemFileSystem;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

struct ChecksumWorld {
    _temp: TempDir,
    dir: Utf8PathBuf,
    manifest: Option<Utf8PathBuf>,
    report: Vec<String>,
    passed: Option<bool>,
}

#[fixture]
fn world() -> ChecksumWorld {
    let temp = tempfile::tempdir().expect("temp dir");
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp path");
    ChecksumWorld {
        _temp: temp,
        dir,
        manifest: None,
        report: Vec::new(),
        passed: None,
    }
}

impl ChecksumWorld {
    fn write_manifest(&mut self, text: &str) {
        let path = self.dir.join("release.sha256");
        std::fs::write(&path, text).expect("write manifest");
        self.manifest = Some(path);
    }

    fn verify(&mut self, dry_run: bool) {
        let manifest = self.manifest.clone().expect("manifest written");
        let mut out = Vec::new();
        let passed = verify_manifest(&SystemFileSystem, &manifest, dry_run, &mut out)
            .expect("manifest readable");
        self.passed = Some(self.passed.unwrap_or(true) && passed);
        self.report.extend(
            String::from_utf8_lossy(&out)
                .lines()
                .map(str::to_owned),
        );
    }

    fn tagged_rows(&self) -> Vec<&String> {
        self.report.iter().filter(|row| row.starts_with('[')).collect()
    }
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("an artifact file \"{file}\" containing \"{content}\"")]
fn given_artifact_file(world: &mut ChecksumWorld, file: String, content: String) {
    std::fs::write(world.dir.join(file), content).expect("write artifact");
}

#[given("a manifest listing the digest of \"{file}\"")]
fn given_manifest_for_file(world: &mut ChecksumWorld, file: String) {
    let bytes = std::fs::read(world.dir.join(&file)).expect("read artifact");
    let digest = sha256_reader(bytes.as_slice()).expect("hash");
    world.write_manifest(&format!("{digest}  {file}\n"));
}

#[given("the artifact file \"{file}\" now contains \"{content}\"")]
fn given_artifact_changed(world: &mut ChecksumWorld, file: String, content: String) {
    std::fs::write(world.dir.join(file), content).expect("rewrite artifact");
}

#[given("a manifest listing \"{first}\" and \"{second}\" which do not exist")]
fn given_manifest_for_missing_files(world: &mut ChecksumWorld, first: String, second: String) {
    world.write_manifest(&format!("aaaa  {first}\n\nnot-an-entry\nbbbb *{second}\n"));
}

#[when("verification runs once")]
fn when_verification_runs_once(world: &mut ChecksumWorld) {
    world.verify(false);
}

#[when("verification runs twice")]
fn when_verification_runs_twice(world: &mut ChecksumWorld) {
    world.verify(false);
    world.verify(false);
}

#[when("verification runs in dry-run mode")]
fn when_verification_runs_dry(world: &mut ChecksumWorld) {
    world.verify(true);
}

#[then("every report row is tagged \"{tag}\"")]
fn then_every_row_tagged(world: &mut ChecksumWorld, tag: String) {
    let rows = world.tagged_rows();
    assert!(!rows.is_empty(), "expected report rows");
    for row in rows {
        assert!(row.starts_with(&tag), "row {row:?} should start with {tag}");
    }
}

#[then("the first report row is tagged \"{tag}\" for \"{file}\"")]
fn then_first_row(world: &mut ChecksumWorld, tag: String, file: String) {
    let expected = format!("{tag:<9} {}", world.dir.join(file));
    assert_eq!(world.report.first(), Some(&expected));
}

#[then("the mismatch detail rows follow")]
fn then_mismatch_detail(world: &mut ChecksumWorld) {
    let [_, expected, actual, diff] = world.report.as_slice() else {
        panic!("expected four rows, got {:?}", world.report);
    };
    let expected = expected.strip_prefix("          expected: ").expect("expected row");
    let actual = actual.strip_prefix("          actual:   ").expect("actual row");
    let diff = diff.strip_prefix("          diff:     ").expect("diff row");
    assert_ne!(expected, actual);
    assert_eq!(diff.len(), expected.len().max(actual.len()));
    assert!(diff.contains('^'));
}

#[then("the report has {count:usize} rows")]
fn then_report_rows(world: &mut ChecksumWorld, count: usize) {
    assert_eq!(world.tagged_rows().len(), count);
}

#[then("the manifest passes")]
fn then_manifest_passes(world: &mut ChecksumWorld) {
    assert_eq!(world.passed, Some(true));
}

#[then("the manifest fails")]
fn then_manifest_fails(world: &mut ChecksumWorld) {
    assert_eq!(world.passed, Some(false));
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/checksum.feature",
    name = "An unchanged artifact verifies on every run"
)]
fn scenario_unchanged_artifact(world: ChecksumWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/checksum.feature",
    name = "A mutated byte is reported with a diff"
)]
fn scenario_mutated_byte(world: ChecksumWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/checksum.feature",
    name = "Dry-run reports every well-formed entry as ok"
)]
fn scenario_dry_run_manifest(world: ChecksumWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/checksum.feature",
    name = "Missing artifact files are reported without stopping"
)]
fn scenario_missing_files(world: ChecksumWorld) {
    let _ = world;
}
