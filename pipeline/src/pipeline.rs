//! Stage orchestration over the active artifact set.
//!
//! Stages run in their fixed order. Within a stage each active artifact is
//! handed to the stage action, which reports a [`StageOutcome`]. Stages that
//! track results print a banner per channel and stop the whole run on the
//! first failure; stages that pace wait between artifacts so rate-limited
//! services are not hit in bursts. Nothing is rolled back when a run stops.

use crate::artifact::{ActiveSet, Arch, Artifact, Platform};
use crate::checksum::verify_manifest;
use crate::command::{CommandExecutor, CommandInvoker, CommandLine, DryRun, InvocationContext};
use crate::config::Settings;
use crate::error::{PipelineError, Result};
use crate::fs::FileSystem;
use crate::output::{all_channels_banner, channel_banner, report_line, write_line};
use crate::pacing::Pacer;
use crate::stage::{Stage, StageOutcome, StageSelection};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, trace};
use std::io::Write;

/// Collaborators and settings for a pipeline run.
pub struct PipelineContext<'a> {
    /// Run-wide settings.
    pub settings: &'a Settings,
    /// Dry-run flag and pass-through arguments.
    pub invocation: &'a InvocationContext,
    /// Runs external tools.
    pub executor: &'a dyn CommandExecutor,
    /// Directory checks, creation, and removal.
    pub fs: &'a dyn FileSystem,
    /// Waits between artifacts.
    pub pacer: &'a dyn Pacer,
}

/// Archive formats the extract stage can unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Gzip-compressed tarball, `.tar.gz`.
    TarGz,
    /// Zip archive, `.zip`.
    Zip,
}

impl ArchiveKind {
    /// Detect the format from a file name's suffix, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifacts_pipeline::pipeline::ArchiveKind;
    ///
    /// assert_eq!(ArchiveKind::detect("EkoScape.tar.gz"), Some(ArchiveKind::TarGz));
    /// assert_eq!(ArchiveKind::detect("EkoScape.ZIP"), Some(ArchiveKind::Zip));
    /// assert_eq!(ArchiveKind::detect("EkoScape.7z"), None);
    /// ```
    #[must_use]
    pub fn detect(file: &str) -> Option<Self> {
        let lower = file.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }
}

/// Runs stages over a filtered view of the catalog.
pub struct Pipeline<'a> {
    context: PipelineContext<'a>,
    active: ActiveSet<'a>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over `active`.
    #[must_use]
    pub const fn new(context: PipelineContext<'a>, active: ActiveSet<'a>) -> Self {
        Self { context, active }
    }

    /// Run every selected stage in order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a stage; later stages do not run.
    pub fn run(&self, stages: &StageSelection, out: &mut dyn Write) -> Result<()> {
        for stage in stages.iter() {
            self.run_stage(stage, out)?;
        }
        Ok(())
    }

    /// Run one stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ChannelFailed`] when a tracked stage fails for
    /// a channel, [`PipelineError::WriteFailed`] when a banner cannot be
    /// written, or any error raised by the stage action.
    pub fn run_stage(&self, stage: Stage, out: &mut dyn Write) -> Result<()> {
        debug!(target: "pipeline", "running stage {stage} over {} artifact(s)", self.active.len());
        match stage {
            Stage::Clean => self.clean(out),
            Stage::Fetch => self.fetch(out),
            Stage::Verify => self.verify(out),
            Stage::Extract => self.extract(out),
            Stage::Validate => self.validate(out),
            Stage::Publish => self.publish(out),
            Stage::Status => self.status(out),
        }
    }

    /// Remove the artifacts directory, or report that it is already gone.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if removal fails.
    pub fn clean(&self, out: &mut dyn Write) -> Result<()> {
        let dir = self.artifacts_dir();
        if !self.context.fs.is_dir(dir) {
            write_line(out, format!("Already gone: {dir}"));
            return Ok(());
        }

        write_line(out, CommandLine::new(["rm", "-r"]).arg(dir.as_str()));
        if !self.dry_run() {
            self.context
                .fs
                .remove_dir_all(dir)
                .map_err(|source| PipelineError::io(dir, source))?;
        }
        Ok(())
    }

    /// Download every named artifact, then verify.
    ///
    /// Each artifact is downloaded on its own; fetching several names in one
    /// call nests them in per-artifact subdirectories.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if the artifacts directory cannot be
    /// created, or any error raised by the trailing verification.
    pub fn fetch(&self, out: &mut dyn Write) -> Result<()> {
        let dir = self.artifacts_dir();
        self.ensure_dir(dir, "mkdir -p", out)?;

        let invoker = self.invoker();
        self.for_each_artifact(Stage::Fetch, out, |artifact, out| {
            let Some(name) = artifact.name() else {
                trace!(target: "pipeline", "{}: not fetchable", artifact.channel());
                return Ok(StageOutcome::Skipped);
            };
            let command = CommandLine::new(&self.context.settings.tools.download)
                .arg("download")
                .args(["--dir", dir.as_str(), "--name", name]);
            Ok(StageOutcome::from_success(invoker.invoke(command, out)))
        })?;

        self.verify(out)
    }

    /// Check each artifact that ships a `<file>.sha256` manifest.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ChannelFailed`] for the first artifact whose
    /// manifest does not fully verify, or [`PipelineError::Io`] if a manifest
    /// cannot be read.
    pub fn verify(&self, out: &mut dyn Write) -> Result<()> {
        let dry_run = self.dry_run();
        self.for_each_artifact(Stage::Verify, out, |artifact, out| {
            let Some(file) = artifact.source_file() else {
                return Ok(StageOutcome::Skipped);
            };
            let manifest = self.artifacts_dir().join(format!("{file}.sha256"));
            if !self.context.fs.is_file(&manifest) {
                debug!(target: "pipeline", "{}: no manifest at {manifest}", artifact.channel());
                return Ok(StageOutcome::Skipped);
            }
            verify_manifest(self.context.fs, &manifest, dry_run, out)
                .map(StageOutcome::from_success)
        })
    }

    /// Unpack each archive into its destination directory.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnsupportedArchive`] for an unknown suffix,
    /// [`PipelineError::Io`] if a destination cannot be created, or
    /// [`PipelineError::ChannelFailed`] when an extractor fails.
    pub fn extract(&self, out: &mut dyn Write) -> Result<()> {
        let invoker = self.invoker();
        self.for_each_artifact(Stage::Extract, out, |artifact, out| {
            let Some(file) = artifact.source_file() else {
                trace!(target: "pipeline", "{}: nothing to extract", artifact.channel());
                return Ok(StageOutcome::Skipped);
            };
            let archive = self.artifacts_dir().join(file);
            let kind = ArchiveKind::detect(file)
                .ok_or_else(|| PipelineError::UnsupportedArchive { file: archive.clone() })?;
            let dest = self.dest_dir(artifact);
            self.ensure_dir(&dest, "mkdir", out)?;

            let tools = &self.context.settings.tools;
            let command = match kind {
                ArchiveKind::TarGz => CommandLine::new(&tools.tar)
                    .args(["-xzf", archive.as_str(), "--keep-old-files", "-C", dest.as_str()]),
                ArchiveKind::Zip => CommandLine::new(&tools.unzip)
                    .args(["-n", archive.as_str(), "-d", dest.as_str()]),
            };
            Ok(StageOutcome::from_success(invoker.invoke(command, out)))
        })
    }

    /// Validate each destination directory with the publish tool.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ChannelFailed`] when validation fails.
    pub fn validate(&self, out: &mut dyn Write) -> Result<()> {
        let invoker = self.invoker();
        self.for_each_artifact(Stage::Validate, out, |artifact, out| {
            let command = self
                .publish_tool()
                .arg("validate")
                .option("--platform", artifact.platform().map(Platform::as_flag))
                .option("--arch", artifact.arch().map(Arch::as_flag))
                .arg(dir_arg(&self.dest_dir(artifact)));
            Ok(StageOutcome::from_success(invoker.invoke(command, out)))
        })
    }

    /// Push each destination directory to `<project>:<channel>`.
    ///
    /// The tool always runs; in dry-run it receives `--dry-run` instead.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ChannelFailed`] when a push fails.
    pub fn publish(&self, out: &mut dyn Write) -> Result<()> {
        let invoker = self.invoker();
        self.for_each_artifact(Stage::Publish, out, |artifact, out| {
            let command = artifact
                .ignore_patterns()
                .iter()
                .fold(
                    self.publish_tool().args([
                        "push",
                        "--fix-permissions",
                        "--dereference",
                        "--if-changed",
                    ]),
                    |command, pattern| command.option("--ignore", Some(pattern.as_str())),
                )
                .flag_if("--dry-run", self.dry_run())
                .arg(dir_arg(&self.dest_dir(artifact)))
                .arg(self.address(Some(artifact.channel())));
            Ok(StageOutcome::from_success(
                invoker.invoke_with(command, DryRun::Ignore, out),
            ))
        })
    }

    /// Report build status for the project, or per channel when filtered.
    ///
    /// # Errors
    ///
    /// Status results are informational; a failing query is logged and this
    /// still returns `Ok`.
    pub fn status(&self, out: &mut dyn Write) -> Result<()> {
        let invoker = self.invoker();
        if self.active.covers_catalog() {
            let command = self.publish_tool().arg("status").arg(self.address(None));
            if !invoker.invoke(command, out) {
                debug!(target: "pipeline", "project status query failed");
            }
            if !self.dry_run() {
                write_line(out, "");
            }
            return Ok(());
        }

        self.for_each_artifact(Stage::Status, out, |artifact, out| {
            let command = self
                .publish_tool()
                .arg("status")
                .arg(self.address(Some(artifact.channel())));
            Ok(StageOutcome::from_success(invoker.invoke(command, out)))
        })
    }

    /// Apply `action` to each active artifact under `stage`'s policy.
    fn for_each_artifact<F>(&self, stage: Stage, out: &mut dyn Write, mut action: F) -> Result<()>
    where
        F: FnMut(&Artifact, &mut dyn Write) -> Result<StageOutcome>,
    {
        let policy = stage.policy();
        let mut succeeded = Vec::new();

        for artifact in self.active.iter() {
            let outcome = action(artifact, out)?;
            if outcome.is_skipped() {
                continue;
            }

            if policy.show_result {
                let success = outcome == StageOutcome::Succeeded;
                report_line(out, channel_banner(artifact.channel(), success))?;
                if !success {
                    return Err(PipelineError::ChannelFailed {
                        stage,
                        channel: artifact.channel().to_owned(),
                    });
                }
                succeeded.push(artifact.channel());
            }

            if policy.pace {
                self.pace(out);
            }
        }

        if !succeeded.is_empty() {
            report_line(out, all_channels_banner(&succeeded))?;
        }
        Ok(())
    }

    fn pace(&self, out: &mut dyn Write) {
        if self.dry_run() {
            return;
        }
        self.context.pacer.pause(self.context.settings.pacing());
        write_line(out, "");
    }

    fn ensure_dir(&self, dir: &Utf8Path, echo: &str, out: &mut dyn Write) -> Result<()> {
        if self.context.fs.is_dir(dir) {
            return Ok(());
        }
        write_line(out, CommandLine::new(echo.split(' ')).arg(dir.as_str()));
        if self.dry_run() {
            return Ok(());
        }
        self.context
            .fs
            .create_dir_all(dir)
            .map_err(|source| PipelineError::io(dir, source))
    }

    const fn invoker(&self) -> CommandInvoker<'a> {
        CommandInvoker::new(self.context.invocation, self.context.executor)
    }

    fn publish_tool(&self) -> CommandLine {
        CommandLine::new(&self.context.settings.tools.publish)
    }

    fn address(&self, channel: Option<&str>) -> String {
        let project = &self.context.settings.project;
        channel.map_or_else(|| project.clone(), |channel| format!("{project}:{channel}"))
    }

    fn artifacts_dir(&self) -> &'a Utf8Path {
        &self.context.settings.artifacts_dir
    }

    fn dest_dir(&self, artifact: &Artifact) -> Utf8PathBuf {
        self.artifacts_dir().join(artifact.dest_dir())
    }

    const fn dry_run(&self) -> bool {
        self.context.invocation.dry_run()
    }
}

/// Render a directory argument with one trailing slash.
///
/// The publish tool treats a trailing slash as "the contents of".
fn dir_arg(dir: &Utf8Path) -> String {
    let trimmed = dir.as_str().trim_end_matches('/');
    format!("{trimmed}/")
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
