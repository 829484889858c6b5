//! CLI argument definitions for the `artifacts` binary.
//!
//! Stage flags can be combined freely; the selected stages always run in the
//! pipeline's fixed order regardless of the order they are given in.

use crate::stage::{Stage, StageSelection};
use camino::Utf8PathBuf;
use clap::Parser;

/// Fetch, verify, extract, validate, and publish release artifacts.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "artifacts")]
#[command(version, about)]
#[command(long_about = concat!(
    "Fetch, verify, extract, validate, and publish release artifacts.\n\n",
    "Each artifact belongs to one release channel. Stages run over every ",
    "artifact, or over the channels selected with -c, in the order ",
    "clean, fetch, verify, extract, validate, publish, status.\n\n",
    "Arguments after -- are appended to every external command.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Download and verify every channel:\n",
    "    $ artifacts -g\n\n",
    "  Preview extraction and publishing for Windows only:\n",
    "    $ artifacts -n -c win -x -I\n\n",
    "  Start over and publish everything:\n",
    "    $ artifacts -C -g -x -v -I -s",
))]
pub struct Cli {
    /// Only use artifacts whose channel contains FRAGMENT (repeatable).
    #[arg(short = 'c', long = "channel", value_name = "FRAGMENT")]
    pub channels: Vec<String>,

    /// Delete the artifacts directory.
    #[arg(short = 'C', long)]
    pub clean: bool,

    /// Download artifacts into the artifacts directory, then verify them.
    #[arg(short = 'g', long)]
    pub fetch: bool,

    /// Verify artifact checksums.
    #[arg(short = 'k', long)]
    pub verify: bool,

    /// Extract artifacts.
    #[arg(short = 'x', long)]
    pub extract: bool,

    /// Validate extracted artifacts with the publish tool.
    #[arg(short = 'v', long)]
    pub validate: bool,

    /// Publish extracted artifacts to their channels.
    #[arg(short = 'I', long)]
    pub publish: bool,

    /// Show the status of published builds.
    #[arg(short = 's', long)]
    pub status: bool,

    /// Print commands without running them; publishing uses the tool's own preview.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Settings file [default: artifacts.toml when present].
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Override the publish address prefix.
    #[arg(long, value_name = "USER/GAME")]
    pub project: Option<String>,

    /// Override the artifacts directory.
    #[arg(long, value_name = "DIR")]
    pub artifacts_dir: Option<Utf8PathBuf>,

    /// Extra arguments appended to every external command.
    #[arg(last = true, value_name = "ARGS")]
    pub extra_args: Vec<String>,
}

impl Cli {
    /// The selected stages.
    #[must_use]
    pub fn stages(&self) -> StageSelection {
        StageSelection::default()
            .with_if(Stage::Clean, self.clean)
            .with_if(Stage::Fetch, self.fetch)
            .with_if(Stage::Verify, self.verify)
            .with_if(Stage::Extract, self.extract)
            .with_if(Stage::Validate, self.validate)
            .with_if(Stage::Publish, self.publish)
            .with_if(Stage::Status, self.status)
    }

    /// Run options for the pipeline.
    #[must_use]
    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            dry_run: self.dry_run,
            channels: self.channels.clone(),
            extra_args: self.extra_args.clone(),
            stages: self.stages(),
        }
    }
}

/// Validated run options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Echo commands without running them.
    pub dry_run: bool,
    /// Channel fragments narrowing the active artifacts.
    pub channels: Vec<String>,
    /// Arguments appended to every external command.
    pub extra_args: Vec<String>,
    /// Stages to run.
    pub stages: StageSelection,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
