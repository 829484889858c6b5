//! `artifacts` CLI entrypoint.
//!
//! Loads the settings file, narrows the catalog to the requested channels, and
//! runs the selected stages with the system executor, filesystem, and pacer.
//! Report lines go to stdout; a fatal error goes to stderr with exit code 1.

use artifacts_pipeline::cli::Cli;
use artifacts_pipeline::command::{InvocationContext, SystemCommandExecutor};
use artifacts_pipeline::config::Settings;
use artifacts_pipeline::error::Result;
use artifacts_pipeline::fs::SystemFileSystem;
use artifacts_pipeline::output::write_line;
use artifacts_pipeline::pacing::ThreadPacer;
use artifacts_pipeline::pipeline::{Pipeline, PipelineContext};
use clap::{CommandFactory, Parser};
use log::debug;
use std::io::Write;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let options = cli.options();
    if options.stages.is_empty() {
        write_line(stdout, Cli::command().render_help());
        return Ok(());
    }

    let settings = Settings::load_or_default(cli.config.as_deref())?
        .with_overrides(cli.project.as_deref(), cli.artifacts_dir.as_deref());
    let catalog = settings.catalog()?;
    let active = catalog.filter(&options.channels);
    debug!(
        "{} of {} artifact(s) active; dry-run: {}",
        active.len(),
        catalog.len(),
        options.dry_run
    );

    let invocation = InvocationContext::new(options.dry_run, options.extra_args);
    let context = PipelineContext {
        settings: &settings,
        invocation: &invocation,
        executor: &SystemCommandExecutor,
        fs: &SystemFileSystem,
        pacer: &ThreadPacer,
    };
    Pipeline::new(context, active).run(&options.stages, stdout)
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_line(stderr, err);
            1
        }
    }
}
