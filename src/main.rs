//! majorstep - framework major version upgrade CLI
//!
//! Steps the tracked framework packages of a project up to a target major
//! version, committing after every single-version step.

use clap::Parser;
use majorstep::cli::CliArgs;
use majorstep::config::Settings;
use majorstep::error::AppError;
use majorstep::logger;
use majorstep::runner::{CommandRunner, DryRunRunner, SystemRunner};
use majorstep::upgrade::Upgrade;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            let code = e.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            logger::error(format!("Error running upgrade: {:#}", e));
            if let Some(AppError::Command(cmd)) = e.downcast_ref::<AppError>() {
                let stderr = cmd.stderr().trim();
                if !stderr.is_empty() {
                    logger::error(stderr);
                }
            }
            ExitCode::from(code)
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    logger::debug("Extracting options...");
    let settings = Settings::from_cli(&args).map_err(AppError::from)?;
    logger::debug(format!("Extracted options {}", args.describe()));
    if settings.dry_run {
        logger::debug("Mode: dry-run");
    }

    let runner: Box<dyn CommandRunner> = if settings.dry_run {
        Box::new(DryRunRunner::new())
    } else {
        Box::new(SystemRunner::new(&settings.project_dir).with_progress(!settings.verbose))
    };

    let upgrade = Upgrade::new(&settings, &*runner);
    let report = upgrade.run()?;

    logger::success(format!(
        "{} step(s) in {} pass(es) on {}, finished in {}s",
        report.loop_report.step_count(),
        report.loop_report.passes,
        report.branch,
        report.elapsed().num_seconds()
    ));

    if settings.start_after_install {
        upgrade.start()?;
    }

    Ok(ExitCode::SUCCESS)
}
