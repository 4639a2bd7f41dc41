//! CLI argument parsing module for majorstep

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Default target major version
pub const DEFAULT_TARGET: u64 = 12;

/// Step framework dependencies through major version upgrades
#[derive(Parser, Debug, Clone)]
#[command(
    name = "majorstep",
    version,
    about = "Step framework dependencies through major version upgrades, one commit per step"
)]
pub struct CliArgs {
    /// Project directory holding package.json (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Target major version
    #[arg(long, value_name = "INT", default_value_t = DEFAULT_TARGET)]
    pub to_version: u64,

    /// Let external commands print to the terminal
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub verbose: bool,

    /// Run the project's start command once the upgrade is done
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub start_after_install: bool,

    /// Upper bound on upgrade passes (default: the largest version gap)
    #[arg(long, value_name = "INT")]
    pub max_passes: Option<u32>,

    /// Settings file (default: majorstep.toml in the project directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dry run mode - log external commands without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Options as they would be passed on the command line
    pub fn describe(&self) -> String {
        format!(
            "--verbose={} --to-version={} --start-after-install={}",
            self.verbose, self.to_version, self.start_after_install
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["majorstep"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert_eq!(args.to_version, 12);
        assert!(!args.verbose);
        assert!(!args.start_after_install);
        assert!(args.max_passes.is_none());
        assert!(args.config.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn test_to_version_equals_form() {
        let args = CliArgs::parse_from(["majorstep", "--to-version=14"]);
        assert_eq!(args.to_version, 14);
    }

    #[test]
    fn test_to_version_separate_value() {
        let args = CliArgs::parse_from(["majorstep", "--to-version", "13"]);
        assert_eq!(args.to_version, 13);
    }

    #[test]
    fn test_to_version_invalid_is_rejected() {
        assert!(CliArgs::try_parse_from(["majorstep", "--to-version=abc"]).is_err());
        assert!(CliArgs::try_parse_from(["majorstep", "--to-version=-1"]).is_err());
    }

    #[test]
    fn test_verbose_bare_flag() {
        let args = CliArgs::parse_from(["majorstep", "--verbose"]);
        assert!(args.verbose);
    }

    #[test]
    fn test_verbose_explicit_value() {
        let args = CliArgs::parse_from(["majorstep", "--verbose=true"]);
        assert!(args.verbose);

        let args = CliArgs::parse_from(["majorstep", "--verbose=false"]);
        assert!(!args.verbose);
    }

    #[test]
    fn test_verbose_invalid_value_is_rejected() {
        assert!(CliArgs::try_parse_from(["majorstep", "--verbose=maybe"]).is_err());
    }

    #[test]
    fn test_verbose_does_not_swallow_path() {
        let args = CliArgs::parse_from(["majorstep", "--verbose", "/some/app"]);
        assert!(args.verbose);
        assert_eq!(args.path, PathBuf::from("/some/app"));
    }

    #[test]
    fn test_start_after_install() {
        let args = CliArgs::parse_from(["majorstep", "--start-after-install=true"]);
        assert!(args.start_after_install);

        let args = CliArgs::parse_from(["majorstep", "--start-after-install"]);
        assert!(args.start_after_install);
    }

    #[test]
    fn test_dry_run_flags() {
        assert!(CliArgs::parse_from(["majorstep", "-n"]).dry_run);
        assert!(CliArgs::parse_from(["majorstep", "--dry-run"]).dry_run);
    }

    #[test]
    fn test_max_passes_and_config() {
        let args = CliArgs::parse_from([
            "majorstep",
            "--max-passes=5",
            "--config",
            "/etc/majorstep.toml",
        ]);
        assert_eq!(args.max_passes, Some(5));
        assert_eq!(args.config, Some(PathBuf::from("/etc/majorstep.toml")));
    }

    #[test]
    fn test_describe() {
        let args = CliArgs::parse_from(["majorstep", "--verbose", "--to-version=13"]);
        assert_eq!(
            args.describe(),
            "--verbose=true --to-version=13 --start-after-install=false"
        );
    }
}
