//! Convergence loop
//!
//! Drives every tracked dependency to the target major version in passes.
//! Each pass visits the dependencies in table order and moves every lagging
//! one up by a single major version, so one package's upgrade can relax
//! another's peer constraints before that one is attempted. Dependencies
//! are never bumped straight to the target.

use super::step::{StepExecutor, StepOutcome};
use crate::domain::VersionTable;
use crate::error::{AppError, ConvergenceError};
use crate::logger;

/// One performed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Pass the step happened in (1-based)
    pub pass: u32,
    /// Dependency that moved
    pub identifier: String,
    /// Version before the step
    pub from: u64,
    /// Version after the step
    pub to: u64,
}

/// What the loop did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopReport {
    /// Number of passes performed
    pub passes: u32,
    /// Every step, in execution order
    pub steps: Vec<StepRecord>,
}

impl LoopReport {
    /// Number of updater invocations that succeeded
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

/// Iterative pass loop with a bounded pass count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergenceLoop {
    target: u64,
    max_passes: Option<u32>,
}

impl ConvergenceLoop {
    /// Create a loop for `target`; without `max_passes` the bound is the largest version gap
    pub fn new(target: u64, max_passes: Option<u32>) -> Self {
        Self { target, max_passes }
    }

    /// Target major version
    pub fn target(&self) -> u64 {
        self.target
    }

    fn pass_limit(&self, table: &VersionTable) -> u32 {
        self.max_passes.unwrap_or_else(|| {
            u32::try_from(table.largest_gap(self.target)).unwrap_or(u32::MAX)
        })
    }

    /// Run passes until every dependency in `table` reaches the target
    pub fn run<E>(&self, table: &mut VersionTable, executor: &mut E) -> Result<LoopReport, AppError>
    where
        E: StepExecutor + ?Sized,
    {
        executor.prepare()?;

        let limit = self.pass_limit(table);
        let mut report = LoopReport::default();

        while !table.is_converged(self.target) {
            let pass = report.passes + 1;
            if pass > limit {
                return Err(ConvergenceError::PassLimit {
                    limit,
                    pending: table.pending(self.target),
                }
                .into());
            }

            logger::info(format!(
                "Pass {}: {} of {} dependencies at v{}",
                pass,
                table.converged_count(self.target),
                table.len(),
                self.target
            ));

            let identifiers: Vec<String> = table.identifiers().map(str::to_string).collect();
            let mut advanced = 0usize;
            for identifier in identifiers {
                if let StepOutcome::Advanced { from, to } =
                    executor.advance(table, &identifier, self.target)?
                {
                    advanced += 1;
                    report.steps.push(StepRecord {
                        pass,
                        identifier,
                        from,
                        to,
                    });
                }
            }
            report.passes = pass;

            if advanced == 0 {
                return Err(ConvergenceError::NoProgress {
                    pass,
                    pending: table.pending(self.target),
                }
                .into());
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependencyRecord;
    use crate::error::CommandError;

    /// Executor that always succeeds and records every call
    #[derive(Default)]
    struct FakeExecutor {
        prepared: usize,
        updates: Vec<(String, u64)>,
        fail_on: Option<(String, u64)>,
        stall: bool,
    }

    impl StepExecutor for FakeExecutor {
        fn prepare(&mut self) -> Result<(), AppError> {
            self.prepared += 1;
            Ok(())
        }

        fn advance(
            &mut self,
            table: &mut VersionTable,
            identifier: &str,
            target: u64,
        ) -> Result<StepOutcome, AppError> {
            let from = table.get(identifier).unwrap();
            if from >= target {
                return Ok(StepOutcome::AlreadyConverged);
            }
            if self.fail_on.as_ref() == Some(&(identifier.to_string(), from + 1)) {
                return Err(CommandError::failed("ng update", Some(5), "").into());
            }
            self.updates.push((identifier.to_string(), from + 1));
            if self.stall {
                return Ok(StepOutcome::AlreadyConverged);
            }
            table.set(identifier, from + 1);
            Ok(StepOutcome::Advanced { from, to: from + 1 })
        }
    }

    fn table(entries: &[(&str, u64)]) -> VersionTable {
        VersionTable::from_records(
            entries
                .iter()
                .map(|(id, v)| DependencyRecord::new(*id, *v)),
        )
    }

    #[test]
    fn test_scoped_scenario_two_passes_six_updates() {
        let mut table = table(&[("@scope/core", 10), ("@scope/cli", 10), ("@scope/cdk", 10)]);
        let mut exec = FakeExecutor::default();

        let report = ConvergenceLoop::new(12, None)
            .run(&mut table, &mut exec)
            .unwrap();

        assert_eq!(report.passes, 2);
        assert_eq!(report.step_count(), 6);
        assert_eq!(exec.updates.len(), 6);
        assert!(table.records().all(|r| r.current_version == 12));
        // Each pass bumps every entry once, in table order
        assert_eq!(
            exec.updates,
            vec![
                ("@scope/core".to_string(), 11),
                ("@scope/cli".to_string(), 11),
                ("@scope/cdk".to_string(), 11),
                ("@scope/core".to_string(), 12),
                ("@scope/cli".to_string(), 12),
                ("@scope/cdk".to_string(), 12),
            ]
        );
    }

    #[test]
    fn test_first_pass_follows_insertion_order_and_skips_converged() {
        let mut table = table(&[("A", 10), ("B", 11), ("C", 12)]);
        let mut exec = FakeExecutor::default();

        let report = ConvergenceLoop::new(12, None)
            .run(&mut table, &mut exec)
            .unwrap();

        let first_pass: Vec<&str> = report
            .steps
            .iter()
            .filter(|s| s.pass == 1)
            .map(|s| s.identifier.as_str())
            .collect();
        assert_eq!(first_pass, vec!["A", "B"]);
        assert_eq!(exec.updates[0], ("A".to_string(), 11));
        assert_eq!(exec.updates[1], ("B".to_string(), 12));
        assert_eq!(report.passes, 2);
        assert!(table.is_converged(12));
    }

    #[test]
    fn test_converges_for_assorted_tables() {
        let cases: Vec<Vec<(&str, u64)>> = vec![
            vec![("a", 0)],
            vec![("a", 3), ("b", 7), ("c", 5)],
            vec![("a", 7), ("b", 7)],
            vec![("a", 1), ("b", 6), ("c", 2), ("d", 4)],
        ];

        for entries in cases {
            let mut table = table(&entries);
            let mut exec = FakeExecutor::default();
            let report = ConvergenceLoop::new(7, None)
                .run(&mut table, &mut exec)
                .unwrap();

            let expected_steps: u64 = entries.iter().map(|(_, v)| 7 - v).sum();
            assert_eq!(report.step_count() as u64, expected_steps);
            assert_eq!(u64::from(report.passes), table_gap(&entries, 7));
            assert!(table.records().all(|r| r.current_version == 7));
        }
    }

    fn table_gap(entries: &[(&str, u64)], target: u64) -> u64 {
        entries.iter().map(|(_, v)| target - v).max().unwrap_or(0)
    }

    #[test]
    fn test_already_converged_table_prepares_and_stops() {
        let mut table = table(&[("a", 12), ("b", 13)]);
        let mut exec = FakeExecutor::default();

        let report = ConvergenceLoop::new(12, None)
            .run(&mut table, &mut exec)
            .unwrap();
        assert_eq!(exec.prepared, 1);
        assert_eq!(report.passes, 0);
        assert!(exec.updates.is_empty());
        assert_eq!(table.get("b"), Some(13));
    }

    #[test]
    fn test_failure_aborts_and_leaves_rest_of_pass_untouched() {
        let mut table = table(&[("A", 10), ("B", 10), ("C", 10)]);
        let mut exec = FakeExecutor {
            fail_on: Some(("B".to_string(), 11)),
            ..FakeExecutor::default()
        };

        let err = ConvergenceLoop::new(12, None)
            .run(&mut table, &mut exec)
            .unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert_eq!(table.get("A"), Some(11));
        assert_eq!(table.get("B"), Some(10));
        assert_eq!(table.get("C"), Some(10));
    }

    #[test]
    fn test_pass_without_progress_fails() {
        let mut table = table(&[("A", 10), ("B", 12)]);
        let mut exec = FakeExecutor {
            stall: true,
            ..FakeExecutor::default()
        };

        let err = ConvergenceLoop::new(12, Some(10))
            .run(&mut table, &mut exec)
            .unwrap_err();
        match err {
            AppError::Convergence(ConvergenceError::NoProgress { pass, pending }) => {
                assert_eq!(pass, 1);
                assert_eq!(pending, vec!["A"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_explicit_pass_limit() {
        let mut table = table(&[("A", 9)]);
        let mut exec = FakeExecutor::default();

        let err = ConvergenceLoop::new(12, Some(2))
            .run(&mut table, &mut exec)
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Convergence(ConvergenceError::PassLimit { limit: 2, .. })
        ));
        assert_eq!(table.get("A"), Some(11));
    }

    #[test]
    fn test_prepare_failure_runs_no_pass() {
        struct FailingPrepare;
        impl StepExecutor for FailingPrepare {
            fn prepare(&mut self) -> Result<(), AppError> {
                Err(CommandError::failed("git checkout -b x", Some(128), "").into())
            }
            fn advance(
                &mut self,
                _table: &mut VersionTable,
                _identifier: &str,
                _target: u64,
            ) -> Result<StepOutcome, AppError> {
                panic!("advance must not be called");
            }
        }

        let mut table = table(&[("A", 10)]);
        let err = ConvergenceLoop::new(12, None)
            .run(&mut table, &mut FailingPrepare)
            .unwrap_err();
        assert_eq!(err.exit_code(), 128);
    }
}
