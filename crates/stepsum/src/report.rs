use crate::config::{DemoConfig, StairsCase, SumCase};
use crate::stairs::count_stairs_with;
use crate::sum_combination::SumCombinationSolver;
use crate::types::{Combination, SolverError, Strategy, SumMode};
use log::{debug, warn};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CaseOutcome {
    Stairs {
        count: u64,
    },
    Sum {
        reachable: bool,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        combinations: Vec<Combination>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub label: String,
    pub strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CaseOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_cases: usize,
    pub reachable_sums: usize,
    pub unreachable_sums: usize,
    pub failed_cases: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub cases: Vec<CaseReport>,
}

pub fn stairs_label(case: &StairsCase) -> String {
    format!("count stairs of {}", case.n)
}

pub fn sum_label(case: &SumCase) -> String {
    let verb = match case.mode {
        SumMode::Exists => "can sum",
        SumMode::Witness => "how sum",
        SumMode::All => "all how sum",
    };
    format!("{} ({}, {})", verb, case.target, case.steps)
}

pub fn run_stairs_case(case: &StairsCase) -> Result<CaseOutcome, SolverError> {
    let count = count_stairs_with(case.strategy, case.n)?;
    Ok(CaseOutcome::Stairs { count })
}

pub fn run_sum_case(case: &SumCase) -> Result<CaseOutcome, SolverError> {
    let solver = SumCombinationSolver::new(case.steps.clone());

    match case.mode {
        SumMode::Exists => Ok(CaseOutcome::Sum {
            reachable: solver.can_sum_with(case.strategy, case.target)?,
            combinations: Vec::new(),
        }),
        SumMode::Witness => {
            if case.strategy != Strategy::Memoized {
                debug!("Witness search is always memoized; ignoring {}", case.strategy);
            }
            let witness = solver.how_sum(case.target)?;
            Ok(CaseOutcome::Sum {
                reachable: witness.is_some(),
                combinations: witness.into_iter().collect(),
            })
        }
        SumMode::All => {
            if case.strategy != Strategy::Memoized {
                debug!("Enumeration is always memoized; ignoring {}", case.strategy);
            }
            let combinations: Vec<Combination> = solver.all_how_sum(case.target)?.into_iter().collect();
            Ok(CaseOutcome::Sum {
                reachable: !combinations.is_empty(),
                combinations,
            })
        }
    }
}

pub fn run_config(config: &DemoConfig) -> Report {
    let stairs = config.stairs.iter().map(|case| {
        (stairs_label(case), case.strategy, run_stairs_case(case))
    });
    let sums = config
        .sums
        .iter()
        .map(|case| (sum_label(case), case.strategy, run_sum_case(case)));

    let mut summary = Summary::default();
    let cases: Vec<CaseReport> = stairs
        .chain(sums)
        .map(|(label, strategy, result)| {
            summary.total_cases += 1;
            match result {
                Ok(outcome) => {
                    if let CaseOutcome::Sum { reachable, .. } = &outcome {
                        if *reachable {
                            summary.reachable_sums += 1;
                        } else {
                            summary.unreachable_sums += 1;
                        }
                    }
                    CaseReport { label, strategy, outcome: Some(outcome), error: None }
                }
                Err(e) => {
                    warn!("{} failed: {}", label, e);
                    summary.failed_cases += 1;
                    CaseReport { label, strategy, outcome: None, error: Some(e.to_string()) }
                }
            }
        })
        .collect();

    Report { summary, cases }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StepValues;

    fn sum_case(target: i64, steps: &[i64], mode: SumMode, strategy: Strategy) -> SumCase {
        SumCase {
            target,
            steps: StepValues::new(steps.iter().copied()).unwrap(),
            mode,
            strategy,
        }
    }

    #[test]
    fn test_reference_run() {
        let report = run_config(&DemoConfig::reference());
        assert_eq!(
            report.summary,
            Summary { total_cases: 18, reachable_sums: 4, unreachable_sums: 1, failed_cases: 0 }
        );

        assert_eq!(report.cases[9].label, "count stairs of 10");
        assert_eq!(report.cases[9].outcome, Some(CaseOutcome::Stairs { count: 89 }));
        assert_eq!(report.cases[12].outcome, Some(CaseOutcome::Stairs { count: 20_365_011_074 }));

        assert_eq!(report.cases[14].label, "can sum (300, [7, 14])");
        assert_eq!(
            report.cases[14].outcome,
            Some(CaseOutcome::Sum { reachable: false, combinations: Vec::new() })
        );
        assert_eq!(
            report.cases[15].outcome,
            Some(CaseOutcome::Sum { reachable: true, combinations: vec![vec![3, 4]] })
        );
    }

    #[test]
    fn test_failed_case_is_reported() {
        let config = DemoConfig {
            stairs: vec![StairsCase { n: -3, strategy: Strategy::Memoized }],
            sums: Vec::new(),
        };
        let report = run_config(&config);
        assert_eq!(report.summary.failed_cases, 1);
        assert!(report.cases[0].outcome.is_none());
        assert!(report.cases[0].error.as_deref().unwrap().contains("negative"));
    }

    #[test]
    fn test_deep_existence_falls_back_to_tabulated() {
        let case = sum_case(7_000_007, &[7, 14], SumMode::Exists, Strategy::Memoized);
        assert_eq!(
            run_sum_case(&case).unwrap(),
            CaseOutcome::Sum { reachable: true, combinations: Vec::new() }
        );

        let witness = sum_case(7_000_007, &[7, 14], SumMode::Witness, Strategy::Memoized);
        assert!(matches!(run_sum_case(&witness), Err(SolverError::InvalidArgument(_))));
    }

    #[test]
    fn test_existence_deeper_than_recursion_limit() {
        let case = sum_case(60_000, &[1], SumMode::Exists, Strategy::Memoized);
        assert_eq!(
            run_sum_case(&case).unwrap(),
            CaseOutcome::Sum { reachable: true, combinations: Vec::new() }
        );

        let naive = sum_case(100_000, &[1], SumMode::Exists, Strategy::Naive);
        assert_eq!(
            run_sum_case(&naive).unwrap(),
            CaseOutcome::Sum { reachable: true, combinations: Vec::new() }
        );

        let huge = sum_case(9_000_000_000_000_000_000, &[7, 14], SumMode::Exists, Strategy::Tabulated);
        assert_eq!(
            run_sum_case(&huge).unwrap(),
            CaseOutcome::Sum { reachable: false, combinations: Vec::new() }
        );
    }

    #[test]
    fn test_oversized_enumeration_is_reported_as_failure() {
        let case = sum_case(60, &[1, 2], SumMode::All, Strategy::Memoized);
        assert!(matches!(run_sum_case(&case), Err(SolverError::InvalidArgument(_))));

        let config = DemoConfig { stairs: Vec::new(), sums: vec![case] };
        assert_eq!(run_config(&config).summary.failed_cases, 1);
    }

    #[test]
    fn test_all_mode_lists_every_combination() {
        let case = sum_case(5, &[2, 3], SumMode::All, Strategy::Memoized);
        assert_eq!(
            run_sum_case(&case).unwrap(),
            CaseOutcome::Sum { reachable: true, combinations: vec![vec![2, 3], vec![3, 2]] }
        );
    }

    #[test]
    fn test_report_json_shape() {
        let case = sum_case(6, &[4], SumMode::Exists, Strategy::Naive);
        let config = DemoConfig { stairs: Vec::new(), sums: vec![case] };
        let json = serde_json::to_value(run_config(&config)).unwrap();
        assert_eq!(json["summary"]["unreachable_sums"], 1);
        assert_eq!(json["cases"][0]["strategy"], "naive");
        assert_eq!(json["cases"][0]["outcome"]["kind"], "sum");
        assert_eq!(json["cases"][0]["outcome"]["reachable"], false);
        assert!(json["cases"][0].get("error").is_none());
    }
}
