use crate::types::{SolverError, StepValues};
use log::debug;
use regex::Regex;

const STEP_LIST_PATTERN: &str = r"^\s*\[?\s*-?\d+(?:\s*[,\s]\s*-?\d+)*\s*,?\s*\]?\s*$";

/// Parses step values written as `3,4,5,7`, `[3, 4, 5, 7]` or `3 4 5 7`.
pub fn parse_step_values(input: &str) -> Result<StepValues, SolverError> {
    let list_regex = Regex::new(STEP_LIST_PATTERN)
        .map_err(|e| SolverError::InvalidArgument(format!("bad step list pattern: {}", e)))?;
    if !list_regex.is_match(input) {
        return Err(SolverError::InvalidArgument(format!(
            "could not read step values from '{}'",
            input
        )));
    }

    let number_regex = Regex::new(r"-?\d+")
        .map_err(|e| SolverError::InvalidArgument(format!("bad number pattern: {}", e)))?;
    let values = number_regex
        .find_iter(input)
        .map(|m| {
            m.as_str().parse::<i64>().map_err(|_| {
                SolverError::InvalidArgument(format!("step value {} is too large", m.as_str()))
            })
        })
        .collect::<Result<Vec<i64>, SolverError>>()?;

    debug!("Parsed step values {:?} from '{}'", values, input);
    StepValues::new(values)
}

pub fn format_combination(combination: &[u32]) -> String {
    if combination.is_empty() {
        return "(empty)".to_string();
    }
    combination
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<String>>()
        .join(" + ")
}
