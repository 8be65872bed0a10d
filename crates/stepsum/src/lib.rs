//! Stair counting and sum-combination solvers, each in naive, memoized and
//! tabulated form.

// Public exports
pub use crate::types::{
    Combination,
    SolverError,
    StepValues,
    Strategy,
    SumMode,
};
pub use crate::stairs::{count_stairs, count_stairs_memo, count_stairs_tabulated, count_stairs_with};
pub use crate::sum_combination::SumCombinationSolver;
pub use crate::config::{ConfigError, DemoConfig, StairsCase, SumCase, get_cases_path};
pub use crate::report::{CaseOutcome, CaseReport, Report, Summary, run_config, run_stairs_case, run_sum_case};
pub use crate::utils::{format_combination, parse_step_values};

// Internal modules
mod types;
mod stairs;
mod sum_combination;
mod config;
mod report;
mod utils;
#[cfg(feature = "python")]
mod bindings;

pub mod constants;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn stepsum(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(bindings::python::py_count_stairs, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::python::py_can_sum, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::python::py_how_sum, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::python::py_all_how_sum, m)?)?;
    Ok(())
}
