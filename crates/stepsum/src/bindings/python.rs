use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::stairs::count_stairs_with;
use crate::sum_combination::SumCombinationSolver;
use crate::types::{Combination, SolverError, StepValues, Strategy};

fn to_py_err(error: SolverError) -> PyErr {
    PyValueError::new_err(error.to_string())
}

fn parse_strategy(name: &str) -> PyResult<Strategy> {
    Strategy::from_name(name)
        .ok_or_else(|| PyValueError::new_err(format!("unknown strategy '{}'", name)))
}

fn solver_for(steps: Vec<i64>) -> PyResult<SumCombinationSolver> {
    let steps = StepValues::new(steps).map_err(to_py_err)?;
    Ok(SumCombinationSolver::new(steps))
}

#[pyfunction]
#[pyo3(name = "count_stairs", signature = (n, strategy="memoized"))]
pub fn py_count_stairs(n: i64, strategy: &str) -> PyResult<u64> {
    count_stairs_with(parse_strategy(strategy)?, n).map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "can_sum", signature = (target, steps, strategy="memoized"))]
pub fn py_can_sum(target: i64, steps: Vec<i64>, strategy: &str) -> PyResult<bool> {
    let strategy = parse_strategy(strategy)?;
    solver_for(steps)?.can_sum_with(strategy, target).map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "how_sum")]
pub fn py_how_sum(target: i64, steps: Vec<i64>) -> PyResult<Option<Combination>> {
    solver_for(steps)?.how_sum(target).map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "all_how_sum")]
pub fn py_all_how_sum(target: i64, steps: Vec<i64>) -> PyResult<Vec<Combination>> {
    let combinations = solver_for(steps)?.all_how_sum(target).map_err(to_py_err)?;
    Ok(combinations.into_iter().collect())
}
