use crate::constants::{MAX_STAIRS, NAIVE_STAIRS_LIMIT};
use crate::types::{SolverError, Strategy};
use log::{debug, warn};
use std::collections::HashMap;

/// Number of ways to climb `n` stairs taking one or two steps at a time.
///
/// Plain recursion, exponential in `n`.
pub fn count_stairs(n: i64) -> Result<u64, SolverError> {
    let n = validate_stairs(n)?;
    if n > NAIVE_STAIRS_LIMIT {
        warn!("Naive stair count for n={} will be very slow", n);
    }
    Ok(count_naive(n))
}

/// Same count as [`count_stairs`], caching each `n` in a table that lives
/// for this call only.
pub fn count_stairs_memo(n: i64) -> Result<u64, SolverError> {
    let n = validate_stairs(n)?;
    let mut memo = HashMap::new();
    let count = count_memo(n, &mut memo);
    debug!("Memoized stair count for n={} used {} memo entries", n, memo.len());
    Ok(count)
}

/// Bottom-up count that never recurses.
pub fn count_stairs_tabulated(n: i64) -> Result<u64, SolverError> {
    let n = validate_stairs(n)?;
    let (mut previous, mut current) = (1u64, 1u64);
    for _ in 1..n {
        let next = previous + current;
        previous = current;
        current = next;
    }
    Ok(current)
}

pub fn count_stairs_with(strategy: Strategy, n: i64) -> Result<u64, SolverError> {
    match strategy {
        Strategy::Naive => count_stairs(n),
        Strategy::Memoized => count_stairs_memo(n),
        Strategy::Tabulated => count_stairs_tabulated(n),
    }
}

fn validate_stairs(n: i64) -> Result<u64, SolverError> {
    let n = u64::try_from(n).map_err(|_| {
        SolverError::InvalidArgument(format!("stair count {} must not be negative", n))
    })?;
    if n > MAX_STAIRS {
        return Err(SolverError::Overflow(format!(
            "ways to climb {} stairs exceed u64 (max n is {})",
            n, MAX_STAIRS
        )));
    }
    Ok(n)
}

fn count_naive(n: u64) -> u64 {
    if n <= 1 {
        return 1;
    }
    count_naive(n - 1) + count_naive(n - 2)
}

fn count_memo(n: u64, memo: &mut HashMap<u64, u64>) -> u64 {
    if n <= 1 {
        return 1;
    }
    if let Some(&count) = memo.get(&n) {
        return count;
    }
    let count = count_memo(n - 1, memo) + count_memo(n - 2, memo);
    memo.insert(n, count);
    count
}
