use crate::constants::{MAX_COMBINATIONS, MAX_RECURSION_DEPTH, MAX_TABLE_SIZE};
use crate::types::{Combination, SolverError, StepValues, Strategy};
use log::{debug, trace, warn};
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

/// Answers whether, how and in how many ways a target can be written as a
/// sum of step values, each usable any number of times.
///
/// Every operation builds its own memo table and drops it on return, so
/// repeated or interleaved calls never see each other's results. The
/// recursive operations never descend more than [`MAX_RECURSION_DEPTH`]
/// steps: existence checks switch to the table past that depth, witness
/// searches return an error.
#[derive(Debug, Clone)]
pub struct SumCombinationSolver {
    steps: StepValues,
}

#[derive(Debug, Default)]
struct AllSumMemo {
    reachable: HashMap<i64, bool>,
    combinations: HashMap<i64, BTreeSet<Combination>>,
}

impl SumCombinationSolver {
    pub fn new(steps: StepValues) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &StepValues {
        &self.steps
    }

    /// Number of steps the deepest recursive path for `target` takes.
    pub fn recursion_depth(&self, target: i64) -> i64 {
        target / i64::from(self.steps.min())
    }

    /// Plain recursion without a memo; exponential in the target.
    pub fn can_sum(&self, target: i64) -> Result<bool, SolverError> {
        debug!("can_sum({}) over {}", target, self.steps);
        if self.too_deep(target) {
            warn!("can_sum({}) is too deep to recurse on; using the table", target);
            return self.can_sum_tabulated(target);
        }
        Ok(self.can_naive(target))
    }

    pub fn can_sum_memo(&self, target: i64) -> Result<bool, SolverError> {
        if self.too_deep(target) {
            warn!("can_sum_memo({}) is too deep to recurse on; using the table", target);
            return self.can_sum_tabulated(target);
        }

        let mut memo = HashMap::new();
        let reachable = self.can_memo(target, &mut memo);
        debug!(
            "can_sum_memo({}) over {} = {} ({} memo entries)",
            target,
            self.steps,
            reachable,
            memo.len()
        );
        Ok(reachable)
    }

    /// Iterative reachability. Small targets fill a table over
    /// `0..=target`; larger ones keep only the smallest reachable sum per
    /// residue modulo the smallest step.
    pub fn can_sum_tabulated(&self, target: i64) -> Result<bool, SolverError> {
        if target < 0 {
            return Ok(false);
        }
        let target = target as u64;
        let reachable = if target < MAX_TABLE_SIZE {
            self.reachable_by_table(target)
        } else {
            self.reachable_by_residue(target)?
        };
        debug!("can_sum_tabulated({}) over {} = {}", target, self.steps, reachable);
        Ok(reachable)
    }

    pub fn can_sum_with(&self, strategy: Strategy, target: i64) -> Result<bool, SolverError> {
        match strategy {
            Strategy::Naive => self.can_sum(target),
            Strategy::Memoized => self.can_sum_memo(target),
            Strategy::Tabulated => self.can_sum_tabulated(target),
        }
    }

    /// One combination summing to `target`, in the order the steps are
    /// taken, or `None` when the target is unreachable.
    ///
    /// Step values are tried in caller order and the first success wins.
    pub fn how_sum(&self, target: i64) -> Result<Option<Combination>, SolverError> {
        self.check_depth(target)?;
        let mut unreachable = HashSet::new();
        let witness = self.how_memo(target, &mut unreachable).map(|mut path| {
            path.reverse();
            path
        });
        debug!("how_sum({}) over {} = {:?}", target, self.steps, witness);
        Ok(witness)
    }

    /// Every ordered combination summing to `target`. Empty when the target
    /// is unreachable; a target of zero yields only the empty combination.
    pub fn all_how_sum(&self, target: i64) -> Result<BTreeSet<Combination>, SolverError> {
        if target == 0 {
            return Ok(BTreeSet::from([Vec::new()]));
        }
        self.check_depth(target)?;

        let mut memo = AllSumMemo::default();
        let combinations: BTreeSet<Combination> = if self.all_memo(target, &mut memo)? {
            memo.combinations
                .remove(&target)
                .unwrap_or_default()
                .into_iter()
                .map(|mut combination| {
                    combination.reverse();
                    combination
                })
                .collect()
        } else {
            BTreeSet::new()
        };

        debug!(
            "all_how_sum({}) over {} found {} combinations",
            target,
            self.steps,
            combinations.len()
        );
        Ok(combinations)
    }

    fn too_deep(&self, target: i64) -> bool {
        self.recursion_depth(target) > MAX_RECURSION_DEPTH
    }

    fn check_depth(&self, target: i64) -> Result<(), SolverError> {
        if self.too_deep(target) {
            return Err(SolverError::InvalidArgument(format!(
                "target {} needs up to {} steps; combinations are only built up to {}",
                target,
                self.recursion_depth(target),
                MAX_RECURSION_DEPTH
            )));
        }
        Ok(())
    }

    fn reachable_by_table(&self, target: u64) -> bool {
        let size = target as usize + 1;
        let mut reachable = vec![false; size];
        reachable[0] = true;
        for current in 1..size {
            let reachable_now = self
                .steps
                .iter()
                .map(|step| step as usize)
                .any(|step| step <= current && reachable[current - step]);
            reachable[current] = reachable_now;
        }
        reachable[target as usize]
    }

    // Shortest reachable sum in each residue class of the smallest step.
    // Adding that step keeps the residue, so `target` is reachable exactly
    // when the shortest sum in its class is no larger.
    fn reachable_by_residue(&self, target: u64) -> Result<bool, SolverError> {
        let modulus = u64::from(self.steps.min());
        if modulus > MAX_TABLE_SIZE {
            return Err(SolverError::InvalidArgument(format!(
                "smallest step {} is too large to tabulate target {}",
                modulus, target
            )));
        }

        let mut shortest = vec![u64::MAX; modulus as usize];
        let mut queue = BinaryHeap::from([Reverse((0u64, 0u64))]);
        shortest[0] = 0;
        while let Some(Reverse((sum, residue))) = queue.pop() {
            if sum > shortest[residue as usize] {
                continue;
            }
            for step in self.steps.iter().map(u64::from) {
                let next_sum = sum + step;
                let next_residue = (residue + step) % modulus;
                if next_sum < shortest[next_residue as usize] {
                    shortest[next_residue as usize] = next_sum;
                    queue.push(Reverse((next_sum, next_residue)));
                }
            }
        }

        Ok(shortest[(target % modulus) as usize] <= target)
    }

    fn can_naive(&self, target: i64) -> bool {
        if target == 0 {
            return true;
        }
        if target < 0 {
            return false;
        }
        for step in self.steps.iter() {
            if self.can_naive(target - i64::from(step)) {
                return true;
            }
        }
        false
    }

    fn can_memo(&self, target: i64, memo: &mut HashMap<i64, bool>) -> bool {
        if target == 0 {
            return true;
        }
        if target < 0 {
            return false;
        }
        if let Some(&reachable) = memo.get(&target) {
            trace!("memo hit for remainder {}: {}", target, reachable);
            return reachable;
        }

        let mut reachable = false;
        for step in self.steps.iter() {
            if self.can_memo(target - i64::from(step), memo) {
                reachable = true;
                break;
            }
        }
        memo.insert(target, reachable);
        reachable
    }

    // Path comes back reversed: each frame appends its step while unwinding.
    // A success unwinds straight to the caller, so only remainders proven
    // unreachable are worth remembering.
    fn how_memo(&self, target: i64, unreachable: &mut HashSet<i64>) -> Option<Combination> {
        if target == 0 {
            return Some(Vec::new());
        }
        if target < 0 || unreachable.contains(&target) {
            return None;
        }

        for step in self.steps.iter() {
            if let Some(mut path) = self.how_memo(target - i64::from(step), unreachable) {
                path.push(step);
                return Some(path);
            }
        }

        unreachable.insert(target);
        None
    }

    // Combinations are stored reversed, same as `how_memo`.
    fn all_memo(&self, target: i64, memo: &mut AllSumMemo) -> Result<bool, SolverError> {
        if target == 0 {
            return Ok(true);
        }
        if target < 0 {
            return Ok(false);
        }
        if let Some(&reachable) = memo.reachable.get(&target) {
            return Ok(reachable);
        }

        let mut found = BTreeSet::new();
        for step in self.steps.iter() {
            let rest = target - i64::from(step);
            if !self.all_memo(rest, memo)? {
                continue;
            }
            if rest == 0 {
                found.insert(vec![step]);
                continue;
            }
            if let Some(tails) = memo.combinations.get(&rest) {
                for tail in tails {
                    let mut combination = tail.clone();
                    combination.push(step);
                    found.insert(combination);
                }
            }
            if found.len() > MAX_COMBINATIONS {
                return Err(SolverError::InvalidArgument(format!(
                    "remainder {} already has more than {} combinations",
                    target, MAX_COMBINATIONS
                )));
            }
        }

        let reachable = !found.is_empty();
        memo.reachable.insert(target, reachable);
        if reachable {
            memo.combinations.insert(target, found);
        }
        Ok(reachable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver(values: &[i64]) -> SumCombinationSolver {
        SumCombinationSolver::new(StepValues::new(values.iter().copied()).unwrap())
    }

    // Enumerates ordered combinations with an explicit stack, independent of
    // the memoized recursion.
    fn brute_force_combinations(target: i64, steps: &[u32]) -> BTreeSet<Combination> {
        let mut results = BTreeSet::new();
        let mut stack: Vec<(i64, Combination)> = vec![(target, Vec::new())];
        while let Some((remaining, prefix)) = stack.pop() {
            if remaining == 0 {
                results.insert(prefix);
                continue;
            }
            for &step in steps {
                if i64::from(step) <= remaining {
                    let mut next = prefix.clone();
                    next.push(step);
                    stack.push((remaining - i64::from(step), next));
                }
            }
        }
        results
    }

    fn assert_valid_combination(combination: &[u32], target: i64, solver: &SumCombinationSolver) {
        let sum: i64 = combination.iter().map(|&v| i64::from(v)).sum();
        assert_eq!(sum, target, "Combination {:?} should sum to {}", combination, target);
        assert!(
            combination.iter().all(|&v| solver.steps().contains(v)),
            "Combination {:?} uses values outside {}",
            combination,
            solver.steps()
        );
    }

    #[test]
    fn test_can_sum_reference_cases() {
        let small = solver(&[3, 4, 5, 7]);
        assert!(small.can_sum(7).unwrap());
        assert!(small.can_sum_memo(7).unwrap());
        assert!(small.can_sum_tabulated(7).unwrap());

        let sevens = solver(&[7, 14]);
        assert!(!sevens.can_sum_memo(300).unwrap());
        assert!(!sevens.can_sum_tabulated(300).unwrap());
        // 300 leaves remainder 6 modulo 7
        assert_ne!(300 % 7, 0);
        assert!(sevens.can_sum_memo(301).unwrap());
    }

    #[test]
    fn test_terminal_cases() {
        let steps = solver(&[2, 3]);
        assert!(steps.can_sum(0).unwrap());
        assert!(steps.can_sum_memo(0).unwrap());
        assert!(steps.can_sum_tabulated(0).unwrap());
        assert!(!steps.can_sum(-1).unwrap());
        assert!(!steps.can_sum_memo(-4).unwrap());
        assert!(!steps.can_sum_tabulated(-4).unwrap());
        assert!(!steps.can_sum_memo(1).unwrap());
        assert_eq!(steps.how_sum(0).unwrap(), Some(Vec::new()));
        assert_eq!(steps.how_sum(-3).unwrap(), None);
        assert!(steps.all_how_sum(-3).unwrap().is_empty());
        assert_eq!(steps.all_how_sum(0).unwrap(), BTreeSet::from([Vec::new()]));
    }

    #[test]
    fn test_strategies_agree_across_targets() {
        for values in [&[3, 4, 5, 7][..], &[7, 14][..], &[5, 3][..], &[4, 6, 10][..], &[1][..]] {
            let solver = solver(values);
            for target in -5..=40 {
                let naive = solver.can_sum(target).unwrap();
                assert_eq!(
                    naive,
                    solver.can_sum_memo(target).unwrap(),
                    "{:?} target {}",
                    values,
                    target
                );
                assert_eq!(
                    naive,
                    solver.can_sum_tabulated(target).unwrap(),
                    "{:?} target {}",
                    values,
                    target
                );
            }
        }
    }

    #[test]
    fn test_how_sum_returns_valid_witness() {
        let solver = solver(&[2, 3, 4, 5]);
        let witness = solver.how_sum(8).unwrap().expect("8 should be reachable");
        assert_valid_combination(&witness, 8, &solver);
    }

    #[test]
    fn test_how_sum_follows_caller_order() {
        let solver = solver(&[3, 4, 5, 7]);
        assert_eq!(solver.how_sum(7).unwrap(), Some(vec![3, 4]));

        let reordered = self::solver(&[7, 3, 4, 5]);
        assert_eq!(reordered.how_sum(7).unwrap(), Some(vec![7]));
    }

    #[test]
    fn test_how_sum_unreachable() {
        let solver = solver(&[7, 14]);
        assert_eq!(solver.how_sum(300).unwrap(), None);
        assert_eq!(solver.how_sum(6).unwrap(), None);
    }

    #[test]
    fn test_how_sum_agrees_with_reachability() {
        let solver = solver(&[5, 3, 11]);
        for target in -3..=60 {
            let witness = solver.how_sum(target).unwrap();
            assert_eq!(
                witness.is_some(),
                solver.can_sum_memo(target).unwrap(),
                "target {}",
                target
            );
            if let Some(witness) = witness {
                assert_valid_combination(&witness, target, &solver);
            }
        }
    }

    #[test]
    fn test_all_how_sum_matches_brute_force() {
        let solver = solver(&[2, 3, 4, 5]);
        let all = solver.all_how_sum(8).unwrap();

        assert!(all.contains(&vec![4, 4]));
        assert!(all.contains(&vec![3, 5]));
        assert!(all.contains(&vec![5, 3]));
        assert!(all.contains(&vec![2, 2, 2, 2]));
        for combination in &all {
            assert_valid_combination(combination, 8, &solver);
        }
        assert_eq!(all, brute_force_combinations(8, solver.steps().as_slice()));
    }

    #[test]
    fn test_all_how_sum_with_unhelpful_step() {
        // 9 never fits under 8 and must not stop 3 and 5 from being tried.
        let solver = solver(&[9, 3, 5]);
        let all = solver.all_how_sum(8).unwrap();
        assert_eq!(all, BTreeSet::from([vec![3, 5], vec![5, 3]]));
    }

    #[test]
    fn test_all_how_sum_across_targets() {
        let solver = solver(&[3, 2, 5, 4]);
        for target in 1..=15 {
            let all = solver.all_how_sum(target).unwrap();
            assert_eq!(all, brute_force_combinations(target, solver.steps().as_slice()));
            assert_eq!(!all.is_empty(), solver.can_sum_memo(target).unwrap());
        }
        assert!(self::solver(&[7, 14]).all_how_sum(20).unwrap().is_empty());
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let solver = solver(&[3, 2, 5, 4]);
        assert_eq!(solver.can_sum_memo(8), solver.can_sum_memo(8));
        assert_eq!(solver.how_sum(8), solver.how_sum(8));
        assert_eq!(solver.all_how_sum(8), solver.all_how_sum(8));
        assert_eq!(
            solver.can_sum_with(Strategy::Tabulated, 8),
            solver.can_sum_with(Strategy::Naive, 8)
        );
    }

    #[test]
    fn test_tabulated_handles_deep_targets() {
        let solver = solver(&[7, 14]);
        assert!(solver.can_sum_tabulated(7_000_000).unwrap());
        assert!(!solver.can_sum_tabulated(7_000_001).unwrap());
    }

    #[test]
    fn test_recursion_up_to_depth_limit() {
        let ones = solver(&[1]);
        let target = MAX_RECURSION_DEPTH;
        assert_eq!(ones.recursion_depth(target), MAX_RECURSION_DEPTH);

        assert!(ones.can_sum(target).unwrap());
        assert!(ones.can_sum_memo(target).unwrap());
        assert_eq!(ones.how_sum(target).unwrap(), Some(vec![1; target as usize]));
        assert_eq!(
            ones.all_how_sum(target).unwrap(),
            BTreeSet::from([vec![1; target as usize]])
        );
    }

    #[test]
    fn test_witness_search_past_depth_limit_is_rejected() {
        let ones = solver(&[1]);
        let target = MAX_RECURSION_DEPTH + 1;
        assert!(matches!(ones.how_sum(target), Err(SolverError::InvalidArgument(_))));
        assert!(matches!(ones.all_how_sum(target), Err(SolverError::InvalidArgument(_))));
        assert!(matches!(
            ones.how_sum(1_000_000),
            Err(SolverError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_existence_past_depth_limit_uses_table() {
        let ones = solver(&[1]);
        assert!(ones.can_sum(60_000).unwrap());
        assert!(ones.can_sum_memo(60_000).unwrap());
        assert!(ones.can_sum_memo(MAX_RECURSION_DEPTH + 1).unwrap());

        let twos = solver(&[2]);
        assert!(!twos.can_sum_memo(60_001).unwrap());
        assert!(twos.can_sum_with(Strategy::Naive, 60_000).unwrap());
    }

    #[test]
    fn test_huge_targets_use_residue_classes() {
        let sevens = solver(&[7, 14]);
        // 9 * 10^18 leaves remainder 2 modulo 7
        assert!(!sevens.can_sum_tabulated(9_000_000_000_000_000_000).unwrap());
        assert!(!sevens.can_sum_memo(9_000_000_000_000_000_000).unwrap());
        assert!(sevens.can_sum_tabulated(7_000_000_000_000_000_000).unwrap());
        assert!(sevens.can_sum_tabulated(i64::MAX / 7 * 7).unwrap());

        // Frobenius number of {6, 9, 20} is 43
        let nuggets = solver(&[6, 9, 20]);
        assert!(nuggets.can_sum_tabulated(i64::MAX).unwrap());
        assert!(nuggets.can_sum_tabulated(MAX_TABLE_SIZE as i64).unwrap());
    }

    #[test]
    fn test_residue_classes_match_table() {
        for values in [&[6, 9, 20][..], &[5, 3, 11][..], &[4, 6, 10][..], &[7, 14][..], &[9][..]] {
            let solver = solver(values);
            for target in 0..=200u64 {
                assert_eq!(
                    solver.reachable_by_residue(target).unwrap(),
                    solver.reachable_by_table(target),
                    "{:?} target {}",
                    values,
                    target
                );
            }
        }
        assert!(!solver(&[6, 9, 20]).reachable_by_residue(43).unwrap());
        assert!(solver(&[6, 9, 20]).reachable_by_residue(44).unwrap());
    }

    #[test]
    fn test_residue_table_rejects_oversized_modulus() {
        let solver = solver(&[i64::from(u32::MAX)]);
        assert!(matches!(
            solver.can_sum_tabulated(i64::MAX),
            Err(SolverError::InvalidArgument(_))
        ));
        // Below the table limit the plain table still answers.
        assert!(!solver.can_sum_tabulated(1_000).unwrap());
    }

    #[test]
    fn test_enumeration_stops_at_combination_cap() {
        let solver = solver(&[1, 2]);
        assert!(matches!(solver.all_how_sum(60), Err(SolverError::InvalidArgument(_))));
        // 19 has F(20) = 6765 combinations, under the cap.
        assert_eq!(solver.all_how_sum(19).unwrap().len(), 6765);
    }
}
