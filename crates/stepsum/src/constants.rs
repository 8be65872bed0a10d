pub const CASES_FILE_NAME: &str = "cases.toml";

pub const CASES_ENV_VAR: &str = "STEPSUM_CASES";

/// Largest stair count whose number of ways fits in a `u64` (F(93)).
pub const MAX_STAIRS: u64 = 92;

/// Past this the naive stair recursion takes seconds to minutes.
pub const NAIVE_STAIRS_LIMIT: u64 = 40;

/// Deepest recursion the sum solvers attempt, in steps taken. Sized so a
/// debug build stays well inside a 2 MiB test-thread stack.
pub const MAX_RECURSION_DEPTH: i64 = 2_000;

/// Largest table the tabulated solver allocates, in entries.
pub const MAX_TABLE_SIZE: u64 = 10_000_000;

/// Enumeration gives up once any remainder has more combinations than this.
pub const MAX_COMBINATIONS: usize = 10_000;

pub fn get_cases_override() -> Option<String> {
    std::env::var(CASES_ENV_VAR).ok().filter(|value| !value.trim().is_empty())
}
