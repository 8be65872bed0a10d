use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered sequence of step values, in the order they are taken.
pub type Combination = Vec<u32>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    InvalidArgument(String),
    Overflow(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            SolverError::Overflow(msg) => write!(f, "Overflow: {}", msg),
        }
    }
}

impl std::error::Error for SolverError {}

/// The positive step values a sum may be built from, in caller order.
///
/// The order matters: recursive solvers try values front to back, so it
/// decides which witness is found first. A value of zero would never shrink
/// the target, so construction rejects it along with negatives and empty
/// lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct StepValues(pub(crate) Vec<u32>);

impl StepValues {
    pub fn new<I>(values: I) -> Result<Self, SolverError>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut steps = Vec::new();
        for value in values {
            if value <= 0 {
                return Err(SolverError::InvalidArgument(format!(
                    "step value {} must be positive",
                    value
                )));
            }
            let step = u32::try_from(value).map_err(|_| {
                SolverError::InvalidArgument(format!("step value {} is too large", value))
            })?;
            steps.push(step);
        }

        if steps.is_empty() {
            return Err(SolverError::InvalidArgument(
                "step values must not be empty".to_string(),
            ));
        }

        Ok(StepValues(steps))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn contains(&self, value: u32) -> bool {
        self.0.contains(&value)
    }

    pub fn min(&self) -> u32 {
        // Non-empty by construction.
        self.0.iter().copied().min().unwrap_or(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<i64>> for StepValues {
    type Error = SolverError;

    fn try_from(values: Vec<i64>) -> Result<Self, Self::Error> {
        StepValues::new(values)
    }
}

impl From<StepValues> for Vec<i64> {
    fn from(steps: StepValues) -> Self {
        steps.0.into_iter().map(i64::from).collect()
    }
}

impl fmt::Display for StepValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}]", values.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Naive,
    #[default]
    Memoized,
    Tabulated,
}

impl Strategy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "naive" => Some(Strategy::Naive),
            "memoized" | "memo" => Some(Strategy::Memoized),
            "tabulated" | "table" => Some(Strategy::Tabulated),
            _ => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Naive => write!(f, "naive"),
            Strategy::Memoized => write!(f, "memoized"),
            Strategy::Tabulated => write!(f, "tabulated"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SumMode {
    #[default]
    Exists,
    Witness,
    All,
}

impl SumMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "exists" | "can" => Some(SumMode::Exists),
            "witness" | "how" => Some(SumMode::Witness),
            "all" => Some(SumMode::All),
            _ => None,
        }
    }
}

impl fmt::Display for SumMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SumMode::Exists => write!(f, "exists"),
            SumMode::Witness => write!(f, "witness"),
            SumMode::All => write!(f, "all"),
        }
    }
}
