use crate::constants::{get_cases_override, CASES_FILE_NAME};
use crate::types::{StepValues, Strategy, SumMode};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StairsCase {
    pub n: i64,
    #[serde(default)]
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumCase {
    pub target: i64,
    pub steps: StepValues,
    #[serde(default)]
    pub mode: SumMode,
    #[serde(default)]
    pub strategy: Strategy,
}

/// The literal inputs a demonstration run works through.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub stairs: Vec<StairsCase>,
    #[serde(default)]
    pub sums: Vec<SumCase>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Could not read cases: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Could not parse cases: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid cases: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl DemoConfig {
    /// The reference demonstration: small naive stair counts, the large
    /// memoized ones, and the classic sum-combination inputs.
    pub fn reference() -> Self {
        let mut stairs: Vec<StairsCase> = (1..=10)
            .map(|n| StairsCase { n, strategy: Strategy::Naive })
            .collect();
        stairs.extend([48, 49, 50].map(|n| StairsCase { n, strategy: Strategy::Memoized }));

        let sum = |target: i64, steps: &[u32], mode: SumMode, strategy: Strategy| SumCase {
            target,
            steps: StepValues(steps.to_vec()),
            mode,
            strategy,
        };

        DemoConfig {
            stairs,
            sums: vec![
                sum(7, &[3, 4, 5, 7], SumMode::Exists, Strategy::Naive),
                sum(300, &[7, 14], SumMode::Exists, Strategy::Memoized),
                sum(7, &[3, 4, 5, 7], SumMode::Witness, Strategy::Memoized),
                sum(8, &[3, 2, 5, 4], SumMode::Witness, Strategy::Memoized),
                sum(8, &[3, 2, 5, 4], SumMode::All, Strategy::Memoized),
            ],
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config: DemoConfig = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;

        if config.stairs.is_empty() && config.sums.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{} contains no stairs or sums cases",
                path.display()
            )));
        }

        debug!(
            "Loaded {} stairs and {} sums cases from {}",
            config.stairs.len(),
            config.sums.len(),
            path.display()
        );
        Ok(config)
    }

    /// Loads cases from `STEPSUM_CASES`, then the user config directory,
    /// falling back to [`DemoConfig::reference`].
    pub fn load() -> Result<Self, ConfigError> {
        match get_cases_path() {
            Some(path) => {
                info!("Using cases from {}", path.display());
                Self::load_from_path(&path)
            }
            None => Ok(Self::reference()),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

pub fn get_cases_path() -> Option<PathBuf> {
    if let Some(path) = get_cases_override() {
        return Some(PathBuf::from(path));
    }

    let path = dirs::config_dir()?.join("stepsum").join(CASES_FILE_NAME);
    debug!("Looking for cases at {}", path.display());
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}
