use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Human-readable name of the dataset being served.
    pub dataset: String,
    pub environment: String,
}

/// Where the measurement snapshot comes from. The password is not part
/// of the file; binaries read it from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub uri: String,
    pub database: String,
    pub user: String,
}

/// Policy knobs for the analytics pipeline. These were hard-coded
/// constants in earlier incarnations of the system; surfacing them here
/// keeps one place to tune them per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Adjacency traversal depth for neighbor comparison.
    pub max_hops: usize,
    /// Upper bound on collected neighbors per reference subject.
    pub max_neighbors: usize,
    /// Groupings smaller than this skip the outlier fence.
    pub min_fence_samples: usize,
    /// How many entries the top/bottom reference picks take.
    pub top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_hops: 2,
            max_neighbors: 100,
            min_fence_samples: 4,
            top_k: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub output: String,
    pub file_path: String,
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from environment variable or default path
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_FILE")
            .unwrap_or_else(|_| "config/default.toml".to_string());
        Self::from_file(path)
    }
}
