// Run configuration: scenario shape, file locations and solver settings

use crate::application::GeneratorConfig;
use crate::domain::SolverConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Everything a run needs. Every field has a default, so a config file only
/// has to name what it changes.
///
/// ```json
/// { "nurse_count": 12, "seed": 7, "solver": { "backend": "cbc", "time_limit": 30 } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    #[serde(flatten)]
    pub scenario: GeneratorConfig,
    pub data_dir: PathBuf,
    pub solution_file: String,
    pub solver: SolverConfig,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            scenario: GeneratorConfig::default(),
            data_dir: PathBuf::from("data"),
            solution_file: "solution.csv".to_string(),
            solver: SolverConfig::default(),
        }
    }
}

impl RosterConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn solution_path(&self) -> PathBuf {
        self.data_dir.join(&self.solution_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::CoverageProfile;
    use crate::domain::{Day, Shift, SolverBackend};

    #[test]
    fn test_defaults() {
        let config = RosterConfig::default();
        assert_eq!(config.scenario.nurse_count, 20);
        assert_eq!(config.scenario.days.len(), 7);
        assert_eq!(config.scenario.shifts, Shift::ALL.to_vec());
        assert_eq!(config.solver.time_limit, Some(60.0));
        assert_eq!(config.solver.threads, Some(8));
        assert_eq!(config.solution_path(), PathBuf::from("data/solution.csv"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RosterConfig::from_json(
            r#"{
                "nurse_count": 12,
                "days": ["Mon", "Tuesday"],
                "shifts": ["M", "night"],
                "profile": "basic",
                "rules": { "weekend_total": 8 },
                "solver": { "backend": "cbc", "time_limit": 5.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.scenario.nurse_count, 12);
        assert_eq!(config.scenario.days, vec![Day::Mon, Day::Tue]);
        assert_eq!(config.scenario.shifts, vec![Shift::Morning, Shift::Night]);
        assert_eq!(config.scenario.profile, CoverageProfile::Basic);
        assert_eq!(config.scenario.rules.weekend_total, 8);
        assert_eq!(config.scenario.rules.weekday_total, 5);
        assert_eq!(config.scenario.seed, 42);
        assert_eq!(config.solver.backend, SolverBackend::CoinCbc);
        assert_eq!(config.solver.time_limit, Some(5.0));
        assert_eq!(config.solver.threads, Some(8));
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = RosterConfig::load(Path::new("/nonexistent/roster.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/roster.json"));
    }
}
