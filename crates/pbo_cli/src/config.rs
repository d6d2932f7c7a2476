use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::warn;

use pbo_core::{Coefficient, ConstraintOptions};

pub const DEFAULT_CONFIG_FILE: &str = "pbo_config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PboConfig {
    /// Penalty weight for constraints that do not set their own
    pub lam: f64,
    pub log_trick: bool,
    /// Degree bound for `convert --to pubo|hising` without `--degree`
    pub degree: Option<usize>,
    /// `solve` refuses models with more variables than this
    pub max_bruteforce_variables: usize,
}

impl Default for PboConfig {
    fn default() -> Self {
        Self {
            lam: 1.0,
            log_trick: true,
            degree: None,
            max_bruteforce_variables: 24,
        }
    }
}

impl PboConfig {
    /// Read `path`, or `pbo_config.toml` in the working directory. Missing or
    /// unreadable files fall back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => warn!(target: "config", "Error parsing {}: {}. Using defaults.", path.display(), e),
                },
                Err(e) => warn!(target: "config", "Error reading {}: {}. Using defaults.", path.display(), e),
            }
        }
        Self::default()
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let mut file = fs::File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Defaults applied to constraints of a loaded document.
    pub fn constraint_options(&self) -> ConstraintOptions {
        ConstraintOptions::new()
            .lam(exact_coefficient(self.lam))
            .log_trick(self.log_trick)
    }
}

/// Integral values become exact coefficients; the rest stay floating.
pub fn exact_coefficient(v: f64) -> Coefficient {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Coefficient::from(v as i64)
    } else {
        Coefficient::from(v)
    }
}
