//! Viewer configuration, read from an optional TOML file.
//!
//! ```toml
//! density = "compact"
//! horizontal_spacing = 220.0
//! initial_depth = 2
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::layout::{Density, Spacing};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub density: Density,
    /// Overrides the density's horizontal spacing.
    pub horizontal_spacing: Option<f64>,
    /// Overrides the density's vertical spacing.
    pub vertical_spacing: Option<f64>,
    /// Open the chart collapsed below this depth.
    pub initial_depth: Option<usize>,
}

impl ViewConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), ?config, "loaded view config");
        Ok(config)
    }

    pub fn spacing(&self) -> Spacing {
        let base = self.density.spacing();
        Spacing {
            horizontal: self.horizontal_spacing.unwrap_or(base.horizontal),
            vertical: self.vertical_spacing.unwrap_or(base.vertical),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn spacing_falls_back_to_density() {
        let config = ViewConfig {
            density: Density::Compact,
            vertical_spacing: Some(90.0),
            ..Default::default()
        };
        let spacing = config.spacing();
        assert_eq!(spacing.horizontal, Density::Compact.spacing().horizontal);
        assert_eq!(spacing.vertical, 90.0);
    }

    #[test]
    fn load_partial_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "density = \"compact\"\ninitial_depth = 2").unwrap();
        tmp.flush().unwrap();

        let config = ViewConfig::load(tmp.path()).unwrap();
        assert_eq!(config.density, Density::Compact);
        assert_eq!(config.initial_depth, Some(2));
        assert_eq!(config.horizontal_spacing, None);
    }

    #[test]
    fn load_rejects_unknown_density() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "density = \"huge\"").unwrap();
        tmp.flush().unwrap();

        assert!(matches!(
            ViewConfig::load(tmp.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
