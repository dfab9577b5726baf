//! CLI settings

use std::path::{Path, PathBuf};

use charm_status::{PrefixStyle, StatusConfig, StatusScope};
use serde::{Deserialize, Serialize};

use crate::error::{CharmError, CharmResult};

/// Defaults for the `statustest` command, read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliSettings {
    /// Status scope to publish to
    pub scope: Option<StatusScope>,

    /// Component prefix punctuation
    pub prefix_style: Option<PrefixStyle>,

    /// Where component statuses are saved between runs
    pub state_path: Option<PathBuf>,
}

impl CliSettings {
    /// Load settings from file; a missing file yields defaults.
    pub fn load(path: Option<&Path>) -> CharmResult<Self> {
        let settings_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_settings_path()?,
        };

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)?;
            let settings: CliSettings =
                toml::from_str(&contents).map_err(|e| CharmError::Config(e.to_string()))?;
            Ok(settings)
        } else {
            Ok(CliSettings::default())
        }
    }

    /// Status config with command-line overrides applied on top.
    pub fn status_config(
        &self,
        scope: Option<StatusScope>,
        prefix_style: Option<PrefixStyle>,
    ) -> StatusConfig {
        StatusConfig {
            scope: scope.or(self.scope).unwrap_or_default(),
            prefix_style: prefix_style.or(self.prefix_style).unwrap_or_default(),
        }
    }

    fn default_settings_path() -> CharmResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CharmError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("statustest").join("settings.toml"))
    }
}
