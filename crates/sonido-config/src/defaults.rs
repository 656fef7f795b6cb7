//! `GraphDefaults`: a small TOML settings file layered beneath the JSON
//! topology format — bounds preset aliases and the default output LOD new
//! nodes are created with.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Named aliases for [`sonido_core::BoundsPreset::Custom`] ranges, so a saved
/// topology can reference `"pan"` instead of repeating `(-1.0, 1.0)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundsAlias {
    pub min: f32,
    pub max: f32,
}

/// Process-wide graph defaults, loaded once at host startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphDefaults {
    /// LOD new output ports are configured with before any operation runs.
    #[serde(default = "default_lod")]
    pub default_lod: f32,

    /// Named bounds aliases, keyed by name.
    #[serde(default)]
    pub bounds_aliases: BTreeMap<String, BoundsAlias>,
}

fn default_lod() -> f32 {
    1.0
}

impl Default for GraphDefaults {
    fn default() -> Self {
        Self {
            default_lod: default_lod(),
            bounds_aliases: BTreeMap::new(),
        }
    }
}

impl GraphDefaults {
    /// Load defaults from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Ok(toml::from_str(&content)?)
    }

    /// Parse defaults from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save defaults to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Look up a bounds alias by name.
    pub fn bounds(&self, name: &str) -> Option<(f32, f32)> {
        self.bounds_aliases.get(name).map(|a| (a.min, a.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lod_is_one() {
        assert_eq!(GraphDefaults::default().default_lod, 1.0);
    }

    #[test]
    fn bounds_alias_round_trips_through_toml() {
        let mut defaults = GraphDefaults::default();
        defaults.bounds_aliases.insert("pan".to_string(), BoundsAlias { min: -1.0, max: 1.0 });
        let toml = toml::to_string_pretty(&defaults).unwrap();
        let parsed = GraphDefaults::from_toml(&toml).unwrap();
        assert_eq!(parsed.bounds("pan"), Some((-1.0, 1.0)));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let parsed = GraphDefaults::from_toml("").unwrap();
        assert_eq!(parsed.default_lod, 1.0);
        assert!(parsed.bounds_aliases.is_empty());
    }
}
