//! Project-configuration contract.
//!
//! Hosts expose project settings as a map-like JSON value; the daemon's
//! settings live under an optional `dcd` key with `port` and
//! `include-dirs` entries. Include directories may be relative to the
//! project base directory.

use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DcdProjectSettings {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default, rename = "include-dirs")]
    pub include_dirs: Vec<PathBuf>,
}

impl DcdProjectSettings {
    /// Read the `dcd` section out of a host project map. `None` when the
    /// map has no such section or it does not parse.
    pub fn from_project_map(map: &Value) -> Option<Self> {
        let section = map.get("dcd")?;
        match serde_json::from_value(section.clone()) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(error = %e, "malformed dcd project settings");
                None
            }
        }
    }

    /// Include dirs with relative entries resolved against `base_dir`.
    pub fn resolved_include_dirs(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.include_dirs
            .iter()
            .map(|dir| {
                if dir.is_absolute() {
                    dir.clone()
                } else {
                    base_dir.join(dir)
                }
            })
            .collect()
    }
}
