//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load a patch from a YAML file
pub fn load_config(path: &Path) -> Result<PatchConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read patch file: {:?}", path))?;
    let config: PatchConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse patch file: {:?}", path))?;
    config.validate()?;
    Ok(config)
}
