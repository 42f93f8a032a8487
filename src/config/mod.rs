//! Request and configuration loading

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load a sonification request from a JSON or YAML file
///
/// `.yaml` and `.yml` files are read as YAML, everything else as JSON.
pub fn load_request(path: &Path) -> Result<SonificationRequest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request file: {:?}", path))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let request: SonificationRequest = if is_yaml {
        serde_yaml::from_str(&contents).with_context(|| format!("invalid YAML in {:?}", path))?
    } else {
        serde_json::from_str(&contents).with_context(|| format!("invalid JSON in {:?}", path))?
    };

    request.validate()?;
    Ok(request)
}
