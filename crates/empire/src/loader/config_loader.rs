//! Load a [`DataSourceConfig`] from a JSON object or a property file.

use std::path::Path;

use super::LoadError;
use crate::source::config::DataSourceConfig;

/// Load configuration from disk. `.json` files are read as a flat JSON
/// object of strings; anything else as `key = value` lines.
pub fn load_config(path: &Path) -> Result<DataSourceConfig, LoadError> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_json(&content)
    } else {
        parse_properties(&content)
    }
}

pub fn parse_json(content: &str) -> Result<DataSourceConfig, LoadError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse `key = value` lines. Blank lines and lines starting with `#` are
/// skipped; later keys override earlier ones.
pub fn parse_properties(content: &str) -> Result<DataSourceConfig, LoadError> {
    let mut config = DataSourceConfig::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(LoadError::MalformedLine {
                line: index + 1,
                content: line.to_string(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(LoadError::MalformedLine {
                line: index + 1,
                content: line.to_string(),
            });
        }
        config.insert(key, value.trim());
    }
    Ok(config)
}
