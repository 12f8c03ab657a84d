//! Delimiter configuration: JSON file plus command line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::model::DelimiterConfig;

/// Values given on the command line; each one replaces the file's value.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub start: Option<String>,
    pub end: Option<String>,
    /// Every char of the string is one eval marker.
    pub markers: Option<String>,
}

/// Parse a config file body. Missing fields keep their defaults.
pub fn load_from_json(json: &str) -> Result<DelimiterConfig> {
    let config: DelimiterConfig = serde_json::from_str(json)?;
    Ok(config)
}

pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<DelimiterConfig> {
    let mut config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Reading {}", path.display()))?;
            let config = load_from_json(&json)
                .with_context(|| format!("Parsing config {}", path.display()))?;
            info!(path = %path.display(), "config loaded");
            config
        }
        None => DelimiterConfig::default(),
    };

    if let Some(start) = &overrides.start {
        config.start = start.clone();
    }
    if let Some(end) = &overrides.end {
        config.end = end.clone();
    }
    if let Some(markers) = &overrides.markers {
        config.eval_markers = markers.chars().collect();
    }

    config.validate()?;
    for problem in ambiguities(&config) {
        warn!("{problem}");
    }
    Ok(config)
}

/// Legal configurations that still scan surprisingly.
pub fn ambiguities(config: &DelimiterConfig) -> Vec<String> {
    let mut problems = Vec::new();

    if config.start == config.end {
        problems.push(format!(
            "start and end delimiter are both `{}`",
            config.start
        ));
    } else if config.end.starts_with(config.start.as_str())
        || config.start.starts_with(config.end.as_str())
    {
        problems.push(format!(
            "`{}` and `{}` are prefixes of one another; the first match wins",
            config.start, config.end
        ));
    }

    if let Some(first) = config.end.chars().next() {
        if config.is_eval_marker(first) {
            problems.push(format!(
                "eval marker `{first}` also starts the end delimiter `{}`",
                config.end
            ));
        }
    }

    problems
}
