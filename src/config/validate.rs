// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, PathConfig, PathEntry, RawConfigFile};
use crate::errors::{ChangecheckError, Result};
use crate::types::{ModDate, SkipState};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ChangecheckError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_global_config(&raw)?;
        validate_remote_references(&raw)?;
        validate_unique_paths(&raw)?;

        let entries = raw
            .path
            .iter()
            .map(parse_entry)
            .collect::<Result<Vec<_>>>()?;

        Ok(ConfigFile::new_unchecked(raw.config, raw.remote, entries))
    }
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.interval_ms == 0 {
        return Err(ChangecheckError::ConfigError(
            "[config].interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_remote_references(cfg: &RawConfigFile) -> Result<()> {
    for entry in cfg.path.iter() {
        if let Some(name) = &entry.remote {
            if !cfg.remote.contains_key(name) {
                return Err(ChangecheckError::ConfigError(format!(
                    "path {:?} refers to unknown remote profile '{}'",
                    entry.path, name
                )));
            }
        }
    }
    Ok(())
}

fn validate_unique_paths(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in cfg.path.iter() {
        if !seen.insert(&entry.path) {
            return Err(ChangecheckError::ConfigError(format!(
                "path {:?} is listed more than once",
                entry.path
            )));
        }
    }
    Ok(())
}

fn parse_entry(entry: &PathConfig) -> Result<PathEntry> {
    Ok(PathEntry {
        path: entry.path.clone(),
        expected: parse_optional_date(entry.expected.as_deref())?,
        skip: SkipState::new(entry.skip, parse_optional_date(entry.skip_date.as_deref())?),
        pre_verified: entry.pre_verified,
        remote: entry.remote.clone(),
    })
}

fn parse_optional_date(value: Option<&str>) -> Result<ModDate> {
    match value {
        None => Ok(ModDate::invalid()),
        Some(s) => ModDate::parse_rfc3339(s).map_err(|source| ChangecheckError::InvalidDate {
            value: s.to_string(),
            source,
        }),
    }
}
