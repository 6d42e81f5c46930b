// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Runtime configuration read from environment variables.
//!
//! | Variable                | Default | Meaning                                     |
//! |-------------------------|---------|---------------------------------------------|
//! | `DRY_RUN`               | `false` | log intended changes, never call the provider |
//! | `CLOUDNS_DEBUG`         | `false` | default log level `debug` instead of `info` |
//! | `DEFAULT_TTL`           | `3600`  | TTL used when a change carries none         |
//! | `OWNER_ID`              | empty   | ownership identifier                        |
//! | `DOMAIN_FILTER`         | empty   | comma-separated domains to manage           |
//! | `EXCLUDE_DOMAIN_FILTER` | empty   | comma-separated domains to exclude          |

use crate::constants::{
    DEFAULT_RECORD_TTL_SECS, ENV_DEBUG, ENV_DEFAULT_TTL, ENV_DOMAIN_FILTER, ENV_DRY_RUN,
    ENV_EXCLUDE_DOMAIN_FILTER, ENV_OWNER_ID,
};
use crate::domain_filter::DomainFilter;
use crate::errors::ConfigError;
use tracing::info;

/// Provider configuration for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub dry_run: bool,
    pub debug: bool,
    pub default_ttl: u32,
    pub owner_id: String,
    pub domain_filter: DomainFilter,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            dry_run: false,
            debug: false,
            default_ttl: DEFAULT_RECORD_TTL_SECS,
            owner_id: String::new(),
            domain_filter: DomainFilter::default(),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected one of true, false, 1, 0, yes, no".to_string(),
        }),
    }
}

fn parse_ttl(key: &str, value: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };
    let ttl = value
        .trim()
        .parse::<u32>()
        .map_err(|e| invalid(e.to_string()))?;
    if ttl == 0 {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(ttl)
}

impl Configuration {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which returns the value of a variable if set.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let dry_run = match get(ENV_DRY_RUN) {
            Some(v) => parse_bool(ENV_DRY_RUN, &v)?,
            None => defaults.dry_run,
        };
        let debug = match get(ENV_DEBUG) {
            Some(v) => parse_bool(ENV_DEBUG, &v)?,
            None => defaults.debug,
        };
        let default_ttl = match get(ENV_DEFAULT_TTL) {
            Some(v) => parse_ttl(ENV_DEFAULT_TTL, &v)?,
            None => defaults.default_ttl,
        };
        let owner_id = get(ENV_OWNER_ID).unwrap_or_default();
        let domain_filter = DomainFilter::from_csv(
            &get(ENV_DOMAIN_FILTER).unwrap_or_default(),
            &get(ENV_EXCLUDE_DOMAIN_FILTER).unwrap_or_default(),
        );

        Ok(Self {
            dry_run,
            debug,
            default_ttl,
            owner_id,
            domain_filter,
        })
    }

    /// Log the effective settings at start-up.
    pub fn log_summary(&self) {
        let mut filters = Vec::new();
        if !self.domain_filter.filters().is_empty() {
            filters.push(format!(
                "domain filter: '{}'",
                self.domain_filter.filters().join(",")
            ));
        }
        if !self.domain_filter.exclusions().is_empty() {
            filters.push(format!(
                "exclude domain filter: '{}'",
                self.domain_filter.exclusions().join(",")
            ));
        }
        let filters = if !self.domain_filter.is_configured() {
            "no kind of domain filters".to_string()
        } else {
            filters.join(", ")
        };

        info!(
            dry_run = self.dry_run,
            default_ttl = self.default_ttl,
            owner_id = %self.owner_id,
            "Creating ClouDNS provider with {filters}"
        );
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
