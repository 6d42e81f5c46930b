// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Suffix-based zone filtering.
//!
//! A filter holds an include list and an exclude list of domain suffixes. A
//! zone passes when the include list is empty or matches it, and the exclude
//! list does not. Exclusions always win.
//!
//! A suffix written with a leading dot (`.example.com`) matches subdomains
//! only; without it (`example.com`) the domain itself matches as well.
//! Comparison is case-insensitive and ignores trailing dots.
//!
//! ```rust
//! use cloudns_sync::domain_filter::DomainFilter;
//!
//! let filter = DomainFilter::new(["example.com"], [".dev.example.com"]);
//! assert!(filter.matches("example.com"));
//! assert!(filter.matches("www.example.com"));
//! assert!(!filter.matches("api.dev.example.com"));
//! assert!(!filter.matches("example.org"));
//! ```

use serde::{Deserialize, Serialize};

/// Include and exclude suffix lists applied to zone names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainFilter {
    #[serde(default)]
    filters: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
}

fn normalize(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn normalize_all<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    domains
        .into_iter()
        .map(|d| normalize(d.as_ref()))
        .filter(|d| !d.is_empty())
        .collect()
}

fn matches_suffix(domain: &str, suffix: &str) -> bool {
    if suffix.starts_with('.') {
        return domain.ends_with(suffix);
    }
    domain == suffix || domain.ends_with(&format!(".{suffix}"))
}

impl DomainFilter {
    #[must_use]
    pub fn new<I, E, S, T>(filters: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            filters: normalize_all(filters),
            exclude: normalize_all(exclude),
        }
    }

    /// Parse comma-separated include and exclude lists.
    #[must_use]
    pub fn from_csv(filters: &str, exclude: &str) -> Self {
        Self::new(filters.split(','), exclude.split(','))
    }

    /// Returns true when at least one include or exclude suffix is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.filters.is_empty() || !self.exclude.is_empty()
    }

    #[must_use]
    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    #[must_use]
    pub fn exclusions(&self) -> &[String] {
        &self.exclude
    }

    /// Returns true when `domain` passes the filter.
    #[must_use]
    pub fn matches(&self, domain: &str) -> bool {
        let domain = normalize(domain);

        if self.exclude.iter().any(|s| matches_suffix(&domain, s)) {
            return false;
        }
        self.filters.is_empty() || self.filters.iter().any(|s| matches_suffix(&domain, s))
    }
}

#[cfg(test)]
#[path = "domain_filter_tests.rs"]
mod domain_filter_tests;
