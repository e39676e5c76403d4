//! Environment-driven configuration for the server and CLI.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::client::{CensusConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_YEAR};

pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub census: CensusConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            census: CensusConfig::from_lookup(lookup),
        }
    }
}

impl CensusConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("CENSUS_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let base_url = lookup("CENSUS_API_BASE_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            base_url,
            api_key,
            acs_year: parse_or(&lookup, "CENSUS_ACS_YEAR", DEFAULT_YEAR),
            cbp_year: parse_or(&lookup, "CENSUS_CBP_YEAR", DEFAULT_YEAR),
            timeout: lookup("CENSUS_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
