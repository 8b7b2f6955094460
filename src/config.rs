//! Runtime configuration from `DEXVS_*` environment variables. Invalid values are
//! reported and replaced by their defaults.

use std::env;
use std::time::Duration;

use crate::catalog::{index_url, DEFAULT_API_BASE, DEFAULT_BATCH_SIZE, DEFAULT_INDEX_LIMIT};
use crate::data::selection::DEFAULT_SELECTION_PATH;
use crate::data::DEFAULT_LANGUAGE;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    pub api_base: String,
    pub index_limit: u32,
    pub batch_size: usize,
    pub timeout: Duration,
    pub selection_path: String,
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            index_limit: DEFAULT_INDEX_LIMIT,
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            selection_path: DEFAULT_SELECTION_PATH.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        Self {
            bind_addr: text("DEXVS_BIND", defaults.bind_addr),
            api_base: text("DEXVS_API_BASE", defaults.api_base),
            index_limit: parse_or(&lookup, "DEXVS_INDEX_LIMIT", defaults.index_limit),
            batch_size: parse_or(&lookup, "DEXVS_BATCH_SIZE", defaults.batch_size).max(1),
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "DEXVS_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
            selection_path: text("DEXVS_SELECTION_PATH", defaults.selection_path),
            language: text("DEXVS_LANG", defaults.language),
        }
    }

    pub fn index_url(&self) -> String {
        index_url(&self.api_base, self.index_limit)
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match lookup(name) {
        None => default,
        Some(value) => value.trim().parse::<T>().unwrap_or_else(|_| {
            tracing::warn!("invalid {name} '{value}', defaulting to {default}");
            default
        }),
    }
}
