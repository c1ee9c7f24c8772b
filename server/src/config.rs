//! FILENAME: server/src/config.rs
//! Environment-driven server configuration.

use std::net::SocketAddr;
use std::str::FromStr;

use log::LevelFilter;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Number of fact records generated at startup.
    pub dataset_size: usize,
    /// Seed for the dataset generator.
    pub seed: u64,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            dataset_size: 2000,
            seed: 42,
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    /// Reads `ANALYSE_ADDR`, `ANALYSE_DATASET_SIZE`, `ANALYSE_SEED`
    /// and `ANALYSE_LOG`. Unset or unparsable variables fall back to
    /// defaults with a warning.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            bind_addr: env_or("ANALYSE_ADDR", defaults.bind_addr),
            dataset_size: env_or("ANALYSE_DATASET_SIZE", defaults.dataset_size),
            seed: env_or("ANALYSE_SEED", defaults.seed),
            log_level: env_or("ANALYSE_LOG", defaults.log_level),
        }
    }
}

fn env_or<T: FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("{}={:?} is invalid, using default {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}
