//! Shared helpers for the integration tests.
//!
//! Each test binary pulls in only what it needs.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::{const_mutex, Mutex};

/// Every variable the repository factory and `RestConfig::from_env` read.
pub const KITCHEN_ENV: [&str; 5] = [
    "REPOSITORY_TYPE",
    "KITCHEN_API_URL",
    "KITCHEN_API_TOKEN",
    "KITCHEN_API_TOKEN_SCHEME",
    "KITCHEN_API_TIMEOUT_SECS",
];

static ENV_LOCK: Mutex<()> = const_mutex(());

/// Previous values of the kitchen variables, put back on drop.
struct SavedEnv(Vec<(&'static str, Option<String>)>);

impl SavedEnv {
    fn capture() -> Self {
        Self(
            KITCHEN_ENV
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        )
    }
}

impl Drop for SavedEnv {
    fn drop(&mut self) {
        for (name, value) in &self.0 {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with only `vars` set among the kitchen variables.
///
/// All of [`KITCHEN_ENV`] is cleared first so a developer's shell cannot
/// leak into the test. Calls are serialized and the old values come back
/// even if `f` panics.
pub fn with_kitchen_env<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock();
    let _saved = SavedEnv::capture();

    for name in KITCHEN_ENV {
        std::env::remove_var(name);
    }
    for (name, value) in vars {
        std::env::set_var(name, value);
    }

    f()
}

/// A moment in the test week (March 2024).
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}
