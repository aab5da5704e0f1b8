//! Property-test run profile read from the environment.
//!
//! Every property suite in the workspace loads its case count and fork mode
//! through [`ProptestRunProfile`] so CI can scale them with one variable.

use std::env;

use proptest::test_runner::Config as ProptestConfig;

/// Environment variable overriding the number of proptest cases.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable toggling forked proptest execution.
pub const PEAKCLUS_PBT_FORK_ENV_KEY: &str = "PEAKCLUS_PBT_FORK";

/// Case count and fork mode for one property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads overrides from the environment, falling back to the defaults when
    /// a variable is missing or malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use peakclus_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(32, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: override_or(PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
            fork: override_or(PEAKCLUS_PBT_FORK_ENV_KEY, default_fork, parse_flag),
        }
    }

    /// Number of cases per property.
    #[must_use]
    #[rustfmt::skip]
    pub fn cases(&self) -> u32 { self.cases }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    #[rustfmt::skip]
    pub fn fork(&self) -> bool { self.fork }

    /// Converts the profile into a proptest runner configuration.
    #[must_use]
    pub fn config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            fork: self.fork,
            ..ProptestConfig::default()
        }
    }
}

/// Shorthand for `ProptestRunProfile::load(default_cases, false).config()`.
#[must_use]
pub fn suite_config(default_cases: u32) -> ProptestConfig {
    ProptestRunProfile::load(default_cases, false).config()
}

fn override_or<T: Copy>(key: &'static str, default: T, parse: fn(&str) -> Option<T>) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parse(&raw).unwrap_or_else(|| {
        tracing::warn!(env = key, raw = %raw, "ignoring malformed property-test override");
        default
    })
}

fn parse_cases(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|&cases| cases > 0)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
