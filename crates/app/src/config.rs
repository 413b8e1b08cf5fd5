//! Environment configuration.

use serde::{Deserialize, Serialize};

use jobhub_routes::HomeVariant;

pub const OPTIMIZED_HOME_VAR: &str = "JOBHUB_OPTIMIZED_HOME";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Serve the optimized home page implementation at `/`.
    pub optimized_home: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { optimized_home: true }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. Missing or unparseable values fall
    /// back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let optimized_home = match lookup(OPTIMIZED_HOME_VAR) {
            None => defaults.optimized_home,
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    var = OPTIMIZED_HOME_VAR,
                    value = %raw,
                    "unrecognized boolean; using default"
                );
                defaults.optimized_home
            }),
        };

        Self { optimized_home }
    }

    pub fn home_variant(&self) -> HomeVariant {
        HomeVariant::from_flag(self.optimized_home)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(value: Option<&str>) -> AppConfig {
        AppConfig::from_lookup(|key| {
            assert_eq!(key, OPTIMIZED_HOME_VAR);
            value.map(str::to_string)
        })
    }

    #[test]
    fn absent_flag_selects_the_optimized_home() {
        assert_eq!(with(None), AppConfig { optimized_home: true });
        assert_eq!(with(None).home_variant(), HomeVariant::Optimized);
    }

    #[test]
    fn recognized_spellings_are_case_insensitive() {
        for raw in ["true", "TRUE", "1", "yes", " On "] {
            assert!(with(Some(raw)).optimized_home, "{raw}");
        }
        for raw in ["false", "False", "0", "no", "OFF"] {
            assert!(!with(Some(raw)).optimized_home, "{raw}");
        }
        assert_eq!(with(Some("off")).home_variant(), HomeVariant::Classic);
    }

    #[test]
    fn garbage_falls_back_to_default() {
        assert!(with(Some("maybe")).optimized_home);
        assert!(with(Some("")).optimized_home);
    }
}
