use crate::compiler::{Environment, RestrictedSandbox, Target};
use crate::error::{ConfigError, ConfigResult};

pub const ENABLED_VAR: &str = "LIFECYCLE_LOG";
pub const TARGET_VAR: &str = "LIFECYCLE_LOG_TARGET";
pub const SANDBOX_VAR: &str = "LIFECYCLE_LOG_SANDBOX";

/// Runtime configuration.
///
/// Logging is on by default in debug builds and off in release builds, where
/// the call surface becomes a pure pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub enabled: bool,
    pub target: Target,
    pub restricted_sandbox: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
            target: Target::Terminal,
            restricted_sandbox: false,
        }
    }
}

impl Config {
    /// Reads `LIFECYCLE_LOG`, `LIFECYCLE_LOG_TARGET` and
    /// `LIFECYCLE_LOG_SANDBOX` from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Unset variables
    /// keep their defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lifecycle_logger::config::Config;
    /// # use lifecycle_logger::compiler::Target;
    /// let config = Config::from_lookup(|key| match key {
    ///     "LIFECYCLE_LOG" => Some("on".to_string()),
    ///     "LIFECYCLE_LOG_TARGET" => Some("console".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert!(config.enabled);
    /// assert_eq!(config.target, Target::Console);
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENABLED_VAR) {
            config.enabled = parse_flag(ENABLED_VAR, &value)?;
        }
        if let Some(value) = lookup(TARGET_VAR) {
            config.target = match value.trim().to_ascii_lowercase().as_str() {
                "terminal" | "tty" => Target::Terminal,
                "console" | "browser" => Target::Console,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: TARGET_VAR,
                        value,
                        expected: "terminal or console",
                    })
                }
            };
        }
        if let Some(value) = lookup(SANDBOX_VAR) {
            config.restricted_sandbox = parse_flag(SANDBOX_VAR, &value)?;
        }
        Ok(config)
    }

    /// The compiler environment this config describes.
    pub fn environment(&self) -> Environment {
        if self.restricted_sandbox {
            Environment::with_policy(self.target, RestrictedSandbox)
        } else {
            Environment::new(self.target)
        }
    }
}

fn parse_flag(key: &'static str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            expected: "on/off, true/false or 1/0",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_flag() {
        let err = Config::from_lookup(|key| (key == SANDBOX_VAR).then(|| "maybe".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: SANDBOX_VAR,
                value: "maybe".to_string(),
                expected: "on/off, true/false or 1/0",
            }
        );
    }

    #[test]
    fn test_invalid_target() {
        let result = Config::from_lookup(|key| (key == TARGET_VAR).then(|| "html".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_sandbox_environment_disables_styling_for_rich_values() {
        let config = Config { enabled: true, target: Target::Console, restricted_sandbox: true };
        let env = config.environment();
        assert!(env.policy.disable_styling(&[crate::Value::rich(1)]));
        assert!(!env.policy.disable_styling(&[crate::Value::from(1)]));
    }
}
