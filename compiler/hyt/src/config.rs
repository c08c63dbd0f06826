//! Environment-driven configuration.
//!
//! | Variable            | Values                    | Default   |
//! |---------------------|---------------------------|-----------|
//! | `HYT_CHECK_ASSERTS` | `1`, `0`, `true`, `false` | `true`    |
//! | `HYT_FIND_LIMIT`    | a non-negative integer    | unbounded |

use hyt_ir::Expr;
use hyt_spec::SpecEnv;
use thiserror::Error;

pub const CHECK_ASSERTS_VAR: &str = "HYT_CHECK_ASSERTS";
pub const FIND_LIMIT_VAR: &str = "HYT_FIND_LIMIT";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: expected {expected}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Whether `assert` evaluates specs.
    pub check_asserts: bool,
    /// Default bound on [`find`](Config::find) hits.
    pub find_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            check_asserts: true,
            find_limit: None,
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`; unset variables keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(value) = lookup(CHECK_ASSERTS_VAR) {
            config.check_asserts = parse_flag(CHECK_ASSERTS_VAR, &value)?;
        }
        if let Some(value) = lookup(FIND_LIMIT_VAR) {
            let limit = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: FIND_LIMIT_VAR,
                value: value.clone(),
                expected: "a non-negative integer",
            })?;
            config.find_limit = Some(limit);
        }
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Push the settings into a spec environment.
    pub fn apply(&self, env: &SpecEnv) {
        env.set_check_asserts(self.check_asserts);
    }

    /// [`hyt_patterns::find`] bounded by the configured limit.
    pub fn find(&self, expr: &Expr, pattern: &Expr) -> Vec<Expr> {
        hyt_patterns::find(expr, pattern, self.find_limit)
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            expected: "one of 1, 0, true, false",
        }),
    }
}
