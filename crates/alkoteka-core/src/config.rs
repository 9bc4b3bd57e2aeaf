use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values are errors.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("ALKOTEKA_LOG_LEVEL", "info");
    let targets_path = PathBuf::from(or_default(
        "ALKOTEKA_TARGETS_PATH",
        "./config/targets.yaml",
    ));
    let links_path = PathBuf::from(or_default("ALKOTEKA_LINKS_PATH", "./links.txt"));

    let request_timeout_secs = parse_u64("ALKOTEKA_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "ALKOTEKA_USER_AGENT",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    );
    let inter_request_delay_ms = parse_u64("ALKOTEKA_INTER_REQUEST_DELAY_MS", "1000")?;
    let max_retries = parse_u32("ALKOTEKA_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("ALKOTEKA_RETRY_BACKOFF_BASE_SECS", "5")?;
    let max_pages = parse_u32("ALKOTEKA_MAX_PAGES", "200")?;
    if max_pages == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ALKOTEKA_MAX_PAGES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let strict_validation =
        parse_bool("ALKOTEKA_STRICT_VALIDATION", &or_default("ALKOTEKA_STRICT_VALIDATION", "false"))?;

    Ok(AppConfig {
        log_level,
        targets_path,
        links_path,
        request_timeout_secs,
        user_agent,
        inter_request_delay_ms,
        max_retries,
        retry_backoff_base_secs,
        max_pages,
        strict_validation,
    })
}

/// Parse a boolean flag, accepting the usual spellings.
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("'{other}' is not a boolean"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
