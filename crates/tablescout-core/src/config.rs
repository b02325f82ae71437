use crate::app_config::{AppConfig, Environment, RadiusGrowth};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(invalid(var, format!("must be a positive number, got {value}")))
        }
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("TABLESCOUT_ENV", "development"))?;

    let bind_addr = parse_addr("TABLESCOUT_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("TABLESCOUT_LOG_LEVEL", "info");
    let restaurants_path = PathBuf::from(or_default(
        "TABLESCOUT_RESTAURANTS_PATH",
        "./config/restaurants.yaml",
    ));

    let db_max_connections = parse_u32("TABLESCOUT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("TABLESCOUT_DB_MIN_CONNECTIONS", "1")?;
    if db_min_connections > db_max_connections {
        return Err(invalid(
            "TABLESCOUT_DB_MIN_CONNECTIONS",
            format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        ));
    }
    let db_acquire_timeout_secs = parse_u64("TABLESCOUT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let step = parse_positive_f64("TABLESCOUT_RADIUS_STEP", "1.5")?;
    let radius_growth = parse_radius_growth(
        &or_default("TABLESCOUT_RADIUS_GROWTH", "multiplicative"),
        step,
    )?;
    let max_radius_cap_km = parse_positive_f64("TABLESCOUT_MAX_RADIUS_CAP_KM", "50")?;

    let lookup_max_retries = parse_u32("TABLESCOUT_LOOKUP_MAX_RETRIES", "2")?;
    let lookup_backoff_base_ms = parse_u64("TABLESCOUT_LOOKUP_BACKOFF_BASE_MS", "100")?;

    let default_platforms =
        parse_platform_list(&or_default("TABLESCOUT_DEFAULT_PLATFORMS", "internal"));
    if default_platforms.is_empty() {
        return Err(invalid(
            "TABLESCOUT_DEFAULT_PLATFORMS",
            "must name at least one platform".to_string(),
        ));
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        restaurants_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        radius_growth,
        max_radius_cap_km,
        lookup_max_retries,
        lookup_backoff_base_ms,
        default_platforms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TABLESCOUT_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

/// Combine the growth mode with its step value.
///
/// A multiplicative factor of 1.0 or less would never reach the ceiling.
fn parse_radius_growth(mode: &str, step: f64) -> Result<RadiusGrowth, ConfigError> {
    match mode {
        "multiplicative" if step > 1.0 => Ok(RadiusGrowth::Multiplicative { factor: step }),
        "multiplicative" => Err(ConfigError::InvalidEnvVar {
            var: "TABLESCOUT_RADIUS_STEP".to_string(),
            reason: format!("multiplicative growth needs a factor above 1, got {step}"),
        }),
        "additive" => Ok(RadiusGrowth::Additive { step_km: step }),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TABLESCOUT_RADIUS_GROWTH".to_string(),
            reason: format!("expected multiplicative or additive; got '{other}'"),
        }),
    }
}

fn parse_platform_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
