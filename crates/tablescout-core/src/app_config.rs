use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How the adaptive search grows its radius between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusGrowth {
    /// Multiply the radius by `factor` (> 1) each attempt.
    Multiplicative { factor: f64 },
    /// Add `step_km` (> 0) each attempt.
    Additive { step_km: f64 },
}

impl Default for RadiusGrowth {
    fn default() -> Self {
        RadiusGrowth::Multiplicative { factor: 1.5 }
    }
}

impl RadiusGrowth {
    /// The radius for the next attempt, before clamping to the ceiling.
    #[must_use]
    pub fn next(self, radius_km: f64) -> f64 {
        match self {
            RadiusGrowth::Multiplicative { factor } => radius_km * factor,
            RadiusGrowth::Additive { step_km } => radius_km + step_km,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub restaurants_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub radius_growth: RadiusGrowth,
    pub max_radius_cap_km: f64,
    pub lookup_max_retries: u32,
    pub lookup_backoff_base_ms: u64,
    pub default_platforms: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("restaurants_path", &self.restaurants_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("radius_growth", &self.radius_growth)
            .field("max_radius_cap_km", &self.max_radius_cap_km)
            .field("lookup_max_retries", &self.lookup_max_retries)
            .field("lookup_backoff_base_ms", &self.lookup_backoff_base_ms)
            .field("default_platforms", &self.default_platforms)
            .finish()
    }
}
