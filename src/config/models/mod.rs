//! Configuration model types

mod cluster;
mod provisioning;
mod reporting;
mod security;
mod server;

pub use cluster::ClusterConfig;
pub use provisioning::ProvisioningConfig;
pub use reporting::ReportingConfig;
pub use security::SecurityConfig;
pub use server::ServerConfig;

/// Read an environment variable, treating empty values as unset
pub(crate) fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read an environment variable with a fallback default
pub(crate) fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

/// Parse a numeric environment variable with a fallback default
pub(crate) fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String> {
    match env_opt(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("{} has invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}
