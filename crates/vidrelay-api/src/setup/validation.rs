//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use vidrelay_core::Config;

/// Validate critical configuration values. Runs before logging is set up, so
/// it reports only through the returned error.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()
}

/// Settings that work but deserve attention
pub fn config_warnings(config: &Config) -> Vec<&'static str> {
    let mut warnings = Vec::new();

    if config.is_production() && config.cloudinary_api_base.starts_with("http://") {
        warnings.push(
            "CLOUDINARY_API_BASE is not HTTPS in production - credentials travel in clear text",
        );
    }

    if !config.orphan_cleanup_enabled {
        warnings.push(
            "ORPHAN_CLEANUP_ENABLED is off - failed record writes will leave objects in Cloudinary",
        );
    }

    warnings
}

/// Log [`config_warnings`]. Call once telemetry is installed.
pub fn log_config_warnings(config: &Config) {
    for warning in config_warnings(config) {
        tracing::warn!(api_base = %config.cloudinary_api_base, "{}", warning);
    }
}
