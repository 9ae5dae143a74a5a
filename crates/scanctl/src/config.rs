//! Profile resolution with CLI-flag overrides.
//!
//! The config file provides profiles; global flags and env vars override
//! individual fields. Credential resolution delegates to scanctl-config's
//! env → keyring → plaintext chain.

use std::time::Duration;

use scanctl_config::{Config, Profile};
use scanctl_core::{SessionConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The profile name to use: flag/env first, then the config default.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `SessionConfig` from a profile plus CLI flag overrides.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SessionConfig, CliError> {
    let mut config = scanctl_config::profile_to_session_config(profile, profile_name)?;

    if let Some(ref gateway) = global.gateway {
        config.url = gateway.parse().map_err(|_| CliError::Validation {
            field: "gateway".into(),
            reason: format!("invalid URL: {gateway}"),
        })?;
    }
    if let Some(ref username) = global.username {
        config.auth.username.clone_from(username);
    }
    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    config.timeout = Duration::from_secs(global.timeout);

    Ok(config)
}

/// Build a `SessionConfig` from flags/env alone (no profile on disk).
pub fn resolve_from_flags(
    global: &GlobalOpts,
    profile_name: &str,
) -> Result<SessionConfig, CliError> {
    let gateway = global.gateway.as_deref().ok_or_else(|| CliError::NoConfig {
        path: scanctl_config::config_path().display().to_string(),
    })?;

    // Reuse the standard chain by treating the flags as an in-memory
    // profile.
    let profile = Profile {
        gateway: gateway.to_owned(),
        username: global.username.clone(),
        password: None,
        password_env: None,
        ca_cert: None,
        insecure: Some(global.insecure),
        timeout: Some(global.timeout),
        report_results_threshold: None,
    };

    scanctl_config::profile_to_session_config(&profile, profile_name).map_err(|err| match err {
        scanctl_config::ConfigError::NoCredentials { profile } => {
            CliError::NoCredentials { profile }
        }
        other => other.into(),
    })
}
