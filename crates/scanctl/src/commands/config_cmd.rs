//! Config command handlers: init, show, path, set-password.
//!
//! These run without a gateway session.

use dialoguer::{Confirm, Input};

use scanctl_config::Profile;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::active_profile_name;
use crate::error::CliError;

pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::Path => {
            println!("{}", scanctl_config::config_path().display());
            Ok(())
        }
        ConfigCommand::SetPassword { profile } => set_password(profile, global),
    }
}

/// Interactively create (or replace) a profile.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = scanctl_config::load_config_or_default();

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()?;

    let gateway: String = Input::new()
        .with_prompt("Gateway URL")
        .with_initial_text(global.gateway.clone().unwrap_or_default())
        .interact_text()?;

    // Validate before writing anything.
    let _: url::Url = gateway.parse().map_err(|_| CliError::Validation {
        field: "gateway".into(),
        reason: format!("invalid URL: {gateway}"),
    })?;

    let username: String = Input::new().with_prompt("Username").interact_text()?;

    let insecure = Confirm::new()
        .with_prompt("Accept self-signed TLS certificates?")
        .default(false)
        .interact()?;

    let password = rpassword::prompt_password("Password: ")?;
    let use_keyring = Confirm::new()
        .with_prompt("Store the password in the system keyring?")
        .default(true)
        .interact()?;

    let mut profile = Profile {
        gateway,
        username: Some(username),
        password: None,
        password_env: None,
        ca_cert: None,
        insecure: Some(insecure),
        timeout: None,
        report_results_threshold: None,
    };

    if use_keyring {
        keyring::Entry::new("scanctl", &format!("{name}/password"))?.set_password(&password)?;
    } else {
        profile.password = Some(password);
    }

    if config.default_profile.is_none() {
        config.default_profile = Some(name.clone());
    }
    config.profiles.insert(name.clone(), profile);
    scanctl_config::save_config(&config)?;

    if !global.quiet {
        eprintln!("Profile '{name}' written to {}", scanctl_config::config_path().display());
    }
    Ok(())
}

/// Print the effective configuration with passwords redacted.
fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = scanctl_config::load_config_or_default();
    for profile in config.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("<redacted>".into());
        }
    }
    let rendered = toml::to_string_pretty(&config)
        .map_err(scanctl_config::ConfigError::Serialization)?;
    if !global.quiet {
        println!("{rendered}");
    }
    Ok(())
}

/// Prompt for a password and store it in the keyring.
fn set_password(profile_flag: Option<String>, global: &GlobalOpts) -> Result<(), CliError> {
    let config = scanctl_config::load_config_or_default();
    let name = profile_flag.unwrap_or_else(|| active_profile_name(global, &config));

    if !config.profiles.contains_key(&name) {
        let available: Vec<_> = config.profiles.keys().cloned().collect();
        return Err(CliError::ProfileNotFound {
            name,
            available: available.join(", "),
        });
    }

    let password = rpassword::prompt_password("Password: ")?;
    keyring::Entry::new("scanctl", &format!("{name}/password"))?.set_password(&password)?;

    if !global.quiet {
        eprintln!("Password for profile '{name}' stored in the system keyring");
    }
    Ok(())
}
