use anyhow::{bail, Context, Result};
use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use crate::exec::context::RedirectPolicy;

pub const DEFAULT_CONFIG: &str = "minish.toml";
pub const DEFAULT_PROMPT: &str = "> ";

#[derive(Debug, Deserialize, Default)]
pub struct MinishConfig {
    pub prompt: Option<String>,
    #[serde(default)]
    pub on_redirect_error: RedirectPolicy,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl MinishConfig {
    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }
}

/// Load the TOML config, then layer the dotenv file found next to it.
///
/// An explicit path must exist; the default one is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<MinishConfig> {
    let (config_path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG), false),
    };

    // 1. Parse minish.toml (Base Layer)
    let mut config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?
    } else if required {
        bail!("Config file not found: {}", config_path.display());
    } else {
        MinishConfig::default()
    };

    // 2. Load .env using dotenvy (Override Layer)
    // Determines filename: .env or .env.<name> based on MINISH_ENV
    let env_filename = env::var("MINISH_ENV")
        .map(|v| format!(".env.{}", v))
        .unwrap_or_else(|_| ".env".to_string());
    let dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let env_path = dir.join(&env_filename);

    if env_path.exists() {
        info!("Loading environment from: {}", env_path.display());
        for item in dotenvy::from_path_iter(&env_path)? {
            let (key, val) = item?;
            config.env.insert(key, val);
        }
    }

    Ok(config)
}

/// Export the configured variables into the process environment.
pub fn apply_env(config: &MinishConfig) -> Result<()> {
    let mut keys: Vec<&String> = config.env.keys().collect();
    keys.sort();
    for key in keys {
        crate::exec::env::set_var(key, &config.env[key])
            .with_context(|| format!("Cannot export '{}'", key))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_full_config() {
        let config: MinishConfig = toml::from_str(
            r#"
            prompt = "$ "
            on_redirect_error = "fail"

            [env]
            GREETING = "hello"
            "#,
        )
        .unwrap();
        assert_eq!(config.prompt(), "$ ");
        assert_eq!(config.on_redirect_error, RedirectPolicy::Fail);
        assert_eq!(config.env.get("GREETING").unwrap(), "hello");
    }

    #[test]
    fn test_defaults() {
        let config: MinishConfig = toml::from_str("").unwrap();
        assert_eq!(config.prompt(), DEFAULT_PROMPT);
        assert_eq!(config.on_redirect_error, RedirectPolicy::Terminate);
        assert!(config.env.is_empty());
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        assert!(load_config(Some(Path::new("/no/such/dir/minish.toml"))).is_err());
    }

    #[test]
    #[serial]
    fn test_dotenv_overrides_toml() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("minish.toml");
        fs::write(&config_path, "[env]\nLAYER = \"toml\"\nONLY_TOML = \"yes\"\n").unwrap();
        fs::write(dir.path().join(".env"), "LAYER=dotenv\n").unwrap();

        let config = load_config(Some(&config_path)).unwrap();
        assert_eq!(config.env.get("LAYER").unwrap(), "dotenv");
        assert_eq!(config.env.get("ONLY_TOML").unwrap(), "yes");
    }

    #[test]
    #[serial]
    fn test_apply_env_exports() {
        let mut config = MinishConfig::default();
        config.env.insert("MINISH_CONFIG_EXPORT".to_string(), "42".to_string());
        apply_env(&config).unwrap();
        assert_eq!(env::var("MINISH_CONFIG_EXPORT").unwrap(), "42");
    }
}
