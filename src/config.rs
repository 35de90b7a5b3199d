use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    /// `"openai"` or `"disabled"`. Disabled routes requests to the
    /// synthetic preview instead of a live model.
    #[serde(default = "default_generation_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_generation_provider(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            base_url: default_generation_base_url(),
            timeout_secs: default_generation_timeout(),
            api_key: None,
        }
    }
}

fn default_generation_provider() -> String {
    "disabled".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_max_tokens() -> u32 {
    1000
}
fn default_temperature() -> f64 {
    0.7
}
fn default_generation_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_generation_timeout() -> u64 {
    30
}

impl GenerationConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }

    /// Credential resolution: environment first, config file second.
    pub fn resolve_api_key(&self) -> Option<String> {
        env_credential("OPENAI_API_KEY").or_else(|| self.api_key.clone())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub football: ProviderConfig,
    #[serde(default)]
    pub search: ProviderConfig,
    #[serde(default)]
    pub sportsdb: ProviderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_key: None,
            base_url: None,
            timeout_secs: default_provider_timeout(),
        }
    }
}

fn default_enabled() -> bool {
    true
}
fn default_provider_timeout() -> u64 {
    15
}

impl ProviderConfig {
    pub fn resolve_api_key(&self, env_var: &str) -> Option<String> {
        env_credential(env_var).or_else(|| self.api_key.clone())
    }
}

fn env_credential(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    match config.generation.provider.as_str() {
        "disabled" | "openai" => {}
        other => anyhow::bail!(
            "Unknown generation provider: '{}'. Must be disabled or openai.",
            other
        ),
    }

    if config.generation.max_tokens == 0 {
        anyhow::bail!("generation.max_tokens must be > 0");
    }

    if !(0.0..=2.0).contains(&config.generation.temperature) {
        anyhow::bail!("generation.temperature must be in [0.0, 2.0]");
    }

    if config.generation.timeout_secs == 0 {
        anyhow::bail!("generation.timeout_secs must be > 0");
    }

    for (name, provider) in [
        ("football", &config.providers.football),
        ("search", &config.providers.search),
        ("sportsdb", &config.providers.sportsdb),
    ] {
        if provider.timeout_secs == 0 {
            anyhow::bail!("providers.{}.timeout_secs must be > 0", name);
        }
    }

    Ok(config)
}

/// Load the config file, or fall back to all defaults when it does not
/// exist. The service is fully configurable by environment variables, so a
/// missing file means demo mode, not an error.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.generation.provider, "disabled");
        assert!(!config.generation.is_enabled());
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.max_tokens, 1000);
        assert!(config.providers.football.enabled);
        assert_eq!(config.providers.search.timeout_secs, 15);
    }

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
bind = "0.0.0.0:9000"

[generation]
provider = "openai"
model = "gpt-4o"
temperature = 0.2

[providers.search]
api_key = "serp-key"
timeout_secs = 5

[providers.football]
enabled = false
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert!(config.generation.is_enabled());
        assert_eq!(config.generation.model, "gpt-4o");
        assert_eq!(config.generation.temperature, 0.2);
        // unset fields keep their defaults
        assert_eq!(config.generation.max_tokens, 1000);
        assert_eq!(config.providers.search.api_key.as_deref(), Some("serp-key"));
        assert_eq!(config.providers.search.timeout_secs, 5);
        assert!(!config.providers.football.enabled);
        assert!(config.providers.sportsdb.enabled);
    }

    #[test]
    fn test_rejects_unknown_generation_provider() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[generation]\nprovider = \"llama-farm\"\n").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("llama-farm"));
    }

    #[test]
    fn test_rejects_out_of_range_temperature() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[generation]\ntemperature = 3.5\n").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[providers.search]\ntimeout_secs = 0\n").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = load_or_default(Path::new("/nonexistent/matchdesk.toml")).unwrap();
        assert_eq!(config.generation.provider, "disabled");
    }
}
