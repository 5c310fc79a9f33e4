use crate::error::{AdvisorError, Result};
use crate::logic::{ranking, rules::DEFAULT_MAX_PLANS};
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    pub openweathermap: Option<OpenWeatherMapConfig>,
    pub classifier: Option<ClassifierConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,
    /// Where uploaded leaf images are written. Relative paths live under the data dir.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    5000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Accepts the port as a number or as a string, so `${PORT}` substitution works.
fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u16),
        Text(String),
    }

    match PortValue::deserialize(deserializer)? {
        PortValue::Number(port) => Ok(port),
        PortValue::Text(value) => value.parse::<u16>().map_err(|_| {
            D::Error::custom(format!(
                "invalid port '{}' - ensure the PORT environment variable is set",
                value
            ))
        }),
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdvisorConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_max_plans")]
    pub max_fertilizer_plans: usize,
    /// Share of revenue counted as cost when estimating profit.
    #[serde(default = "default_cost_ratio")]
    pub cost_ratio: f64,
    /// Optional YAML catalog replacing the built-in tables.
    pub catalog_path: Option<PathBuf>,
}

fn default_top_n() -> usize {
    ranking::DEFAULT_TOP_N
}

fn default_max_plans() -> usize {
    DEFAULT_MAX_PLANS
}

fn default_cost_ratio() -> f64 {
    ranking::DEFAULT_COST_RATIO
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            max_fertilizer_plans: default_max_plans(),
            cost_ratio: default_cost_ratio(),
            catalog_path: None,
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    /// Inference endpoint accepting raw image bytes.
    pub endpoint: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl std::fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Config {
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p.clone(),
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(AdvisorError::Config(format!(
                "Config file not found at {:?}. Run `cropadvisor init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| AdvisorError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Load the config if one exists, defaults otherwise.
    pub fn load_or_default(config_override: Option<&PathBuf>) -> Result<Self> {
        if Self::exists(config_override) {
            Self::load(config_override)
        } else {
            tracing::info!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);
        serde_yaml::from_str(&content)
            .map_err(|e| AdvisorError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("cropadvisor").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/cropadvisor/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AdvisorError::Config("Cannot determine config directory".into()))?
            .join("cropadvisor");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up CropAdvisor!");
        println!();

        println!("HTTP server");
        let host: String = Input::new()
            .with_prompt("  Bind host")
            .default(default_host())
            .interact_text()
            .map_err(input_error)?;

        let port: u16 = Input::new()
            .with_prompt("  Port")
            .default(default_port())
            .interact_text()
            .map_err(input_error)?;

        println!();

        println!("Advisor");
        let top_n: usize = Input::new()
            .with_prompt("  Crops to recommend")
            .default(default_top_n())
            .interact_text()
            .map_err(input_error)?;

        println!();

        println!("OpenWeatherMap (leave API key blank to skip)");
        let owm_api_key: String = Input::new()
            .with_prompt("  API key")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_error)?;

        let openweathermap = if owm_api_key.is_empty() {
            None
        } else {
            Some(OpenWeatherMapConfig {
                api_key: owm_api_key,
                enabled: true,
            })
        };

        println!();

        println!("Plant disease classifier (leave endpoint blank to skip)");
        let endpoint: String = Input::new()
            .with_prompt("  Endpoint URL")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_error)?;

        let classifier = if endpoint.is_empty() {
            None
        } else {
            let token: String = Password::new()
                .with_prompt("  Bearer token")
                .allow_empty_password(true)
                .interact()
                .map_err(input_error)?;

            Some(ClassifierConfig {
                endpoint,
                token: (!token.is_empty()).then_some(token),
                enabled: true,
            })
        };

        println!();

        let config = Config {
            server: ServerConfig {
                host,
                port,
                ..ServerConfig::default()
            },
            advisor: AdvisorConfig {
                top_n,
                ..AdvisorConfig::default()
            },
            openweathermap,
            classifier,
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| AdvisorError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# CropAdvisor Configuration\n# Generated by `cropadvisor init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .expect("env var pattern is valid");

        re.replace_all(content, |caps: &regex_lite::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("CROPADVISOR_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| AdvisorError::Config("Cannot determine data directory".into()))?
            .join("cropadvisor");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("cropadvisor.db"))
    }

    /// Upload directory resolved against the data dir.
    pub fn upload_dir(&self, data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        let dir = if self.server.upload_dir.is_absolute() {
            self.server.upload_dir.clone()
        } else {
            Self::data_dir(data_dir_override)?.join(&self.server.upload_dir)
        };
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

fn input_error(e: dialoguer::Error) -> AdvisorError {
    AdvisorError::Config(format!("Input error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.advisor.top_n, 5);
        assert_eq!(config.advisor.max_fertilizer_plans, 4);
        assert!(config.openweathermap.is_none());
        assert!(config.classifier.is_none());
    }

    #[test]
    fn advisor_defaults_match_engine_defaults() {
        let advisor = AdvisorConfig::default();
        let ranking = crate::logic::RankingOptions::default();
        assert_eq!(advisor.top_n, ranking.top_n);
        assert_eq!(advisor.cost_ratio, ranking.cost_ratio);
        assert_eq!(advisor.max_fertilizer_plans, DEFAULT_MAX_PLANS);
    }

    #[test]
    fn env_vars_are_substituted() {
        std::env::set_var("CROPADVISOR_TEST_OWM_KEY", "abc123");
        let config = Config::from_yaml(
            "openweathermap:\n  api_key: ${CROPADVISOR_TEST_OWM_KEY}\n",
        )
        .unwrap();
        let owm = config.openweathermap.unwrap();
        assert_eq!(owm.api_key, "abc123");
        assert!(owm.enabled);
    }

    #[test]
    fn unknown_env_var_is_left_in_place() {
        let out = Config::substitute_env_vars("key: ${CROPADVISOR_TEST_NOT_SET_ANYWHERE}");
        assert_eq!(out, "key: ${CROPADVISOR_TEST_NOT_SET_ANYWHERE}");
    }

    #[test]
    fn port_accepts_string() {
        let config = Config::from_yaml("server:\n  port: \"8080\"\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(Config::from_yaml("server:\n  port: \"http\"\n").is_err());
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let config = ClassifierConfig {
            endpoint: "http://localhost:9000/predict".into(),
            token: Some("secret-token".into()),
            enabled: true,
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("REDACTED"));
    }
}
