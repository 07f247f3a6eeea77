use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_catalog")]
    pub catalog: ApiConfig,
    #[serde(default = "default_ratings")]
    pub ratings: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub rate_limiting: RateLimitingConfig,
    /// File this config was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_bind")]
    pub bind: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// One upstream API. The key is merged into every call as `auth_param`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub auth_param: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a cached payload stays live
    #[serde(default = "default_cache_ttl")]
    pub ttl: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitingConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

// Defaults
fn default_http_bind() -> String { "0.0.0.0:8080".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_cache_ttl() -> u64 { 300 }
fn default_max_requests() -> u32 { 30 }
fn default_window_ms() -> u64 { 10_000 }

fn default_catalog() -> ApiConfig {
    ApiConfig {
        base_url: crate::providers::tmdb::DEFAULT_BASE_URL.to_string(),
        api_key: String::new(),
        auth_param: crate::providers::tmdb::AUTH_PARAM.to_string(),
        timeout_secs: None,
    }
}

fn default_ratings() -> ApiConfig {
    ApiConfig {
        base_url: crate::providers::omdb::DEFAULT_BASE_URL.to_string(),
        api_key: String::new(),
        auth_param: crate::providers::omdb::AUTH_PARAM.to_string(),
        timeout_secs: None,
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_http_bind(),
            log_level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            catalog: default_catalog(),
            ratings: default_ratings(),
            cache: CacheConfig::default(),
            rate_limiting: RateLimitingConfig::default(),
            source: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: default_cache_ttl(),
        }
    }
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_ms: default_window_ms(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Nothing is logged here since logging is set up from the result;
    /// call [`Config::validate`] once the subscriber is installed.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config_path = env::var("REELCHAT_CONFIG").ok().or_else(|| {
            let home_config = format!(
                "{}/.config/reelchat/config.toml",
                env::var("HOME").unwrap_or_default()
            );
            [
                "./config.toml",
                "./reelchat.toml",
                "/etc/reelchat/config.toml",
                home_config.as_str(),
            ]
            .into_iter()
            .find(|path| Path::new(path).exists())
            .map(str::to_string)
        });

        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides(|name| env::var(name).ok());

        Ok(config)
    }

    /// Parse a TOML config file, substituting `${VAR}` placeholders first
    pub fn from_file(path: &str) -> Result<Self> {
        #[cfg(unix)]
        Self::validate_file_permissions(path)?;

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        config.source = Some(PathBuf::from(path));
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let content = substitute_vars(content, |name| env::var(name).ok());
        Ok(toml::from_str(&content)?)
    }

    /// API keys from `TMDB_API_KEY` / `OMDB_API_KEY` fill in keys left empty by the file
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.catalog.api_key.is_empty() {
            if let Some(key) = lookup("TMDB_API_KEY") {
                self.catalog.api_key = key;
            }
        }
        if self.ratings.api_key.is_empty() {
            if let Some(key) = lookup("OMDB_API_KEY") {
                self.ratings.api_key = key;
            }
        }
    }

    /// Problems worth a warning at startup: missing API keys and a config
    /// file other users can read
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        #[cfg(unix)]
        if let Some(path) = &self.source {
            if let Some(mode) = readable_by_others(path) {
                warnings.push(format!(
                    "Config file {} has insecure permissions: {:o} (it may contain API keys, run: chmod 600 {})",
                    path.display(),
                    mode,
                    path.display()
                ));
            }
        }

        for (name, api) in [("catalog", &self.catalog), ("ratings", &self.ratings)] {
            if api.api_key.is_empty() {
                warnings.push(format!(
                    "API '{}' has no key configured - upstream calls will be rejected",
                    name
                ));
            }
        }

        warnings
    }

    /// Log where the config came from and every entry of [`Config::warnings`]
    pub fn validate(&self) {
        match &self.source {
            Some(path) => tracing::info!("Config loaded from {}", path.display()),
            None => tracing::info!("No config file found, using defaults"),
        }

        for warning in self.warnings() {
            tracing::warn!("{}", warning);
        }
    }

    /// Reject config files that group or others can write (Unix only)
    #[cfg(unix)]
    fn validate_file_permissions(path: &str) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let path_obj = Path::new(path);
        if !path_obj.exists() {
            return Ok(());
        }

        let metadata = fs::metadata(path_obj)
            .with_context(|| format!("Failed to read metadata for config file: {}", path))?;
        let mode = metadata.permissions().mode();

        let group_writable = (mode & 0o020) != 0;
        let others_writable = (mode & 0o002) != 0;

        if group_writable || others_writable {
            anyhow::bail!(
                "Config file {} is writable by group or others (mode: {:o}). \
                This is a security risk. Run: chmod 600 {}",
                path,
                mode & 0o777,
                path
            );
        }

        Ok(())
    }
}

/// Permission bits of `path` if group or others can read it
#[cfg(unix)]
fn readable_by_others(path: &Path) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(path).ok()?.permissions().mode() & 0o777;
    (mode & 0o044 != 0).then_some(mode)
}

/// Substitute ${VAR_NAME} with values from `lookup`; unknown names become empty
fn substitute_vars(content: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = content.to_string();
    let mut from = 0;

    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = lookup(var_name).unwrap_or_default();
        result.replace_range(start..start + end + 1, &value);
        from = start + value.len();
    }

    result
}
