use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub dashboard: DashboardConfig,
    pub sampler: SamplerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Sample store connection (MySQL protocol).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Query seeded into the session slot and the query editor.
    pub default_query: String,
    /// Client poll interval in milliseconds.
    pub refresh_ms: u64,
    /// Row cap enforced on every executed statement, and the upper bound on
    /// chart point counts.
    pub max_points: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Whether the host sampler runs in this process (default: true).
    pub enabled: bool,
    /// Seconds between samples (default: 30).
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

/// Command line arguments for configuration overrides
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pulseboard")]
#[command(version, about = "Pulseboard - Host Metrics Query Console")]
pub struct CommandLineArgs {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Server bind host (overrides config file)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server bind port (overrides config file)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Sample store host (overrides config file)
    #[arg(long, value_name = "HOST")]
    pub db_host: Option<String>,

    /// Sample store user (overrides config file)
    #[arg(long, value_name = "USER")]
    pub db_user: Option<String>,

    /// Sample store password (overrides config file)
    #[arg(long, value_name = "PASS")]
    pub db_pass: Option<String>,

    /// Sample store database name (overrides config file)
    #[arg(long, value_name = "NAME")]
    pub db_name: Option<String>,

    /// Default dashboard query (overrides config file)
    #[arg(long, value_name = "SQL")]
    pub default_query: Option<String>,

    /// Client poll interval in milliseconds (overrides config file)
    #[arg(long, value_name = "MS")]
    pub refresh_ms: Option<u64>,

    /// Row cap / chart point cap (overrides config file)
    #[arg(long, value_name = "N")]
    pub max_points: Option<u64>,

    /// Host sampler interval in seconds (overrides config file)
    #[arg(long, value_name = "SECS")]
    pub sampler_interval_secs: Option<u64>,

    /// Enable/disable the host sampler (overrides config file)
    #[arg(long, value_name = "BOOL")]
    pub sampler_enabled: Option<bool>,

    /// Logging level (overrides config file, e.g., "info,pulseboard=debug")
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with command line, environment variable, and file
    /// support.
    ///
    /// Loading order (priority from highest to lowest):
    /// 1. Command line arguments
    /// 2. Environment variables
    /// 3. Configuration file (config.toml)
    /// 4. Default values
    pub fn load() -> Result<Self, anyhow::Error> {
        let cli_args = CommandLineArgs::parse();
        let mut config = Self::load_layered(cli_args.config.as_deref())?;
        config.apply_cli_overrides(&cli_args);
        config.validate()?;
        Ok(config)
    }

    /// File + environment layers only; used by the snapshot tool, which has
    /// no server CLI surface.
    pub fn load_without_cli() -> Result<Self, anyhow::Error> {
        let config = Self::load_layered(None)?;
        config.validate()?;
        Ok(config)
    }

    fn load_layered(cli_config_path: Option<&str>) -> Result<Self, anyhow::Error> {
        let config_path = cli_config_path
            .map(str::to_string)
            .or_else(Self::find_config_file);
        let mut config = if let Some(config_path) = config_path {
            Self::from_toml(&config_path)?
        } else {
            tracing::warn!("Configuration file not found, using defaults");
            Config::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Recognized variables:
    /// - DB_HOST, DB_PORT, DB_USER, DB_PASS, DB_NAME: sample store connection
    /// - APP_HOST, APP_PORT: server bind address
    /// - DEFAULT_QUERY: seed query for the session slot
    /// - REFRESH_MS: client poll interval
    /// - MAX_POINTS: row cap / chart point cap
    /// - SAMPLER_INTERVAL_SECS, SAMPLER_ENABLED: host sampler
    /// - APP_LOG_LEVEL: logging level
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("DB_HOST") {
            self.database.host = host;
            tracing::info!("Override database.host from env: {}", self.database.host);
        }

        if let Ok(port) = std::env::var("DB_PORT")
            && let Ok(port) = port.parse()
        {
            self.database.port = port;
            tracing::info!("Override database.port from env: {}", self.database.port);
        }

        if let Ok(user) = std::env::var("DB_USER") {
            self.database.user = user;
            tracing::info!("Override database.user from env: {}", self.database.user);
        }

        if let Ok(pass) = std::env::var("DB_PASS") {
            self.database.password = pass;
            tracing::info!("Override database.password from env");
        }

        if let Ok(name) = std::env::var("DB_NAME") {
            self.database.name = name;
            tracing::info!("Override database.name from env: {}", self.database.name);
        }

        if let Ok(host) = std::env::var("APP_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Ok(port) = std::env::var("APP_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Ok(query) = std::env::var("DEFAULT_QUERY") {
            self.dashboard.default_query = query;
            tracing::info!("Override dashboard.default_query from env");
        }

        if let Ok(refresh) = std::env::var("REFRESH_MS")
            && let Ok(refresh) = refresh.parse()
        {
            self.dashboard.refresh_ms = refresh;
            tracing::info!("Override dashboard.refresh_ms from env: {}", self.dashboard.refresh_ms);
        }

        if let Ok(max_points) = std::env::var("MAX_POINTS")
            && let Ok(max_points) = max_points.parse()
        {
            self.dashboard.max_points = max_points;
            tracing::info!(
                "Override dashboard.max_points from env: {}",
                self.dashboard.max_points
            );
        }

        if let Ok(interval) = std::env::var("SAMPLER_INTERVAL_SECS")
            && let Ok(interval) = interval.parse()
        {
            self.sampler.interval_secs = interval;
            tracing::info!(
                "Override sampler.interval_secs from env: {}",
                self.sampler.interval_secs
            );
        }

        if let Ok(enabled) = std::env::var("SAMPLER_ENABLED")
            && let Ok(enabled) = enabled.parse()
        {
            self.sampler.enabled = enabled;
            tracing::info!("Override sampler.enabled from env: {}", self.sampler.enabled);
        }

        if let Ok(level) = std::env::var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }
    }

    /// Apply command line argument overrides (highest priority).
    fn apply_cli_overrides(&mut self, args: &CommandLineArgs) {
        if let Some(host) = &args.host {
            self.server.host = host.clone();
            tracing::info!("Override server.host from CLI: {}", self.server.host);
        }

        if let Some(port) = args.port {
            self.server.port = port;
            tracing::info!("Override server.port from CLI: {}", self.server.port);
        }

        if let Some(db_host) = &args.db_host {
            self.database.host = db_host.clone();
            tracing::info!("Override database.host from CLI: {}", self.database.host);
        }

        if let Some(db_user) = &args.db_user {
            self.database.user = db_user.clone();
            tracing::info!("Override database.user from CLI: {}", self.database.user);
        }

        if let Some(db_pass) = &args.db_pass {
            self.database.password = db_pass.clone();
            tracing::info!("Override database.password from CLI");
        }

        if let Some(db_name) = &args.db_name {
            self.database.name = db_name.clone();
            tracing::info!("Override database.name from CLI: {}", self.database.name);
        }

        if let Some(query) = &args.default_query {
            self.dashboard.default_query = query.clone();
            tracing::info!("Override dashboard.default_query from CLI");
        }

        if let Some(refresh) = args.refresh_ms {
            self.dashboard.refresh_ms = refresh;
            tracing::info!("Override dashboard.refresh_ms from CLI: {}", self.dashboard.refresh_ms);
        }

        if let Some(max_points) = args.max_points {
            self.dashboard.max_points = max_points;
            tracing::info!(
                "Override dashboard.max_points from CLI: {}",
                self.dashboard.max_points
            );
        }

        if let Some(interval) = args.sampler_interval_secs {
            self.sampler.interval_secs = interval;
            tracing::info!("Override sampler.interval_secs from CLI: {}", self.sampler.interval_secs);
        }

        if let Some(enabled) = args.sampler_enabled {
            self.sampler.enabled = enabled;
            tracing::info!("Override sampler.enabled from CLI: {}", self.sampler.enabled);
        }

        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
            tracing::info!("Override logging.level from CLI: {}", self.logging.level);
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.database.host.is_empty() || self.database.name.is_empty() {
            anyhow::bail!("Database host and name cannot be empty");
        }

        if self.dashboard.default_query.trim().is_empty() {
            anyhow::bail!("dashboard.default_query cannot be empty");
        }

        if self.dashboard.refresh_ms == 0 {
            anyhow::bail!("dashboard.refresh_ms must be > 0");
        }

        if self.dashboard.max_points == 0 {
            anyhow::bail!("dashboard.max_points must be > 0");
        }

        if self.sampler.interval_secs == 0 {
            anyhow::bail!("sampler.interval_secs must be > 0");
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8082 }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "devops".to_string(),
            password: String::new(),
            name: "syslogs".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_query: "SELECT memory_usage, cpu_usage, timestamp FROM stats \
                            ORDER BY timestamp DESC LIMIT 100;"
                .to_string(),
            refresh_ms: 2000,
            max_points: 1000,
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { enabled: true, interval_secs: 30 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,pulseboard=debug".to_string(),
            file: Some("logs/pulseboard.log".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_refresh_is_rejected() {
        let mut config = Config::default();
        config.dashboard.refresh_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn cli_overrides_win() {
        let mut config = Config::default();
        let args = CommandLineArgs {
            port: Some(9000),
            max_points: Some(250),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.dashboard.max_points, 250);
    }
}
