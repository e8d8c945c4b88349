const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API from a browser.
    pub cors_allowed_origins: Vec<String>,
    /// Upload size cap in bytes. `None` means uploads are not capped.
    pub max_upload_bytes: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_allowed_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            max_upload_bytes: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        tracing::debug!("Bind address: {}:{}", config.host, config.port);
        tracing::debug!("CORS origins: {:?}", config.cors_allowed_origins);
        match config.max_upload_bytes {
            Some(limit) => tracing::debug!("Upload size cap: {} bytes", limit),
            None => tracing::debug!("Upload size cap: none"),
        }

        Ok(config)
    }

    /// Builds a config from an arbitrary key lookup. Unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            None => defaults.port,
        };

        let cors_allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => {
                let origins: Vec<String> = raw
                    .split(',')
                    .map(|o| o.trim())
                    .filter(|o| !o.is_empty())
                    .map(|o| o.to_string())
                    .collect();
                if origins.is_empty() {
                    anyhow::bail!("CORS_ALLOWED_ORIGINS cannot be empty");
                }
                if let Some(bad) = origins
                    .iter()
                    .find(|o| !o.starts_with("http://") && !o.starts_with("https://"))
                {
                    anyhow::bail!(
                        "CORS origin '{}' must start with http:// or https://",
                        bad
                    );
                }
                origins
            }
            None => defaults.cors_allowed_origins,
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES").filter(|s| !s.trim().is_empty()) {
            Some(raw) => {
                let limit: usize = raw.trim().parse().map_err(|_| {
                    anyhow::anyhow!("MAX_UPLOAD_BYTES must be a positive number of bytes")
                })?;
                if limit == 0 {
                    anyhow::bail!("MAX_UPLOAD_BYTES must be greater than zero");
                }
                Some(limit)
            }
            None => None,
        };

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_upload_bytes,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
