use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The environment the service runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEnv {
    /// Local development; owner bootstrap is enabled.
    Development,
    /// Automated tests.
    Test,
    /// Production; cookies are `Secure` and owner bootstrap is disabled.
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "test" => Ok(AppEnv::Test),
            "production" | "prod" => Ok(AppEnv::Production),
            other => anyhow::bail!("APP_ENV must be development, test or production (got {other})"),
        }
    }
}

/// Rate limit applied to the owner auth route group.
#[derive(Clone, Copy, Debug)]
pub struct RateLimit {
    /// Seconds after which one request of the quota is replenished.
    pub period_secs: u64,
    /// How many requests may be made in a burst.
    pub burst: u32,
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The environment the service runs in.
    pub app_env: AppEnv,
    /// The socket address to listen on.
    pub bind_addr: SocketAddr,
    /// The URL of the PostgreSQL database. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// The secret used to sign session tokens.
    pub jwt_secret: Option<Zeroizing<Vec<u8>>>,
    /// The directory uploaded images are written to.
    pub upload_dir: String,
    /// The base URL image URLs are minted under.
    pub public_base_url: String,
    /// The API key of the description generator.
    pub google_api_key: Option<Zeroizing<String>>,
    /// The model used by the description generator.
    pub gemini_model: String,
    /// Rate limit for owner login and bootstrap.
    pub login_rate_limit: RateLimit,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let app_env = AppEnv::parse(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        )?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("Invalid PORT")?;
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .context("HOST and PORT must form a valid socket address")?;

        let jwt_secret = non_empty_var("JWT_SECRET").map(|s| Zeroizing::new(s.into_bytes()));

        Ok(Self {
            app_env,
            bind_addr,
            database_url: non_empty_var("DATABASE_URL"),
            jwt_secret,
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "files/public/uploads".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}"))
                .trim_end_matches('/')
                .to_string(),
            google_api_key: non_empty_var("GOOGLE_API_KEY").map(Zeroizing::new),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            login_rate_limit: RateLimit {
                period_secs: env::var("LOGIN_RATE_LIMIT_PERIOD_SECS")
                    .unwrap_or_else(|_| "12".to_string())
                    .parse()
                    .context("Invalid LOGIN_RATE_LIMIT_PERIOD_SECS")?,
                burst: env::var("LOGIN_RATE_LIMIT_BURST")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .context("Invalid LOGIN_RATE_LIMIT_BURST")?,
            },
        })
    }

    /// A configuration for tests: in-memory store and a fixed token secret.
    pub fn for_tests() -> Self {
        Self {
            app_env: AppEnv::Test,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: None,
            jwt_secret: Some(Zeroizing::new(b"test-secret".to_vec())),
            upload_dir: std::env::temp_dir()
                .join("luxvane-test-uploads")
                .to_string_lossy()
                .into_owned(),
            public_base_url: "http://localhost:3000".to_string(),
            google_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            login_rate_limit: RateLimit {
                period_secs: 60,
                burst: 1_000,
            },
        }
    }

    /// Whether the service runs in production.
    pub fn is_production(&self) -> bool {
        self.app_env == AppEnv::Production
    }
}
