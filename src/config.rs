/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可、IdP / access token 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // Identity provider base URI; also the expected `iss` of access tokens
    pub auth_issuer_uri: String,
    // OAuth client id used in the step-up redirect
    pub auth_client_id: String,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    pub access_jwt_algorithm: Algorithm,
    pub access_jwt_public_key_pem: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key -> value source (env in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        // Used both as the expected `iss` and as the redirect base; one spelling for both.
        let auth_issuer_uri = required(&lookup, "AUTH_ISSUER_URI")?
            .trim_end_matches('/')
            .to_string();
        if auth_issuer_uri.is_empty() {
            return Err(ConfigError::Invalid("AUTH_ISSUER_URI"));
        }
        let auth_client_id = required(&lookup, "AUTH_CLIENT_ID")?;

        let auth_audience = lookup("AUTH_AUDIENCE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let access_token_leeway_seconds: u64 = match lookup("ACCESS_TOKEN_LEEWAY_SECONDS") {
            Some(s) => s
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))?,
            None => 60,
        };

        let access_jwt_algorithm = match lookup("ACCESS_JWT_ALGORITHM") {
            Some(s) => Algorithm::from_str(s.trim())
                .map_err(|_| ConfigError::Invalid("ACCESS_JWT_ALGORITHM"))?,
            None => Algorithm::RS256,
        };

        let access_jwt_public_key_pem =
            required(&lookup, "ACCESS_JWT_PUBLIC_KEY_PEM")?.replace("\\n", "\n");

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            auth_issuer_uri,
            auth_client_id,
            auth_audience,
            access_token_leeway_seconds,
            access_jwt_algorithm,
            access_jwt_public_key_pem,
        })
    }
}

// Blank counts as missing.
fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing(key))
}
