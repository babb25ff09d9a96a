use dotenvy::dotenv;
use std::{env, path::PathBuf};

use travbot_types::{errors::AppError, tribe::Tribe};

pub const DEFAULT_MAX_FORCED_RETRIES: u32 = 8;
pub const DEFAULT_MAX_DEPENDENCY_DEPTH: u32 = 12;
pub const DEFAULT_POLL_LIMIT: u32 = 30;
pub const DEFAULT_PAGE_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Game server root, e.g. `https://ts1.travian.com`, without trailing slash.
    pub server_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Account tribe, used to reject tribe specific buildings early.
    pub tribe: Option<Tribe>,
    /// Whether the active village is the capital.
    pub capital: Option<bool>,
    pub catalog_path: Option<PathBuf>,
    pub headless: bool,
    pub chromium_path: Option<PathBuf>,
    pub max_forced_retries: u32,
    pub max_dependency_depth: u32,
    /// Countdown reads before a demolition wait gives up.
    pub poll_limit: u32,
    pub page_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let server_url = match env::var("TRAVBOT_SERVER_URL") {
            Ok(val) => val.trim_end_matches('/').to_string(),
            Err(_) => return Err(AppError::MissingEnv("TRAVBOT_SERVER_URL")),
        };

        let tribe = match env::var("TRAVBOT_TRIBE") {
            Ok(val) => Some(val.parse::<Tribe>().map_err(|_| AppError::InvalidEnv {
                var: "TRAVBOT_TRIBE",
                value: val,
            })?),
            Err(_) => None,
        };

        let capital = match env::var("TRAVBOT_CAPITAL") {
            Ok(val) => Some(parse_flag("TRAVBOT_CAPITAL", val)?),
            Err(_) => None,
        };

        let headless = match env::var("TRAVBOT_HEADLESS") {
            Ok(val) => parse_flag("TRAVBOT_HEADLESS", val)?,
            Err(_) => true,
        };

        Ok(Self {
            server_url,
            username: env::var("TRAVBOT_USERNAME").ok(),
            password: env::var("TRAVBOT_PASSWORD").ok(),
            tribe,
            capital,
            catalog_path: env::var("TRAVBOT_CATALOG_PATH").ok().map(PathBuf::from),
            headless,
            chromium_path: env::var("TRAVBOT_CHROMIUM_PATH").ok().map(PathBuf::from),
            max_forced_retries: parse_number(
                "TRAVBOT_MAX_FORCED_RETRIES",
                DEFAULT_MAX_FORCED_RETRIES,
            )?,
            max_dependency_depth: parse_number(
                "TRAVBOT_MAX_DEPENDENCY_DEPTH",
                DEFAULT_MAX_DEPENDENCY_DEPTH,
            )?,
            poll_limit: parse_number("TRAVBOT_POLL_LIMIT", DEFAULT_POLL_LIMIT)?.max(1),
            page_timeout_ms: parse_number("TRAVBOT_PAGE_TIMEOUT_MS", DEFAULT_PAGE_TIMEOUT_MS)?,
        })
    }

    /// Defaults for everything but the server, no credentials.
    pub fn for_server(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into().trim_end_matches('/').to_string(),
            username: None,
            password: None,
            tribe: None,
            capital: None,
            catalog_path: None,
            headless: true,
            chromium_path: None,
            max_forced_retries: DEFAULT_MAX_FORCED_RETRIES,
            max_dependency_depth: DEFAULT_MAX_DEPENDENCY_DEPTH,
            poll_limit: DEFAULT_POLL_LIMIT,
            page_timeout_ms: DEFAULT_PAGE_TIMEOUT_MS,
        }
    }
}

fn parse_flag(var: &'static str, value: String) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(AppError::InvalidEnv { var, value }),
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, AppError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::InvalidEnv { var, value }),
        Err(_) => Ok(default),
    }
}
