use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub allowed_origin: String,
    /// Bot token from BotFather. Optional on purpose: without it the login
    /// endpoint degrades to a configuration-error response instead of the
    /// process refusing to start.
    pub telegram_bot_token: Option<String>,
    pub state_file: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "127.0.0.1:3001"),
            allowed_origin: get_env_or("ALLOWED_ORIGIN", "http://localhost:5173"),
            telegram_bot_token: get_env_opt("TELEGRAM_BOT_TOKEN"),
            state_file: get_env_opt("STATE_FILE"),
        })
    }

    pub fn bot_token(&self) -> Result<&str> {
        match self.telegram_bot_token.as_deref() {
            Some(token) => Ok(token),
            None => Err(Error::Config(
                "Server is not configured (TELEGRAM_BOT_TOKEN missing)".to_string(),
            )),
        }
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
