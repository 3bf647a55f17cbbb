use std::env;

use anyhow::Context;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Settings read from the environment, a `.env` file is honored when present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TCP port the server listens on, `PORT`
    pub port: u16,
    /// Origin clients must announce on login, `ALLOWED_ORIGIN`
    pub allowed_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            allowed_origin: String::from(DEFAULT_ALLOWED_ORIGIN),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Self::from_vars(env::var("PORT").ok(), env::var("ALLOWED_ORIGIN").ok())
    }

    fn from_vars(port: Option<String>, allowed_origin: Option<String>) -> anyhow::Result<Self> {
        let port = match port {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", port))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            port,
            allowed_origin: allowed_origin
                .filter(|origin| !origin.trim().is_empty())
                .unwrap_or_else(|| String::from(DEFAULT_ALLOWED_ORIGIN)),
        })
    }

    /// Clients that do not announce an origin are let in
    pub fn is_origin_allowed(&self, origin: Option<&str>) -> bool {
        origin.map_or(true, |origin| origin == self.allowed_origin)
    }
}
