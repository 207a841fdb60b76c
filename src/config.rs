use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
// Default Bun dev and preview server ports
const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:4173"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Read settings from the process environment (after `.env` has been loaded)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            host,
            port,
            allowed_origins,
        })
    }
}
