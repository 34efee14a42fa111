use std::env;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ORD_DOCUMENT_PATH: &str = "ord.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT is not a valid port number: {0:?}")]
    InvalidPort(String),
}

/// Runtime settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL advertised in the agent card.
    pub public_base_url: String,
    pub ord_document_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    ///
    /// `SERVICE_URL` wins verbatim as the advertised base URL. Without it
    /// the URL is inferred from `HOST` and `PORT`: any non-local host is
    /// assumed to sit behind TLS, while `localhost` and `0.0.0.0` resolve
    /// to `http://localhost:{port}`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port_raw = lookup("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
        let port: u16 = port_raw
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_raw.clone()))?;

        let public_base_url = match lookup("SERVICE_URL") {
            Some(url) => url,
            None => infer_base_url(&host, port),
        };

        let ord_document_path = lookup("ORD_DOCUMENT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ORD_DOCUMENT_PATH));

        Ok(Self {
            host,
            port,
            public_base_url,
            ord_document_path,
        })
    }

    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn infer_base_url(host: &str, port: u16) -> String {
    // Local hosts are reachable as localhost over plain HTTP; anything
    // else is taken to be a deployed hostname behind TLS.
    if host == "localhost" || host == "0.0.0.0" {
        format!("http://localhost:{port}")
    } else {
        format!("https://{host}:{port}")
    }
}
