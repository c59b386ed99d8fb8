//! Application Configuration
//!
//! The only setting is the origin serving both the REST API and the push channel.
//! A static wasm bundle has no process environment, so it is baked in at build time.

use reqwest::Url;

use crate::error::{TodoError, TodoResult};

/// Build-time variable holding the API origin
pub const API_URL_VAR: &str = "TODO_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    api_base: Url,
}

impl AppConfig {
    /// Load from the value captured when the bundle was compiled
    pub fn from_build_env() -> TodoResult<Self> {
        Self::parse(option_env!("TODO_API_URL"))
    }

    pub fn parse(raw: Option<&str>) -> TodoResult<Self> {
        let raw = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TodoError::Config(format!("{} is not set", API_URL_VAR)))?;

        let api_base = Url::parse(raw)
            .map_err(|e| TodoError::Config(format!("{} is not a valid URL ({}): {}", API_URL_VAR, raw, e)))?;

        match api_base.scheme() {
            "http" | "https" => {}
            other => {
                return Err(TodoError::Config(format!(
                    "{} must use http or https, got {}",
                    API_URL_VAR, other
                )))
            }
        }
        if api_base.cannot_be_a_base() || api_base.host_str().is_none() {
            return Err(TodoError::Config(format!("{} has no host: {}", API_URL_VAR, raw)));
        }

        Ok(Self { api_base })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Socket.IO endpoint on the same origin, WebSocket transport only
    pub fn socket_url(&self) -> TodoResult<Url> {
        let mut url = self.api_base.clone();
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| TodoError::Channel(format!("cannot derive socket URL from {}", self.api_base)))?;
        url.set_path("/socket.io/");
        url.set_query(Some("EIO=4&transport=websocket"));
        url.set_fragment(None);
        Ok(url)
    }
}
