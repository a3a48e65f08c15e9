//! HTTP client shared by the client commands

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use savectl_core::config::DEFAULT_ENDPOINT;
use savectl_core::{SavectlConfig, UserId};

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (for piping to jq)
    Json,
    /// Quiet mode - IDs only
    Quiet,
}

/// Global flags every client command sees
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub endpoint: Option<String>,
    pub user: Option<String>,
    pub format: OutputFormat,
}

impl ClientOptions {
    /// Priority: flag/env > config.toml > default
    pub fn endpoint(&self, config: &SavectlConfig) -> String {
        if let Some(ref ep) = self.endpoint {
            return ep.clone();
        }
        if !config.client.endpoint.is_empty() {
            return config.client.endpoint.clone();
        }
        DEFAULT_ENDPOINT.to_string()
    }

    /// Priority: flag/env > config.toml > error
    pub fn user(&self, config: &SavectlConfig) -> Result<UserId> {
        let raw = self
            .user
            .as_ref()
            .or(config.client.user.as_ref())
            .ok_or_else(|| {
                anyhow!(
                    "User required. Use --user, SAVECTL_USER env var, or set [client].user in ~/.savectl/config.toml"
                )
            })?;

        raw.parse()
            .with_context(|| format!("invalid user id '{}'", raw))
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// Client bound to one endpoint and one acting user
pub struct Api {
    client: Client,
    endpoint: String,
    pub user: UserId,
}

impl Api {
    pub fn connect(options: &ClientOptions) -> Result<Self> {
        let config = SavectlConfig::load().context("Failed to load config")?;
        let endpoint = options.endpoint(&config);
        let user = options.user(&config)?;
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        tracing::debug!(%endpoint, %user, "using savectl API");
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            user,
        })
    }

    /// URL for a path below `/users/{user}`.
    fn url(&self, path: &str) -> String {
        format!("{}/users/{}{}", self.endpoint, self.user, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .context("Failed to connect to savectl API")?;
        handle_response(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .context("Failed to connect to savectl API")?;
        handle_response(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .context("Failed to connect to savectl API")?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    if response.status().is_success() {
        response.json::<T>().await.context("Failed to parse response")
    } else {
        Err(error_from(response).await)
    }
}

async fn error_from(response: Response) -> anyhow::Error {
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => anyhow!("{} ({}): {}", status, body.error, body.message),
        Err(_) => anyhow!("{}: {}", status, text),
    }
}

/// Pretty-print any response as JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(endpoint: Option<&str>, user: Option<&str>) -> ClientOptions {
        ClientOptions {
            endpoint: endpoint.map(str::to_string),
            user: user.map(str::to_string),
            format: OutputFormat::Human,
        }
    }

    #[test]
    fn flag_endpoint_wins_over_config() {
        let mut config = SavectlConfig::default();
        config.client.endpoint = "http://saves.internal:3030".into();

        assert_eq!(
            options(Some("http://localhost:9000"), None).endpoint(&config),
            "http://localhost:9000"
        );
        assert_eq!(options(None, None).endpoint(&config), "http://saves.internal:3030");
    }

    #[test]
    fn user_falls_back_to_config() {
        let mut config = SavectlConfig::default();
        let id = UserId::new();
        config.client.user = Some(id.to_string());

        assert_eq!(options(None, None).user(&config).unwrap(), id);
    }

    #[test]
    fn missing_user_is_an_error() {
        let err = options(None, None)
            .user(&SavectlConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("User required"));
    }

    #[test]
    fn malformed_user_is_an_error() {
        let err = options(None, Some("bob"))
            .user(&SavectlConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("invalid user id 'bob'"));
    }
}
