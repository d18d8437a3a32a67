//! Gotify application catalog client.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::GotifyConfig;
use crate::error::CatalogError;

/// One Gotify application (notification channel). Only `id` and `name`
/// are consumed; the server sends more fields, all ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    pub id: i64,
    pub name: String,
}

/// Fetches the list of known applications from the Gotify REST API.
///
/// No caching and no retry: this is only called interactively from the
/// command adapter, which turns any error into a user-facing reply.
pub struct CatalogClient {
    http: reqwest::Client,
    rest_url: String,
    token: SecretString,
}

impl CatalogClient {
    pub fn new(config: &GotifyConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            rest_url: config.rest_url.trim_end_matches('/').to_string(),
            token: config.client_token.clone(),
        })
    }

    /// Single GET against `{rest_url}/application`.
    pub async fn fetch_applications(&self) -> Result<Vec<Application>, CatalogError> {
        let url = format!("{}/application", self.rest_url);

        let response = self
            .http
            .get(&url)
            .header("X-Gotify-Key", self.token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Failed to fetch applications: status {}", status);
            return Err(CatalogError::Status(status));
        }

        Ok(response.json::<Vec<Application>>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_decode_ignores_extra_fields() {
        let body = r#"[
            {"id": 1, "name": "backup", "token": "AXyz", "internal": true},
            {"id": 2, "name": "monitoring"}
        ]"#;

        let apps: Vec<Application> = serde_json::from_str(body).unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].id, 1);
        assert_eq!(apps[0].name, "backup");
        assert_eq!(apps[1].name, "monitoring");
    }
}
