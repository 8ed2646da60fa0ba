//! Directory adapter over the platform REST API.

use serde::de::DeserializeOwned;

use opsdesk_auth::{Permission, RoleRecord};
use opsdesk_core::RoleId;

use super::{DirectoryError, DirectoryService, RoleGrantRecord};
use crate::config::AccessConfig;

/// `GET /roles`, `GET /roles/{id}/permissions`, `GET /permissions`.
#[derive(Debug, Clone)]
pub struct RestDirectory {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RestDirectory {
    pub fn new(config: &AccessConfig) -> Result<Self, DirectoryError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.request_timeout);
        let client = builder
            .build()
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DirectoryError> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DirectoryError::Status(resp.status().as_u16()));
        }

        resp.json().await.map_err(|e| DirectoryError::Decode(e.to_string()))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl DirectoryService for RestDirectory {
    async fn list_roles(&self) -> Result<Vec<RoleRecord>, DirectoryError> {
        self.get_json("/roles").await
    }

    async fn list_role_grants(&self, role_id: RoleId) -> Result<Vec<RoleGrantRecord>, DirectoryError> {
        self.get_json(&format!("/roles/{role_id}/permissions")).await
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, DirectoryError> {
        self.get_json("/permissions").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalised() {
        let config = AccessConfig::default().with_api_url("https://ops.example.com/api/");
        let dir = RestDirectory::new(&config).unwrap();
        assert_eq!(dir.url("/roles"), "https://ops.example.com/api/roles");
    }
}
