use {
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    serde_json::Value,
    tracing::debug,
};

use crate::{
    error::{Error, Result},
    types::AccessToken,
};

/// Identity reported by `auth.test` for the token's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    pub url: String,
    pub team: String,
    pub user: String,
    pub team_id: String,
    pub user_id: String,
}

/// Minimal Slack Web API client acting on a user's behalf.
pub struct SlackApi {
    base_url: String,
    token: AccessToken,
    client: reqwest::Client,
}

impl SlackApi {
    /// `client` should carry a request timeout; calls are not otherwise bounded.
    pub fn new(base_url: impl Into<String>, token: AccessToken, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client,
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str) -> Result<T> {
        debug!(method, "slack api call");
        let body = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::Api(e.to_string()))?
            .json::<Value>()
            .await
            .map_err(|e| Error::Api(e.to_string()))?;

        if !body["ok"].as_bool().unwrap_or(false) {
            let reason = body["error"].as_str().unwrap_or("unknown_error");
            return Err(Error::Api(reason.to_string()));
        }
        serde_json::from_value(body).map_err(|e| Error::Api(format!("{method}: {e}")))
    }

    /// Check the token and report who it belongs to.
    pub async fn auth_test(&self) -> Result<AuthIdentity> {
        self.call("auth.test").await
    }
}
