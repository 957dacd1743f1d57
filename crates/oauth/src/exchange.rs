use std::sync::Arc;

use {
    async_trait::async_trait,
    secrecy::ExposeSecret,
    serde::Deserialize,
    tracing::{debug, warn},
    url::Url,
};

use crate::{
    error::{Error, Result},
    types::{AccessToken, ExchangeMode, OAuthConfig, TokenResponse},
};

/// Turns a one-time authorization code into an access token.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// `redirect_uri` must equal the one sent in the authorize redirect.
    async fn exchange(&self, code: &str, redirect_uri: &Url) -> Result<TokenResponse>;
}

/// Wire shape of `oauth.access`. Slack answers HTTP 200 for rejections and
/// signals them through `ok`/`error`.
#[derive(Debug, Deserialize)]
struct RawTokenResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    team_id: Option<String>,
    #[serde(default)]
    team_name: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

impl RawTokenResponse {
    fn into_result(self) -> Result<TokenResponse> {
        if !self.ok {
            let reason = self.error.unwrap_or_else(|| "unknown_error".to_string());
            return Err(Error::AuthorizationFailed(reason));
        }
        let access_token = self
            .access_token
            .and_then(AccessToken::parse)
            .ok_or_else(|| Error::AuthorizationFailed("response carried no access_token".into()))?;
        Ok(TokenResponse {
            access_token,
            scope: self.scope,
            team_id: self.team_id,
            team_name: self.team_name,
            user_id: self.user_id,
        })
    }
}

/// Token exchange against Slack's `oauth.access` endpoint.
pub struct SlackExchangeClient {
    config: Arc<OAuthConfig>,
    client: reqwest::Client,
}

impl SlackExchangeClient {
    pub fn new(config: Arc<OAuthConfig>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl TokenExchange for SlackExchangeClient {
    async fn exchange(&self, code: &str, redirect_uri: &Url) -> Result<TokenResponse> {
        if code.is_empty() {
            return Err(Error::AuthorizationFailed("missing authorization code".into()));
        }

        let mut form = vec![
            ("client_id", self.config.client_id.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri.as_str()),
        ];
        if self.config.exchange_mode == ExchangeMode::Confidential {
            form.push((
                "client_secret",
                self.config.client_secret.expose_secret().as_str(),
            ));
        }

        debug!(token_url = %self.config.token_url, "exchanging authorization code");
        let resp = self
            .client
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, "token endpoint unreachable"))?;

        let status = resp.status();
        if status.is_server_error() {
            return Err(Error::ExchangeTransport(format!(
                "token endpoint returned HTTP {status}"
            )));
        }
        if status.is_client_error() {
            return Err(Error::AuthorizationFailed(format!(
                "token endpoint returned HTTP {status}"
            )));
        }

        resp.json::<RawTokenResponse>().await?.into_result()
    }
}
