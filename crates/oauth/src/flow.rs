use std::sync::Arc;

use {
    tracing::{info, warn},
    url::Url,
};

use crate::{
    api::SlackApi,
    authorize::authorize_url,
    error::{Error, Result},
    exchange::{SlackExchangeClient, TokenExchange},
    storage::CredentialStore,
    types::{AccessToken, OAuthConfig, TokenResponse},
};

/// Authorization state observable from a session's credential store.
///
/// The in-between "awaiting provider callback" step lives entirely in the
/// provider's UI and leaves no trace here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

/// Drives the authorization-code flow: initiate, complete, logout and gate.
pub struct OAuthFlow {
    config: Arc<OAuthConfig>,
    exchange: Arc<dyn TokenExchange>,
    /// Shared by provider API clients; bounded by `config.timeout`.
    http: reqwest::Client,
}

impl OAuthFlow {
    /// Flow backed by the real Slack token endpoint.
    pub fn new(config: Arc<OAuthConfig>) -> Result<Self> {
        let exchange = Arc::new(SlackExchangeClient::new(Arc::clone(&config))?);
        Self::with_exchange(config, exchange)
    }

    pub fn with_exchange(
        config: Arc<OAuthConfig>,
        exchange: Arc<dyn TokenExchange>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            config,
            exchange,
            http,
        })
    }

    /// Authorization URL to send the user agent to.
    pub fn start(&self, callback: &Url) -> Result<Url> {
        authorize_url(&self.config, callback)
    }

    /// Exchange `code` and store the resulting token.
    ///
    /// The store is written only after a successful exchange.
    pub async fn complete<S>(
        &self,
        code: &str,
        callback: &Url,
        store: &mut S,
    ) -> Result<TokenResponse>
    where
        S: CredentialStore + Send + ?Sized,
    {
        let response = self
            .exchange
            .exchange(code, callback)
            .await
            .inspect_err(|e| warn!(error = %e, "authorization code exchange failed"))?;

        store.set(Some(response.access_token.clone()));
        info!(
            team_id = response.team_id.as_deref().unwrap_or("-"),
            user_id = response.user_id.as_deref().unwrap_or("-"),
            "session authorized"
        );
        Ok(response)
    }

    pub fn logout<S: CredentialStore + ?Sized>(&self, store: &mut S) {
        store.clear();
        info!("session logged out");
    }

    pub fn state<S: CredentialStore + ?Sized>(&self, store: &S) -> AuthState {
        if store.is_authorized() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    /// API client acting with the session's token.
    pub fn api_client<S: CredentialStore + ?Sized>(&self, store: &S) -> Result<SlackApi> {
        let token = store.get().ok_or(Error::MissingToken)?;
        Ok(self.api(token))
    }

    pub fn api(&self, token: AccessToken) -> SlackApi {
        SlackApi::new(self.config.api_url.clone(), token, self.http.clone())
    }
}
