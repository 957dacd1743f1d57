use std::sync::Arc;

use {
    axum::http::HeaderMap, axum_extra::extract::CookieJar, slackgate_oauth::OAuthFlow, url::Url,
};

use crate::{
    config::GatewayConfig,
    error::GatewayError,
    origin::{callback_url, request_origin},
    session::CookieCredentialStore,
};

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct GatewayState {
    pub flow: Arc<OAuthFlow>,
    pub config: Arc<GatewayConfig>,
}

impl GatewayState {
    pub fn new(flow: OAuthFlow, config: GatewayConfig) -> Self {
        Self {
            flow: Arc::new(flow),
            config: Arc::new(config),
        }
    }

    pub fn credential_store(&self, jar: CookieJar) -> CookieCredentialStore {
        CookieCredentialStore::new(jar, &self.config)
    }

    pub fn callback_url(&self, headers: &HeaderMap) -> Result<Url, GatewayError> {
        let origin = request_origin(headers, &self.config)?;
        callback_url(&origin)
    }
}
