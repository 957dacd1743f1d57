use {
    axum_extra::extract::cookie::{Cookie, CookieJar},
    slackgate_oauth::{AccessToken, CredentialStore},
};

use crate::config::GatewayConfig;

/// Lifetime of the token cookie, in seconds.
pub const TOKEN_MAX_AGE_SECS: i64 = 86_400;

/// Credential store backed by a single client-held cookie.
///
/// Nothing is kept server-side. Logging out writes an empty value with the
/// same attributes, which reads back as `None`.
#[derive(Debug, Clone)]
pub struct CookieCredentialStore {
    jar: CookieJar,
    name: String,
    secure: bool,
}

impl CookieCredentialStore {
    pub fn new(jar: CookieJar, config: &GatewayConfig) -> Self {
        Self {
            jar,
            name: config.token_cookie_name(),
            secure: config.secure_cookies,
        }
    }

    /// The jar to return with the response so writes reach the client.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl CredentialStore for CookieCredentialStore {
    fn set(&mut self, token: Option<AccessToken>) {
        let value = token.map(AccessToken::into_inner).unwrap_or_default();
        let cookie = Cookie::build((self.name.clone(), value))
            .http_only(true)
            .secure(self.secure)
            .path("/")
            .max_age(time::Duration::seconds(TOKEN_MAX_AGE_SECS));
        self.jar = std::mem::take(&mut self.jar).add(cookie);
    }

    fn get(&self) -> Option<AccessToken> {
        self.jar
            .get(&self.name)
            .and_then(|c| AccessToken::parse(c.value()))
    }
}
