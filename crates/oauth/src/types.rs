use std::{fmt, time::Duration};

use secrecy::SecretString;

use crate::error::{Error, Result};

pub const SLACK_AUTH_URL: &str = "https://slack.com/oauth/authorize";
pub const SLACK_TOKEN_URL: &str = "https://slack.com/api/oauth.access";
pub const SLACK_API_URL: &str = "https://slack.com/api";

/// Scopes requested when none are configured explicitly.
pub const DEFAULT_SCOPES: &[&str] = &[
    "team:read",
    "users:read",
    "usergroups:read",
    "im:write",
    "chat:write:user",
    "chat:write:bot",
];

/// Delimiter used to join scopes in the `scope` query parameter.
pub const SCOPE_DELIMITER: &str = ",";

pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// How the client authenticates itself at the token endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExchangeMode {
    /// Server-side client: `client_secret` is sent with the code.
    #[default]
    Confidential,
    /// Only `client_id` is sent.
    Public,
}

/// OAuth 2.0 provider configuration.
///
/// Built once at start-up and shared read-only for the life of the process.
#[derive(Debug)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub auth_url: String,
    pub token_url: String,
    /// Base URL for provider Web API calls made with an issued token.
    pub api_url: String,
    /// Requested scopes. Order is preserved on the wire.
    pub scopes: Vec<String>,
    pub exchange_mode: ExchangeMode,
    /// Upper bound for a single token exchange round-trip.
    pub timeout: Duration,
}

impl OAuthConfig {
    /// Slack endpoints with the default scope set.
    pub fn slack(client_id: impl Into<String>, client_secret: SecretString) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            auth_url: SLACK_AUTH_URL.to_string(),
            token_url: SLACK_TOKEN_URL.to_string(),
            api_url: SLACK_API_URL.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            exchange_mode: ExchangeMode::Confidential,
            timeout: DEFAULT_EXCHANGE_TIMEOUT,
        }
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Point every endpoint at `base` (e.g. a mock provider).
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.auth_url = format!("{base}/oauth/authorize");
        self.token_url = format!("{base}/api/oauth.access");
        self.api_url = format!("{base}/api");
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured scopes as a single `scope` parameter value.
    pub fn scope_param(&self) -> String {
        self.scopes.join(SCOPE_DELIMITER)
    }

    /// Check that every endpoint parses as an absolute URL.
    pub fn validate(&self) -> Result<()> {
        for url in [&self.auth_url, &self.token_url, &self.api_url] {
            url::Url::parse(url).map_err(|e| Error::malformed(url, e))?;
        }
        Ok(())
    }
}

/// Opaque provider access token. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw value. The empty string is not a token and yields `None`.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Successful token endpoint response.
#[derive(Debug, Clone)]
pub struct TokenResponse {
    pub access_token: AccessToken,
    pub scope: Option<String>,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
    pub user_id: Option<String>,
}
