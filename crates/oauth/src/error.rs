/// Errors raised while driving the authorization-code flow.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured provider endpoint is not a valid absolute URL.
    #[error("malformed provider URL '{url}': {source}")]
    MalformedBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The provider rejected the authorization code.
    #[error("authorization failed: {0}")]
    AuthorizationFailed(String),

    /// The token endpoint could not be reached or answered garbage.
    #[error("token exchange transport error: {0}")]
    ExchangeTransport(String),

    /// No access token is held for this session.
    #[error("access token not found")]
    MissingToken,

    /// A provider API call returned `ok: false`.
    #[error("provider API error: {0}")]
    Api(String),
}

impl Error {
    pub(crate) fn malformed(url: &str, source: url::ParseError) -> Self {
        Self::MalformedBaseUrl {
            url: url.to_string(),
            source,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::ExchangeTransport(err.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
