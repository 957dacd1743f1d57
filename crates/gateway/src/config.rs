use url::Url;

pub const DEFAULT_COOKIE_PREFIX: &str = "slackgate_";

/// HTTP-facing settings for the auth routes.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Prepended to cookie names to avoid collisions with co-hosted apps.
    pub cookie_prefix: String,
    /// Mark the token cookie `Secure`. Only disable for plain-http development.
    pub secure_cookies: bool,
    /// Externally visible base URL. When unset the origin is taken from the
    /// request's `Host` header, or `X-Forwarded-*` when
    /// `trust_forwarded_headers` is set.
    pub public_url: Option<Url>,
    /// Take scheme and host from `X-Forwarded-Proto` / `X-Forwarded-Host`.
    /// Only safe behind a proxy that overwrites them.
    pub trust_forwarded_headers: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            cookie_prefix: DEFAULT_COOKIE_PREFIX.to_string(),
            secure_cookies: true,
            public_url: None,
            trust_forwarded_headers: false,
        }
    }
}

impl GatewayConfig {
    pub fn with_public_url(mut self, mut url: Url) -> Self {
        // Relative joins keep any path prefix only when the base ends in '/'.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);
        self.public_url = Some(url);
        self
    }

    pub fn token_cookie_name(&self) -> String {
        format!("{}slacktoken", self.cookie_prefix)
    }
}
