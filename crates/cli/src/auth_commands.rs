use std::{sync::Arc, time::Duration};

use {
    anyhow::{Context, Result},
    clap::Args,
    secrecy::Secret,
    slackgate_gateway::GatewayConfig,
    slackgate_oauth::{OAuthConfig, OAuthFlow},
    url::Url,
};

/// Slack app credentials and requested scopes.
#[derive(Args)]
pub struct ProviderArgs {
    /// Slack app client ID.
    #[arg(long, env = "SLACK_CLIENT_ID")]
    client_id: String,

    /// Slack app client secret.
    #[arg(long, env = "SLACK_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Comma-separated scopes to request. Defaults to the built-in set.
    #[arg(long, env = "SLACK_SCOPES", value_delimiter = ',')]
    scopes: Vec<String>,

    /// Token exchange timeout in seconds.
    #[arg(long, default_value_t = 10)]
    exchange_timeout_secs: u64,
}

impl ProviderArgs {
    /// Build and validate the provider configuration.
    pub fn oauth_config(self) -> Result<OAuthConfig> {
        let scopes: Vec<String> = self
            .scopes
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let config = OAuthConfig::slack(self.client_id, Secret::new(self.client_secret))
            .with_timeout(Duration::from_secs(self.exchange_timeout_secs));
        let config = if scopes.is_empty() {
            config
        } else {
            config.with_scopes(scopes)
        };
        config.validate()?;
        Ok(config)
    }
}

/// Cookie and origin settings for the HTTP routes.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Externally visible base URL, if behind a proxy that rewrites Host.
    #[arg(long, env = "SLACKGATE_PUBLIC_URL")]
    public_url: Option<Url>,

    /// Prefix for cookie names.
    #[arg(long, env = "SLACKGATE_COOKIE_PREFIX", default_value = slackgate_gateway::config::DEFAULT_COOKIE_PREFIX)]
    cookie_prefix: String,

    /// Drop the `Secure` cookie flag (plain-http development only).
    #[arg(long, default_value_t = false)]
    insecure_cookies: bool,

    /// Derive the callback origin from `X-Forwarded-Host`/`-Proto`. Only
    /// enable behind a proxy that overwrites those headers.
    #[arg(long, env = "SLACKGATE_TRUST_PROXY_HEADERS", default_value_t = false)]
    trust_proxy_headers: bool,
}

impl SessionArgs {
    pub fn gateway_config(self) -> GatewayConfig {
        let config = GatewayConfig {
            cookie_prefix: self.cookie_prefix,
            secure_cookies: !self.insecure_cookies,
            public_url: None,
            trust_forwarded_headers: self.trust_proxy_headers,
        };
        match self.public_url {
            Some(url) => config.with_public_url(url),
            None => config,
        }
    }
}

pub fn flow(provider: ProviderArgs) -> Result<OAuthFlow> {
    let config = provider.oauth_config()?;
    OAuthFlow::new(Arc::new(config)).context("failed to build token exchange client")
}

/// Print the authorization URL for `callback` without starting a server.
pub fn print_authorize_url(provider: ProviderArgs, callback: &Url) -> Result<()> {
    let flow = flow(provider)?;
    println!("{}", flow.start(callback)?);
    Ok(())
}
