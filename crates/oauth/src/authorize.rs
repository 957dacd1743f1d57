use url::Url;

use crate::{
    error::{Error, Result},
    types::OAuthConfig,
};

/// Build the provider authorization URL the user agent is sent to.
///
/// `redirect_uri` must be the exact callback later passed to the token
/// exchange; the provider compares the two byte for byte.
pub fn authorize_url(config: &OAuthConfig, redirect_uri: &Url) -> Result<Url> {
    let mut url = Url::parse(&config.auth_url).map_err(|e| Error::malformed(&config.auth_url, e))?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("scope", &config.scope_param())
        .append_pair("redirect_uri", redirect_uri.as_str());
    Ok(url)
}
