use {axum::http::HeaderMap, url::Url};

use crate::{config::GatewayConfig, error::GatewayError};

pub const START_PATH: &str = "/auth/start";
pub const COMPLETE_PATH: &str = "/auth/complete";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const HOME_PATH: &str = "/";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn forwarded<'a>(headers: &'a HeaderMap, config: &GatewayConfig, name: &str) -> Option<&'a str> {
    if config.trust_forwarded_headers {
        header(headers, name)
    } else {
        None
    }
}

/// Base URL the client reached us at, ending in `/`.
///
/// `X-Forwarded-*` headers are only honored when the config says a proxy
/// sets them; otherwise any client could pick the callback origin.
pub fn request_origin(headers: &HeaderMap, config: &GatewayConfig) -> Result<Url, GatewayError> {
    if let Some(url) = &config.public_url {
        return Ok(url.clone());
    }
    let host = forwarded(headers, config, "x-forwarded-host")
        .or_else(|| header(headers, "host"))
        .ok_or(GatewayError::MissingHost)?;
    let scheme = match forwarded(headers, config, "x-forwarded-proto") {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };
    let raw = format!("{scheme}://{host}/");
    let url = Url::parse(&raw).map_err(|_| GatewayError::BadOrigin(raw.clone()))?;
    // A host header carrying a path or credentials is not an origin.
    if url.path() != "/" || !url.username().is_empty() {
        return Err(GatewayError::BadOrigin(raw));
    }
    Ok(url)
}

/// The provider callback URL. Initiate and Complete both go through here so
/// the `redirect_uri` they send cannot drift apart.
pub fn callback_url(origin: &Url) -> Result<Url, GatewayError> {
    let relative = COMPLETE_PATH.trim_start_matches('/');
    origin
        .join(relative)
        .map_err(|_| GatewayError::BadOrigin(origin.to_string()))
}
