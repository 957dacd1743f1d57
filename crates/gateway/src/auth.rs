//! Initiate, complete and logout handlers.

use {
    axum::{
        extract::{Query, State},
        http::HeaderMap,
        response::Redirect,
    },
    axum_extra::extract::CookieJar,
    serde::Deserialize,
    slackgate_oauth::Error as OAuthError,
    tracing::debug,
};

use crate::{error::GatewayError, origin::HOME_PATH, state::GatewayState};

/// `GET /auth/start`: send the user agent to the provider.
pub async fn start(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Redirect, GatewayError> {
    let callback = state.callback_url(&headers)?;
    let url = state.flow.start(&callback)?;
    debug!(%callback, "redirecting to provider");
    Ok(Redirect::to(url.as_str()))
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteParams {
    #[serde(default)]
    pub code: Option<String>,
    /// Set by the provider when the user denies consent.
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /auth/complete?code=...`: exchange the code and store the token.
pub async fn complete(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    jar: CookieJar,
    Query(params): Query<CompleteParams>,
) -> Result<(CookieJar, Redirect), GatewayError> {
    if let Some(reason) = params.error {
        return Err(OAuthError::AuthorizationFailed(reason).into());
    }
    let code = params.code.unwrap_or_default();
    let callback = state.callback_url(&headers)?;

    let mut store = state.credential_store(jar);
    state.flow.complete(&code, &callback, &mut store).await?;
    Ok((store.into_jar(), Redirect::to(HOME_PATH)))
}

/// `GET /auth/logout`: overwrite the token with the logged-out sentinel.
pub async fn logout(State(state): State<GatewayState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut store = state.credential_store(jar);
    state.flow.logout(&mut store);
    (store.into_jar(), Redirect::to(HOME_PATH))
}
