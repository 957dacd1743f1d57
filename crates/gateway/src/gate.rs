use {
    axum::{
        extract::{FromRef, FromRequestParts, Request, State},
        http::request::Parts,
        middleware::Next,
        response::{IntoResponse, Redirect, Response},
    },
    axum_extra::extract::CookieJar,
    slackgate_oauth::{AccessToken, CredentialStore},
    tracing::debug,
};

use crate::{origin::START_PATH, state::GatewayState};

/// Middleware for protected routes: unauthorized sessions are sent to
/// `/auth/start`.
pub async fn require_authorization(
    State(state): State<GatewayState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if !state.credential_store(jar).is_authorized() {
        debug!(path = %request.uri().path(), "unauthorized, restarting auth flow");
        return Redirect::to(START_PATH).into_response();
    }
    next.run(request).await
}

/// Extracts the session's access token, redirecting to `/auth/start` when
/// there is none.
#[derive(Debug, Clone)]
pub struct Authorized(pub AccessToken);

impl<S> FromRequestParts<S> for Authorized
where
    GatewayState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = GatewayState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        state
            .credential_store(jar)
            .get()
            .map(Authorized)
            .ok_or_else(|| Redirect::to(START_PATH))
    }
}
