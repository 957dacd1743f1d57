use {
    axum::{
        Json, Router,
        extract::State,
        middleware,
        response::{Html, IntoResponse},
        routing::get,
    },
    axum_extra::extract::CookieJar,
    slackgate_oauth::{AuthIdentity, AuthState},
    tokio::net::TcpListener,
    tower_http::trace::TraceLayer,
    tracing::info,
};

use crate::{
    auth,
    error::GatewayError,
    gate::{Authorized, require_authorization},
    origin::{COMPLETE_PATH, HOME_PATH, LOGOUT_PATH, START_PATH},
    state::GatewayState,
};

/// Build the application router.
pub fn build_router(state: GatewayState) -> Router {
    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_authorization,
        ));

    Router::new()
        .route(HOME_PATH, get(home))
        .route(START_PATH, get(auth::start))
        .route(COMPLETE_PATH, get(auth::complete))
        .route(LOGOUT_PATH, get(auth::logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home(State(state): State<GatewayState>, jar: CookieJar) -> impl IntoResponse {
    let store = state.credential_store(jar);
    match state.flow.state(&store) {
        AuthState::Authenticated => Html(format!(
            "<p>Signed in with Slack.</p><p><a href=\"/me\">Who am I?</a> · <a href=\"{LOGOUT_PATH}\">Sign out</a></p>"
        )),
        AuthState::Unauthenticated => Html(format!(
            "<p>Not signed in.</p><p><a href=\"{START_PATH}\">Sign in with Slack</a></p>"
        )),
    }
}

async fn me(
    State(state): State<GatewayState>,
    Authorized(token): Authorized,
) -> Result<Json<AuthIdentity>, GatewayError> {
    Ok(Json(state.flow.api(token).auth_test().await?))
}

/// Bind and serve until Ctrl-C.
pub async fn start_gateway(bind: &str, port: u16, state: GatewayState) -> anyhow::Result<()> {
    let listener = TcpListener::bind((bind, port)).await?;
    info!(addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
