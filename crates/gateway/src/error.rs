use {
    axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    slackgate_oauth::Error as OAuthError,
    tracing::{error, warn},
};

/// Failure of a single auth request. Never outlives the request.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    OAuth(#[from] OAuthError),

    #[error("request carries no Host header")]
    MissingHost,

    #[error("invalid request origin '{0}'")]
    BadOrigin(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::OAuth(OAuthError::AuthorizationFailed(_) | OAuthError::MissingToken) => {
                StatusCode::UNAUTHORIZED
            },
            Self::OAuth(OAuthError::ExchangeTransport(_) | OAuthError::Api(_)) => {
                StatusCode::BAD_GATEWAY
            },
            Self::OAuth(OAuthError::MalformedBaseUrl { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingHost | Self::BadOrigin(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, %status, "auth request failed");
        } else {
            warn!(error = %self, %status, "auth request rejected");
        }
        let reason = status.canonical_reason().unwrap_or("error");
        (status, reason).into_response()
    }
}
