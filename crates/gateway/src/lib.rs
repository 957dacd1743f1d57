pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod origin;
pub mod server;
pub mod session;
pub mod state;

pub use {
    config::GatewayConfig,
    error::GatewayError,
    gate::{Authorized, require_authorization},
    server::{build_router, start_gateway},
    session::CookieCredentialStore,
    state::GatewayState,
};
