pub mod api;
pub mod authorize;
pub mod error;
pub mod exchange;
pub mod flow;
pub mod storage;
pub mod types;

pub use api::{AuthIdentity, SlackApi};
pub use authorize::authorize_url;
pub use error::{Error, Result};
pub use exchange::{SlackExchangeClient, TokenExchange};
pub use flow::{AuthState, OAuthFlow};
pub use storage::{CredentialStore, MemoryCredentialStore};
pub use types::{AccessToken, ExchangeMode, OAuthConfig, TokenResponse};
