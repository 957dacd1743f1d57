use crate::types::AccessToken;

/// Holds the one credential that makes up a session's authorization state.
///
/// Reads never fail: absent or unreadable state is `None`.
pub trait CredentialStore {
    /// Replace the stored credential. `None` marks the session logged out.
    fn set(&mut self, token: Option<AccessToken>);

    fn get(&self) -> Option<AccessToken>;

    fn clear(&mut self) {
        self.set(None);
    }

    fn is_authorized(&self) -> bool {
        self.get().is_some_and(|t| !t.as_str().is_empty())
    }
}

/// Process-local store for non-HTTP callers and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryCredentialStore {
    token: Option<AccessToken>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn set(&mut self, token: Option<AccessToken>) {
        self.token = token;
    }

    fn get(&self) -> Option<AccessToken> {
        self.token.clone()
    }
}
