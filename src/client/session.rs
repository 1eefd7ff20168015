use crate::client::AuthSession;

/// Session backed by a bearer token handed to the client at startup.
#[derive(Debug, Clone, Default)]
pub struct TokenSession {
    token: Option<String>,
}

impl TokenSession {
    pub fn new(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self { token }
    }
}

impl AuthSession for TokenSession {
    fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    fn current_token(&self) -> Option<String> {
        self.token.clone()
    }
}
