use std::fmt::{Debug, Formatter, Result as FmtResult};

/// Credentials of the signed-in user, passed to the client explicitly
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// A session without credentials
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session carrying a bearer token; blank tokens are ignored
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then(|| token.trim().to_string()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // Only show whether a token is present
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
