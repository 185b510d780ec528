//! Request authentication.

use crate::{ClientError, Result};

/// Environment variable read by [`BearerToken::from_env`].
pub const TOKEN_ENV_VAR: &str = "EE_ACCESS_TOKEN";

/// Adds credentials to outgoing requests.
pub trait Auth: Send + Sync {
    /// Append authentication headers for a request.
    fn sign_request(&self, headers: &mut Vec<(String, String)>) -> Result<()>;
}

/// No credentials; for local endpoints and dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Auth for NoAuth {
    fn sign_request(&self, _headers: &mut Vec<(String, String)>) -> Result<()> {
        Ok(())
    }
}

/// OAuth2 access token sent as `Authorization: Bearer ...`.
///
/// Tokens are short-lived; obtain one with
/// `gcloud auth print-access-token` or from a service account.
#[derive(Clone)]
pub struct BearerToken {
    token: String,
    user_project: Option<String>,
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("token", &"<redacted>")
            .field("user_project", &self.user_project)
            .finish()
    }
}

impl BearerToken {
    /// Use an explicit access token.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(ClientError::Auth("access token is empty".into()));
        }
        Ok(Self {
            token,
            user_project: None,
        })
    }

    /// Read the access token from `EE_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV_VAR)
            .map_err(|_| ClientError::Auth(format!("{} not set", TOKEN_ENV_VAR)))?;
        Self::new(token)
    }

    /// Bill requests to `project` (`x-goog-user-project`).
    pub fn with_user_project(mut self, project: impl Into<String>) -> Self {
        self.user_project = Some(project.into());
        self
    }
}

impl Auth for BearerToken {
    fn sign_request(&self, headers: &mut Vec<(String, String)>) -> Result<()> {
        headers.push(("Authorization".into(), format!("Bearer {}", self.token)));
        if let Some(project) = &self.user_project {
            headers.push(("x-goog-user-project".into(), project.clone()));
        }
        Ok(())
    }
}
