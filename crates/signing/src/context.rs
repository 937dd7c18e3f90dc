use std::fmt;

use subtle::ConstantTimeEq;

use crate::error::ConfigurationError;

/// Identity a client signs with: token, account and workspace.
///
/// Construction fails on any empty or whitespace-only field, so a live
/// `AuthContext` is always usable for key derivation.
#[derive(Clone)]
pub struct AuthContext {
    auth_token: String,
    account_id: String,
    workspace_id: String,
}

impl AuthContext {
    pub fn new(
        auth_token: impl Into<String>,
        account_id: impl Into<String>,
        workspace_id: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let context = Self {
            auth_token: auth_token.into(),
            account_id: account_id.into(),
            workspace_id: workspace_id.into(),
        };
        require_identity("auth_token", &context.auth_token)?;
        require_identity("account_id", &context.account_id)?;
        require_identity("workspace_id", &context.workspace_id)?;
        Ok(context)
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    /// Field-by-field equality that does not short-circuit.
    pub fn matches(&self, other: &AuthContext) -> bool {
        let same = self.auth_token.as_bytes().ct_eq(other.auth_token.as_bytes())
            & self.account_id.as_bytes().ct_eq(other.account_id.as_bytes())
            & self.workspace_id.as_bytes().ct_eq(other.workspace_id.as_bytes());
        same.into()
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("auth_token", &mask_token(&self.auth_token))
            .field("account_id", &self.account_id)
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}

fn require_identity(field: &'static str, value: &str) -> Result<(), ConfigurationError> {
    if value.trim().is_empty() {
        return Err(ConfigurationError::MissingField(field));
    }
    Ok(())
}

/// Shows the first 8 characters of a token followed by `...`.
///
/// Tokens of 8 characters or fewer are hidden entirely as `***`. The other
/// SDKs print `token[..8] + "..."` unconditionally, which would reveal a
/// short token in full.
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 8 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...")
}
