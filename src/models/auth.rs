// src/models/auth.rs
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Query string Google appends to the redirect URL.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Profile returned by the identity provider. Only `email` is trusted as identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Hosted domain of a Google Workspace account.
    #[serde(default)]
    pub hd: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

impl IdentityProfile {
    /// Domain used for the allowlist check: the hosted domain if present, else the email's.
    pub fn domain(&self) -> &str {
        match self.hd.as_deref() {
            Some(hd) if !hd.is_empty() => hd,
            _ => self.email.rsplit('@').next().unwrap_or_default(),
        }
    }

    /// A missing flag counts as unverified.
    pub fn is_verified(&self) -> bool {
        self.email_verified == Some(true)
    }

    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}
