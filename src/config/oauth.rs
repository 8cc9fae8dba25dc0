use serde::Deserialize;
use secrecy::SecretString;

/// Google OAuth2 client registration plus the login access policy.
#[derive(Deserialize, Debug, Clone)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    /// Comma separated list of domains, or `*` for any domain.
    pub allowed_domains: String,
    #[serde(default)]
    pub admin_emails: Vec<String>,
}
