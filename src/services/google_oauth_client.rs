use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use url::Url;

use crate::config::oauth::OAuthSettings;
use crate::models::auth::IdentityProfile;
use crate::services::source_error::SourceError;

const SERVICE_NAME: &str = "identity provider";
const SCOPES: &str = "openid email profile";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Authorization-code flow against Google's OAuth2 endpoints.
#[derive(Debug, Clone)]
pub struct GoogleOAuthClient {
    settings: OAuthSettings,
    client: Client,
}

impl GoogleOAuthClient {
    pub fn new(settings: OAuthSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    pub fn settings(&self) -> &OAuthSettings {
        &self.settings
    }

    pub fn authorization_url(&self, state: &str) -> Result<String, url::ParseError> {
        let mut url = Url::parse(&self.settings.auth_url)?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("redirect_uri", &self.settings.redirect_url)
            .append_pair("scope", SCOPES)
            .append_pair("state", state)
            .append_pair("prompt", "select_account");
        Ok(url.into())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SourceError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Identity provider returned error {}: {}", status, body);
            return Err(SourceError::Status { service: SERVICE_NAME, status, body });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, SourceError> {
        let response = self
            .client
            .post(&self.settings.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.expose_secret()),
                ("redirect_uri", self.settings.redirect_url.as_str()),
            ])
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn fetch_profile(&self, access_token: &str) -> Result<IdentityProfile, SourceError> {
        let response = self
            .client
            .get(&self.settings.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Exchange an authorization code for the signed-in user's profile.
    #[tracing::instrument(name = "Authenticate with identity provider", skip(self, code))]
    pub async fn authenticate(&self, code: &str) -> Result<IdentityProfile, SourceError> {
        let token = self.exchange_code(code).await?;
        let profile = self.fetch_profile(&token.access_token).await?;
        tracing::info!("Identity provider authenticated {}", profile.email);
        Ok(profile)
    }
}
