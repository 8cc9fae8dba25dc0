use sqlx::PgPool;

use crate::db::users;
use crate::models::auth::IdentityProfile;
use crate::models::user::User;
use crate::services::source_error::SourceError;
use crate::services::team_service::TeamService;
use crate::utils::access_policy::AccessPolicy;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Login state did not match, please try again")]
    InvalidState,

    #[error("Login was not completed: {0}")]
    Denied(String),

    #[error("Email address `{0}` is not verified with the identity provider")]
    EmailNotVerified(String),

    #[error("Please use a valid email address! `{0}` is not an allowed domain")]
    DomainNotAllowed(String),

    #[error(transparent)]
    Provider(#[from] SourceError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Failed to issue token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid authorization URL: {0}")]
    AuthorizationUrl(#[from] url::ParseError),
}

#[derive(Debug)]
pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Turn an identity-provider profile into a local user.
    ///
    /// First sign-in creates the user and allocates a team in one transaction.
    /// Later sign-ins refresh the name and role.
    #[tracing::instrument(name = "Sign in user", skip(self, profile, policy), fields(email = %profile.email))]
    pub async fn sign_in(&self, profile: &IdentityProfile, policy: &AccessPolicy) -> Result<User, AuthError> {
        if !profile.is_verified() {
            tracing::warn!("Rejected sign-in with unverified email {}", profile.email);
            return Err(AuthError::EmailNotVerified(profile.email.clone()));
        }

        let domain = profile.domain().to_string();
        if !policy.allowlist.allows(&domain) {
            tracing::warn!("Rejected sign-in from disallowed domain {}", domain);
            return Err(AuthError::DomainNotAllowed(domain));
        }

        let role = policy.role_for(&profile.email);
        let name = profile.display_name();

        let mut tx = self.pool.begin().await?;
        let user = match users::get_user_by_email(&mut *tx, &profile.email).await? {
            Some(existing) => users::update_user_profile(&mut *tx, existing.id, name, role).await?,
            None => {
                let created = users::insert_user(&mut *tx, &profile.email.to_lowercase(), name, role, None).await?;
                TeamService::allocate_team(&mut tx, created.id).await?;
                tracing::info!("Registered new user {}", created.id);
                users::get_user_by_id(&mut *tx, created.id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?
            }
        };
        tx.commit().await?;

        Ok(user)
    }
}
