// Authentication service - credential checks, token issuance, token resolution

use std::sync::Arc;

use crate::auth::{error::AuthError, password::PasswordService, token::TokenService};
use crate::users::{
    models::{TokenResponse, User},
    repository::UserRepository,
};

/// Authentication service coordinating credential checks and tokens
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    token_service: TokenService,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, token_service: TokenService) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    /// Look up the user by exact email and check the password
    ///
    /// Returns `Ok(None)` both for an unknown email and for a wrong password.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            tracing::debug!("Authentication failed: unknown email");
            return Ok(None);
        };

        if !PasswordService::verify_password(password, &user.senha) {
            tracing::debug!("Authentication failed: wrong password for user {}", user.id);
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Authenticate and mint a bearer token
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = self
            .authenticate(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let access_token = self.token_service.issue(user.id)?;
        tracing::info!("User {} logged in", user.id);

        Ok(TokenResponse::bearer(access_token))
    }

    /// Resolve a bearer token to the user it was issued for
    pub async fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.token_service.validate(token)?;
        let user_id = claims.user_id()?;

        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UnknownSubject(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::memory::InMemoryUserRepository;
    use crate::users::models::NewUser;
    use chrono::Duration;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    async fn service_with_user(email: &str, password: &str) -> (AuthService, User) {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = repo
            .create(NewUser {
                nome: "Ana".to_string(),
                sobrenome: "Souza".to_string(),
                email: email.to_string(),
                senha_hash: PasswordService::hash_password(password).unwrap(),
                eh_admin: false,
            })
            .await
            .unwrap();

        let service = AuthService::new(repo, TokenService::new(SECRET, Duration::days(7)));
        (service, user)
    }

    #[tokio::test]
    async fn test_authenticate_with_correct_password() {
        let (service, user) = service_with_user("a@x.com", "pw1").await;

        let found = service.authenticate("a@x.com", "pw1").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let (service, _) = service_with_user("a@x.com", "pw1").await;

        let wrong_password = service.login("a@x.com", "nope").await.unwrap_err();
        let unknown_email = service.login("b@x.com", "pw1").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.error_message(), unknown_email.error_message());
    }

    #[tokio::test]
    async fn test_login_token_resolves_to_user() {
        let (service, user) = service_with_user("a@x.com", "pw1").await;

        let response = service.login("a@x.com", "pw1").await.unwrap();
        assert_eq!(response.token_type, "bearer");

        let current = service.current_user(&response.access_token).await.unwrap();
        assert_eq!(current.id, user.id);
        assert_eq!(current.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_is_rejected() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let service = AuthService::new(repo, TokenService::new(SECRET, Duration::days(7)));
        let token = TokenService::new(SECRET, Duration::days(7)).issue(99).unwrap();

        let err = service.current_user(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownSubject(99)));
    }
}
