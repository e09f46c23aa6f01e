//! Signup and signin.

use std::sync::Arc;

use tracing::info;

use crate::domain::error::Error;
use crate::domain::password;
use crate::domain::ports::{UserRepository, UserStoreError};
use crate::domain::user::{NewUser, User};

const MIN_PASSWORD_LEN: usize = 8;

/// Account creation and credential verification.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new account.
    ///
    /// # Errors
    /// `invalid_request` for a malformed email, a short password, or a
    /// duplicate email.
    pub async fn signup(&self, email: &str, password: &str) -> Result<User, Error> {
        let email = normalize_email(email)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::invalid_request(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ))
            .with_details(serde_json::json!({ "field": "password" })));
        }
        let password_hash = password::hash(password)?;
        let user = self
            .users
            .insert(NewUser {
                email,
                password_hash,
            })
            .await?;
        info!(user_id = %user.id, "account created");
        Ok(user)
    }

    /// Verify credentials.
    ///
    /// # Errors
    /// `unauthorized` with a deliberately generic message for an unknown
    /// email or a wrong password; the two cases are indistinguishable to the
    /// caller.
    pub async fn signin(&self, email: &str, password: &str) -> Result<User, Error> {
        let email = normalize_email(email)?;
        let user = match self.users.find_by_email(&email).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(invalid_credentials()),
            Err(UserStoreError::Store(store)) => return Err(store.into()),
            Err(other) => return Err(other.into()),
        };
        if password::verify(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(invalid_credentials())
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("Invalid credentials")
}

fn normalize_email(email: &str) -> Result<String, Error> {
    let email = email.trim().to_ascii_lowercase();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, host)| !local.is_empty() && host.contains('.'));
    if well_formed {
        Ok(email)
    } else {
        Err(Error::invalid_request("malformed email address")
            .with_details(serde_json::json!({ "field": "email" })))
    }
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::test_support::InMemoryUserRepository;
    use rstest::{fixture, rstest};

    #[fixture]
    fn service() -> AuthService {
        AuthService::new(Arc::new(InMemoryUserRepository::default()))
    }

    #[rstest]
    #[tokio::test]
    async fn signup_then_signin_succeeds(service: AuthService) {
        let created = service
            .signup("Traveler@Example.com", "wanderlust1")
            .await
            .expect("signup succeeds");
        assert_eq!(created.email, "traveler@example.com");

        let signed_in = service
            .signin("traveler@example.com", "wanderlust1")
            .await
            .expect("signin succeeds");
        assert_eq!(signed_in.id, created.id);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_rejected(service: AuthService) {
        service
            .signup("traveler@example.com", "wanderlust1")
            .await
            .expect("first signup succeeds");
        let error = service
            .signup("traveler@example.com", "another-pass")
            .await
            .expect_err("duplicate rejected");
        assert_eq!(error.code, ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case("traveler@example.com", "short")]
    #[case("not-an-email", "long enough password")]
    #[case("@example.com", "long enough password")]
    #[case("traveler@nodot", "long enough password")]
    #[tokio::test]
    async fn malformed_signup_input_is_rejected(
        service: AuthService,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        let error = service.signup(email, password).await.expect_err("rejected");
        assert_eq!(error.code, ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable(service: AuthService) {
        service
            .signup("traveler@example.com", "wanderlust1")
            .await
            .expect("signup succeeds");
        let wrong_password = service
            .signin("traveler@example.com", "not-the-password")
            .await
            .expect_err("rejected");
        let unknown_email = service
            .signin("stranger@example.com", "wanderlust1")
            .await
            .expect_err("rejected");
        assert_eq!(wrong_password.code, ErrorCode::Unauthorized);
        assert_eq!(wrong_password.message, unknown_email.message);
    }
}
