use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use uuid::Uuid;

use crate::{error::ApiError, models::User, repository::RepositoryState};

/// CredentialService
///
/// Creates accounts, verifies passwords, and resolves role sets. Passwords
/// are stored as salted Argon2id hashes only; the plaintext never leaves this
/// service.
#[derive(Clone)]
pub struct CredentialService {
    repo: RepositoryState,
}

impl CredentialService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// register
    ///
    /// Hashes the password and persists the account with its role
    /// assignments. The repository commits user and roles in one
    /// transaction, so a failed role assignment reports failure without
    /// leaving a partially-created account behind.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        roles: &[String],
    ) -> Result<(), ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ApiError::internal(format!("password hashing failed: {e}")))?
            .to_string();

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
        };

        self.repo
            .create_user_with_roles(user, roles)
            .await
            // Duplicate usernames and unknown roles surface identically: the
            // registration failed and nothing was stored.
            .map_err(|e| {
                tracing::warn!("registration for {username} failed: {e}");
                ApiError::BadRequest("Something went wrong".to_string())
            })
    }

    /// verify
    ///
    /// Resolves the account and checks the password against its stored hash.
    /// Returns None for an unknown username or a wrong password; the caller
    /// cannot distinguish the two.
    pub async fn verify(&self, username: &str, password: &str) -> Result<Option<User>, ApiError> {
        let Some(user) = self.repo.find_user_by_username(username).await? else {
            return Ok(None);
        };

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| ApiError::internal(format!("stored hash unreadable: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(Some(user)),
            Err(argon2::password_hash::Error::Password) => Ok(None),
            Err(e) => Err(ApiError::internal(format!(
                "password verification failed: {e}"
            ))),
        }
    }

    /// Resolves the set of role names assigned to the user.
    pub async fn roles_of(&self, user: &User) -> Result<Vec<String>, ApiError> {
        Ok(self.repo.roles_of(user.id).await?)
    }
}
