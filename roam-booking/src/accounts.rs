use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use roam_core::repository::UserRepository;
use roam_core::requests::{NewUser, UserUpdate};
use roam_core::User;
use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn hashed(password: &str) -> ServiceResult<String> {
    if password.is_empty() {
        return Err(ServiceError::Validation("Password must not be empty".to_string()));
    }
    hash_password(password).map_err(|e| ServiceError::Validation(format!("Unusable password: {e}")))
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn register(&self, new_user: NewUser) -> ServiceResult<User> {
        if new_user.email.trim().is_empty() {
            return Err(ServiceError::Validation("Email is required".to_string()));
        }
        if self.users.email_exists(&new_user.email).await? {
            return Err(ServiceError::Duplicate(format!(
                "User with email {} already exists",
                new_user.email
            )));
        }

        let password_hash = hashed(&new_user.password)?;
        let user = User {
            guid: new_user.guid,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            phone: new_user.phone,
        };
        self.users.add(&user, &password_hash).await?;

        info!(user_id = %user.guid, "User registered");
        Ok(user)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let Some(credentials) = self.users.find_credentials(email).await? else {
            warn!("Login attempt for unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if !verify_password(password, &credentials.password_hash) {
            warn!(user_id = %credentials.user.guid, "Login attempt with wrong password");
            return Err(ServiceError::InvalidCredentials);
        }
        Ok(credentials.user)
    }

    /// Applies a partial update to the account at `guid`.
    pub async fn update(&self, guid: &str, changes: UserUpdate) -> ServiceResult<User> {
        if changes.guid != guid {
            return Err(ServiceError::Validation(
                "User guid in body does not match the path".to_string(),
            ));
        }

        let mut user = self
            .users
            .get_by_guid(guid)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {guid}")))?;

        if let Some(email) = changes.email {
            if email != user.email && self.users.email_exists(&email).await? {
                return Err(ServiceError::Duplicate(format!("User with email {email} already exists")));
            }
            user.email = email;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if changes.phone.is_some() {
            user.phone = changes.phone;
        }

        let password_hash = changes.password.as_deref().map(hashed).transpose()?;
        if !self.users.update(&user, password_hash.as_deref()).await? {
            return Err(ServiceError::NotFound(format!("User {guid}")));
        }

        info!(user_id = guid, "User updated");
        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> ServiceResult<bool> {
        Ok(self.users.email_exists(email).await?)
    }
}
