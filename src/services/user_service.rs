//! User service for account operations.

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User};
use crate::repositories::UserRepository;
use crate::utils::password;

/// Wraps `UserRepository` with account-level rules: passwords are hashed on
/// the way in and verified on login, never stored or compared in plain text.
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// Registers a new user, hashing the supplied password.
    pub async fn register(&self, mut new_user: NewUser) -> AppResult<User> {
        new_user.password = password::hash_password(&new_user.password)?;
        self.repo.create(new_user).await
    }

    /// Verifies credentials, returning the user on success.
    pub async fn authenticate(&self, email: &str, plain_password: &str) -> AppResult<User> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: "Invalid email or password".to_string(),
            })?;

        if !password::verify_password(plain_password, &user.password)? {
            return Err(AppError::Unauthorized {
                message: "Invalid email or password".to_string(),
            });
        }

        Ok(user)
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "user".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            })
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list_all().await
    }

    pub async fn update_user(&self, id: i32, mut update_data: UpdateUser) -> AppResult<User> {
        self.get_user(id).await?;
        if let Some(plain) = update_data.password.take() {
            update_data.password = Some(password::hash_password(&plain)?);
        }
        self.repo.update(id, update_data).await
    }

    pub async fn delete_user(&self, id: i32) -> AppResult<bool> {
        let affected = self.repo.delete(id).await?;
        Ok(affected > 0)
    }
}
