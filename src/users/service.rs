use std::sync::Arc;
use validator::Validate;

use crate::auth::PasswordService;
use crate::error::{ApiError, DELETE_FORBIDDEN, PASSWORD_FORBIDDEN};
use crate::users::{
    models::{NewUser, User, UserChanges, UserCreate, UserUpdate, UserWithArticles},
    repository::UserRepository,
};

/// Service layer for user business logic
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Register a new user
    ///
    /// The password is hashed before it reaches the store; a taken email
    /// surfaces as [`ApiError::DuplicateEmail`].
    pub async fn signup(&self, request: UserCreate) -> Result<User, ApiError> {
        request.validate()?;

        let new_user = NewUser {
            senha_hash: PasswordService::hash_password(&request.senha)?,
            nome: request.nome,
            sobrenome: request.sobrenome,
            email: request.email,
            eh_admin: request.eh_admin,
        };

        let user = self.repository.create(new_user).await?;
        tracing::info!("Created user with id: {}", user.id);

        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        let users = self.repository.list().await?;
        tracing::debug!("Retrieved {} users", users.len());
        Ok(users)
    }

    /// Full profile: the user and the articles they authored
    pub async fn get(&self, id: i32) -> Result<UserWithArticles, ApiError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound)?;

        let artigos = self.repository.find_articles_by_author(user.id).await?;

        Ok(UserWithArticles {
            user: user.into(),
            artigos,
        })
    }

    /// Partially update a user on behalf of `caller`
    ///
    /// This method:
    /// 1. Validates the patch
    /// 2. Hides every other user from non-admin callers (NotFound)
    /// 3. Fetches the target
    /// 4. Turns the patch into authorized changes
    /// 5. Persists them
    pub async fn update(&self, caller: &User, target_id: i32, patch: UserUpdate) -> Result<User, ApiError> {
        patch.validate()?;

        if !can_see_for_update(caller, target_id) {
            tracing::debug!(
                "User {} is not allowed to see user {} for update",
                caller.id,
                target_id
            );
            return Err(ApiError::NotFound);
        }

        if self.repository.find_by_id(target_id).await?.is_none() {
            return Err(ApiError::NotFound);
        }

        let changes = field_changes(caller, target_id, patch)?;

        let updated = self
            .repository
            .update(target_id, changes)
            .await?
            .ok_or(ApiError::NotFound)?;

        tracing::info!("User {} updated user {}", caller.id, target_id);
        Ok(updated)
    }

    /// Delete a user; administrators only
    ///
    /// The permission check comes first, so a non-admin never learns whether
    /// the id exists.
    pub async fn delete(&self, caller: &User, target_id: i32) -> Result<(), ApiError> {
        if !caller.eh_admin {
            return Err(ApiError::Forbidden(DELETE_FORBIDDEN));
        }

        if !self.repository.delete(target_id).await? {
            return Err(ApiError::NotFound);
        }

        tracing::info!("Admin {} deleted user {}", caller.id, target_id);
        Ok(())
    }
}

/// Admins may target anyone, everyone else only themself
fn can_see_for_update(caller: &User, target_id: i32) -> bool {
    caller.eh_admin || caller.id == target_id
}

/// Turn a patch into the changes `caller` is allowed to make on `target_id`
///
/// - `nome`, `sobrenome`, `email` pass through
/// - `eh_admin` is kept only for admin callers and dropped silently otherwise
/// - `senha` is accepted only for the caller's own record and is hashed;
///   for anyone else's record the whole update is Forbidden
///
/// [`UserService::update`] runs the visibility check itself before looking
/// the target up, then applies the per-field rules through the same helper.
pub fn authorize_update(caller: &User, target_id: i32, patch: UserUpdate) -> Result<UserChanges, ApiError> {
    if !can_see_for_update(caller, target_id) {
        return Err(ApiError::NotFound);
    }

    field_changes(caller, target_id, patch)
}

/// Per-field rules; assumes `caller` may already see `target_id`
fn field_changes(caller: &User, target_id: i32, patch: UserUpdate) -> Result<UserChanges, ApiError> {
    let senha_hash = match patch.senha {
        Some(_) if caller.id != target_id => {
            return Err(ApiError::Forbidden(PASSWORD_FORBIDDEN));
        }
        Some(senha) => Some(PasswordService::hash_password(&senha)?),
        None => None,
    };

    let eh_admin = if caller.eh_admin {
        patch.eh_admin
    } else {
        if patch.eh_admin.is_some() {
            tracing::debug!("Ignoring eh_admin from non-admin user {}", caller.id);
        }
        None
    };

    Ok(UserChanges {
        nome: patch.nome,
        sobrenome: patch.sobrenome,
        email: patch.email,
        senha_hash,
        eh_admin,
    })
}
