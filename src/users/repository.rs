// Database repository for users and their articles

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::StoreError;
use crate::users::models::{Article, NewUser, User, UserChanges};

/// Persistence operations the services rely on
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; a taken email yields [`StoreError::UniqueViolation`]
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// All users ordered by id
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;

    /// Exact (case-sensitive) email match
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Articles authored by the given user, ordered by id
    async fn find_articles_by_author(&self, author_id: i32) -> Result<Vec<Article>, StoreError>;

    /// Apply the changes; `Ok(None)` when no user has that id
    async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>, StoreError>;

    /// Remove the user and their articles; `Ok(false)` when no user has that id
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}

/// PostgreSQL implementation of [`UserRepository`]
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO usuarios (nome, sobrenome, email, senha, eh_admin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, nome, sobrenome, email, senha, eh_admin
            "#,
        )
        .bind(&new_user.nome)
        .bind(&new_user.sobrenome)
        .bind(&new_user.email)
        .bind(&new_user.senha_hash)
        .bind(new_user.eh_admin)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, nome, sobrenome, email, senha, eh_admin FROM usuarios ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, nome, sobrenome, email, senha, eh_admin FROM usuarios WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, nome, sobrenome, email, senha, eh_admin FROM usuarios WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_articles_by_author(&self, author_id: i32) -> Result<Vec<Article>, StoreError> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, titulo, descricao, url_fonte, usuario_id
            FROM artigos
            WHERE usuario_id = $1
            ORDER BY id
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(articles)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>, StoreError> {
        // Rolled back on drop if any step below returns early
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, User>(
            r#"
            SELECT id, nome, sobrenome, email, senha, eh_admin
            FROM usuarios
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let merged = changes.apply_to(existing);

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE usuarios
            SET nome = $1,
                sobrenome = $2,
                email = $3,
                senha = $4,
                eh_admin = $5
            WHERE id = $6
            RETURNING id, nome, sobrenome, email, senha, eh_admin
            "#,
        )
        .bind(&merged.nome)
        .bind(&merged.sobrenome)
        .bind(&merged.email)
        .bind(&merged.senha)
        .bind(merged.eh_admin)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
