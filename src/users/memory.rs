//! In-memory user repository

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::db::StoreError;
use crate::users::models::{Article, NewUser, User, UserChanges};
use crate::users::repository::UserRepository;

const EMAIL_CONSTRAINT: &str = "usuarios_email_key";

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    articles: BTreeMap<i32, Article>,
    next_user_id: i32,
    next_article_id: i32,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-memory implementation of [`UserRepository`]
///
/// Mirrors the PostgreSQL schema: serial ids starting at 1, a unique email
/// and articles removed together with their author. Backs the service and
/// router tests; production code always runs on [`super::PgUserRepository`].
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    tables: RwLock<Tables>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an article to an existing author
    pub async fn add_article(
        &self,
        author_id: i32,
        titulo: &str,
        descricao: &str,
        url_fonte: &str,
    ) -> Result<Article, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&author_id) {
            return Err(StoreError::Database(format!(
                "foreign key violation: usuario {} does not exist",
                author_id
            )));
        }

        tables.next_article_id += 1;
        let article = Article {
            id: tables.next_article_id,
            titulo: titulo.to_string(),
            descricao: descricao.to_string(),
            url_fonte: url_fonte.to_string(),
            usuario_id: author_id,
        };
        tables.articles.insert(article.id, article.clone());

        Ok(article)
    }

    pub async fn count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.email_taken(&new_user.email, None) {
            return Err(StoreError::UniqueViolation(EMAIL_CONSTRAINT.to_string()));
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            nome: new_user.nome,
            sobrenome: new_user.sobrenome,
            email: new_user.email,
            senha: new_user.senha_hash,
            eh_admin: new_user.eh_admin,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_articles_by_author(&self, author_id: i32) -> Result<Vec<Article>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .articles
            .values()
            .filter(|a| a.usuario_id == author_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(existing) = tables.users.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(id)) {
                return Err(StoreError::UniqueViolation(EMAIL_CONSTRAINT.to_string()));
            }
        }

        let updated = changes.apply_to(existing);
        tables.users.insert(id, updated.clone());

        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.articles.retain(|_, a| a.usuario_id != id);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            nome: "Ana".to_string(),
            sobrenome: "Souza".to_string(),
            email: email.to_string(),
            senha_hash: "hash".to_string(),
            eh_admin: false,
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_from_one() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(new_user("a@x.com")).await.unwrap();
        let second = repo.create(new_user("b@x.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@x.com")).await.unwrap();

        let result = repo.create(new_user("a@x.com")).await;

        assert!(matches!(result, Err(StoreError::UniqueViolation(_))));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_email_lookup_is_exact() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@x.com")).await.unwrap();

        assert!(repo.find_by_email("a@x.com").await.unwrap().is_some());
        assert!(repo.find_by_email("A@X.COM").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_to_taken_email_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@x.com")).await.unwrap();
        let b = repo.create(new_user("b@x.com")).await.unwrap();

        let changes = UserChanges {
            email: Some("a@x.com".to_string()),
            ..Default::default()
        };
        let result = repo.update(b.id, changes).await;
        assert!(matches!(result, Err(StoreError::UniqueViolation(_))));

        // keeping your own email is not a conflict
        let changes = UserChanges {
            email: Some("b@x.com".to_string()),
            ..Default::default()
        };
        assert!(repo.update(b.id, changes).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_missing_user_returns_none() {
        let repo = InMemoryUserRepository::new();
        let result = repo.update(99, UserChanges::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_articles() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(new_user("a@x.com")).await.unwrap();
        let b = repo.create(new_user("b@x.com")).await.unwrap();
        repo.add_article(a.id, "T1", "D1", "https://x.com/1").await.unwrap();
        repo.add_article(b.id, "T2", "D2", "https://x.com/2").await.unwrap();

        assert!(repo.delete(a.id).await.unwrap());
        assert!(!repo.delete(a.id).await.unwrap());

        assert!(repo.find_articles_by_author(a.id).await.unwrap().is_empty());
        assert_eq!(repo.find_articles_by_author(b.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_article_requires_existing_author() {
        let repo = InMemoryUserRepository::new();
        let result = repo.add_article(5, "T", "D", "https://x.com").await;
        assert!(matches!(result, Err(StoreError::Database(_))));
    }
}
