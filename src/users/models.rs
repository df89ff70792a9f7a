// User data models and DTOs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// User database model
///
/// `senha` holds the Argon2 hash, never the plaintext password. The struct is
/// deliberately not `Serialize`; responses go through [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub nome: String,
    pub sobrenome: String,
    pub email: String,
    pub senha: String,
    pub eh_admin: bool,
}

/// Article database model, the content a user has authored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Article {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Introdução ao Rust")]
    pub titulo: String,
    #[schema(example = "Ownership e borrowing na prática")]
    pub descricao: String,
    #[schema(example = "https://example.com/rust")]
    pub url_fonte: String,
    #[schema(example = 1)]
    pub usuario_id: i32,
}

/// User response model (excludes the password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ana")]
    pub nome: String,
    #[schema(example = "Souza")]
    pub sobrenome: String,
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[schema(example = false)]
    pub eh_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nome: user.nome,
            sobrenome: user.sobrenome,
            email: user.email,
            eh_admin: user.eh_admin,
        }
    }
}

/// Full profile returned by GET /{id}: the user plus their articles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserWithArticles {
    #[serde(flatten)]
    pub user: UserResponse,
    pub artigos: Vec<Article>,
}

/// Signup request DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserCreate {
    #[schema(example = "Ana")]
    pub nome: String,
    #[schema(example = "Souza")]
    pub sobrenome: String,
    #[validate(email(message = "Email inválido"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[schema(example = "s3nh4-f0rte")]
    pub senha: String,
    #[serde(default)]
    #[schema(example = false)]
    pub eh_admin: bool,
}

/// Partial update request DTO
///
/// Every field is optional; only the supplied ones are considered. Whether a
/// supplied field is actually applied depends on who is asking, see
/// [`crate::users::service::authorize_update`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserUpdate {
    pub nome: Option<String>,
    pub sobrenome: Option<String>,
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,
    pub senha: Option<String>,
    pub eh_admin: Option<bool>,
}

/// New user as handed to the repository, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nome: String,
    pub sobrenome: String,
    pub email: String,
    pub senha_hash: String,
    pub eh_admin: bool,
}

/// Authorized set of column changes handed to the repository
///
/// Produced only after the caller's permissions have been checked; a `None`
/// field keeps its stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub nome: Option<String>,
    pub sobrenome: Option<String>,
    pub email: Option<String>,
    pub senha_hash: Option<String>,
    pub eh_admin: Option<bool>,
}

impl UserChanges {
    /// Apply the changes on top of an existing record
    pub fn apply_to(self, mut user: User) -> User {
        if let Some(nome) = self.nome {
            user.nome = nome;
        }
        if let Some(sobrenome) = self.sobrenome {
            user.sobrenome = sobrenome;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(senha_hash) = self.senha_hash {
            user.senha = senha_hash;
        }
        if let Some(eh_admin) = self.eh_admin {
            user.eh_admin = eh_admin;
        }
        user
    }
}

/// Login form, in the OAuth2 password-flow shape (`username` carries the email)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginForm {
    #[schema(example = "ana@example.com")]
    pub username: String,
    #[schema(example = "s3nh4-f0rte")]
    pub password: String,
}

/// Token response returned by POST /login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
