// Users module
// Signup, login, listing, profile, partial update and deletion of user accounts

pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod models;
pub mod repository;
pub mod service;

#[cfg(test)]
pub use memory::InMemoryUserRepository;
pub use models::{Article, User, UserChanges, UserCreate, UserResponse, UserUpdate, UserWithArticles};
pub use repository::{PgUserRepository, UserRepository};
pub use service::UserService;
