// Authentication module
// Password hashing, JWT access tokens, credential checks and the current-user extractor

pub mod error;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use middleware::CurrentUser;
pub use password::PasswordService;
pub use service::AuthService;
pub use token::TokenService;
