// Public API - what other modules can use
pub use middleware::jwt_auth;
pub use token::TokenService;
pub use types::{AuthUser, SessionClaims};

// Internal modules
mod middleware;
mod token;
mod types;
