//! Authentication module
//!
//! Provides JWT-based sessions with argon2 password hashing. Access and
//! refresh tokens are signed with distinct secrets; the refresh token is
//! additionally persisted on the user record so it can be revoked.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::{CurrentUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use password::PasswordService;
