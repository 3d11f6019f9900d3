/// Authentication module
///
/// Handles access token issuance/verification, refresh token rotation,
/// and password hashing.

mod claims;
mod jwt;
mod password;
mod refresh_token;

pub use claims::Claims;
pub use claims::RefreshClaims;
pub use jwt::TokenIssuer;
pub use password::hash_password;
pub use password::verify_password;
pub use refresh_token::RefreshManager;
