/// Authentication module
///
/// Token issuing and verification, password hashing, and the session
/// manager that ties them to the user store.

mod claims;
mod jwt;
mod password;
mod session;

pub use claims::{AccessClaims, RefreshClaims, SubjectClaims};
pub use jwt::{verify, TokenIssuer, TokenPair};
pub use password::{hash_password, hash_password_blocking, verify_password, verify_password_blocking};
pub use session::{require_admin, LoginOutcome, RegisterUser, SessionManager};
