/// Middleware module
///
/// Authentication guard and per-request logging.

mod auth_middleware;
mod request_logger;

pub use auth_middleware::{AuthMiddleware, ACCESS_TOKEN_COOKIE};
pub use request_logger::RequestLogger;
