//! Middleware for the Planvest API
//!
//! Request tracing, rate limiting, security headers and the bearer-token
//! extractor.

pub mod auth;
mod rate_limiter;
mod security;
mod tracing;

pub use auth::AuthenticatedUser;
pub use rate_limiter::{rate_limit, RateLimiter};
pub use security::{hsts_header, security_headers};
pub use self::tracing::request_tracing;
