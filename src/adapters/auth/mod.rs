//! Authentication adapters.
//!
//! - `jwt` - HS256 session tokens implementing `SessionIssuer` and `SessionValidator`

mod jwt;

pub use jwt::JwtSessionManager;
