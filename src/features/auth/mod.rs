//! Consumed identity: token validation for the discovery endpoints.
//!
//! Registration, login and phone/social flows are owned by the separate
//! identity service; here we only validate its tokens and expose the
//! resulting viewer identity to handlers.

mod validator;

pub mod model;

pub use validator::JwtValidator;
