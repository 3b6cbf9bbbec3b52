//! # Auth Module
//!
//! Mock credential check for the demo login endpoint. Routes are not
//! protected by it.

pub mod errors;
pub mod mock;

pub use errors::{AuthError, AuthResult};
pub use mock::{LoginRequest, LoginResponse, LoginUser, MockAuthConfig, MockAuthenticator};
