//! Account domain module.
//!
//! Form requests for sign-in, registration and password change, validated
//! locally before the identity provider is contacted.

mod request;

pub use request::{PasswordChange, SignInRequest, SignUpRequest};
