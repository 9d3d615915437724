//! Bearer token introspection.

pub mod token;

pub use token::{subject_of, BearerToken, TokenError};
