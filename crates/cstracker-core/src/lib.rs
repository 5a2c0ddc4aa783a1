//! Core library for cstracker.
//!
//! Provides everything the front ends need to talk to the community
//! service tracking backend:
//!
//! - `api`: REST client and error taxonomy
//! - `auth`: session persistence, the shared session context, keychain credentials
//! - `models`: typed request/response structures for every endpoint
//! - `review`: submission review and service accreditation workflows
//! - `config`: user configuration
//! - `utils`: display formatting helpers

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod review;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, ApiError};
pub use auth::{CredentialStore, Session, SessionContext, SessionData};
pub use config::Config;
