//! REST API client module for the community service tracker backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! backend to fetch programs, submissions and service logs, and to
//! apply review decisions.
//!
//! The API uses Django token authentication: every authenticated
//! request carries an `Authorization: Token <token>` header.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
