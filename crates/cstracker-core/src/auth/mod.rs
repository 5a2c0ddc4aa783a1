//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `Session`: token persistence in a fixed file under the data directory
//! - `SessionContext`: the shared, injectable view of the current session
//! - `CredentialStore`: optional OS-level password storage via keyring
//!
//! Backend tokens do not expire on their own; a session lasts until logout
//! or until the server answers 401.

pub mod context;
pub mod credentials;
pub mod session;

pub use context::SessionContext;
pub use credentials::CredentialStore;
pub use session::{Session, SessionData};
