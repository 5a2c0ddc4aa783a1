//! Data models for the community service tracker backend.
//!
//! This module contains the typed shapes of every endpoint the front end
//! consumes:
//!
//! - `Program`: community service programs with slot counters
//! - `Submission`, `Application`, `Student`: applications awaiting review
//! - `ProgramLogs`, `ServiceLog`: service hours subject to accreditation
//! - Account types: login, signup, application form, progress summary

pub mod account;
mod de;
pub mod program;
pub mod service_log;
pub mod submission;

pub use account::{
    ApplicationRequest, LoginRequest, LoginResponse, ProgressSummary, Role, SignupRequest,
    SignupResponse,
};
pub use program::Program;
pub use service_log::{ProgramLogs, ProgramRef, ServiceLog};
pub use submission::{Application, Decision, ReviewStatus, Student, StudentUser, Submission};
