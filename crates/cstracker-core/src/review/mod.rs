//! Submission review and service accreditation workflows.
//!
//! Both screens share one shape: fetch a flat or grouped list, arrange it as
//! programs with their members, let the admin expand one program and one
//! member at a time, and send a decision that is followed by a full re-fetch.
//!
//! - `grouping`: flat submissions → programs, order preserving
//! - `expansion`: which program / member row is open
//! - `board`: per-screen state (grouped data, expansion, load status)
//! - `dispatcher`: approve/reject submissions
//! - `accreditation`: approve service logs
//! - `scope`: ties background requests to a screen's lifetime

pub mod accreditation;
pub mod board;
pub mod dispatcher;
pub mod expansion;
pub mod grouping;
pub mod scope;

pub use accreditation::AccreditationDispatcher;
pub use board::{Board, ProgramGroup, Row};
pub use dispatcher::{decision_message, DecisionDispatcher, DecisionOutcome};
pub use expansion::ExpansionState;
pub use grouping::{flatten, group_by_program, group_submissions, GroupedProgram};
pub use scope::{ScreenScope, Scoped};
