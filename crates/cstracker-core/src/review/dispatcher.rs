use anyhow::Result;
use tracing::info;

use crate::api::ApiClient;
use crate::auth::SessionContext;
use crate::models::Decision;

use super::{group_submissions, GroupedProgram};

/// Result of a successful decision: the server-authoritative tree,
/// re-fetched after the decision was applied.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub submission_id: i64,
    pub decision: Decision,
    pub programs: Vec<GroupedProgram>,
}

/// "Juan's application for Beach Cleanup has been approved."
pub fn decision_message(student: &str, program: &str, decision: Decision) -> String {
    format!(
        "{}'s application for {} has been {}.",
        student,
        program,
        decision.as_status()
    )
}

/// Loads submissions and applies admin decisions to them.
#[derive(Clone)]
pub struct DecisionDispatcher {
    api: ApiClient,
    session: SessionContext,
}

impl DecisionDispatcher {
    pub fn new(api: ApiClient, session: SessionContext) -> Self {
        Self { api, session }
    }

    /// Client bound to the current token; fails before any request when
    /// signed out.
    fn authorized(&self) -> Result<ApiClient> {
        let token = self.session.require_token()?;
        Ok(self.api.with_token(token))
    }

    /// Fetch every submission and group it by program.
    pub async fn fetch(&self) -> Result<Vec<GroupedProgram>> {
        let api = self.authorized()?;
        let submissions = api.fetch_submissions().await?;
        Ok(group_submissions(submissions))
    }

    /// Apply `decision` to a submission, then reload the whole list.
    ///
    /// The token is read once and used for both requests. Nothing is
    /// returned on failure, so callers keep whatever they displayed before.
    pub async fn decide(&self, submission_id: i64, decision: Decision) -> Result<DecisionOutcome> {
        let api = self.authorized()?;
        api.decide_submission(submission_id, decision).await?;
        info!(submission_id, %decision, "Submission decided");

        let programs = group_submissions(api.fetch_submissions().await?);
        Ok(DecisionOutcome {
            submission_id,
            decision,
            programs,
        })
    }
}
