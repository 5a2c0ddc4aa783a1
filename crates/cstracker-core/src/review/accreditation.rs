use anyhow::Result;
use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::auth::SessionContext;
use crate::config::AccreditationSource;
use crate::models::{ProgramLogs, ServiceLog};

use super::group_by_program;

/// Loads service logs and approves them.
///
/// `AccreditationSource::Logs` reads the grouped `/logs/` listing and marks a
/// log completed; `AccreditationSource::Accreditation` reads the flat
/// `/accreditation/` listing, groups it here and uses the approve endpoint.
/// Either way a successful approval is followed by a full reload.
#[derive(Clone)]
pub struct AccreditationDispatcher {
    api: ApiClient,
    session: SessionContext,
    source: AccreditationSource,
}

impl AccreditationDispatcher {
    pub fn new(api: ApiClient, session: SessionContext, source: AccreditationSource) -> Self {
        Self {
            api,
            session,
            source,
        }
    }

    pub fn source(&self) -> AccreditationSource {
        self.source
    }

    fn authorized(&self) -> Result<ApiClient> {
        let token = self.session.require_token()?;
        Ok(self.api.with_token(token))
    }

    pub async fn fetch(&self) -> Result<Vec<ProgramLogs>> {
        let api = self.authorized()?;
        Self::load(&api, self.source).await
    }

    async fn load(api: &ApiClient, source: AccreditationSource) -> Result<Vec<ProgramLogs>> {
        match source {
            AccreditationSource::Logs => api.fetch_program_logs().await,
            AccreditationSource::Accreditation => {
                let logs = api.fetch_accreditation_logs().await?;
                Ok(group_by_program(logs, ServiceLog::program)
                    .into_iter()
                    .map(|(program, applicants)| ProgramLogs {
                        id: program.id,
                        name: program.name,
                        applicants,
                    })
                    .collect())
            }
        }
    }

    /// Approve `log` and reload. A log that is already approved is refused
    /// without contacting the server.
    pub async fn approve(&self, log: &ServiceLog) -> Result<Vec<ProgramLogs>> {
        if log.is_approved() {
            return Err(ApiError::AlreadyApproved(log.id).into());
        }
        let api = self.authorized()?;
        match self.source {
            AccreditationSource::Logs => api.complete_log(log.id).await?,
            AccreditationSource::Accreditation => api.approve_accreditation(log.id).await?,
        }
        info!(log_id = log.id, "Service log approved");

        Self::load(&api, self.source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::test_support::{signed_in, MockServer};

    const GROUPED: &str = r#"[
        {"id": 4, "name": "Tree Planting", "applicants": [
            {"id": 40, "program": "Tree Planting", "hours": "6", "status": "pending",
             "student": {"user": {"full_name": "Ana Reyes"}}},
            {"id": 41, "program": "Tree Planting", "hours": 4, "status": "completed"}
        ]}
    ]"#;

    const FLAT: &str = r#"[
        {"id": 50, "program": {"id": 8, "name": "Feeding Program"}, "approved": false},
        {"id": 51, "program": {"id": 9, "name": "Blood Drive"}, "approved": false},
        {"id": 52, "program": {"id": 8, "name": "Feeding Program"}, "approved": true},
        {"id": 53, "approved": false}
    ]"#;

    fn pending_log(id: i64) -> ServiceLog {
        serde_json::from_value(serde_json::json!({"id": id, "status": "pending"})).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_grouped_logs() {
        let server = MockServer::start().await;
        server.respond("GET", "/logs/", 200, GROUPED);

        let dispatcher = AccreditationDispatcher::new(
            server.client(),
            signed_in(Role::Admin),
            AccreditationSource::Logs,
        );
        let programs = dispatcher.fetch().await.unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].applicants[0].hours, Some(6.0));
        assert_eq!(programs[0].applicants[0].label(), "Ana Reyes (Pending)");
    }

    #[tokio::test]
    async fn test_fetch_flat_logs_groups_by_program() {
        let server = MockServer::start().await;
        server.respond("GET", "/accreditation/", 200, FLAT);

        let dispatcher = AccreditationDispatcher::new(
            server.client(),
            signed_in(Role::Admin),
            AccreditationSource::Accreditation,
        );
        let programs = dispatcher.fetch().await.unwrap();
        let shape: Vec<(i64, Vec<i64>)> = programs
            .iter()
            .map(|p| (p.id, p.applicants.iter().map(|l| l.id).collect()))
            .collect();
        assert_eq!(shape, vec![(8, vec![50, 52]), (9, vec![51])]);
        assert_eq!(programs[0].name, "Feeding Program");
    }

    #[tokio::test]
    async fn test_approve_logs_mode_patches_then_reloads() {
        let server = MockServer::start().await;
        server.respond("PATCH", "/logs/40/", 200, r#"{"id": 40, "status": "completed"}"#);
        server.respond("GET", "/logs/", 200, GROUPED);

        let dispatcher = AccreditationDispatcher::new(
            server.client(),
            signed_in(Role::Admin),
            AccreditationSource::Logs,
        );
        let programs = dispatcher.approve(&pending_log(40)).await.unwrap();
        assert_eq!(programs[0].id, 4);

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, "/api/logs/40/");
        assert_eq!(requests[0].json(), serde_json::json!({"status": "completed"}));
        assert_eq!(requests[1].path, "/api/logs/");
    }

    #[tokio::test]
    async fn test_approve_accreditation_mode() {
        let server = MockServer::start().await;
        server.respond("POST", "/accreditation/50/approve/", 200, "{}");
        server.respond("GET", "/accreditation/", 200, FLAT);

        let dispatcher = AccreditationDispatcher::new(
            server.client(),
            signed_in(Role::Admin),
            AccreditationSource::Accreditation,
        );
        dispatcher.approve(&pending_log(50)).await.unwrap();

        let requests = server.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/api/accreditation/50/approve/");
        assert!(requests[0].body.is_empty());
        assert_eq!(requests[1].path, "/api/accreditation/");
    }

    #[tokio::test]
    async fn test_already_approved_makes_no_request() {
        let server = MockServer::start().await;
        let dispatcher = AccreditationDispatcher::new(
            server.client(),
            signed_in(Role::Admin),
            AccreditationSource::Logs,
        );

        let mut log = pending_log(41);
        log.approved = Some(true);
        let err = dispatcher.approve(&log).await.unwrap_err();
        assert!(matches!(ApiError::find(&err), Some(ApiError::AlreadyApproved(41))));
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_approve_without_token() {
        let server = MockServer::start().await;
        let dispatcher = AccreditationDispatcher::new(
            server.client(),
            SessionContext::default(),
            AccreditationSource::Logs,
        );
        let err = dispatcher.approve(&pending_log(40)).await.unwrap_err();
        assert!(ApiError::requires_login(&err));
        assert!(server.requests().is_empty());
    }
}
