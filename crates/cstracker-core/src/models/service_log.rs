use serde::{Deserialize, Serialize};

use super::de::flexible_f64;
use super::{Program, ReviewStatus, Student};

/// Program reference on a service log.
///
/// The grouped `/logs/` endpoint sends the program's name only, the flat
/// `/accreditation/` endpoint nests the whole program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgramRef {
    Details(Program),
    Name(String),
}

/// A record of service hours subject to a single approval action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLog {
    pub id: i64,
    #[serde(default)]
    pub program: Option<ProgramRef>,
    #[serde(default)]
    pub student: Option<Student>,
    #[serde(default)]
    pub facilitator: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub hours: Option<f64>,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub approved: Option<bool>,
}

impl ServiceLog {
    /// Approved by flag or by status; either one disables the approve action.
    pub fn is_approved(&self) -> bool {
        self.approved.unwrap_or(false)
            || matches!(self.status, ReviewStatus::Approved | ReviewStatus::Completed)
    }

    pub fn program(&self) -> Option<&Program> {
        match self.program.as_ref() {
            Some(ProgramRef::Details(p)) => Some(p),
            _ => None,
        }
    }

    pub fn program_name(&self) -> &str {
        match self.program.as_ref() {
            Some(ProgramRef::Details(p)) => &p.name,
            Some(ProgramRef::Name(name)) => name,
            None => "Unknown program",
        }
    }

    /// Row label: the student when known, otherwise the program name.
    pub fn label(&self) -> String {
        match self.student.as_ref() {
            Some(student) => format!("{} ({})", student.display_name(), self.status),
            None => format!("{} ({})", self.program_name(), self.status),
        }
    }
}

/// A program with the service logs of its applicants, as served by `/logs/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramLogs {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub applicants: Vec<ServiceLog>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grouped_logs() {
        let json = r#"[{"id": 10, "name": "Beach Cleanup", "applicants": [
            {"id": 100, "program": "Beach Cleanup", "facilitator": "Ms. Reyes",
             "date": "2025-03-01", "status": "Pending"},
            {"id": 101, "program": "Beach Cleanup", "facilitator": "Ms. Reyes",
             "date": "2025-03-01", "status": "Completed"}
        ]}]"#;
        let programs: Vec<ProgramLogs> = serde_json::from_str(json).unwrap();
        assert_eq!(programs.len(), 1);
        let logs = &programs[0].applicants;
        assert_eq!(logs[0].program_name(), "Beach Cleanup");
        assert!(!logs[0].is_approved());
        assert!(logs[1].is_approved());
        assert_eq!(logs[0].label(), "Beach Cleanup (Pending)");
    }

    #[test]
    fn test_parse_flat_log_with_nested_program() {
        let json = r#"{"id": 7, "program": {"id": 3, "name": "Tree Planting", "hours": "3.00"},
            "student": {"user": {"full_name": "Ana Santos"}, "CYS": "BSCS 2-B"},
            "status": "pending", "approved": true}"#;
        let log: ServiceLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.program().map(|p| p.id), Some(3));
        assert_eq!(log.program_name(), "Tree Planting");
        assert!(log.is_approved());
        assert_eq!(log.label(), "Ana Santos (Pending)");
    }

    #[test]
    fn test_missing_program() {
        let log: ServiceLog = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(log.program_name(), "Unknown program");
        assert!(log.program().is_none());
        assert!(!log.is_approved());
    }
}
