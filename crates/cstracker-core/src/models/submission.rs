use std::fmt;

use serde::{Deserialize, Serialize};

use super::Program;

/// Review status of a submission or service log.
///
/// The backend owns the set of statuses; anything this client does not know
/// about is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
    Other(String),
}

impl ReviewStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
            ReviewStatus::Completed => "completed",
            ReviewStatus::Other(s) => s,
        }
    }

    /// True once no further decision can be made.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ReviewStatus::Approved | ReviewStatus::Rejected | ReviewStatus::Completed
        )
    }
}

impl From<String> for ReviewStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => ReviewStatus::Pending,
            "approved" => ReviewStatus::Approved,
            "rejected" => ReviewStatus::Rejected,
            "completed" => ReviewStatus::Completed,
            _ => ReviewStatus::Other(s),
        }
    }
}

impl From<ReviewStatus> for String {
    fn from(status: ReviewStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStatus::Pending => write!(f, "Pending"),
            ReviewStatus::Approved => write!(f, "Approved"),
            ReviewStatus::Rejected => write!(f, "Rejected"),
            ReviewStatus::Completed => write!(f, "Completed"),
            ReviewStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// An admin decision resolving a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    /// Status value sent to the server: the decision, lower-cased.
    pub fn as_status(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Approved => write!(f, "Approved"),
            Decision::Rejected => write!(f, "Rejected"),
        }
    }
}

/// A student's application record awaiting a decision for one program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub application: Option<Application>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default)]
    pub student: Option<Student>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_phone: Option<String>,
    #[serde(default)]
    pub program: Option<Program>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub user: Option<StudentUser>,
    /// Course, year and section, e.g. "BSIT 3-A"
    #[serde(rename = "CYS", default)]
    pub cys: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentUser {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl Student {
    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.full_name.as_deref().or(u.username.as_deref()))
            .unwrap_or("Unknown student")
    }
}

impl Submission {
    /// The program this submission belongs to, if the server sent one.
    pub fn program(&self) -> Option<&Program> {
        self.application.as_ref().and_then(|a| a.program.as_ref())
    }

    pub fn student(&self) -> Option<&Student> {
        self.application.as_ref().and_then(|a| a.student.as_ref())
    }

    pub fn student_name(&self) -> &str {
        self.student()
            .map(Student::display_name)
            .unwrap_or("Unknown student")
    }

    /// "Juan Dela Cruz - BSIT 3-A"
    pub fn student_line(&self) -> String {
        match self.student().and_then(|s| s.cys.as_deref()) {
            Some(cys) if !cys.is_empty() => format!("{} - {}", self.student_name(), cys),
            _ => self.student_name().to_string(),
        }
    }

    pub fn emergency_contact(&self) -> (Option<&str>, Option<&str>) {
        match self.application.as_ref() {
            Some(a) => (
                a.emergency_contact_name.as_deref(),
                a.emergency_contact_phone.as_deref(),
            ),
            None => (None, None),
        }
    }
}
