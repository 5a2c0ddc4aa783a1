use serde::{Deserialize, Serialize};

use super::de::flexible_f64;

/// Required service hours when the server does not report a total.
pub const DEFAULT_REQUIRED_HOURS: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Student => write!(f, "Student"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_student: bool,
    #[serde(default)]
    pub token: Option<String>,
}

impl LoginResponse {
    /// Admin wins when the server flags both.
    pub fn role(&self) -> Option<Role> {
        if self.is_admin {
            Some(Role::Admin)
        } else if self.is_student {
            Some(Role::Student)
        } else {
            None
        }
    }
}

/// Registration form. Every field is required.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub course: String,
    pub year_level: String,
    pub section: String,
    pub phone_number: String,
}

impl SignupRequest {
    /// Labels of the fields left blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("First name", &self.first_name),
            ("Last name", &self.last_name),
            ("Course", &self.course),
            ("Year level", &self.year_level),
            ("Section", &self.section),
            ("Email", &self.email),
            ("Phone number", &self.phone_number),
            ("Username", &self.username),
            ("Password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub username: Option<String>,
}

/// Application form for one program.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub course: String,
    pub year_level: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub program_id: i64,
}

impl ApplicationRequest {
    /// Form field labels, in display order.
    pub const FIELDS: [&'static str; 8] = [
        "First name",
        "Last name",
        "Email",
        "Phone number",
        "Course",
        "Year level",
        "Emergency contact name",
        "Emergency contact phone",
    ];

    pub fn for_program(program_id: i64) -> Self {
        Self {
            program_id,
            ..Default::default()
        }
    }

    pub fn field(&self, index: usize) -> Option<&String> {
        match index {
            0 => Some(&self.first_name),
            1 => Some(&self.last_name),
            2 => Some(&self.email),
            3 => Some(&self.phone_number),
            4 => Some(&self.course),
            5 => Some(&self.year_level),
            6 => Some(&self.emergency_contact_name),
            7 => Some(&self.emergency_contact_phone),
            _ => None,
        }
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.first_name),
            1 => Some(&mut self.last_name),
            2 => Some(&mut self.email),
            3 => Some(&mut self.phone_number),
            4 => Some(&mut self.course),
            5 => Some(&mut self.year_level),
            6 => Some(&mut self.emergency_contact_name),
            7 => Some(&mut self.emergency_contact_phone),
            _ => None,
        }
    }
}

/// Student progress toward the required service hours.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProgressSummary {
    #[serde(default, deserialize_with = "flexible_f64")]
    pub hours_completed: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub total_required_hours: Option<f64>,
}

impl ProgressSummary {
    pub fn completed(&self) -> f64 {
        self.hours_completed.unwrap_or(0.0)
    }

    /// Zero or missing totals fall back to the default requirement.
    pub fn required(&self) -> f64 {
        match self.total_required_hours {
            Some(total) if total > 0.0 => total,
            _ => DEFAULT_REQUIRED_HOURS,
        }
    }

    pub fn remaining(&self) -> f64 {
        (self.required() - self.completed()).max(0.0)
    }

    /// Completion ratio clamped to 0.0..=1.0
    pub fn ratio(&self) -> f64 {
        (self.completed() / self.required()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_role() {
        let r: LoginResponse =
            serde_json::from_str(r#"{"is_admin": true, "is_student": false, "token": "abc"}"#).unwrap();
        assert_eq!(r.role(), Some(Role::Admin));
        assert_eq!(r.token.as_deref(), Some("abc"));

        let r: LoginResponse = serde_json::from_str(r#"{"is_student": true, "token": "x"}"#).unwrap();
        assert_eq!(r.role(), Some(Role::Student));

        let r: LoginResponse = serde_json::from_str(r#"{"token": "x"}"#).unwrap();
        assert_eq!(r.role(), None);
    }

    #[test]
    fn test_signup_missing_fields() {
        let mut req = SignupRequest {
            first_name: "Ana".into(),
            last_name: "Santos".into(),
            email: "ana@example.com".into(),
            username: "ana".into(),
            password: "secret".into(),
            course: "BSCS".into(),
            year_level: "2".into(),
            section: "B".into(),
            phone_number: "09170000000".into(),
        };
        assert!(req.missing_fields().is_empty());

        req.section = "  ".into();
        req.password.clear();
        assert_eq!(req.missing_fields(), vec!["Section", "Password"]);
    }

    #[test]
    fn test_application_request_fields() {
        let mut req = ApplicationRequest::for_program(10);
        *req.field_mut(6).unwrap() = "Maria".into();
        assert_eq!(req.emergency_contact_name, "Maria");
        assert_eq!(req.field(6).map(String::as_str), Some("Maria"));
        assert!(req.field(ApplicationRequest::FIELDS.len()).is_none());

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["program_id"], 10);
    }

    #[test]
    fn test_progress_summary() {
        let p: ProgressSummary =
            serde_json::from_str(r#"{"hours_completed": "20.5", "total_required_hours": 80}"#).unwrap();
        assert_eq!(p.completed(), 20.5);
        assert_eq!(p.remaining(), 59.5);
        assert!((p.ratio() - 0.25625).abs() < 1e-9);

        let p: ProgressSummary = serde_json::from_str(r#"{"total_required_hours": 0}"#).unwrap();
        assert_eq!(p.required(), DEFAULT_REQUIRED_HOURS);
        assert_eq!(p.completed(), 0.0);

        let p = ProgressSummary {
            hours_completed: Some(100.0),
            total_required_hours: Some(80.0),
        };
        assert_eq!(p.remaining(), 0.0);
        assert_eq!(p.ratio(), 1.0);
    }
}
