use serde::{Deserialize, Serialize};

use super::de::{flexible_f64, flexible_i64};

/// A community service program students can apply to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub facilitator: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time_start: Option<String>,
    #[serde(default)]
    pub time_end: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub hours: Option<f64>,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub slots: Option<i64>,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub slots_taken: Option<i64>,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub slots_remaining: Option<i64>,
}

impl Program {
    /// Remaining capacity: the server's value when present, otherwise
    /// `slots - slots_taken` (never below zero).
    pub fn remaining_slots(&self) -> Option<i64> {
        self.slots_remaining.or_else(|| {
            self.slots
                .map(|slots| (slots - self.slots_taken.unwrap_or(0)).max(0))
        })
    }

    pub fn is_full(&self) -> bool {
        self.remaining_slots() == Some(0)
    }

    /// "Location: X | Facilitator: Y"
    pub fn venue_line(&self) -> String {
        format!(
            "Location: {} | Facilitator: {}",
            self.location.as_deref().unwrap_or("TBD"),
            self.facilitator.as_deref().unwrap_or("TBD")
        )
    }

    /// "Date: 2025-03-01 | Time: 08:00 - 12:00"
    pub fn schedule_line(&self) -> String {
        format!(
            "Date: {} | Time: {} - {}",
            self.date.as_deref().unwrap_or("TBD"),
            self.time_start.as_deref().unwrap_or("?"),
            self.time_end.as_deref().unwrap_or("?")
        )
    }

    /// "Hours: 4 | Slots: 20 | Taken: 5 | Remaining: 15"
    pub fn capacity_line(&self) -> String {
        fn show(v: Option<i64>) -> String {
            v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())
        }
        format!(
            "Hours: {} | Slots: {} | Taken: {} | Remaining: {}",
            self.hours
                .map(crate::utils::format_hours)
                .unwrap_or_else(|| "-".to_string()),
            show(self.slots),
            show(self.slots_taken),
            show(self.remaining_slots())
        )
    }
}

#[cfg(test)]
pub(crate) fn program(id: i64, name: &str) -> Program {
    Program {
        id,
        name: name.to_string(),
        description: None,
        location: None,
        facilitator: None,
        date: None,
        time_start: None,
        time_end: None,
        hours: None,
        slots: None,
        slots_taken: None,
        slots_remaining: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_program() {
        let json = r#"{"id": 10, "name": "Beach Cleanup", "description": "Collect litter",
            "location": "North Shore", "facilitator": "Ms. Reyes", "date": "2025-03-01",
            "time_start": "08:00:00", "time_end": "12:00:00", "hours": "4.00",
            "slots": 20, "slots_taken": 5}"#;
        let p: Program = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, 10);
        assert_eq!(p.name, "Beach Cleanup");
        assert_eq!(p.hours, Some(4.0));
        assert_eq!(p.slots_remaining, None);
        assert_eq!(p.remaining_slots(), Some(15));
    }

    #[test]
    fn test_remaining_slots_prefers_server_value() {
        let mut p = program(1, "Tree Planting");
        p.slots = Some(10);
        p.slots_taken = Some(4);
        p.slots_remaining = Some(3);
        assert_eq!(p.remaining_slots(), Some(3));
    }

    #[test]
    fn test_remaining_slots_derivation() {
        let mut p = program(1, "Tree Planting");
        assert_eq!(p.remaining_slots(), None);

        p.slots = Some(10);
        assert_eq!(p.remaining_slots(), Some(10));

        p.slots_taken = Some(12);
        assert_eq!(p.remaining_slots(), Some(0));
        assert!(p.is_full());
    }

    #[test]
    fn test_display_lines() {
        let mut p = program(1, "Feeding Program");
        p.hours = Some(2.5);
        p.slots = Some(8);
        p.slots_taken = Some(3);
        assert_eq!(p.capacity_line(), "Hours: 2.5 | Slots: 8 | Taken: 3 | Remaining: 5");
        assert_eq!(p.venue_line(), "Location: TBD | Facilitator: TBD");
    }
}
