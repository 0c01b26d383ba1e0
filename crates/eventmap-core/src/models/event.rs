use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// An event marker on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "dateTime", default)]
    pub date_time: Option<DateTime<Utc>>,
    pub position: LatLng,
}

impl Event {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Untitled event")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_minimal() {
        let json = r#"{"id":"e1","position":{"latitude":-27.2,"longitude":-49.6}}"#;
        let event: Event = serde_json::from_str(json).expect("Failed to parse event JSON");
        assert_eq!(event.display_name(), "Untitled event");
        assert!(event.date_time.is_none());
        assert_eq!(event.position.latitude, -27.2);
    }

    #[test]
    fn test_parse_event_with_date() {
        let json = r#"{"id":"e2","name":"Beach cleanup","dateTime":"2024-05-01T14:30:00Z","position":{"latitude":1.0,"longitude":2.0}}"#;
        let event: Event = serde_json::from_str(json).expect("Failed to parse event JSON");
        assert_eq!(event.display_name(), "Beach cleanup");
        assert_eq!(
            event.date_time.map(|d| d.to_rfc3339()),
            Some("2024-05-01T14:30:00+00:00".to_string())
        );
    }
}
