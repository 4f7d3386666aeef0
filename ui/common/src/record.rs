use macros::Json;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ICON: &str = "📍";

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

/// A marker as it is persisted and exported.
///
/// Field names match the stored layout `{lat, lng, title, description, icon}`.
/// Older entries without a description or icon still load.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Json)]
pub struct MarkerRecord {
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_icon")]
    pub icon: String,
}

impl MarkerRecord {
    pub fn new(lat: f64, lng: f64, title: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            title: title.into(),
            description: String::new(),
            icon: default_icon(),
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    pub fn with_icon(self, icon: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            ..self
        }
    }
}

#[test]
fn test_record_defaults() {
    let records = MarkerRecord::list_from_string(r#"[{"lat":1,"lng":2,"title":"A"}]"#).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].description, "");
    assert_eq!(records[0].icon, DEFAULT_ICON);
}

#[test]
fn test_record_layout() {
    let record = MarkerRecord::new(48.8584, 2.2945, "Eiffel Tower")
        .with_description("Paris, France")
        .with_icon("🗼");
    let value = record.to_value().unwrap();
    let object = value.as_object().unwrap();

    let mut keys = object.keys().cloned().collect::<Vec<String>>();
    keys.sort();
    assert_eq!(keys, vec!["description", "icon", "lat", "lng", "title"]);
    assert_eq!(object["title"], "Eiffel Tower");
}
