use serde::{Deserialize, Serialize};
use ui_common::MarkerRecord;
use uuid::Uuid;

use crate::{render::VisualHandle, utils::location::Position};

/// Stable identity of a marker. Unlike the display index it never changes
/// while the marker is alive and is never handed out twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerKey(Uuid);

impl MarkerKey {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live marker. Only the store sees the visual handle.
#[derive(Debug, Clone)]
pub(crate) struct Marker {
    pub key: MarkerKey,
    pub position: Position,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub handle: VisualHandle,
}

impl Marker {
    pub fn view(&self, index: usize) -> MarkerView {
        MarkerView {
            index,
            key: self.key,
            position: self.position,
            title: self.title.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
        }
    }

    pub fn record(&self) -> MarkerRecord {
        MarkerRecord {
            lat: self.position.lat,
            lng: self.position.lng,
            title: self.title.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// Read-only snapshot of a marker at a given display index
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub index: usize,
    pub key: MarkerKey,
    pub position: Position,
    pub title: String,
    pub description: String,
    pub icon: String,
}

impl MarkerView {
    pub fn to_record(&self) -> MarkerRecord {
        MarkerRecord {
            lat: self.position.lat,
            lng: self.position.lng,
            title: self.title.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// Returned by a successful `create`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Created {
    pub index: usize,
    pub key: MarkerKey,
}
