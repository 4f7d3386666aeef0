//! The marker store owns the list of user-created markers and keeps the map
//! layer, the sidebar (through [`StoreEvent`] observers) and storage in step
//! with it.
//!
//! Markers are addressed two ways. The display index is dense (`0..count`)
//! and shifts down after a removal, which is what the sidebar shows. The
//! [`MarkerKey`] is stable for the life of the marker and is what callbacks
//! should hold on to.

mod error;
mod events;
mod marker;

use tokio::sync::watch;
use ui_common::{MarkerRecord, Severity, DEFAULT_ICON};

pub use error::StoreError;
pub use events::{Field, Handlers, StoreEvent};
pub use marker::{Created, MarkerKey, MarkerView};

use crate::{
    render::{MapLayer, Notifier, Popup, Sidebar, SidebarBinding},
    storage::KeyValueStorage,
    utils::location::Position,
};
use marker::Marker;

/// Storage key holding the JSON array of marker records
pub const STORAGE_KEY: &str = "markers";

/// Zoom level used when focusing a single marker
pub const ZOOM_TO_MARKER: u8 = 13;

/// What `restore` found in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restored {
    NothingStored,
    /// The stored value could not be read or parsed and was left as is
    Unreadable,
    Loaded(usize),
}

pub struct MarkerStore {
    markers: Vec<Marker>,
    map: Box<dyn MapLayer>,
    storage: Box<dyn KeyValueStorage>,
    notifier: Box<dyn Notifier>,
    handlers: Handlers<StoreEvent>,
    count: Field<usize>,
    replaying: bool,
}

impl MarkerStore {
    pub fn new(
        map: impl MapLayer + 'static,
        storage: impl KeyValueStorage + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        Self {
            markers: vec![],
            map: Box::new(map),
            storage: Box::new(storage),
            notifier: Box::new(notifier),
            handlers: Handlers::default(),
            count: Field::new(0),
            replaying: false,
        }
    }

    pub fn count(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Receiver that always holds the current marker count
    pub fn watch_count(&self) -> watch::Receiver<usize> {
        self.count.watch()
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: Fn(&StoreEvent) + 'static,
    {
        self.handlers.subscribe(handler);
    }

    /// Drives `sidebar` from store events. Markers that already exist are
    /// rendered right away.
    pub fn bind_sidebar<S: Sidebar + 'static>(&mut self, sidebar: S) {
        let binding = SidebarBinding::new(sidebar);
        binding.render_all(&self.list());
        self.subscribe(move |event| binding.handle(event));
    }

    pub fn create(
        &mut self,
        position: Position,
        title: &str,
        description: &str,
        icon: &str,
    ) -> Result<Created, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        if !position.is_valid() {
            return Err(StoreError::InvalidPosition {
                lat: position.lat,
                lng: position.lng,
            });
        }

        let icon = match icon.trim() {
            "" => DEFAULT_ICON,
            icon => icon,
        };
        let key = MarkerKey::new();
        let popup = Popup {
            key,
            title: title.to_string(),
            description: description.trim().to_string(),
            icon: icon.to_string(),
        };
        let handle = self.map.add_visual(position, icon, &popup);

        let index = self.markers.len();
        self.markers.push(Marker {
            key,
            position,
            title: popup.title,
            description: popup.description,
            icon: popup.icon,
            handle,
        });
        log::debug!("Created marker {index} `{title}` at {position}");

        self.handlers
            .emit(&StoreEvent::MarkerCreated(self.markers[index].view(index)));
        self.count.set(self.markers.len());

        if !self.replaying {
            self.persist();
            self.notifier
                .notify(&format!("Marker added: {title}"), Severity::Success);
        }

        Ok(Created { index, key })
    }

    /// Removes the marker at display index `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: usize) -> Option<MarkerView> {
        if id >= self.markers.len() {
            log::debug!("No marker with id {id}, nothing to remove");
            return None;
        }

        let marker = self.markers.remove(id);
        self.map.remove_visual(marker.handle);

        let removed = marker.view(id);
        self.handlers.emit(&StoreEvent::MarkerRemoved {
            removed: removed.clone(),
            remaining: self.list(),
        });
        self.count.set(self.markers.len());

        self.persist();
        self.notifier
            .notify(&format!("Marker removed: {}", removed.title), Severity::Info);

        Some(removed)
    }

    pub fn remove_key(&mut self, key: MarkerKey) -> Option<MarkerView> {
        self.index_of(key).and_then(|id| self.remove(id))
    }

    pub fn clear(&mut self) {
        self.reset();
        self.persist();
        self.notifier.notify("All markers cleared", Severity::Info);
    }

    /// Snapshot in display order
    pub fn list(&self) -> Vec<MarkerView> {
        self.markers
            .iter()
            .enumerate()
            .map(|(index, m)| m.view(index))
            .collect()
    }

    pub fn get(&self, id: usize) -> Option<MarkerView> {
        self.markers.get(id).map(|m| m.view(id))
    }

    pub fn index_of(&self, key: MarkerKey) -> Option<usize> {
        self.markers.iter().position(|m| m.key == key)
    }

    /// Centers the map on the marker and opens its popup
    pub fn zoom_to(&mut self, id: usize) {
        let Some(marker) = self.markers.get(id) else {
            log::debug!("No marker with id {id}, nothing to zoom to");
            return;
        };

        self.map.recenter(marker.position, ZOOM_TO_MARKER);
        self.map.open_popup(marker.handle);
    }

    pub fn zoom_to_key(&mut self, key: MarkerKey) {
        if let Some(id) = self.index_of(key) {
            self.zoom_to(id);
        }
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Moves the map without touching any marker
    pub fn recenter(&mut self, position: Position, zoom: u8) {
        self.map.recenter(position, zoom);
    }

    /// Markers as records, or `None` (and a notice to the user) when there
    /// is nothing to export
    pub fn export_snapshot(&self) -> Option<Vec<MarkerRecord>> {
        if self.markers.is_empty() {
            self.notifier.notify("No markers to export", Severity::Info);
            return None;
        }

        Some(self.records())
    }

    pub fn export_json(&self) -> anyhow::Result<Option<String>> {
        self.export_snapshot()
            .map(|records| MarkerRecord::list_to_string_pretty(&records))
            .transpose()
    }

    /// Writes every marker to storage. Failures are logged and otherwise
    /// ignored, the in-memory markers stay authoritative.
    pub fn persist(&mut self) {
        let json = match MarkerRecord::list_to_string(&self.records()) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Error serializing markers: {e}");
                return;
            }
        };

        if let Err(e) = self.storage.set(STORAGE_KEY, &json) {
            log::error!("Error saving markers: {e}");
        }
    }

    /// Rebuilds the markers from storage. Missing or malformed data counts
    /// as no markers.
    pub fn restore(&mut self) -> Restored {
        let stored = match self.storage.get(STORAGE_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                log::debug!("No stored markers found");
                return Restored::NothingStored;
            }
            Err(e) => {
                log::warn!("Error reading stored markers: {e}");
                return Restored::Unreadable;
            }
        };

        let records = match MarkerRecord::list_from_string(stored.as_str()) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Ignoring malformed stored markers: {e}");
                return Restored::Unreadable;
            }
        };

        if !self.markers.is_empty() {
            self.reset();
        }

        self.replaying = true;
        let mut skipped = 0;
        for record in &records {
            let position = Position::new(record.lat, record.lng);
            if let Err(e) = self.create(position, &record.title, &record.description, &record.icon)
            {
                log::warn!("Skipping stored marker `{}`: {e}", record.title);
                skipped += 1;
            }
        }
        self.replaying = false;

        if skipped > 0 {
            self.persist();
        }

        log::debug!("Restored {} markers", self.markers.len());
        Restored::Loaded(self.markers.len())
    }

    /// Reads a value kept next to the markers. Read errors are logged and
    /// count as nothing stored.
    pub fn load_setting(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Error reading `{key}` from storage: {e}");
                None
            }
        }
    }

    /// Stores a value next to the markers. `key` must not be [`STORAGE_KEY`].
    pub fn save_setting(&mut self, key: &str, value: &str) {
        if key == STORAGE_KEY {
            log::error!("Refusing to overwrite markers with setting `{key}`");
            return;
        }
        if let Err(e) = self.storage.set(key, value) {
            log::error!("Error saving `{key}`: {e}");
        }
    }

    /// Adds the example markers shown on a fresh map
    pub fn seed_examples(&mut self) -> Result<(), StoreError> {
        let examples = [
            (48.8584, 2.2945, "Eiffel Tower", "Paris, France", "🗼"),
            (40.6892, -74.0445, "Statue of Liberty", "New York, USA", "🗽"),
            (51.5007, -0.1246, "Big Ben", "London, UK", "🕰️"),
        ];

        for (lat, lng, title, description, icon) in examples {
            self.create(Position::new(lat, lng), title, description, icon)?;
        }

        Ok(())
    }

    fn records(&self) -> Vec<MarkerRecord> {
        self.markers.iter().map(|m| m.record()).collect()
    }

    /// Drops every marker and its visual without persisting
    fn reset(&mut self) {
        for marker in self.markers.drain(..) {
            self.map.remove_visual(marker.handle);
        }
        self.handlers.emit(&StoreEvent::MarkersCleared);
        self.count.set(0);
    }
}
