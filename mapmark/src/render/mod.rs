//! Views driven by the marker store: the map's visual layer, the sidebar list
//! and user notifications.

pub mod terminal;

use std::cell::RefCell;

use ui_common::Severity;

use crate::{
    store::{MarkerKey, MarkerView, StoreEvent},
    utils::location::Position,
};

/// Opaque reference to a visual registered with a map layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(u64);

impl VisualHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Popup attached to a marker visual. The key lets the delete and zoom
/// buttons of the popup call back into the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub key: MarkerKey,
    pub title: String,
    pub description: String,
    pub icon: String,
}

impl Popup {
    pub fn content(&self) -> String {
        if self.description.is_empty() {
            format!("{} {}", self.icon, self.title)
        } else {
            format!("{} {}\n{}", self.icon, self.title, self.description)
        }
    }
}

pub trait MapLayer {
    fn add_visual(&mut self, position: Position, glyph: &str, popup: &Popup) -> VisualHandle;
    fn remove_visual(&mut self, handle: VisualHandle);
    fn recenter(&mut self, position: Position, zoom: u8);
    fn open_popup(&mut self, handle: VisualHandle);
}

pub trait Sidebar {
    fn render_row(&mut self, id: usize, title: &str, description: &str, glyph: &str);
    fn remove_row(&mut self, id: usize);
    fn clear_all(&mut self);
}

pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// Keeps a sidebar in step with the store by listening to its events
pub struct SidebarBinding<S: Sidebar> {
    sidebar: RefCell<S>,
}

impl<S: Sidebar> SidebarBinding<S> {
    pub fn new(sidebar: S) -> Self {
        Self {
            sidebar: RefCell::new(sidebar),
        }
    }

    pub fn render_all(&self, markers: &[MarkerView]) {
        let mut sidebar = self.sidebar.borrow_mut();
        sidebar.clear_all();
        for m in markers {
            sidebar.render_row(m.index, &m.title, &m.description, &m.icon);
        }
    }

    pub fn handle(&self, event: &StoreEvent) {
        match event {
            StoreEvent::MarkerCreated(m) => {
                self.sidebar
                    .borrow_mut()
                    .render_row(m.index, &m.title, &m.description, &m.icon);
            }
            StoreEvent::MarkerRemoved { removed, remaining } => {
                self.sidebar.borrow_mut().remove_row(removed.index);
                // Every row after the removed one has a new id
                self.render_all(remaining);
            }
            StoreEvent::MarkersCleared => self.sidebar.borrow_mut().clear_all(),
        }
    }
}

/// Sends notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => log::info!("{message}"),
            Severity::Warning => log::warn!("{message}"),
            Severity::Error => log::error!("{message}"),
        }
    }
}
