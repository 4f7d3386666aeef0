use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use mapmark::{
    render::{MapLayer, Notifier, Popup, Sidebar, VisualHandle},
    storage::{KeyValueStorage, MemoryStorage, StorageError},
    store::{MarkerStore, MarkerView, STORAGE_KEY},
    utils::location::Position,
};
use ui_common::{MarkerRecord, Severity};

#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    Add(u64, Position, String),
    Remove(u64),
    Recenter(Position, u8),
    OpenPopup(u64),
}

#[derive(Debug, Default)]
struct MapState {
    next_id: u64,
    live: BTreeSet<u64>,
    calls: Vec<MapCall>,
}

/// Map layer that records every call
#[derive(Debug, Default, Clone)]
pub struct RecordingMap(Rc<RefCell<MapState>>);

impl RecordingMap {
    pub fn live_visuals(&self) -> usize {
        self.0.borrow().live.len()
    }

    pub fn calls(&self) -> Vec<MapCall> {
        self.0.borrow().calls.clone()
    }

    pub fn last_call(&self) -> Option<MapCall> {
        self.0.borrow().calls.last().cloned()
    }
}

impl MapLayer for RecordingMap {
    fn add_visual(&mut self, position: Position, _glyph: &str, popup: &Popup) -> VisualHandle {
        let mut state = self.0.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.live.insert(id);
        state.calls.push(MapCall::Add(id, position, popup.title.clone()));
        VisualHandle::new(id)
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        let mut state = self.0.borrow_mut();
        assert!(
            state.live.remove(&handle.id()),
            "visual {} removed twice",
            handle.id()
        );
        state.calls.push(MapCall::Remove(handle.id()));
    }

    fn recenter(&mut self, position: Position, zoom: u8) {
        self.0.borrow_mut().calls.push(MapCall::Recenter(position, zoom));
    }

    fn open_popup(&mut self, handle: VisualHandle) {
        self.0.borrow_mut().calls.push(MapCall::OpenPopup(handle.id()));
    }
}

/// Sidebar that keeps its rows ordered by id
#[derive(Debug, Default, Clone)]
pub struct RecordingSidebar(Rc<RefCell<Vec<(usize, String)>>>);

impl RecordingSidebar {
    pub fn rows(&self) -> Vec<(usize, String)> {
        self.0.borrow().clone()
    }
}

impl Sidebar for RecordingSidebar {
    fn render_row(&mut self, id: usize, title: &str, _description: &str, _glyph: &str) {
        let mut rows = self.0.borrow_mut();
        rows.retain(|(i, _)| *i != id);
        rows.push((id, title.to_string()));
        rows.sort_by_key(|(i, _)| *i);
    }

    fn remove_row(&mut self, id: usize) {
        self.0.borrow_mut().retain(|(i, _)| *i != id);
    }

    fn clear_all(&mut self) {
        self.0.borrow_mut().clear();
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier(Rc<RefCell<Vec<(String, Severity)>>>);

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.0.borrow().clone()
    }

    pub fn contains(&self, message: &str, severity: Severity) -> bool {
        self.0
            .borrow()
            .iter()
            .any(|(m, s)| m == message && *s == severity)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.0.borrow_mut().push((message.to_string(), severity));
    }
}

/// Storage whose writes always fail, like a browser over its quota
#[derive(Debug, Default, Clone)]
pub struct FailingStorage {
    pub stored: Option<String>,
}

impl KeyValueStorage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.stored.clone())
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }
}

pub struct Harness {
    pub store: MarkerStore,
    pub map: RecordingMap,
    pub sidebar: RecordingSidebar,
    pub notifier: RecordingNotifier,
    pub storage: MemoryStorage,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    pub fn with_storage(storage: MemoryStorage) -> Self {
        let map = RecordingMap::default();
        let sidebar = RecordingSidebar::default();
        let notifier = RecordingNotifier::default();
        let mut store = MarkerStore::new(map.clone(), storage.clone(), notifier.clone());
        store.bind_sidebar(sidebar.clone());

        Self {
            store,
            map,
            sidebar,
            notifier,
            storage,
        }
    }

    pub fn stored_records(&self) -> Option<Vec<MarkerRecord>> {
        self.storage
            .peek(STORAGE_KEY)
            .map(|s| MarkerRecord::list_from_string(s.as_str()).unwrap())
    }

    /// Checks that ids are dense and that every view agrees with the store
    pub fn assert_consistent(&self) {
        let list = self.store.list();
        assert_eq!(list.len(), self.store.count());

        let ids = list.iter().map(|m| m.index).collect::<Vec<usize>>();
        assert_eq!(ids, (0..self.store.count()).collect::<Vec<usize>>());

        assert_eq!(self.map.live_visuals(), self.store.count());
        assert_eq!(self.sidebar.rows(), rows_of(&list));

        let records = list.iter().map(|m| m.to_record()).collect::<Vec<MarkerRecord>>();
        assert_eq!(self.stored_records().unwrap_or_default(), records);
    }
}

pub fn rows_of(list: &[MarkerView]) -> Vec<(usize, String)> {
    list.iter().map(|m| (m.index, m.title.clone())).collect()
}

pub fn titles(store: &MarkerStore) -> Vec<String> {
    store.list().into_iter().map(|m| m.title).collect()
}

pub fn create(store: &mut MarkerStore, lat: f64, lng: f64, title: &str) -> usize {
    store
        .create(Position::new(lat, lng), title, "", "📍")
        .unwrap()
        .index
}

/// Search response the way Nominatim sends it
pub fn nominatim_json(display_name: &str, lat: &str, lon: &str) -> String {
    serde_json::json!([{
        "place_id": 1,
        "licence": "Data © OpenStreetMap contributors, ODbL 1.0.",
        "osm_type": "relation",
        "osm_id": 2,
        "lat": lat,
        "lon": lon,
        "category": "boundary",
        "type": "administrative",
        "importance": 0.6,
        "display_name": display_name,
        "boundingbox": ["10.2", "10.5", "123.7", "124.0"]
    }])
    .to_string()
}
