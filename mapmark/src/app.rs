//! The interactive layer on top of the marker store: map modes, click
//! routing, search, geolocation, route planning and measuring.

use ui_common::{
    units::{Distance, DistanceUnit},
    Severity, DEFAULT_ICON,
};

use crate::{
    map_view::{MapView, TileStyle, VIEW_STORAGE_KEY},
    openstreetmap::{Geocoder, Place},
    store::{Created, MarkerStore, Restored, StoreError, ZOOM_TO_MARKER},
    utils::{location::Position, non_empty},
};

pub const ZOOM_TO_SEARCH_RESULT: u8 = 12;
pub const ZOOM_TO_LOCATION: u8 = 13;
pub const DEFAULT_MARKER_TITLE: &str = "Custom place";
pub const LOCATION_TITLE: &str = "You are here";
pub const SEARCH_RESULT_DESCRIPTION: &str = "Search result";

/// Asks the user for a marker title
pub trait TitlePrompt {
    /// `None` when the user cancels
    fn ask(&mut self, message: &str, default: &str) -> Option<String>;
}

impl<F> TitlePrompt for F
where
    F: FnMut(&str, &str) -> Option<String>,
{
    fn ask(&mut self, message: &str, default: &str) -> Option<String> {
        self(message, default)
    }
}

/// What a click on the map does
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Mode {
    #[default]
    Browse,
    AddMarker,
    /// Holds the first point once it has been clicked
    Measure(Option<Position>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Ignored,
    Created(Created),
    Cancelled,
    MeasureStarted,
    Measured(Distance),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub from: Place,
    pub to: Place,
    /// Straight-line distance between the waypoints
    pub distance: Distance,
}

pub fn format_distance(distance: &Distance) -> String {
    format!("Distance: {}", distance.to_string(&DistanceUnit::Km))
}

pub struct MapApp {
    store: MarkerStore,
    view: MapView,
    mode: Mode,
}

impl MapApp {
    pub fn new(store: MarkerStore) -> Self {
        Self {
            store,
            view: MapView::default(),
            mode: Mode::default(),
        }
    }

    /// Restores stored markers and the last map view. A map that has never
    /// been saved starts with the example markers when `seed_examples` is set.
    pub fn start(store: MarkerStore, seed_examples: bool) -> Self {
        let mut app = Self::new(store);
        if let Some(stored) = app.store.load_setting(VIEW_STORAGE_KEY) {
            app.view = MapView::from_stored(&stored);
        }

        let restored = app.store.restore();
        if restored == Restored::NothingStored && seed_examples {
            log::info!("Adding example markers");
            if let Err(e) = app.store.seed_examples() {
                log::error!("Error adding example markers: {e}");
            }
        }

        let view = app.view;
        app.store.recenter(view.center, view.zoom);
        app
    }

    pub fn store(&self) -> &MarkerStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MarkerStore {
        &mut self.store
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.store.notifier().notify(message, severity);
    }

    fn set_view(&mut self, center: Position, zoom: u8) {
        self.view.set_view(center, zoom);
        self.store.recenter(self.view.center, self.view.zoom);
        self.save_view();
    }

    fn save_view(&mut self) {
        match serde_json::to_string(&self.view) {
            Ok(json) => self.store.save_setting(VIEW_STORAGE_KEY, &json),
            Err(e) => log::error!("Error serializing map view: {e}"),
        }
    }

    /// Moves the map to the view of a shared link. Invalid links open the
    /// default view.
    pub fn open_share_url(&mut self, url: &str) {
        let shared = MapView::from_share_url(url);
        self.set_view(shared.center, shared.zoom);
    }

    pub fn toggle_add_mode(&mut self) -> Mode {
        if self.mode == Mode::AddMarker {
            self.mode = Mode::Browse;
            self.notify("Add marker cancelled", Severity::Info);
        } else {
            self.mode = Mode::AddMarker;
            self.notify("Click map to add marker", Severity::Info);
        }
        self.mode
    }

    pub fn toggle_measure_mode(&mut self) -> Mode {
        if let Mode::Measure(_) = self.mode {
            self.mode = Mode::Browse;
            self.notify("Measure tool off", Severity::Info);
        } else {
            self.mode = Mode::Measure(None);
            self.notify("Click two points to measure", Severity::Info);
        }
        self.mode
    }

    pub fn click(&mut self, position: Position, prompt: &mut impl TitlePrompt) -> ClickOutcome {
        match self.mode {
            Mode::Browse => ClickOutcome::Ignored,
            Mode::AddMarker => {
                self.mode = Mode::Browse;
                let title = prompt.ask("Marker title", DEFAULT_MARKER_TITLE);
                let Some(title) = non_empty(title.as_deref()) else {
                    return ClickOutcome::Cancelled;
                };
                match self.store.create(position, &title, "", DEFAULT_ICON) {
                    Ok(created) => ClickOutcome::Created(created),
                    Err(e) => {
                        self.notify(&e.to_string(), Severity::Warning);
                        ClickOutcome::Cancelled
                    }
                }
            }
            Mode::Measure(None) => {
                self.mode = Mode::Measure(Some(position));
                ClickOutcome::MeasureStarted
            }
            Mode::Measure(Some(first)) => {
                self.mode = Mode::Browse;
                let distance = first.distance_to(&position);
                self.notify(&format_distance(&distance), Severity::Info);
                ClickOutcome::Measured(distance)
            }
        }
    }

    /// Marks the user's position after a geolocation fix
    pub fn locate(&mut self, position: Position) -> Result<Created, StoreError> {
        if !position.is_valid() {
            return Err(StoreError::InvalidPosition {
                lat: position.lat,
                lng: position.lng,
            });
        }
        self.set_view(position, ZOOM_TO_LOCATION);
        self.store
            .create(position, LOCATION_TITLE, "", DEFAULT_ICON)
    }

    /// Looks up `query` and marks the best match. Misses and lookup errors
    /// are reported to the user, not to the caller.
    pub async fn search(&mut self, geocoder: &Geocoder, query: &str) -> Option<Created> {
        let query = non_empty(Some(query))?;

        match geocoder.search(&query).await {
            Ok(Some(place)) => {
                match self.store.create(
                    place.position,
                    &place.display_name,
                    SEARCH_RESULT_DESCRIPTION,
                    DEFAULT_ICON,
                ) {
                    Ok(created) => {
                        self.set_view(place.position, ZOOM_TO_SEARCH_RESULT);
                        Some(created)
                    }
                    Err(e) => {
                        log::error!("Error adding search result `{}`: {e}", place.display_name);
                        self.notify(&e.to_string(), Severity::Warning);
                        None
                    }
                }
            }
            Ok(None) => {
                self.notify("Not found", Severity::Warning);
                None
            }
            Err(e) => {
                log::error!("Search for `{query}` failed: {e}");
                self.notify(&format!("Search failed: {e}"), Severity::Error);
                None
            }
        }
    }

    /// Geocodes both ends of a route. Computing the path itself is left to
    /// a routing engine.
    pub async fn plan_route(
        &mut self,
        geocoder: &Geocoder,
        from: &str,
        to: &str,
    ) -> anyhow::Result<Route> {
        let Some(start) = geocoder.search(from).await? else {
            anyhow::bail!("Start location `{from}` not found");
        };
        let Some(destination) = geocoder.search(to).await? else {
            anyhow::bail!("Destination `{to}` not found");
        };

        let distance = start.position.distance_to(&destination.position);
        if start.position.is_valid() {
            self.set_view(start.position, ZOOM_TO_MARKER);
        }

        Ok(Route {
            from: start,
            to: destination,
            distance,
        })
    }

    /// Straight-line distance between two markers
    pub fn measure(&self, a: usize, b: usize) -> Option<Distance> {
        let a = self.store.get(a)?;
        let b = self.store.get(b)?;
        Some(a.position.distance_to(&b.position))
    }

    pub fn zoom_to(&mut self, id: usize) -> bool {
        let Some(marker) = self.store.get(id) else {
            return false;
        };
        self.view.set_view(marker.position, ZOOM_TO_MARKER);
        self.store.zoom_to(id);
        self.save_view();
        true
    }

    pub fn set_style(&mut self, style: TileStyle) {
        let previous = self.view.set_style(style);
        if previous != style {
            log::info!("Map style changed from {} to {}", previous.to_str(), style.to_str());
            self.save_view();
        }
    }

    pub fn share_url(&self, base: &str) -> anyhow::Result<String> {
        self.view.share_url(base)
    }
}
