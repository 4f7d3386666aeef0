use std::str::FromStr;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::utils::location::Position;

/// Manila, where a fresh map opens
pub const DEFAULT_CENTER: Position = Position {
    lat: 14.5995,
    lng: 120.9842,
};
pub const DEFAULT_ZOOM: u8 = 5;
pub const MAX_ZOOM: u8 = 19;

/// Storage key holding the last map view
pub const VIEW_STORAGE_KEY: &str = "view";

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum TileStyle {
    #[default]
    #[serde(rename = "osm")]
    Osm,
    #[serde(rename = "sat")]
    Sat,
    #[serde(rename = "dark")]
    Dark,
}

impl TileStyle {
    pub const ALL: [TileStyle; 3] = [TileStyle::Osm, TileStyle::Sat, TileStyle::Dark];

    pub fn to_str<'a>(&self) -> &'a str {
        match self {
            TileStyle::Osm => "osm",
            TileStyle::Sat => "sat",
            TileStyle::Dark => "dark",
        }
    }

    pub fn url_template<'a>(&self) -> &'a str {
        match self {
            TileStyle::Osm => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            TileStyle::Sat => "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
            TileStyle::Dark => {
                "https://tiles.stadiamaps.com/tiles/alidade_smooth_dark/{z}/{x}/{y}{r}.png"
            }
        }
    }

    pub fn attribution<'a>(&self) -> &'a str {
        match self {
            TileStyle::Osm => "© OpenStreetMap",
            TileStyle::Sat => "© OpenTopoMap",
            TileStyle::Dark => "© Stadia Maps",
        }
    }
}

impl FromStr for TileStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileStyle::ALL
            .into_iter()
            .find(|style| style.to_str() == s.trim().to_lowercase())
            .ok_or_else(|| anyhow::anyhow!("Unknown map style `{s}`, expected osm, sat or dark"))
    }
}

/// What part of the map is on screen, and with which tiles
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct MapView {
    pub center: Position,
    pub zoom: u8,
    pub style: TileStyle,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            style: TileStyle::default(),
        }
    }
}

impl MapView {
    pub fn set_view(&mut self, center: Position, zoom: u8) {
        self.center = center;
        self.zoom = zoom.min(MAX_ZOOM);
    }

    /// Replaces the active tile layer, returns the one it replaced
    pub fn set_style(&mut self, style: TileStyle) -> TileStyle {
        std::mem::replace(&mut self.style, style)
    }

    /// Link that opens the map at the current view, `<base>?lat=..&lng=..&z=..`
    pub fn share_url(&self, base: &str) -> anyhow::Result<String> {
        let mut url = Url::parse(base)?;
        url.query_pairs_mut()
            .clear()
            .append_pair("lat", &self.center.lat.to_string())
            .append_pair("lng", &self.center.lng.to_string())
            .append_pair("z", &self.zoom.to_string());
        Ok(url.to_string())
    }

    /// Reads a view saved with `serde_json`. Unreadable or out of range
    /// values fall back to the default view.
    pub fn from_stored(stored: &str) -> Self {
        match serde_json::from_str::<MapView>(stored) {
            Ok(view) if view.center.is_valid() => Self {
                zoom: view.zoom.min(MAX_ZOOM),
                ..view
            },
            Ok(view) => {
                log::warn!("Stored map view is off the map at {}", view.center);
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable stored map view: {e}");
                Self::default()
            }
        }
    }

    /// Reads a view from a shared link. Anything missing or invalid falls
    /// back to the default view.
    pub fn from_share_url(url: &str) -> Self {
        let default = Self::default();
        let Ok(url) = Url::parse(url) else {
            log::warn!("Invalid share link `{url}`, using default view");
            return default;
        };

        let param = |name: &str| {
            url.query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
        };
        let lat = param("lat").and_then(|v| v.parse::<f64>().ok());
        let lng = param("lng").and_then(|v| v.parse::<f64>().ok());
        let zoom = param("z").and_then(|v| v.parse::<u8>().ok());

        match lat.zip(lng).map(|(lat, lng)| Position::new(lat, lng)) {
            Some(center) if center.is_valid() => Self {
                center,
                zoom: zoom.unwrap_or(DEFAULT_ZOOM).min(MAX_ZOOM),
                style: default.style,
            },
            _ => default,
        }
    }
}
