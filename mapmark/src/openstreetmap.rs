use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Client,
};
use serde::{Deserialize, Serialize};

use crate::utils::{location::Position, non_empty};

pub const BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// One entry of a Nominatim `/search` response. Nominatim sends coordinates as
/// strings.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct OsmSearchResult {
    pub place_id: Option<i64>,
    pub licence: Option<String>,
    pub osm_type: Option<String>,
    pub osm_id: Option<i64>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub category: Option<String>,
    pub r#type: Option<String>,
    pub importance: Option<f64>,
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub boundingbox: Option<[String; 4]>,
}

impl OsmSearchResult {
    pub fn position(&self) -> anyhow::Result<Position> {
        let parse = |field: &str, value: &Option<String>| -> anyhow::Result<f64> {
            let Some(value) = value else {
                anyhow::bail!("Search result has no `{field}`");
            };
            value
                .trim()
                .parse::<f64>()
                .map_err(|e| anyhow::anyhow!("Invalid `{field}` value `{value}`: {e}"))
        };

        Ok(Position::new(
            parse("lat", &self.lat)?,
            parse("lon", &self.lon)?,
        ))
    }

    /// Display name, or the short name when the display name is blank
    pub fn get_name(&self) -> Option<String> {
        non_empty(self.display_name.as_deref()).or_else(|| non_empty(self.name.as_deref()))
    }
}

/// A geocoded place
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub display_name: String,
    pub position: Position,
}

/// This is an example of how to use the `Geocoder`.
/// ```no_run
/// # async fn run() -> anyhow::Result<()> {
/// let geocoder = mapmark::openstreetmap::Geocoder::new(mapmark::openstreetmap::BASE_URL)?;
/// if let Some(place) = geocoder.search("Cebu").await? {
///     println!("{} is at {}", place.display_name, place.position);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("mapmark"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Best match for `query`, `None` when nothing matches
    pub async fn search(&self, query: &str) -> anyhow::Result<Option<Place>> {
        let Some(query) = non_empty(Some(query)) else {
            return Ok(None);
        };

        log::debug!("Searching for `{query}`");
        let res = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("format", "json"),
                ("q", query.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        if res.status() != reqwest::StatusCode::OK {
            anyhow::bail!("Unexpected response code: {}", res.status());
        }

        let results = res.json::<Vec<OsmSearchResult>>().await?;
        let Some(first) = results.first() else {
            log::info!("No place found for `{query}`");
            return Ok(None);
        };

        Ok(Some(Place {
            display_name: first.get_name().unwrap_or(query),
            position: first.position()?,
        }))
    }
}

#[test]
fn test_search_result_position() {
    let result = OsmSearchResult {
        lat: Some("10.3156992".into()),
        lon: Some(" 123.8854366".into()),
        display_name: Some("Cebu City, Central Visayas, Philippines".into()),
        ..Default::default()
    };
    assert_eq!(
        result.position().unwrap(),
        Position::new(10.3156992, 123.8854366)
    );

    let missing = OsmSearchResult {
        lat: Some("1.0".into()),
        ..Default::default()
    };
    assert!(missing.position().is_err());

    let garbage = OsmSearchResult {
        lat: Some("north".into()),
        lon: Some("1.0".into()),
        ..Default::default()
    };
    assert!(garbage.position().is_err());
}

#[test]
fn test_search_result_name() {
    let result = OsmSearchResult {
        display_name: Some("  ".into()),
        name: Some("Cebu".into()),
        ..Default::default()
    };
    assert_eq!(result.get_name(), Some("Cebu".into()));
    assert_eq!(OsmSearchResult::default().get_name(), None);
}
