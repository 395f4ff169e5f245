//! Map-service link detection and construction, plus URL scanning for chat.
//!
//! Everything here is pure string work: no geocoding and no check that a
//! place name resolves to anything real.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::{form_urlencoded, Url};

use crate::model::TripId;

const MAP_HOST_MARKERS: &[&str] = &["maps.google.com", "goo.gl/maps", "maps.app.goo.gl"];

const MAPS_BASE: &str = "https://www.google.com/maps";

static COORDINATES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)").expect("static regex"));

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Coordinates { lat: f64, lng: f64 },
    Named { name: String },
}

impl Location {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named { name: name.into() }
    }

    /// Path segment for a directions link.
    fn path_segment(&self) -> String {
        match self {
            Self::Coordinates { lat, lng } => format!("{lat},{lng}"),
            Self::Named { name } => encode_component(name),
        }
    }
}

#[must_use]
pub fn is_map_url(url: &str) -> bool {
    !url.is_empty() && MAP_HOST_MARKERS.iter().any(|m| url.contains(m))
}

/// Pulls a location out of a map link: `@lat,lng` wins, then the `q`
/// parameter. Anything unparseable yields `None`.
#[must_use]
pub fn extract_location(url: &str) -> Option<Location> {
    if !is_map_url(url) {
        return None;
    }

    if let Some(caps) = COORDINATES.captures(url) {
        let lat = caps.get(1)?.as_str().parse().ok()?;
        let lng = caps.get(2)?.as_str().parse().ok()?;
        return Some(Location::Coordinates { lat, lng });
    }

    let parsed = Url::parse(url).ok()?;
    let query = parsed
        .query_pairs()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())?;
    if query.is_empty() {
        None
    } else {
        Some(Location::Named { name: query })
    }
}

#[must_use]
pub fn map_url(location: &Location) -> Option<String> {
    match location {
        Location::Coordinates { lat, lng } => Some(format!("{MAPS_BASE}?q={lat},{lng}")),
        Location::Named { name } if !name.is_empty() => Some(format!(
            "{MAPS_BASE}/search/?api=1&query={}",
            encode_component(name)
        )),
        Location::Named { .. } => None,
    }
}

#[must_use]
pub fn directions_url(from: &Location, to: &Location) -> String {
    format!(
        "{MAPS_BASE}/dir/{}/{}",
        from.path_segment(),
        to.path_segment()
    )
}

/// Route through every stop of a day: first to last, with the stops in
/// between appended as a `|`-joined waypoint segment.
#[must_use]
pub fn day_route_url(stops: &[Location]) -> Option<String> {
    let (first, rest) = stops.split_first()?;
    let (last, middle) = rest.split_last()?;
    let mut url = directions_url(first, last);
    if !middle.is_empty() {
        let waypoints: Vec<String> = middle.iter().map(Location::path_segment).collect();
        url.push('/');
        url.push_str(&waypoints.join("|"));
    }
    Some(url)
}

#[must_use]
pub fn extract_urls(text: &str) -> Vec<String> {
    BARE_URL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[must_use]
pub fn is_valid_url(candidate: &str) -> bool {
    Url::parse(candidate.trim()).is_ok()
}

#[must_use]
pub fn share_url(base: &str, param: &str, trip_id: TripId) -> String {
    format!("{base}?{param}={trip_id}")
}

/// Splits a page URL into its base (origin + path) and the share parameter.
#[must_use]
pub fn parse_page_url(page_url: &str, param: &str) -> (Option<String>, Option<String>) {
    let Ok(mut parsed) = Url::parse(page_url) else {
        return (None, None);
    };
    let share = parsed
        .query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned());
    parsed.set_query(None);
    parsed.set_fragment(None);
    (Some(parsed.to_string()), share)
}

/// Percent-encodes a single URI component, spaces as `%20`.
#[must_use]
pub fn encode_component(raw: &str) -> String {
    // form_urlencoded writes spaces as '+' and escapes a literal '+' as %2B,
    // so every '+' in the output stands for a space.
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
