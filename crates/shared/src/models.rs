use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::geo::LatLng;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SiteError {
    #[error("site has no coordinates")]
    MissingCoordinates,
    #[error("non-finite coordinates ({lat}, {lng})")]
    NonFinite { lat: f64, lng: f64 },
    #[error("coordinates out of range ({lat}, {lng})")]
    OutOfRange { lat: f64, lng: f64 },
}

/// Raw coordinates as delivered by the data layer. Either component may be
/// absent when the upstream record is incomplete or malformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default, deserialize_with = "lenient_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lng: Option<f64>,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
        }
    }
}

/// Years; negative values are BCE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: i32,
    pub end: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub period: String,
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub thumbnail_url: String,
}

impl Site {
    /// Validated geographic position of this site.
    pub fn location(&self) -> Result<LatLng, SiteError> {
        let (lat, lng) = match self.coordinates {
            Some(Coordinates {
                lat: Some(lat),
                lng: Some(lng),
            }) => (lat, lng),
            _ => return Err(SiteError::MissingCoordinates),
        };
        if !lat.is_finite() || !lng.is_finite() {
            return Err(SiteError::NonFinite { lat, lng });
        }
        if lat.abs() > 90.0 || lng.abs() > 180.0 {
            return Err(SiteError::OutOfRange { lat, lng });
        }
        Ok(LatLng::new(lat, lng))
    }
}

/// Accept a JSON number or a numeric string; anything else becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Snapshot of the sites currently passing the external filters.
///
/// Sites are shared with the data layer; markers hold back-references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredSiteSet {
    sites: Vec<Rc<Site>>,
}

impl FilteredSiteSet {
    pub fn new(sites: Vec<Rc<Site>>) -> Self {
        Self { sites }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<Site>> {
        self.sites.iter()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl FromIterator<Site> for FilteredSiteSet {
    fn from_iter<I: IntoIterator<Item = Site>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Rc::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::site;

    #[test]
    fn test_location_valid() {
        let s = site("karnak", 25.7188, 32.6573, "Ancient Egyptian");
        assert_eq!(s.location(), Ok(LatLng::new(25.7188, 32.6573)));
    }

    #[test]
    fn test_location_missing() {
        let mut s = site("x", 0.0, 0.0, "Roman");
        s.coordinates = None;
        assert_eq!(s.location(), Err(SiteError::MissingCoordinates));

        s.coordinates = Some(Coordinates {
            lat: Some(30.0),
            lng: None,
        });
        assert_eq!(s.location(), Err(SiteError::MissingCoordinates));
    }

    #[test]
    fn test_location_nan() {
        let s = site("x", f64::NAN, 31.0, "Roman");
        assert!(matches!(s.location(), Err(SiteError::NonFinite { .. })));
    }

    #[test]
    fn test_location_out_of_range() {
        let s = site("x", 95.0, 31.0, "Roman");
        assert!(matches!(s.location(), Err(SiteError::OutOfRange { .. })));
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "philae",
            "displayName": "Temple of Isis at Philae",
            "coordinates": { "lat": 24.0255, "lng": 32.8844 },
            "period": "Ptolemaic",
            "dateRange": { "start": -380, "end": 550 },
            "thumbnailUrl": "/media/philae.jpg"
        }"#;
        let s: Site = serde_json::from_str(json).unwrap();
        assert_eq!(s.display_name, "Temple of Isis at Philae");
        assert_eq!(s.date_range, DateRange { start: -380, end: 550 });
        assert_eq!(s.location(), Ok(LatLng::new(24.0255, 32.8844)));
    }

    #[test]
    fn test_deserialize_lenient_coordinates() {
        let json = r#"{
            "id": "a", "displayName": "A", "period": "Roman",
            "coordinates": { "lat": "29.97", "lng": "n/a" }
        }"#;
        let s: Site = serde_json::from_str(json).unwrap();
        let coords = s.coordinates.unwrap();
        assert_eq!(coords.lat, Some(29.97));
        assert_eq!(coords.lng, None);
        assert_eq!(s.location(), Err(SiteError::MissingCoordinates));
    }

    #[test]
    fn test_deserialize_without_coordinates() {
        let json = r#"{ "id": "a", "displayName": "A", "period": "Roman" }"#;
        let s: Site = serde_json::from_str(json).unwrap();
        assert!(s.coordinates.is_none());
        assert_eq!(s.thumbnail_url, "");
    }

    #[test]
    fn test_site_set_from_iter() {
        let set: FilteredSiteSet = vec![
            site("a", 1.0, 1.0, "Roman"),
            site("b", 2.0, 2.0, "Islamic"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        let ids: Vec<_> = set.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
