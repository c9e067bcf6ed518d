use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;

pub const DEFAULT_CITY: &str = "Lahore";
const DEFAULT_MARKER: MapMarker = MapMarker {
    lat: 31.5204,
    lon: 74.3587,
};

lazy_static! {
    static ref CITY_COORDINATES: HashMap<&'static str, (f64, f64)> = {
        let mut cities = HashMap::new();
        cities.insert("lahore", (31.5204, 74.3587));
        cities.insert("karachi", (24.8607, 67.0011));
        cities.insert("islamabad", (33.6844, 73.0479));
        cities
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationInsight {
    pub city: String,
    pub headline: String,
    pub markers: Vec<MapMarker>,
}

pub fn insights(city: Option<&str>) -> LocationInsight {
    let city = city
        .map(str::trim)
        .filter(|city| !city.is_empty())
        .unwrap_or(DEFAULT_CITY);

    let marker = CITY_COORDINATES
        .get(city.to_lowercase().as_str())
        .map(|&(lat, lon)| MapMarker { lat, lon })
        .unwrap_or(DEFAULT_MARKER);

    LocationInsight {
        city: city.to_string(),
        headline: format!("Insights for {city}"),
        markers: vec![marker],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_lahore() {
        let insight = insights(None);
        assert_eq!(insight.city, "Lahore");
        assert_eq!(insight.markers, vec![MapMarker { lat: 31.5204, lon: 74.3587 }]);
    }

    #[test]
    fn known_city_is_case_insensitive() {
        let insight = insights(Some("KARACHI"));
        assert_eq!(insight.city, "KARACHI");
        assert_eq!(insight.markers[0].lat, 24.8607);
    }

    #[test]
    fn unknown_city_keeps_name_with_default_marker() {
        let insight = insights(Some("Multan"));
        assert_eq!(insight.headline, "Insights for Multan");
        assert_eq!(insight.markers[0].lon, 74.3587);
    }
}
