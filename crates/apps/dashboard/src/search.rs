//! Command-palette style city search.
//!
//! Pure producer of `(lat, lon)` picks: it never touches the view or the
//! selection itself.

use serde::Serialize;

pub const MAX_RESULTS: usize = 8;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub country: &'static str,
}

const fn city(name: &'static str, lat: f64, lon: f64, country: &'static str) -> City {
    City {
        name,
        lat,
        lon,
        country,
    }
}

pub const CITIES: &[City] = &[
    city("New York", 40.7, -74.0, "US"),
    city("London", 51.5, -0.1, "UK"),
    city("Tokyo", 35.7, 139.7, "JP"),
    city("Beijing", 39.9, 116.4, "CN"),
    city("Moscow", 55.8, 37.6, "RU"),
    city("Baghdad", 33.3, 44.4, "IQ"),
    city("Kyiv", 50.4, 30.5, "UA"),
    city("Jerusalem", 31.8, 35.2, "IL"),
    city("Taipei", 25.0, 121.5, "TW"),
    city("Kabul", 34.5, 69.2, "AF"),
    city("Khartoum", 15.6, 32.5, "SD"),
    city("Mogadishu", 2.0, 45.3, "SO"),
    city("Caracas", 10.5, -66.9, "VE"),
    city("Mexico City", 19.4, -99.1, "MX"),
    city("Washington DC", 38.9, -77.0, "US"),
    city("Paris", 48.9, 2.3, "FR"),
    city("Berlin", 52.5, 13.4, "DE"),
    city("Tehran", 35.7, 51.4, "IR"),
    city("Riyadh", 24.7, 46.7, "SA"),
    city("Mumbai", 19.1, 72.9, "IN"),
    city("Seoul", 37.6, 127.0, "KR"),
    city("Sydney", -33.9, 151.2, "AU"),
    city("São Paulo", -23.6, -46.6, "BR"),
    city("Cairo", 30.0, 31.2, "EG"),
    city("Nairobi", -1.3, 36.8, "KE"),
];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    /// Ctrl+K or Cmd+K.
    Palette,
    Escape,
}

impl Key {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ctrl+k" | "cmd+k" | "meta+k" => Some(Key::Palette),
            "escape" | "esc" => Some(Key::Escape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSurface {
    open: bool,
    query: String,
}

impl SearchSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn on_key(&mut self, key: Key) {
        match key {
            Key::Palette => self.open = true,
            Key::Escape => {
                self.open = false;
                self.query.clear();
            }
        }
    }

    /// Typing only lands while the surface is open.
    pub fn set_query(&mut self, query: &str) -> bool {
        if !self.open {
            return false;
        }
        self.query = query.to_string();
        true
    }

    /// Case-insensitive substring match on name or country code, capped at
    /// [`MAX_RESULTS`]. An empty query matches nothing.
    pub fn results(&self) -> Vec<City> {
        matching_cities(&self.query)
    }

    /// Picks result `index`, then closes and clears.
    pub fn choose(&mut self, index: usize) -> Option<City> {
        let city = self.results().get(index).copied()?;
        self.open = false;
        self.query.clear();
        Some(city)
    }
}

pub fn matching_cities(query: &str) -> Vec<City> {
    if query.is_empty() {
        return Vec::new();
    }
    let q = query.to_lowercase();
    CITIES
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&q) || c.country.to_lowercase().contains(&q))
        .take(MAX_RESULTS)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{CITIES, Key, SearchSurface, matching_cities};

    #[test]
    fn catalog_has_twenty_five_cities() {
        assert_eq!(CITIES.len(), 25);
    }

    #[test]
    fn matches_name_or_country_case_insensitively() {
        let names: Vec<&str> = matching_cities("us").iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["New York", "Washington DC"]);
        let names: Vec<&str> = matching_cities("KYI").iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Kyiv"]);
        assert!(matching_cities("").is_empty());
    }

    #[test]
    fn results_are_capped() {
        assert_eq!(matching_cities("a").len(), 8);
    }

    #[test]
    fn palette_key_opens_and_escape_clears() {
        let mut s = SearchSurface::new();
        assert!(!s.set_query("kyiv"));
        s.on_key(Key::parse("Ctrl+K").unwrap());
        assert!(s.is_open());
        assert!(s.set_query("kyiv"));
        s.on_key(Key::Escape);
        assert!(!s.is_open());
        assert_eq!(s.query(), "");
    }

    #[test]
    fn choosing_closes_and_clears() {
        let mut s = SearchSurface::new();
        s.on_key(Key::Palette);
        s.set_query("bagh");
        let city = s.choose(0).unwrap();
        assert_eq!((city.lat, city.lon), (33.3, 44.4));
        assert!(!s.is_open());
        assert!(s.results().is_empty());
        assert!(s.choose(0).is_none());
    }
}
