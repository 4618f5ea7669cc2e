//! City name to coordinate lookup.
//!
//! Uses the `cities` crate, an offline database of 10,000+ cities worldwide,
//! so resolving a city never touches the network.

use crate::logger::Log;

/// Alternatives listed when a bare city name is ambiguous.
const MAX_LISTED_ALTERNATIVES: usize = 5;

/// Coordinates returned by a geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Display name of the matched place, such as `"Bristol, United Kingdom"`.
    pub name: Option<String>,
}

/// Resolves a free-form city name to coordinates.
#[cfg_attr(test, mockall::automock)]
pub trait Geocoder {
    /// `None` when no city matches.
    fn resolve(&self, city_name: &str) -> Option<GeoPoint>;
}

/// Represents a city with its geographic information
#[derive(Debug, Clone)]
pub struct CityInfo {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CityInfo {
    /// `"City, Country"`
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Cities matching a query, in database order.
#[derive(Debug)]
pub struct CityMatches<'a> {
    pub candidates: Vec<&'a CityInfo>,
    /// Country part of the query that matched none of the candidates.
    pub unmatched_country: Option<String>,
}

/// Geocoder backed by the bundled city database.
///
/// Accepts `"City"` or `"City, Country"`. The country part matches either a
/// full country name or one of a few common abbreviations. An ambiguous name
/// resolves to the first match and the alternatives are reported.
pub struct CityDatabase {
    cities: Vec<CityInfo>,
}

impl CityDatabase {
    pub fn new() -> Self {
        Self::from_cities(get_all_cities())
    }

    /// Build a database over an explicit city list.
    pub fn from_cities(cities: Vec<CityInfo>) -> Self {
        Self { cities }
    }

    /// Every city whose name matches `query`, narrowed by country when one is
    /// given and it matches at least one of them.
    pub fn find(&self, query: &str) -> CityMatches<'_> {
        let (name, country) = split_query(query);
        let by_name: Vec<&CityInfo> = if name.is_empty() {
            Vec::new()
        } else {
            self.cities
                .iter()
                .filter(|city| city.name.to_lowercase() == name)
                .collect()
        };

        let Some(country) = country else {
            return CityMatches {
                candidates: by_name,
                unmatched_country: None,
            };
        };

        let wanted = expand_country_alias(&country);
        let narrowed: Vec<&CityInfo> = by_name
            .iter()
            .copied()
            .filter(|city| {
                let candidate = city.country.to_lowercase();
                candidate == wanted || candidate.contains(&wanted)
            })
            .collect();

        if narrowed.is_empty() {
            CityMatches {
                candidates: by_name,
                unmatched_country: Some(country),
            }
        } else {
            CityMatches {
                candidates: narrowed,
                unmatched_country: None,
            }
        }
    }
}

impl Default for CityDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for CityDatabase {
    fn resolve(&self, city_name: &str) -> Option<GeoPoint> {
        let matches = self.find(city_name);
        let chosen = *matches.candidates.first()?;

        if let Some(country) = &matches.unmatched_country {
            Log::log_warning(&format!(
                "No {} found in \"{}\", using {}",
                chosen.name,
                country,
                chosen.label()
            ));
        }

        if matches.candidates.len() > 1 {
            let alternatives: Vec<String> = matches.candidates[1..]
                .iter()
                .take(MAX_LISTED_ALTERNATIVES)
                .map(|city| city.label())
                .collect();
            let more = matches.candidates.len() - 1 - alternatives.len();

            Log::log_warning(&format!(
                "{} cities match \"{}\", using {}",
                matches.candidates.len(),
                chosen.name,
                chosen.label()
            ));
            Log::log_indented(&format!(
                "Also found: {}{}",
                alternatives.join("; "),
                if more > 0 {
                    format!(" and {} more", more)
                } else {
                    String::new()
                }
            ));
            Log::log_indented(&format!(
                "Use \"{}, <Country>\" to choose another",
                chosen.name
            ));
        }

        Some(GeoPoint {
            latitude: chosen.latitude,
            longitude: chosen.longitude,
            name: Some(chosen.label()),
        })
    }
}

/// Split `"Bristol, UK"` into a lowercase name and optional lowercase country.
fn split_query(query: &str) -> (String, Option<String>) {
    match query.split_once(',') {
        Some((name, country)) => {
            let country = country.trim().to_lowercase();
            (
                name.trim().to_lowercase(),
                if country.is_empty() { None } else { Some(country) },
            )
        }
        None => (query.trim().to_lowercase(), None),
    }
}

fn expand_country_alias(country: &str) -> String {
    match country {
        "uk" | "gb" | "england" | "scotland" | "wales" => "united kingdom".to_string(),
        "us" | "usa" | "america" => "united states".to_string(),
        "uae" => "united arab emirates".to_string(),
        other => other.to_string(),
    }
}

/// Get all cities as a simple list
fn get_all_cities() -> Vec<CityInfo> {
    let iter = IntoIterator::into_iter(cities::all());
    iter.filter_map(|city| {
        // Skip cities with empty names
        if city.city.trim().is_empty() {
            return None;
        }

        Some(CityInfo {
            name: city.city.to_string(),
            country: city.country.to_string(),
            latitude: city.latitude,
            longitude: city.longitude,
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_database() -> CityDatabase {
        let city = |name: &str, country: &str, latitude: f64, longitude: f64| CityInfo {
            name: name.to_string(),
            country: country.to_string(),
            latitude,
            longitude,
        };
        CityDatabase::from_cities(vec![
            city("Valencia", "Philippines", 7.91, 125.09),
            city("Valencia", "Spain", 39.47, -0.38),
            city("Valencia", "Venezuela", 10.16, -68.0),
            city("Bristol", "United States", 41.67, -72.95),
            city("Bristol", "United Kingdom", 51.45, -2.58),
            city("Paris", "France", 48.8566, 2.3522),
        ])
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let db = sample_database();
        let point = db.resolve("  pArIs ").unwrap();
        assert_eq!(point.latitude, 48.8566);
        assert_eq!(point.name.as_deref(), Some("Paris, France"));
    }

    #[test]
    fn test_country_narrows_ambiguous_names() {
        let db = sample_database();
        let point = db.resolve("Bristol, UK").unwrap();
        assert_eq!(point.latitude, 51.45);
        assert_eq!(point.name.as_deref(), Some("Bristol, United Kingdom"));

        let point = db.resolve("Bristol, United States").unwrap();
        assert_eq!(point.latitude, 41.67);

        let matches = db.find("Valencia, Spain");
        assert_eq!(matches.candidates.len(), 1);
        assert!(matches.unmatched_country.is_none());
    }

    #[test]
    fn test_ambiguous_name_reports_chosen_country() {
        Log::set_enabled(false);
        let db = sample_database();

        let matches = db.find("Valencia");
        let countries: Vec<&str> = matches
            .candidates
            .iter()
            .map(|city| city.country.as_str())
            .collect();
        assert_eq!(countries, vec!["Philippines", "Spain", "Venezuela"]);

        // The first match wins and its country is carried into the name
        let point = db.resolve("Valencia").unwrap();
        assert_eq!(point.latitude, 7.91);
        assert_eq!(point.name.as_deref(), Some("Valencia, Philippines"));
    }

    #[test]
    fn test_unknown_country_falls_back_to_name_match() {
        Log::set_enabled(false);
        let db = sample_database();

        let matches = db.find("Paris, Texas");
        assert_eq!(matches.candidates.len(), 1);
        assert_eq!(matches.unmatched_country.as_deref(), Some("texas"));

        let point = db.resolve("Paris, Texas").unwrap();
        assert_eq!(point.name.as_deref(), Some("Paris, France"));
    }

    #[test]
    fn test_unknown_city() {
        let db = sample_database();
        assert!(db.resolve("Atlantis").is_none());
        assert!(db.resolve("").is_none());
        assert!(db.resolve(", France").is_none());
    }

    #[test]
    fn test_bundled_database_is_populated() {
        let db = CityDatabase::new();
        assert!(!db.cities.is_empty());
        assert!(db.cities.iter().all(|c| !c.name.trim().is_empty()));
    }
}
