//! Static list of selectable (city, country) pairs.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::Location;

/// Neighbourhoods listed individually but queried through their parent city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityGroup {
    pub parent: String,
    pub country: String,
    pub areas: Vec<String>,
}

impl LocalityGroup {
    pub fn bangalore() -> Self {
        let areas = [
            "Koramangala",
            "Indiranagar",
            "Whitefield",
            "BTM Layout",
            "Electronic City",
            "Hebbal",
            "Marathahalli",
            "HSR Layout",
            "Jayanagar",
            "Rajajinagar",
            "Malleshwaram",
            "Banashankari",
            "Basavanagudi",
            "Yelahanka",
            "Sarjapur",
            "JP Nagar",
        ];

        Self {
            parent: "Bangalore".to_string(),
            country: "India".to_string(),
            areas: areas.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CityRow {
    city: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LocationCatalog {
    entries: Vec<Location>,
    from_fallback: bool,
}

impl LocationCatalog {
    /// Read all city files; falls back to a three-entry list when none yields a row.
    pub fn load(paths: &[PathBuf], localities: &[LocalityGroup]) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for path in paths {
            match read_city_file(path) {
                Ok(rows) => {
                    debug!(path = %path.display(), rows = rows.len(), "loaded city file");
                    for loc in rows {
                        if seen.insert((loc.city.clone(), loc.country.clone())) {
                            entries.push(loc);
                        }
                    }
                }
                Err(err) => warn!(path = %path.display(), error = %err, "skipping city file"),
            }
        }

        if entries.is_empty() {
            warn!("no cities loaded, using built-in fallback list");
            return Self::fallback();
        }

        for group in localities {
            for area in &group.areas {
                if seen.insert((area.clone(), group.country.clone())) {
                    entries.push(Location::locality(area, &group.parent, &group.country));
                }
            }
        }

        Self::from_entries(entries)
    }

    pub fn fallback() -> Self {
        let mut catalog = Self::from_entries(vec![
            Location::new("Delhi", "India"),
            Location::new("Mumbai", "India"),
            Location::new("New York", "United States"),
        ]);
        catalog.from_fallback = true;
        catalog
    }

    pub fn from_entries(mut entries: Vec<Location>) -> Self {
        entries.sort_by(|a, b| a.label.cmp(&b.label));
        Self { entries, from_fallback: false }
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        self.from_fallback
    }

    pub fn find(&self, label: &str) -> Option<&Location> {
        let label = label.trim();
        self.entries.iter().find(|e| same_text(&e.label, label))
    }

    /// Index of `preferred` when present, else the first entry.
    pub fn default_index(&self, preferred: &str) -> usize {
        self.entries.iter().position(|e| e.label == preferred).unwrap_or(0)
    }

    pub fn search(&self, fragment: &str) -> Vec<&Location> {
        let needle = fragment.to_lowercase();
        self.entries.iter().filter(|e| e.label.to_lowercase().contains(&needle)).collect()
    }

    /// Turn user input into a location.
    ///
    /// An exact label wins, then a city name that is unique in the catalog. Anything else
    /// is passed through as a free-form `City, Country` (or bare `City`) query.
    pub fn resolve(&self, input: &str) -> Location {
        if let Some(loc) = self.find(input) {
            return loc.clone();
        }

        let input = input.trim();
        let mut by_city = self.entries.iter().filter(|e| same_text(&e.city, input));
        if let (Some(only), None) = (by_city.next(), by_city.next()) {
            return only.clone();
        }

        match input.split_once(',') {
            Some((city, country)) => Location::new(city.trim(), country.trim()),
            None => Location {
                city: input.to_string(),
                country: String::new(),
                label: input.to_string(),
                query_city: None,
            },
        }
    }
}

/// Case-insensitive comparison that also folds non-ASCII letters.
fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn read_city_file(path: &Path) -> Result<Vec<Location>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open city file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?;
    if !headers.iter().any(|h| h == "city") || !headers.iter().any(|h| h == "country") {
        anyhow::bail!("{} lacks `city`/`country` columns", path.display());
    }

    let mut rows = Vec::new();
    for record in reader.deserialize::<CityRow>() {
        let row = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        if let (Some(city), Some(country)) = (row.city, row.country) {
            let (city, country) = (city.trim(), country.trim());
            if !city.is_empty() && !country.is_empty() {
                rows.push(Location::new(city, country));
            }
        }
    }

    Ok(rows)
}
