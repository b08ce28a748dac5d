use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::models::city::City;

const BUNDLED_CITIES: &str = include_str!("../../data/cities.json");

/// Filters of GET /api/search/cities; blank values are ignored
#[derive(Debug, Default, Deserialize)]
pub struct CityQuery {
    pub q: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CitySearchResult<'a> {
    pub cities: Vec<&'a City>,
    pub countries: &'a [String],
    pub regions: &'a [String],
}

/// The static city list, loaded once at start-up and shared read-only.
/// Searches are a linear scan; the list is small.
#[derive(Debug)]
pub struct CityCatalog {
    cities: Vec<City>,
    countries: Vec<String>,
    regions: Vec<String>,
}

impl CityCatalog {
    pub fn bundled() -> Result<Self, AppError> {
        Self::from_json(BUNDLED_CITIES)
    }

    pub async fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::internal(format!("cannot read city catalog {}: {e}", path.display()))
        })?;
        let catalog = Self::from_json(&raw)?;
        info!(path = %path.display(), cities = catalog.len(), "loaded city catalog");
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let cities: Vec<City> = serde_json::from_str(raw)
            .map_err(|e| AppError::internal(format!("invalid city catalog: {e}")))?;
        Ok(Self::new(cities))
    }

    pub fn new(cities: Vec<City>) -> Self {
        let countries = distinct(cities.iter().map(|c| c.country.as_str()));
        let regions = distinct(cities.iter().map(|c| c.region.as_str()));
        Self { cities, countries, regions }
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn find(&self, id: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.id == id)
    }

    /// `q` is a case-insensitive substring of the name or the country;
    /// `country` and `region` must match exactly, ignoring case.
    pub fn search(&self, query: &CityQuery) -> CitySearchResult<'_> {
        let needle = normalized(query.q.as_deref());
        let country = normalized(query.country.as_deref());
        let region = normalized(query.region.as_deref());

        let cities = self
            .cities
            .iter()
            .filter(|city| {
                needle.as_deref().is_none_or(|q| {
                    city.name.to_lowercase().contains(q) || city.country.to_lowercase().contains(q)
                })
            })
            .filter(|city| country.as_deref().is_none_or(|c| city.country.to_lowercase() == c))
            .filter(|city| region.as_deref().is_none_or(|r| city.region.to_lowercase() == r))
            .collect();

        CitySearchResult {
            cities,
            countries: &self.countries,
            regions: &self.regions,
        }
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
