//! Geographic reference data models

use serde::{Deserialize, Serialize};

/// The seven fixed climate zones a city can belong to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClimateZone {
    Marmara,
    Aegean,
    Mediterranean,
    BlackSea,
    CentralAnatolia,
    EasternAnatolia,
    SoutheastAnatolia,
}

impl ClimateZone {
    /// Human-readable zone name used in explanations and summaries
    pub fn name(&self) -> &'static str {
        match self {
            ClimateZone::Marmara => "Marmara",
            ClimateZone::Aegean => "Aegean",
            ClimateZone::Mediterranean => "Mediterranean",
            ClimateZone::BlackSea => "Black Sea",
            ClimateZone::CentralAnatolia => "Central Anatolia",
            ClimateZone::EasternAnatolia => "Eastern Anatolia",
            ClimateZone::SoutheastAnatolia => "Southeast Anatolia",
        }
    }

    /// Continental/highland zone with hard winter-snow constraints
    pub fn is_continental_highland(&self) -> bool {
        matches!(self, ClimateZone::EasternAnatolia)
    }
}

impl std::fmt::Display for ClimateZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Static per-city reference record
///
/// The catalog holding these is populated once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoCity {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    pub climate_zone: ClimateZone,
    pub population: u64,
    pub is_tourism_city: bool,
}

/// Population tier used by the traffic impact factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PopulationTier {
    Standard,
    OverOneMillion,
    OverTwoMillion,
    OverFiveMillion,
}

impl PopulationTier {
    pub fn of(population: u64) -> Self {
        if population > 5_000_000 {
            PopulationTier::OverFiveMillion
        } else if population > 2_000_000 {
            PopulationTier::OverTwoMillion
        } else if population > 1_000_000 {
            PopulationTier::OverOneMillion
        } else {
            PopulationTier::Standard
        }
    }
}
