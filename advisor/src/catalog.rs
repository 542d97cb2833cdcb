//! Static geography catalog
//!
//! Per-city latitude/longitude/elevation/climate-zone/population reference
//! data. Populated once at startup and never mutated; concurrent reads need
//! no locking.

use std::collections::HashMap;

use shared::{ClimateZone, GeoCity};

/// Cities with weekend/summer tourism traffic patterns
const TOURISM_CITIES: &[&str] = &["Antalya", "Mersin", "Adana", "Muğla", "Aydın", "İzmir"];

/// Read-only catalog of cities, keyed by name
#[derive(Debug, Clone)]
pub struct GeographyCatalog {
    cities: HashMap<String, GeoCity>,
}

impl GeographyCatalog {
    /// Build a catalog from an explicit city list (used by tests and
    /// embedders with their own reference data)
    pub fn from_cities(cities: Vec<GeoCity>) -> Self {
        let cities = cities.into_iter().map(|c| (c.name.clone(), c)).collect();
        Self { cities }
    }

    /// The built-in catalog of Turkish cities
    pub fn builtin() -> Self {
        use ClimateZone::*;

        let mut cities = Vec::new();
        let mut add = |name: &str, lat: f64, lon: f64, elev: f64, zone: ClimateZone, pop: u64| {
            cities.push(GeoCity {
                name: name.to_string(),
                latitude: lat,
                longitude: lon,
                elevation_m: elev,
                climate_zone: zone,
                population: pop,
                is_tourism_city: TOURISM_CITIES.contains(&name),
            });
        };

        // Marmara
        add("İstanbul", 41.0082, 28.9784, 100.0, Marmara, 15_520_000);
        add("Bursa", 40.1885, 29.0610, 100.0, Marmara, 3_101_833);
        add("Kocaeli", 40.8533, 29.8815, 100.0, Marmara, 1_994_442);
        add("Tekirdağ", 40.9780, 27.5110, 28.0, Marmara, 1_111_915);
        add("Edirne", 41.6771, 26.5557, 42.0, Marmara, 411_528);
        add("Çanakkale", 40.1553, 26.4142, 2.0, Marmara, 540_662);

        // Central Anatolia
        add("Ankara", 39.9334, 32.8597, 938.0, CentralAnatolia, 5_639_076);
        add("Konya", 37.8667, 32.4833, 1016.0, CentralAnatolia, 2_232_374);
        add("Kayseri", 38.7205, 35.4826, 1050.0, CentralAnatolia, 1_404_276);
        add("Sivas", 39.7477, 37.0179, 1285.0, CentralAnatolia, 638_956);
        add("Nevşehir", 38.6244, 34.7236, 1224.0, CentralAnatolia, 303_010);

        // Eastern Anatolia
        add("Kars", 40.6013, 43.0975, 1768.0, EasternAnatolia, 284_923);
        add("Erzurum", 39.9055, 41.2658, 1756.0, EasternAnatolia, 762_321);
        add("Van", 38.4891, 43.4089, 1727.0, EasternAnatolia, 1_148_637);
        add("Ağrı", 39.7191, 43.0503, 1646.0, EasternAnatolia, 536_199);

        // Black Sea
        add("Trabzon", 41.0015, 39.7178, 0.0, BlackSea, 811_901);
        add("Rize", 41.0201, 40.5234, 5.0, BlackSea, 344_359);
        add("Ordu", 40.9839, 37.8764, 5.0, BlackSea, 761_165);

        // Mediterranean
        add("Antalya", 36.8969, 30.7133, 30.0, Mediterranean, 2_548_308);
        add("Mersin", 36.8000, 34.6333, 10.0, Mediterranean, 1_854_472);
        add("Adana", 37.0000, 35.3213, 23.0, Mediterranean, 2_258_718);
        add("Hatay", 36.2021, 36.1600, 89.0, Mediterranean, 1_658_400);

        // Southeast Anatolia
        add("Diyarbakır", 37.9144, 40.2306, 660.0, SoutheastAnatolia, 1_754_247);
        add("Gaziantep", 37.0662, 37.3833, 838.0, SoutheastAnatolia, 2_130_254);
        add("Şanlıurfa", 37.1674, 38.7955, 518.0, SoutheastAnatolia, 2_143_020);
        add("Mardin", 37.3212, 40.7245, 660.0, SoutheastAnatolia, 854_716);

        // Aegean
        add("İzmir", 38.4192, 27.1287, 25.0, Aegean, 4_367_251);
        add("Muğla", 37.2154, 28.3636, 2.0, Aegean, 1_008_567);
        add("Aydın", 37.8561, 27.8413, 65.0, Aegean, 1_110_972);
        add("Manisa", 38.6191, 27.4289, 71.0, Aegean, 1_443_426);
        add("Denizli", 37.7765, 29.0864, 354.0, Aegean, 1_055_562);

        Self::from_cities(cities)
    }

    /// Look up a city, tolerating case differences
    pub fn get(&self, name: &str) -> Option<&GeoCity> {
        if let Some(city) = self.cities.get(name) {
            return Some(city);
        }
        let wanted = name.to_lowercase();
        self.cities
            .values()
            .find(|c| c.name.to_lowercase() == wanted)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Iterate all cities (synthetic training grid, diagnostics)
    pub fn iter(&self) -> impl Iterator<Item = &GeoCity> {
        self.cities.values()
    }
}
