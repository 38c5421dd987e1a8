use serde::{Deserialize, Serialize};

use super::osm::{Location, MapElement};
use super::{OsmMap, StreetMap};

/// Latitude/longitude extent of the nodes in a map.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Bounds {
    fn at(location: Location) -> Bounds {
        Bounds {
            min_lat: location.lat,
            min_lon: location.lon,
            max_lat: location.lat,
            max_lon: location.lon,
        }
    }

    fn include(&mut self, location: Location) {
        self.min_lat = self.min_lat.min(location.lat);
        self.min_lon = self.min_lon.min(location.lon);
        self.max_lat = self.max_lat.max(location.lat);
        self.max_lon = self.max_lon.max(location.lon);
    }
}

/// Counts written next to the parsed map so a run can be inspected without
/// re-parsing the source file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MapSummary {
    pub nodes: usize,
    pub ways: usize,
    pub tagged_nodes: usize,
    pub tagged_ways: usize,
    /// `None` when the map has no node with finite coordinates.
    pub bounds: Option<Bounds>,
}

impl MapSummary {
    pub fn from_map(map: &OsmMap) -> MapSummary {
        let mut bounds: Option<Bounds> = None;
        for node in map.nodes() {
            let location = node.location();
            if !(location.lat.is_finite() && location.lon.is_finite()) {
                continue;
            }
            match &mut bounds {
                Some(existing) => existing.include(location),
                None => bounds = Some(Bounds::at(location)),
            }
        }

        MapSummary {
            nodes: map.node_count(),
            ways: map.way_count(),
            tagged_nodes: map.nodes().iter().filter(|node| node.attribute_count() > 0).count(),
            tagged_ways: map.ways().iter().filter(|way| way.attribute_count() > 0).count(),
            bounds,
        }
    }
}
