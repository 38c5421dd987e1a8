//! Streaming OpenStreetMap XML parser producing an in-memory graph of nodes
//! and ways.
//!
//! ```
//! use osm_street_map::{MapElement, OsmMap, StreetMap};
//!
//! let xml = r#"<osm><node id="1" lat="12.34" lon="56.78"><tag k="name" v="TestNode"/></node></osm>"#;
//! let map = OsmMap::from_reader(xml.as_bytes())?;
//! assert_eq!(map.node_by_id(1).map(|node| node.attribute("name")), Some("TestNode"));
//! # Ok::<(), osm_street_map::Error>(())
//! ```

pub mod builder;
pub mod config;
pub mod data;
pub mod errors;
pub mod etl;
pub mod xml;

pub use builder::MapBuilder;
pub use data::attributes::Attributes;
pub use data::osm::{Location, MapElement, Node, NodeId, Way, WayId, INVALID_NODE_ID};
pub use data::summary::{Bounds, MapSummary};
pub use data::{OsmMap, StreetMap};
pub use errors::{Error, Result};
pub use xml::{EntityKind, XmlEntity, XmlEntityReader};
