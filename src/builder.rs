use std::io::BufRead;
use std::str::FromStr;

use log::{debug, trace};

use crate::data::attributes::Attributes;
use crate::data::osm::{Node, NodeId, Way, WayId};
use crate::data::OsmMap;
use crate::errors::{Error, Result};
use crate::xml::{EntityKind, XmlEntity, XmlEntityReader};

/// Single-pass state machine that turns a flat entity stream into an [`OsmMap`].
///
/// At most one of `current_node` and `current_way` is open at a time. Entities
/// are published only when their end marker arrives.
#[derive(Debug, Default)]
pub struct MapBuilder {
    nodes: Vec<Node>,
    ways: Vec<Way>,
    current_node: Option<Node>,
    current_way: Option<Way>,
}

fn parse_field<T>(element: &str, field: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: ToString,
{
    value
        .parse()
        .map_err(|err| Error::malformed(element, field, value, err))
}

impl MapBuilder {
    pub fn new() -> MapBuilder {
        MapBuilder::default()
    }

    pub fn process(&mut self, entity: &XmlEntity) -> Result<()> {
        match entity.kind {
            EntityKind::Start => self.start_element(entity),
            EntityKind::End => {
                self.end_element(&entity.name);
                Ok(())
            }
            EntityKind::CharData => Ok(()),
        }
    }

    fn start_element(&mut self, entity: &XmlEntity) -> Result<()> {
        match entity.name.as_str() {
            "node" => self.open_node(&entity.attributes)?,
            "way" => self.open_way(&entity.attributes)?,
            "nd" => self.add_node_ref(&entity.attributes)?,
            "tag" => self.add_tag(entity),
            other => trace!(element = other; "Ignoring element"),
        }
        Ok(())
    }

    fn open_node(&mut self, attributes: &[(String, String)]) -> Result<()> {
        let mut node = Node::default();
        for (key, value) in attributes {
            match key.as_str() {
                "id" => node.id = parse_field::<NodeId>("node", "id", value)?,
                "lat" => node.location.lat = parse_field::<f64>("node", "lat", value)?,
                "lon" => node.location.lon = parse_field::<f64>("node", "lon", value)?,
                _ => node.attributes.insert(key.as_str(), value.as_str()),
            }
        }

        if let Some(unclosed) = self.current_node.replace(node) {
            debug!(node_id = unclosed.id; "Discarding unclosed node");
        }
        self.current_way = None;
        Ok(())
    }

    fn open_way(&mut self, attributes: &[(String, String)]) -> Result<()> {
        let mut way = Way::default();
        for (key, value) in attributes {
            match key.as_str() {
                "id" => way.id = parse_field::<WayId>("way", "id", value)?,
                _ => way.attributes.insert(key.as_str(), value.as_str()),
            }
        }

        if let Some(unclosed) = self.current_way.replace(way) {
            debug!(way_id = unclosed.id; "Discarding unclosed way");
        }
        self.current_node = None;
        Ok(())
    }

    fn add_node_ref(&mut self, attributes: &[(String, String)]) -> Result<()> {
        let Some(way) = self.current_way.as_mut() else {
            trace!("Ignoring nd outside of a way");
            return Ok(());
        };
        for (key, value) in attributes {
            if key == "ref" {
                way.node_ids.push(parse_field::<NodeId>("nd", "ref", value)?);
            }
        }
        Ok(())
    }

    fn add_tag(&mut self, entity: &XmlEntity) {
        let key = entity.attribute("k").unwrap_or("");
        let value = entity.attribute("v").unwrap_or("");
        if key.is_empty() {
            trace!("Ignoring tag without a key");
            return;
        }

        let target: Option<&mut Attributes> = match (&mut self.current_node, &mut self.current_way) {
            (Some(node), _) => Some(&mut node.attributes),
            (None, Some(way)) => Some(&mut way.attributes),
            (None, None) => None,
        };
        match target {
            Some(attributes) => attributes.insert(key, value),
            None => trace!(key = key; "Ignoring tag outside of a node or way"),
        }
    }

    fn end_element(&mut self, name: &str) {
        match name {
            "node" => match self.current_node.take() {
                Some(node) => self.nodes.push(node),
                None => trace!("Ignoring stray node end marker"),
            },
            "way" => match self.current_way.take() {
                Some(way) => self.ways.push(way),
                None => trace!("Ignoring stray way end marker"),
            },
            _ => (),
        }
    }

    /// Publishes everything that was closed. Anything still open is dropped.
    pub fn finish(self) -> OsmMap {
        if let Some(node) = &self.current_node {
            debug!(node_id = node.id; "Discarding node left open at end of stream");
        }
        if let Some(way) = &self.current_way {
            debug!(way_id = way.id; "Discarding way left open at end of stream");
        }
        debug!(nodes = self.nodes.len(), ways = self.ways.len(); "Built map");

        OsmMap {
            nodes: self.nodes,
            ways: self.ways,
        }
    }
}

impl OsmMap {
    /// Builds a map from an already tokenized entity stream.
    ///
    /// The first error, from the source or from a malformed numeric field,
    /// aborts the whole build.
    pub fn from_entities<I>(entities: I) -> Result<OsmMap>
    where
        I: IntoIterator<Item = Result<XmlEntity>>,
    {
        let mut builder = MapBuilder::new();
        for entity in entities {
            builder.process(&entity?)?;
        }
        Ok(builder.finish())
    }

    pub fn from_reader<R: BufRead>(source: R) -> Result<OsmMap> {
        OsmMap::from_entities(XmlEntityReader::new(source))
    }
}
