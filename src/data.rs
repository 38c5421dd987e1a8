use self::osm::{Node, NodeId, Way, WayId};

pub mod attributes;
pub mod osm;
pub mod summary;

/// Nodes and ways parsed from an .osm file, in the order their elements closed.
///
/// Immutable once built. Lookups by id scan linearly; callers that need many
/// of them should build their own index.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OsmMap {
    pub(crate) nodes: Vec<Node>,
    pub(crate) ways: Vec<Way>,
}

/// Read-only query contract consumed by routing code.
pub trait StreetMap {
    fn node_count(&self) -> usize;
    fn way_count(&self) -> usize;
    fn node_by_index(&self, index: usize) -> Option<&Node>;
    fn node_by_id(&self, id: NodeId) -> Option<&Node>;
    fn way_by_index(&self, index: usize) -> Option<&Way>;
    fn way_by_id(&self, id: WayId) -> Option<&Way>;
}

impl OsmMap {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn ways(&self) -> &[Way] {
        &self.ways
    }
}

impl StreetMap for OsmMap {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn way_count(&self) -> usize {
        self.ways.len()
    }

    fn node_by_index(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    fn way_by_index(&self, index: usize) -> Option<&Way> {
        self.ways.get(index)
    }

    fn way_by_id(&self, id: WayId) -> Option<&Way> {
        self.ways.iter().find(|way| way.id == id)
    }
}
