use super::attributes::Attributes;

pub type NodeId = u64;
pub type WayId = u64;

/// Returned by [`Way::node_id`] for an index past the end of the way.
pub const INVALID_NODE_ID: NodeId = NodeId::MAX;

/// Latitude/longitude pair, stored exactly as it appeared in the source.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Location {
        Location { lat, lon }
    }
}

/// Read-only surface shared by nodes and ways.
///
/// Key lookups return an empty string rather than failing when the index or
/// key is absent.
pub trait MapElement {
    fn attributes(&self) -> &Attributes;

    fn attribute_count(&self) -> usize {
        self.attributes().len()
    }

    fn attribute_key(&self, index: usize) -> &str {
        self.attributes().key_at(index).unwrap_or("")
    }

    fn has_attribute(&self, key: &str) -> bool {
        self.attributes().contains_key(key)
    }

    fn attribute(&self, key: &str) -> &str {
        self.attributes().get(key).unwrap_or("")
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) location: Location,
    pub(crate) attributes: Attributes,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

impl MapElement for Node {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Way {
    pub(crate) id: WayId,
    pub(crate) node_ids: Vec<NodeId>,
    pub(crate) attributes: Attributes,
}

impl Way {
    pub fn id(&self) -> WayId {
        self.id
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn node_id(&self, index: usize) -> NodeId {
        self.node_ids.get(index).copied().unwrap_or(INVALID_NODE_ID)
    }

    /// Referenced node ids in path order. Repeats and ids with no matching
    /// node are kept as-is.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }
}

impl MapElement for Way {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}
