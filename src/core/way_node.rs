//! Way-shape-node record (`OSMWayNode`)
//!
//! A node bound to a position in one way's shape: the embedded [`OsmNode`]
//! (48 bytes) followed by `way_index` and `way_shape_node_index`, 56 bytes in
//! total.
//!
//! For any way, the records pointing at it are expected to carry shape indices
//! 0, 1, 2, ... in shape order. Producers keep that ordering; it is not checked
//! here.

use bytemuck::{Pod, Zeroable};

use super::coords::Coord7;
use super::node::OsmNode;
use super::record::Record;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct OsmWayNode {
    pub node: OsmNode,
    /// Position of the owning way in the way array.
    pub way_index: u32,
    /// 0-based position of this node within the way's shape.
    pub way_shape_node_index: u32,
}

impl OsmWayNode {
    pub fn new(way_index: u32, way_shape_node_index: u32, node: OsmNode) -> Self {
        Self {
            node,
            way_index,
            way_shape_node_index,
        }
    }

    /// Shape node carrying a default node, see [`OsmNode::at`].
    pub fn at(
        way_index: u32,
        way_shape_node_index: u32,
        id: u64,
        coord: Coord7,
        intersection: bool,
    ) -> Self {
        Self::new(
            way_index,
            way_shape_node_index,
            OsmNode::at(id, coord, intersection),
        )
    }
}

impl Record for OsmWayNode {
    const NAME: &'static str = "way node";
    const FILE_NAME: &'static str = "way_nodes.bin";
}

const _: () = assert!(std::mem::size_of::<OsmWayNode>() == 56);
