//! Node record (`OSMNode`)
//!
//! Layout (48 bytes, align 8):
//!
//! | offset | storage | content                                   |
//! |--------|---------|-------------------------------------------|
//! | 0      | u64     | id                                        |
//! | 8      | u64     | [`NodeLabels`]                            |
//! | 16     | u64     | [`NodeControls`]                          |
//! | 24     | u32     | [`NodeTopology`]                          |
//! | 28     | u32     | bss_info                                  |
//! | 32     | u32     | linguistic_info_index                     |
//! | 36     | u32     | lng7                                      |
//! | 40     | u32     | lat7                                      |
//! | 44     | u32     | tail padding, always zero                 |

use bytemuck::{Pod, Zeroable};

use super::bits::bit_group;
use super::coords::Coord7;
use super::record::Record;

/// Access mask given to nodes built by [`OsmNode::at`]: every mode bit but the
/// highest of the 12.
pub const DEFAULT_NODE_ACCESS: u16 = 2047;

bit_group! {
    /// String-table offsets of the node's name, ref and exit_to texts.
    pub struct NodeLabels(u64) {
        name_index, set_name_index: u32 = 0, 21;
        ref_index, set_ref_index: u32 = 21, 21;
        exit_to_index, set_exit_to_index: u32 = 42, 21;
        named_intersection, set_named_intersection: bool = 63, 1;
    }
}

bit_group! {
    /// Administrative indices and traffic-control markers.
    pub struct NodeControls(u64, spare = 11) {
        country_iso_index, set_country_iso_index: u32 = 0, 21;
        state_iso_index, set_state_iso_index: u32 = 21, 21;
        traffic_signal, set_traffic_signal: bool = 42, 1;
        forward_signal, set_forward_signal: bool = 43, 1;
        backward_signal, set_backward_signal: bool = 44, 1;
        stop_sign, set_stop_sign: bool = 45, 1;
        forward_stop, set_forward_stop: bool = 46, 1;
        backward_stop, set_backward_stop: bool = 47, 1;
        yield_sign, set_yield_sign: bool = 48, 1;
        forward_yield, set_forward_yield: bool = 49, 1;
        backward_yield, set_backward_yield: bool = 50, 1;
        minor, set_minor: bool = 51, 1;
        direction, set_direction: bool = 52, 1;
    }
}

bit_group! {
    /// Access mask, node type and intersection topology flags.
    pub struct NodeTopology(u32, spare = 5) {
        /// Mode-of-travel permission bits.
        access, set_access: u16 = 0, 12;
        node_type, set_node_type: u8 = 12, 4;
        intersection, set_intersection: bool = 16, 1;
        non_link_edge, set_non_link_edge: bool = 17, 1;
        link_edge, set_link_edge: bool = 18, 1;
        /// Link edge shorter than the consumer's internal-edge limit.
        shortlink, set_shortlink: bool = 19, 1;
        non_ferry_edge, set_non_ferry_edge: bool = 20, 1;
        ferry_edge, set_ferry_edge: bool = 21, 1;
        /// Node on a section of a way that doubles back on itself.
        flat_loop, set_flat_loop: bool = 22, 1;
        urban, set_urban: bool = 23, 1;
        tagged_access, set_tagged_access: bool = 24, 1;
        private_access, set_private_access: bool = 25, 1;
        cash_only_toll, set_cash_only_toll: bool = 26, 1;
    }
}

/// A geographic point with its routing attributes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct OsmNode {
    pub id: u64,
    pub labels: NodeLabels,
    pub controls: NodeControls,
    pub topology: NodeTopology,
    pub bss_info: u32,
    pub linguistic_info_index: u32,
    /// Longitude, `(degrees + 180) * 1e7`.
    pub lng7: u32,
    /// Latitude, `(degrees + 90) * 1e7`.
    pub lat7: u32,
    padding: u32,
}

impl OsmNode {
    /// Node with only identity, position and intersection flag set, and the
    /// [`DEFAULT_NODE_ACCESS`] mask. Everything else is zero.
    pub fn at(id: u64, coord: Coord7, intersection: bool) -> Self {
        let mut node = Self::zeroed();
        node.id = id;
        node.set_coord(coord);
        node.topology.set_intersection(intersection);
        node.topology.set_access(DEFAULT_NODE_ACCESS);
        node
    }

    pub fn coord(&self) -> Coord7 {
        Coord7::from_raw(self.lng7, self.lat7)
    }

    pub fn set_coord(&mut self, coord: Coord7) {
        self.lng7 = coord.lng7;
        self.lat7 = coord.lat7;
    }
}

impl Record for OsmNode {
    const NAME: &'static str = "node";
    const FILE_NAME: &'static str = "nodes.bin";
}

const _: () = assert!(std::mem::size_of::<OsmNode>() == 48);
const _: () = assert!(std::mem::align_of::<OsmNode>() == 8);
