//! # valhalla-osmdata
//!
//! Binary hand-off of converted road-network data to Valhalla's graph builder.
//!
//! The three record types, [`OsmNode`], [`OsmWay`] and [`OsmWayNode`], have
//! exactly the byte layout of the builder's `OSMNode`, `OSMWay` and
//! `OSMWayNode` structs. Arrays of them are written to disk as raw bytes and
//! read back (or memory-mapped) without any decode step.
//!
//! ## Features
//!
//! - **Byte-exact records**: sizes, offsets and bit-field positions are checked
//!   at compile time
//! - **Typed bit fields**: packed words are exposed only through per-field
//!   getters and setters
//! - **Checked lifecycle**: bounds-checked accessors, size-checked imports and
//!   distinct open/write/corruption errors
//! - **Default profiles**: complete pedestrian ways and shape nodes from the few
//!   fields a converter knows
//! - **C ABI**: optional `osmway_*`/`osmnode_*`/`osmwaynode_*` functions behind
//!   the `c-bindings` feature
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use valhalla_osmdata::{Coord7, OsmDataFiles, OsmWay, OsmWayNode, RecordArray};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut ways = RecordArray::<OsmWay>::allocate(1);
//!     ways.set_pedestrian(0, 1, 0, 2)?;
//!
//!     let mut way_nodes = RecordArray::<OsmWayNode>::allocate(2);
//!     way_nodes.set_at(0, 0, 0, 10, Coord7::from_degrees(7.4246, 43.7384)?, true)?;
//!     way_nodes.set_at(1, 0, 1, 11, Coord7::from_degrees(7.4268, 43.7403)?, true)?;
//!
//!     let files = OsmDataFiles::new("./out");
//!     files.write_network(&ways, &way_nodes)?;
//!
//!     let (ways, way_nodes) = files.read_network()?;
//!     assert_eq!(ways.len(), 1);
//!     assert_eq!(way_nodes.node(1)?.id, 11);
//!     Ok(())
//! }
//! ```

pub use crate::core::array::RecordArray;
pub use crate::core::bits::BitField;
pub use crate::core::coords::Coord7;
pub use crate::core::error::{Error, Result};
pub use crate::core::files::OsmDataFiles;
pub use crate::core::io::{
    export_many, export_records, import_records, write_records, IoOptions, OverwriteBehavior,
};
pub use crate::core::mapped::MappedRecords;
pub use crate::core::node::{NodeControls, NodeLabels, NodeTopology, OsmNode, DEFAULT_NODE_ACCESS};
pub use crate::core::record::Record;
pub use crate::core::way::{
    OsmWay, TravelModes, WayAccess, WayAttributes, WayBikeAttributes, WayClassification,
    DEFAULT_SPEED_KPH, ROAD_CLASS_SERVICE_OTHER, SURFACE_COMPACTED, USE_FOOTWAY,
};
pub use crate::core::way_node::OsmWayNode;

// Internal modules
mod core;

// C-compatible FFI bindings (optional)
#[cfg(feature = "c-bindings")]
pub mod ffi;
