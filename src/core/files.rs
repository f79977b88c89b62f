//! Conventional file set of one converted extract
//!
//! The graph builder picks its inputs up from a directory holding
//! `ways.bin`, `way_nodes.bin` and optionally `nodes.bin`.

use std::path::{Path, PathBuf};

use log::info;

use super::array::RecordArray;
use super::error::Result;
use super::io::IoOptions;
use super::node::OsmNode;
use super::record::Record;
use super::way::OsmWay;
use super::way_node::OsmWayNode;

#[derive(Debug, Clone)]
pub struct OsmDataFiles {
    dir: PathBuf,
    options: IoOptions,
}

impl OsmDataFiles {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self::with_options(dir, IoOptions::default())
    }

    pub fn with_options<P: Into<PathBuf>>(dir: P, options: IoOptions) -> Self {
        Self {
            dir: dir.into(),
            options,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding records of type `T`.
    pub fn path_for<T: Record>(&self) -> PathBuf {
        self.dir.join(T::FILE_NAME)
    }

    pub fn ways_path(&self) -> PathBuf {
        self.path_for::<OsmWay>()
    }

    pub fn way_nodes_path(&self) -> PathBuf {
        self.path_for::<OsmWayNode>()
    }

    pub fn nodes_path(&self) -> PathBuf {
        self.path_for::<OsmNode>()
    }

    /// Write a whole array to its conventional file.
    pub fn write<T: Record>(&self, records: &RecordArray<T>) -> Result<()> {
        records.export_with(records.len(), self.path_for::<T>(), &self.options)
    }

    pub fn read<T: Record>(&self) -> Result<RecordArray<T>> {
        RecordArray::import(self.path_for::<T>())
    }

    pub fn write_ways(&self, ways: &RecordArray<OsmWay>) -> Result<()> {
        self.write(ways)
    }

    pub fn write_way_nodes(&self, way_nodes: &RecordArray<OsmWayNode>) -> Result<()> {
        self.write(way_nodes)
    }

    pub fn write_nodes(&self, nodes: &RecordArray<OsmNode>) -> Result<()> {
        self.write(nodes)
    }

    pub fn read_ways(&self) -> Result<RecordArray<OsmWay>> {
        self.read()
    }

    pub fn read_way_nodes(&self) -> Result<RecordArray<OsmWayNode>> {
        self.read()
    }

    pub fn read_nodes(&self) -> Result<RecordArray<OsmNode>> {
        self.read()
    }

    /// Write ways and way nodes side by side.
    pub fn write_network(
        &self,
        ways: &RecordArray<OsmWay>,
        way_nodes: &RecordArray<OsmWayNode>,
    ) -> Result<()> {
        let (ways_result, way_nodes_result) =
            rayon::join(|| self.write_ways(ways), || self.write_way_nodes(way_nodes));
        ways_result?;
        way_nodes_result?;

        info!(
            "wrote {} ways and {} way nodes to {}",
            ways.len(),
            way_nodes.len(),
            self.dir.display()
        );
        Ok(())
    }

    pub fn read_network(&self) -> Result<(RecordArray<OsmWay>, RecordArray<OsmWayNode>)> {
        let (ways, way_nodes) = rayon::join(|| self.read_ways(), || self.read_way_nodes());
        Ok((ways?, way_nodes?))
    }
}
