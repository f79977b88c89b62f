//! Owned, contiguous record arrays
//!
//! [`RecordArray`] is the handle a producer allocates, fills and exports, and
//! what a consumer gets back from an import. It owns its memory outright:
//! export borrows it, import builds a new one, and release consumes it.

use std::path::Path;

use super::coords::Coord7;
use super::error::{Error, Result};
use super::io::{export_records, import_records, IoOptions};
use super::node::OsmNode;
use super::record::Record;
use super::way::OsmWay;
use super::way_node::OsmWayNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordArray<T: Record> {
    records: Vec<T>,
}

impl<T: Record> RecordArray<T> {
    /// Allocate `count` zeroed records.
    ///
    /// Aborts the process if the memory cannot be obtained.
    pub fn allocate(count: usize) -> Self {
        Self {
            records: bytemuck::zeroed_vec(count),
        }
    }

    pub fn from_vec(records: Vec<T>) -> Self {
        Self { records }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.records
    }

    /// Return the memory to the system.
    pub fn release(self) {
        drop(self);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Raw byte image, exactly what [`RecordArray::export`] writes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }

    /// Zero the first `count` records in place.
    pub fn clear(&mut self, count: usize) -> Result<()> {
        if count > self.records.len() {
            return Err(Error::out_of_bounds(count, self.records.len()));
        }
        self.records[..count].fill(T::zeroed());
        Ok(())
    }

    pub fn clear_all(&mut self) {
        self.records.fill(T::zeroed());
    }

    pub fn get(&self, index: usize) -> Result<T> {
        self.records
            .get(index)
            .copied()
            .ok_or_else(|| Error::out_of_bounds(index, self.records.len()))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let count = self.records.len();
        self.records
            .get_mut(index)
            .ok_or_else(|| Error::out_of_bounds(index, count))
    }

    pub fn set(&mut self, index: usize, record: T) -> Result<()> {
        *self.get_mut(index)? = record;
        Ok(())
    }

    /// Write the first `count` records to `path` with default options.
    pub fn export<P: AsRef<Path>>(&self, count: usize, path: P) -> Result<()> {
        self.export_with(count, path, &IoOptions::default())
    }

    pub fn export_with<P: AsRef<Path>>(
        &self,
        count: usize,
        path: P,
        options: &IoOptions,
    ) -> Result<()> {
        let records = self
            .records
            .get(..count)
            .ok_or_else(|| Error::out_of_bounds(count, self.records.len()))?;
        export_records(records, path.as_ref(), options)
    }

    /// Load a whole record file into a new array.
    pub fn import<P: AsRef<Path>>(path: P) -> Result<Self> {
        import_records(path.as_ref()).map(Self::from_vec)
    }
}

impl<'a, T: Record> IntoIterator for &'a RecordArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl RecordArray<OsmWay> {
    /// Overwrite slot `index` with [`OsmWay::pedestrian`].
    pub fn set_pedestrian(
        &mut self,
        index: usize,
        id: u64,
        name_index: u32,
        node_count: u16,
    ) -> Result<()> {
        self.set(index, OsmWay::pedestrian(id, name_index, node_count))
    }
}

impl RecordArray<OsmWayNode> {
    /// Copy of the node embedded in slot `index`.
    pub fn node(&self, index: usize) -> Result<OsmNode> {
        self.get(index).map(|way_node| way_node.node)
    }

    /// Replace the node embedded in slot `index`, leaving the way binding as is.
    pub fn set_node(&mut self, index: usize, node: OsmNode) -> Result<()> {
        self.get_mut(index)?.node = node;
        Ok(())
    }

    /// Overwrite slot `index` with [`OsmWayNode::at`].
    pub fn set_at(
        &mut self,
        index: usize,
        way_index: u32,
        way_shape_node_index: u32,
        id: u64,
        coord: Coord7,
        intersection: bool,
    ) -> Result<()> {
        self.set(
            index,
            OsmWayNode::at(way_index, way_shape_node_index, id, coord, intersection),
        )
    }
}
