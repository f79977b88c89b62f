//! Read-only memory-mapped view of a record file
//!
//! This is how the graph builder reads the files: the mapping is reinterpreted
//! as a slice of records with no decode step. The whole file is mapped.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::debug;
use memmap2::Mmap;

use super::array::RecordArray;
use super::error::{Error, Result};
use super::io::{open_source, record_count};
use super::record::Record;

pub struct MappedRecords<T: Record> {
    // None for an empty file, which cannot be mapped portably.
    mmap: Option<Mmap>,
    len: usize,
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Record> MappedRecords<T> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (file, file_len) = open_source(path)?;
        let len = record_count::<T>(path, file_len)?;

        let mmap = if len == 0 {
            None
        } else {
            // SAFETY: the mapping is read-only. Producers write a file once and
            // never modify it in place; truncating a mapped file is outside the
            // contract of this format.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::read(path, e))?;

            // Page-aligned mapping of whole records: cannot fail, but keep the
            // check so records() never has to.
            bytemuck::try_cast_slice::<u8, T>(&mmap[..]).map_err(|e| {
                Error::read(
                    path,
                    std::io::Error::new(std::io::ErrorKind::InvalidData, format!("{e:?}")),
                )
            })?;
            Some(mmap)
        };

        debug!(
            "mapped {} {} records from {}",
            len,
            T::NAME,
            path.display()
        );
        Ok(Self {
            mmap,
            len,
            path: path.to_path_buf(),
            _marker: PhantomData,
        })
    }

    pub fn records(&self) -> &[T] {
        match &self.mmap {
            Some(mmap) => bytemuck::cast_slice(&mmap[..]),
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, index: usize) -> Result<T> {
        self.records()
            .get(index)
            .copied()
            .ok_or_else(|| Error::out_of_bounds(index, self.len))
    }

    /// Copy the mapped records into an owned array.
    pub fn to_array(&self) -> RecordArray<T> {
        RecordArray::from_vec(self.records().to_vec())
    }
}
