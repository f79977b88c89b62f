//! C-compatible Foreign Function Interface (FFI) for valhalla-osmdata
//!
//! Lets C and C++ producers (and the graph builder itself) allocate, fill,
//! export and import record arrays through the same checked code paths as the
//! Rust API. The record structs are `#[repr(C)]` and can be declared on the C
//! side as `OSMNode`, `OSMWay` and `OSMWayNode`.
//!
//! # Memory Management
//!
//! - Arrays are handed out as a pointer plus a record count
//! - Every array returned by `*_new` or `*_import` must be released exactly once
//!   with the matching `*_free`, passing the same count
//! - File names are null-terminated UTF-8 C strings
//!
//! # Error Handling
//!
//! Fallible functions return an [`OsmDataResult`] code:
//! - 0: Success
//! - 1: Invalid parameter
//! - 2: File could not be opened
//! - 3: I/O error while reading or writing
//! - 4: Corrupt or truncated file
//! - 5: Index out of bounds

use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::Path;
use std::ptr;

use crate::core::coords::Coord7;
use crate::core::error::{Error, Result};
use crate::core::io::{export_records, import_records, IoOptions};
use crate::core::node::OsmNode;
use crate::core::record::Record;
use crate::core::way::OsmWay;
use crate::core::way_node::OsmWayNode;

/// Result codes for C FFI
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsmDataResult {
    Success = 0,
    InvalidParameter = 1,
    OpenFailed = 2,
    IoError = 3,
    CorruptFile = 4,
    OutOfBounds = 5,
}

/// Convert Rust Result to C result code
fn convert_error(result: Result<()>) -> OsmDataResult {
    match result {
        Ok(()) => OsmDataResult::Success,
        Err(Error::Open { .. }) => OsmDataResult::OpenFailed,
        Err(Error::Read { .. }) | Err(Error::Write { .. }) | Err(Error::PartialWrite { .. }) => {
            OsmDataResult::IoError
        }
        Err(Error::Corrupt { .. }) => OsmDataResult::CorruptFile,
        Err(Error::IndexOutOfBounds { .. }) => OsmDataResult::OutOfBounds,
        Err(Error::CoordinateOutOfRange { .. }) => OsmDataResult::InvalidParameter,
    }
}

fn new_array<T: Record>(count: u64) -> *mut T {
    let Ok(count) = usize::try_from(count) else {
        return ptr::null_mut();
    };
    let records: Vec<T> = bytemuck::zeroed_vec(count);
    Box::into_raw(records.into_boxed_slice()) as *mut T
}

/// # Safety
/// `records`/`count` must come from `new_array` or `import_array` and not have
/// been freed.
unsafe fn free_array<T: Record>(records: *mut T, count: u64) {
    if records.is_null() {
        return;
    }
    let slice = ptr::slice_from_raw_parts_mut(records, count as usize);
    drop(unsafe { Box::from_raw(slice) });
}

/// # Safety
/// `records` must be null or valid for `count` records.
unsafe fn records_mut<'a, T>(records: *mut T, count: u64) -> Option<&'a mut [T]> {
    if records.is_null() {
        return None;
    }
    Some(unsafe { std::slice::from_raw_parts_mut(records, count as usize) })
}

/// # Safety
/// `records` must be null or valid for `count` records.
unsafe fn records_ref<'a, T>(records: *const T, count: u64) -> Option<&'a [T]> {
    if records.is_null() {
        return None;
    }
    Some(unsafe { std::slice::from_raw_parts(records, count as usize) })
}

/// # Safety
/// `file_name` must be null or a valid null-terminated string.
unsafe fn file_path<'a>(file_name: *const c_char) -> Option<&'a Path> {
    if file_name.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(file_name) }
        .to_str()
        .ok()
        .map(Path::new)
}

unsafe fn clear_array<T: Record>(records: *mut T, count: u64) -> OsmDataResult {
    match unsafe { records_mut(records, count) } {
        Some(records) => {
            records.fill(T::zeroed());
            OsmDataResult::Success
        }
        None => OsmDataResult::InvalidParameter,
    }
}

unsafe fn export_array<T: Record>(
    records: *const T,
    count: u64,
    file_name: *const c_char,
) -> OsmDataResult {
    let Some(records) = (unsafe { records_ref(records, count) }) else {
        return OsmDataResult::InvalidParameter;
    };
    let Some(path) = (unsafe { file_path(file_name) }) else {
        return OsmDataResult::InvalidParameter;
    };
    convert_error(export_records(records, path, &IoOptions::default()))
}

unsafe fn import_array<T: Record>(
    file_name: *const c_char,
    buffer: *mut *mut T,
    count: *mut u64,
) -> OsmDataResult {
    if buffer.is_null() || count.is_null() {
        return OsmDataResult::InvalidParameter;
    }
    let Some(path) = (unsafe { file_path(file_name) }) else {
        return OsmDataResult::InvalidParameter;
    };

    match import_records::<T>(path) {
        Ok(records) => {
            let len = records.len() as u64;
            unsafe {
                *buffer = Box::into_raw(records.into_boxed_slice()) as *mut T;
                *count = len;
            }
            OsmDataResult::Success
        }
        Err(e) => {
            unsafe {
                *buffer = ptr::null_mut();
                *count = 0;
            }
            convert_error(Err(e))
        }
    }
}

unsafe fn set_record<T: Record>(records: *mut T, count: u64, index: u64, value: T) -> OsmDataResult {
    let Some(records) = (unsafe { records_mut(records, count) }) else {
        return OsmDataResult::InvalidParameter;
    };
    match records.get_mut(index as usize) {
        Some(slot) => {
            *slot = value;
            OsmDataResult::Success
        }
        None => OsmDataResult::OutOfBounds,
    }
}

// Ways

/// Allocate `count` zeroed ways. Returns NULL if `count` does not fit in memory.
#[no_mangle]
pub extern "C" fn osmway_new(count: u64) -> *mut OsmWay {
    new_array(count)
}

/// # Safety
/// `ways`/`count` must come from `osmway_new` or `osmway_import`, freed once.
#[no_mangle]
pub unsafe extern "C" fn osmway_free(ways: *mut OsmWay, count: u64) {
    unsafe { free_array(ways, count) }
}

/// Zero the first `count` ways.
///
/// # Safety
/// `ways` must be valid for `count` records.
#[no_mangle]
pub unsafe extern "C" fn osmway_clear(ways: *mut OsmWay, count: u64) -> OsmDataResult {
    unsafe { clear_array(ways, count) }
}

/// # Safety
/// `ways` must be valid for `count` records; `file_name` a C string.
#[no_mangle]
pub unsafe extern "C" fn osmway_export(
    ways: *const OsmWay,
    count: u64,
    file_name: *const c_char,
) -> OsmDataResult {
    unsafe { export_array(ways, count, file_name) }
}

/// # Safety
/// `file_name` must be a C string; `buffer` and `count` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn osmway_import(
    file_name: *const c_char,
    buffer: *mut *mut OsmWay,
    count: *mut u64,
) -> OsmDataResult {
    unsafe { import_array(file_name, buffer, count) }
}

/// Fill slot `index` with the default pedestrian way profile.
///
/// # Safety
/// `ways` must be valid for `count` records.
#[no_mangle]
pub unsafe extern "C" fn osmway_set_to_valhalla(
    ways: *mut OsmWay,
    count: u64,
    index: u64,
    osmid: u64,
    name_index: u32,
    nodecount: u16,
) -> OsmDataResult {
    unsafe { set_record(ways, count, index, OsmWay::pedestrian(osmid, name_index, nodecount)) }
}

// Nodes

#[no_mangle]
pub extern "C" fn osmnode_new(count: u64) -> *mut OsmNode {
    new_array(count)
}

/// # Safety
/// `nodes`/`count` must come from `osmnode_new` or `osmnode_import`, freed once.
#[no_mangle]
pub unsafe extern "C" fn osmnode_free(nodes: *mut OsmNode, count: u64) {
    unsafe { free_array(nodes, count) }
}

/// # Safety
/// `nodes` must be valid for `count` records.
#[no_mangle]
pub unsafe extern "C" fn osmnode_clear(nodes: *mut OsmNode, count: u64) -> OsmDataResult {
    unsafe { clear_array(nodes, count) }
}

/// # Safety
/// `nodes` must be valid for `count` records; `file_name` a C string.
#[no_mangle]
pub unsafe extern "C" fn osmnode_export(
    nodes: *const OsmNode,
    count: u64,
    file_name: *const c_char,
) -> OsmDataResult {
    unsafe { export_array(nodes, count, file_name) }
}

/// # Safety
/// `file_name` must be a C string; `buffer` and `count` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn osmnode_import(
    file_name: *const c_char,
    buffer: *mut *mut OsmNode,
    count: *mut u64,
) -> OsmDataResult {
    unsafe { import_array(file_name, buffer, count) }
}

// Way shape nodes

#[no_mangle]
pub extern "C" fn osmwaynode_new(count: u64) -> *mut OsmWayNode {
    new_array(count)
}

/// # Safety
/// `way_nodes`/`count` must come from `osmwaynode_new` or `osmwaynode_import`,
/// freed once.
#[no_mangle]
pub unsafe extern "C" fn osmwaynode_free(way_nodes: *mut OsmWayNode, count: u64) {
    unsafe { free_array(way_nodes, count) }
}

/// # Safety
/// `way_nodes` must be valid for `count` records.
#[no_mangle]
pub unsafe extern "C" fn osmwaynode_clear(way_nodes: *mut OsmWayNode, count: u64) -> OsmDataResult {
    unsafe { clear_array(way_nodes, count) }
}

/// # Safety
/// `way_nodes` must be valid for `count` records; `file_name` a C string.
#[no_mangle]
pub unsafe extern "C" fn osmwaynode_export(
    way_nodes: *const OsmWayNode,
    count: u64,
    file_name: *const c_char,
) -> OsmDataResult {
    unsafe { export_array(way_nodes, count, file_name) }
}

/// # Safety
/// `file_name` must be a C string; `buffer` and `count` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn osmwaynode_import(
    file_name: *const c_char,
    buffer: *mut *mut OsmWayNode,
    count: *mut u64,
) -> OsmDataResult {
    unsafe { import_array(file_name, buffer, count) }
}

/// Copy `value` into the node embedded in slot `index`.
///
/// # Safety
/// `way_nodes` must be valid for `count` records; `value` must point to a node.
#[no_mangle]
pub unsafe extern "C" fn osmwaynode_set_node(
    way_nodes: *mut OsmWayNode,
    count: u64,
    index: u64,
    value: *const OsmNode,
) -> OsmDataResult {
    if value.is_null() {
        return OsmDataResult::InvalidParameter;
    }
    let Some(way_nodes) = (unsafe { records_mut(way_nodes, count) }) else {
        return OsmDataResult::InvalidParameter;
    };
    match way_nodes.get_mut(index as usize) {
        Some(slot) => {
            slot.node = unsafe { *value };
            OsmDataResult::Success
        }
        None => OsmDataResult::OutOfBounds,
    }
}

/// Copy the node embedded in slot `index` into `value`.
///
/// # Safety
/// `way_nodes` must be valid for `count` records; `value` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn osmwaynode_get_node(
    way_nodes: *const OsmWayNode,
    count: u64,
    index: u64,
    value: *mut OsmNode,
) -> OsmDataResult {
    if value.is_null() {
        return OsmDataResult::InvalidParameter;
    }
    let Some(way_nodes) = (unsafe { records_ref(way_nodes, count) }) else {
        return OsmDataResult::InvalidParameter;
    };
    match way_nodes.get(index as usize) {
        Some(slot) => {
            unsafe { *value = slot.node };
            OsmDataResult::Success
        }
        None => OsmDataResult::OutOfBounds,
    }
}

/// Fill slot `index` with a default shape node.
///
/// # Safety
/// `way_nodes` must be valid for `count` records.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn osmwaynode_set_to_valhalla(
    way_nodes: *mut OsmWayNode,
    count: u64,
    index: u64,
    way_index: u32,
    way_shape_node_index: u32,
    osmid: u64,
    lng7: u32,
    lat7: u32,
    intersection: bool,
) -> OsmDataResult {
    let value = OsmWayNode::at(
        way_index,
        way_shape_node_index,
        osmid,
        Coord7::from_raw(lng7, lat7),
        intersection,
    );
    unsafe { set_record(way_nodes, count, index, value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use tempfile::tempdir;

    #[test]
    fn test_way_lifecycle() {
        let dir = tempdir().unwrap();
        let path = CString::new(dir.path().join("ways.bin").to_str().unwrap()).unwrap();

        unsafe {
            let ways = osmway_new(3);
            assert!(!ways.is_null());
            assert_eq!(osmway_set_to_valhalla(ways, 3, 1, 42, 7, 3), OsmDataResult::Success);
            assert_eq!(osmway_set_to_valhalla(ways, 3, 3, 1, 1, 1), OsmDataResult::OutOfBounds);
            assert_eq!(osmway_export(ways, 3, path.as_ptr()), OsmDataResult::Success);

            let mut loaded: *mut OsmWay = ptr::null_mut();
            let mut count = 0u64;
            assert_eq!(osmway_import(path.as_ptr(), &mut loaded, &mut count), OsmDataResult::Success);
            assert_eq!(count, 3);
            let loaded_slice = std::slice::from_raw_parts(loaded, count as usize);
            assert_eq!(loaded_slice[1], OsmWay::pedestrian(42, 7, 3));
            assert_eq!(loaded_slice[0], OsmWay::default());

            assert_eq!(osmway_clear(loaded, count), OsmDataResult::Success);
            assert_eq!(std::slice::from_raw_parts(loaded, 3)[1], OsmWay::default());

            osmway_free(loaded, count);
            osmway_free(ways, 3);
        }
    }

    #[test]
    fn test_way_node_accessors() {
        unsafe {
            let way_nodes = osmwaynode_new(2);
            assert_eq!(
                osmwaynode_set_to_valhalla(way_nodes, 2, 0, 4, 0, 99, 10, 20, true),
                OsmDataResult::Success
            );

            let mut node = OsmNode::default();
            assert_eq!(osmwaynode_get_node(way_nodes, 2, 0, &mut node), OsmDataResult::Success);
            assert_eq!(node, OsmNode::at(99, Coord7::from_raw(10, 20), true));

            node.id = 100;
            assert_eq!(osmwaynode_set_node(way_nodes, 2, 1, &node), OsmDataResult::Success);
            assert_eq!(osmwaynode_get_node(way_nodes, 2, 2, &mut node), OsmDataResult::OutOfBounds);
            assert_eq!((*way_nodes.add(1)).node.id, 100);
            assert_eq!((*way_nodes.add(0)).way_index, 4);

            osmwaynode_free(way_nodes, 2);
        }
    }

    #[test]
    fn test_import_errors() {
        let dir = tempdir().unwrap();
        let corrupt = dir.path().join("nodes.bin");
        std::fs::write(&corrupt, vec![0u8; 47]).unwrap();
        let corrupt = CString::new(corrupt.to_str().unwrap()).unwrap();
        let missing = CString::new(dir.path().join("missing.bin").to_str().unwrap()).unwrap();

        unsafe {
            let mut buffer: *mut OsmNode = ptr::null_mut();
            let mut count = 0u64;
            assert_eq!(
                osmnode_import(corrupt.as_ptr(), &mut buffer, &mut count),
                OsmDataResult::CorruptFile
            );
            assert!(buffer.is_null());
            assert_eq!(
                osmnode_import(missing.as_ptr(), &mut buffer, &mut count),
                OsmDataResult::OpenFailed
            );
            assert_eq!(
                osmnode_import(ptr::null(), &mut buffer, &mut count),
                OsmDataResult::InvalidParameter
            );
        }
    }

    #[test]
    fn test_export_to_missing_directory() {
        let dir = tempdir().unwrap();
        let path = CString::new(dir.path().join("no/such/dir.bin").to_str().unwrap()).unwrap();
        unsafe {
            let nodes = osmnode_new(1);
            assert_eq!(osmnode_export(nodes, 1, path.as_ptr()), OsmDataResult::OpenFailed);
            assert_eq!(osmnode_clear(ptr::null_mut(), 1), OsmDataResult::InvalidParameter);
            osmnode_free(nodes, 1);
        }
    }
}
