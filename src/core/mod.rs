//! Core library modules for valhalla-osmdata
//!
//! Record layouts first, then the array lifecycle and file I/O built on them.

pub mod bits;
pub mod coords;
pub mod error;
pub mod node;
pub mod record;
pub mod way;
pub mod way_node;

pub mod array;
pub mod files;
pub mod io;
pub mod mapped;

