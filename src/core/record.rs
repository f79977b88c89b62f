//! Common contract of the fixed-layout records

use bytemuck::Pod;

/// A fixed-size record whose byte image is exchanged verbatim with the
/// graph builder.
///
/// Implementors are `#[repr(C)]` plain-old-data with no implicit padding, so
/// any byte pattern of the right length is a valid value and the all-zero
/// pattern is the cleared state.
pub trait Record: Pod + Send + Sync {
    /// Human-readable name used in logs and error messages.
    const NAME: &'static str;

    /// Conventional file name for an array of this record in an output directory.
    const FILE_NAME: &'static str;

    /// Size of one record on disk and in memory.
    const SIZE: usize = std::mem::size_of::<Self>();
}

// Bit-field allocation is defined LSB-first on little-endian targets, which is
// what the consumer is built for.
#[cfg(target_endian = "big")]
compile_error!("valhalla-osmdata records are only defined for little-endian targets");
