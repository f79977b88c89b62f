//! Bulk record file I/O
//!
//! A record file is `count * size_of::<T>()` bytes: the records back to back in
//! native byte order, with no header, footer or length prefix. The count is
//! recovered from the file size alone.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{Error, Result};
use super::record::Record;

/// Behavior when the export destination already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwriteBehavior {
    /// Truncate and overwrite (default)
    #[default]
    Force,
    /// Never overwrite, fail if the file exists
    NeverOverwrite,
}

/// Options for export operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoOptions {
    /// Largest number of bytes handed to one write call
    pub buffer_size: usize,

    /// Behavior when the destination file already exists
    pub overwrite: OverwriteBehavior,

    /// fsync the file before reporting success
    pub sync: bool,
}

impl Default for IoOptions {
    fn default() -> Self {
        Self {
            buffer_size: 1024 * 1024, // 1MB
            overwrite: OverwriteBehavior::default(),
            sync: false,
        }
    }
}

fn open_destination(path: &Path, options: &IoOptions) -> Result<File> {
    let mut open = OpenOptions::new();
    open.write(true);
    match options.overwrite {
        OverwriteBehavior::Force => open.create(true).truncate(true),
        OverwriteBehavior::NeverOverwrite => open.create_new(true),
    };
    open.open(path).map_err(|e| Error::open(path, e))
}

/// Open a record file for reading and return it with its length in bytes.
pub(crate) fn open_source(path: &Path) -> Result<(File, u64)> {
    let file = File::open(path).map_err(|e| Error::open(path, e))?;
    let metadata = file.metadata().map_err(|e| Error::read(path, e))?;
    if !metadata.is_file() {
        return Err(Error::open(
            path,
            io::Error::new(ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    Ok((file, metadata.len()))
}

/// Export sink that can also be flushed to stable storage.
pub(crate) trait Destination: Write {
    fn sync(&mut self) -> io::Result<()>;
}

impl Destination for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

/// Write `records` verbatim to `path`.
///
/// If anything fails after the file was opened, a regular destination file is
/// removed again: a cut-off array is never left behind for a later import.
pub fn export_records<T: Record>(records: &[T], path: &Path, options: &IoOptions) -> Result<()> {
    let file = open_destination(path, options)?;
    let regular = file.metadata().map(|m| m.is_file()).unwrap_or(false);
    export_to(file, regular, records, path, options)?;

    debug!(
        "exported {} {} records ({} bytes) to {}",
        records.len(),
        T::NAME,
        records.len() * T::SIZE,
        path.display()
    );
    Ok(())
}

pub(crate) fn export_to<T: Record, D: Destination>(
    mut dest: D,
    regular: bool,
    records: &[T],
    path: &Path,
    options: &IoOptions,
) -> Result<()> {
    let result = write_records(records, &mut dest, path, options).and_then(|()| {
        if options.sync {
            dest.sync().map_err(|e| Error::write(path, e))
        } else {
            Ok(())
        }
    });

    if result.is_err() {
        drop(dest);
        if regular {
            discard(path);
        }
    }
    result
}

fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => warn!("removed incomplete {}", path.display()),
        Err(e) => warn!("failed to remove incomplete {}: {}", path.display(), e),
    }
}

/// Write `records` verbatim to any writer, at most `options.buffer_size` bytes
/// per call. `path` only names the destination in errors.
///
/// A failure once some bytes were accepted is [`Error::PartialWrite`], with
/// `written` counting the bytes `writer` accepted. A failure before the first
/// byte is [`Error::Write`].
pub fn write_records<T: Record, W: Write + ?Sized>(
    records: &[T],
    writer: &mut W,
    path: &Path,
    options: &IoOptions,
) -> Result<()> {
    let bytes: &[u8] = bytemuck::cast_slice(records);
    let expected = bytes.len() as u64;
    let chunk = options.buffer_size.max(1);

    let mut written = 0usize;
    while written < bytes.len() {
        let end = bytes.len().min(written.saturating_add(chunk));
        match writer.write(&bytes[written..end]) {
            Ok(0) => {
                return Err(partial_write(path, written, expected, ErrorKind::WriteZero.into()));
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if written > 0 => return Err(partial_write(path, written, expected, e)),
            Err(e) => return Err(Error::write(path, e)),
        }
    }
    writer.flush().map_err(|e| Error::write(path, e))
}

fn partial_write(path: &Path, written: usize, expected: u64, source: io::Error) -> Error {
    Error::PartialWrite {
        path: path.to_path_buf(),
        written: written as u64,
        expected,
        source,
    }
}

/// Number of whole records in a file of `len` bytes, or a corruption error.
pub(crate) fn record_count<T: Record>(path: &Path, len: u64) -> Result<usize> {
    let record_size = T::SIZE as u64;
    if len % record_size != 0 {
        warn!(
            "rejecting {}: {} bytes is not a whole number of {} records",
            path.display(),
            len,
            T::NAME
        );
        return Err(Error::Corrupt {
            path: path.to_path_buf(),
            len,
            record_size: T::SIZE,
            record: T::NAME,
        });
    }
    Ok((len / record_size) as usize)
}

/// Read a whole record file into a freshly allocated vector.
pub fn import_records<T: Record>(path: &Path) -> Result<Vec<T>> {
    let (mut file, len) = open_source(path)?;
    let count = record_count::<T>(path, len)?;

    let mut records: Vec<T> = bytemuck::zeroed_vec(count);
    file.read_exact(bytemuck::cast_slice_mut(&mut records))
        .map_err(|e| match e.kind() {
            // File shrank between stat and read
            ErrorKind::UnexpectedEof => Error::Corrupt {
                path: path.to_path_buf(),
                len,
                record_size: T::SIZE,
                record: T::NAME,
            },
            _ => Error::read(path, e),
        })?;

    debug!(
        "imported {} {} records ({} bytes) from {}",
        count,
        T::NAME,
        len,
        path.display()
    );
    Ok(records)
}

/// Export independent batches concurrently, one file per batch.
///
/// Every path must be distinct. The first failure is returned; other batches
/// may or may not have been written by then.
pub fn export_many<T, P>(batches: &[(&[T], P)], options: &IoOptions) -> Result<()>
where
    T: Record,
    P: AsRef<Path> + Sync,
{
    batches
        .par_iter()
        .try_for_each(|(records, path)| export_records(records, path.as_ref(), options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::OsmNode;
    use crate::core::way::OsmWay;
    use tempfile::tempdir;

    #[test]
    fn test_options_default() {
        let options = IoOptions::default();
        assert_eq!(options.buffer_size, 1024 * 1024);
        assert_eq!(options.overwrite, OverwriteBehavior::Force);
        assert!(!options.sync);
    }

    #[test]
    fn test_options_from_partial_config() {
        let options: IoOptions =
            serde_json::from_str(r#"{"overwrite": "never_overwrite", "sync": true}"#).unwrap();
        assert_eq!(options.overwrite, OverwriteBehavior::NeverOverwrite);
        assert!(options.sync);
        assert_eq!(options.buffer_size, IoOptions::default().buffer_size);
    }

    #[test]
    fn test_export_writes_raw_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ways.bin");
        let ways = vec![OsmWay::pedestrian(1, 2, 3), OsmWay::pedestrian(4, 5, 6)];

        export_records(&ways, &path, &IoOptions::default()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 2 * 320);
        assert_eq!(bytes.as_slice(), bytemuck::cast_slice::<OsmWay, u8>(&ways));
    }

    #[test]
    fn test_export_missing_directory_is_open_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("nodes.bin");
        let err = export_records(&[OsmNode::default()], &path, &IoOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }

    #[test]
    fn test_never_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nodes.bin");
        std::fs::write(&path, b"existing").unwrap();

        let options = IoOptions {
            overwrite: OverwriteBehavior::NeverOverwrite,
            ..Default::default()
        };
        let err = export_records(&[OsmNode::default()], &path, &options).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"existing");
    }

    #[test]
    fn test_force_truncates_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nodes.bin");
        std::fs::write(&path, vec![0xAAu8; 500]).unwrap();

        export_records(&[OsmNode::default()], &path, &IoOptions::default()).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 48);
    }

    #[test]
    fn test_import_rejects_partial_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nodes.bin");
        std::fs::write(&path, vec![0u8; 48 * 2 + 5]).unwrap();

        let err = import_records::<OsmNode>(&path).unwrap_err();
        match err {
            Error::Corrupt {
                len, record_size, ..
            } => {
                assert_eq!(len, 101);
                assert_eq!(record_size, 48);
            }
            other => panic!("expected corrupt error, got {other:?}"),
        }
    }

    #[test]
    fn test_import_missing_file_is_open_error() {
        let dir = tempdir().unwrap();
        let err = import_records::<OsmWay>(&dir.path().join("nope.bin")).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }

    #[test]
    fn test_import_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ways.bin");
        std::fs::write(&path, b"").unwrap();
        assert!(import_records::<OsmWay>(&path).unwrap().is_empty());
    }

    #[test]
    fn test_export_many() {
        let dir = tempdir().unwrap();
        let tiles: Vec<Vec<OsmWay>> = (0..4u64)
            .map(|tile| (0..=tile).map(|i| OsmWay::pedestrian(tile * 100 + i, 0, 2)).collect())
            .collect();
        let batches: Vec<(&[OsmWay], std::path::PathBuf)> = tiles
            .iter()
            .enumerate()
            .map(|(i, ways)| (ways.as_slice(), dir.path().join(format!("ways_{i}.bin"))))
            .collect();

        export_many(&batches, &IoOptions::default()).unwrap();

        for (ways, path) in &batches {
            assert_eq!(import_records::<OsmWay>(path).unwrap().as_slice(), *ways);
        }
    }

    /// Accepts up to `limit` bytes, at most `step` per call, then fails.
    struct ShortWriter<W> {
        inner: W,
        accepted: usize,
        limit: usize,
        step: usize,
    }

    impl<W> ShortWriter<W> {
        fn new(inner: W, limit: usize, step: usize) -> Self {
            Self {
                inner,
                accepted: 0,
                limit,
                step,
            }
        }
    }

    impl<W: Write> Write for ShortWriter<W> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.accepted >= self.limit {
                return Err(io::Error::other("no space left on device"));
            }
            let n = buf.len().min(self.limit - self.accepted).min(self.step);
            let n = self.inner.write(&buf[..n])?;
            self.accepted += n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    impl Destination for ShortWriter<File> {
        fn sync(&mut self) -> io::Result<()> {
            self.inner.sync_all()
        }
    }

    fn three_ways() -> Vec<OsmWay> {
        (1..=3).map(|id| OsmWay::pedestrian(id, 0, 2)).collect()
    }

    #[test]
    fn test_write_records_partial_write() {
        let mut writer = ShortWriter::new(Vec::new(), 500, 64);
        let err = write_records(&three_ways(), &mut writer, Path::new("ways.bin"), &IoOptions::default())
            .unwrap_err();

        match err {
            Error::PartialWrite {
                written, expected, ..
            } => {
                assert_eq!(written, 500);
                assert_eq!(expected, 960);
            }
            other => panic!("expected partial write, got {other:?}"),
        }
        assert_eq!(writer.inner.len(), 500);
    }

    #[test]
    fn test_write_records_fails_before_first_byte() {
        let mut writer = ShortWriter::new(Vec::new(), 0, 64);
        let err = write_records(&three_ways(), &mut writer, Path::new("ways.bin"), &IoOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }

    #[test]
    fn test_write_records_zero_length_write() {
        struct Stalled;

        impl Write for Stalled {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Ok(0)
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = write_records(&[OsmNode::default()], &mut Stalled, Path::new("nodes.bin"), &IoOptions::default())
            .unwrap_err();
        match err {
            Error::PartialWrite {
                written,
                expected,
                source,
                ..
            } => {
                assert_eq!(written, 0);
                assert_eq!(expected, 48);
                assert_eq!(source.kind(), ErrorKind::WriteZero);
            }
            other => panic!("expected partial write, got {other:?}"),
        }
    }

    #[test]
    fn test_write_records_respects_buffer_size() {
        let options = IoOptions {
            buffer_size: 100,
            ..IoOptions::default()
        };
        let mut writer = ShortWriter::new(Vec::new(), usize::MAX, usize::MAX);
        write_records(&three_ways(), &mut writer, Path::new("ways.bin"), &options).unwrap();
        assert_eq!(writer.inner, bytemuck::cast_slice::<OsmWay, u8>(&three_ways()));

        // A writer that takes everything at once still sees 100-byte calls
        struct Calls(Vec<usize>);

        impl Write for Calls {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.push(buf.len());
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut calls = Calls(Vec::new());
        write_records(&three_ways(), &mut calls, Path::new("ways.bin"), &options).unwrap();
        assert_eq!(calls.0.len(), 10);
        assert!(calls.0.iter().all(|&n| n <= 100));
    }

    #[test]
    fn test_failed_export_removes_destination() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ways.bin");
        let options = IoOptions::default();

        // Cut exactly on a record boundary: the leftover would import cleanly
        let file = open_destination(&path, &options).unwrap();
        let err = export_to(ShortWriter::new(file, 640, 100), true, &three_ways(), &path, &options)
            .unwrap_err();

        assert!(matches!(err, Error::PartialWrite { written: 640, expected: 960, .. }));
        assert!(!path.exists());
        assert!(matches!(import_records::<OsmWay>(&path), Err(Error::Open { .. })));
    }

    #[test]
    fn test_failed_export_keeps_non_regular_destination() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ways.bin");
        let options = IoOptions::default();

        let file = open_destination(&path, &options).unwrap();
        let result = export_to(ShortWriter::new(file, 10, 100), false, &three_ways(), &path, &options);

        assert!(matches!(result, Err(Error::PartialWrite { written: 10, .. })));
        assert!(path.exists());
    }

    #[test]
    fn test_import_directory_is_open_error() {
        let dir = tempdir().unwrap();
        match import_records::<OsmNode>(dir.path()) {
            Err(Error::Open { source, .. }) => assert_eq!(source.kind(), ErrorKind::InvalidInput),
            other => panic!("expected open error, got {other:?}"),
        }
    }
}
