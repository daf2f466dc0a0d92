//! Columnar integer index files.
//!
//! An index file is nothing but concatenated 32-bit signed integers in
//! little-endian byte order: no header, no length prefix, no checksum. The
//! element count is the file size divided by four.
//!
//! [`IndexColumn`] keeps the raw bytes (read into one heap buffer, or memory
//! mapped) and decodes elements on access, so loading never copies elements
//! into a separate typed vector. Because the byte order is fixed, files are
//! portable between hosts of different endianness.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use memmap2::{Mmap, MmapOptions};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{FuzzdexError, Result};

/// Width in bytes of one element.
pub const ELEMENT_WIDTH: usize = 4;

/// Byte order used for every element of an index file.
pub type IndexByteOrder = LittleEndian;

/// Options controlling how index files are loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Map the file instead of reading it into a heap buffer.
    pub use_mmap: bool,

    /// Reject key columns that are not sorted ascending when opening a store.
    pub verify_sorted: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            use_mmap: false,
            verify_sorted: true,
        }
    }
}

/// Backing bytes of a column.
#[derive(Debug)]
enum ColumnData {
    Heap(Vec<u8>),
    Mapped(Mmap),
}

impl ColumnData {
    fn as_slice(&self) -> &[u8] {
        match self {
            ColumnData::Heap(bytes) => bytes.as_slice(),
            ColumnData::Mapped(mmap) => &mmap[..],
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ColumnData::Heap(_) => "heap",
            ColumnData::Mapped(_) => "mmap",
        }
    }
}

/// An immutable sequence of `i32` viewed directly over its on-disk bytes.
#[derive(Debug)]
pub struct IndexColumn {
    data: ColumnData,
    len: usize,
}

impl IndexColumn {
    /// Load a column by reading the whole file into memory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path, &LoadOptions::default())
    }

    /// Load a column with explicit options.
    pub fn load_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let expected = file.metadata()?.len();

        let data = if options.use_mmap && expected > 0 {
            let mmap = unsafe { MmapOptions::new().map(&file)? };
            ColumnData::Mapped(mmap)
        } else {
            let mut bytes = Vec::with_capacity(expected as usize);
            file.read_to_end(&mut bytes)?;
            if (bytes.len() as u64) < expected {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "short read on {}: got {} of {expected} bytes",
                        path.display(),
                        bytes.len()
                    ),
                )
                .into());
            }
            ColumnData::Heap(bytes)
        };

        let column = Self::from_data(data).inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "rejected index file");
        })?;
        debug!(
            path = %path.display(),
            len = column.len,
            backing = column.data.kind(),
            "loaded index column"
        );
        Ok(column)
    }

    /// Wrap an in-memory byte buffer, validating its length.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_data(ColumnData::Heap(bytes))
    }

    /// Encode values into a new heap-backed column.
    pub fn from_values(values: &[i32]) -> Self {
        let mut bytes = vec![0u8; values.len() * ELEMENT_WIDTH];
        IndexByteOrder::write_i32_into(values, &mut bytes);
        IndexColumn {
            data: ColumnData::Heap(bytes),
            len: values.len(),
        }
    }

    fn from_data(data: ColumnData) -> Result<Self> {
        let byte_len = data.as_slice().len();
        if byte_len % ELEMENT_WIDTH != 0 {
            return Err(FuzzdexError::format(format!(
                "index length {byte_len} is not a multiple of {ELEMENT_WIDTH} bytes"
            )));
        }
        Ok(IndexColumn {
            data,
            len: byte_len / ELEMENT_WIDTH,
        })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the column is backed by a memory map.
    pub fn is_mapped(&self) -> bool {
        matches!(self.data, ColumnData::Mapped(_))
    }

    /// The raw little-endian bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<i32> {
        if index < self.len {
            Some(self.at(index))
        } else {
            None
        }
    }

    /// Element at `index`; callers guarantee `index < len`.
    #[inline]
    pub(crate) fn at(&self, index: usize) -> i32 {
        let start = index * ELEMENT_WIDTH;
        IndexByteOrder::read_i32(&self.as_bytes()[start..start + ELEMENT_WIDTH])
    }

    /// Iterate over all elements in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = i32> + '_ {
        self.as_bytes()
            .chunks_exact(ELEMENT_WIDTH)
            .map(IndexByteOrder::read_i32)
    }

    /// Decode every element into an owned vector.
    pub fn to_vec(&self) -> Vec<i32> {
        let mut values = vec![0; self.len];
        IndexByteOrder::read_i32_into(self.as_bytes(), &mut values);
        values
    }

    /// Position of the first element smaller than its predecessor, if any.
    pub fn first_unsorted(&self) -> Option<usize> {
        let mut iter = self.iter().enumerate();
        let (_, mut prev) = iter.next()?;
        for (i, value) in iter {
            if value < prev {
                return Some(i);
            }
            prev = value;
        }
        None
    }

    /// True if the column is non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.first_unsorted().is_none()
    }

    /// True if every element equals its own position (`column[i] == i`).
    ///
    /// Such a column carries no information and callers may skip the
    /// indirection through it.
    pub fn is_identity(&self) -> bool {
        self.iter()
            .enumerate()
            .all(|(i, value)| i64::from(value) == i as i64)
    }

    /// Leftmost position `i` such that `column[i] >= target`, or `len` if
    /// every element is smaller. Only meaningful on a sorted column.
    pub fn lower_bound(&self, target: i32) -> usize {
        let (mut low, mut high) = (0, self.len);
        while low < high {
            let mid = low + (high - low) / 2;
            if self.at(mid) < target {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }
}

/// Write `values` as an index file readable by [`IndexColumn::load`].
pub fn write_column<P: AsRef<Path>>(path: P, values: &[i32]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    for &value in values {
        writer.write_i32::<IndexByteOrder>(value)?;
    }
    writer.flush()?;
    info!(path = %path.display(), len = values.len(), "wrote index column");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_declared_byte_order() {
        let column = IndexColumn::from_bytes(vec![0x01, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff])
            .unwrap();
        assert_eq!(column.len(), 2);
        assert_eq!(column.get(0), Some(1));
        assert_eq!(column.get(1), Some(-1));
        assert_eq!(column.get(2), None);
    }

    #[test]
    fn test_rejects_partial_element() {
        let err = IndexColumn::from_bytes(vec![0; 7]).unwrap_err();
        assert!(matches!(err, FuzzdexError::Format(_)));

        let dir = tempdir().unwrap();
        let path = dir.path().join("seven");
        std::fs::write(&path, [0u8; 7]).unwrap();
        assert!(matches!(
            IndexColumn::load(&path).unwrap_err(),
            FuzzdexError::Format(_)
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = IndexColumn::load(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, FuzzdexError::Io(_)));
    }

    #[test]
    fn test_write_then_load_heap_and_mmap() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index11_12");
        write_column(&path, &[11, 12, 13]).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 12);

        let heap = IndexColumn::load(&path).unwrap();
        assert!(!heap.is_mapped());
        assert_eq!(heap.get(1), Some(12));

        let options = LoadOptions {
            use_mmap: true,
            ..LoadOptions::default()
        };
        let mapped = IndexColumn::load_with(&path, &options).unwrap();
        assert!(mapped.is_mapped());
        assert_eq!(mapped.to_vec(), heap.to_vec());
    }

    #[test]
    fn test_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty");
        write_column(&path, &[]).unwrap();

        let options = LoadOptions {
            use_mmap: true,
            ..LoadOptions::default()
        };
        let column = IndexColumn::load_with(&path, &options).unwrap();
        assert!(column.is_empty());
        assert!(column.is_sorted());
        assert_eq!(column.lower_bound(5), 0);
    }

    #[test]
    fn test_sortedness_and_identity() {
        let column = IndexColumn::from_values(&[0, 1, 2, 3]);
        assert!(column.is_sorted());
        assert!(column.is_identity());

        let column = IndexColumn::from_values(&[0, 2, 2, 1]);
        assert_eq!(column.first_unsorted(), Some(3));
        assert!(!column.is_identity());
    }

    #[test]
    fn test_lower_bound() {
        let column = IndexColumn::from_values(&[1, 3, 3, 3, 7]);
        assert_eq!(column.lower_bound(0), 0);
        assert_eq!(column.lower_bound(3), 1);
        assert_eq!(column.lower_bound(4), 4);
        assert_eq!(column.lower_bound(8), 5);
        assert_eq!(column.lower_bound(i32::MIN), 0);
    }
}
