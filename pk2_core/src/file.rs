//! File leaf entries.

use crate::error::{Error, Result};
use crate::path::validate_name;
use std::fmt;

/// A file entry inside a folder, located by offset and size in the archive stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pk2File {
    name: String,
    offset: u64,
    size: u32,
}

impl Pk2File {
    /// Create a new file entry.
    ///
    /// Fails with `InvalidArgument` if `name` is not a single path segment
    /// or `offset` is negative.
    pub fn new(name: impl Into<String>, offset: i64, size: u32) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;

        let offset = u64::try_from(offset).map_err(|_| {
            Error::invalid_argument(format!("File offset must be non-negative: {}", offset))
        })?;

        Ok(Self { name, offset, size })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte offset of the file data in the archive stream.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

impl fmt::Display for Pk2File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pk2File(name={:?}, offset={}, size={})",
            self.name, self.offset, self.size
        )
    }
}
