//! The position-map debug-info file format: a string pool followed by
//! packed source-position records with 1-based parent indices. Grounded on
//! spec.md §6's byte layout; enriched from `other_examples`' binary-codec
//! style since the teacher workspace has no raw binary format of its own.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use abslat_value::{Error, Result};

pub const MAGIC: u32 = 0xFACE_B000;
pub const VERSION: u32 = 2;

/// One decoded source position. `parent` is the index, in the owning
/// [`PositionMap`]'s `positions` vector, of this position's caller, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionRecord {
    pub class_id: u32,
    pub method_id: u32,
    pub file_id: u32,
    pub line: u32,
    pub parent: Option<usize>,
}

/// A decoded position map: the string pool referenced by `class_id`/
/// `method_id`/`file_id`, and the position records themselves.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PositionMap {
    pub strings: Vec<String>,
    pub positions: Vec<PositionRecord>,
}

impl PositionMap {
    pub fn new() -> Self {
        PositionMap::default()
    }

    /// Writes the map in the on-disk format: magic, version, string pool,
    /// then packed position records.
    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_u32::<LittleEndian>(MAGIC)
            .map_err(|e| Error::internal(format!("writing magic: {}", e)))?;
        w.write_u32::<LittleEndian>(VERSION)
            .map_err(|e| Error::internal(format!("writing version: {}", e)))?;

        w.write_u32::<LittleEndian>(self.strings.len() as u32)
            .map_err(|e| Error::internal(format!("writing string count: {}", e)))?;
        for s in &self.strings {
            let bytes = s.as_bytes();
            w.write_u32::<LittleEndian>(bytes.len() as u32)
                .map_err(|e| Error::internal(format!("writing string length: {}", e)))?;
            w.write_all(bytes)
                .map_err(|e| Error::internal(format!("writing string bytes: {}", e)))?;
        }

        w.write_u32::<LittleEndian>(self.positions.len() as u32)
            .map_err(|e| Error::internal(format!("writing position count: {}", e)))?;
        for position in &self.positions {
            let parent = match position.parent {
                Some(index) => index as u32 + 1,
                None => 0,
            };
            w.write_u32::<LittleEndian>(position.class_id)
                .map_err(|e| Error::internal(format!("writing class_id: {}", e)))?;
            w.write_u32::<LittleEndian>(position.method_id)
                .map_err(|e| Error::internal(format!("writing method_id: {}", e)))?;
            w.write_u32::<LittleEndian>(position.file_id)
                .map_err(|e| Error::internal(format!("writing file_id: {}", e)))?;
            w.write_u32::<LittleEndian>(position.line)
                .map_err(|e| Error::internal(format!("writing line: {}", e)))?;
            w.write_u32::<LittleEndian>(parent)
                .map_err(|e| Error::internal(format!("writing parent: {}", e)))?;
        }
        Ok(())
    }

    /// Reads a map previously written by [`PositionMap::write`]. Rejects a
    /// bad magic number, an unsupported version, or a `parent` index that
    /// does not point at an earlier record.
    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let magic = r
            .read_u32::<LittleEndian>()
            .map_err(|e| Error::internal(format!("reading magic: {}", e)))?;
        if magic != MAGIC {
            return Err(Error::invalid_argument(format!(
                "bad position-map magic: {:#010x}",
                magic
            )));
        }
        let version = r
            .read_u32::<LittleEndian>()
            .map_err(|e| Error::internal(format!("reading version: {}", e)))?;
        if version != VERSION {
            return Err(Error::invalid_argument(format!(
                "unsupported position-map version: {}",
                version
            )));
        }

        let string_count = r
            .read_u32::<LittleEndian>()
            .map_err(|e| Error::internal(format!("reading string count: {}", e)))?;
        let mut strings = Vec::with_capacity(string_count as usize);
        for _ in 0..string_count {
            let len = r
                .read_u32::<LittleEndian>()
                .map_err(|e| Error::internal(format!("reading string length: {}", e)))?;
            let mut bytes = vec![0u8; len as usize];
            r.read_exact(&mut bytes)
                .map_err(|e| Error::internal(format!("reading string bytes: {}", e)))?;
            let s = String::from_utf8(bytes)
                .map_err(|e| Error::invalid_argument(format!("non-UTF-8 string in pool: {}", e)))?;
            strings.push(s);
        }

        let position_count = r
            .read_u32::<LittleEndian>()
            .map_err(|e| Error::internal(format!("reading position count: {}", e)))?;
        let mut positions = Vec::with_capacity(position_count as usize);
        for i in 0..position_count {
            let class_id = r
                .read_u32::<LittleEndian>()
                .map_err(|e| Error::internal(format!("reading class_id: {}", e)))?;
            let method_id = r
                .read_u32::<LittleEndian>()
                .map_err(|e| Error::internal(format!("reading method_id: {}", e)))?;
            let file_id = r
                .read_u32::<LittleEndian>()
                .map_err(|e| Error::internal(format!("reading file_id: {}", e)))?;
            let line = r
                .read_u32::<LittleEndian>()
                .map_err(|e| Error::internal(format!("reading line: {}", e)))?;
            let parent_raw = r
                .read_u32::<LittleEndian>()
                .map_err(|e| Error::internal(format!("reading parent: {}", e)))?;
            let parent = if parent_raw == 0 {
                None
            } else {
                let index = parent_raw as usize - 1;
                if index as u32 >= i {
                    return Err(Error::invalid_argument(format!(
                        "position {} has a parent index {} that is not an earlier record",
                        i, index
                    )));
                }
                Some(index)
            };
            positions.push(PositionRecord {
                class_id,
                method_id,
                file_id,
                line,
                parent,
            });
        }

        Ok(PositionMap { strings, positions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn sample_map() -> PositionMap {
        PositionMap {
            strings: vec!["Foo".to_string(), "bar".to_string(), "Foo.java".to_string()],
            positions: vec![
                PositionRecord { class_id: 0, method_id: 1, file_id: 2, line: 10, parent: None },
                PositionRecord { class_id: 0, method_id: 1, file_id: 2, line: 12, parent: Some(0) },
            ],
        }
    }

    #[test]
    fn round_trips_through_bytes() {
        let map = sample_map();
        let mut buffer = Vec::new();
        map.write(&mut buffer).unwrap();
        let decoded = PositionMap::read(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buffer = Vec::new();
        buffer.write_u32::<LittleEndian>(0xDEAD_BEEF).unwrap();
        let err = PositionMap::read(&mut Cursor::new(buffer)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut buffer = Vec::new();
        buffer.write_u32::<LittleEndian>(MAGIC).unwrap();
        buffer.write_u32::<LittleEndian>(99).unwrap();
        let err = PositionMap::read(&mut Cursor::new(buffer)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn rejects_forward_referencing_parent() {
        let mut map = sample_map();
        map.positions[0].parent = Some(1);
        let mut buffer = Vec::new();
        map.write(&mut buffer).unwrap();
        let err = PositionMap::read(&mut Cursor::new(buffer)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
