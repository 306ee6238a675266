//! In-memory item record model
//!
//! A record is a variable-length preamble followed by an ordered run of
//! 8-byte key/value pairs. Field keys within one record are strictly
//! increasing on disk, so the stored order is also the serialization order
//! and must be preserved for byte-identical output.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;

use crate::error::{Error, Result};

/// Size in bytes of one serialized key/value pair
pub const FIELD_PAIR_SIZE: usize = 8;

/// Fixed preamble size for ordinary (non-blueprint) records
pub const PLAIN_PREAMBLE_SIZE: usize = 12;

/// A single item entry from an items.bin container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Byte position in the source stream where this record began.
    /// Diagnostic only, never serialized.
    pub offset: u64,
    /// Raw preamble bytes exactly as read, written back verbatim on encode
    pub preamble: Vec<u8>,
    /// Key/value fields in the order they were read
    fields: Vec<(u32, u32)>,
}

impl Record {
    /// Create a record from its parts. Field order is kept as given.
    pub fn new(offset: u64, preamble: Vec<u8>, fields: Vec<(u32, u32)>) -> Self {
        Self {
            offset,
            preamble,
            fields,
        }
    }

    /// Get a field value by key
    pub fn get(&self, key: u32) -> Option<u32> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Update an existing field's value in place, returning the previous value.
    ///
    /// Refuses to create a new key: field pairs are fixed 4+4 bytes, so an
    /// edit must never change the record's byte length or field layout.
    pub fn set(&mut self, key: u32, value: u32) -> Result<u32> {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => {
                let previous = entry.1;
                entry.1 = value;
                Ok(previous)
            }
            None => Err(Error::KeyNotPresent(key)),
        }
    }

    /// Field keys in the order they were first read
    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }

    /// All field pairs in stored order
    pub fn fields(&self) -> &[(u32, u32)] {
        &self.fields
    }

    /// Number of key/value fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// The item ID, i.e. the value of field key 0, if the record has one
    pub fn id(&self) -> Option<u32> {
        self.get(0)
    }

    /// Whether this is a blueprint-variant record (ingredient list in the
    /// preamble, so the preamble is longer than the fixed 12 bytes)
    pub fn is_blueprint(&self) -> bool {
        self.preamble.len() > PLAIN_PREAMBLE_SIZE
    }

    /// Serialized size of this record in bytes
    pub fn encoded_len(&self) -> usize {
        self.preamble.len() + self.fields.len() * FIELD_PAIR_SIZE
    }

    /// Serialize this record: raw preamble, then each field pair as
    /// big-endian u32 key followed by big-endian u32 value
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.preamble)?;
        for &(key, value) in &self.fields {
            writer.write_u32::<BigEndian>(key)?;
            writer.write_u32::<BigEndian>(value)?;
        }
        Ok(())
    }

    /// Serialize this record to a byte vector
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        // Writing to a Vec cannot fail
        self.write_to(&mut out).expect("write to Vec failed");
        out
    }
}
