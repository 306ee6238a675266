//! items.bin container format handling
//!
//! An items.bin file is a bare sequence of records: no file header, no record
//! count, no footer, no checksums. Each record is a preamble followed by a
//! run of 8-byte key/value pairs, all integers unsigned big-endian 32-bit:
//!
//! - Preamble: `[lead(4B BE)]` plus 8 more bytes when `lead == 0`, or
//!   `8*lead + 8` more bytes when `lead != 0` (blueprint records encode a
//!   list of `lead` ingredient pairs in the preamble).
//! - Fields: the first pair is always present (it carries the item ID field);
//!   keys within one record are strictly increasing, so a key less than or
//!   equal to the running maximum marks the start of the next record.
//! - End of container is simply end of stream.

use byteorder::{BigEndian, ReadBytesExt};
use std::fs::{self, File};
use std::io::{BufWriter, Cursor, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::Record;

/// An items.bin container: an ordered sequence of item records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsFile {
    records: Vec<Record>,
}

impl ItemsFile {
    /// Open and decode an items.bin file
    ///
    /// # Example
    /// ```no_run
    /// use itembin::ItemsFile;
    /// let items = ItemsFile::open("items.bin")?;
    /// # Ok::<(), itembin::Error>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Decode an items.bin container from a byte buffer
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::from_reader(&mut Cursor::new(data))
    }

    /// Decode an items.bin container from a seekable reader
    ///
    /// The whole container is decoded up front; an empty stream yields an
    /// empty container. Any short read of a fixed-size field fails with
    /// [`Error::Decode`] — a half-read preamble cannot be round-tripped.
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let mut records = Vec::new();

        loop {
            let offset = reader.stream_position()?;

            let mut lead_bytes = [0u8; 4];
            let got = read_up_to(reader, &mut lead_bytes)?;
            if got == 0 {
                // Normal end of container
                break;
            }
            if got < 4 {
                return Err(Error::Decode(format!(
                    "truncated record lead at offset {}: {} of 4 bytes",
                    offset, got
                )));
            }
            let lead = u32::from_be_bytes(lead_bytes);

            // The lead decides the preamble size: 12 bytes total for plain
            // records, 8*lead + 12 for blueprint records with `lead`
            // ingredient pairs. The 4 lead bytes are part of the preamble.
            let remainder: u64 = if lead == 0 { 8 } else { 8 * lead as u64 + 8 };
            let mut preamble = Vec::with_capacity(4 + remainder as usize);
            preamble.extend_from_slice(&lead_bytes);
            let copied = reader.by_ref().take(remainder).read_to_end(&mut preamble)? as u64;
            if copied < remainder {
                return Err(Error::Decode(format!(
                    "truncated preamble in record at offset {}: {} of {} bytes",
                    offset,
                    copied,
                    remainder
                )));
            }

            // Mandatory first pair, guarantees every record has its ID field
            let id_key = read_field_u32(reader, "mandatory field key", offset)?;
            let id_value = read_field_u32(reader, "mandatory field value", offset)?;

            let mut fields = vec![(id_key, id_value)];
            let mut max_key = id_key;
            let mut end_of_stream = false;

            loop {
                let mut key_bytes = [0u8; 4];
                let got = read_up_to(reader, &mut key_bytes)?;
                if got == 0 {
                    end_of_stream = true;
                    break;
                }
                if got < 4 || u32::from_be_bytes(key_bytes) <= max_key {
                    // Not a field of this record: rewind so the next record
                    // re-reads these bytes as its lead
                    reader.seek(SeekFrom::Current(-(got as i64)))?;
                    break;
                }
                let key = u32::from_be_bytes(key_bytes);
                let value = read_field_u32(reader, "field value", offset)?;
                fields.push((key, value));
                max_key = key;
            }

            records.push(Record::new(offset, preamble, fields));
            if end_of_stream {
                break;
            }
        }

        debug!(records = records.len(), "decoded items container");
        Ok(ItemsFile { records })
    }

    /// All records in container order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Mutable access to all records
    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// Get a record by index
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Get a mutable record by index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.records.get_mut(index)
    }

    /// Number of records in the container
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the container has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Encode every record in sequence order to a writer.
    ///
    /// For unmodified records the output is bit-identical to the input the
    /// container was decoded from. No validation of field contents happens
    /// here; the only failure mode is the underlying sink.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for record in &self.records {
            record.write_to(writer)?;
        }
        Ok(())
    }

    /// Encode the container to a byte vector
    pub fn to_bytes(&self) -> Vec<u8> {
        let total: usize = self.records.iter().map(|r| r.encoded_len()).sum();
        let mut out = Vec::with_capacity(total);
        self.write_to(&mut out).expect("write to Vec failed");
        out
    }

    /// Encode the container and write it to a file in one shot
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Read up to `buf.len()` bytes, returning how many were available
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(filled)
}

/// Read one big-endian u32, turning a short read into a decode error
fn read_field_u32<R: Read>(reader: &mut R, what: &str, record_offset: u64) -> Result<u32> {
    reader.read_u32::<BigEndian>().map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            Error::Decode(format!(
                "truncated {} in record at offset {}",
                what, record_offset
            ))
        } else {
            Error::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A plain record: lead == 0, 12 zero preamble bytes, then field pairs
    fn plain_record(fields: &[(u32, u32)]) -> Vec<u8> {
        let mut out = vec![0u8; 12];
        for &(key, value) in fields {
            out.extend_from_slice(&key.to_be_bytes());
            out.extend_from_slice(&value.to_be_bytes());
        }
        out
    }

    /// A blueprint record: lead is the ingredient count, preamble 8*lead+12
    fn blueprint_record(ingredients: &[(u32, u32)], fields: &[(u32, u32)]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(ingredients.len() as u32).to_be_bytes());
        for &(a, b) in ingredients {
            out.extend_from_slice(&a.to_be_bytes());
            out.extend_from_slice(&b.to_be_bytes());
        }
        out.extend_from_slice(&[0u8; 8]);
        for &(key, value) in fields {
            out.extend_from_slice(&key.to_be_bytes());
            out.extend_from_slice(&value.to_be_bytes());
        }
        out
    }

    #[test]
    fn test_empty_stream_is_empty_container() {
        let items = ItemsFile::parse(&[]).unwrap();
        assert!(items.is_empty());
        assert_eq!(items.to_bytes(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_single_minimal_record() {
        // lead=0, 8 more zero preamble bytes, mandatory pair key=5 value=0x2A
        let data = plain_record(&[(5, 42)]);
        assert_eq!(data.len(), 20);

        let items = ItemsFile::parse(&data).unwrap();
        assert_eq!(items.len(), 1);

        let record = items.get(0).unwrap();
        assert_eq!(record.offset, 0);
        assert_eq!(record.preamble, vec![0u8; 12]);
        assert_eq!(record.fields(), &[(5, 42)]);

        assert_eq!(items.to_bytes(), data);
    }

    #[test]
    fn test_round_trip_multiple_records() {
        let mut data = plain_record(&[(0, 1), (3, 10), (9, 250)]);
        data.extend(blueprint_record(&[(0x9A, 2), (0x9B, 1)], &[(0, 2), (7, 77)]));
        data.extend(plain_record(&[(0, 3)]));

        let items = ItemsFile::parse(&data).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items.to_bytes(), data);
    }

    #[test]
    fn test_redecode_is_idempotent() {
        let mut data = plain_record(&[(0, 1), (6, 80)]);
        data.extend(plain_record(&[(0, 2), (1, 4), (2, 22)]));

        let first = ItemsFile::parse(&data).unwrap();
        let second = ItemsFile::parse(&first.to_bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_field_order_matches_read_order() {
        let data = plain_record(&[(2, 9), (5, 1), (11, 3)]);
        let items = ItemsFile::parse(&data).unwrap();
        assert_eq!(
            items.get(0).unwrap().keys().collect::<Vec<_>>(),
            vec![2, 5, 11]
        );
    }

    #[test]
    fn test_repeated_low_key_starts_new_record() {
        // Two minimal records, each only the mandatory pair with key 5.
        // The second record's lead (0 <= 5) is what ends the first one.
        let mut data = plain_record(&[(5, 1)]);
        data.extend(plain_record(&[(5, 2)]));

        let items = ItemsFile::parse(&data).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items.get(0).unwrap().fields(), &[(5, 1)]);
        assert_eq!(items.get(1).unwrap().fields(), &[(5, 2)]);
        assert_eq!(items.get(1).unwrap().offset, 20);
    }

    #[test]
    fn test_lower_key_becomes_next_record_lead() {
        // After the pair with key 5, the candidate key 3 is <= max, so it is
        // rewound and re-read as the next record's lead: a blueprint with
        // three ingredient pairs.
        let mut data = plain_record(&[(5, 1)]);
        let second = blueprint_record(&[(1, 1), (2, 2), (3, 3)], &[(0, 9)]);
        data.extend(&second);

        let items = ItemsFile::parse(&data).unwrap();
        assert_eq!(items.len(), 2);

        let blueprint = items.get(1).unwrap();
        assert!(blueprint.is_blueprint());
        assert_eq!(blueprint.preamble.len(), 8 * 3 + 12);
        assert_eq!(blueprint.fields(), &[(0, 9)]);
        assert_eq!(items.to_bytes(), data);
    }

    #[test]
    fn test_blueprint_preamble_round_trips() {
        let data = blueprint_record(&[(0x9A, 4)], &[(0, 0xC3), (3, 9)]);
        let items = ItemsFile::parse(&data).unwrap();

        let record = items.get(0).unwrap();
        assert_eq!(record.preamble.len(), 8 + 12);
        assert_eq!(record.preamble, data[..20].to_vec());
        assert_eq!(items.to_bytes(), data);
    }

    #[test]
    fn test_truncated_preamble_is_decode_error() {
        // lead=0 promises 8 more preamble bytes, only 3 follow
        let data = [0, 0, 0, 0, 1, 2, 3];
        match ItemsFile::parse(&data) {
            Err(Error::Decode(_)) => {}
            other => panic!("expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_blueprint_preamble_is_decode_error() {
        // lead=2 promises 24 more preamble bytes
        let mut data = 2u32.to_be_bytes().to_vec();
        data.extend_from_slice(&[0u8; 10]);
        assert!(matches!(ItemsFile::parse(&data), Err(Error::Decode(_))));
    }

    #[test]
    fn test_truncated_mandatory_pair_is_decode_error() {
        // Full preamble, then only the key half of the mandatory pair
        let mut data = vec![0u8; 12];
        data.extend_from_slice(&5u32.to_be_bytes());
        assert!(matches!(ItemsFile::parse(&data), Err(Error::Decode(_))));
    }

    #[test]
    fn test_truncated_field_value_is_decode_error() {
        // Candidate key 7 reads fine, its value is cut short
        let mut data = plain_record(&[(5, 1)]);
        data.extend_from_slice(&7u32.to_be_bytes());
        data.extend_from_slice(&[0, 0]);
        assert!(matches!(ItemsFile::parse(&data), Err(Error::Decode(_))));
    }

    #[test]
    fn test_trailing_stray_bytes_are_decode_error() {
        // 1-3 bytes left over after a complete record cannot be a lead
        let mut data = plain_record(&[(5, 1)]);
        data.extend_from_slice(&[0xAB, 0xCD]);
        assert!(matches!(ItemsFile::parse(&data), Err(Error::Decode(_))));
    }

    #[test]
    fn test_edit_then_encode_same_length() {
        let data = plain_record(&[(0, 1), (3, 10)]);
        let mut items = ItemsFile::parse(&data).unwrap();
        items.get_mut(0).unwrap().set(3, 999).unwrap();

        let encoded = items.to_bytes();
        assert_eq!(encoded.len(), data.len());
        assert_eq!(ItemsFile::parse(&encoded).unwrap().get(0).unwrap().get(3), Some(999));
    }

    #[test]
    fn test_record_offsets_reported() {
        let mut data = plain_record(&[(0, 1), (3, 10)]);
        let first_len = data.len();
        data.extend(plain_record(&[(0, 2)]));

        let items = ItemsFile::parse(&data).unwrap();
        assert_eq!(items.get(0).unwrap().offset, 0);
        assert_eq!(items.get(1).unwrap().offset, first_len as u64);
    }
}
