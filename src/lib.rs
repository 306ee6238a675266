//! # itembin
//!
//! A Rust library for parsing and editing Abyss Engine `items.bin` item
//! databases (as used by Galaxy on Fire 2).
//!
//! ## Overview
//!
//! An `items.bin` file is a headerless sequence of self-describing records.
//! Each record is a variable-length preamble followed by an ordered run of
//! big-endian 32-bit key/value pairs. This library provides:
//!
//! - Lossless decoding of the container into editable records (unknown
//!   fields and raw preamble bytes survive a round trip byte-identically)
//! - In-place field edits that can never change a record's byte length
//! - Re-encoding back to the exact on-disk format
//! - A selection-based editing session for command front ends
//!
//! ## Example - Reading
//!
//! ```rust,no_run
//! use itembin::ItemsFile;
//!
//! fn main() -> anyhow::Result<()> {
//!     let items = ItemsFile::open("items.bin")?;
//!
//!     for (index, record) in items.records().iter().enumerate() {
//!         println!("{}: id={:?} fields={}", index, record.id(), record.field_count());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Example - Editing
//!
//! ```rust,no_run
//! use itembin::ItemsFile;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut items = ItemsFile::open("items.bin")?;
//!
//!     // Set field 3 (tech level) of the first record
//!     if let Some(record) = items.get_mut(0) {
//!         record.set(3, 10)?;
//!     }
//!
//!     items.save("items_modified.bin")?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod items;
pub mod record;
pub mod session;

pub use error::{Error, Result};
pub use items::ItemsFile;
pub use record::Record;
pub use session::Session;
