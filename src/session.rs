//! Editing session over a decoded container
//!
//! Command front ends (shells, GUIs) need a current container plus a current
//! selection. That state lives here as an explicit object rather than in
//! globals; the selection is an `Option<usize>` validated against the
//! container length on every access, so index 0 is a perfectly valid
//! selection.

use crate::error::{Error, Result};
use crate::items::ItemsFile;
use crate::record::Record;

/// An in-memory editing session: one decoded container and an optional
/// currently selected record
#[derive(Debug)]
pub struct Session {
    items: ItemsFile,
    selected: Option<usize>,
}

impl Session {
    /// Start a session over a decoded container, with nothing selected
    pub fn new(items: ItemsFile) -> Self {
        Self {
            items,
            selected: None,
        }
    }

    /// The underlying container
    pub fn items(&self) -> &ItemsFile {
        &self.items
    }

    /// Mutable access to the underlying container
    pub fn items_mut(&mut self) -> &mut ItemsFile {
        &mut self.items
    }

    /// Select a record by index
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(Error::NoSuchRecord(index));
        }
        self.selected = Some(index);
        Ok(())
    }

    /// Drop the current selection
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Index of the currently selected record, if any
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The currently selected record
    pub fn selected_record(&self) -> Result<&Record> {
        let index = self.selected.ok_or(Error::NoSelection)?;
        self.items.get(index).ok_or(Error::NoSuchRecord(index))
    }

    /// Mutable access to the currently selected record
    pub fn selected_record_mut(&mut self) -> Result<&mut Record> {
        let index = self.selected.ok_or(Error::NoSelection)?;
        self.items.get_mut(index).ok_or(Error::NoSuchRecord(index))
    }

    /// Update one field of the selected record, returning the previous value.
    ///
    /// Fails without mutating anything when nothing is selected or the key
    /// does not exist on the selected record.
    pub fn edit(&mut self, key: u32, value: u32) -> Result<u32> {
        self.selected_record_mut()?.set(key, value)
    }
}
