//! Handle-to-record map: the single source of truth for what exists in a
//! session. The registry performs no display I/O.

use std::collections::HashMap;

use crate::error::SessionError;
use crate::handle::Handle;
use crate::record::ShapeRecord;

#[derive(Debug, Default)]
pub struct ShapeRegistry {
    records: HashMap<Handle, ShapeRecord>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` under `handle`. Fails if the handle is taken.
    pub fn insert(&mut self, handle: Handle, record: ShapeRecord) -> Result<(), SessionError> {
        if self.records.contains_key(&handle) {
            return Err(SessionError::DuplicateHandle(handle));
        }
        tracing::debug!("Registered {:?} under handle {}", record.geometry, handle);
        self.records.insert(handle, record);
        Ok(())
    }

    pub fn get(&self, handle: Handle) -> Result<&ShapeRecord, SessionError> {
        self.records
            .get(&handle)
            .ok_or(SessionError::UnknownHandle(handle))
    }

    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut ShapeRecord, SessionError> {
        self.records
            .get_mut(&handle)
            .ok_or(SessionError::UnknownHandle(handle))
    }

    /// Erase `handle`, returning its record. The caller is responsible for
    /// telling the shell to stop displaying it.
    pub fn remove(&mut self, handle: Handle) -> Result<ShapeRecord, SessionError> {
        let record = self
            .records
            .remove(&handle)
            .ok_or(SessionError::UnknownHandle(handle))?;
        tracing::debug!("Removed handle {}", handle);
        Ok(record)
    }

    /// Every `(handle, record)` pair, in no particular order. The iterator is
    /// cloneable, so it can be restarted.
    pub fn all(&self) -> impl Iterator<Item = (Handle, &ShapeRecord)> + Clone {
        self.records.iter().map(|(handle, record)| (*handle, record))
    }

    /// Visible records only.
    pub fn visible(&self) -> impl Iterator<Item = (Handle, &ShapeRecord)> + Clone {
        self.all().filter(|(_, record)| record.visible)
    }

    /// All handles in ascending order.
    pub fn handles(&self) -> Vec<Handle> {
        let mut handles: Vec<Handle> = self.records.keys().copied().collect();
        handles.sort_unstable();
        handles
    }

    /// Visible handles in ascending order.
    pub fn visible_handles(&self) -> Vec<Handle> {
        let mut handles: Vec<Handle> = self.visible().map(|(handle, _)| handle).collect();
        handles.sort_unstable();
        handles
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.records.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
