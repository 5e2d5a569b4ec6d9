use crate::records::Record;
use crate::Id;
use anyhow::Result;
use nrbf_types::NrbfError;
use std::collections::HashMap;

/// All id-bearing records of one stream, keyed by id. Append-only.
#[derive(Default, PartialEq, Debug)]
pub struct RecordMap {
    records: HashMap<Id, Record>,
}

impl RecordMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails with `CorruptGraph` if the id is already present. The existing record is kept.
    pub fn insert(&mut self, record: Record) -> Result<Id> {
        let id = record.object_id().ok_or_else(|| {
            NrbfError::corrupt(format!("{:?} record has no id", record.record_type()))
        })?;
        if !id.is_valid() {
            return Err(NrbfError::corrupt("Record with id 0").into());
        }
        if self.records.contains_key(&id) {
            return Err(NrbfError::corrupt(format!("Duplicate id {id}")).into());
        }
        self.records.insert(id, record);
        Ok(id)
    }

    /// Fails with `MissingId` if absent.
    pub fn get(&self, id: Id) -> Result<&Record> {
        self.records
            .get(&id)
            .ok_or_else(|| NrbfError::MissingId(*id).into())
    }

    pub fn try_get(&self, id: Id) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Id, &Record)> {
        self.records.iter()
    }
}
