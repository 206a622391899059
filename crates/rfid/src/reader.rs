use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{DomainResult, Entity, EntityList, ReaderId, ensure_not_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderType {
    Handheld,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderStatus {
    Active,
    Inactive,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfidReader {
    pub id: ReaderId,
    pub name: String,
    #[serde(rename = "type")]
    pub reader_type: ReaderType,
    /// Free-text site label ("Warehouse Entrance").
    pub location: String,
    pub status: ReaderStatus,
    pub last_maintenance: Option<DateTime<Utc>>,
    pub last_active: Option<DateTime<Utc>>,
}

impl Entity for RfidReader {
    type Id = ReaderId;
    const KIND: &'static str = "rfid reader";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl RfidReader {
    pub fn can_scan(&self) -> bool {
        self.status == ReaderStatus::Active
    }
}

/// Creation input for a reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub reader_type: ReaderType,
    pub location: String,
    pub status: ReaderStatus,
    #[serde(default)]
    pub last_maintenance: Option<DateTime<Utc>>,
}

impl ReaderDraft {
    pub fn new(
        name: impl Into<String>,
        reader_type: ReaderType,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reader_type,
            location: location.into(),
            status: ReaderStatus::Active,
            last_maintenance: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReaderRegistry {
    readers: EntityList<RfidReader>,
}

impl ReaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    pub fn list(&self) -> &[RfidReader] {
        self.readers.as_slice()
    }

    pub fn register(&mut self, draft: ReaderDraft) -> DomainResult<RfidReader> {
        self.insert(RfidReader {
            id: ReaderId::generate(),
            name: draft.name,
            reader_type: draft.reader_type,
            location: draft.location,
            status: draft.status,
            last_maintenance: draft.last_maintenance,
            last_active: None,
        })
    }

    pub fn insert(&mut self, reader: RfidReader) -> DomainResult<RfidReader> {
        ensure_not_blank("reader name", &reader.name)?;
        let created = self.readers.push(reader)?.clone();
        tracing::debug!(reader_id = %created.id, name = %created.name, "rfid reader registered");
        Ok(created)
    }

    /// Change status and stamp `last_active`. Entering maintenance also stamps
    /// `last_maintenance`.
    pub fn update_status(
        &mut self,
        id: &ReaderId,
        status: ReaderStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<RfidReader> {
        let updated = self
            .readers
            .replace_with(id, |current| {
                let mut next = current.clone();
                next.status = status;
                next.last_active = Some(now);
                if status == ReaderStatus::Maintenance {
                    next.last_maintenance = Some(now);
                }
                Ok(next)
            })?
            .clone();
        tracing::debug!(reader_id = %id, ?status, "rfid reader status changed");
        Ok(updated)
    }

    /// Stamp `last_active` without changing status (a successful read).
    pub fn touch(&mut self, id: &ReaderId, now: DateTime<Utc>) -> DomainResult<RfidReader> {
        let updated = self.readers.replace_with(id, |current| {
            let mut next = current.clone();
            next.last_active = Some(now);
            Ok(next)
        })?;
        Ok(updated.clone())
    }

    pub fn delete(&mut self, id: &ReaderId) -> DomainResult<RfidReader> {
        self.readers.remove(id)
    }

    pub fn get(&self, id: &ReaderId) -> Option<&RfidReader> {
        self.readers.get(id)
    }

    pub fn get_by_id(&self, id: &ReaderId) -> DomainResult<&RfidReader> {
        self.readers.get_required(id)
    }

    pub fn count_by_status(&self, status: ReaderStatus) -> usize {
        self.readers.iter().filter(|r| r.status == status).count()
    }
}
