//! In-memory record store shared by reconciler and daemon tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Lookup, Record, RecordStore, RecordType, StoreError, ZoneInfo};

/// A call received by [`MockStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetZone(String),
    Get(String, RecordType),
    Create(Record),
    Update(Record),
    Delete(String, RecordType),
}

impl Call {
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Create(_) | Self::Update(_) | Self::Delete(..))
    }
}

/// Store operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Get,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoneState {
    Present,
    Missing,
    Broken,
}

/// In-memory [`RecordStore`] that journals every call.
#[derive(Debug)]
pub struct MockStore {
    zone: ZoneState,
    records: Mutex<HashMap<(String, RecordType), Record>>,
    failures: HashSet<(Op, String, RecordType)>,
    calls: Mutex<Vec<Call>>,
    next_id: AtomicUsize,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            zone: ZoneState::Present,
            records: Mutex::new(HashMap::new()),
            failures: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    /// Seeds an existing record; assigns an id if it has none.
    pub fn with_record(self, record: Record) -> Self {
        let record = if record.id.is_some() {
            record
        } else {
            let id = self.allocate_id();
            record.with_id(id)
        };
        self.records
            .lock()
            .unwrap()
            .insert((record.name.clone(), record.record_type), record);
        self
    }

    pub fn failing(mut self, op: Op, name: &str, record_type: RecordType) -> Self {
        self.failures.insert((op, name.to_string(), record_type));
        self
    }

    pub const fn without_zone(mut self) -> Self {
        self.zone = ZoneState::Missing;
        self
    }

    pub const fn with_broken_zone(mut self) -> Self {
        self.zone = ZoneState::Broken;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn record(&self, name: &str, record_type: RecordType) -> Option<Record> {
        self.records
            .lock()
            .unwrap()
            .get(&(name.to_string(), record_type))
            .cloned()
    }

    fn allocate_id(&self) -> String {
        format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn journal(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn fails(&self, op: Op, name: &str, record_type: RecordType) -> Option<StoreError> {
        self.failures
            .contains(&(op, name.to_string(), record_type))
            .then(|| injected(op))
    }
}

fn injected(op: Op) -> StoreError {
    StoreError::Api {
        status: http::StatusCode::INTERNAL_SERVER_ERROR,
        message: format!("injected {op:?} failure"),
    }
}

impl RecordStore for MockStore {
    async fn get_zone(&self, zone: &str) -> Lookup<ZoneInfo> {
        self.journal(Call::GetZone(zone.to_string()));
        match self.zone {
            ZoneState::Present => Lookup::Found(ZoneInfo {
                id: Some("zone-1".to_string()),
                zone: zone.to_string(),
            }),
            ZoneState::Missing => Lookup::NotFound,
            ZoneState::Broken => Lookup::Failed(StoreError::Api {
                status: http::StatusCode::UNAUTHORIZED,
                message: "Unauthorized".to_string(),
            }),
        }
    }

    async fn get_record(&self, _zone: &str, name: &str, record_type: RecordType) -> Lookup<Record> {
        self.journal(Call::Get(name.to_string(), record_type));
        if let Some(e) = self.fails(Op::Get, name, record_type) {
            return Lookup::Failed(e);
        }
        self.record(name, record_type)
            .map_or(Lookup::NotFound, Lookup::Found)
    }

    async fn create_record(&self, record: &Record) -> Result<Record, StoreError> {
        self.journal(Call::Create(record.clone()));
        if let Some(e) = self.fails(Op::Create, &record.name, record.record_type) {
            return Err(e);
        }
        let stored = record.clone().with_id(self.allocate_id());
        self.records.lock().unwrap().insert(
            (stored.name.clone(), stored.record_type),
            stored.clone(),
        );
        Ok(stored)
    }

    async fn update_record(&self, record: &Record) -> Result<Record, StoreError> {
        self.journal(Call::Update(record.clone()));
        if let Some(e) = self.fails(Op::Update, &record.name, record.record_type) {
            return Err(e);
        }
        self.records.lock().unwrap().insert(
            (record.name.clone(), record.record_type),
            record.clone(),
        );
        Ok(record.clone())
    }

    async fn delete_record(&self, _zone: &str, name: &str, record_type: RecordType) -> Lookup<()> {
        self.journal(Call::Delete(name.to_string(), record_type));
        if let Some(e) = self.fails(Op::Delete, name, record_type) {
            return Lookup::Failed(e);
        }
        match self
            .records
            .lock()
            .unwrap()
            .remove(&(name.to_string(), record_type))
        {
            Some(_) => Lookup::Found(()),
            None => Lookup::NotFound,
        }
    }
}
