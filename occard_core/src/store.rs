//! Durable record store with file locking.
//!
//! Each record collection (table) lives in its own JSON file under the data
//! directory. Every operation is a locked load-modify-save cycle: reads take
//! a shared lock, writes go through an exclusively-locked temp file that is
//! fsynced and atomically renamed over the table file. Atomicity is per
//! table-file write; no transaction spans multiple records.

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// A record that can live in a [`Table`].
///
/// Ids are assigned by the store on `add` and are immutable afterwards.
pub trait Record: Serialize + DeserializeOwned + Clone {
    fn id(&self) -> Option<u64>;
    fn set_id(&mut self, id: u64);
}

/// On-disk shape of one table file
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableData<R> {
    next_id: u64,
    records: Vec<R>,
}

impl<R> Default for TableData<R> {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

/// Handle to a data directory holding table files.
///
/// Services take a `Store` reference at construction (no process-wide
/// singleton), so tests and callers can run isolated instances.
#[derive(Clone, Debug)]
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    /// Open a store rooted at the given data directory, creating it if needed
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// Get a typed handle to the named table
    pub fn table<R: Record>(&self, name: &str) -> Table<R> {
        Table {
            path: self.data_dir.join(format!("{}.json", name)),
            _marker: PhantomData,
        }
    }

    pub fn data_dir(&self) -> &std::path::Path {
        &self.data_dir
    }
}

/// One record collection backed by a JSON file
#[derive(Clone, Debug)]
pub struct Table<R: Record> {
    path: PathBuf,
    _marker: PhantomData<R>,
}

impl<R: Record> Table<R> {
    /// Add a record, assigning the next unique integer id
    ///
    /// Returns the assigned id. Storage faults surface as errors and are
    /// never retried.
    pub fn add(&self, mut record: R) -> Result<u64> {
        let mut data = self.load()?;
        let id = data.next_id;
        data.next_id += 1;
        record.set_id(id);
        data.records.push(record);
        self.save(&data)?;

        tracing::debug!("Added record {} to {:?}", id, self.path);
        Ok(id)
    }

    /// Point lookup; a missing id is `Ok(None)`, not an error
    pub fn get(&self, id: u64) -> Result<Option<R>> {
        let data = self.load()?;
        Ok(data.records.into_iter().find(|r| r.id() == Some(id)))
    }

    /// Apply a mutation to the stored record with the given id
    ///
    /// Updating a non-existent id is a silent no-op; callers are expected to
    /// have validated existence upstream.
    pub fn update<F>(&self, id: u64, f: F) -> Result<()>
    where
        F: FnOnce(&mut R),
    {
        let mut data = self.load()?;
        match data.records.iter_mut().find(|r| r.id() == Some(id)) {
            Some(record) => {
                f(record);
                self.save(&data)?;
                tracing::debug!("Updated record {} in {:?}", id, self.path);
            }
            None => {
                tracing::debug!("Update of missing record {} in {:?} ignored", id, self.path);
            }
        }
        Ok(())
    }

    /// Remove the record with the given id; missing id is a silent no-op
    pub fn delete(&self, id: u64) -> Result<()> {
        let mut data = self.load()?;
        let before = data.records.len();
        data.records.retain(|r| r.id() != Some(id));

        if data.records.len() != before {
            self.save(&data)?;
            tracing::debug!("Deleted record {} from {:?}", id, self.path);
        } else {
            tracing::debug!("Delete of missing record {} in {:?} ignored", id, self.path);
        }
        Ok(())
    }

    /// All records in insertion order
    pub fn all(&self) -> Result<Vec<R>> {
        Ok(self.load()?.records)
    }

    /// All records sorted descending by the given key
    pub fn sorted_by_key_desc<K, F>(&self, key: F) -> Result<Vec<R>>
    where
        K: Ord,
        F: Fn(&R) -> K,
    {
        let mut records = self.load()?.records;
        records.sort_by(|a, b| key(b).cmp(&key(a)));
        Ok(records)
    }

    /// All records sorted ascending by the given key
    pub fn sorted_by_key_asc<K, F>(&self, key: F) -> Result<Vec<R>>
    where
        K: Ord,
        F: Fn(&R) -> K,
    {
        let mut records = self.load()?.records;
        records.sort_by(|a, b| key(a).cmp(&key(b)));
        Ok(records)
    }

    /// Full-table scan keeping records matching the predicate
    pub fn find_where<F>(&self, predicate: F) -> Result<Vec<R>>
    where
        F: Fn(&R) -> bool,
    {
        let mut records = self.load()?.records;
        records.retain(|r| predicate(r));
        Ok(records)
    }

    /// Load the table file with a shared lock
    ///
    /// A missing file is an empty table. An unparseable file is a fatal
    /// store error: corruption must surface to the caller, never be
    /// silently replaced with an empty table.
    fn load(&self) -> Result<TableData<R>> {
        if !self.path.exists() {
            return Ok(TableData::default());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        serde_json::from_str::<TableData<R>>(&contents).map_err(|e| {
            Error::Store(format!("Corrupt table file {:?}: {}", self.path, e))
        })
    }

    /// Save the table file with an exclusive lock
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn save(&self, data: &TableData<R>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "table path missing parent")
        })?)?;

        // Exclusive lock on the temp file serializes concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(data)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}
