//! Record storage behind a narrow backend contract. Two backends: an
//! in-memory store for one-shot runs and a durable NDJSON file store that
//! a later run can reopen to re-run the analyses alone.

use crate::util::replace_file_atomic;
use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::record::Record;

/// The storage-backend contract consumed by every downstream stage.
/// Any backend offering these operations is substitutable; grouping and
/// reduction are done in-process, not pushed to the backend.
pub trait Store: Send + Sync {
    /// Bulk-insert the whole batch. All-or-nothing: a backend write
    /// failure fails the batch and must abort the run.
    fn insert_many(&self, records: Vec<Record>) -> Result<usize>;

    /// Delete the first record whose `id` matches. Returns how many were
    /// deleted (0 or 1).
    fn delete_one(&self, id: &str) -> Result<usize>;

    fn count(&self) -> Result<usize>;

    /// Clone out the current record set for read-only analysis passes.
    fn snapshot(&self) -> Result<Vec<Record>>;
}

/// In-process store: the sole mutator during a run, so a plain RwLock over
/// a vector is the whole locking discipline.
#[derive(Default)]
pub struct MemStore {
    records: RwLock<Vec<Record>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemStore {
    fn insert_many(&self, mut records: Vec<Record>) -> Result<usize> {
        let n = records.len();
        self.records.write().append(&mut records);
        Ok(n)
    }

    fn delete_one(&self, id: &str) -> Result<usize> {
        let mut guard = self.records.write();
        match guard.iter().position(|r| r.id == id) {
            Some(idx) => {
                guard.remove(idx);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }

    fn snapshot(&self) -> Result<Vec<Record>> {
        Ok(self.records.read().clone())
    }
}

/// Durable store: one JSON object per line. Mutations rewrite the whole
/// file atomically (tmp + rename), so a crash mid-write leaves the previous
/// version intact.
pub struct JsonlStore {
    path: PathBuf,
    write_buf: usize,
    records: RwLock<Vec<Record>>,
}

impl JsonlStore {
    /// Create an empty store at `path`, truncating any previous contents.
    pub fn create(path: impl AsRef<Path>, write_buf: usize) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            write_buf,
            records: RwLock::new(Vec::new()),
        };
        store.persist()?;
        Ok(store)
    }

    /// Reopen a store persisted by a previous run.
    pub fn open(path: impl AsRef<Path>, read_buf: usize, write_buf: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let f = File::open(&path).with_context(|| format!("open store {}", path.display()))?;
        let rdr = BufReader::with_capacity(read_buf.max(8 * 1024), f);

        let mut records = Vec::new();
        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let rec: Record = serde_json::from_str(&line)
                .with_context(|| format!("store {} line {}: bad document", path.display(), i + 1))?;
            records.push(rec);
        }
        tracing::info!(records = records.len(), path = %path.display(), "store loaded");

        Ok(Self { path, write_buf, records: RwLock::new(records) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let tmp = self.path.with_extension("jsonl.inprogress");
        {
            let f = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
            let mut w = BufWriter::with_capacity(self.write_buf.max(8 * 1024), f);
            for rec in self.records.read().iter() {
                serde_json::to_writer(&mut w, rec)?;
                w.write_all(b"\n")?;
            }
            w.flush()?;
        }
        replace_file_atomic(&tmp, &self.path)
    }
}

impl Store for JsonlStore {
    fn insert_many(&self, mut records: Vec<Record>) -> Result<usize> {
        let n = records.len();
        self.records.write().append(&mut records);
        self.persist().context("bulk insert: persist failed")?;
        Ok(n)
    }

    fn delete_one(&self, id: &str) -> Result<usize> {
        let deleted = {
            let mut guard = self.records.write();
            match guard.iter().position(|r| r.id == id) {
                Some(idx) => {
                    guard.remove(idx);
                    1
                }
                None => 0,
            }
        };
        if deleted > 0 {
            self.persist().context("delete: persist failed")?;
        }
        Ok(deleted)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }

    fn snapshot(&self) -> Result<Vec<Record>> {
        Ok(self.records.read().clone())
    }
}
