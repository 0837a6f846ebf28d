use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use fd_lock::RwLock;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::error::CacheError;
use super::snapshot::{Snapshot, SnapshotStore};

type Entries = BTreeMap<PathBuf, Snapshot>;

/// All snapshots in one JSON document on disk.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so readers see either the old or the new document. Writers take
/// an advisory lock on `<file>.lock` so stores in other processes do not
/// drop each other's updates.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut p = self.path.as_os_str().to_owned();
        p.push(".lock");
        PathBuf::from(p)
    }

    fn load(&self) -> Result<Entries, CacheError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    fn save(&self, entries: &Entries) -> Result<(), CacheError> {
        let mut tmp = NamedTempFile::new_in(self.dir())?;
        {
            let mut w = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut w, entries)?;
            w.flush()?;
        }
        tmp.persist(&self.path)?;
        debug!(path = %self.path.display(), entries = entries.len(), "cache written");
        Ok(())
    }

    /// Run `f` holding both the in-process mutex and the lock file.
    fn exclusive<T>(&self, f: impl FnOnce() -> Result<T, CacheError>) -> Result<T, CacheError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        fs::create_dir_all(self.dir())?;

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(self.lock_path())?;
        let mut lock = RwLock::new(file);
        let _held = lock.write()?;
        f()
    }

    fn update(&self, f: impl FnOnce(&mut Entries)) -> Result<(), CacheError> {
        self.exclusive(|| {
            // Snapshots are replaceable, so a broken document is started over.
            let mut entries = match self.load() {
                Ok(entries) => entries,
                Err(CacheError::Json(e)) => {
                    warn!(path = %self.path.display(), error = %e, "discarding malformed cache file");
                    Entries::new()
                }
                Err(e) => return Err(e),
            };
            f(&mut entries);
            self.save(&entries)
        })
    }
}

impl SnapshotStore for JsonStore {
    fn get(&self, root: &Path) -> Result<Option<Snapshot>, CacheError> {
        Ok(self.load()?.remove(root))
    }

    fn put(&self, root: &Path, mut snapshot: Snapshot) -> Result<(), CacheError> {
        if root.to_str().is_none() {
            warn!(root = %root.display(), "not caching a root whose path is not valid UTF-8");
            return Ok(());
        }
        let dropped = snapshot.retain_encodable();
        if dropped > 0 {
            warn!(
                root = %root.display(),
                dropped,
                "skipping entries whose paths are not valid UTF-8"
            );
        }
        self.update(|entries| {
            entries.insert(root.to_path_buf(), snapshot);
        })
    }

    fn delete(&self, root: &Path) -> Result<(), CacheError> {
        self.update(|entries| {
            entries.remove(root);
        })
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.exclusive(|| self.save(&Entries::new()))
    }
}
