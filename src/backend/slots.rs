use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// A string-keyed store of string values, the device-local storage
/// a ledger is persisted into.
pub trait KeyValueSlots {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Keeps each slot in its own file under a data directory.
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf
}

impl FileSlots {
    pub fn new(dir: impl AsRef<Path>) -> FileSlots {
        FileSlots { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys are free-form, so anything outside `[A-Za-z0-9_-]` is
    /// escaped as `%XX` to get a portable file name.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
                name.push(byte as char);
            } else {
                name.push_str(&format!("%{:02X}", byte));
            }
        }
        name.push_str(".json");
        return self.dir.join(name);
    }
}

impl KeyValueSlots for FileSlots {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err)
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool
}

/// In-memory slots. Clones share the same contents, which makes a clone
/// handed to a fresh tracker behave like storage surviving a restart.
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    inner: Arc<Mutex<MemoryInner>>
}

impl MemorySlots {
    pub fn new() -> MemorySlots {
        MemorySlots::default()
    }

    /// Makes every subsequent read fail with an I/O error.
    pub fn fail_reads(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_reads = fail;
        }
    }

    /// Makes every subsequent write fail with an I/O error.
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_writes = fail;
        }
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, MemoryInner>> {
        self.inner.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory slots poisoned"))
    }
}

impl KeyValueSlots for MemorySlots {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let inner = self.lock()?;
        if inner.fail_reads {
            return Err(io::Error::new(io::ErrorKind::Other, "simulated read failure"));
        }
        return Ok(inner.values.get(key).cloned());
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut inner = self.lock()?;
        if inner.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "simulated write failure"));
        }
        inner.values.insert(key.to_owned(), value.to_owned());
        return Ok(());
    }
}


#[cfg(test)]
mod tests {
    use std::fs;

    use crate::backend::slots::{FileSlots, KeyValueSlots, MemorySlots};

    #[test]
    fn escapes_key_into_file_name() {
        let slots = FileSlots::new("/data");
        assert_eq!(slots.path_for("@money_tracker"), std::path::Path::new("/data/%40money_tracker.json"));
        assert_eq!(slots.path_for("a/b"), std::path::Path::new("/data/a%2Fb.json"));
    }

    #[test]
    fn file_slots_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let slots = FileSlots::new(dir.path().join("nested"));

        assert_eq!(slots.get("@money_tracker").unwrap(), None);

        slots.set("@money_tracker", "[1]").unwrap();
        slots.set("@money_tracker", "[2]").unwrap();
        assert_eq!(slots.get("@money_tracker").unwrap().as_deref(), Some("[2]"));

        let leftovers: Vec<_> = fs::read_dir(slots.dir()).unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn memory_slots_share_contents_between_clones() {
        let slots = MemorySlots::new();
        let other = slots.clone();
        slots.set("key", "value").unwrap();
        assert_eq!(other.get("key").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn memory_slots_inject_failures() {
        let slots = MemorySlots::new();
        slots.set("key", "value").unwrap();

        slots.fail_reads(true);
        assert!(slots.get("key").is_err());
        slots.fail_reads(false);

        slots.fail_writes(true);
        assert!(slots.set("key", "other").is_err());
        assert_eq!(slots.get("key").unwrap().as_deref(), Some("value"));
    }
}
