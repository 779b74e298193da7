//! Ledger store
//!
//! Reads the movement ledger from a JSON file. The store is read-only and keeps no
//! snapshot between calls: every `load` reads the file again.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Ledger;

/// Default ledger file name, relative to the working directory
pub const DEFAULT_LEDGER_FILE: &str = "finanzas.json";

#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load a fresh snapshot of the ledger
    ///
    /// Fails with `NotFound` if the file is absent and `Parse` if it cannot be read
    /// or is not a valid ledger document.
    pub fn load(&self) -> Result<Ledger> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound(format!(
                    "Ledger file {} not found",
                    self.path.display()
                )));
            }
            Err(e) => {
                return Err(Error::Parse(format!(
                    "Failed to read ledger file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let ledger = Ledger::from_json_str(&content)?;
        debug!(
            path = %self.path.display(),
            movements = ledger.movements.len(),
            "Loaded ledger"
        );
        Ok(ledger)
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_ledger(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_ledger() {
        let file = write_ledger(
            r#"{"movimientos": [{"fecha": "2024-01-05", "monto": 1000, "tipo": "ingreso"}]}"#,
        );
        let store = LedgerStore::new(file.path());

        let ledger = store.load().unwrap();
        assert_eq!(ledger.movements.len(), 1);
        assert_eq!(ledger.movements[0].date, "2024-01-05");
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("finanzas.json"));

        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let file = write_ledger("{ not json");
        let store = LedgerStore::new(file.path());

        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_load_reads_fresh_each_time() {
        let file = write_ledger(r#"{"movimientos": []}"#);
        let store = LedgerStore::new(file.path());
        assert!(store.load().unwrap().movements.is_empty());

        std::fs::write(
            file.path(),
            r#"{"movimientos": [{"fecha": "2024-03-01", "monto": 5, "tipo": "gasto"}]}"#,
        )
        .unwrap();
        assert_eq!(store.load().unwrap().movements.len(), 1);
    }

    #[test]
    fn test_default_path() {
        let store = LedgerStore::default();
        assert_eq!(store.path(), Path::new(DEFAULT_LEDGER_FILE));
    }
}
