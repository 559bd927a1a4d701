// log.rs - Run log shared by worker threads

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use super::ensure_parent_dir;

/// Line-oriented log sink guarded by a mutex
///
/// Workers only write here on warning paths, so the lock is rarely taken.
pub struct RunLog {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl RunLog {
    pub fn create(path: &Path) -> Result<Self, String> {
        ensure_parent_dir(path)?;
        let file = File::create(path)
            .map_err(|e| format!("Failed to create log file '{}': {}", path.display(), e))?;
        Ok(Self::from_writer(Box::new(BufWriter::new(file))))
    }

    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Mutex::new(writer),
        }
    }

    /// Discards everything
    pub fn sink() -> Self {
        Self::from_writer(Box::new(std::io::sink()))
    }

    pub fn record(&self, line: &str) -> Result<(), String> {
        let mut sink = self
            .sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(sink, "{}", line).map_err(|e| format!("Log write error: {}", e))
    }

    /// Log a per-locus warning; write failures are reported on stderr only
    pub fn warn(&self, message: &str) {
        if let Err(e) = self.record(message) {
            eprintln!("⚠️  {}", e);
        }
    }

    pub fn flush(&self) -> Result<(), String> {
        let mut sink = self
            .sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sink.flush().map_err(|e| format!("Log flush error: {}", e))
    }
}
