use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::warn;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct DiagnosticEntry {
    pub time: DateTime<Local>,
    pub origin: String,
    pub message: String,
}

impl DiagnosticEntry {
    pub fn format(&self) -> String {
        format!("[{}] {}: {}", self.time.to_rfc3339(), self.origin, self.message)
    }
}

/// Collects diagnostics that are not fatal (plugin loading problems and the
/// like), optionally mirroring each one to a file as it arrives.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Vec<DiagnosticEntry>,
    file: Option<File>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to `path`, creating it and its parent directories as needed.
    pub fn to_file(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create diagnostic log directory")?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open diagnostic log {}", path.display()))?;
        Ok(Self {
            entries: Vec::new(),
            file: Some(file),
        })
    }

    pub fn record(&mut self, origin: &str, message: &str) {
        let entry = DiagnosticEntry {
            time: Local::now(),
            origin: origin.to_string(),
            message: message.to_string(),
        };
        if let Some(file) = self.file.as_mut() {
            if let Err(e) = writeln!(file, "{}", entry.format()) {
                warn!("Failed to write diagnostic log: {}", e);
            }
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_memory_and_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("loader.log");

        let mut log = DiagnosticLog::to_file(&path).unwrap();
        assert!(log.is_empty());
        log.record("a.list:3", "'x' not found");
        log.record("b.list", "no add-on registered at 'y'");

        assert_eq!(log.entries().len(), 2);
        let written = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("a.list:3: 'x' not found"));
        assert!(lines[1].starts_with('['));
    }
}
