#![allow(dead_code)]

use promptcomposer_core::{AppError, DirEntry, EntryStat, FileKind, FileSystem, Result};
use std::collections::{HashMap, HashSet};
use std::io;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
enum MemEntry {
    File { bytes: Vec<u8>, delay: Duration },
    Dir { children: Vec<String> },
    Symlink { to_dir: bool },
}

/// In-memory filesystem with `/`-joined locators, listing children in
/// insertion order, and injectable failures.
#[derive(Debug, Default)]
pub struct MemoryFs {
    entries: HashMap<String, MemEntry>,
    stat_failures: HashSet<String>,
    list_failures: HashSet<String>,
    read_failures: HashSet<String>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn attach(&mut self, locator: &str) {
        if let Some((parent, name)) = locator.rsplit_once('/') {
            if let Some(MemEntry::Dir { children }) = self.entries.get_mut(parent) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    pub fn dir(mut self, locator: &str) -> Self {
        self.entries.insert(
            locator.to_string(),
            MemEntry::Dir {
                children: Vec::new(),
            },
        );
        self.attach(locator);
        self
    }

    pub fn file(self, locator: &str, content: &str) -> Self {
        self.file_bytes(locator, content.as_bytes())
    }

    pub fn file_bytes(self, locator: &str, bytes: &[u8]) -> Self {
        self.slow_file(locator, bytes, Duration::ZERO)
    }

    pub fn slow_file(mut self, locator: &str, bytes: &[u8], delay: Duration) -> Self {
        self.entries.insert(
            locator.to_string(),
            MemEntry::File {
                bytes: bytes.to_vec(),
                delay,
            },
        );
        self.attach(locator);
        self
    }

    pub fn symlink(mut self, locator: &str) -> Self {
        self.entries
            .insert(locator.to_string(), MemEntry::Symlink { to_dir: false });
        self.attach(locator);
        self
    }

    /// Symlink whose target is a directory, listed with both flags set.
    pub fn symlink_dir(mut self, locator: &str) -> Self {
        self.entries
            .insert(locator.to_string(), MemEntry::Symlink { to_dir: true });
        self.attach(locator);
        self
    }

    pub fn fail_stat(mut self, locator: &str) -> Self {
        self.stat_failures.insert(locator.to_string());
        self
    }

    pub fn fail_list(mut self, locator: &str) -> Self {
        self.list_failures.insert(locator.to_string());
        self
    }

    pub fn fail_read(mut self, locator: &str) -> Self {
        self.read_failures.insert(locator.to_string());
        self
    }

    fn kind_of(entry: &MemEntry) -> FileKind {
        match entry {
            MemEntry::File { .. } => FileKind::file(),
            MemEntry::Dir { .. } => FileKind::dir(),
            MemEntry::Symlink { to_dir } => FileKind {
                is_dir: *to_dir,
                ..FileKind::symlink()
            },
        }
    }
}

fn not_found(locator: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} not found", locator))
}

impl FileSystem for MemoryFs {
    fn stat(&self, locator: &str) -> Result<EntryStat> {
        let entry = self
            .entries
            .get(locator)
            .filter(|_| !self.stat_failures.contains(locator))
            .ok_or_else(|| AppError::Stat {
                locator: locator.to_string(),
                source: not_found(locator),
            })?;
        let size = match entry {
            MemEntry::File { bytes, .. } => bytes.len() as u64,
            _ => 0,
        };
        Ok(EntryStat {
            kind: Self::kind_of(entry),
            size,
        })
    }

    fn list_dir(&self, locator: &str) -> Result<Vec<DirEntry>> {
        let list_error = || AppError::ListDir {
            locator: locator.to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        if self.list_failures.contains(locator) {
            return Err(list_error());
        }
        match self.entries.get(locator) {
            Some(MemEntry::Dir { children }) => Ok(children
                .iter()
                .map(|name| {
                    let child = format!("{}/{}", locator, name);
                    DirEntry {
                        name: name.clone(),
                        kind: self
                            .entries
                            .get(&child)
                            .map(Self::kind_of)
                            .unwrap_or_default(),
                    }
                })
                .collect()),
            _ => Err(list_error()),
        }
    }

    fn read_bytes(&self, locator: &str) -> Result<Vec<u8>> {
        let read_error = || AppError::FileRead {
            locator: locator.to_string(),
            source: not_found(locator),
        };
        if self.read_failures.contains(locator) {
            return Err(read_error());
        }
        match self.entries.get(locator) {
            Some(MemEntry::File { bytes, delay }) => {
                if !delay.is_zero() {
                    thread::sleep(*delay);
                }
                Ok(bytes.clone())
            }
            _ => Err(read_error()),
        }
    }

    fn join(&self, parent: &str, name: &str) -> String {
        format!("{}/{}", parent, name)
    }
}

pub fn locators(files: &[promptcomposer_core::FileEntry]) -> Vec<&str> {
    files.iter().map(|f| f.locator.as_str()).collect()
}

pub fn roots(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
