use crate::fs_access::FileSystem;
use crate::messages::Messages;
use log;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

pub const DEFAULT_MAX_FILES: usize = 200;
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 2 * 1024 * 1024;
pub const DEFAULT_MAX_DEPTH: usize = 6;
pub const DEFAULT_EXCLUDED_DIRS: [&str; 5] = [".git", "node_modules", "dist", "out", "build"];

/// A file admitted by [`collect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "path")]
    pub locator: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionBudget {
    pub max_files: usize,
    pub max_total_bytes: u64,
    pub max_depth: usize,
    /// Matched case-insensitively against names of listed child directories.
    pub excluded_dir_names: Vec<String>,
}

impl Default for CollectionBudget {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
            excluded_dir_names: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CollectOutcome {
    pub files: Vec<FileEntry>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Default)]
struct RunCounters {
    excluded_dirs: usize,
    depth_dirs: usize,
    symlinks: usize,
    read_errors: usize,
    truncated_by_count: bool,
    truncated_by_size: bool,
}

enum Admission {
    Admitted,
    RejectedByCount,
    RejectedBySize,
}

struct Run<'a> {
    budget: &'a CollectionBudget,
    excluded: HashSet<String>,
    seen: HashSet<String>,
    queue: VecDeque<(String, usize)>,
    files: Vec<FileEntry>,
    total_bytes: u64,
    counters: RunCounters,
}

impl<'a> Run<'a> {
    fn new(budget: &'a CollectionBudget) -> Self {
        Self {
            budget,
            excluded: budget
                .excluded_dir_names
                .iter()
                .map(|name| name.to_lowercase())
                .collect(),
            seen: HashSet::new(),
            queue: VecDeque::new(),
            files: Vec::new(),
            total_bytes: 0,
            counters: RunCounters::default(),
        }
    }

    fn enqueue(&mut self, locator: String, depth: usize) {
        if self.seen.insert(locator.clone()) {
            self.queue.push_back((locator, depth));
        } else {
            log::trace!("Already queued, skipping: {}", locator);
        }
    }

    fn try_admit(&mut self, fs: &dyn FileSystem, locator: &str, size: u64) -> Admission {
        if self.files.len() >= self.budget.max_files {
            self.counters.truncated_by_count = true;
            return Admission::RejectedByCount;
        }
        if self.total_bytes.saturating_add(size) > self.budget.max_total_bytes {
            self.counters.truncated_by_size = true;
            return Admission::RejectedBySize;
        }
        self.files.push(FileEntry {
            locator: locator.to_string(),
            display_name: fs.basename(locator),
        });
        self.total_bytes += size;
        Admission::Admitted
    }

    fn visit_dir(&mut self, fs: &dyn FileSystem, locator: &str, depth: usize) {
        if depth >= self.budget.max_depth {
            log::trace!("Depth limit reached at {} (depth {})", locator, depth);
            self.counters.depth_dirs += 1;
            return;
        }
        let entries = match fs.list_dir(locator) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("{}", e);
                self.counters.read_errors += 1;
                return;
            }
        };
        for entry in entries {
            if entry.kind.is_dir && self.excluded.contains(&entry.name.to_lowercase()) {
                log::trace!("Excluded directory: {} in {}", entry.name, locator);
                self.counters.excluded_dirs += 1;
                continue;
            }
            let child = fs.join(locator, &entry.name);
            self.enqueue(child, depth + 1);
        }
    }

    fn warnings(&self, messages: &Messages) -> Vec<String> {
        let c = &self.counters;
        let mut warnings = Vec::new();
        if c.truncated_by_count {
            warnings.push(messages.max_files_reached(self.budget.max_files));
        }
        if c.truncated_by_size {
            warnings.push(messages.max_total_bytes_reached(self.budget.max_total_bytes));
        }
        if c.excluded_dirs > 0 {
            warnings.push(messages.excluded_dirs_skipped(c.excluded_dirs));
        }
        if c.depth_dirs > 0 {
            warnings.push(messages.depth_dirs_skipped(c.depth_dirs, self.budget.max_depth));
        }
        if c.symlinks > 0 {
            warnings.push(messages.symlinks_skipped(c.symlinks));
        }
        if c.read_errors > 0 {
            warnings.push(messages.read_errors(c.read_errors));
        }
        warnings
    }
}

/// Expands `roots` breadth-first into an ordered list of files under `budget`.
///
/// Roots keep their given order and siblings keep listing order; that order
/// decides which files survive when a limit binds. The first rejected file
/// ends the run. Exclusion by name applies to listed children only, never to
/// the roots themselves. Per-entry failures are counted, not returned.
pub fn collect(
    fs: &dyn FileSystem,
    roots: &[String],
    budget: &CollectionBudget,
    messages: &Messages,
) -> CollectOutcome {
    log::debug!("Collecting files from {} roots", roots.len());
    let mut run = Run::new(budget);
    for root in roots {
        run.enqueue(root.clone(), 0);
    }

    while let Some((locator, depth)) = run.queue.pop_front() {
        log::trace!("Visiting {} (depth {})", locator, depth);
        let stat = match fs.stat(&locator) {
            Ok(stat) => stat,
            Err(e) => {
                log::warn!("{}", e);
                run.counters.read_errors += 1;
                continue;
            }
        };

        if stat.kind.is_symlink {
            log::trace!("Skipping symlink: {}", locator);
            run.counters.symlinks += 1;
            continue;
        }

        if stat.kind.is_dir {
            run.visit_dir(fs, &locator, depth);
            continue;
        }

        if stat.kind.is_file {
            match run.try_admit(fs, &locator, stat.size) {
                Admission::Admitted => {}
                Admission::RejectedByCount => {
                    log::debug!("File count limit {} reached at {}", budget.max_files, locator);
                    break;
                }
                Admission::RejectedBySize => {
                    log::debug!(
                        "Total size limit {} reached at {}",
                        budget.max_total_bytes,
                        locator
                    );
                    break;
                }
            }
        }
    }

    let warnings = run.warnings(messages);
    log::debug!(
        "Collected {} files ({} bytes), {} warnings",
        run.files.len(),
        run.total_bytes,
        warnings.len()
    );
    CollectOutcome {
        files: run.files,
        warnings,
    }
}
