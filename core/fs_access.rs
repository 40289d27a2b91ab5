use crate::error::{AppError, Result};
use log;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_URI_PREFIX: &str = "file://";

/// Type flags of a filesystem entry. A symlink reported by a host that
/// follows links may carry `is_symlink` together with `is_dir` or `is_file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileKind {
    pub is_file: bool,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl FileKind {
    pub fn file() -> Self {
        Self {
            is_file: true,
            ..Self::default()
        }
    }

    pub fn dir() -> Self {
        Self {
            is_dir: true,
            ..Self::default()
        }
    }

    pub fn symlink() -> Self {
        Self {
            is_symlink: true,
            ..Self::default()
        }
    }

    fn from_file_type(file_type: fs::FileType) -> Self {
        Self {
            is_file: file_type.is_file(),
            is_dir: file_type.is_dir(),
            is_symlink: file_type.is_symlink(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStat {
    pub kind: FileKind,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: FileKind,
}

/// Read-only access to the entries a locator names.
///
/// Locators are opaque strings. Implementations decide how a child locator is
/// formed from its parent, and in which order `list_dir` yields siblings; the
/// collector treats that order as significant.
pub trait FileSystem: Send + Sync {
    fn stat(&self, locator: &str) -> Result<EntryStat>;

    fn list_dir(&self, locator: &str) -> Result<Vec<DirEntry>>;

    fn read_bytes(&self, locator: &str) -> Result<Vec<u8>>;

    fn join(&self, parent: &str, name: &str) -> String;

    fn basename(&self, locator: &str) -> String {
        locator
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(locator)
            .to_string()
    }
}

/// Listed symlinks report the kind of their target too, so a linked
/// directory is matched by the excluded names. A dangling link is only a
/// symlink.
fn symlink_target_kind(path: &Path) -> FileKind {
    let mut kind = FileKind::symlink();
    if let Ok(meta) = fs::metadata(path) {
        kind.is_dir = meta.is_dir();
        kind.is_file = meta.is_file();
    }
    kind
}

/// Accessor backed by the local disk. Accepts plain paths and `file://` URIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn stat(&self, locator: &str) -> Result<EntryStat> {
        let path = locator_to_path(locator)?;
        let meta = fs::symlink_metadata(&path).map_err(|e| AppError::Stat {
            locator: locator.to_string(),
            source: e,
        })?;
        Ok(EntryStat {
            kind: FileKind::from_file_type(meta.file_type()),
            size: meta.len(),
        })
    }

    fn list_dir(&self, locator: &str) -> Result<Vec<DirEntry>> {
        let path = locator_to_path(locator)?;
        let reader = fs::read_dir(&path).map_err(|e| AppError::ListDir {
            locator: locator.to_string(),
            source: e,
        })?;

        let mut entries = Vec::new();
        for entry_result in reader {
            let entry = entry_result.map_err(|e| AppError::ListDir {
                locator: locator.to_string(),
                source: e,
            })?;
            let kind = match entry.file_type() {
                Ok(ft) if ft.is_symlink() => symlink_target_kind(&entry.path()),
                Ok(ft) => FileKind::from_file_type(ft),
                Err(e) => {
                    log::warn!(
                        "Could not determine type of {}: {}",
                        entry.path().display(),
                        e
                    );
                    FileKind::default()
                }
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        // read_dir order is platform dependent
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_bytes(&self, locator: &str) -> Result<Vec<u8>> {
        let path = locator_to_path(locator)?;
        fs::read(&path).map_err(|e| AppError::FileRead {
            locator: locator.to_string(),
            source: e,
        })
    }

    fn join(&self, parent: &str, name: &str) -> String {
        if is_uri(parent) {
            format!(
                "{}/{}",
                parent.trim_end_matches('/'),
                percent_encode_segment(name)
            )
        } else {
            Path::new(parent).join(name).to_string_lossy().into_owned()
        }
    }

    fn basename(&self, locator: &str) -> String {
        match locator_to_path(locator) {
            Ok(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
            Err(_) => locator.to_string(),
        }
    }
}

pub fn is_uri(locator: &str) -> bool {
    locator.contains("://")
}

/// Maps a locator to a local path. `file://` URIs are percent-decoded; any
/// other scheme is rejected.
pub fn locator_to_path(locator: &str) -> Result<PathBuf> {
    if !is_uri(locator) {
        if locator.is_empty() {
            return Err(AppError::InvalidLocator("empty locator".to_string()));
        }
        return Ok(PathBuf::from(locator));
    }

    let Some(rest) = strip_prefix_ignore_case(locator, FILE_URI_PREFIX) else {
        return Err(AppError::InvalidLocator(format!(
            "Unsupported locator scheme: {}",
            locator
        )));
    };

    // file://host/path keeps the authority; only the empty authority is local.
    let path_part = match rest.find('/') {
        Some(0) => rest,
        Some(idx) => {
            log::debug!(
                "Ignoring authority '{}' in file URI {}",
                &rest[..idx],
                locator
            );
            &rest[idx..]
        }
        None => {
            return Err(AppError::InvalidLocator(format!(
                "File URI without a path: {}",
                locator
            )));
        }
    };

    let decoded = percent_decode(path_part)
        .ok_or_else(|| AppError::InvalidLocator(format!("Malformed escape in {}", locator)))?;

    // file:///C:/dir -> C:/dir
    let bytes = decoded.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':'
    {
        return Ok(PathBuf::from(&decoded[1..]));
    }
    Ok(PathBuf::from(decoded))
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        value.get(prefix.len()..)
    } else {
        None
    }
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Some(String::from_utf8_lossy(&out).into_owned())
}

fn percent_encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'.'
            | b'_'
            | b'~'
            | b'!'
            | b'$'
            | b'&'
            | b'\''
            | b'('
            | b')'
            | b'*'
            | b'+'
            | b','
            | b';'
            | b'='
            | b'@' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
