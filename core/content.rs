//! Reads file content as text, flagging binary data.
//!
//! Binary detection only samples the first [`BINARY_SAMPLE_BYTES`] bytes for a
//! zero byte. Files whose first zero byte lies beyond the sample, or binary
//! formats without zero bytes, are reported as text.

use crate::error::Result;
use crate::fs_access::FileSystem;
use log;
use serde::Serialize;

pub const BINARY_SAMPLE_BYTES: usize = 8000;
pub const PREVIEW_MAX_LINES: usize = 100;
pub const PREVIEW_MAX_BYTES: usize = 5 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReadResult {
    pub is_binary: bool,
    pub content: String,
}

impl ContentReadResult {
    fn binary() -> Self {
        Self {
            is_binary: true,
            content: String::new(),
        }
    }
}

pub fn is_binary(data: &[u8]) -> bool {
    let sample = &data[..data.len().min(BINARY_SAMPLE_BYTES)];
    sample.contains(&0)
}

/// Reads the whole entry. I/O failures are returned, never folded into an
/// empty or binary result.
pub fn read_full(fs: &dyn FileSystem, locator: &str) -> Result<ContentReadResult> {
    let data = fs.read_bytes(locator)?;
    if is_binary(&data) {
        log::trace!("Binary content detected: {}", locator);
        return Ok(ContentReadResult::binary());
    }
    let text = String::from_utf8_lossy(&data);
    Ok(ContentReadResult {
        is_binary: false,
        content: text.strip_prefix('\u{FEFF}').unwrap_or(&text).to_string(),
    })
}

/// Like [`read_full`], bounded to the first [`PREVIEW_MAX_LINES`] lines and
/// then to [`PREVIEW_MAX_BYTES`] bytes of their UTF-8 encoding. The byte cut
/// can split a multi-byte character; the broken tail decodes to U+FFFD.
pub fn read_preview(fs: &dyn FileSystem, locator: &str) -> Result<ContentReadResult> {
    let full = read_full(fs, locator)?;
    if full.is_binary {
        return Ok(full);
    }
    Ok(ContentReadResult {
        is_binary: false,
        content: bound_preview(&full.content),
    })
}

fn bound_preview(content: &str) -> String {
    let lines = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .take(PREVIEW_MAX_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    let bytes = lines.as_bytes();
    if bytes.len() <= PREVIEW_MAX_BYTES {
        return lines;
    }
    String::from_utf8_lossy(&bytes[..PREVIEW_MAX_BYTES]).into_owned()
}
