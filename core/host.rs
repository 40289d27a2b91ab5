//! Messages exchanged with the editor surface, and the single place where
//! collection and assembly results turn into side effects.

use crate::assembler::Assembler;
use crate::collector::{self, CollectionBudget, FileEntry};
use crate::content;
use crate::document::DocumentNode;
use crate::error::Result;
use crate::fs_access::FileSystem;
use crate::language::ContentClassifier;
use crate::messages::Messages;
use crate::workspace::Workspace;
use log;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Inbound message, tagged by its `command` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum HostCommand {
    PickFiles,
    AddFiles {
        #[serde(default)]
        paths: Vec<String>,
    },
    CopyPrompt {
        #[serde(default)]
        json: Option<Value>,
    },
    RequestPreview {
        path: String,
    },
    #[serde(other)]
    Unknown,
}

/// Outbound message, tagged by its `command` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "command",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum HostEvent {
    InsertFiles {
        files: Vec<FileEntry>,
        warnings: Vec<String>,
    },
    CopySuccess {
        count: usize,
        warnings: Vec<String>,
    },
    CopyError {
        message: String,
    },
    Preview {
        path: String,
        is_binary: bool,
        content: String,
    },
    PreviewError {
        path: String,
        message: String,
    },
    Info {
        message: String,
    },
}

/// Capabilities owned by the embedding host.
pub trait Host {
    /// Entries the user picked; empty when the selection was cancelled.
    fn pick_files(&mut self) -> Vec<String>;

    fn write_clipboard(&mut self, text: &str) -> Result<()>;

    fn post(&mut self, event: HostEvent);
}

/// Splits a newline-separated path list, trimming lines and dropping blanks.
pub fn parse_locator_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Drops repeated locators, keeping first occurrences in order.
pub fn unique_locators(locators: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    locators
        .into_iter()
        .filter(|locator| seen.insert(locator.clone()))
        .collect()
}

pub struct Session<'a> {
    fs: &'a dyn FileSystem,
    workspace: Workspace,
    classifier: &'a dyn ContentClassifier,
    budget: CollectionBudget,
    messages: Messages,
}

impl<'a> Session<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        workspace: Workspace,
        classifier: &'a dyn ContentClassifier,
        budget: CollectionBudget,
        messages: Messages,
    ) -> Self {
        Self {
            fs,
            workspace,
            classifier,
            budget,
            messages,
        }
    }

    pub fn dispatch(&self, command: HostCommand, host: &mut dyn Host) {
        log::debug!("Dispatching host command: {:?}", command);
        match command {
            HostCommand::PickFiles => {
                let picked = host.pick_files();
                if picked.is_empty() {
                    log::debug!("File picker returned nothing.");
                    return;
                }
                self.insert_locators(unique_locators(picked), host);
            }
            HostCommand::AddFiles { paths } => {
                self.insert_locators(unique_locators(paths), host);
            }
            HostCommand::CopyPrompt { json } => self.copy_prompt(json, host),
            HostCommand::RequestPreview { path } => self.preview(path, host),
            HostCommand::Unknown => {
                log::debug!("Ignoring unknown host command.");
            }
        }
    }

    fn insert_locators(&self, locators: Vec<String>, host: &mut dyn Host) {
        if locators.is_empty() {
            host.post(HostEvent::Info {
                message: self.messages.nothing_selected(),
            });
            return;
        }
        let outcome = collector::collect(self.fs, &locators, &self.budget, &self.messages);
        if outcome.files.is_empty() {
            host.post(HostEvent::Info {
                message: self.messages.no_files_to_insert(),
            });
            return;
        }
        host.post(HostEvent::InsertFiles {
            files: outcome.files,
            warnings: outcome.warnings,
        });
    }

    fn copy_prompt(&self, json: Option<Value>, host: &mut dyn Host) {
        let Some(json) = json.filter(|value| !value.is_null()) else {
            host.post(HostEvent::CopyError {
                message: self.messages.editor_empty(),
            });
            return;
        };

        let document = match DocumentNode::from_json_value(json) {
            Ok(document) => document,
            Err(e) => {
                log::error!("Rejected document: {}", e);
                host.post(HostEvent::CopyError {
                    message: self.messages.copy_failed(),
                });
                return;
            }
        };

        let assembler = Assembler::new(self.fs, &self.workspace, self.classifier, self.messages);
        let result = assembler.assemble(&document);

        match host.write_clipboard(&result.text) {
            Ok(()) => host.post(HostEvent::CopySuccess {
                count: result.file_reference_count,
                warnings: result.warnings,
            }),
            Err(e) => {
                log::error!("Clipboard write failed: {}", e);
                host.post(HostEvent::CopyError {
                    message: self.messages.copy_failed(),
                });
            }
        }
    }

    fn preview(&self, path: String, host: &mut dyn Host) {
        match content::read_preview(self.fs, &path) {
            Ok(result) => host.post(HostEvent::Preview {
                path,
                is_binary: result.is_binary,
                content: result.content,
            }),
            Err(e) => {
                log::warn!("{}", e);
                host.post(HostEvent::PreviewError {
                    path,
                    message: self.messages.preview_failed(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_lines_are_trimmed_and_deduped() {
        let parsed = parse_locator_lines("  /w/a.rs\r\n\n/w/b.rs\n/w/a.rs  \n");
        assert_eq!(parsed, vec!["/w/a.rs", "/w/b.rs", "/w/a.rs"]);
        assert_eq!(unique_locators(parsed), vec!["/w/a.rs", "/w/b.rs"]);
    }

    #[test]
    fn commands_decode_from_webview_json() {
        let cmd: HostCommand = serde_json::from_value(json!({"command": "pick-files"})).unwrap();
        assert_eq!(cmd, HostCommand::PickFiles);

        let cmd: HostCommand =
            serde_json::from_value(json!({"command": "copy-prompt", "json": {"type": "doc"}}))
                .unwrap();
        assert_eq!(
            cmd,
            HostCommand::CopyPrompt {
                json: Some(json!({"type": "doc"}))
            }
        );

        let cmd: HostCommand = serde_json::from_value(json!({"command": "copy-prompt"})).unwrap();
        assert_eq!(cmd, HostCommand::CopyPrompt { json: None });

        let cmd: HostCommand =
            serde_json::from_value(json!({"command": "open-file", "path": "/w/a.rs"})).unwrap();
        assert_eq!(cmd, HostCommand::Unknown);
    }

    #[test]
    fn events_encode_for_webview() {
        let event = HostEvent::CopySuccess {
            count: 2,
            warnings: vec!["a.png: unsupported file type".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"command": "copy-success", "count": 2, "warnings": ["a.png: unsupported file type"]})
        );

        let event = HostEvent::Preview {
            path: "/w/a.rs".to_string(),
            is_binary: false,
            content: "fn".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"command": "preview", "path": "/w/a.rs", "isBinary": false, "content": "fn"})
        );
    }
}
