pub mod assembler;
pub mod collector;
pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod fs_access;
pub mod host;
pub mod language;
pub mod messages;
pub mod workspace;

pub use assembler::{Assembler, AssemblyResult, READ_ERROR_PLACEHOLDER, UNSUPPORTED_PLACEHOLDER};
pub use collector::{CollectOutcome, CollectionBudget, FileEntry, collect};
pub use config::Config;
pub use content::{ContentReadResult, read_full, read_preview};
pub use document::DocumentNode;
pub use error::{AppError, Result};
pub use fs_access::{DirEntry, EntryStat, FileKind, FileSystem, LocalFileSystem};
pub use host::{Host, HostCommand, HostEvent, Session, parse_locator_lines, unique_locators};
pub use language::{ContentClassifier, ExtensionClassifier, PLAIN_TEXT};
pub use messages::{Locale, Messages};
pub use workspace::Workspace;
