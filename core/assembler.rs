use crate::content::{self, ContentReadResult};
use crate::document::DocumentNode;
use crate::fs_access::FileSystem;
use crate::language::{ContentClassifier, fence_tag};
use crate::messages::Messages;
use crate::workspace::Workspace;
use log;
use rayon::prelude::*;
use serde::Serialize;

pub const UNSUPPORTED_PLACEHOLDER: &str = "[Unsupported file type]";
pub const READ_ERROR_PLACEHOLDER: &str = "[Read error]";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyResult {
    pub text: String,
    pub file_reference_count: usize,
    pub warnings: Vec<String>,
}

/// Output of one subtree; merged into its parent in child order.
#[derive(Debug, Default)]
struct Rendered {
    text: String,
    warnings: Vec<String>,
}

impl Rendered {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            warnings: Vec::new(),
        }
    }

    fn with_warning(text: String, warning: String) -> Self {
        Self {
            text,
            warnings: vec![warning],
        }
    }
}

pub struct Assembler<'a> {
    fs: &'a dyn FileSystem,
    workspace: &'a Workspace,
    classifier: &'a dyn ContentClassifier,
    messages: Messages,
}

impl<'a> Assembler<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        workspace: &'a Workspace,
        classifier: &'a dyn ContentClassifier,
        messages: Messages,
    ) -> Self {
        Self {
            fs,
            workspace,
            classifier,
            messages,
        }
    }

    /// Renders the tree to prompt text. Unreadable or binary files become
    /// placeholders plus a warning; nothing in the tree aborts the run.
    pub fn assemble(&self, root: &DocumentNode) -> AssemblyResult {
        log::debug!("Assembling prompt...");
        let rendered = self.render_node(root);
        let file_reference_count = root.count_file_references();
        log::debug!(
            "Assembled {} chars, {} file references, {} warnings",
            rendered.text.len(),
            file_reference_count,
            rendered.warnings.len()
        );
        AssemblyResult {
            text: rendered.text,
            file_reference_count,
            warnings: rendered.warnings,
        }
    }

    fn render_node(&self, node: &DocumentNode) -> Rendered {
        match node {
            DocumentNode::Text(content) => Rendered::text(content.as_str()),
            DocumentNode::LineBreak => Rendered::text("\n"),
            DocumentNode::FileReference { locator, .. } => {
                self.render_file_reference(locator.as_deref().unwrap_or_default())
            }
            DocumentNode::Paragraph(children) | DocumentNode::Heading(children) => {
                let mut rendered = self.render_children(children);
                rendered.text.push('\n');
                rendered
            }
            DocumentNode::ListItem(children) => {
                let mut rendered = self.render_children(children);
                rendered.text.insert_str(0, "- ");
                rendered.text.push('\n');
                rendered
            }
            DocumentNode::List { children, .. } | DocumentNode::Other { children, .. } => {
                self.render_children(children)
            }
        }
    }

    // par_iter().collect() keeps source order regardless of completion order.
    fn render_children(&self, children: &[DocumentNode]) -> Rendered {
        let parts: Vec<Rendered> = children
            .par_iter()
            .map(|child| self.render_node(child))
            .collect();
        let mut merged = Rendered::default();
        for part in parts {
            merged.text.push_str(&part.text);
            merged.warnings.extend(part.warnings);
        }
        merged
    }

    fn render_file_reference(&self, locator: &str) -> Rendered {
        if locator.is_empty() {
            log::trace!("File reference without locator, rendering nothing");
            return Rendered::default();
        }
        let display_path = self.workspace.relative_display_path(locator);

        match content::read_full(self.fs, locator) {
            Ok(ContentReadResult {
                is_binary: true, ..
            }) => {
                log::debug!("Unsupported (binary) file: {}", display_path);
                Rendered::with_warning(
                    titled_block(&display_path, "", UNSUPPORTED_PLACEHOLDER),
                    self.messages.unsupported_file_type(&display_path),
                )
            }
            Ok(ContentReadResult { content, .. }) => {
                let language = self.classifier.classify(locator);
                Rendered::text(titled_block(&display_path, fence_tag(&language), &content))
            }
            Err(e) => {
                log::warn!("{}", e);
                Rendered::with_warning(
                    titled_block(&display_path, "", READ_ERROR_PLACEHOLDER),
                    self.messages.read_failed(&display_path),
                )
            }
        }
    }
}

fn titled_block(display_path: &str, language: &str, body: &str) -> String {
    format!(
        "\n\n### File: {}\n```{}\n{}\n```\n\n",
        display_path, language, body
    )
}
