use crate::cli_args::AssembleArgs;
use crate::clipboard::SystemClipboard;
use crate::{load_config_for_command, messages_for};
use crate::output::{print_warnings, write_to_stdout};
use anyhow::{Context, Result};
use colored::*;
use log;
use promptcomposer_core::{
    Assembler, DocumentNode, ExtensionClassifier, LocalFileSystem, Messages,
};
use std::fs;
use std::io::{self, Read};

pub fn handle_assemble_command(args: AssembleArgs, quiet: bool) -> Result<()> {
    let (workspace_root, config) = load_config_for_command(&args.workspace_config, None)
        .context("Failed to load configuration for assemble command")?;
    let messages = messages_for(&config);
    let workspace = config.workspace(&workspace_root);

    let raw = read_document_source(&args.document)?;
    if raw.trim().is_empty() {
        anyhow::bail!(promptcomposer_core::AppError::Document(
            messages.editor_empty()
        ));
    }
    let document = DocumentNode::from_json_str(&raw)
        .with_context(|| format!("Failed to decode document from '{}'", args.document))?;

    let fs = LocalFileSystem::new();
    let classifier = ExtensionClassifier;
    let result = Assembler::new(&fs, &workspace, &classifier, messages).assemble(&document);
    log::info!(
        "Assembled prompt with {} file references",
        result.file_reference_count
    );

    if args.copy {
        copy_to_clipboard(&result.text, messages)?;
        if !quiet {
            eprintln!(
                "{} Prompt copied ({} file references).",
                "✅".green(),
                result.file_reference_count.to_string().cyan()
            );
        }
    }
    print_warnings(&result.warnings, quiet);

    if !args.copy || args.stdout {
        write_to_stdout(&result.text)?;
    }
    Ok(())
}

fn read_document_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read document from stdin")?;
        return Ok(buffer);
    }
    let path = shellexpand::tilde(source);
    fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read document file '{}'", source))
}

fn copy_to_clipboard(text: &str, messages: Messages) -> Result<()> {
    SystemClipboard::new()
        .write_text_persistent(text)
        .with_context(|| messages.copy_failed())
}
