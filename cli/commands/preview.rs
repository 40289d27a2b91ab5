use crate::cli_args::PreviewArgs;
use crate::commands::collect::absolute_locator;
use crate::{load_config_for_command, messages_for};
use crate::output::{print_data_or_text, print_notice};
use anyhow::{Context, Result};
use promptcomposer_core::{LocalFileSystem, read_preview};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewOutput {
    path: String,
    is_binary: bool,
    content: String,
}

pub fn handle_preview_command(args: PreviewArgs, quiet: bool) -> Result<()> {
    let (_workspace_root, config) = load_config_for_command(&args.workspace_config, None)
        .context("Failed to load configuration for preview command")?;
    let messages = messages_for(&config);
    let locator = absolute_locator(&args.path)?;
    let result = read_preview(&LocalFileSystem::new(), &locator)
        .with_context(|| format!("Failed to preview '{}'", args.path))?;

    if result.is_binary {
        print_notice(&messages.unsupported_file_type(&args.path), quiet);
    }

    // binary previews carry no content
    let text = result.content.clone();
    let output = PreviewOutput {
        path: locator,
        is_binary: result.is_binary,
        content: result.content,
    };
    print_data_or_text(&output, Some(text), &args.format_output, "text")
}
