use crate::cli_args::CollectArgs;
use crate::clipboard::SystemClipboard;
use crate::{load_config_for_command, messages_for};
use crate::output::{print_data_or_text, print_notice, print_warnings};
use anyhow::{Context, Result};
use log;
use promptcomposer_core::fs_access::is_uri;
use promptcomposer_core::{
    CollectOutcome, CollectionBudget, LocalFileSystem, Messages, parse_locator_lines,
    unique_locators,
};
use std::path::{self, Path};

pub fn handle_collect_command(args: CollectArgs, quiet: bool) -> Result<()> {
    let (_workspace_root, config) =
        load_config_for_command(&args.workspace_config, Some(&args.budget))
            .context("Failed to load configuration for collect command")?;
    let budget = config.collection_budget()?;
    let messages = messages_for(&config);

    let mut locators = args
        .roots
        .iter()
        .map(|root| absolute_locator(root))
        .collect::<Result<Vec<_>>>()?;
    if args.clipboard {
        let text = SystemClipboard::new().read_text()?;
        let from_clipboard = parse_locator_lines(&text);
        log::debug!("Read {} paths from clipboard", from_clipboard.len());
        for root in &from_clipboard {
            locators.push(absolute_locator(root)?);
        }
    }
    let locators = unique_locators(locators);

    if locators.is_empty() {
        print_notice(&messages.nothing_selected(), quiet);
        return Ok(());
    }

    let outcome = collect_from_disk(&locators, &budget, &messages);
    if outcome.files.is_empty() {
        print_notice(&messages.no_files_to_insert(), quiet);
    }
    print_warnings(&outcome.warnings, quiet);
    print_data_or_text(&outcome, Some(render_text(&outcome)), &args.format_output, "json")
}

fn collect_from_disk(
    locators: &[String],
    budget: &CollectionBudget,
    messages: &Messages,
) -> CollectOutcome {
    promptcomposer_core::collect(&LocalFileSystem::new(), locators, budget, messages)
}

/// Relative paths are taken from the current directory; URIs pass through.
pub fn absolute_locator(root: &str) -> Result<String> {
    if is_uri(root) {
        return Ok(root.to_string());
    }
    let expanded = shellexpand::tilde(root);
    let absolute = path::absolute(Path::new(expanded.as_ref()))
        .with_context(|| format!("Failed to resolve path '{}'", root))?;
    Ok(absolute.to_string_lossy().into_owned())
}

fn render_text(outcome: &CollectOutcome) -> String {
    outcome
        .files
        .iter()
        .map(|file| format!("{}\n", file.locator))
        .collect()
}
