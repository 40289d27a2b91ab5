mod cli_args;
mod clipboard;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use log;
use std::env;
use std::path::{Path, PathBuf};
use std::process;

use cli_args::{BudgetOpts, Cli, Commands, WorkspaceConfigOpts};
use promptcomposer_core::{AppError, Config, Messages};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);

            // Config and argument errors are reported even in quiet mode
            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }

            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<AppError>() {
        Some(AppError::Config(_)) => 1,
        Some(AppError::TomlParse(_)) => 1,
        Some(AppError::TomlSerialize(_)) => 1,
        Some(AppError::Document(_)) => 1,
        Some(AppError::Io(_)) => 2,
        Some(AppError::Stat { .. }) => 2,
        Some(AppError::ListDir { .. }) => 2,
        Some(AppError::FileRead { .. }) => 2,
        Some(AppError::InvalidLocator(_)) => 2,
        Some(AppError::Host(_)) => 3,
        Some(AppError::InvalidArgument(_)) => 5,
        Some(AppError::ByteSize(_)) => 5,
        Some(AppError::JsonSerialize(_)) => 6,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    // env_logger writes to stderr; stdout is reserved for data and bridge events
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(command) => match command {
            Commands::Collect(args) => {
                log::debug!("Executing 'collect' command...");
                commands::collect::handle_collect_command(args, quiet)?;
            }
            Commands::Assemble(args) => {
                log::debug!("Executing 'assemble' command...");
                commands::assemble::handle_assemble_command(args, quiet)?;
            }
            Commands::Preview(args) => {
                log::debug!("Executing 'preview' command...");
                commands::preview::handle_preview_command(args, quiet)?;
            }
            Commands::Serve(args) => {
                log::debug!("Executing 'serve' command...");
                commands::serve::handle_serve_command(args)?;
            }
            Commands::Completion(args) => {
                log::debug!("Executing 'completion' command...");
                commands::completion::handle_completion_command(&args, quiet)?;
            }
            Commands::Config(args) => {
                log::debug!("Executing 'config' command...");
                let workspace_root = Config::determine_workspace_root(
                    args.workspace_config.workspace_root.as_ref(),
                )
                .context("Failed to determine workspace root for config command")?;
                commands::config::handle_config_command(&args, &workspace_root, quiet)?;
            }
            Commands::ClipboardHold => {
                log::debug!("Holding clipboard contents...");
                clipboard::hold_clipboard_from_stdin()?;
            }
        },
    }
    Ok(())
}

fn merge_config_with_cli_overrides(
    mut config: Config,
    workspace_opts: &WorkspaceConfigOpts,
    budget: Option<&BudgetOpts>,
) -> Config {
    log::trace!("Applying CLI overrides to config...");

    if let Some(locale) = workspace_opts.locale {
        config.general.locale = locale;
    }

    if let Some(budget) = budget {
        if let Some(max_files) = budget.max_files {
            config.collect.max_files = max_files;
        }
        if let Some(max_total_bytes) = &budget.max_total_bytes {
            config.collect.max_total_bytes = max_total_bytes.clone();
        }
        if let Some(max_depth) = budget.max_depth {
            config.collect.max_depth = max_depth;
        }
        if !budget.exclude_dirs.is_empty() {
            config.collect.exclude_dirs = budget.exclude_dirs.clone();
        }
    }

    log::trace!("Config after CLI overrides: {:?}", config);
    config
}

/// Resolves the workspace root, loads its config file (if any) and applies
/// command-line overrides.
pub fn load_config_for_command(
    workspace_opts: &WorkspaceConfigOpts,
    budget: Option<&BudgetOpts>,
) -> Result<(PathBuf, Config)> {
    let workspace_root = Config::determine_workspace_root(workspace_opts.workspace_root.as_ref())
        .context("Failed to determine workspace root")?;
    log::info!("Workspace root determined: {}", workspace_root.display());

    let config = load_config_at(&workspace_root, workspace_opts)?;
    Ok((
        workspace_root,
        merge_config_with_cli_overrides(config, workspace_opts, budget),
    ))
}

/// Locale tag from `LC_ALL`, `LC_MESSAGES` or `LANG`, first usable one wins.
fn env_locale_tag() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
}

/// Message catalogue for `config`, with `auto` resolved from the environment.
pub fn messages_for(config: &Config) -> Messages {
    config.messages(env_locale_tag().as_deref())
}

fn load_config_at(workspace_root: &Path, workspace_opts: &WorkspaceConfigOpts) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        workspace_root,
        workspace_opts.config_file.as_ref(),
        workspace_opts.disable_config_file,
    )
    .context("Failed to resolve configuration path")?;

    match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptcomposer_core::Locale;

    #[test]
    fn overrides_replace_config_values() {
        let opts = WorkspaceConfigOpts {
            locale: Some(Locale::ZhCn),
            ..Default::default()
        };
        let budget = BudgetOpts {
            max_files: Some(7),
            max_total_bytes: Some("10KiB".to_string()),
            max_depth: None,
            exclude_dirs: vec!["target".to_string()],
        };
        let config = merge_config_with_cli_overrides(Config::default(), &opts, Some(&budget));
        assert_eq!(config.general.locale, Locale::ZhCn);
        assert_eq!(config.collect.max_files, 7);
        assert_eq!(config.collect.max_total_bytes, "10KiB");
        assert_eq!(config.collect.max_depth, 6);
        assert_eq!(config.collect.exclude_dirs, vec!["target"]);
    }

    #[test]
    fn no_overrides_keep_config() {
        let config = merge_config_with_cli_overrides(
            Config::default(),
            &WorkspaceConfigOpts::default(),
            None,
        );
        assert_eq!(config, Config::default());
    }

    #[test]
    fn core_errors_map_to_exit_codes() {
        let err = anyhow::Error::from(AppError::InvalidArgument("x".to_string()));
        assert_eq!(exit_code_for(&err), 5);
        let err = anyhow::Error::from(AppError::Document("x".to_string()));
        assert_eq!(exit_code_for(&err), 1);
        let err = anyhow::Error::from(AppError::Io(std::io::Error::other("x")));
        assert_eq!(exit_code_for(&err), 2);
        assert_eq!(exit_code_for(&anyhow::anyhow!("plain")), 1);
    }
}
