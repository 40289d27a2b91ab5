use clap::{Args, Parser, Subcommand};
use promptcomposer_core::Locale;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct WorkspaceConfigOpts {
    #[arg(
        long,
        help = "Workspace directory used for config lookup and display paths (default: $WORKSPACE_ROOT or current dir).",
        help_heading = "Workspace Setup",
        value_name = "PATH"
    )]
    pub workspace_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify path/filename of the TOML config file (default: .xtools/promptcomposer/promptcomposer.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "disable_config_file",
        help_heading = "Workspace Setup"
    )]
    pub config_file: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config_file",
        help_heading = "Workspace Setup"
    )]
    pub disable_config_file: bool,

    #[arg(
        long,
        help = "Language of warnings and notices (auto, en, zh-CN).",
        value_name = "LOCALE",
        value_parser = parse_locale,
        help_heading = "Workspace Setup"
    )]
    pub locale: Option<Locale>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BudgetOpts {
    #[arg(
        long,
        help = "Maximum number of files to collect [default: 200].",
        value_name = "COUNT",
        help_heading = "Collection Limits"
    )]
    pub max_files: Option<usize>,

    #[arg(
        long,
        help = "Maximum total size of collected files (e.g., '2MiB', '512KB') [default: 2MiB].",
        value_name = "SIZE_STRING",
        help_heading = "Collection Limits"
    )]
    pub max_total_bytes: Option<String>,

    #[arg(
        long,
        help = "Directory levels below a root that are still listed [default: 6].",
        value_name = "DEPTH",
        help_heading = "Collection Limits"
    )]
    pub max_depth: Option<usize>,

    #[arg(
        long = "exclude-dir",
        value_name = "NAME",
        action = clap::ArgAction::Append,
        help = "Directory name to skip while traversing; replaces the configured list (repeatable).",
        help_heading = "Collection Limits"
    )]
    pub exclude_dirs: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FormatOutputOpts {
    #[arg(short = 'f', long, help = "Set the output format.", value_name = "FORMAT", value_parser = ["json", "text"], help_heading = "Output Formatting")]
    pub format: Option<String>,

    #[arg(
        long,
        help = "Pretty-print JSON output instead of one compact line.",
        help_heading = "Output Formatting"
    )]
    pub pretty: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "promptcomposer",
    author,
    version,
    about = "Compose AI prompts from text and file references.",
    long_about = "promptcomposer collects files from selected folders under count, size and depth limits, \nand assembles an editor document into prompt text with each referenced file inlined \nas a titled code block. It also runs as a JSON-lines bridge for an editor front end.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  promptcomposer collect src docs --max-files 50\n  promptcomposer assemble prompt.json --copy\n  promptcomposer preview src/main.rs\n  promptcomposer serve .",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "c",
        about = "Expand files and folders into a bounded, ordered file list."
    )]
    Collect(CollectArgs),

    #[command(
        visible_alias = "a",
        about = "Assemble an editor document (JSON) into prompt text."
    )]
    Assemble(AssembleArgs),

    #[command(
        visible_alias = "p",
        about = "Show a bounded text preview of one file."
    )]
    Preview(PreviewArgs),

    #[command(about = "Run the JSON-lines message bridge on stdin/stdout.")]
    Serve(ServeArgs),

    #[command(about = "Generate or save shell completion scripts.")]
    Completion(CompletionArgs),

    #[command(about = "Show or save the default configuration file structure.")]
    Config(ConfigArgs),

    /// Keeps a copied prompt on the clipboard after `assemble --copy` exits.
    #[command(name = "clipboard-hold", hide = true)]
    ClipboardHold,
}

#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
    #[clap(flatten)]
    pub workspace_config: WorkspaceConfigOpts,
    #[clap(flatten)]
    pub budget: BudgetOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,

    #[arg(
        value_name = "ROOTS",
        help = "Files, folders or file:// URIs to expand, in order."
    )]
    pub roots: Vec<String>,

    #[arg(
        long,
        help = "Also read newline-separated paths from the clipboard.",
        help_heading = "Input"
    )]
    pub clipboard: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AssembleArgs {
    #[clap(flatten)]
    pub workspace_config: WorkspaceConfigOpts,

    #[arg(
        value_name = "DOCUMENT",
        help = "Editor document JSON file, or '-' to read standard input."
    )]
    pub document: String,

    #[arg(
        long,
        help = "Write the prompt to the clipboard.",
        help_heading = "Output Control"
    )]
    pub copy: bool,

    #[arg(
        long,
        help = "Force output of the prompt to standard output (also with --copy).",
        help_heading = "Output Control"
    )]
    pub stdout: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    #[clap(flatten)]
    pub workspace_config: WorkspaceConfigOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,

    #[arg(value_name = "PATH", help = "File path or file:// URI to preview.")]
    pub path: String,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[clap(flatten)]
    pub workspace_config: WorkspaceConfigOpts,
    #[clap(flatten)]
    pub budget: BudgetOpts,

    #[arg(
        value_name = "PICK_ROOTS",
        help = "Entries returned when the front end asks to pick files."
    )]
    pub pick_roots: Vec<String>,

    #[arg(
        long,
        help = "Do not touch the system clipboard; copy requests only report events.",
        help_heading = "Output Control"
    )]
    pub no_clipboard: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        help = "Shell to generate completions for (fish, bash, zsh) [default: fish]"
    )]
    pub shell: Option<String>,
    #[arg(
        long,
        help = "Save completion script to default location (prompts overwrite)."
    )]
    pub save: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[clap(flatten)]
    pub workspace_config: WorkspaceConfigOpts,

    #[arg(
        long,
        help = "Save default config structure to default path (prompts overwrite)."
    )]
    pub save: bool,
}

fn parse_locale(s: &str) -> std::result::Result<Locale, String> {
    s.parse::<Locale>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn collect_overrides_parse() {
        let cli = Cli::parse_from([
            "promptcomposer",
            "collect",
            "src",
            "docs",
            "--max-files",
            "5",
            "--max-total-bytes",
            "1MiB",
            "--exclude-dir",
            "target",
            "--exclude-dir",
            "vendor",
            "--locale",
            "zh-CN",
            "-f",
            "text",
        ]);
        let Some(Commands::Collect(args)) = cli.command else {
            panic!("expected collect command");
        };
        assert_eq!(args.roots, vec!["src", "docs"]);
        assert_eq!(args.budget.max_files, Some(5));
        assert_eq!(args.budget.max_total_bytes.as_deref(), Some("1MiB"));
        assert_eq!(args.budget.exclude_dirs, vec!["target", "vendor"]);
        assert_eq!(args.workspace_config.locale, Some(Locale::ZhCn));
        assert_eq!(args.format_output.format.as_deref(), Some("text"));
    }

    #[test]
    fn config_file_conflicts_with_disable_flag() {
        let result = Cli::try_parse_from([
            "promptcomposer",
            "collect",
            "--config-file",
            "team",
            "--disable-config-file",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn preview_accepts_workspace_options() {
        let cli = Cli::parse_from([
            "promptcomposer",
            "preview",
            "src/main.rs",
            "--locale",
            "zh-CN",
            "--disable-config-file",
        ]);
        let Some(Commands::Preview(args)) = cli.command else {
            panic!("expected preview command");
        };
        assert_eq!(args.path, "src/main.rs");
        assert_eq!(args.workspace_config.locale, Some(Locale::ZhCn));
        assert!(args.workspace_config.disable_config_file);
    }

    #[test]
    fn clipboard_holder_command_is_hidden() {
        let command = Cli::command();
        let holder = command
            .find_subcommand(crate::clipboard::HOLD_COMMAND)
            .unwrap();
        assert!(holder.is_hide_set());
        let cli = Cli::parse_from(["promptcomposer", crate::clipboard::HOLD_COMMAND]);
        assert!(matches!(cli.command, Some(Commands::ClipboardHold)));
    }

    #[test]
    fn unknown_locale_is_rejected() {
        let result = Cli::try_parse_from(["promptcomposer", "serve", "--locale", "de"]);
        assert!(result.is_err());
    }
}
