use crate::cli_args::ServeArgs;
use crate::clipboard::SystemClipboard;
use crate::commands::collect::absolute_locator;
use crate::{load_config_for_command, messages_for};
use anyhow::{Context, Result};
use log;
use promptcomposer_core::{
    ExtensionClassifier, Host, HostCommand, HostEvent, LocalFileSystem, Session,
};
use std::io::{self, BufRead, Write};

/// Bridge host: events become JSON lines on `out`, picks return fixed roots.
pub struct StdioHost<W: Write> {
    out: W,
    pick_roots: Vec<String>,
    clipboard: Option<SystemClipboard>,
}

impl<W: Write> StdioHost<W> {
    pub fn new(out: W, pick_roots: Vec<String>, clipboard: Option<SystemClipboard>) -> Self {
        Self {
            out,
            pick_roots,
            clipboard,
        }
    }

    fn write_event(&mut self, event: &HostEvent) -> Result<()> {
        let line = serde_json::to_string(event).context("Failed to encode host event")?;
        writeln!(self.out, "{}", line).context("Failed to write host event")?;
        self.out.flush().context("Failed to flush host event")?;
        Ok(())
    }
}

impl<W: Write> Host for StdioHost<W> {
    fn pick_files(&mut self) -> Vec<String> {
        self.pick_roots.clone()
    }

    fn write_clipboard(&mut self, text: &str) -> promptcomposer_core::Result<()> {
        match self.clipboard.as_mut() {
            Some(clipboard) => clipboard.write_text(text),
            None => {
                log::info!("Clipboard disabled; dropping {} bytes of prompt", text.len());
                Ok(())
            }
        }
    }

    fn post(&mut self, event: HostEvent) {
        if let Err(e) = self.write_event(&event) {
            log::error!("{:#}", e);
        }
    }
}

pub fn handle_serve_command(args: ServeArgs) -> Result<()> {
    let (workspace_root, config) =
        load_config_for_command(&args.workspace_config, Some(&args.budget))
            .context("Failed to load configuration for serve command")?;
    let budget = config.collection_budget()?;
    let pick_roots = args
        .pick_roots
        .iter()
        .map(|root| absolute_locator(root))
        .collect::<Result<Vec<_>>>()?;

    let fs = LocalFileSystem::new();
    let classifier = ExtensionClassifier;
    let session = Session::new(
        &fs,
        config.workspace(&workspace_root),
        &classifier,
        budget,
        messages_for(&config),
    );
    let clipboard = (!args.no_clipboard).then(SystemClipboard::new);
    let mut host = StdioHost::new(io::stdout(), pick_roots, clipboard);

    log::info!("Bridge ready, reading commands from stdin");
    run_bridge(&session, io::stdin().lock(), &mut host)
}

/// Dispatches one command per input line until end of input. Lines that do
/// not decode are logged and skipped.
pub fn run_bridge<R: BufRead>(session: &Session, input: R, host: &mut dyn Host) -> Result<()> {
    for line_result in input.lines() {
        let line = line_result.context("Failed to read command from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<HostCommand>(line) {
            Ok(command) => session.dispatch(command, host),
            Err(e) => log::warn!("Ignoring malformed command line: {}", e),
        }
    }
    log::info!("Input closed, bridge stopping");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptcomposer_core::{CollectionBudget, Messages, Workspace};
    use serde_json::Value;
    use std::fs;

    fn events(raw: &[u8]) -> Vec<Value> {
        String::from_utf8_lossy(raw)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn bridge_answers_each_command_line() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();
        let main_rs = root.join("main.rs").to_string_lossy().into_owned();

        let fs = LocalFileSystem::new();
        let classifier = ExtensionClassifier;
        let session = Session::new(
            &fs,
            Workspace::single(root),
            &classifier,
            CollectionBudget::default(),
            Messages::english(),
        );
        let input = format!(
            "{}\n\nnot json\n{}\n{}\n",
            serde_json::json!({"command": "pick-files"}),
            serde_json::json!({"command": "request-preview", "path": main_rs}),
            serde_json::json!({"command": "copy-prompt", "json": {"type": "doc", "content": [
                {"type": "paragraph", "content": [{"type": "fileCapsule", "attrs": {"path": main_rs}}]}
            ]}}),
        );

        let mut out = Vec::new();
        {
            let mut host = StdioHost::new(
                &mut out,
                vec![root.to_string_lossy().into_owned()],
                None,
            );
            run_bridge(&session, input.as_bytes(), &mut host).unwrap();
        }

        let events = events(&out);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["command"], "insert-files");
        assert_eq!(events[0]["files"][0]["name"], "main.rs");
        assert_eq!(events[1]["command"], "preview");
        assert_eq!(events[1]["isBinary"], false);
        assert_eq!(events[1]["content"], "fn main() {}");
        assert_eq!(events[2]["command"], "copy-success");
        assert_eq!(events[2]["count"], 1);
    }

    #[test]
    fn empty_pick_roots_post_nothing() {
        let fs = LocalFileSystem::new();
        let classifier = ExtensionClassifier;
        let session = Session::new(
            &fs,
            Workspace::default(),
            &classifier,
            CollectionBudget::default(),
            Messages::english(),
        );
        let mut out = Vec::new();
        {
            let mut host = StdioHost::new(&mut out, vec![], None);
            run_bridge(&session, &b"{\"command\":\"pick-files\"}\n"[..], &mut host).unwrap();
        }
        assert!(out.is_empty());
    }
}
