use arboard::Clipboard;
use promptcomposer_core::{AppError, Result};
use std::io::{self, BufRead, Read};

/// Hidden subcommand that keeps a copied prompt on the clipboard.
pub const HOLD_COMMAND: &str = "clipboard-hold";
const READY_LINE: &str = "ready";

/// System clipboard, opened lazily on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut Clipboard> {
        if self.inner.is_none() {
            self.inner = Some(open_clipboard()?);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| AppError::Host("Clipboard unavailable".to_string()))
    }

    pub fn read_text(&mut self) -> Result<String> {
        self.handle()?
            .get_text()
            .map_err(|e| AppError::Host(format!("Failed to read clipboard: {}", e)))
    }

    /// Only lasts while this process owns the selection; fine for `serve`.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        log::debug!("Writing {} bytes to clipboard", text.len());
        self.handle()?
            .set_text(text)
            .map_err(|e| AppError::Host(format!("Failed to copy to clipboard: {}", e)))
    }

    /// Copy that outlives the process. On X11 and Wayland the selection
    /// disappears with its owner, so a detached holder process takes it over.
    #[cfg(all(
        unix,
        not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
    ))]
    pub fn write_text_persistent(&mut self, text: &str) -> Result<()> {
        spawn_holder(text)
    }

    #[cfg(not(all(
        unix,
        not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
    )))]
    pub fn write_text_persistent(&mut self, text: &str) -> Result<()> {
        self.write_text(text)
    }
}

fn open_clipboard() -> Result<Clipboard> {
    Clipboard::new().map_err(|e| AppError::Host(format!("Failed to access clipboard: {}", e)))
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn spawn_holder(text: &str) -> Result<()> {
    use std::io::{BufReader, Write};
    use std::process::{Command, Stdio};

    let host_err = |what: &str, e: io::Error| AppError::Host(format!("{}: {}", what, e));
    let exe = std::env::current_exe().map_err(|e| host_err("Failed to locate executable", e))?;
    let mut child = Command::new(exe)
        .arg(HOLD_COMMAND)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| host_err("Failed to start clipboard holder", e))?;
    log::debug!("Started clipboard holder (pid {})", child.id());

    // dropping stdin closes it, which ends the holder's read
    {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AppError::Host("Clipboard holder has no stdin".to_string()))?;
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| host_err("Failed to hand prompt to clipboard holder", e))?;
    }
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| AppError::Host("Clipboard holder has no stdout".to_string()))?;
    await_holder_ready(BufReader::new(stdout))
}

/// Waits for the holder's ready line; anything else means it gave up.
pub fn await_holder_ready<R: BufRead>(mut reader: R) -> Result<()> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| AppError::Host(format!("Failed to hear from clipboard holder: {}", e)))?;
    if line.trim_end() == READY_LINE {
        Ok(())
    } else {
        Err(AppError::Host(
            "Clipboard holder exited before taking the clipboard".to_string(),
        ))
    }
}

/// Body of the hidden holder command: reads the prompt from stdin, takes the
/// clipboard, reports ready and then serves it until another owner replaces it.
pub fn hold_clipboard_from_stdin() -> Result<()> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    let mut clipboard = open_clipboard()?;
    clipboard
        .set_text(text.as_str())
        .map_err(|e| AppError::Host(format!("Failed to copy to clipboard: {}", e)))?;
    println!("{}", READY_LINE);
    io::Write::flush(&mut io::stdout())?;
    serve_until_replaced(&mut clipboard, text)
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn serve_until_replaced(clipboard: &mut Clipboard, text: String) -> Result<()> {
    use arboard::SetExtLinux;

    clipboard
        .set()
        .wait()
        .text(text)
        .map_err(|e| AppError::Host(format!("Clipboard holder failed: {}", e)))?;
    log::debug!("Clipboard taken over by another owner, holder exiting");
    Ok(())
}

#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn serve_until_replaced(_clipboard: &mut Clipboard, _text: String) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_line_is_accepted() {
        assert!(await_holder_ready(&b"ready\n"[..]).is_ok());
    }

    #[test]
    fn silent_or_chatty_holder_is_an_error() {
        assert!(matches!(
            await_holder_ready(&b""[..]),
            Err(AppError::Host(_))
        ));
        assert!(matches!(
            await_holder_ready(&b"no display\n"[..]),
            Err(AppError::Host(_))
        ));
    }
}
