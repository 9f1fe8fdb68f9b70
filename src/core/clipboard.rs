//! Copy-to-clipboard for the install snippets, with a manual-selection fallback.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tracing::warn;

pub const POWERSHELL_INSTALL: &str = "iwr \"https://github.com/0xarchit/Focusd/releases/latest/download/focusd.exe\" -OutFile focusd.exe; ./focusd.exe init";
pub const CMD_INSTALL: &str = "curl -L -o focusd.exe \"https://github.com/0xarchit/focusd/releases/latest/download/focusd.exe\" && focusd.exe init";

pub const POWERSHELL_COPIED: &str = "PowerShell command copied";
pub const CMD_COPIED: &str = "CMD command copied";
pub const COPY_FAILED: &str = "Copy failed. Please select manually.";
pub const COPY_ERROR: &str = "Copy error.";

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard API unavailable")]
    Unavailable,
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
    #[error("fallback copy threw: {0}")]
    Fallback(String),
}

pub type WriteFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ClipboardError>> + 'a>>;

pub trait Clipboard {
    /// Primary async clipboard write.
    fn write_text<'a>(&'a self, text: &'a str) -> WriteFuture<'a>;
    /// Select-and-copy through a temporary text area. `Ok(false)` means the
    /// host refused the copy command.
    fn fallback_copy(&self, text: &str) -> Result<bool, ClipboardError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallSnippet {
    PowerShell,
    Cmd,
}

impl InstallSnippet {
    pub fn command(self) -> &'static str {
        match self {
            InstallSnippet::PowerShell => POWERSHELL_INSTALL,
            InstallSnippet::Cmd => CMD_INSTALL,
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            InstallSnippet::PowerShell => POWERSHELL_COPIED,
            InstallSnippet::Cmd => CMD_COPIED,
        }
    }
}

/// Copy `text`, returning the toast message to show.
pub async fn copy_to_clipboard(clipboard: &dyn Clipboard, text: &str, success_msg: &str) -> String {
    match clipboard.write_text(text).await {
        Ok(()) => success_msg.to_string(),
        Err(e) => {
            warn!("Async: Could not copy text: {e}");
            fallback(clipboard, text, success_msg)
        }
    }
}

fn fallback(clipboard: &dyn Clipboard, text: &str, success_msg: &str) -> String {
    match clipboard.fallback_copy(text) {
        Ok(true) => success_msg.to_string(),
        Ok(false) => COPY_FAILED.to_string(),
        Err(e) => {
            warn!("Fallback: unable to copy: {e}");
            COPY_ERROR.to_string()
        }
    }
}

pub async fn copy_snippet(clipboard: &dyn Clipboard, snippet: InstallSnippet) -> String {
    copy_to_clipboard(clipboard, snippet.command(), snippet.success_message()).await
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    enum Fallback {
        Copies,
        Refuses,
        Throws,
    }

    struct FakeClipboard {
        primary_ok: bool,
        fallback: Fallback,
        copied: RefCell<Vec<String>>,
    }

    impl FakeClipboard {
        fn new(primary_ok: bool, fallback: Fallback) -> Self {
            Self {
                primary_ok,
                fallback,
                copied: RefCell::new(Vec::new()),
            }
        }
    }

    impl Clipboard for FakeClipboard {
        fn write_text<'a>(&'a self, text: &'a str) -> WriteFuture<'a> {
            Box::pin(async move {
                if self.primary_ok {
                    self.copied.borrow_mut().push(text.to_string());
                    Ok(())
                } else {
                    Err(ClipboardError::Unavailable)
                }
            })
        }

        fn fallback_copy(&self, text: &str) -> Result<bool, ClipboardError> {
            match self.fallback {
                Fallback::Copies => {
                    self.copied.borrow_mut().push(text.to_string());
                    Ok(true)
                }
                Fallback::Refuses => Ok(false),
                Fallback::Throws => Err(ClipboardError::Fallback("execCommand".into())),
            }
        }
    }

    #[test]
    fn primary_success_uses_the_success_toast() {
        let clip = FakeClipboard::new(true, Fallback::Throws);
        let msg = pollster::block_on(copy_snippet(&clip, InstallSnippet::PowerShell));
        assert_eq!(msg, POWERSHELL_COPIED);
        assert_eq!(clip.copied.borrow().as_slice(), [POWERSHELL_INSTALL]);
    }

    #[test]
    fn rejected_primary_falls_back() {
        let clip = FakeClipboard::new(false, Fallback::Copies);
        let msg = pollster::block_on(copy_snippet(&clip, InstallSnippet::Cmd));
        assert_eq!(msg, CMD_COPIED);
        assert_eq!(clip.copied.borrow().as_slice(), [CMD_INSTALL]);
    }

    #[test]
    fn total_failure_is_reported() {
        let refused = FakeClipboard::new(false, Fallback::Refuses);
        assert_eq!(
            pollster::block_on(copy_to_clipboard(&refused, "x", "ok")),
            COPY_FAILED
        );
        let threw = FakeClipboard::new(false, Fallback::Throws);
        assert_eq!(
            pollster::block_on(copy_to_clipboard(&threw, "x", "ok")),
            COPY_ERROR
        );
    }
}
