//! Console bridge
//!
//! Turns runtime output into the page's log. Lines the runtime marks for
//! display (a leading `"`) are sanitized and appended to the display
//! buffer; everything else only goes to the diagnostic log.

use tokio::sync::watch;

use gbhost_shared::{DISPLAY_SEPARATOR, LINE_BREAK};

use crate::runtime::OutputSink;

/// One line of runtime output, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// Sanitized text destined for the display buffer
    Displayable(String),
    /// Raw text for the diagnostic log only
    Diagnostic(String),
}

impl OutputLine {
    /// Classify a line by its first character.
    pub fn classify(text: &str) -> Self {
        if text.starts_with('"') {
            Self::Displayable(sanitize(text))
        } else {
            Self::Diagnostic(text.to_string())
        }
    }

    /// Markup appended to the display buffer, if any.
    pub fn to_markup(&self) -> Option<String> {
        match self {
            Self::Displayable(text) => Some(format!("{}{}", text, LINE_BREAK)),
            Self::Diagnostic(_) => None,
        }
    }
}

/// Remove every `"`, then collapse each run of `'` / `;` into `" - "`.
///
/// Removed quotes do not split a run: `';"'` is a single run.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;

    for c in text.chars() {
        match c {
            '"' => {}
            '\'' | ';' => {
                if !in_run {
                    out.push_str(DISPLAY_SEPARATOR);
                    in_run = true;
                }
            }
            _ => {
                out.push(c);
                in_run = false;
            }
        }
    }

    out
}

/// Owner of the display buffer.
///
/// The buffer is append-only and observable: [`ConsoleBridge::subscribe`]
/// hands out receivers that wake on every append.
#[derive(Debug)]
pub struct ConsoleBridge {
    message: watch::Sender<String>,
}

impl ConsoleBridge {
    /// Create a bridge with an empty display buffer
    pub fn new() -> Self {
        let (message, _) = watch::channel(String::new());
        Self { message }
    }

    /// Handle one line of runtime output.
    pub fn print(&self, text: &str) {
        tracing::info!("{}", text);

        if let Some(markup) = OutputLine::classify(text).to_markup() {
            self.message.send_modify(|message| message.push_str(&markup));
        }
    }

    /// Snapshot of the display buffer
    pub fn message(&self) -> String {
        self.message.borrow().clone()
    }

    /// Observe the display buffer
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.message.subscribe()
    }
}

impl Default for ConsoleBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for ConsoleBridge {
    fn print(&self, text: &str) {
        ConsoleBridge::print(self, text);
    }
}
