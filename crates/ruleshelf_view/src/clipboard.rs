//! Clipboard seam.
//!
//! The platform clipboard is an external collaborator; the controller only
//! needs "read current text, write text". Screens supply their platform
//! implementation, tests and the CLI use [`MemoryClipboard`].

/// Minimal text-clipboard surface.
pub trait Clipboard {
    /// Current text content, if any.
    fn read_text(&mut self) -> Option<String>;

    fn write_text(&mut self, text: &str);
}

/// In-process clipboard used by tests and the CLI.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn read_text(&mut self) -> Option<String> {
        self.content.clone()
    }

    fn write_text(&mut self, text: &str) {
        self.content = Some(text.to_string());
    }
}
