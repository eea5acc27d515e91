use thiserror::Error;

/// Clipboard write failure. Never affects generated SQL.
#[derive(Debug, Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

impl ClipboardError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Somewhere generated SQL can be copied to.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

impl<T: Clipboard + ?Sized> Clipboard for &mut T {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }
}

/// A clipboard that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::new("no clipboard available"))
    }
}
