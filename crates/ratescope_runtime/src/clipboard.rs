//! Clipboard seam for copying rule paths.

use ratescope_foundation::Result;

/// A destination for copied text.
pub trait Clipboard {
    /// Copies `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard rejects the write.
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// Records copied text in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    copies: Vec<String>,
}

impl MemoryClipboard {
    /// Creates an empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recent copy.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.copies.last().map(String::as_str)
    }

    /// Returns every copy, oldest first.
    #[must_use]
    pub fn copies(&self) -> &[String] {
        &self.copies
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.copies.push(text.to_string());
        Ok(())
    }
}
