//! Output handling for the print built-ins.
//!
//! All print built-ins write through a [`PrintWriter`]. The embedder picks
//! the implementation: [`StdPrint`] for a process writing to its own
//! stdout, [`CollectStringPrint`] to capture output into a buffer (the
//! output-capture mode), or [`NoPrint`] to discard it.

use std::{
    borrow::Cow,
    io::{self, Write as _},
};

/// Trait for handling output from the print built-ins.
pub trait PrintWriter {
    /// Writes one formatted chunk of output, without separators or
    /// terminators.
    fn write(&mut self, output: Cow<'_, str>);

    /// Writes a single separator or terminator character.
    fn push(&mut self, ch: char);
}

/// Default `PrintWriter` that writes to the process stdout.
///
/// Output is buffered and flushed on drop, so interleaving with other
/// writers is the embedder's concern.
#[derive(Debug, Default)]
pub struct StdPrint {
    buffer: String,
}

impl StdPrint {
    /// Creates a stdout writer with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrintWriter for StdPrint {
    fn write(&mut self, output: Cow<'_, str>) {
        self.buffer.push_str(&output);
    }

    fn push(&mut self, ch: char) {
        self.buffer.push(ch);
    }
}

impl Drop for StdPrint {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let _ = io::stdout().write_all(self.buffer.as_bytes());
        let _ = io::stdout().flush();
    }
}

/// A `PrintWriter` that collects all output into a string.
///
/// Useful for testing and for capturing print output programmatically.
#[derive(Debug, Default)]
pub struct CollectStringPrint(String);

impl CollectStringPrint {
    /// Creates a new empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected output so far.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.0
    }

    /// Consumes the writer and returns the collected output.
    #[must_use]
    pub fn into_output(self) -> String {
        self.0
    }
}

impl PrintWriter for CollectStringPrint {
    fn write(&mut self, output: Cow<'_, str>) {
        self.0.push_str(&output);
    }

    fn push(&mut self, ch: char) {
        self.0.push(ch);
    }
}

/// `PrintWriter` that ignores all output.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn write(&mut self, _output: Cow<'_, str>) {}

    fn push(&mut self, _ch: char) {}
}
