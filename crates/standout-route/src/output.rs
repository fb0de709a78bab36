//! Diagnostic output routing.
//!
//! Each command level writes flag-parsing diagnostics (clap's rendered error
//! and usage) to an [`OutputSink`]. A sink is a cheap, clonable handle: clones
//! share the same underlying stream, which is how a parent's sink is handed to
//! its children at registration time.

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for diagnostic text.
///
/// # Variants
///
/// - `Stderr` - The process error stream (the default)
/// - `Buffer` - An in-memory buffer, mostly useful for capturing output in tests
/// - `Writer` - Any `Write` implementation (files, pipes, sockets)
#[derive(Clone, Default)]
pub enum OutputSink {
    /// Write to standard error
    #[default]
    Stderr,
    /// Append to a shared in-memory buffer
    Buffer(Arc<Mutex<Vec<u8>>>),
    /// Write to an arbitrary shared writer
    Writer(Arc<Mutex<dyn Write + Send>>),
}

impl OutputSink {
    /// Returns a sink writing to standard error.
    pub fn stderr() -> Self {
        OutputSink::Stderr
    }

    /// Returns a sink backed by a fresh, empty in-memory buffer.
    pub fn buffer() -> Self {
        OutputSink::Buffer(Arc::new(Mutex::new(Vec::new())))
    }

    /// Wraps a writer into a sink.
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        OutputSink::Writer(Arc::new(Mutex::new(writer)))
    }

    /// Returns true if this sink is the process error stream.
    pub fn is_stderr(&self) -> bool {
        matches!(self, OutputSink::Stderr)
    }

    /// Returns true if diagnostics written here should carry ANSI styling.
    ///
    /// Only the real stderr attached to a terminal gets colours.
    pub fn supports_color(&self) -> bool {
        self.is_stderr() && io::stderr().is_terminal()
    }

    /// Returns true if both handles point at the same stream.
    pub fn same_sink(&self, other: &OutputSink) -> bool {
        match (self, other) {
            (OutputSink::Stderr, OutputSink::Stderr) => true,
            (OutputSink::Buffer(a), OutputSink::Buffer(b)) => Arc::ptr_eq(a, b),
            (OutputSink::Writer(a), OutputSink::Writer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Writes text content to this sink.
    pub fn write_text(&self, content: &str) -> io::Result<()> {
        match self {
            OutputSink::Stderr => {
                let stderr = io::stderr();
                let mut handle = stderr.lock();
                handle.write_all(content.as_bytes())
            }
            OutputSink::Buffer(buffer) => {
                buffer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend_from_slice(content.as_bytes());
                Ok(())
            }
            OutputSink::Writer(writer) => {
                let mut handle = writer.lock().unwrap_or_else(PoisonError::into_inner);
                handle.write_all(content.as_bytes())?;
                handle.flush()
            }
        }
    }

    /// Returns everything written so far, for buffer sinks.
    pub fn contents(&self) -> Option<String> {
        match self {
            OutputSink::Buffer(buffer) => {
                let bytes = buffer.lock().unwrap_or_else(PoisonError::into_inner);
                Some(String::from_utf8_lossy(&bytes).into_owned())
            }
            _ => None,
        }
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputSink::Stderr => write!(f, "OutputSink::Stderr"),
            OutputSink::Buffer(_) => write!(f, "OutputSink::Buffer"),
            OutputSink::Writer(_) => write!(f, "OutputSink::Writer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stderr() {
        assert!(OutputSink::default().is_stderr());
        assert!(OutputSink::stderr().same_sink(&OutputSink::default()));
    }

    #[test]
    fn test_buffer_captures_text() {
        let sink = OutputSink::buffer();
        sink.write_text("hello ").unwrap();
        sink.write_text("world").unwrap();
        assert_eq!(sink.contents().as_deref(), Some("hello world"));
    }

    #[test]
    fn test_clones_share_the_stream() {
        let sink = OutputSink::buffer();
        let clone = sink.clone();
        clone.write_text("shared").unwrap();

        assert!(sink.same_sink(&clone));
        assert_eq!(sink.contents().as_deref(), Some("shared"));
    }

    #[test]
    fn test_distinct_buffers_are_not_the_same_sink() {
        let a = OutputSink::buffer();
        let b = OutputSink::buffer();
        assert!(!a.same_sink(&b));
        assert!(!a.same_sink(&OutputSink::stderr()));
    }

    #[test]
    fn test_writer_sink_to_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("diagnostics.txt");
        let file = std::fs::File::create(&file_path).unwrap();
        let sink = OutputSink::new(file);

        sink.write_text("error: unexpected argument").unwrap();

        let content = std::fs::read_to_string(file_path).unwrap();
        assert_eq!(content, "error: unexpected argument");
        assert_eq!(sink.contents(), None);
    }

    #[test]
    fn test_only_stderr_may_be_colored() {
        assert!(!OutputSink::buffer().supports_color());
        assert!(!OutputSink::new(Vec::new()).supports_color());
    }

    #[test]
    fn test_stderr_color_follows_terminal() {
        assert_eq!(
            OutputSink::stderr().supports_color(),
            io::stderr().is_terminal()
        );
    }
}
