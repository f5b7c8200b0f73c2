//! The formatter capability set and its write/print conveniences.
//!
//! `walk_*` and `extract_frames` produce frame sequences, `format_*`
//! produce ordered text lines, and the provided `write_*`/`print_*`
//! helpers emit those lines to a sink. Write operations probe the sink
//! for terminal capability to decide whether color directives are
//! embedded; a sink that cannot answer counts as "not a terminal".

use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use crate::error::FormatError;
use crate::frame::{CallFrame, FrameIter, FrameSource, FrameWindow, TraceFrame};
use crate::types::{CapturedError, ErrorClass, ExcInfo};

// ─── FormatOptions ────────────────────────────────────────────────────────────

/// Per-call formatting options.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Whether to follow cause/context links.
    pub chain: bool,
    /// Frame-count window applied to every trace in the chain.
    pub limit: FrameWindow,
    /// Whether color directives are embedded in the produced lines.
    pub color: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            chain: true,
            limit: FrameWindow::Unlimited,
            color: false,
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(mut self, chain: bool) -> Self {
        self.chain = chain;
        self
    }

    pub fn limit(mut self, limit: FrameWindow) -> Self {
        self.limit = limit;
        self
    }

    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

// ─── TtySink ──────────────────────────────────────────────────────────────────

/// A writable text destination that may know whether it is an
/// interactive terminal.
pub trait TtySink: Write {
    /// `false` when the destination cannot answer.
    fn is_tty(&self) -> bool {
        false
    }
}

impl TtySink for io::Stdout {
    fn is_tty(&self) -> bool {
        self.is_terminal()
    }
}

impl TtySink for io::StdoutLock<'_> {
    fn is_tty(&self) -> bool {
        self.is_terminal()
    }
}

impl TtySink for io::Stderr {
    fn is_tty(&self) -> bool {
        self.is_terminal()
    }
}

impl TtySink for io::StderrLock<'_> {
    fn is_tty(&self) -> bool {
        self.is_terminal()
    }
}

impl TtySink for File {
    fn is_tty(&self) -> bool {
        self.is_terminal()
    }
}

/// In-memory buffers are never terminals.
impl TtySink for Vec<u8> {}

impl<S: TtySink + ?Sized> TtySink for &mut S {
    fn is_tty(&self) -> bool {
        (**self).is_tty()
    }
}

// ─── TracebackFormatter ───────────────────────────────────────────────────────

/// The capability set of a traceback formatter.
///
/// Implementations provide extraction, chain formatting, and the ambient
/// accessors; printing and writing come for free on top of those.
pub trait TracebackFormatter: Send + Sync {
    /// Walks a live stack innermost-first through caller links.
    fn walk_stack(&self, frame: Option<Arc<CallFrame>>) -> FrameIter;

    /// Walks a captured trace outermost-first through next links.
    fn walk_trace(&self, trace: Option<Arc<TraceFrame>>) -> FrameIter;

    /// Extracts an outermost-first frame sequence from `source`,
    /// windowed by `limit`.
    fn extract_frames(&self, source: FrameSource, limit: FrameWindow) -> FrameIter;

    /// Renders frames to location lines.
    fn format_frames(&self, frames: FrameIter, options: &FormatOptions) -> Vec<String>;

    /// Renders an error and, when `options.chain`, its cause/context
    /// ancestry, oldest ancestor first.
    fn format_error(&self, info: &ExcInfo, options: &FormatOptions) -> Vec<String>;

    /// Renders only the summary line.
    fn format_error_only(
        &self,
        class: Option<&ErrorClass>,
        value: Option<&Arc<CapturedError>>,
        options: &FormatOptions,
    ) -> Vec<String>;

    /// Renders the ambient in-flight error.
    fn format_current(&self, options: &FormatOptions) -> Vec<String>;

    /// Renders the last recorded unhandled error.
    fn format_last(&self, options: &FormatOptions) -> Result<Vec<String>, FormatError>;

    /// The ambient in-flight error; the null triple when none is active.
    fn current_error(&self) -> ExcInfo;

    /// The last recorded unhandled error.
    fn last_error(&self) -> Result<ExcInfo, FormatError>;

    // ─── provided conveniences ────────────────────────────────────────────────

    /// Writes a formatted error to `sink`, colorizing when it is a
    /// terminal.
    fn write_error(
        &self,
        info: &ExcInfo,
        options: &FormatOptions,
        sink: &mut dyn TtySink,
    ) -> Result<(), FormatError> {
        let options = options.clone().color(options.color || sink.is_tty());
        let text: String = self.format_error(info, &options).concat();
        sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Writes the ambient in-flight error to `sink`.
    fn write_current(
        &self,
        options: &FormatOptions,
        sink: &mut dyn TtySink,
    ) -> Result<(), FormatError> {
        let options = options.clone().color(options.color || sink.is_tty());
        let text: String = self.format_current(&options).concat();
        sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Writes the last recorded unhandled error to `sink`.
    fn write_last(
        &self,
        options: &FormatOptions,
        sink: &mut dyn TtySink,
    ) -> Result<(), FormatError> {
        let options = options.clone().color(options.color || sink.is_tty());
        let text: String = self.format_last(&options)?.concat();
        sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Writes rendered frames to `sink`.
    fn write_frames(
        &self,
        frames: FrameIter,
        options: &FormatOptions,
        sink: &mut dyn TtySink,
    ) -> Result<(), FormatError> {
        let options = options.clone().color(options.color || sink.is_tty());
        let text: String = self.format_frames(frames, &options).concat();
        sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Prints a formatted error to stderr.
    fn print_error(&self, info: &ExcInfo, options: &FormatOptions) -> Result<(), FormatError> {
        self.write_error(info, options, &mut io::stderr())
    }

    /// Prints the ambient in-flight error to stderr.
    fn print_current(&self, options: &FormatOptions) -> Result<(), FormatError> {
        self.write_current(options, &mut io::stderr())
    }

    /// Prints the last recorded unhandled error to stderr.
    fn print_last(&self, options: &FormatOptions) -> Result<(), FormatError> {
        self.write_last(options, &mut io::stderr())
    }

    /// Prints rendered frames to stderr.
    fn print_frames(&self, frames: FrameIter, options: &FormatOptions) -> Result<(), FormatError> {
        self.write_frames(frames, options, &mut io::stderr())
    }
}
