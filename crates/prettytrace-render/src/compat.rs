//! Drop-in equivalents of the conventional traceback entry points.
//!
//! Parameter names, defaults, and return shapes mirror the classic API
//! so call sites can swap engines unmodified: `extract_*` return frame
//! lists, `format_*` return line lists (or one joined string for
//! [`format_exc`]), `print_*` write to stderr unless given a file, and
//! `walk_*` yield `(frame, line)` pairs. The legacy `(value, tb)`
//! optional pair keeps its both-or-neither contract; [`Supplied::Omitted`]
//! stands in for an argument that was not passed at all, distinct from
//! an explicit `None`.
//!
//! Every function routes through the installed hook formatter when one
//! is present, else a plain default.

use std::sync::Arc;

use prettytrace_core::{
    CallFrame, CapturedError, ExcInfo, FormatError, FormatOptions, FrameIter, FrameSource,
    FrameWindow, StackFrame, TraceFrame, TracebackFormatter, TtySink,
};

use crate::hook;

/// An optional argument slot that distinguishes "omitted" from an
/// explicit value.
#[derive(Debug, Clone)]
pub enum Supplied<T> {
    Omitted,
    Given(T),
}

impl<T> Default for Supplied<T> {
    fn default() -> Self {
        Self::Omitted
    }
}

/// Resolves the legacy `(exc, value, tb)` argument shape: both or
/// neither of `value` and `tb` must be given; when omitted, both are
/// derived from `exc`.
fn resolve_value_trace(
    exc: Option<Arc<CapturedError>>,
    value: Supplied<Option<Arc<CapturedError>>>,
    tb: Supplied<Option<Arc<TraceFrame>>>,
) -> Result<(Option<Arc<CapturedError>>, Option<Arc<TraceFrame>>), FormatError> {
    match (value, tb) {
        (Supplied::Omitted, Supplied::Omitted) => {
            let trace = exc.as_ref().and_then(|e| e.trace().cloned());
            Ok((exc, trace))
        }
        (Supplied::Given(value), Supplied::Given(tb)) => Ok((value, tb)),
        _ => Err(FormatError::MalformedArguments),
    }
}

fn options(limit: Option<i64>, chain: bool) -> FormatOptions {
    FormatOptions::default()
        .chain(chain)
        .limit(FrameWindow::from_limit(limit))
}

fn info_for(value: Option<Arc<CapturedError>>, trace: Option<Arc<TraceFrame>>) -> ExcInfo {
    ExcInfo {
        class: value.as_ref().map(|v| v.class().clone()),
        value,
        trace,
    }
}

// ─── extract ──────────────────────────────────────────────────────────────────

/// Extracts up to `limit` frames from a live stack. With `f` absent, the
/// registered live-stack capability stands in for the caller's frame.
pub fn extract_stack(f: Option<Arc<CallFrame>>, limit: Option<i64>) -> Vec<StackFrame> {
    let frame = f.or_else(hook::innermost_frame);
    hook::formatter()
        .extract_frames(FrameSource::from(frame), FrameWindow::from_limit(limit))
        .collect()
}

/// Extracts up to `limit` frames from a captured trace.
pub fn extract_tb(tb: Option<Arc<TraceFrame>>, limit: Option<i64>) -> Vec<StackFrame> {
    hook::formatter()
        .extract_frames(FrameSource::from(tb), FrameWindow::from_limit(limit))
        .collect()
}

// ─── format ───────────────────────────────────────────────────────────────────

/// Formats the current exception as one joined string.
pub fn format_exc(limit: Option<i64>, chain: bool) -> String {
    hook::formatter().format_current(&options(limit, chain)).concat()
}

/// Formats an exception chain to lines.
pub fn format_exception(
    exc: Option<Arc<CapturedError>>,
    value: Supplied<Option<Arc<CapturedError>>>,
    tb: Supplied<Option<Arc<TraceFrame>>>,
    limit: Option<i64>,
    chain: bool,
) -> Result<Vec<String>, FormatError> {
    let (value, trace) = resolve_value_trace(exc, value, tb)?;
    Ok(hook::formatter().format_error(&info_for(value, trace), &options(limit, chain)))
}

/// Formats only the summary line.
pub fn format_exception_only(
    exc: Option<Arc<CapturedError>>,
    value: Supplied<Option<Arc<CapturedError>>>,
) -> Result<Vec<String>, FormatError> {
    let (value, _) = resolve_value_trace(exc, value, Supplied::Omitted)?;
    let class = value.as_ref().map(|v| v.class().clone());
    Ok(hook::formatter().format_error_only(
        class.as_ref(),
        value.as_ref(),
        &FormatOptions::default(),
    ))
}

/// Formats the last exception to lines.
pub fn format_last(limit: Option<i64>, chain: bool) -> Result<Vec<String>, FormatError> {
    hook::formatter().format_last(&options(limit, chain))
}

/// Formats an already-extracted frame list.
pub fn format_list(extracted_list: Vec<StackFrame>) -> Vec<String> {
    hook::formatter().format_frames(FrameIter::from(extracted_list), &FormatOptions::default())
}

/// Formats a live stack's frames.
pub fn format_stack(f: Option<Arc<CallFrame>>, limit: Option<i64>) -> Vec<String> {
    format_list(extract_stack(f, limit))
}

/// Formats a captured trace's frames.
pub fn format_tb(tb: Option<Arc<TraceFrame>>, limit: Option<i64>) -> Vec<String> {
    format_list(extract_tb(tb, limit))
}

// ─── print ────────────────────────────────────────────────────────────────────

/// Prints the current exception to `file`, defaulting to stderr.
pub fn print_exc(
    limit: Option<i64>,
    file: Option<&mut dyn TtySink>,
    chain: bool,
) -> Result<(), FormatError> {
    let fmt = hook::formatter();
    match file {
        Some(file) => fmt.write_current(&options(limit, chain), file),
        None => fmt.print_current(&options(limit, chain)),
    }
}

/// Prints an exception chain to `file`, defaulting to stderr.
pub fn print_exception(
    exc: Option<Arc<CapturedError>>,
    value: Supplied<Option<Arc<CapturedError>>>,
    tb: Supplied<Option<Arc<TraceFrame>>>,
    limit: Option<i64>,
    file: Option<&mut dyn TtySink>,
    chain: bool,
) -> Result<(), FormatError> {
    let (value, trace) = resolve_value_trace(exc, value, tb)?;
    let info = info_for(value, trace);
    let fmt = hook::formatter();
    match file {
        Some(file) => fmt.write_error(&info, &options(limit, chain), file),
        None => fmt.print_error(&info, &options(limit, chain)),
    }
}

/// Prints the last exception to `file`, defaulting to stderr.
pub fn print_last(
    limit: Option<i64>,
    file: Option<&mut dyn TtySink>,
    chain: bool,
) -> Result<(), FormatError> {
    let fmt = hook::formatter();
    match file {
        Some(file) => fmt.write_last(&options(limit, chain), file),
        None => fmt.print_last(&options(limit, chain)),
    }
}

/// Prints an already-extracted frame list to `file`, defaulting to
/// stderr.
pub fn print_list(
    extracted_list: Vec<StackFrame>,
    file: Option<&mut dyn TtySink>,
) -> Result<(), FormatError> {
    let fmt = hook::formatter();
    let frames = FrameIter::from(extracted_list);
    match file {
        Some(file) => fmt.write_frames(frames, &FormatOptions::default(), file),
        None => fmt.print_frames(frames, &FormatOptions::default()),
    }
}

/// Prints a live stack's frames to `file`, defaulting to stderr.
pub fn print_stack(
    f: Option<Arc<CallFrame>>,
    limit: Option<i64>,
    file: Option<&mut dyn TtySink>,
) -> Result<(), FormatError> {
    print_list(extract_stack(f, limit), file)
}

/// Prints a captured trace's frames to `file`, defaulting to stderr.
pub fn print_tb(
    tb: Option<Arc<TraceFrame>>,
    limit: Option<i64>,
    file: Option<&mut dyn TtySink>,
) -> Result<(), FormatError> {
    print_list(extract_tb(tb, limit), file)
}

// ─── walk ─────────────────────────────────────────────────────────────────────

/// Walks a live stack innermost-first, yielding `(frame, line)` pairs.
pub fn walk_stack(f: Option<Arc<CallFrame>>) -> impl Iterator<Item = (StackFrame, u32)> {
    hook::formatter()
        .walk_stack(f.or_else(hook::innermost_frame))
        .map(|frame| {
            let line = frame.line;
            (frame, line)
        })
}

/// Walks a captured trace outermost-first, yielding `(frame, line)`
/// pairs.
pub fn walk_tb(tb: Option<Arc<TraceFrame>>) -> impl Iterator<Item = (StackFrame, u32)> {
    hook::formatter().walk_trace(tb).map(|frame| {
        let line = frame.line;
        (frame, line)
    })
}
