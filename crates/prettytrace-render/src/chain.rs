//! Linearizing a cause/context graph into printable lines.
//!
//! The recursion renders the oldest ancestor first: a predecessor's full
//! block (its own ancestry, trace, summary) lands before the header that
//! introduces it, and that header lands before the current error's trace
//! and summary. One `seen` identity set is shared across a whole
//! top-level call; an identity already seen is never re-entered and its
//! header is simply omitted, which terminates cycles.

use std::collections::HashSet;
use std::sync::Arc;

use prettytrace_core::{
    CapturedError, ErrorClass, ErrorId, ExcInfo, FormatOptions, FrameIter, FrameSource,
    StackFrame, TraceFrame, UNPRINTABLE,
};

use crate::extract;
use crate::linecache;
use crate::style::Style;

/// Runs of identical frames longer than this collapse into a repeat
/// marker.
pub const RECURSION_CUTOFF: usize = 3;

/// Renders `info` and, when `options.chain`, its whole ancestry.
pub fn format_error(style: &dyn Style, info: &ExcInfo, options: &FormatOptions) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut lines = Vec::new();
    format_into(
        style,
        info.class.as_ref(),
        info.value.as_ref(),
        info.trace.as_ref(),
        options,
        &mut seen,
        &mut lines,
    );
    lines
}

fn format_into(
    style: &dyn Style,
    class: Option<&ErrorClass>,
    value: Option<&Arc<CapturedError>>,
    trace: Option<&Arc<TraceFrame>>,
    options: &FormatOptions,
    seen: &mut HashSet<ErrorId>,
    lines: &mut Vec<String>,
) {
    if options.chain {
        if let Some(value) = value {
            seen.insert(value.id());

            let cause = value.cause();
            if let Some(cause) = &cause {
                if !seen.contains(&cause.id()) {
                    format_into(
                        style,
                        Some(cause.class()),
                        Some(cause),
                        cause.trace(),
                        options,
                        seen,
                        lines,
                    );
                    lines.push(style.cause_header());
                }
            }

            // An explicit cause hides the implicit context entirely.
            if cause.is_none() && !value.suppress_context() {
                if let Some(context) = &value.context() {
                    if !seen.contains(&context.id()) {
                        format_into(
                            style,
                            Some(context.class()),
                            Some(context),
                            context.trace(),
                            options,
                            seen,
                            lines,
                        );
                        lines.push(style.context_header());
                    }
                }
            }
        }
    }

    let mut under_trace = false;
    if let Some(trace) = trace {
        lines.push(style.trace_header(options.color));
        render_frames(
            style,
            extract::extract_frames(FrameSource::Trace(trace.clone()), options.limit),
            options,
            lines,
        );
        under_trace = true;
    }

    lines.push(style.summary_line(&summary_text(class, value), under_trace, options.color));
}

/// Renders frames to lines, collapsing long runs of the same frame.
pub fn format_frames(style: &dyn Style, frames: FrameIter, options: &FormatOptions) -> Vec<String> {
    let mut lines = Vec::new();
    render_frames(style, frames, options, &mut lines);
    lines
}

fn render_frames(
    style: &dyn Style,
    frames: FrameIter,
    options: &FormatOptions,
    lines: &mut Vec<String>,
) {
    let mut last: Option<StackFrame> = None;
    let mut count = 0usize;

    for frame in frames {
        if last.as_ref() == Some(&frame) {
            count += 1;
        } else {
            if count > RECURSION_CUTOFF {
                lines.push(style.repeat_line(count - RECURSION_CUTOFF, options.color));
            }
            last = Some(frame.clone());
            count = 1;
        }
        if count > RECURSION_CUTOFF {
            continue;
        }

        lines.push(style.frame_line(&frame, options.color));
        if let Some(source) = linecache::lookup(&frame.file, frame.line) {
            let source = source.trim();
            if !source.is_empty() {
                lines.push(style.source_line(source, options.color));
            }
        }
    }
    if count > RECURSION_CUTOFF {
        lines.push(style.repeat_line(count - RECURSION_CUTOFF, options.color));
    }
}

/// Renders only the summary line.
pub fn format_error_only(
    style: &dyn Style,
    class: Option<&ErrorClass>,
    value: Option<&Arc<CapturedError>>,
    options: &FormatOptions,
) -> Vec<String> {
    vec![style.summary_line(&summary_text(class, value), false, options.color)]
}

/// The `Type: message` text. Failures to produce either half degrade to
/// placeholder text instead of aborting the render.
fn summary_text(class: Option<&ErrorClass>, value: Option<&Arc<CapturedError>>) -> String {
    let name = class
        .map(ErrorClass::qualified)
        .or_else(|| value.map(|v| v.class().qualified()))
        .unwrap_or_else(|| UNPRINTABLE.to_string());

    match value {
        Some(value) if !value.message().is_empty() => {
            format!("{name}: {}", value.message().render())
        }
        _ => name,
    }
}
