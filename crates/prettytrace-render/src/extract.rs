//! Stack/chain walking and frame-window truncation.
//!
//! Live stacks are walked caller-wards and reversed so that both input
//! forms yield outermost-first. `First(n)` is a streaming truncation
//! that never forces the rest of a lazy source; `Last(n)` keeps a
//! drop-oldest retention buffer and therefore traverses to completion
//! before yielding anything.

use std::collections::VecDeque;
use std::sync::Arc;

use prettytrace_core::{CallFrame, FrameIter, FrameSource, FrameWindow, StackFrame, TraceFrame};

use crate::hook;
use crate::linecache;

/// Walks a live stack innermost-first through caller links.
pub fn walk_stack(frame: Option<Arc<CallFrame>>) -> FrameIter {
    let mut cursor = frame;
    FrameIter::new(std::iter::from_fn(move || {
        let current = cursor.take()?;
        cursor = current.caller().cloned();
        Some(current.frame().clone())
    }))
}

/// Walks a captured trace outermost-first through next links.
pub fn walk_trace(trace: Option<Arc<TraceFrame>>) -> FrameIter {
    let mut cursor = trace;
    FrameIter::new(std::iter::from_fn(move || {
        let current = cursor.take()?;
        cursor = current.next().cloned();
        Some(current.frame().clone())
    }))
}

/// Extracts outermost-first frames from `source`, windowed by `limit`.
///
/// An unlimited `limit` falls back to the process-wide traceback-limit
/// slot; an explicit `First(0)`/`Last(0)` yields nothing. Each yielded
/// frame warms the source-line cache for its file as a best-effort side
/// effect.
pub fn extract_frames(source: FrameSource, limit: FrameWindow) -> FrameIter {
    let frames = match source {
        FrameSource::Stack(frame) => {
            let mut collected: Vec<StackFrame> = walk_stack(Some(frame)).collect();
            collected.reverse();
            FrameIter::from(collected)
        }
        FrameSource::Trace(trace) => walk_trace(Some(trace)),
        FrameSource::Frames(frames) => frames,
    };

    let limit = match limit {
        FrameWindow::Unlimited => hook::traceback_limit(),
        explicit => explicit,
    };

    let windowed = match limit {
        FrameWindow::Unlimited => frames,
        FrameWindow::First(n) => {
            let mut frames = frames;
            let mut remaining = n;
            FrameIter::new(std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                remaining -= 1;
                frames.next()
            }))
        }
        FrameWindow::Last(0) => FrameIter::empty(),
        FrameWindow::Last(n) => {
            let mut kept: VecDeque<StackFrame> = VecDeque::with_capacity(n);
            for frame in frames {
                if kept.len() == n {
                    kept.pop_front();
                }
                kept.push_back(frame);
            }
            FrameIter::new(kept.into_iter())
        }
    };

    FrameIter::new(windowed.map(|frame| {
        linecache::warm(&frame.file);
        frame
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: u32) -> Vec<StackFrame> {
        (1..=n)
            .map(|i| StackFrame::new(format!("fn_{i}"), "app.rs", i))
            .collect()
    }

    fn scopes(frames: FrameIter) -> Vec<String> {
        frames.map(|f| f.scope).collect()
    }

    #[test]
    fn both_input_forms_agree() {
        let _sync = crate::testsync::shared();
        let stack = CallFrame::stack(frames(4)).unwrap();
        let trace = TraceFrame::trace(frames(4)).unwrap();

        let from_stack = scopes(extract_frames(stack.into(), FrameWindow::Unlimited));
        let from_trace = scopes(extract_frames(trace.into(), FrameWindow::Unlimited));

        assert_eq!(from_stack, vec!["fn_1", "fn_2", "fn_3", "fn_4"]);
        assert_eq!(from_stack, from_trace);
    }

    #[test]
    fn walk_directions_differ() {
        let stack = CallFrame::stack(frames(3)).unwrap();
        let trace = TraceFrame::trace(frames(3)).unwrap();

        assert_eq!(
            scopes(walk_stack(Some(stack))),
            vec!["fn_3", "fn_2", "fn_1"]
        );
        assert_eq!(
            scopes(walk_trace(Some(trace))),
            vec!["fn_1", "fn_2", "fn_3"]
        );
    }

    #[test]
    fn first_window_keeps_the_earliest() {
        let _sync = crate::testsync::shared();
        let trace = TraceFrame::trace(frames(5)).unwrap();
        let kept = scopes(extract_frames(trace.into(), FrameWindow::First(2)));
        assert_eq!(kept, vec!["fn_1", "fn_2"]);
    }

    #[test]
    fn first_window_is_streaming() {
        let _sync = crate::testsync::shared();
        // An endless pass-through source: only a streaming truncation
        // can terminate this extraction.
        let endless = FrameIter::new((1u32..).map(|i| StackFrame::new("loop", "app.rs", i)));
        let kept = scopes(extract_frames(endless.into(), FrameWindow::First(3)));
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn last_window_keeps_the_tail_in_order() {
        let _sync = crate::testsync::shared();
        let trace = TraceFrame::trace(frames(5)).unwrap();
        let kept = scopes(extract_frames(trace.into(), FrameWindow::Last(2)));
        assert_eq!(kept, vec!["fn_4", "fn_5"]);
    }

    #[test]
    fn window_larger_than_source_keeps_everything() {
        let _sync = crate::testsync::shared();
        let trace = TraceFrame::trace(frames(2)).unwrap();
        assert_eq!(
            scopes(extract_frames(trace.clone().into(), FrameWindow::First(10))).len(),
            2
        );
        assert_eq!(
            scopes(extract_frames(trace.into(), FrameWindow::Last(10))).len(),
            2
        );
    }

    #[test]
    fn zero_windows_yield_nothing() {
        let _sync = crate::testsync::shared();
        let trace = TraceFrame::trace(frames(3)).unwrap();
        assert!(scopes(extract_frames(trace.clone().into(), FrameWindow::First(0))).is_empty());
        assert!(scopes(extract_frames(trace.into(), FrameWindow::Last(0))).is_empty());
    }

    #[test]
    fn absent_sources_yield_nothing() {
        let _sync = crate::testsync::shared();
        assert!(scopes(extract_frames(FrameSource::empty(), FrameWindow::Unlimited)).is_empty());
        let none: Option<Arc<TraceFrame>> = None;
        assert!(scopes(extract_frames(none.into(), FrameWindow::Unlimited)).is_empty());
    }

    #[test]
    fn pass_through_preserves_materialized_frames() {
        let _sync = crate::testsync::shared();
        let kept = scopes(extract_frames(frames(3).into(), FrameWindow::Unlimited));
        assert_eq!(kept, vec!["fn_1", "fn_2", "fn_3"]);
    }
}
