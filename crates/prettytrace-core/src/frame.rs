//! Activation records and the two walking directions over them.
//!
//! A live call stack is linked innermost-first through `caller`
//! back-references; a captured trace is linked outermost-first through
//! `next` forward-references. Both directions carry the same
//! [`StackFrame`] payload, and extraction normalizes both to
//! outermost-first order.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

// ─── StackFrame ───────────────────────────────────────────────────────────────

/// One activation record: a scope name and a source location.
///
/// Frames are never mutated after capture; they are owned by the stack
/// or trace structure that contains them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Human-readable scope name (function, method, `"<module>"`).
    pub scope: String,
    /// Source file identifier.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
}

impl StackFrame {
    pub fn new(scope: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            scope: scope.into(),
            file: file.into(),
            line,
        }
    }
}

// ─── CallFrame (live stack) ───────────────────────────────────────────────────

/// A node of a live call stack, linked towards its caller.
///
/// The innermost frame is the handle to the whole stack, which is why
/// constructors hand out `Arc`s.
#[derive(Debug)]
pub struct CallFrame {
    frame: StackFrame,
    caller: Option<Arc<CallFrame>>,
}

impl CallFrame {
    pub fn new(frame: StackFrame, caller: Option<Arc<CallFrame>>) -> Arc<Self> {
        Arc::new(Self { frame, caller })
    }

    /// Builds a live stack from outermost-first frames, returning the
    /// innermost frame. An empty input is an empty stack.
    pub fn stack(frames: impl IntoIterator<Item = StackFrame>) -> Option<Arc<Self>> {
        let mut top = None;
        for frame in frames {
            top = Some(Self::new(frame, top));
        }
        top
    }

    pub fn frame(&self) -> &StackFrame {
        &self.frame
    }

    pub fn caller(&self) -> Option<&Arc<CallFrame>> {
        self.caller.as_ref()
    }
}

// ─── TraceFrame (captured trace) ──────────────────────────────────────────────

/// A node of a captured trace, linked towards its callee.
///
/// The outermost frame — where the error was recognized — is the handle,
/// i.e. the reverse traversal order of a live stack.
#[derive(Debug)]
pub struct TraceFrame {
    frame: StackFrame,
    next: Option<Arc<TraceFrame>>,
}

impl TraceFrame {
    pub fn new(frame: StackFrame, next: Option<Arc<TraceFrame>>) -> Arc<Self> {
        Arc::new(Self { frame, next })
    }

    /// Builds a captured trace from outermost-first frames, returning its
    /// head. An empty input is an absent trace.
    pub fn trace(frames: impl IntoIterator<Item = StackFrame>) -> Option<Arc<Self>> {
        let mut frames: Vec<StackFrame> = frames.into_iter().collect();
        let mut next = None;
        while let Some(frame) = frames.pop() {
            next = Some(Self::new(frame, next));
        }
        next
    }

    pub fn frame(&self) -> &StackFrame {
        &self.frame
    }

    pub fn next(&self) -> Option<&Arc<TraceFrame>> {
        self.next.as_ref()
    }
}

// ─── FrameWindow ──────────────────────────────────────────────────────────────

/// How many frames of a walk to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameWindow {
    /// Keep every frame.
    #[default]
    Unlimited,
    /// Keep the first `n` frames encountered, stopping the walk early.
    First(usize),
    /// Keep only the last `n` frames, in original order. The source must
    /// be traversed to completion before anything is yielded.
    Last(usize),
}

impl FrameWindow {
    /// Maps the legacy signed limit: `None` is unlimited, `n >= 0` keeps
    /// the first `n`, `n < 0` keeps the last `-n`.
    pub fn from_limit(limit: Option<i64>) -> Self {
        match limit {
            None => Self::Unlimited,
            Some(n) if n >= 0 => Self::First(n as usize),
            Some(n) => Self::Last(n.unsigned_abs() as usize),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

// ─── FrameIter and FrameSource ────────────────────────────────────────────────

/// A single-pass sequence of frames produced by an extraction.
///
/// Restartable only by re-invoking the extraction that produced it.
pub struct FrameIter(Box<dyn Iterator<Item = StackFrame>>);

impl FrameIter {
    pub fn new(frames: impl Iterator<Item = StackFrame> + 'static) -> Self {
        Self(Box::new(frames))
    }

    pub fn empty() -> Self {
        Self(Box::new(std::iter::empty()))
    }
}

impl Iterator for FrameIter {
    type Item = StackFrame;

    fn next(&mut self) -> Option<StackFrame> {
        self.0.next()
    }
}

impl From<Vec<StackFrame>> for FrameIter {
    fn from(frames: Vec<StackFrame>) -> Self {
        Self::new(frames.into_iter())
    }
}

/// What an extraction walks.
pub enum FrameSource {
    /// Innermost frame of a live stack; walked caller-wards, then
    /// reversed to outermost-first.
    Stack(Arc<CallFrame>),
    /// Head of a captured trace; walked callee-wards, already
    /// outermost-first.
    Trace(Arc<TraceFrame>),
    /// Already-materialized frames, passed through for composed calls.
    Frames(FrameIter),
}

impl FrameSource {
    /// A source with nothing to walk; extraction yields nothing.
    pub fn empty() -> Self {
        Self::Frames(FrameIter::empty())
    }
}

impl From<Arc<CallFrame>> for FrameSource {
    fn from(frame: Arc<CallFrame>) -> Self {
        Self::Stack(frame)
    }
}

impl From<Arc<TraceFrame>> for FrameSource {
    fn from(trace: Arc<TraceFrame>) -> Self {
        Self::Trace(trace)
    }
}

impl From<Option<Arc<CallFrame>>> for FrameSource {
    fn from(frame: Option<Arc<CallFrame>>) -> Self {
        frame.map(Self::Stack).unwrap_or_else(Self::empty)
    }
}

impl From<Option<Arc<TraceFrame>>> for FrameSource {
    fn from(trace: Option<Arc<TraceFrame>>) -> Self {
        trace.map(Self::Trace).unwrap_or_else(Self::empty)
    }
}

impl From<Vec<StackFrame>> for FrameSource {
    fn from(frames: Vec<StackFrame>) -> Self {
        Self::Frames(frames.into())
    }
}

impl From<FrameIter> for FrameSource {
    fn from(frames: FrameIter) -> Self {
        Self::Frames(frames)
    }
}

// ─── CallStackSource ──────────────────────────────────────────────────────────

/// A host-provided view of the live call stack.
///
/// An embedding runtime implements this by snapshotting its activation
/// records into caller-linked [`CallFrame`]s; the engine only needs the
/// innermost frame.
pub trait CallStackSource: Send + Sync {
    /// The innermost frame at the time of the call, or `None` when the
    /// host is idle.
    fn innermost(&self) -> Option<Arc<CallFrame>>;
}

/// A [`CallStackSource`] fed by explicit enter/leave bookkeeping.
#[derive(Default)]
pub struct RecordedStack {
    top: Mutex<Option<Arc<CallFrame>>>,
}

impl RecordedStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a scope, making it the innermost frame.
    pub fn push(&self, frame: StackFrame) {
        let mut top = self.top.lock().unwrap();
        *top = Some(CallFrame::new(frame, top.take()));
    }

    /// Leaves the innermost scope. A pop on an empty stack is a no-op.
    pub fn pop(&self) {
        let mut top = self.top.lock().unwrap();
        *top = top.take().and_then(|frame| frame.caller().cloned());
    }
}

impl CallStackSource for RecordedStack {
    fn innermost(&self) -> Option<Arc<CallFrame>> {
        self.top.lock().unwrap().clone()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
