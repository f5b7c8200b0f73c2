//! prettytrace-core — foundation types and traits for the prettytrace
//! traceback formatter.
//!
//! This crate defines:
//! - [`StackFrame`], [`CallFrame`], [`TraceFrame`] — activation records
//!   and the two walking directions over them
//! - [`CapturedError`] — an error value with cause/context links and a
//!   captured trace
//! - [`FrameWindow`] — the frame-count limit policy
//! - [`TracebackFormatter`] — the capability set every formatter
//!   implements, with provided print/write conveniences
//! - [`FormatError`] — the error taxonomy
//! - [`ErrorDesc`] — a serializable chain description for fixtures and
//!   tooling

pub mod desc;
pub mod error;
pub mod formatter;
pub mod frame;
pub mod types;

pub use desc::ErrorDesc;
pub use error::FormatError;
pub use formatter::{FormatOptions, TracebackFormatter, TtySink};
pub use frame::{
    CallFrame, CallStackSource, FrameIter, FrameSource, FrameWindow, RecordedStack, StackFrame,
    TraceFrame,
};
pub use types::{CapturedError, ErrorClass, ErrorId, ErrorMessage, ExcInfo, UNPRINTABLE};
