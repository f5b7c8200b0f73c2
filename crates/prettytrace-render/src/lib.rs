//! prettytrace-render — the concrete traceback formatting engine.
//!
//! # Quick Start
//!
//! ```rust
//! use prettytrace_core::{CapturedError, ErrorClass, ExcInfo, FormatOptions, TracebackFormatter};
//! use prettytrace_render::DefaultFormatter;
//!
//! let err = CapturedError::new(ErrorClass::builtin("ValueError"), "boom");
//! let formatter = DefaultFormatter::new();
//! let lines = formatter.format_error(&ExcInfo::of(&err), &FormatOptions::default());
//! assert_eq!(lines.last().unwrap(), "ValueError: boom\n");
//! ```

pub mod chain;
pub mod compat;
pub mod extract;
pub mod formatter;
pub mod hook;
pub mod linecache;
pub mod style;
pub mod theme;

pub use formatter::DefaultFormatter;
pub use style::{PlainStyle, PrettyStyle, Style};
pub use theme::Theme;
