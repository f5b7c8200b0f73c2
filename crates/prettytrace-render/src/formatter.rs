//! `DefaultFormatter` — the provided [`TracebackFormatter`].
//!
//! Walking and chain logic are shared; output texture comes from the
//! injected [`Style`]. `new()` renders the classic plain form, `pretty()`
//! the themed form, and `with_style()` replaces the style wholesale.

use std::sync::Arc;

use prettytrace_core::{
    CallFrame, CapturedError, ErrorClass, ExcInfo, FormatError, FormatOptions, FrameIter,
    FrameSource, FrameWindow, TraceFrame, TracebackFormatter,
};

use crate::chain;
use crate::extract;
use crate::hook;
use crate::style::{PlainStyle, PrettyStyle, Style};
use crate::theme::Theme;

pub struct DefaultFormatter {
    style: Arc<dyn Style>,
}

impl DefaultFormatter {
    /// Plain, uncolored output identical to the classic formatter.
    pub fn new() -> Self {
        Self {
            style: Arc::new(PlainStyle),
        }
    }

    /// Themed output using `theme`'s colors and glyphs.
    pub fn pretty(theme: Theme) -> Self {
        Self {
            style: Arc::new(PrettyStyle::new(theme)),
        }
    }

    /// Builds on an arbitrary style.
    pub fn with_style(style: Arc<dyn Style>) -> Self {
        Self { style }
    }

    fn style(&self) -> &dyn Style {
        self.style.as_ref()
    }
}

impl Default for DefaultFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TracebackFormatter for DefaultFormatter {
    fn walk_stack(&self, frame: Option<Arc<CallFrame>>) -> FrameIter {
        extract::walk_stack(frame)
    }

    fn walk_trace(&self, trace: Option<Arc<TraceFrame>>) -> FrameIter {
        extract::walk_trace(trace)
    }

    fn extract_frames(&self, source: FrameSource, limit: FrameWindow) -> FrameIter {
        extract::extract_frames(source, limit)
    }

    fn format_frames(&self, frames: FrameIter, options: &FormatOptions) -> Vec<String> {
        chain::format_frames(self.style(), frames, options)
    }

    fn format_error(&self, info: &ExcInfo, options: &FormatOptions) -> Vec<String> {
        chain::format_error(self.style(), info, options)
    }

    fn format_error_only(
        &self,
        class: Option<&ErrorClass>,
        value: Option<&Arc<CapturedError>>,
        options: &FormatOptions,
    ) -> Vec<String> {
        chain::format_error_only(self.style(), class, value, options)
    }

    fn format_current(&self, options: &FormatOptions) -> Vec<String> {
        self.format_error(&self.current_error(), options)
    }

    fn format_last(&self, options: &FormatOptions) -> Result<Vec<String>, FormatError> {
        Ok(self.format_error(&self.last_error()?, options))
    }

    fn current_error(&self) -> ExcInfo {
        hook::current_error()
    }

    fn last_error(&self) -> Result<ExcInfo, FormatError> {
        hook::last_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prettytrace_core::{StackFrame, TtySink};

    fn sample() -> Arc<CapturedError> {
        let trace = TraceFrame::trace(vec![StackFrame::new("main", "app.py", 3)]);
        CapturedError::with_trace(ErrorClass::builtin("ValueError"), "boom", trace)
    }

    #[test]
    fn plain_and_pretty_agree_on_line_count() {
        let _sync = crate::testsync::shared();
        let info = ExcInfo::of(&sample());
        let options = FormatOptions::default();

        let plain = DefaultFormatter::new().format_error(&info, &options);
        let pretty = DefaultFormatter::pretty(Theme::pretty()).format_error(&info, &options);
        assert_eq!(plain.len(), pretty.len());
        assert_eq!(plain.last().unwrap(), "ValueError: boom\n");
        assert_eq!(pretty.last().unwrap(), "  \u{2514} ValueError: boom\n");
    }

    #[test]
    fn write_error_concatenates_the_lines() {
        let _sync = crate::testsync::shared();
        let formatter = DefaultFormatter::new();
        let info = ExcInfo::of(&sample());

        let mut sink: Vec<u8> = Vec::new();
        formatter
            .write_error(&info, &FormatOptions::default(), &mut sink)
            .unwrap();

        let text = String::from_utf8(sink).unwrap();
        assert_eq!(
            text,
            "Traceback (most recent call last):\n  File \"app.py\", line 3, in main\nValueError: boom\n"
        );
    }

    #[test]
    fn buffer_sinks_never_colorize() {
        let _sync = crate::testsync::shared();
        let formatter = DefaultFormatter::pretty(Theme::pretty());
        let info = ExcInfo::of(&sample());

        let mut sink: Vec<u8> = Vec::new();
        assert!(!(&mut sink as &mut dyn TtySink).is_tty());
        formatter
            .write_error(&info, &FormatOptions::default(), &mut sink)
            .unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn forced_color_survives_a_buffer_sink() {
        let _sync = crate::testsync::shared();
        let formatter = DefaultFormatter::pretty(Theme::pretty());
        let info = ExcInfo::of(&sample());

        let mut sink: Vec<u8> = Vec::new();
        formatter
            .write_error(&info, &FormatOptions::default().color(true), &mut sink)
            .unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("\x1b[38;2;255;179;179m"));
    }
}
