//! Line styles: the classic plain rendering and the themed rendering.
//!
//! The chain walk decides which lines exist; a [`Style`] only decides
//! what each line looks like. Plain output reproduces the classic
//! formatter byte-for-byte; the themed style adds glyphs and, when color
//! is on, SGR sequences around the interesting spans.

use prettytrace_core::StackFrame;

use crate::theme::Theme;

/// Emitted after a fully rendered cause block.
pub const CAUSE_HEADER: &str =
    "\nThe above exception was the direct cause of the following exception:\n\n";

/// Emitted after a fully rendered context block.
pub const CONTEXT_HEADER: &str =
    "\nDuring handling of the above exception, another exception occurred:\n\n";

/// Emitted before a trace's frame lines.
pub const TRACE_HEADER: &str = "Traceback (most recent call last):\n";

/// Renders the individual lines of a traceback.
pub trait Style: Send + Sync {
    fn trace_header(&self, color: bool) -> String;

    /// One frame location line.
    fn frame_line(&self, frame: &StackFrame, color: bool) -> String;

    /// Source excerpt under a frame line.
    fn source_line(&self, source: &str, color: bool) -> String;

    /// Collapsed-repeat marker for recursive traces.
    fn repeat_line(&self, count: usize, color: bool) -> String;

    fn cause_header(&self) -> String {
        CAUSE_HEADER.to_string()
    }

    fn context_header(&self) -> String {
        CONTEXT_HEADER.to_string()
    }

    /// The final `Type: message` line. `under_trace` tells whether frame
    /// lines were emitted directly above.
    fn summary_line(&self, text: &str, under_trace: bool, color: bool) -> String;
}

// ─── PlainStyle ───────────────────────────────────────────────────────────────

/// The classic rendering: no color, no glyphs.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainStyle;

impl Style for PlainStyle {
    fn trace_header(&self, _color: bool) -> String {
        TRACE_HEADER.to_string()
    }

    fn frame_line(&self, frame: &StackFrame, _color: bool) -> String {
        format!(
            "  File \"{}\", line {}, in {}\n",
            frame.file, frame.line, frame.scope
        )
    }

    fn source_line(&self, source: &str, _color: bool) -> String {
        format!("    {source}\n")
    }

    fn repeat_line(&self, count: usize, _color: bool) -> String {
        format!("  [Previous line repeated {count} more times]\n")
    }

    fn summary_line(&self, text: &str, _under_trace: bool, _color: bool) -> String {
        format!("{text}\n")
    }
}

// ─── PrettyStyle ──────────────────────────────────────────────────────────────

/// Themed rendering: pipe/cap glyphs along the frame block, a themed
/// quote glyph around file names, and SGR color when enabled.
#[derive(Debug, Clone)]
pub struct PrettyStyle {
    theme: Theme,
}

impl PrettyStyle {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn pipe(&self) -> &str {
        self.theme.glyph("char_pipe", "\u{2502}")
    }
}

impl Default for PrettyStyle {
    fn default() -> Self {
        Self::new(Theme::pretty())
    }
}

impl Style for PrettyStyle {
    fn trace_header(&self, _color: bool) -> String {
        TRACE_HEADER.to_string()
    }

    fn frame_line(&self, frame: &StackFrame, color: bool) -> String {
        let quote = self.theme.glyph("char_quote", "\"");
        let scope = self.theme.sgr("introspection_sgr", &frame.scope, color);
        format!(
            "  {} File {quote}{}{quote}, line {}, in {scope}\n",
            self.pipe(),
            frame.file,
            frame.line
        )
    }

    fn source_line(&self, source: &str, _color: bool) -> String {
        format!("  {}   {source}\n", self.pipe())
    }

    fn repeat_line(&self, count: usize, _color: bool) -> String {
        format!(
            "  {} [Previous line repeated {count} more times]\n",
            self.pipe()
        )
    }

    fn summary_line(&self, text: &str, under_trace: bool, color: bool) -> String {
        let text = self.theme.sgr("traceback_exception_sgr", text, color);
        if under_trace {
            format!("  {} {text}\n", self.theme.glyph("char_cap", "\u{2514}"))
        } else {
            format!("{text}\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_frame_line_matches_the_classic_form() {
        let frame = StackFrame::new("main", "app.py", 10);
        assert_eq!(
            PlainStyle.frame_line(&frame, false),
            "  File \"app.py\", line 10, in main\n"
        );
    }

    #[test]
    fn plain_summary_is_bare() {
        assert_eq!(
            PlainStyle.summary_line("ValueError: boom", true, true),
            "ValueError: boom\n"
        );
    }

    #[test]
    fn pretty_frame_line_uses_glyphs() {
        let frame = StackFrame::new("main", "app.py", 10);
        let style = PrettyStyle::default();
        assert_eq!(
            style.frame_line(&frame, false),
            "  \u{2502} File \"app.py\", line 10, in main\n"
        );
    }

    #[test]
    fn pretty_summary_caps_a_trace_block() {
        let style = PrettyStyle::default();
        assert_eq!(
            style.summary_line("ValueError: boom", true, false),
            "  \u{2514} ValueError: boom\n"
        );
        assert_eq!(
            style.summary_line("ValueError: boom", false, false),
            "ValueError: boom\n"
        );
    }

    #[test]
    fn pretty_colors_the_summary_when_asked() {
        let style = PrettyStyle::default();
        let line = style.summary_line("ValueError: boom", false, true);
        assert_eq!(line, "\x1b[38;2;255;179;179mValueError: boom\x1b[0m\n");
    }

    #[test]
    fn custom_theme_glyphs_apply() {
        let mut theme = Theme::pretty();
        theme.set("char_quote", "'");
        theme.set("char_pipe", "!");
        let style = PrettyStyle::new(theme);
        let frame = StackFrame::new("run", "job.py", 3);
        assert_eq!(
            style.frame_line(&frame, false),
            "  ! File 'job.py', line 3, in run\n"
        );
    }
}
