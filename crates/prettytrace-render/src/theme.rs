//! Theme tables and environment-variable parsing.
//!
//! A theme is an opaque mapping from option names to values — SGR color
//! codes and glyphs consumed by the themed style. The selector grammar
//! is `key=value` pairs separated by `|`; values may embed `u+XXXX` /
//! `U+XXXXXXXX` escapes (4 or 8 hex digits), each decoded to a single
//! code point.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::warn;

/// An opaque option table for line rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    options: BTreeMap<String, String>,
}

impl Theme {
    /// An empty table; every lookup misses.
    pub fn empty() -> Self {
        Self {
            options: BTreeMap::new(),
        }
    }

    /// The bundled theme.
    pub fn pretty() -> Self {
        let mut theme = Self::empty();
        for (key, value) in [
            ("char_cap", "\u{2514}"),
            ("char_pipe", "\u{2502}"),
            ("char_quote", "\""),
            ("introspection_sgr", "38;2;255;179;255"),
            ("traceback_exception_sgr", "38;2;255;179;179"),
        ] {
            theme.set(key, value);
        }
        theme
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    /// The glyph stored under `key`, or `default` when absent.
    pub fn glyph<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Wraps `text` in the SGR sequence stored under `key`. A missing or
    /// empty code, or `color` off, passes the text through untouched.
    pub fn sgr(&self, key: &str, text: &str, color: bool) -> String {
        match self.get(key) {
            Some(code) if color && !code.is_empty() => format!("\x1b[{code}m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::pretty()
    }
}

// ─── Environment grammar ──────────────────────────────────────────────────────

/// Reads a tri-state boolean switch from the environment.
pub fn env_bool(name: &str) -> Option<bool> {
    parse_bool(&std::env::var(name).ok()?)
}

/// Recognized boolean spellings, case-insensitive.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "enable" | "on" => Some(true),
        "false" | "0" | "no" | "n" | "disable" | "off" => Some(false),
        _ => None,
    }
}

/// Reads and parses a theme selector from the environment.
pub fn env_theme(name: &str) -> Option<Theme> {
    Some(parse_theme(&std::env::var(name).ok()?))
}

/// Parses a theme selector on top of the bundled theme. Malformed pairs
/// are skipped, not fatal.
pub fn parse_theme(selector: &str) -> Theme {
    let mut theme = Theme::pretty();
    for pair in selector.split('|') {
        let Some((key, value)) = pair.split_once('=') else {
            if !pair.trim().is_empty() {
                warn!(pair, "ignoring malformed theme entry");
            }
            continue;
        };
        theme.set(
            key.trim().to_ascii_lowercase(),
            decode_escapes(value.trim()),
        );
    }
    theme
}

/// Decodes `u+XXXX` / `U+XXXXXXXX` escapes to single code points;
/// invalid code points are left as written.
fn decode_escapes(value: &str) -> String {
    static ESCAPE: OnceLock<Regex> = OnceLock::new();
    let escape =
        ESCAPE.get_or_init(|| Regex::new(r"(?i)u\+([0-9a-f]{8}|[0-9a-f]{4})").unwrap());
    escape
        .replace_all(value, |caps: &Captures<'_>| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_theme_glyphs() {
        let theme = Theme::pretty();
        assert_eq!(theme.get("char_pipe"), Some("\u{2502}"));
        assert_eq!(theme.glyph("char_quote", "'"), "\"");
        assert_eq!(theme.glyph("char_unknown", "'"), "'");
    }

    #[test]
    fn sgr_wraps_only_when_colored() {
        let theme = Theme::pretty();
        assert_eq!(
            theme.sgr("traceback_exception_sgr", "boom", true),
            "\x1b[38;2;255;179;179mboom\x1b[0m"
        );
        assert_eq!(theme.sgr("traceback_exception_sgr", "boom", false), "boom");
        assert_eq!(theme.sgr("no_such_key", "boom", true), "boom");
    }

    #[test]
    fn parse_bool_grammar() {
        for value in ["true", "1", "YES", "y", "Enable", "on"] {
            assert_eq!(parse_bool(value), Some(true), "value {value}");
        }
        for value in ["false", "0", "No", "n", "disable", "OFF"] {
            assert_eq!(parse_bool(value), Some(false), "value {value}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn selector_overrides_bundled_values() {
        let theme = parse_theme("char_quote=')' | traceback_exception_sgr=31");
        assert_eq!(theme.get("char_quote"), Some("')'"));
        assert_eq!(theme.get("traceback_exception_sgr"), Some("31"));
        // Untouched keys keep their bundled values.
        assert_eq!(theme.get("char_pipe"), Some("\u{2502}"));
    }

    #[test]
    fn selector_keys_are_lowercased() {
        let theme = parse_theme("CHAR_QUOTE=*");
        assert_eq!(theme.get("char_quote"), Some("*"));
    }

    #[test]
    fn malformed_pairs_are_skipped() {
        let theme = parse_theme("char_quote|=x||char_pipe=!");
        assert_eq!(theme.get("char_pipe"), Some("!"));
        assert_eq!(theme.get("char_quote"), Some("\""));
    }

    #[test]
    fn escapes_decode_to_code_points() {
        let theme = parse_theme("char_pipe=u+2503|char_cap=U+00002517");
        assert_eq!(theme.get("char_pipe"), Some("\u{2503}"));
        assert_eq!(theme.get("char_cap"), Some("\u{2517}"));
    }

    #[test]
    fn invalid_escapes_stay_literal() {
        // A surrogate code point cannot decode; the text stays as written.
        let theme = parse_theme("char_pipe=u+d800");
        assert_eq!(theme.get("char_pipe"), Some("u+d800"));
        // Too few digits never matches the escape shape.
        let theme = parse_theme("char_pipe=u+25");
        assert_eq!(theme.get("char_pipe"), Some("u+25"));
    }

    #[test]
    fn env_round_trip() {
        std::env::set_var("PRETTYTRACE_THEME_TEST_ONLY", "char_quote=u+00ab");
        let theme = env_theme("PRETTYTRACE_THEME_TEST_ONLY").unwrap();
        assert_eq!(theme.get("char_quote"), Some("\u{ab}"));
        std::env::remove_var("PRETTYTRACE_THEME_TEST_ONLY");
        assert!(env_theme("PRETTYTRACE_THEME_TEST_ONLY").is_none());
    }
}
