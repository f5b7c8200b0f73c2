//! Process-wide registration and ambient state.
//!
//! One hook slot for the installed formatter, one slot each for the
//! current and last error triples, a default traceback limit, and an
//! optional live-stack capability. Everything here is explicit global
//! mutable state with init/teardown entry points; nothing runs as an
//! import-time side effect. If the host is multi-threaded, writers are
//! expected to coordinate among themselves — a reader sees whatever was
//! consistent at the instant of the read.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use prettytrace_core::{
    CallFrame, CallStackSource, CapturedError, ExcInfo, FormatError, FormatOptions, FrameWindow,
    TracebackFormatter,
};

use crate::formatter::DefaultFormatter;
use crate::theme::{self, Theme};

/// Master switch; tri-state boolean.
pub const ENV_ENABLE: &str = "PRETTYTRACE";
/// Traceback-specific switch, consulted when the master switch is unset.
pub const ENV_TRACEBACK: &str = "PRETTYTRACE_TRACEBACK";
/// Theme selector.
pub const ENV_THEME: &str = "PRETTYTRACE_THEME";

type SharedFormatter = Arc<dyn TracebackFormatter>;

static HOOK: RwLock<Option<SharedFormatter>> = RwLock::new(None);
static CURRENT: RwLock<Option<ExcInfo>> = RwLock::new(None);
static LAST: RwLock<Option<ExcInfo>> = RwLock::new(None);
static LIMIT: RwLock<FrameWindow> = RwLock::new(FrameWindow::Unlimited);
static STACK: RwLock<Option<Arc<dyn CallStackSource>>> = RwLock::new(None);

// ─── Hook slot ────────────────────────────────────────────────────────────────

/// Installs `formatter` as the process-wide hook, returning the previous
/// occupant.
pub fn install(formatter: SharedFormatter) -> Option<SharedFormatter> {
    HOOK.write().unwrap().replace(formatter)
}

/// Empties the hook slot, returning the occupant.
pub fn uninstall() -> Option<SharedFormatter> {
    HOOK.write().unwrap().take()
}

/// The installed formatter, if any.
pub fn installed() -> Option<SharedFormatter> {
    HOOK.read().unwrap().clone()
}

/// The installed formatter, or a plain default.
pub fn formatter() -> SharedFormatter {
    installed().unwrap_or_else(|| Arc::new(DefaultFormatter::new()))
}

// ─── Error slots ──────────────────────────────────────────────────────────────

/// Marks `info` as the ambient in-flight error.
pub fn set_current_error(info: ExcInfo) {
    *CURRENT.write().unwrap() = Some(info);
}

/// Clears the ambient in-flight error.
pub fn clear_current_error() {
    *CURRENT.write().unwrap() = None;
}

/// The ambient in-flight error; the null triple when none is active.
pub fn current_error() -> ExcInfo {
    CURRENT.read().unwrap().clone().unwrap_or_default()
}

/// Records the most recent top-level unhandled error. Each event
/// overwrites the slot.
pub fn record_last_error(info: ExcInfo) {
    *LAST.write().unwrap() = Some(info);
}

/// Empties the last-error slot (teardown, mostly for tests).
pub fn clear_last_error() {
    *LAST.write().unwrap() = None;
}

/// The last recorded unhandled error; reading an unset slot is an error
/// condition, not a default.
pub fn last_error() -> Result<ExcInfo, FormatError> {
    LAST.read().unwrap().clone().ok_or(FormatError::NoLastError)
}

// ─── Traceback limit slot ─────────────────────────────────────────────────────

/// Sets the process-wide default frame window, consulted by extraction
/// when a call passes `FrameWindow::Unlimited`.
pub fn set_traceback_limit(limit: FrameWindow) {
    *LIMIT.write().unwrap() = limit;
}

/// The process-wide default frame window.
pub fn traceback_limit() -> FrameWindow {
    *LIMIT.read().unwrap()
}

// ─── Live-stack capability ────────────────────────────────────────────────────

/// Registers the host's live-stack capability, used by stack-only entry
/// points when no explicit frame is given.
pub fn set_stack_source(source: Arc<dyn CallStackSource>) {
    *STACK.write().unwrap() = Some(source);
}

/// Unregisters the live-stack capability.
pub fn clear_stack_source() {
    *STACK.write().unwrap() = None;
}

/// The innermost frame of the registered live-stack capability, if any.
pub fn innermost_frame() -> Option<Arc<CallFrame>> {
    STACK.read().unwrap().as_ref().and_then(|s| s.innermost())
}

// ─── Unhandled errors and environment activation ──────────────────────────────

/// Records `error` in the last-error slot and prints its chain to
/// stderr through the installed formatter. A panicking themed path falls
/// back to the plain formatter; the failure is not surfaced.
pub fn report_unhandled(error: &Arc<CapturedError>) {
    let info = ExcInfo::of(error);
    record_last_error(info.clone());

    let options = FormatOptions::default();
    let hooked = formatter();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        hooked.print_error(&info, &options)
    }));
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(%err, "unhandled-error write failed"),
        Err(_) => {
            warn!("installed formatter panicked, falling back to the plain form");
            if let Err(err) = DefaultFormatter::new().print_error(&info, &options) {
                warn!(%err, "fallback write failed");
            }
        }
    }
}

/// Reads the activation variables and installs a themed formatter when
/// enabled. Returns whether a hook was installed.
///
/// `PRETTYTRACE=0` disables everything; `PRETTYTRACE=1` or
/// `PRETTYTRACE_TRACEBACK=1` enables; otherwise nothing happens.
pub fn init_from_env() -> bool {
    let master = theme::env_bool(ENV_ENABLE);
    if master == Some(false) {
        debug!("pretty formatting disabled by {ENV_ENABLE}");
        return false;
    }

    let enabled = master == Some(true) || theme::env_bool(ENV_TRACEBACK).unwrap_or(false);
    if !enabled {
        return false;
    }

    let theme = theme::env_theme(ENV_THEME).unwrap_or_else(Theme::pretty);
    install(Arc::new(DefaultFormatter::pretty(theme)));
    debug!("pretty traceback formatter installed");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use prettytrace_core::{ErrorClass, RecordedStack, StackFrame};

    // The slots are process-wide; mutating tests take the exclusive side
    // of the crate test lock so slot-reading tests elsewhere see stable
    // state.
    fn guard() -> std::sync::RwLockWriteGuard<'static, ()> {
        crate::testsync::exclusive()
    }

    fn err(name: &str, message: &str) -> Arc<CapturedError> {
        CapturedError::new(ErrorClass::builtin(name), message)
    }

    #[test]
    fn last_error_slot_lifecycle() {
        let _guard = guard();
        clear_last_error();

        assert!(matches!(last_error(), Err(FormatError::NoLastError)));

        record_last_error(ExcInfo::of(&err("ValueError", "first")));
        record_last_error(ExcInfo::of(&err("TypeError", "second")));
        let info = last_error().unwrap();
        assert_eq!(info.class.unwrap().name, "TypeError");

        clear_last_error();
        assert!(matches!(last_error(), Err(FormatError::NoLastError)));
    }

    #[test]
    fn current_error_slot_defaults_to_the_null_triple() {
        let _guard = guard();
        clear_current_error();

        assert!(current_error().is_none());

        set_current_error(ExcInfo::of(&err("KeyError", "'k'")));
        assert_eq!(current_error().class.unwrap().name, "KeyError");

        clear_current_error();
        assert!(current_error().is_none());
    }

    #[test]
    fn install_and_uninstall_cycle() {
        let _guard = guard();
        uninstall();

        assert!(installed().is_none());
        assert!(install(Arc::new(DefaultFormatter::new())).is_none());
        assert!(installed().is_some());
        assert!(uninstall().is_some());
        assert!(installed().is_none());
    }

    #[test]
    fn traceback_limit_slot_applies_to_extraction() {
        let _guard = guard();

        let trace = prettytrace_core::TraceFrame::trace(
            (1..=4).map(|i| StackFrame::new(format!("fn_{i}"), "app.rs", i)),
        )
        .unwrap();

        set_traceback_limit(FrameWindow::First(2));
        let limited: Vec<_> =
            crate::extract::extract_frames(trace.clone().into(), FrameWindow::Unlimited).collect();
        set_traceback_limit(FrameWindow::Unlimited);

        assert_eq!(limited.len(), 2);

        // An explicit zero still beats the global default.
        set_traceback_limit(FrameWindow::First(3));
        let explicit: Vec<_> =
            crate::extract::extract_frames(trace.into(), FrameWindow::First(0)).collect();
        set_traceback_limit(FrameWindow::Unlimited);
        assert!(explicit.is_empty());
    }

    #[test]
    fn stack_source_registration() {
        let _guard = guard();
        clear_stack_source();

        assert!(innermost_frame().is_none());

        let stack = Arc::new(RecordedStack::new());
        stack.push(StackFrame::new("main", "app.rs", 1));
        set_stack_source(stack);
        assert_eq!(innermost_frame().unwrap().frame().scope, "main");

        clear_stack_source();
        assert!(innermost_frame().is_none());
    }

    #[test]
    fn report_unhandled_records_the_slot() {
        let _guard = guard();
        clear_last_error();
        uninstall();

        report_unhandled(&err("ValueError", "terminal"));
        let info = last_error().unwrap();
        assert_eq!(info.class.unwrap().name, "ValueError");

        clear_last_error();
    }

    #[test]
    fn report_unhandled_survives_a_panicking_formatter() {
        let _guard = guard();
        clear_last_error();

        struct FailingStyle;
        impl crate::style::Style for FailingStyle {
            fn trace_header(&self, _color: bool) -> String {
                panic!("style failure")
            }
            fn frame_line(&self, _frame: &StackFrame, _color: bool) -> String {
                panic!("style failure")
            }
            fn source_line(&self, _source: &str, _color: bool) -> String {
                panic!("style failure")
            }
            fn repeat_line(&self, _count: usize, _color: bool) -> String {
                panic!("style failure")
            }
            fn summary_line(&self, _text: &str, _under_trace: bool, _color: bool) -> String {
                panic!("style failure")
            }
        }

        install(Arc::new(DefaultFormatter::with_style(Arc::new(FailingStyle))));

        // Must neither propagate the panic nor skip the slot write.
        report_unhandled(&err("ValueError", "terminal"));
        assert_eq!(last_error().unwrap().class.unwrap().name, "ValueError");

        uninstall();
        clear_last_error();
    }

    #[test]
    fn init_from_env_respects_the_master_override() {
        let _guard = guard();
        uninstall();

        std::env::set_var(ENV_ENABLE, "0");
        std::env::set_var(ENV_TRACEBACK, "1");
        assert!(!init_from_env());
        assert!(installed().is_none());

        std::env::remove_var(ENV_ENABLE);
        assert!(init_from_env());
        assert!(installed().is_some());

        std::env::remove_var(ENV_TRACEBACK);
        uninstall();
        assert!(!init_from_env());
    }

    #[test]
    fn init_from_env_applies_the_theme_selector() {
        let _guard = guard();
        uninstall();

        std::env::set_var(ENV_ENABLE, "yes");
        std::env::set_var(ENV_THEME, "char_pipe=u+2503");
        assert!(init_from_env());
        assert!(installed().is_some());

        std::env::remove_var(ENV_ENABLE);
        std::env::remove_var(ENV_THEME);
        uninstall();
    }
}
