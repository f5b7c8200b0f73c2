//! Error values as the formatting engine sees them.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::frame::TraceFrame;

/// Placeholder for a value whose display produced no usable text.
pub const UNPRINTABLE: &str = "<unprintable object>";

/// Module names whose members print without qualification.
const BARE_MODULES: &[&str] = &["__main__", "builtins"];

// ─── ErrorClass ───────────────────────────────────────────────────────────────

/// The type identity of a captured error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorClass {
    /// Defining namespace; `None` for anonymous types.
    pub module: Option<String>,
    /// Bare type name.
    pub name: String,
}

impl ErrorClass {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            name: name.into(),
        }
    }

    /// A type with no defining namespace.
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            module: None,
            name: name.into(),
        }
    }

    /// A type living in the built-in namespace.
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::new("builtins", name)
    }

    /// The display name: `module.name`, except for top-level and
    /// built-in types, which keep the bare name.
    pub fn qualified(&self) -> String {
        match self.module.as_deref() {
            Some(module) if !module.is_empty() && !BARE_MODULES.contains(&module) => {
                format!("{module}.{}", self.name)
            }
            _ => self.name.clone(),
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified())
    }
}

// ─── ErrorMessage ─────────────────────────────────────────────────────────────

/// The display message of a captured error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    /// Stringified eagerly when the error was captured.
    Text(String),
    /// The host failed to stringify the value.
    Unprintable {
        /// Qualified name of the concrete runtime type, when obtainable.
        type_name: Option<String>,
    },
}

impl ErrorMessage {
    /// Captures from a live `Display` value, recovering from a panicking
    /// implementation with the unprintable marker.
    pub fn from_display<D: fmt::Display + ?Sized>(value: &D) -> Self {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| value.to_string())) {
            Ok(text) => Self::Text(text),
            Err(_) => Self::Unprintable { type_name: None },
        }
    }

    /// The rendered text; unprintable values render a fixed marker.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Unprintable {
                type_name: Some(name),
            } => format!("<unprintable {name} object>"),
            Self::Unprintable { type_name: None } => UNPRINTABLE.to_string(),
        }
    }

    /// Whether the summary line should omit the message half entirely.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }
}

impl From<String> for ErrorMessage {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ErrorMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

// ─── CapturedError ────────────────────────────────────────────────────────────

/// An error value with its causal links and captured trace.
///
/// Cause and context links may be set after construction so that chains —
/// and even cycles — can be assembled; identity is the allocation itself,
/// which is why constructors hand out `Arc`s. A cyclic graph keeps itself
/// alive until every external handle is dropped.
#[derive(Debug)]
pub struct CapturedError {
    class: ErrorClass,
    message: ErrorMessage,
    trace: Option<Arc<TraceFrame>>,
    cause: RwLock<Option<Arc<CapturedError>>>,
    context: RwLock<Option<Arc<CapturedError>>>,
    suppress_context: AtomicBool,
}

impl CapturedError {
    pub fn new(class: ErrorClass, message: impl Into<ErrorMessage>) -> Arc<Self> {
        Self::from_parts(class, message.into(), None)
    }

    pub fn with_trace(
        class: ErrorClass,
        message: impl Into<ErrorMessage>,
        trace: Option<Arc<TraceFrame>>,
    ) -> Arc<Self> {
        Self::from_parts(class, message.into(), trace)
    }

    pub fn from_parts(
        class: ErrorClass,
        message: ErrorMessage,
        trace: Option<Arc<TraceFrame>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            class,
            message,
            trace,
            cause: RwLock::new(None),
            context: RwLock::new(None),
            suppress_context: AtomicBool::new(false),
        })
    }

    /// Adopts a standard-library error, turning its `source()` chain into
    /// explicit cause links. No traces are attached; the class names are
    /// the bare type names the host can recover.
    pub fn from_std<E>(error: &E) -> Arc<Self>
    where
        E: std::error::Error,
    {
        let name = std::any::type_name::<E>()
            .rsplit("::")
            .next()
            .unwrap_or("Error");
        let adopted = Self::new(ErrorClass::anonymous(name), ErrorMessage::from_display(error));

        let mut handle = adopted.clone();
        let mut source = error.source();
        while let Some(inner) = source {
            let cause = Self::new(
                ErrorClass::anonymous("Error"),
                ErrorMessage::from_display(inner),
            );
            handle.set_cause(Some(cause.clone()));
            handle = cause;
            source = inner.source();
        }
        adopted
    }

    pub fn class(&self) -> &ErrorClass {
        &self.class
    }

    pub fn message(&self) -> &ErrorMessage {
        &self.message
    }

    pub fn trace(&self) -> Option<&Arc<TraceFrame>> {
        self.trace.as_ref()
    }

    pub fn cause(&self) -> Option<Arc<CapturedError>> {
        self.cause.read().unwrap().clone()
    }

    /// Links an explicit predecessor. Mirroring re-raise semantics, this
    /// also suppresses the implicit context.
    pub fn set_cause(&self, cause: Option<Arc<CapturedError>>) {
        *self.cause.write().unwrap() = cause;
        self.suppress_context.store(true, Ordering::Relaxed);
    }

    pub fn context(&self) -> Option<Arc<CapturedError>> {
        self.context.read().unwrap().clone()
    }

    /// Links the implicit predecessor: whatever error was being handled
    /// when this one was raised.
    pub fn set_context(&self, context: Option<Arc<CapturedError>>) {
        *self.context.write().unwrap() = context;
    }

    pub fn suppress_context(&self) -> bool {
        self.suppress_context.load(Ordering::Relaxed)
    }

    pub fn set_suppress_context(&self, suppress: bool) {
        self.suppress_context.store(suppress, Ordering::Relaxed);
    }

    /// Reference identity, stable for the lifetime of this allocation.
    pub fn id(self: &Arc<Self>) -> ErrorId {
        ErrorId(Arc::as_ptr(self) as usize)
    }
}

/// Opaque identity of one error allocation, for cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorId(usize);

// ─── ExcInfo ──────────────────────────────────────────────────────────────────

/// The legacy `(class, value, trace)` triple.
#[derive(Debug, Clone, Default)]
pub struct ExcInfo {
    pub class: Option<ErrorClass>,
    pub value: Option<Arc<CapturedError>>,
    pub trace: Option<Arc<TraceFrame>>,
}

impl ExcInfo {
    /// The null triple: no error in flight.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds the triple from an error, taking its class and trace.
    pub fn of(value: &Arc<CapturedError>) -> Self {
        Self {
            class: Some(value.class().clone()),
            trace: value.trace().cloned(),
            value: Some(value.clone()),
        }
    }

    pub fn is_none(&self) -> bool {
        self.class.is_none() && self.value.is_none() && self.trace.is_none()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
