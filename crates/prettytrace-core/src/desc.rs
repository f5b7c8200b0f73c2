//! Declarative, serializable error-chain descriptions.
//!
//! Fixtures and the CLI describe an error and its ancestry as a JSON
//! document and build the linked [`CapturedError`] graph from it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::frame::{StackFrame, TraceFrame};
use crate::types::{CapturedError, ErrorClass, ErrorMessage};

/// A serializable description of one error and its ancestry.
///
/// Descriptions are trees, so a described graph is always acyclic;
/// cyclic graphs are assembled with [`CapturedError::set_cause`] /
/// [`CapturedError::set_context`] directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDesc {
    /// Bare type name.
    pub class: String,

    /// Defining namespace, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    /// Display message.
    #[serde(default)]
    pub message: String,

    /// Captured frames, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<StackFrame>,

    /// Explicit predecessor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorDesc>>,

    /// Implicit predecessor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Box<ErrorDesc>>,

    /// Whether the implicit predecessor is hidden.
    #[serde(default)]
    pub suppress_context: bool,
}

impl ErrorDesc {
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            module: None,
            message: message.into(),
            frames: Vec::new(),
            cause: None,
            context: None,
            suppress_context: false,
        }
    }

    /// Builds the linked error graph this description denotes.
    pub fn build(&self) -> Arc<CapturedError> {
        let class = match &self.module {
            Some(module) => ErrorClass::new(module.clone(), self.class.clone()),
            None => ErrorClass::anonymous(self.class.clone()),
        };
        let trace = TraceFrame::trace(self.frames.iter().cloned());
        let error =
            CapturedError::from_parts(class, ErrorMessage::Text(self.message.clone()), trace);

        if let Some(context) = &self.context {
            error.set_context(Some(context.build()));
        }
        if let Some(cause) = &self.cause {
            error.set_cause(Some(cause.build()));
        }
        // The explicit flag wins over the implicit suppression that
        // linking a cause carries.
        error.set_suppress_context(self.suppress_context);
        error
    }
}
