//! Diagnostic reporting for the binding generator.
//!
//! Generation passes accumulate warnings and errors into a [`Diagnostics`]
//! sink and report them after the pass completes; a bad declaration must
//! never abort a whole translation unit.

use crate::span::Span;
use miette::{Diagnostic as MietteDiagnostic, SourceSpan};
use std::cell::RefCell;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
    Hint,
}

#[derive(Debug, Clone, Error, MietteDiagnostic)]
#[error("{message}")]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    #[label("{label}")]
    pub span: Option<SourceSpan>,
    pub label: String,
    #[help]
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            message: message.into(),
            span: None,
            label: String::new(),
            help: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            message: message.into(),
            span: None,
            label: String::new(),
            help: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(SourceSpan::new(
            (span.start as usize).into(),
            span.len() as usize,
        ));
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Accumulating diagnostic sink.
///
/// A printer instance holds a shared reference to one of these and pushes
/// warnings as it visits; the driving pass drains it once at the end.
/// Interior mutability keeps the visit methods `&self`.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: RefCell<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.borrow_mut().push(diagnostic);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(Diagnostic::warning(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Diagnostic::error(message));
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drain all accumulated diagnostics, leaving the sink empty.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_accumulates_and_drains() {
        let diags = Diagnostics::new();
        diags.warning("first");
        diags.error("second");
        assert_eq!(diags.len(), 2);
        assert!(diags.has_errors());

        let taken = diags.take();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].level, DiagnosticLevel::Warning);
        assert!(diags.is_empty());
    }
}
