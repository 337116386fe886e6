mod span;
mod diagnostic;

pub use span::Span;
pub use diagnostic::{Diagnostic, DiagnosticLevel, Diagnostics};
