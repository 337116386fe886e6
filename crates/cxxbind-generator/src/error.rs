use thiserror::Error;

/// Failures surfaced by printer visits.
///
/// `Unsupported` marks a recognized-but-unhandled construct; `Malformed`
/// marks an upstream classification defect reaching a printer. Callers may
/// substitute a placeholder and continue with sibling declarations; soft
/// failures (default-argument rendering) never take this path and are
/// downgraded to accumulated diagnostics instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrinterError {
    #[error("unsupported construct: {construct}")]
    Unsupported { construct: &'static str },

    #[error("malformed input: {0}")]
    Malformed(String),
}

impl PrinterError {
    pub fn unsupported(construct: &'static str) -> Self {
        Self::Unsupported { construct }
    }
}
