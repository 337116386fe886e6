//! Ambient printing state.
//!
//! A [`PrintContext`] is an immutable value threaded through every visit;
//! a recursive call that needs a different scope or context constructs a
//! derived copy. There is no push/pop pairing to get wrong.

/// The output dialect a result is destined for. Only the joining rules of
/// the result model consult this; the printers carry their own flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorKind {
    C,
    #[default]
    Cpp,
    ObjC,
    CSharp,
    Cli,
    TypeScript,
}

/// Whether names are selected from the native (original) or managed
/// (possibly renamed) side of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Native,
    Managed,
}

/// The marshaling position a type occurrence appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarshalKind {
    #[default]
    Unknown,
    NativeField,
    GenericDelegate,
    DefaultExpression,
    VTableReturnValue,
}

/// How much qualification a printed name carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Bare name.
    Local,
    /// Namespace/class qualified.
    Qualified,
    /// Fully rooted, with a global prefix where the dialect has one.
    GlobalQualified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintContext {
    pub context: ContextKind,
    pub marshal: MarshalKind,
    pub scope: ScopeKind,
}

impl PrintContext {
    pub fn native() -> Self {
        Self {
            context: ContextKind::Native,
            marshal: MarshalKind::Unknown,
            scope: ScopeKind::GlobalQualified,
        }
    }

    pub fn managed() -> Self {
        Self {
            context: ContextKind::Managed,
            ..Self::native()
        }
    }

    #[must_use]
    pub fn with_scope(self, scope: ScopeKind) -> Self {
        Self { scope, ..self }
    }

    #[must_use]
    pub fn with_context(self, context: ContextKind) -> Self {
        Self { context, ..self }
    }

    #[must_use]
    pub fn with_marshal(self, marshal: MarshalKind) -> Self {
        Self { marshal, ..self }
    }

    pub fn is_global_qualified(self) -> bool {
        self.scope == ScopeKind::GlobalQualified
    }
}
