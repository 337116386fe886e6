//! The canonical, desugared representation of C/C++ types.
//!
//! Each [`Type`] node is created once per distinct syntactic occurrence by
//! the front-end and is immutable from this crate's point of view, except
//! for the narrow rebind operations on [`crate::Ast`]. Declarations are
//! referenced by [`DeclId`], never duplicated into the type tree.

use crate::decl::DeclId;
use smol_str::SmolStr;

/// The closed set of builtin C/C++ (and bridged managed) primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Void,
    Char,
    SChar,
    UChar,
    WideChar,
    Char16,
    Char32,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Int128,
    UInt128,
    Half,
    Float,
    Double,
    LongDouble,
    Float128,
    /// Pointer-sized signed integer (prints as `void*` in C contexts).
    IntPtr,
    /// Pointer-sized unsigned integer.
    UIntPtr,
    Null,
    String,
    Decimal,
}

/// One level of indirection. Chains are modeled by nested `Pointer` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerModifier {
    /// C++/CX value array (`[]`).
    Value,
    /// Raw pointer (`*`).
    Pointer,
    /// Lvalue reference (`&`).
    LVReference,
    /// Rvalue reference (`&&`).
    RVReference,
}

impl PointerModifier {
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            PointerModifier::LVReference | PointerModifier::RVReference
        )
    }
}

/// How the size of an array is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArraySize {
    Constant(u64),
    Variable,
    Dependent,
    Incomplete,
}

/// Const/volatile qualification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Qualifiers {
    pub is_const: bool,
    pub is_volatile: bool,
}

impl Qualifiers {
    pub const NONE: Qualifiers = Qualifiers {
        is_const: false,
        is_volatile: false,
    };

    pub const CONST: Qualifiers = Qualifiers {
        is_const: true,
        is_volatile: false,
    };
}

/// Marks a qualified type as appearing in a raw/native position, which
/// forces original-name selection during printing regardless of the
/// ambient context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QualifiersMode {
    #[default]
    Default,
    Native,
}

/// A type paired with its qualifiers and native/managed mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedType {
    pub ty: Box<Type>,
    pub qualifiers: Qualifiers,
    pub mode: QualifiersMode,
}

impl QualifiedType {
    pub fn new(ty: Type) -> Self {
        Self {
            ty: Box::new(ty),
            qualifiers: Qualifiers::NONE,
            mode: QualifiersMode::Default,
        }
    }

    pub fn with_qualifiers(ty: Type, qualifiers: Qualifiers) -> Self {
        Self {
            ty: Box::new(ty),
            qualifiers,
            mode: QualifiersMode::Default,
        }
    }

    pub fn const_(ty: Type) -> Self {
        Self::with_qualifiers(ty, Qualifiers::CONST)
    }

    pub fn native(mut self) -> Self {
        self.mode = QualifiersMode::Native;
        self
    }
}

/// One argument of a template specialization. The index position is
/// meaningful: it matches the template's declared parameter list, which is
/// how default-valued non-type arguments are suppressed when printing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateArgument {
    Type(QualifiedType),
    Declaration(DeclId),
    Integral(i64),
}

/// Calling convention of a function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CallingConvention {
    #[default]
    Default,
    C,
    StdCall,
    ThisCall,
    FastCall,
}

/// Exception specification of a function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExceptionSpecKind {
    #[default]
    None,
    BasicNoexcept,
    NoexceptTrue,
    NoexceptFalse,
    Dynamic,
    DynamicNone,
    DependentNoexcept,
    MsAny,
    Unevaluated,
    Uninstantiated,
    Unparsed,
}

/// A C/C++ type, structurally classified by the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A builtin primitive type.
    Builtin(PrimitiveKind),

    /// One level of pointer or reference indirection.
    Pointer {
        pointee: QualifiedType,
        modifier: PointerModifier,
    },

    /// Pointer to member (`T C::*`).
    MemberPointer { pointee: QualifiedType },

    /// Array type `T[N]`, `T[]`, or a variable/dependent-length array.
    Array {
        element: QualifiedType,
        size: ArraySize,
    },

    /// A type naming a class/struct/union/enum declaration.
    Tag { decl: DeclId },

    /// A typedef or alias; desugars through the declaration's own type.
    Typedef { decl: DeclId },

    /// An unsubstituted template parameter (`T`).
    TemplateParameter { decl: DeclId },

    /// A template parameter after substitution; desugars to the
    /// replacement.
    TemplateParameterSubstitution { replacement: QualifiedType },

    /// A template applied to arguments (`vector<int>`).
    TemplateSpecialization {
        template: DeclId,
        arguments: Vec<TemplateArgument>,
        /// The sugar-free form, when the front-end could compute one.
        desugared: Option<QualifiedType>,
        is_dependent: bool,
    },

    /// A dependent specialization whose template could not be resolved;
    /// printable only through its desugared form.
    DependentTemplateSpecialization { desugared: Option<QualifiedType> },

    /// The class name as injected inside its own definition.
    InjectedClassName {
        class: DeclId,
        injected_specialization: Option<QualifiedType>,
    },

    /// An attributed type; desugars to its equivalent.
    Attributed {
        modified: QualifiedType,
        equivalent: QualifiedType,
    },

    /// An array/function type decayed to a pointer.
    Decayed { decayed: QualifiedType },

    /// A dependent name (`typename T::iterator`).
    DependentName { qualifier: Option<QualifiedType> },

    /// A unary type transform (`__underlying_type(T)`).
    UnaryTransform {
        desugared: Option<QualifiedType>,
        base: QualifiedType,
    },

    /// A template parameter pack expansion (`Args...`).
    PackExpansion,

    /// A GCC/Clang vector type.
    Vector {
        element: QualifiedType,
        num_elements: u32,
    },

    /// A construct the front-end recognized but cannot model; carries the
    /// original spelling.
    Unsupported(SmolStr),

    /// A function type `R(params)`.
    Function {
        return_type: QualifiedType,
        parameters: Vec<DeclId>,
        calling_convention: CallingConvention,
        exception_spec: ExceptionSpecKind,
    },
}

impl Type {
    pub fn builtin(kind: PrimitiveKind) -> Self {
        Type::Builtin(kind)
    }

    pub fn int() -> Self {
        Type::Builtin(PrimitiveKind::Int)
    }

    pub fn void() -> Self {
        Type::Builtin(PrimitiveKind::Void)
    }

    pub fn char_() -> Self {
        Type::Builtin(PrimitiveKind::Char)
    }

    /// Wrap this type in one level of raw pointer.
    pub fn ptr(self) -> Self {
        Type::Pointer {
            pointee: QualifiedType::new(self),
            modifier: PointerModifier::Pointer,
        }
    }

    /// Wrap this type in a pointer to a const pointee.
    pub fn const_ptr(self) -> Self {
        Type::Pointer {
            pointee: QualifiedType::const_(self),
            modifier: PointerModifier::Pointer,
        }
    }

    /// Wrap this type in an lvalue reference.
    pub fn lv_ref(self) -> Self {
        Type::Pointer {
            pointee: QualifiedType::new(self),
            modifier: PointerModifier::LVReference,
        }
    }

    /// Wrap this type in an rvalue reference.
    pub fn rv_ref(self) -> Self {
        Type::Pointer {
            pointee: QualifiedType::new(self),
            modifier: PointerModifier::RVReference,
        }
    }

    pub fn array_of(self, size: u64) -> Self {
        Type::Array {
            element: QualifiedType::new(self),
            size: ArraySize::Constant(size),
        }
    }

    pub fn tag(decl: DeclId) -> Self {
        Type::Tag { decl }
    }

    pub fn typedef(decl: DeclId) -> Self {
        Type::Typedef { decl }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_nest_one_level_per_node() {
        let ty = Type::int().ptr().ptr();
        let Type::Pointer { pointee, modifier } = &ty else {
            panic!("expected pointer");
        };
        assert_eq!(*modifier, PointerModifier::Pointer);
        assert!(matches!(*pointee.ty, Type::Pointer { .. }));
    }

    #[test]
    fn reference_modifiers_classify() {
        assert!(PointerModifier::LVReference.is_reference());
        assert!(PointerModifier::RVReference.is_reference());
        assert!(!PointerModifier::Pointer.is_reference());
        assert!(!PointerModifier::Value.is_reference());
    }

    #[test]
    fn qualified_const_builder() {
        let qt = QualifiedType::const_(Type::int());
        assert!(qt.qualifiers.is_const);
        assert!(!qt.qualifiers.is_volatile);
        assert_eq!(qt.mode, QualifiersMode::Default);
    }
}
