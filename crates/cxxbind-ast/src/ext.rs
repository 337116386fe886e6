//! Classification and desugaring queries over the type model.
//!
//! Every query is total: "not found" is `None`/`false`, never a panic.
//! Queries that are about the *meaning* of a type desugar internally;
//! raw structural queries (`is_pointer`, `get_pointee`) deliberately do
//! not, so callers control when sugar is stripped.

use crate::decl::{Ast, ClassTemplateSpecialization, DeclId, DeclKind, ModuleId};
use crate::types::{PointerModifier, PrimitiveKind, QualifiedType, Type};

/// Upper bound on desugaring steps. The front-end guarantees acyclic
/// typedef/substitution chains; running out of fuel means malformed input.
const DESUGAR_FUEL: usize = 256;

impl PrimitiveKind {
    /// Width of the primitive in bits, for the kinds with a fixed width.
    pub fn size_in_bits(self) -> Option<u64> {
        Some(match self {
            PrimitiveKind::Bool | PrimitiveKind::Char | PrimitiveKind::SChar
            | PrimitiveKind::UChar => 8,
            PrimitiveKind::Char16 | PrimitiveKind::Short | PrimitiveKind::UShort
            | PrimitiveKind::Half => 16,
            PrimitiveKind::Char32 | PrimitiveKind::WideChar | PrimitiveKind::Int
            | PrimitiveKind::UInt | PrimitiveKind::Float => 32,
            PrimitiveKind::LongLong | PrimitiveKind::ULongLong | PrimitiveKind::Double => 64,
            PrimitiveKind::Int128 | PrimitiveKind::UInt128 | PrimitiveKind::Float128 => 128,
            _ => return None,
        })
    }
}

impl Type {
    /// Resolve typedefs, template-parameter substitutions, injected class
    /// names, and attributed sugar down to the structural form.
    ///
    /// Written as an explicit loop so long typedef chains cannot grow the
    /// call stack.
    pub fn desugar(&self, ast: &Ast) -> Type {
        self.desugar_with(ast, true)
    }

    /// Like [`Type::desugar`] but keeps template-parameter substitutions
    /// intact, for callers that need to see the pre-substitution shape.
    pub fn desugar_keeping_substitutions(&self, ast: &Ast) -> Type {
        self.desugar_with(ast, false)
    }

    fn desugar_with(&self, ast: &Ast, resolve_substitution: bool) -> Type {
        let mut t = self.clone();
        let mut fuel = DESUGAR_FUEL;
        loop {
            if fuel == 0 {
                debug_assert!(false, "desugar fuel exhausted: typedef cycle in front-end input");
                return t;
            }
            fuel -= 1;

            t = match t {
                Type::Typedef { decl } => match &ast.decl(decl).kind {
                    DeclKind::Typedef { ty } | DeclKind::TypeAlias { ty } => (*ty.ty).clone(),
                    _ => return Type::Typedef { decl },
                },
                Type::TemplateParameterSubstitution { replacement } if resolve_substitution => {
                    (*replacement.ty).clone()
                }
                Type::InjectedClassName {
                    injected_specialization: Some(spec),
                    ..
                } => (*spec.ty).clone(),
                Type::InjectedClassName {
                    class,
                    injected_specialization: None,
                } => return Type::Tag { decl: class },
                Type::Attributed { equivalent, .. } => (*equivalent.ty).clone(),
                other => return other,
            };
        }
    }

    /// `Some(kind)` iff the desugared type is a builtin primitive.
    pub fn is_primitive_type(&self, ast: &Ast) -> Option<PrimitiveKind> {
        match self.desugar(ast) {
            Type::Builtin(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_primitive(&self, ast: &Ast, kind: PrimitiveKind) -> bool {
        self.is_primitive_type(ast) == Some(kind)
    }

    /// Whether the desugared type names an enumeration declaration.
    pub fn is_enum_type(&self, ast: &Ast) -> bool {
        self.try_get_enum(ast).is_some()
    }

    pub fn try_get_enum(&self, ast: &Ast) -> Option<DeclId> {
        match self.desugar(ast) {
            Type::Tag { decl } if ast.is_enum(decl) => Some(decl),
            _ => None,
        }
    }

    /// Raw pointers and member pointers; references are excluded.
    /// Structural: does not desugar.
    pub fn is_pointer(&self) -> bool {
        match self {
            Type::MemberPointer { .. } => true,
            Type::Pointer { modifier, .. } => *modifier == PointerModifier::Pointer,
            _ => false,
        }
    }

    /// Lvalue or rvalue references. Structural: does not desugar.
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Pointer { modifier, .. } if modifier.is_reference())
    }

    pub fn is_address(&self) -> bool {
        self.is_pointer() || self.is_reference()
    }

    pub fn is_pointer_to_primitive(&self, ast: &Ast) -> Option<PrimitiveKind> {
        match self {
            Type::Pointer { pointee, .. } => pointee.ty.is_primitive_type(ast),
            _ => None,
        }
    }

    pub fn is_pointer_to_enum(&self, ast: &Ast) -> Option<DeclId> {
        match self {
            Type::Pointer { pointee, .. } => pointee.ty.try_get_enum(ast),
            _ => None,
        }
    }

    /// The type pointed to by one level of indirection, or `None`.
    /// Does not desugar the receiver; that is the caller's call.
    pub fn get_pointee(&self) -> Option<&Type> {
        match self {
            Type::Pointer { pointee, .. } | Type::MemberPointer { pointee } => Some(&pointee.ty),
            _ => None,
        }
    }

    /// Strips every level of indirection: `T***` yields `T`. `None` when
    /// the receiver has no indirection at all.
    pub fn get_final_pointee(&self) -> Option<&Type> {
        let mut final_pointee = self.get_pointee()?;
        while let Some(pointee) = final_pointee.get_pointee() {
            final_pointee = pointee;
        }
        Some(final_pointee)
    }

    /// The innermost pointer node of a pointer chain, desugaring between
    /// levels. `None` when the receiver is not a pointer.
    pub fn get_final_pointer(&self, ast: &Ast) -> Option<Type> {
        if !matches!(self, Type::Pointer { .. }) {
            return None;
        }
        let desugared = self.desugar(ast);
        let pointee = desugared.get_pointee()?;
        if pointee.is_pointer() {
            pointee.get_final_pointer(ast)
        } else {
            Some(self.clone())
        }
    }

    /// One level of pointee together with its qualifiers.
    pub fn get_qualified_pointee(&self) -> Option<&QualifiedType> {
        match self {
            Type::Pointer { pointee, .. } | Type::MemberPointer { pointee } => Some(pointee),
            _ => None,
        }
    }

    pub fn get_final_qualified_pointee(&self) -> Option<&QualifiedType> {
        let mut final_pointee = self.get_qualified_pointee()?;
        while let Some(pointee) = final_pointee.ty.get_qualified_pointee() {
            final_pointee = pointee;
        }
        Some(final_pointee)
    }

    /// Removes one level of pointer/reference wrapping: `int**` -> `int*`.
    pub fn remove_pointer(&self) -> &Type {
        match self {
            Type::Pointer { pointee, .. } => &pointee.ty,
            _ => self,
        }
    }

    /// Removes all pointer/reference wrapping: `int**` -> `int`.
    pub fn remove_all_pointers(&self) -> &Type {
        let mut t = self;
        while let Type::Pointer { pointee, .. } = t {
            t = &pointee.ty;
        }
        t
    }

    /// Removes one level of reference wrapping: `int&` -> `int`,
    /// `int*&` -> `int*`. Pointers are left alone.
    pub fn remove_reference(&self) -> &Type {
        match self {
            Type::Pointer { pointee, modifier } if modifier.is_reference() => &pointee.ty,
            _ => self,
        }
    }

    /// Strips reference wrapping, desugaring each pointee along the way,
    /// stopping at the first non-reference. Reaches the "real" referred
    /// type for const-reference checks.
    pub fn skip_pointer_refs(&self, ast: &Ast) -> Type {
        let mut t = self.clone();
        loop {
            match &t {
                Type::Pointer { pointee, modifier } if modifier.is_reference() => {
                    t = pointee.ty.desugar(ast);
                }
                _ => return t,
            }
        }
    }

    /// Resolve a (possibly sugared, possibly dependent) type to its owning
    /// declaration.
    ///
    /// Dependent specializations resolve through their template: alias
    /// templates recurse into the desugared form, class templates yield the
    /// templated class (preferring its complete declaration), template
    /// template parameters yield their templated declaration. Anything else
    /// is inspected as a tag type, following one level of final-pointee
    /// dereference for non-dependent specializations.
    pub fn try_get_declaration(&self, ast: &Ast) -> Option<DeclId> {
        let t = self.desugar(ast);

        match &t {
            Type::TemplateSpecialization {
                template,
                desugared,
                is_dependent,
                ..
            } => {
                if *is_dependent {
                    match &ast.decl(*template).kind {
                        DeclKind::TypeAliasTemplate { .. } => {
                            return desugared.as_ref()?.ty.try_get_declaration(ast);
                        }
                        DeclKind::ClassTemplate { templated, .. } => {
                            return Some(ast.complete_decl(*templated));
                        }
                        DeclKind::TemplateTemplateParameter { templated } => {
                            return *templated;
                        }
                        _ => {}
                    }
                }
                let inner = desugared.as_ref()?;
                let target = inner.ty.get_final_pointee().unwrap_or(&inner.ty);
                match target {
                    Type::Tag { decl } => Some(*decl),
                    _ => None,
                }
            }
            Type::Tag { decl } => Some(*decl),
            _ => None,
        }
    }

    /// Like [`Type::try_get_declaration`], but additionally re-points the
    /// resolved reference at `replacement`, so that every later resolution
    /// through the same ids observes the new declaration without the
    /// reference sites being revisited.
    pub fn try_get_declaration_rebind(
        &mut self,
        ast: &mut Ast,
        replacement: DeclId,
    ) -> Option<DeclId> {
        let resolved = self.try_get_declaration(ast)?;
        rebind_in_place(self, ast, replacement, DESUGAR_FUEL);
        Some(resolved)
    }

    /// Resolve to a class declaration.
    pub fn try_get_class(&self, ast: &Ast) -> Option<DeclId> {
        self.try_get_declaration(ast).filter(|&d| ast.is_class(d))
    }

    pub fn is_class(&self, ast: &Ast) -> bool {
        self.try_get_class(ast).is_some()
    }

    /// Structural equivalence up to desugaring: qualifiers must match,
    /// pointer chains must match modifier-for-modifier, and the bases must
    /// desugar to equal types.
    pub fn resolves_to(&self, other: &Type, ast: &Ast) -> bool {
        QualifiedType::new(self.clone()).resolves_to(&QualifiedType::new(other.clone()), ast)
    }

    /// Whether the type is a `const char*`-family string (any character
    /// width), excluding references.
    pub fn is_const_char_string(&self, ast: &Ast) -> bool {
        let desugared = self.desugar(ast);
        let Type::Pointer { pointee, modifier } = &desugared else {
            return false;
        };
        if modifier.is_reference() {
            return false;
        }
        let element = pointee.ty.desugar(ast);
        let is_char = matches!(
            element,
            Type::Builtin(
                PrimitiveKind::Char
                    | PrimitiveKind::Char16
                    | PrimitiveKind::Char32
                    | PrimitiveKind::WideChar
            )
        );
        is_char && pointee.qualifiers.is_const
    }

    /// Whether the desugared type depends on a template parameter.
    pub fn is_dependent(&self, ast: &Ast) -> bool {
        match self {
            Type::TemplateParameter { .. }
            | Type::DependentName { .. }
            | Type::DependentTemplateSpecialization { .. }
            | Type::PackExpansion => true,
            Type::TemplateSpecialization { is_dependent, .. } => *is_dependent,
            Type::Tag { decl } => ast.as_class(*decl).is_some_and(|c| c.is_dependent),
            _ => false,
        }
    }

    /// A pointer/reference whose ultimate pointee is dependent but is
    /// neither a specialization nor an injected class name.
    pub fn is_dependent_pointer(&self, ast: &Ast) -> bool {
        let desugared = self.desugar(ast);
        if !desugared.is_address() {
            return false;
        }
        let Some(pointee) = desugared.get_final_pointee() else {
            return false;
        };
        let pointee = pointee.desugar(ast);
        pointee.is_dependent(ast)
            && !matches!(
                pointee,
                Type::TemplateSpecialization { .. } | Type::InjectedClassName { .. }
            )
    }

    /// A template parameter (or substitution), possibly behind pointers.
    pub fn is_template_parameter_type(&self) -> bool {
        match self {
            Type::TemplateParameter { .. } | Type::TemplateParameterSubstitution { .. } => true,
            Type::Pointer { .. } => matches!(
                self.get_final_pointee(),
                Some(Type::TemplateParameter { .. })
                    | Some(Type::TemplateParameterSubstitution { .. })
            ),
            _ => false,
        }
    }

    /// The owning module of the type's ultimate declaration, when that
    /// declaration is inside a namespace whose translation unit belongs to
    /// a module.
    pub fn get_module(&self, ast: &Ast) -> Option<ModuleId> {
        let target = self.get_final_pointee().unwrap_or(self);
        let decl = target.try_get_declaration(ast)?;
        let decl = ast.complete_decl(decl);
        ast.decl(decl).namespace?;
        ast.module_of(decl)
    }

    /// Total size of a constant-length array of primitives, in bits.
    pub fn array_size_in_bits(&self, ast: &Ast) -> Option<u64> {
        match self {
            Type::Array {
                element,
                size: crate::types::ArraySize::Constant(n),
            } => {
                let kind = element.ty.is_primitive_type(ast)?;
                n.checked_mul(kind.size_in_bits()?)
            }
            _ => None,
        }
    }

    pub fn array_size_in_bytes(&self, ast: &Ast) -> Option<u64> {
        self.array_size_in_bits(ast).map(|bits| bits / 8)
    }

    /// `Some(self)` when this is an lvalue reference node.
    pub fn as_lv_reference(&self) -> Option<&Type> {
        matches!(
            self,
            Type::Pointer {
                modifier: PointerModifier::LVReference,
                ..
            }
        )
        .then_some(self)
    }

    /// `Some(self)` when this is a raw pointer node.
    pub fn as_ptr(&self) -> Option<&Type> {
        matches!(
            self,
            Type::Pointer {
                modifier: PointerModifier::Pointer,
                ..
            }
        )
        .then_some(self)
    }

    /// Matches the `T*&` shape where `T` is a class: a reference to a
    /// pointer to class, returning the class type.
    pub fn try_get_reference_to_ptr_to_class(&self, ast: &Ast) -> Option<Type> {
        let desugared = self.desugar(ast);
        let reference = desugared.as_lv_reference()?;
        let pointee = reference.get_pointee()?.desugar_keeping_substitutions(ast);
        let ptr = pointee.as_ptr()?;
        let class = ptr.get_pointee()?;
        class.is_class(ast).then(|| class.clone())
    }
}

impl QualifiedType {
    pub fn resolves_to(&self, other: &QualifiedType, ast: &Ast) -> bool {
        if self.qualifiers != other.qualifiers {
            return false;
        }
        let left = self.ty.desugar(ast);
        let right = other.ty.desugar(ast);
        if let (
            Type::Pointer {
                pointee: left_pointee,
                modifier: left_modifier,
            },
            Type::Pointer {
                pointee: right_pointee,
                modifier: right_modifier,
            },
        ) = (&left, &right)
        {
            return left_modifier == right_modifier
                && left_pointee.resolves_to(right_pointee, ast);
        }
        left == right
    }

    /// Const on the type itself or on its immediate pointee chain.
    pub fn is_const(&self, ast: &Ast) -> bool {
        self.qualifiers.is_const
            || self
                .ty
                .get_qualified_pointee()
                .is_some_and(|pointee| pointee.is_const(ast))
    }

    /// A const-qualified reference, after desugaring.
    pub fn is_const_ref(&self, ast: &Ast) -> bool {
        self.ty.desugar(ast).is_reference() && self.is_const(ast)
    }

    /// A const reference whose ultimate referent is a primitive or enum.
    /// Such parameters are routinely passed by value in generated bindings.
    pub fn is_const_ref_to_primitive(&self, ast: &Ast) -> bool {
        let desugared = self.ty.desugar(ast);
        if !desugared.is_reference() || !self.is_const(ast) {
            return false;
        }
        let Some(pointee) = desugared.get_final_pointee() else {
            return false;
        };
        let pointee = pointee.desugar(ast);
        let pointee = match pointee.get_final_pointee() {
            Some(inner) => inner.desugar(ast),
            None => pointee,
        };
        pointee.is_primitive_type(ast).is_some() || pointee.is_enum_type(ast)
    }

    /// A copy with `const` cleared on the type and, if the type is a
    /// pointer, on its pointee as well. Used when deriving mutable
    /// accessors from const-declared properties.
    pub fn strip_const(&self) -> QualifiedType {
        let mut stripped = self.clone();
        stripped.qualifiers.is_const = false;
        if let Type::Pointer { pointee, .. } = &mut *stripped.ty {
            pointee.qualifiers.is_const = false;
        }
        stripped
    }
}

/// Walk sugar in place (hopping through the arena for typedefs) and
/// re-point the structural node at `replacement`.
fn rebind_in_place(ty: &mut Type, ast: &mut Ast, replacement: DeclId, fuel: usize) {
    if fuel == 0 {
        debug_assert!(false, "rebind fuel exhausted: typedef cycle in front-end input");
        return;
    }

    match ty {
        Type::Tag { decl } => *decl = replacement,
        Type::Typedef { decl } => {
            let typedef = *decl;
            // Take the typedef's underlying type out of the arena, recurse,
            // and put it back; the placeholder is never observable.
            let Some(mut inner) = take_typedef_type(ast, typedef) else {
                return;
            };
            rebind_in_place(&mut inner, ast, replacement, fuel - 1);
            put_typedef_type(ast, typedef, inner);
        }
        Type::TemplateParameterSubstitution {
            replacement: substituted,
        } => rebind_in_place(&mut substituted.ty, ast, replacement, fuel - 1),
        Type::Attributed { equivalent, .. } => {
            rebind_in_place(&mut equivalent.ty, ast, replacement, fuel - 1)
        }
        Type::InjectedClassName {
            injected_specialization: Some(spec),
            ..
        } => rebind_in_place(&mut spec.ty, ast, replacement, fuel - 1),
        Type::TemplateSpecialization {
            template,
            desugared,
            is_dependent,
            ..
        } => {
            if *is_dependent {
                let is_class_template =
                    matches!(ast.decl(*template).kind, DeclKind::ClassTemplate { .. });
                let is_alias_template =
                    matches!(ast.decl(*template).kind, DeclKind::TypeAliasTemplate { .. });
                if is_class_template {
                    ast.rebind_template_target(*template, replacement);
                } else if is_alias_template {
                    if let Some(inner) = desugared {
                        rebind_in_place(&mut inner.ty, ast, replacement, fuel - 1);
                    }
                }
            } else if let Some(inner) = desugared {
                let mut target: &mut Type = &mut inner.ty;
                loop {
                    match target {
                        Type::Pointer { pointee, .. } | Type::MemberPointer { pointee } => {
                            target = &mut pointee.ty;
                        }
                        _ => break,
                    }
                }
                if let Type::Tag { decl } = target {
                    *decl = replacement;
                }
            }
        }
        _ => {}
    }
}

fn take_typedef_type(ast: &mut Ast, typedef: DeclId) -> Option<Type> {
    match &mut ast.decl_mut(typedef).kind {
        DeclKind::Typedef { ty } | DeclKind::TypeAlias { ty } => Some(std::mem::replace(
            &mut *ty.ty,
            Type::Builtin(PrimitiveKind::Void),
        )),
        _ => None,
    }
}

fn put_typedef_type(ast: &mut Ast, typedef: DeclId, inner: Type) {
    if let DeclKind::Typedef { ty } | DeclKind::TypeAlias { ty } =
        &mut ast.decl_mut(typedef).kind
    {
        *ty.ty = inner;
    }
}

/// Queries over specialization declarations used by cleanup passes.
impl Ast {
    /// Whether any argument of a specialization is unsupported for
    /// generation (unresolvable declarations, unsupported types).
    pub fn has_unsupported_template_argument(&self, spec: &ClassTemplateSpecialization) -> bool {
        spec.arguments.iter().any(|arg| match arg {
            crate::types::TemplateArgument::Type(qt) => {
                matches!(qt.ty.desugar(self), Type::Unsupported(_))
            }
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{Ast, Class, Declaration, Enumeration, TagKind};
    use crate::types::{ArraySize, Qualifiers, TemplateArgument};
    use pretty_assertions::assert_eq;

    fn class_decl(ast: &mut Ast, name: &str) -> DeclId {
        ast.alloc(Declaration::new(
            name,
            DeclKind::Class(Class::new(TagKind::Class)),
        ))
    }

    fn enum_decl(ast: &mut Ast, name: &str) -> DeclId {
        ast.alloc(Declaration::new(
            name,
            DeclKind::Enum(Enumeration {
                is_scoped: false,
                is_anonymous: false,
                items: vec![],
            }),
        ))
    }

    fn typedef_decl(ast: &mut Ast, name: &str, ty: Type) -> DeclId {
        ast.alloc(Declaration::new(
            name,
            DeclKind::Typedef {
                ty: QualifiedType::new(ty),
            },
        ))
    }

    #[test]
    fn final_pointee_strips_every_level() {
        let two_levels = Type::int().ptr().ptr();
        assert_eq!(two_levels.get_final_pointee(), Some(&Type::int()));

        let three_levels = Type::int().ptr().ptr().ptr();
        assert_eq!(three_levels.get_final_pointee(), Some(&Type::int()));

        assert_eq!(Type::int().get_final_pointee(), None);
    }

    #[test]
    fn remove_all_pointers_reaches_the_base() {
        let two_levels = Type::int().ptr().ptr();
        assert_eq!(remove_all(&two_levels), &Type::int());

        // No indirection: unchanged.
        assert_eq!(remove_all(&Type::int()), &Type::int());

        // Reference-to-pointer strips both.
        let ref_to_ptr = Type::int().ptr().lv_ref();
        assert_eq!(remove_all(&ref_to_ptr), &Type::int());

        fn remove_all(t: &Type) -> &Type {
            t.remove_all_pointers()
        }
    }

    #[test]
    fn remove_pointer_strips_one_level() {
        let two_levels = Type::int().ptr().ptr();
        assert_eq!(two_levels.remove_pointer(), &Type::int().ptr());
    }

    #[test]
    fn remove_reference_leaves_pointers_alone() {
        assert_eq!(Type::int().lv_ref().remove_reference(), &Type::int());
        let ptr_ref = Type::int().ptr().lv_ref();
        assert_eq!(ptr_ref.remove_reference(), &Type::int().ptr());
        let ptr = Type::int().ptr();
        assert_eq!(ptr.remove_reference(), &ptr);
    }

    #[test]
    fn pointer_classification_excludes_references() {
        assert!(Type::int().ptr().is_pointer());
        assert!(!Type::int().lv_ref().is_pointer());
        assert!(!Type::int().rv_ref().is_pointer());
        assert!(Type::int().lv_ref().is_reference());
        assert!(Type::int().rv_ref().is_reference());
        assert!(Type::int().ptr().is_address());
        assert!(Type::int().lv_ref().is_address());
        assert!(!Type::int().is_address());

        let member = Type::MemberPointer {
            pointee: QualifiedType::new(Type::int()),
        };
        assert!(member.is_pointer());
    }

    #[test]
    fn desugar_is_idempotent() {
        let mut ast = Ast::new();
        let inner = typedef_decl(&mut ast, "myint", Type::int());
        let outer = typedef_decl(&mut ast, "myint2", Type::typedef(inner));
        let ty = Type::typedef(outer);

        let once = ty.desugar(&ast);
        let twice = once.desugar(&ast);
        assert_eq!(once, Type::int());
        assert_eq!(once, twice);
    }

    #[test]
    #[should_panic(expected = "desugar fuel exhausted")]
    fn desugar_catches_typedef_cycles() {
        let mut ast = Ast::new();
        let a = typedef_decl(&mut ast, "a", Type::int());
        let b = typedef_decl(&mut ast, "b", Type::typedef(a));
        if let DeclKind::Typedef { ty } = &mut ast.decl_mut(a).kind {
            *ty = QualifiedType::new(Type::typedef(b));
        }
        Type::typedef(a).desugar(&ast);
    }

    #[test]
    fn desugar_follows_substitutions_and_attributed() {
        let ast = Ast::new();
        let substituted = Type::TemplateParameterSubstitution {
            replacement: QualifiedType::new(Type::int()),
        };
        assert_eq!(substituted.desugar(&ast), Type::int());
        assert_eq!(
            substituted.desugar_keeping_substitutions(&ast),
            substituted
        );

        let attributed = Type::Attributed {
            modified: QualifiedType::new(Type::int()),
            equivalent: QualifiedType::new(Type::char_()),
        };
        assert_eq!(attributed.desugar(&ast), Type::char_());
    }

    #[test]
    fn desugar_synthesizes_tag_for_injected_class_name() {
        let mut ast = Ast::new();
        let class = class_decl(&mut ast, "Widget");
        let injected = Type::InjectedClassName {
            class,
            injected_specialization: None,
        };
        assert_eq!(injected.desugar(&ast), Type::Tag { decl: class });
    }

    #[test]
    fn primitive_queries_see_through_typedefs() {
        let mut ast = Ast::new();
        let alias = typedef_decl(&mut ast, "myint", Type::int());
        let ty = Type::typedef(alias);
        assert_eq!(ty.is_primitive_type(&ast), Some(PrimitiveKind::Int));
        assert!(ty.is_primitive(&ast, PrimitiveKind::Int));
        assert!(!ty.is_primitive(&ast, PrimitiveKind::Bool));
    }

    #[test]
    fn const_ref_to_primitive_matrix() {
        let ast = Ast::new();

        // const int& -> true
        let const_int_ref = QualifiedType::with_qualifiers(Type::int().lv_ref(), Qualifiers::CONST);
        assert!(const_int_ref.is_const_ref_to_primitive(&ast));

        // int& -> false (not const)
        let int_ref = QualifiedType::new(Type::int().lv_ref());
        assert!(!int_ref.is_const_ref_to_primitive(&ast));

        // const int* -> false (not a reference)
        let const_int_ptr = QualifiedType::with_qualifiers(Type::int().ptr(), Qualifiers::CONST);
        assert!(!const_int_ptr.is_const_ref_to_primitive(&ast));
    }

    #[test]
    fn const_ref_to_class_is_not_primitive() {
        let mut ast = Ast::new();
        let class = class_decl(&mut ast, "Foo");
        let const_class_ref =
            QualifiedType::with_qualifiers(Type::tag(class).lv_ref(), Qualifiers::CONST);
        assert!(!const_class_ref.is_const_ref_to_primitive(&ast));
    }

    #[test]
    fn const_ref_to_enum_counts_as_primitive() {
        let mut ast = Ast::new();
        let enumeration = enum_decl(&mut ast, "Color");
        let const_enum_ref =
            QualifiedType::with_qualifiers(Type::tag(enumeration).lv_ref(), Qualifiers::CONST);
        assert!(const_enum_ref.is_const_ref_to_primitive(&ast));
    }

    #[test]
    fn resolves_to_is_reflexive_and_symmetric_for_pointer_chains() {
        let mut ast = Ast::new();
        let a = QualifiedType::new(Type::int().ptr().ptr());
        let b = QualifiedType::new(Type::int().ptr().ptr());
        assert!(a.resolves_to(&b, &ast));
        assert!(b.resolves_to(&a, &ast));
        assert!(a.resolves_to(&a, &ast));

        // Same pointee through a typedef still resolves.
        let alias = typedef_decl(&mut ast, "myint", Type::int());
        let sugared = QualifiedType::new(Type::typedef(alias).ptr().ptr());
        assert!(a.resolves_to(&sugared, &ast));
    }

    #[test]
    fn resolves_to_rejects_modifier_and_qualifier_mismatches() {
        let ast = Ast::new();
        let ptr = QualifiedType::new(Type::int().ptr());
        let reference = QualifiedType::new(Type::int().lv_ref());
        assert!(!ptr.resolves_to(&reference, &ast));

        let const_ptr = QualifiedType::with_qualifiers(Type::int().ptr(), Qualifiers::CONST);
        assert!(!ptr.resolves_to(&const_ptr, &ast));
    }

    #[test]
    fn strip_const_clears_outer_and_pointee_const() {
        // const int* const p
        let qt = QualifiedType::with_qualifiers(Type::int().const_ptr(), Qualifiers::CONST);
        let stripped = qt.strip_const();
        assert!(!stripped.qualifiers.is_const);
        let Type::Pointer { pointee, .. } = &*stripped.ty else {
            panic!("expected pointer");
        };
        assert!(!pointee.qualifiers.is_const);
    }

    #[test]
    fn is_const_sees_pointee_qualifiers() {
        let ast = Ast::new();
        let const_pointee = QualifiedType::new(Type::int().const_ptr());
        assert!(const_pointee.is_const(&ast));
        let plain = QualifiedType::new(Type::int().ptr());
        assert!(!plain.is_const(&ast));
    }

    #[test]
    fn const_char_string_detection() {
        let ast = Ast::new();
        let const_char_ptr = Type::Pointer {
            pointee: QualifiedType::const_(Type::char_()),
            modifier: PointerModifier::Pointer,
        };
        assert!(const_char_ptr.is_const_char_string(&ast));

        let char_ptr = Type::char_().ptr();
        assert!(!char_ptr.is_const_char_string(&ast));

        let const_char_ref = Type::Pointer {
            pointee: QualifiedType::const_(Type::char_()),
            modifier: PointerModifier::LVReference,
        };
        assert!(!const_char_ref.is_const_char_string(&ast));

        let const_int_ptr = Type::Pointer {
            pointee: QualifiedType::const_(Type::int()),
            modifier: PointerModifier::Pointer,
        };
        assert!(!const_int_ptr.is_const_char_string(&ast));
    }

    #[test]
    fn try_get_declaration_resolves_tags_through_sugar() {
        let mut ast = Ast::new();
        let class = class_decl(&mut ast, "Widget");
        let alias = typedef_decl(&mut ast, "widget_t", Type::tag(class));
        assert_eq!(Type::typedef(alias).try_get_declaration(&ast), Some(class));
        assert_eq!(Type::typedef(alias).try_get_class(&ast), Some(class));
        assert!(Type::typedef(alias).is_class(&ast));
        assert_eq!(Type::int().try_get_declaration(&ast), None);
    }

    #[test]
    fn dependent_specialization_resolves_to_templated_class() {
        let mut ast = Ast::new();
        let templated = class_decl(&mut ast, "vector");
        let template = ast.alloc(Declaration::new(
            "vector",
            DeclKind::ClassTemplate {
                templated,
                parameters: vec![],
            },
        ));
        let ty = Type::TemplateSpecialization {
            template,
            arguments: vec![TemplateArgument::Type(QualifiedType::new(Type::char_()))],
            desugared: None,
            is_dependent: true,
        };
        assert_eq!(ty.try_get_declaration(&ast), Some(templated));
    }

    #[test]
    fn dependent_specialization_prefers_complete_declaration() {
        let mut ast = Ast::new();
        let complete = class_decl(&mut ast, "vector");
        let mut forward = Class::new(TagKind::Class);
        forward.complete_decl = Some(complete);
        let templated = ast.alloc(Declaration::new("vector", DeclKind::Class(forward)));
        let template = ast.alloc(Declaration::new(
            "vector",
            DeclKind::ClassTemplate {
                templated,
                parameters: vec![],
            },
        ));
        let ty = Type::TemplateSpecialization {
            template,
            arguments: vec![],
            desugared: None,
            is_dependent: true,
        };
        assert_eq!(ty.try_get_declaration(&ast), Some(complete));
    }

    #[test]
    fn rebind_redirects_later_resolutions() {
        let mut ast = Ast::new();
        let templated = class_decl(&mut ast, "vector");
        let replacement = class_decl(&mut ast, "VectorChar");
        let template = ast.alloc(Declaration::new(
            "vector",
            DeclKind::ClassTemplate {
                templated,
                parameters: vec![],
            },
        ));
        let mut ty = Type::TemplateSpecialization {
            template,
            arguments: vec![TemplateArgument::Type(QualifiedType::new(Type::char_()))],
            desugared: None,
            is_dependent: true,
        };

        // The rebinding call itself still resolves the old declaration.
        assert_eq!(
            ty.try_get_declaration_rebind(&mut ast, replacement),
            Some(templated)
        );

        // A second, independent reference to the same template now sees the
        // replacement without having been touched.
        let other_site = Type::TemplateSpecialization {
            template,
            arguments: vec![TemplateArgument::Type(QualifiedType::new(Type::int()))],
            desugared: None,
            is_dependent: true,
        };
        assert_eq!(other_site.try_get_declaration(&ast), Some(replacement));
    }

    #[test]
    fn rebind_rewrites_tag_occurrences() {
        let mut ast = Ast::new();
        let old = class_decl(&mut ast, "Old");
        let new = class_decl(&mut ast, "New");
        let mut ty = Type::tag(old);
        assert_eq!(ty.try_get_declaration_rebind(&mut ast, new), Some(old));
        assert_eq!(ty, Type::tag(new));
    }

    #[test]
    fn rebind_reaches_tags_behind_typedefs() {
        let mut ast = Ast::new();
        let old = class_decl(&mut ast, "Old");
        let new = class_decl(&mut ast, "New");
        let alias = typedef_decl(&mut ast, "old_t", Type::tag(old));
        let mut ty = Type::typedef(alias);
        assert_eq!(ty.try_get_declaration_rebind(&mut ast, new), Some(old));
        // The typedef's underlying type in the arena now points at the
        // replacement, so every holder of the typedef observes it.
        assert_eq!(Type::typedef(alias).try_get_declaration(&ast), Some(new));
    }

    #[test]
    fn skip_pointer_refs_stops_at_first_non_reference() {
        let mut ast = Ast::new();
        let alias = typedef_decl(&mut ast, "intref", Type::int().lv_ref());

        // int& & chains collapse to int.
        assert_eq!(Type::int().lv_ref().skip_pointer_refs(&ast), Type::int());
        // Pointers stop the walk.
        let ptr_ref = Type::int().ptr().lv_ref();
        assert_eq!(ptr_ref.skip_pointer_refs(&ast), Type::int().ptr());
        // Desugaring happens between levels.
        let ref_of_alias = Type::typedef(alias).lv_ref();
        assert_eq!(ref_of_alias.skip_pointer_refs(&ast), Type::int());
    }

    #[test]
    fn reference_to_ptr_to_class_shape() {
        let mut ast = Ast::new();
        let class = class_decl(&mut ast, "Widget");
        let shape = Type::tag(class).ptr().lv_ref();
        assert_eq!(
            shape.try_get_reference_to_ptr_to_class(&ast),
            Some(Type::tag(class))
        );
        assert_eq!(
            Type::int().ptr().lv_ref().try_get_reference_to_ptr_to_class(&ast),
            None
        );
        assert_eq!(
            Type::tag(class).ptr().try_get_reference_to_ptr_to_class(&ast),
            None
        );
    }

    #[test]
    fn array_sizes_for_constant_primitive_arrays() {
        let ast = Ast::new();
        let arr = Type::int().array_of(4);
        assert_eq!(arr.array_size_in_bits(&ast), Some(128));
        assert_eq!(arr.array_size_in_bytes(&ast), Some(16));

        let incomplete = Type::Array {
            element: QualifiedType::new(Type::int()),
            size: ArraySize::Incomplete,
        };
        assert_eq!(incomplete.array_size_in_bits(&ast), None);

        // A length whose bit count exceeds u64 stays a total query.
        let oversized = Type::int().array_of(u64::MAX);
        assert_eq!(oversized.array_size_in_bits(&ast), None);
    }

    #[test]
    fn template_parameter_detection_behind_pointers() {
        let mut ast = Ast::new();
        let param = ast.alloc(Declaration::new(
            "T",
            DeclKind::TypeTemplateParameter {
                default_argument: None,
            },
        ));
        let direct = Type::TemplateParameter { decl: param };
        assert!(direct.is_template_parameter_type());
        assert!(direct.clone().ptr().is_template_parameter_type());
        assert!(!Type::int().ptr().is_template_parameter_type());
    }

    #[test]
    fn get_module_requires_namespace_and_module() {
        let mut ast = Ast::new();
        let module = ast.alloc_module(crate::decl::Module {
            name: "Core".into(),
            output_namespace: None,
        });
        let unit = ast.alloc(Declaration::new(
            "core.h",
            DeclKind::TranslationUnit {
                is_system_header: false,
                is_valid: true,
                module: Some(module),
            },
        ));
        let ns = ast.alloc(
            Declaration::new("core", DeclKind::Namespace { is_inline: false }).in_namespace(unit),
        );
        let class = ast.alloc(
            Declaration::new("Widget", DeclKind::Class(Class::new(TagKind::Class)))
                .in_namespace(ns),
        );
        assert_eq!(Type::tag(class).get_module(&ast), Some(module));
        // Pointers resolve through the final pointee.
        assert_eq!(Type::tag(class).ptr().get_module(&ast), Some(module));

        // A declaration with no enclosing scope has no module.
        let orphan = class_decl(&mut ast, "Orphan");
        assert_eq!(Type::tag(orphan).get_module(&ast), None);
    }
}
