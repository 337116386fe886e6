//! Declarations and the arena that owns them.
//!
//! A declaration is owned by its enclosing namespace or translation unit;
//! everything else holds a non-owning [`DeclId`] into the [`Ast`] arena.
//! Because references are indices, the narrow rebind operations on [`Ast`]
//! are observed by every existing reference site.

use crate::types::{QualifiedType, TemplateArgument, Type};
use smol_str::SmolStr;

/// A non-owning reference to a declaration in the [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(u32);

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A non-owning reference to an output module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(u32);

/// An output module a translation unit can belong to.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: SmolStr,
    /// The namespace generated bindings are placed in, if overridden.
    pub output_namespace: Option<SmolStr>,
}

/// Whether and how a declaration participates in generation. Set by the
/// cleanup passes, consumed by the generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationKind {
    #[default]
    Generate,
    /// Generated with internal linkage only (needed for marshaling).
    Internal,
    /// Only linked against, not generated.
    Link,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Struct,
    Class,
    Union,
    Interface,
    Enum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefQualifier {
    #[default]
    None,
    LValue,
    RValue,
}

/// C++ operator kinds relevant to name synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatorKind {
    #[default]
    None,
    Plus,
    Minus,
    Star,
    Slash,
    Equal,
    EqualEqual,
    ExclaimEqual,
    Less,
    Greater,
    Subscript,
    Call,
    Conversion,
    ExplicitConversion,
}

impl OperatorKind {
    /// The identifier fragment used for `operator_<kind>` synthesis under
    /// C-style output.
    pub fn identifier(self) -> &'static str {
        match self {
            OperatorKind::None => "",
            OperatorKind::Plus => "Plus",
            OperatorKind::Minus => "Minus",
            OperatorKind::Star => "Star",
            OperatorKind::Slash => "Slash",
            OperatorKind::Equal => "Equal",
            OperatorKind::EqualEqual => "EqualEqual",
            OperatorKind::ExclaimEqual => "ExclaimEqual",
            OperatorKind::Less => "Less",
            OperatorKind::Greater => "Greater",
            OperatorKind::Subscript => "Subscript",
            OperatorKind::Call => "Call",
            OperatorKind::Conversion => "Conversion",
            OperatorKind::ExplicitConversion => "ExplicitConversion",
        }
    }

    pub fn is_conversion(self) -> bool {
        matches!(
            self,
            OperatorKind::Conversion | OperatorKind::ExplicitConversion
        )
    }
}

/// A minimal constant-expression tree for default arguments.
///
/// The front-end resolves most default arguments down to literals; anything
/// it could not evaluate arrives as [`Expr::Unevaluable`], which printers
/// treat as a soft, per-parameter failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntegerLiteral(i64),
    FloatLiteral(f64),
    BoolLiteral(bool),
    StringLiteral(SmolStr),
    NullPtr,
    DeclRef(DeclId),
    Call { callee: DeclId, args: Vec<Expr> },
    Unevaluable(SmolStr),
}

/// A class, struct, union, or interface.
#[derive(Debug, Clone)]
pub struct Class {
    pub tag_kind: TagKind,
    pub is_dependent: bool,
    /// Set on a forward declaration to point at the complete definition.
    pub complete_decl: Option<DeclId>,
    pub bases: Vec<DeclId>,
    /// Materialized specializations, when this is a templated class.
    pub specializations: Vec<DeclId>,
}

impl Class {
    pub fn new(tag_kind: TagKind) -> Self {
        Self {
            tag_kind,
            is_dependent: false,
            complete_decl: None,
            bases: Vec::new(),
            specializations: Vec::new(),
        }
    }
}

/// An enumeration declaration.
#[derive(Debug, Clone)]
pub struct Enumeration {
    pub is_scoped: bool,
    pub is_anonymous: bool,
    pub items: Vec<DeclId>,
}

/// A function declaration.
#[derive(Debug, Clone)]
pub struct Function {
    pub return_type: QualifiedType,
    pub parameters: Vec<DeclId>,
    pub is_variadic: bool,
    pub is_inline: bool,
    pub is_constexpr: bool,
    pub is_deleted: bool,
    pub operator_kind: OperatorKind,
    /// The function's own type as classified by the front-end; may be a
    /// pointer-to-function wrapper for some declarations.
    pub function_type: Option<QualifiedType>,
}

impl Function {
    pub fn new(return_type: QualifiedType) -> Self {
        Self {
            return_type,
            parameters: Vec::new(),
            is_variadic: false,
            is_inline: false,
            is_constexpr: false,
            is_deleted: false,
            operator_kind: OperatorKind::None,
            function_type: None,
        }
    }

    pub fn is_operator(&self) -> bool {
        self.operator_kind != OperatorKind::None
    }
}

/// A method declaration; carries the function fields plus member-function
/// decorations.
#[derive(Debug, Clone)]
pub struct Method {
    pub function: Function,
    pub is_virtual: bool,
    pub is_const: bool,
    pub is_constructor: bool,
    pub is_destructor: bool,
    pub is_override: bool,
    pub is_final: bool,
    pub ref_qualifier: RefQualifier,
}

impl Method {
    pub fn new(function: Function) -> Self {
        Self {
            function,
            is_virtual: false,
            is_const: false,
            is_constructor: false,
            is_destructor: false,
            is_override: false,
            is_final: false,
            ref_qualifier: RefQualifier::None,
        }
    }
}

/// A function or method parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub ty: QualifiedType,
    pub default_argument: Option<Expr>,
    pub index: u32,
}

/// A concrete instantiation of a class template.
#[derive(Debug, Clone)]
pub struct ClassTemplateSpecialization {
    pub class: Class,
    pub template: DeclId,
    pub arguments: Vec<TemplateArgument>,
}

/// The kind-specific payload of a declaration.
#[derive(Debug, Clone)]
pub enum DeclKind {
    TranslationUnit {
        is_system_header: bool,
        is_valid: bool,
        module: Option<ModuleId>,
    },
    Namespace {
        is_inline: bool,
    },
    Class(Class),
    ClassTemplateSpecialization(ClassTemplateSpecialization),
    Enum(Enumeration),
    EnumItem {
        value: i64,
    },
    Function(Function),
    Method(Method),
    Parameter(Parameter),
    Field {
        ty: QualifiedType,
    },
    Property {
        ty: QualifiedType,
    },
    Variable {
        ty: QualifiedType,
    },
    Typedef {
        ty: QualifiedType,
    },
    TypeAlias {
        ty: QualifiedType,
    },
    ClassTemplate {
        templated: DeclId,
        parameters: Vec<DeclId>,
    },
    TypeAliasTemplate {
        templated: DeclId,
        parameters: Vec<DeclId>,
    },
    FunctionTemplate {
        templated: DeclId,
        parameters: Vec<DeclId>,
    },
    FunctionTemplateSpecialization {
        template: DeclId,
    },
    VarTemplate {
        templated: DeclId,
        parameters: Vec<DeclId>,
    },
    VarTemplateSpecialization {
        template: DeclId,
    },
    TypeTemplateParameter {
        default_argument: Option<QualifiedType>,
    },
    NonTypeTemplateParameter {
        default_value: Option<i64>,
    },
    TemplateTemplateParameter {
        templated: Option<DeclId>,
    },
    Friend {
        declaration: Option<DeclId>,
    },
    MacroDefinition {
        expression: SmolStr,
    },
}

/// A declaration node. Common fields first, kind payload last.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// The possibly-renamed output name.
    pub name: SmolStr,
    /// The name as spelled in the source header.
    pub original_name: SmolStr,
    /// The enclosing namespace, class, or translation unit.
    pub namespace: Option<DeclId>,
    pub is_ignored: bool,
    pub generation: GenerationKind,
    pub kind: DeclKind,
}

impl Declaration {
    pub fn new(name: impl Into<SmolStr>, kind: DeclKind) -> Self {
        let name = name.into();
        Self {
            original_name: name.clone(),
            name,
            namespace: None,
            is_ignored: false,
            generation: GenerationKind::Generate,
            kind,
        }
    }

    pub fn renamed(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = name.into();
        self
    }

    pub fn in_namespace(mut self, namespace: DeclId) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Mark as explicitly excluded from generation.
    pub fn explicitly_ignore(&mut self) {
        self.is_ignored = true;
        self.generation = GenerationKind::None;
    }
}

/// The arena owning every declaration of a generation run.
#[derive(Debug, Default)]
pub struct Ast {
    decls: Vec<Declaration>,
    modules: Vec<Module>,
    translation_units: Vec<DeclId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        let is_unit = matches!(decl.kind, DeclKind::TranslationUnit { .. });
        self.decls.push(decl);
        if is_unit {
            self.translation_units.push(id);
        }
        id
    }

    pub fn alloc_module(&mut self, module: Module) -> ModuleId {
        let id = ModuleId(self.modules.len() as u32);
        self.modules.push(module);
        id
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.index()]
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0 as usize]
    }

    pub fn translation_units(&self) -> &[DeclId] {
        &self.translation_units
    }

    pub fn decl_ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        (0..self.decls.len() as u32).map(DeclId)
    }

    /// Follow a forward declaration to its complete definition, if any.
    pub fn complete_decl(&self, id: DeclId) -> DeclId {
        match &self.decl(id).kind {
            DeclKind::Class(class)
            | DeclKind::ClassTemplateSpecialization(ClassTemplateSpecialization {
                class, ..
            }) => class.complete_decl.unwrap_or(id),
            _ => id,
        }
    }

    /// The class payload of a class or specialization declaration.
    pub fn as_class(&self, id: DeclId) -> Option<&Class> {
        match &self.decl(id).kind {
            DeclKind::Class(class) => Some(class),
            DeclKind::ClassTemplateSpecialization(spec) => Some(&spec.class),
            _ => None,
        }
    }

    pub fn is_enum(&self, id: DeclId) -> bool {
        matches!(self.decl(id).kind, DeclKind::Enum(_))
    }

    pub fn is_class(&self, id: DeclId) -> bool {
        self.as_class(id).is_some()
    }

    /// Walk up the namespace chain to the owning translation unit.
    pub fn translation_unit_of(&self, id: DeclId) -> Option<DeclId> {
        let mut current = id;
        loop {
            if matches!(self.decl(current).kind, DeclKind::TranslationUnit { .. }) {
                return Some(current);
            }
            current = self.decl(current).namespace?;
        }
    }

    /// The output module a declaration ultimately belongs to.
    pub fn module_of(&self, id: DeclId) -> Option<ModuleId> {
        let unit = self.translation_unit_of(id)?;
        match self.decl(unit).kind {
            DeclKind::TranslationUnit { module, .. } => module,
            _ => None,
        }
    }

    /// Whether the declaration lives in a system header.
    pub fn is_in_system_header(&self, id: DeclId) -> bool {
        self.translation_unit_of(id)
            .map(|unit| match self.decl(unit).kind {
                DeclKind::TranslationUnit {
                    is_system_header, ..
                } => is_system_header,
                _ => false,
            })
            .unwrap_or(false)
    }

    fn qualified(&self, id: DeclId, pick: impl Fn(&Declaration) -> &SmolStr) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let decl = self.decl(cur);
            // Translation units and anonymous scopes contribute no name.
            if !matches!(decl.kind, DeclKind::TranslationUnit { .. }) && !pick(decl).is_empty() {
                parts.push(pick(decl));
            }
            current = decl.namespace;
        }
        parts.reverse();
        parts.join("::")
    }

    /// The `::`-joined output name including enclosing scopes.
    pub fn qualified_name(&self, id: DeclId) -> String {
        self.qualified(id, |d| &d.name)
    }

    /// The `::`-joined source name including enclosing scopes.
    pub fn qualified_original_name(&self, id: DeclId) -> String {
        self.qualified(id, |d| &d.original_name)
    }

    /// Resolve a specialization type to its materialized specialization
    /// declaration by matching the argument list against the template's
    /// recorded specializations.
    pub fn get_class_template_specialization(&self, ty: &Type) -> Option<DeclId> {
        let Type::TemplateSpecialization {
            template,
            arguments,
            ..
        } = ty
        else {
            return None;
        };
        let templated = match &self.decl(*template).kind {
            DeclKind::ClassTemplate { templated, .. } => *templated,
            _ => return None,
        };
        let class = self.as_class(templated)?;
        class
            .specializations
            .iter()
            .copied()
            .find(|&spec| match &self.decl(spec).kind {
                DeclKind::ClassTemplateSpecialization(s) => &s.arguments == arguments,
                _ => false,
            })
    }

    /// Re-point a class template's templated declaration.
    ///
    /// Every `TemplateSpecialization` type holding the template's id
    /// observes the new target on its next resolution; reference sites are
    /// not revisited.
    pub fn rebind_template_target(&mut self, template: DeclId, replacement: DeclId) {
        match &mut self.decl_mut(template).kind {
            DeclKind::ClassTemplate { templated, .. }
            | DeclKind::TypeAliasTemplate { templated, .. }
            | DeclKind::FunctionTemplate { templated, .. }
            | DeclKind::VarTemplate { templated, .. } => *templated = replacement,
            _ => {}
        }
    }

    /// Whether a scope contains a typedef with the given name. Used to
    /// suppress tag keywords for `typedef struct X X;` patterns.
    pub fn scope_has_typedef_named(&self, scope: Option<DeclId>, name: &str) -> bool {
        self.decl_ids().any(|id| {
            let decl = self.decl(id);
            decl.namespace == scope
                && matches!(decl.kind, DeclKind::Typedef { .. } | DeclKind::TypeAlias { .. })
                && decl.name == name
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    fn int_qt() -> QualifiedType {
        QualifiedType::new(Type::Builtin(PrimitiveKind::Int))
    }

    #[test]
    fn qualified_names_walk_scopes() {
        let mut ast = Ast::new();
        let unit = ast.alloc(Declaration::new(
            "test.h",
            DeclKind::TranslationUnit {
                is_system_header: false,
                is_valid: true,
                module: None,
            },
        ));
        let ns = ast.alloc(
            Declaration::new("outer", DeclKind::Namespace { is_inline: false }).in_namespace(unit),
        );
        let class = ast.alloc(
            Declaration::new("Widget", DeclKind::Class(Class::new(TagKind::Class)))
                .in_namespace(ns),
        );
        assert_eq!(ast.qualified_name(class), "outer::Widget");
        assert_eq!(ast.qualified_original_name(class), "outer::Widget");
    }

    #[test]
    fn renamed_decl_keeps_original_name() {
        let mut ast = Ast::new();
        let class = ast.alloc(
            Declaration::new("widget_t", DeclKind::Class(Class::new(TagKind::Struct)))
                .renamed("Widget"),
        );
        assert_eq!(ast.decl(class).name, "Widget");
        assert_eq!(ast.decl(class).original_name, "widget_t");
    }

    #[test]
    fn complete_decl_redirects_forward_declarations() {
        let mut ast = Ast::new();
        let complete = ast.alloc(Declaration::new(
            "Widget",
            DeclKind::Class(Class::new(TagKind::Class)),
        ));
        let mut forward = Class::new(TagKind::Class);
        forward.complete_decl = Some(complete);
        let fwd = ast.alloc(Declaration::new("Widget", DeclKind::Class(forward)));
        assert_eq!(ast.complete_decl(fwd), complete);
        assert_eq!(ast.complete_decl(complete), complete);
    }

    #[test]
    fn rebind_template_target_is_observed_by_id_holders() {
        let mut ast = Ast::new();
        let old_class = ast.alloc(Declaration::new(
            "vector",
            DeclKind::Class(Class::new(TagKind::Class)),
        ));
        let new_class = ast.alloc(Declaration::new(
            "VectorChar",
            DeclKind::Class(Class::new(TagKind::Class)),
        ));
        let template = ast.alloc(Declaration::new(
            "vector",
            DeclKind::ClassTemplate {
                templated: old_class,
                parameters: vec![],
            },
        ));

        ast.rebind_template_target(template, new_class);
        match &ast.decl(template).kind {
            DeclKind::ClassTemplate { templated, .. } => assert_eq!(*templated, new_class),
            _ => unreachable!(),
        }
    }

    #[test]
    fn module_of_resolves_through_translation_unit() {
        let mut ast = Ast::new();
        let module = ast.alloc_module(Module {
            name: "Core".into(),
            output_namespace: Some("Core".into()),
        });
        let unit = ast.alloc(Declaration::new(
            "core.h",
            DeclKind::TranslationUnit {
                is_system_header: false,
                is_valid: true,
                module: Some(module),
            },
        ));
        let func = ast.alloc(
            Declaration::new("frob", DeclKind::Function(Function::new(int_qt())))
                .in_namespace(unit),
        );
        assert_eq!(ast.module_of(func), Some(module));
    }
}
