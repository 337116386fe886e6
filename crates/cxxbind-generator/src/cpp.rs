//! The C/C++/Objective-C flavored type and declaration printer.
//!
//! One match arm per type variant and per declaration kind. Recursion is
//! plain call/return; the ambient scope/context travels as a
//! [`PrintContext`] value. Type-map overrides are consulted before
//! structural printing on tag and pointer visits.

use crate::context::{ContextKind, GeneratorKind, PrintContext, ScopeKind};
use crate::error::PrinterError;
use crate::expr::ExpressionPrinter;
use crate::result::TypePrinterResult;
use crate::strings::{append_join_if_needed, join_if_needed};
use crate::typemap::{TypeMapDatabase, TypePrinterContext};
use cxxbind_ast::{
    ArraySize, Ast, CallingConvention, DeclId, DeclKind, ExceptionSpecKind, OperatorKind,
    PointerModifier, PrimitiveKind, QualifiedType, Qualifiers, QualifiersMode, RefQualifier,
    TagKind, TemplateArgument, Type,
};
use cxxbind_common::Diagnostics;
use smol_str::SmolStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CppTypePrintFlavor {
    C,
    #[default]
    Cpp,
    ObjC,
}

#[derive(Clone, Copy)]
pub struct CppTypePrinter<'a> {
    ast: &'a Ast,
    type_maps: &'a TypeMapDatabase,
    diagnostics: &'a Diagnostics,
    pub flavor: CppTypePrintFlavor,
    pub print_type_qualifiers: bool,
    pub print_type_modifiers: bool,
    pub print_tags: bool,
    pub print_variable_arrays_as_pointers: bool,
    pub resolve_type_maps: bool,
    pub resolve_typedefs: bool,
    /// Qualification of function/method names, independent of the general
    /// scope carried by the context.
    pub method_scope: ScopeKind,
    pub generate_default_values: bool,
    /// Dialect tag stamped on produced results.
    pub generator: GeneratorKind,
}

impl<'a> CppTypePrinter<'a> {
    pub fn new(
        ast: &'a Ast,
        type_maps: &'a TypeMapDatabase,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            ast,
            type_maps,
            diagnostics,
            flavor: CppTypePrintFlavor::Cpp,
            print_type_qualifiers: true,
            print_type_modifiers: true,
            print_tags: false,
            print_variable_arrays_as_pointers: false,
            resolve_type_maps: true,
            resolve_typedefs: false,
            method_scope: ScopeKind::Qualified,
            generate_default_values: true,
            generator: GeneratorKind::Cpp,
        }
    }

    pub fn root_context(&self) -> PrintContext {
        PrintContext::native()
    }

    /// Render a bare type to its spelling.
    pub fn print(&self, ty: &Type) -> Result<String, PrinterError> {
        Ok(self
            .visit_type(ty, Qualifiers::NONE, self.root_context())?
            .to_string())
    }

    pub fn print_qualified(&self, ty: &QualifiedType) -> Result<String, PrinterError> {
        Ok(self.visit_qualified(ty, self.root_context())?.to_string())
    }

    /// Render a qualified type as a declarator for `name`, e.g.
    /// `int (*x)[3]`.
    pub fn print_declarator(&self, ty: &QualifiedType, name: &str) -> Result<String, PrinterError> {
        let mut result = self.visit_qualified(ty, self.root_context())?;
        result.name = name.to_string();
        Ok(result.to_string())
    }

    pub fn print_decl(&self, id: DeclId) -> Result<String, PrinterError> {
        Ok(self.visit_decl(id, self.root_context())?.to_string())
    }

    fn plain(&self, ty: impl Into<String>) -> TypePrinterResult {
        TypePrinterResult {
            ty: ty.into(),
            kind: self.generator,
            ..TypePrinterResult::default()
        }
    }

    fn empty(&self) -> TypePrinterResult {
        self.plain("")
    }

    // -- type visits --------------------------------------------------

    pub fn visit_qualified(
        &self,
        ty: &QualifiedType,
        ctx: PrintContext,
    ) -> Result<TypePrinterResult, PrinterError> {
        // A native-mode qualified type forces original-name selection no
        // matter the ambient context.
        let ctx = if ty.mode == QualifiersMode::Native {
            ctx.with_context(ContextKind::Native)
        } else {
            ctx
        };
        self.visit_type(&ty.ty, ty.qualifiers, ctx)
    }

    pub fn visit_type(
        &self,
        ty: &Type,
        quals: Qualifiers,
        ctx: PrintContext,
    ) -> Result<TypePrinterResult, PrinterError> {
        match ty {
            Type::Builtin(kind) => Ok(self.plain(join_if_needed(
                &self.qualifiers_spelling(quals),
                ' ',
                self.primitive_spelling(*kind),
            ))),

            Type::Pointer { pointee, modifier } => {
                self.visit_pointer(ty, pointee, *modifier, quals, ctx)
            }

            Type::MemberPointer { .. } => Ok(self.empty()),

            Type::Array { element, size } => {
                let suffix = match size {
                    ArraySize::Constant(n) => format!("[{n}]"),
                    ArraySize::Variable | ArraySize::Dependent | ArraySize::Incomplete => {
                        if self.print_variable_arrays_as_pointers {
                            "*".to_string()
                        } else {
                            "[]".to_string()
                        }
                    }
                };
                let mut result =
                    self.plain(self.visit_type(&element.ty, Qualifiers::NONE, ctx)?.to_string());
                result.type_modifiers = suffix;
                Ok(result)
            }

            Type::Tag { decl } => {
                if let Some(mapped) = self.find_type_map(ty, ctx)? {
                    return Ok(mapped);
                }
                let mut result = self.plain(self.visit_decl(*decl, ctx)?.to_string());
                result.type_qualifiers = self.qualifiers_spelling(quals);
                Ok(result)
            }

            Type::Typedef { decl } => self.visit_typedef_type(*decl, quals, ctx),

            Type::TemplateParameter { decl } => {
                Ok(self.plain(self.ast.decl(*decl).name.to_string()))
            }

            Type::TemplateParameterSubstitution { replacement } => {
                self.visit_type(&replacement.ty, quals, ctx)
            }

            Type::TemplateSpecialization { .. } => {
                match self.ast.get_class_template_specialization(ty) {
                    Some(specialization) => {
                        let mut result = self
                            .plain(self.visit_class_template_specialization(specialization, ctx)?);
                        result.type_qualifiers = self.qualifiers_spelling(quals);
                        Ok(result)
                    }
                    None => Ok(self.empty()),
                }
            }

            Type::DependentTemplateSpecialization { desugared } => match desugared {
                Some(inner) => self.visit_qualified(inner, ctx),
                None => Ok(self.empty()),
            },

            Type::InjectedClassName { class, .. } => self.visit_class(*class, ctx, self.print_tags),

            Type::Attributed { modified, .. } => self.visit_qualified(modified, ctx),

            Type::Decayed { decayed } => self.visit_qualified(decayed, ctx),

            Type::DependentName { qualifier } => match qualifier {
                Some(inner) => Ok(self.plain(self.visit_qualified(inner, ctx)?.ty)),
                None => Ok(self.empty()),
            },

            Type::UnaryTransform { desugared, base } => match desugared {
                Some(inner) => self.visit_qualified(inner, ctx),
                None => self.visit_qualified(base, ctx),
            },

            Type::PackExpansion => Ok(self.empty()),

            Type::Vector { .. } => Err(PrinterError::unsupported("vector type")),

            Type::Unsupported(description) => Ok(self.plain(description.to_string())),

            Type::Function {
                return_type,
                parameters,
                calling_convention,
                ..
            } => {
                let args = self.visit_parameter_list(parameters, false, ctx)?;
                let return_type = self.visit_qualified(return_type, ctx)?;
                let convention = match calling_convention {
                    CallingConvention::Default | CallingConvention::C => "",
                    CallingConvention::StdCall => "__stdcall ",
                    CallingConvention::ThisCall => "__thiscall ",
                    CallingConvention::FastCall => "__fastcall ",
                };
                Ok(self.plain(format!("{return_type} ({convention}{{0}})({args})")))
            }
        }
    }

    fn visit_pointer(
        &self,
        ty: &Type,
        pointee: &QualifiedType,
        modifier: PointerModifier,
        quals: Qualifiers,
        ctx: PrintContext,
    ) -> Result<TypePrinterResult, PrinterError> {
        if let Some(mapped) = self.find_type_map(ty, ctx)? {
            return Ok(mapped);
        }

        let mut result = self.visit_type(&pointee.ty, pointee.qualifiers, ctx)?;
        if result.type_map.is_some() {
            return Ok(result);
        }

        let modifier_spelling = if self.print_type_modifiers {
            modifier_spelling(modifier)
        } else {
            ""
        };

        let is_array = matches!(&*pointee.ty, Type::Array { .. });
        if is_array && pointee.qualifiers.is_const {
            result.ty = format!("const {}", result.ty);
        }

        // A pointer or reference to an array binds tighter than the array
        // suffix; the declarator needs parens: `int (*x)[3]`, `int (&x)[3]`.
        if is_array {
            result.name_prefix.push('(');
        }
        result.name_prefix.push_str(modifier_spelling);
        if is_array {
            let relocated = std::mem::take(&mut result.type_modifiers);
            result.name_suffix.insert_str(0, &format!("){relocated}"));
        }

        let quals_spelling = self.qualifiers_spelling(quals);
        if !quals_spelling.is_empty() {
            append_join_if_needed(&mut result.name_prefix, ' ', [quals_spelling.as_str()]);
            result.name_prefix.push(' ');
        }

        Ok(result)
    }

    fn visit_typedef_type(
        &self,
        decl: DeclId,
        quals: Qualifiers,
        ctx: PrintContext,
    ) -> Result<TypePrinterResult, PrinterError> {
        let underlying = match &self.ast.decl(decl).kind {
            DeclKind::Typedef { ty } | DeclKind::TypeAlias { ty } => Some(ty),
            _ => None,
        };

        // Function-pointer typedefs keep their name even when resolving;
        // the resolved form would need a declarator the caller cannot place.
        if self.resolve_typedefs {
            if let Some(underlying) = underlying {
                if !is_pointer_to_function(&underlying.ty, self.ast) {
                    let mut result = self.visit_qualified(underlying, ctx)?;
                    result.ty =
                        join_if_needed(&self.qualifiers_spelling(quals), ' ', &result.ty);
                    return Ok(result);
                }
            }
        }

        let mut result = self.visit_typedef_decl(decl, ctx)?;
        if !result.name_prefix.is_empty() {
            append_join_if_needed(
                &mut result.name_prefix,
                ' ',
                [self.qualifiers_spelling(quals).as_str()],
            );
        }
        Ok(result)
    }

    fn find_type_map(
        &self,
        ty: &Type,
        ctx: PrintContext,
    ) -> Result<Option<TypePrinterResult>, PrinterError> {
        if !self.resolve_type_maps {
            return Ok(None);
        }
        let Some((id, map)) = self.type_maps.find_type_map(self.ast, ty) else {
            return Ok(None);
        };
        if map.is_ignored() {
            return Ok(None);
        }

        let printer_context = TypePrinterContext {
            ty,
            kind: ctx.context,
            marshal: ctx.marshal,
        };
        let Some(signature) = map.signature_type(&printer_context) else {
            return Ok(None);
        };

        // Structural printing of the mapped signature, with maps disabled
        // so a map cannot recurse into itself.
        let mut nested = *self;
        nested.resolve_type_maps = false;
        let rendered = nested.visit_qualified(&signature, ctx)?;

        let mut result = self.plain(rendered.to_string());
        result.type_map = Some(id);
        Ok(Some(result))
    }

    // -- declaration visits -------------------------------------------

    pub fn visit_decl(
        &self,
        id: DeclId,
        ctx: PrintContext,
    ) -> Result<TypePrinterResult, PrinterError> {
        match &self.ast.decl(id).kind {
            DeclKind::Class(_) => self.visit_class(id, ctx, self.print_tags),

            DeclKind::ClassTemplateSpecialization(_) => {
                Ok(self.plain(self.visit_class_template_specialization(id, ctx)?))
            }

            DeclKind::ClassTemplate { templated, .. } => {
                // Printing through the templated target means a rebound
                // template immediately renders its replacement.
                let target = self.ast.complete_decl(*templated);
                Ok(self.plain(self.get_decl_name(target, ctx.scope, ctx)?))
            }

            DeclKind::Typedef { .. } => self.visit_typedef_decl(id, ctx),

            // Anonymous enumerations never print as named tags.
            DeclKind::Enum(enumeration)
                if enumeration.is_anonymous || self.ast.decl(id).name.is_empty() =>
            {
                Ok(self.empty())
            }

            DeclKind::Function(_) => self.visit_function(id, ctx),
            DeclKind::Method(_) => self.visit_method(id, ctx),
            DeclKind::Parameter(_) => self.visit_parameter(id, false, ctx),

            DeclKind::Variable { ty } => {
                let rendered = self.visit_qualified(ty, ctx)?;
                Ok(self.plain(format!(
                    "{} {}",
                    rendered,
                    self.get_decl_name(id, ctx.scope, ctx)?
                )))
            }

            DeclKind::TypeTemplateParameter { default_argument } => {
                let name = self.ast.decl(id).name.to_string();
                match default_argument {
                    Some(default) => Ok(self.plain(format!(
                        "{} = {}",
                        name,
                        self.visit_qualified(default, ctx)?
                    ))),
                    None => Ok(self.plain(name)),
                }
            }

            DeclKind::NonTypeTemplateParameter { default_value } => {
                let name = self.ast.decl(id).name.to_string();
                match default_value {
                    Some(value) => Ok(self.plain(format!("{name} = {value}"))),
                    None => Ok(self.plain(name)),
                }
            }

            DeclKind::TemplateTemplateParameter { .. } => {
                Ok(self.plain(self.ast.decl(id).name.to_string()))
            }

            DeclKind::FunctionTemplateSpecialization { .. } => {
                Err(PrinterError::unsupported("function template specialization"))
            }
            DeclKind::Friend { .. } => Err(PrinterError::unsupported("friend declaration")),
            DeclKind::MacroDefinition { .. } => {
                Err(PrinterError::unsupported("macro definition"))
            }

            DeclKind::TranslationUnit { .. }
            | DeclKind::Namespace { .. }
            | DeclKind::Enum(_)
            | DeclKind::EnumItem { .. }
            | DeclKind::Field { .. }
            | DeclKind::Property { .. }
            | DeclKind::TypeAlias { .. }
            | DeclKind::TypeAliasTemplate { .. }
            | DeclKind::FunctionTemplate { .. }
            | DeclKind::VarTemplate { .. }
            | DeclKind::VarTemplateSpecialization { .. } => {
                Ok(self.plain(self.get_decl_name(id, ctx.scope, ctx)?))
            }
        }
    }

    fn visit_class(
        &self,
        id: DeclId,
        ctx: PrintContext,
        with_tag: bool,
    ) -> Result<TypePrinterResult, PrinterError> {
        let id = self.ast.complete_decl(id);
        let name = self.get_decl_name(id, ctx.scope, ctx)?;
        if with_tag {
            Ok(self.plain(format!("{}{}", self.print_tag(id), name)))
        } else {
            Ok(self.plain(name))
        }
    }

    /// The tag keyword for a class, suppressed when a same-named typedef
    /// exists in the enclosing scope (`typedef struct X X;`).
    pub fn print_tag(&self, id: DeclId) -> &'static str {
        let declaration = self.ast.decl(id);
        if self
            .ast
            .scope_has_typedef_named(declaration.namespace, &declaration.name)
        {
            return "";
        }
        let Some(class) = self.ast.as_class(id) else {
            return "";
        };
        match class.tag_kind {
            TagKind::Struct => "struct ",
            TagKind::Class => "class ",
            TagKind::Union => "union ",
            TagKind::Interface => "__interface ",
            TagKind::Enum => "enum ",
        }
    }

    fn visit_class_template_specialization(
        &self,
        id: DeclId,
        ctx: PrintContext,
    ) -> Result<String, PrinterError> {
        let DeclKind::ClassTemplateSpecialization(specialization) = &self.ast.decl(id).kind
        else {
            return Err(PrinterError::Malformed(format!(
                "declaration {:?} is not a class template specialization",
                self.ast.decl(id).name
            )));
        };

        let empty: &[DeclId] = &[];
        let template_parameters = match &self.ast.decl(specialization.template).kind {
            DeclKind::ClassTemplate { parameters, .. } => parameters.as_slice(),
            _ => empty,
        };

        let mut arguments = Vec::new();
        for (index, argument) in specialization.arguments.iter().enumerate() {
            match argument {
                TemplateArgument::Type(ty) => {
                    arguments.push(self.visit_qualified(ty, ctx)?.to_string());
                }
                TemplateArgument::Declaration(decl) => {
                    arguments.push(self.visit_decl(*decl, ctx)?.to_string());
                }
                TemplateArgument::Integral(value) => {
                    // Suppressed when equal to the parameter's default.
                    let default = template_parameters.get(index).and_then(|&parameter| {
                        match &self.ast.decl(parameter).kind {
                            DeclKind::NonTypeTemplateParameter { default_value } => *default_value,
                            _ => None,
                        }
                    });
                    if default != Some(*value) {
                        arguments.push(value.to_string());
                    }
                }
            }
        }

        Ok(format!(
            "{}<{}>",
            self.visit_decl(specialization.template, ctx)?,
            arguments.join(", ")
        ))
    }

    fn visit_function(
        &self,
        id: DeclId,
        ctx: PrintContext,
    ) -> Result<TypePrinterResult, PrinterError> {
        let declaration = self.ast.decl(id);
        let function = match &declaration.kind {
            DeclKind::Function(function) => function,
            DeclKind::Method(method) => &method.function,
            _ => {
                return Err(PrinterError::Malformed(format!(
                    "declaration {:?} is not a function",
                    declaration.name
                )))
            }
        };
        debug_assert!(!function.is_deleted, "deleted functions are expected to be ignored");

        let mut result = self.visit_qualified(&function.return_type, ctx)?;
        if function.is_inline && !function.is_constexpr {
            result.type_prefix.push_str("inline ");
        }
        if function.is_constexpr {
            result.type_prefix.push_str("constexpr ");
        }

        // Free functions at translation-unit scope carry no qualifier.
        let enclosing = declaration.namespace.filter(|&namespace| {
            !matches!(self.ast.decl(namespace).kind, DeclKind::TranslationUnit { .. })
        });
        let scope_ctx = ctx.with_scope(ScopeKind::Qualified);
        let scope_prefix = match (self.method_scope, enclosing) {
            (ScopeKind::Qualified, Some(namespace)) => {
                format!("{}::", self.visit_decl(namespace, scope_ctx)?)
            }
            (ScopeKind::GlobalQualified, Some(namespace)) => {
                format!("::{}::", self.visit_decl(namespace, scope_ctx)?)
            }
            _ => String::new(),
        };

        let name = if function.operator_kind.is_conversion() {
            format!(
                "operator {}",
                self.visit_qualified(&function.return_type, ctx)?
            )
        } else {
            declaration.original_name.to_string()
        };
        result.name = format!("{scope_prefix}{name}");

        let mut parameters = self.visit_parameter_list(&function.parameters, false, ctx)?;
        if function.is_variadic {
            parameters = if parameters.is_empty() {
                "...".to_string()
            } else {
                format!("{parameters}, ...")
            };
        }

        let exception = function
            .function_type
            .as_ref()
            .map(|ty| exception_spec_of(&ty.ty, self.ast))
            .unwrap_or(ExceptionSpecKind::None);

        append_join_if_needed(
            &mut result.name_suffix,
            ' ',
            [
                format!("({parameters})").as_str(),
                exception_spelling(exception),
            ],
        );
        Ok(result)
    }

    fn visit_method(
        &self,
        id: DeclId,
        ctx: PrintContext,
    ) -> Result<TypePrinterResult, PrinterError> {
        let mut result = self.visit_function(id, ctx)?;
        let DeclKind::Method(method) = &self.ast.decl(id).kind else {
            return Err(PrinterError::Malformed(format!(
                "declaration {:?} is not a method",
                self.ast.decl(id).name
            )));
        };

        // Constructors, destructors, and conversions carry no return slot.
        if method.is_constructor
            || method.is_destructor
            || method.function.operator_kind.is_conversion()
        {
            result.ty.clear();
            result.type_qualifiers.clear();
            result.name_prefix.clear();
        }

        if method.is_virtual {
            result.type_prefix.push_str("virtual ");
        }
        if method.is_const {
            result.name_suffix.push_str(" const");
        }
        match method.ref_qualifier {
            RefQualifier::LValue => result.name_suffix.push_str(" &"),
            RefQualifier::RValue => result.name_suffix.push_str(" &&"),
            RefQualifier::None => {}
        }
        if method.is_final {
            result.name_suffix.push_str(" final");
        } else if method.is_override {
            result.name_suffix.push_str(" override");
        }

        Ok(result)
    }

    pub fn visit_parameter(
        &self,
        id: DeclId,
        has_name: bool,
        ctx: PrintContext,
    ) -> Result<TypePrinterResult, PrinterError> {
        let declaration = self.ast.decl(id);
        let DeclKind::Parameter(parameter) = &declaration.kind else {
            return Err(PrinterError::Malformed(format!(
                "declaration {:?} is not a parameter",
                declaration.name
            )));
        };

        let result = self.visit_qualified(&parameter.ty, ctx)?;
        let print_name = has_name && !declaration.name.is_empty();

        if self.flavor == CppTypePrintFlavor::ObjC {
            return Ok(self.plain(if print_name {
                format!(":({}){}", result, declaration.name)
            } else {
                format!(":({result})")
            }));
        }

        if !print_name {
            return Ok(result);
        }

        let mut result = result;
        result.name = declaration.name.to_string();

        if let Some(default) = &parameter.default_argument {
            if self.generate_default_values {
                match ExpressionPrinter::new(self.ast).print(default) {
                    Ok(value) => return Ok(self.plain(format!("{result} = {value}"))),
                    Err(_) => {
                        // Soft failure: warn, keep the parameter.
                        let function = declaration
                            .namespace
                            .map(|ns| self.ast.qualified_original_name(ns))
                            .unwrap_or_default();
                        tracing::warn!(
                            function = %function,
                            parameter = %declaration.original_name,
                            "failed to print default argument expression"
                        );
                        self.diagnostics.warning(format!(
                            "error printing default argument expression: {}({})",
                            function, declaration.original_name
                        ));
                    }
                }
            }
        }

        Ok(result)
    }

    pub fn visit_parameter_list(
        &self,
        parameters: &[DeclId],
        has_names: bool,
        ctx: PrintContext,
    ) -> Result<String, PrinterError> {
        let mut rendered = Vec::with_capacity(parameters.len());
        for &parameter in parameters {
            rendered.push(self.visit_parameter(parameter, has_names, ctx)?.to_string());
        }
        let separator = if self.flavor == CppTypePrintFlavor::ObjC {
            " "
        } else {
            ", "
        };
        Ok(rendered.join(separator))
    }

    fn visit_typedef_decl(
        &self,
        id: DeclId,
        ctx: PrintContext,
    ) -> Result<TypePrinterResult, PrinterError> {
        let declaration = self.ast.decl(id);

        if self.resolve_typedefs {
            if let DeclKind::Typedef { ty } | DeclKind::TypeAlias { ty } = &declaration.kind {
                return self.visit_type(&ty.ty, Qualifiers::NONE, ctx);
            }
        }

        if self.flavor != CppTypePrintFlavor::Cpp {
            return Ok(self.plain(declaration.original_name.to_string()));
        }

        let scope_name = match declaration.namespace {
            Some(namespace) => self.visit_decl(namespace, ctx)?.to_string(),
            None => String::new(),
        };
        if scope_name.is_empty() || scope_name == "::" {
            Ok(self.plain(declaration.original_name.to_string()))
        } else {
            Ok(self.plain(format!("{}::{}", scope_name, declaration.original_name)))
        }
    }

    // -- name resolution ----------------------------------------------

    /// The crux of scope handling: which of a declaration's names is used
    /// and how much qualification it carries.
    pub fn get_decl_name(
        &self,
        id: DeclId,
        scope: ScopeKind,
        ctx: PrintContext,
    ) -> Result<String, PrinterError> {
        let declaration = self.ast.decl(id);
        match scope {
            ScopeKind::Local => {
                if ctx.context == ContextKind::Managed {
                    return Ok(declaration.name.to_string());
                }
                if self.prefix_special_functions() {
                    if let Some(operator) = operator_kind_of(&declaration.kind) {
                        if operator != OperatorKind::None {
                            return Ok(format!("operator_{}", operator.identifier()));
                        }
                    }
                }
                Ok(declaration.original_name.to_string())
            }

            ScopeKind::Qualified => {
                if ctx.context == ContextKind::Managed {
                    if let Some(output_namespace) = self.global_namespace(id) {
                        return Ok(format!(
                            "{}{}{}",
                            output_namespace,
                            self.namespace_separator(),
                            self.ast.qualified_name(id)
                        ));
                    }
                    return Ok(self.ast.qualified_name(id));
                }

                if let Some(namespace) = declaration.namespace {
                    if self.ast.is_class(namespace) {
                        // Qualify through the enclosing class, with tag
                        // keywords suppressed so `struct Outer::Inner`
                        // never becomes `struct Outer::struct Inner`.
                        let local = self.get_decl_name(id, ScopeKind::Local, ctx)?;
                        let scope_name = self.visit_class(namespace, ctx, false)?.to_string();
                        return Ok(format!(
                            "{}{}{}",
                            scope_name,
                            self.namespace_separator(),
                            local
                        ));
                    }
                }
                Ok(self.ast.qualified_original_name(id))
            }

            ScopeKind::GlobalQualified => {
                let name = if ctx.context == ContextKind::Managed {
                    &declaration.name
                } else {
                    &declaration.original_name
                };
                if let Some(namespace) = declaration.namespace {
                    if self.ast.is_class(namespace) {
                        return Ok(format!(
                            "{}{}{}",
                            self.visit_decl(namespace, ctx)?,
                            self.namespace_separator(),
                            name
                        ));
                    }
                }
                let qualifier = if self.has_global_namespace_prefix() {
                    self.namespace_separator()
                } else {
                    ""
                };
                Ok(format!(
                    "{}{}",
                    qualifier,
                    self.get_decl_name(id, ScopeKind::Qualified, ctx)?
                ))
            }
        }
    }

    fn global_namespace(&self, id: DeclId) -> Option<SmolStr> {
        let module = self.ast.module_of(id)?;
        self.ast
            .module(module)
            .output_namespace
            .clone()
            .filter(|ns| !ns.is_empty())
    }

    pub fn has_global_namespace_prefix(&self) -> bool {
        self.flavor == CppTypePrintFlavor::Cpp
    }

    pub fn namespace_separator(&self) -> &'static str {
        if self.flavor == CppTypePrintFlavor::Cpp {
            "::"
        } else {
            "_"
        }
    }

    pub fn prefix_special_functions(&self) -> bool {
        self.flavor == CppTypePrintFlavor::C
    }

    // -- spellings ----------------------------------------------------

    fn qualifiers_spelling(&self, quals: Qualifiers) -> String {
        if !self.print_type_qualifiers {
            return String::new();
        }
        let mut out = String::new();
        if quals.is_const {
            out.push_str("const");
        }
        if quals.is_volatile {
            append_join_if_needed(&mut out, ' ', ["volatile"]);
        }
        out
    }

    pub fn primitive_spelling(&self, kind: PrimitiveKind) -> &'static str {
        use PrimitiveKind::*;
        match kind {
            Bool => "bool",
            Void => "void",
            Char16 => "char16_t",
            Char32 => "char32_t",
            WideChar => "wchar_t",
            Char => "char",
            SChar => "signed char",
            UChar => "unsigned char",
            Short => "short",
            UShort => "unsigned short",
            Int => "int",
            UInt => "unsigned int",
            Long => "long",
            ULong => "unsigned long",
            LongLong => "long long",
            ULongLong => "unsigned long long",
            Int128 => "__int128_t",
            UInt128 => "__uint128_t",
            Half => "__fp16",
            Float => "float",
            Double => "double",
            LongDouble => "long double",
            Float128 => "__float128",
            IntPtr => "void*",
            UIntPtr => "uintptr_t",
            Null => match self.flavor {
                CppTypePrintFlavor::Cpp => "std::nullptr_t",
                _ => "NULL",
            },
            String => match self.flavor {
                CppTypePrintFlavor::C => "const char*",
                CppTypePrintFlavor::Cpp => "std::string",
                CppTypePrintFlavor::ObjC => "NSString",
            },
            Decimal => match self.flavor {
                CppTypePrintFlavor::ObjC => "NSDecimalNumber",
                _ => "_Decimal32",
            },
        }
    }
}

fn modifier_spelling(modifier: PointerModifier) -> &'static str {
    match modifier {
        PointerModifier::Value => "[]",
        PointerModifier::Pointer => "*",
        PointerModifier::LVReference => "&",
        PointerModifier::RVReference => "&&",
    }
}

fn exception_spelling(kind: ExceptionSpecKind) -> &'static str {
    match kind {
        ExceptionSpecKind::BasicNoexcept => "noexcept",
        ExceptionSpecKind::NoexceptTrue => "noexcept(true)",
        ExceptionSpecKind::NoexceptFalse => "noexcept(false)",
        ExceptionSpecKind::None
        | ExceptionSpecKind::Dynamic
        | ExceptionSpecKind::DynamicNone
        | ExceptionSpecKind::DependentNoexcept
        | ExceptionSpecKind::MsAny
        | ExceptionSpecKind::Unevaluated
        | ExceptionSpecKind::Uninstantiated
        | ExceptionSpecKind::Unparsed => "",
    }
}

fn operator_kind_of(kind: &DeclKind) -> Option<OperatorKind> {
    match kind {
        DeclKind::Function(function) => Some(function.operator_kind),
        DeclKind::Method(method) => Some(method.function.operator_kind),
        _ => None,
    }
}

fn is_pointer_to_function(ty: &Type, ast: &Ast) -> bool {
    match ty.desugar(ast) {
        Type::Pointer {
            pointee,
            modifier: PointerModifier::Pointer,
        } => matches!(pointee.ty.desugar(ast), Type::Function { .. }),
        _ => false,
    }
}

fn exception_spec_of(ty: &Type, ast: &Ast) -> ExceptionSpecKind {
    let desugared = ty.desugar(ast);
    let function = match &desugared {
        Type::Pointer { pointee, .. } => pointee.ty.desugar(ast),
        other => other.clone(),
    };
    match function {
        Type::Function { exception_spec, .. } => exception_spec,
        _ => ExceptionSpecKind::None,
    }
}
