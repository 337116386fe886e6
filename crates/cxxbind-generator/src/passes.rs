//! Cleanup pass that prunes system-header declarations down to the few
//! std templates marshaling actually needs.

use crate::typemap::TypeMapDatabase;
use cxxbind_ast::{Ast, DeclId, DeclKind, GenerationKind, TemplateArgument, Type};
use cxxbind_common::Diagnostics;

/// Walks declarations from valid system-header translation units and
/// explicitly ignores private std implementation detail (leading single
/// underscore), anything inside a `detail` namespace, and non-type-mapped
/// system classes. The std templates bindings marshal through
/// (`basic_string`, `allocator`, `char_traits`, `vector`, `optional`) stay
/// generation-enabled, with their field specializations internalized.
pub struct IgnoreSystemDeclarationsPass<'a> {
    type_maps: &'a TypeMapDatabase,
    diagnostics: &'a Diagnostics,
}

fn is_private_std_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() > 2 && bytes[0] == b'_' && bytes[1] != b'_'
}

impl<'a> IgnoreSystemDeclarationsPass<'a> {
    pub fn new(type_maps: &'a TypeMapDatabase, diagnostics: &'a Diagnostics) -> Self {
        Self {
            type_maps,
            diagnostics,
        }
    }

    pub fn run(&self, ast: &mut Ast) {
        let ids: Vec<DeclId> = ast.decl_ids().collect();
        for id in ids {
            if !self.in_valid_system_header(ast, id) {
                continue;
            }

            let qualified = ast.qualified_original_name(id);
            if qualified.contains("::detail") || qualified.contains("::__detail") {
                ast.decl_mut(id).explicitly_ignore();
                continue;
            }

            match &ast.decl(id).kind {
                DeclKind::Class(_) => self.process_class(ast, id),
                DeclKind::Enum(_)
                | DeclKind::Function(_)
                | DeclKind::Typedef { .. }
                | DeclKind::TypeAlias { .. }
                | DeclKind::Variable { .. }
                | DeclKind::Parameter(_) => {
                    if is_private_std_name(&ast.decl(id).original_name) {
                        ast.decl_mut(id).explicitly_ignore();
                    }
                }
                _ => {}
            }
        }
    }

    fn in_valid_system_header(&self, ast: &Ast, id: DeclId) -> bool {
        if matches!(ast.decl(id).kind, DeclKind::TranslationUnit { .. }) {
            return false;
        }
        let Some(unit) = ast.translation_unit_of(id) else {
            return false;
        };
        match ast.decl(unit).kind {
            DeclKind::TranslationUnit {
                is_system_header,
                is_valid,
                ..
            } => is_valid && is_system_header,
            _ => false,
        }
    }

    fn process_class(&self, ast: &mut Ast, id: DeclId) {
        if is_private_std_name(&ast.decl(id).original_name) {
            ast.decl_mut(id).explicitly_ignore();
            return;
        }

        if let Some((_, map)) = self.type_maps.find_type_map(ast, &Type::tag(id)) {
            if !map.is_ignored() {
                return;
            }
        }

        ast.decl_mut(id).explicitly_ignore();

        let (is_dependent, specializations) = {
            let Some(class) = ast.as_class(id) else {
                return;
            };
            (class.is_dependent, class.specializations.clone())
        };
        if !is_dependent || specializations.is_empty() {
            return;
        }

        // Non-type-mapped specializations go first; the allowlist below
        // selectively re-enables the ones marshaling needs.
        for &specialization in &specializations {
            if ast.decl(specialization).generation == GenerationKind::None {
                continue;
            }
            let mapped = self
                .type_maps
                .find_type_map(ast, &Type::tag(specialization))
                .is_some_and(|(_, map)| !map.is_ignored());
            if !mapped {
                ast.decl_mut(specialization).explicitly_ignore();
            }
        }

        let name = ast.decl(id).name.clone();
        match name.as_str() {
            "basic_string" | "allocator" | "char_traits" => {
                self.regenerate(ast, id);
                for &specialization in &specializations {
                    if self.has_unsupported_argument(ast, specialization) {
                        continue;
                    }
                    if self.first_argument_is_char(ast, specialization) {
                        self.regenerate(ast, specialization);
                        self.internalize_specializations_in_fields(ast, specialization);
                    }
                }
            }
            "optional" | "vector" => {
                self.regenerate(ast, id);
                for &specialization in &specializations {
                    if self.has_unsupported_argument(ast, specialization) {
                        continue;
                    }
                    self.regenerate(ast, specialization);
                    self.internalize_specializations_in_fields(ast, specialization);
                }
                return;
            }
            _ => {}
        }

        self.diagnostics
            .warning(format!("ignoring unsupported std type: {}", ast.qualified_name(id)));
    }

    fn regenerate(&self, ast: &mut Ast, id: DeclId) {
        let decl = ast.decl_mut(id);
        decl.is_ignored = false;
        decl.generation = GenerationKind::Generate;
    }

    fn has_unsupported_argument(&self, ast: &Ast, specialization: DeclId) -> bool {
        match &ast.decl(specialization).kind {
            DeclKind::ClassTemplateSpecialization(spec) => {
                ast.has_unsupported_template_argument(spec)
            }
            _ => false,
        }
    }

    fn first_argument_is_char(&self, ast: &Ast, specialization: DeclId) -> bool {
        let DeclKind::ClassTemplateSpecialization(spec) = &ast.decl(specialization).kind else {
            return false;
        };
        match spec.arguments.first() {
            Some(TemplateArgument::Type(ty)) => {
                ty.ty.is_primitive(ast, cxxbind_ast::PrimitiveKind::Char)
            }
            _ => false,
        }
    }

    /// Specializations referenced from a kept specialization's fields are
    /// needed for marshaling only; generate them with internal linkage.
    fn internalize_specializations_in_fields(&self, ast: &mut Ast, specialization: DeclId) {
        let field_types: Vec<_> = ast
            .decl_ids()
            .filter(|&field| ast.decl(field).namespace == Some(specialization))
            .filter_map(|field| match &ast.decl(field).kind {
                DeclKind::Field { ty } => Some(ty.clone()),
                _ => None,
            })
            .collect();

        for ty in field_types {
            let desugared = ty.ty.desugar(ast);
            let Some(inner) = ast.get_class_template_specialization(&desugared) else {
                continue;
            };
            if ast.decl(inner).generation != GenerationKind::Internal {
                ast.decl_mut(inner).generation = GenerationKind::Internal;
                self.internalize_specializations_in_fields(ast, inner);
            }
        }
    }
}
