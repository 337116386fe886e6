//! User type-map overrides.
//!
//! A type map declares "this C/C++ type prints/marshals as this other
//! type". The database is consulted before structural printing on every
//! tag and pointer visit; it is read-only during printing, so independent
//! printer instances can share one database.

use crate::context::{ContextKind, MarshalKind};
use cxxbind_ast::{Ast, DeclKind, QualifiedType, Type};
use indexmap::IndexMap;

/// The type occurrence a map is being consulted for.
pub struct TypePrinterContext<'a> {
    pub ty: &'a Type,
    pub kind: ContextKind,
    pub marshal: MarshalKind,
}

/// A user-supplied override rule.
pub trait TypeMap {
    /// The type to print in place of the mapped one, or `None` to fall
    /// back to structural printing.
    fn signature_type(&self, ctx: &TypePrinterContext<'_>) -> Option<QualifiedType>;

    fn is_ignored(&self) -> bool {
        false
    }
}

/// A stable handle to a registered map, usable to detect that an override
/// fired on a printed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapId(u32);

/// Maps keyed by the mapped declaration's qualified original name.
/// Insertion order is iteration order, keeping diagnostics deterministic.
#[derive(Default)]
pub struct TypeMapDatabase {
    maps: IndexMap<String, Box<dyn TypeMap>>,
}

impl TypeMapDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, qualified_name: impl Into<String>, map: Box<dyn TypeMap>) {
        self.maps.insert(qualified_name.into(), map);
    }

    pub fn get(&self, id: TypeMapId) -> Option<&dyn TypeMap> {
        self.maps
            .get_index(id.0 as usize)
            .map(|(_, map)| map.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Look up the map for a type occurrence. Typedefs are tried under
    /// their own name first; the desugared form is then keyed by its tag
    /// declaration or its template's templated class.
    pub fn find_type_map(&self, ast: &Ast, ty: &Type) -> Option<(TypeMapId, &dyn TypeMap)> {
        if let Type::Typedef { decl } = ty {
            if let Some(found) = self.lookup(&ast.qualified_original_name(*decl)) {
                return Some(found);
            }
        }

        let key = match ty.desugar(ast) {
            Type::Tag { decl } => ast.qualified_original_name(ast.complete_decl(decl)),
            Type::TemplateSpecialization { template, .. } => {
                match &ast.decl(template).kind {
                    DeclKind::ClassTemplate { templated, .. } => {
                        ast.qualified_original_name(*templated)
                    }
                    _ => ast.qualified_original_name(template),
                }
            }
            _ => return None,
        };
        self.lookup(&key)
    }

    fn lookup(&self, key: &str) -> Option<(TypeMapId, &dyn TypeMap)> {
        self.maps
            .get_full(key)
            .map(|(index, _, map)| (TypeMapId(index as u32), map.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxbind_ast::{Class, Declaration, TagKind};

    struct CharPtrMap;

    impl TypeMap for CharPtrMap {
        fn signature_type(&self, _ctx: &TypePrinterContext<'_>) -> Option<QualifiedType> {
            Some(QualifiedType::new(Type::Pointer {
                pointee: QualifiedType::const_(Type::char_()),
                modifier: cxxbind_ast::PointerModifier::Pointer,
            }))
        }
    }

    #[test]
    fn tag_lookup_uses_the_qualified_original_name() {
        let mut ast = Ast::new();
        let ns = ast.alloc(Declaration::new(
            "foo",
            DeclKind::Namespace { is_inline: false },
        ));
        let class = ast.alloc(
            Declaration::new("string_t", DeclKind::Class(Class::new(TagKind::Class)))
                .in_namespace(ns),
        );

        let mut db = TypeMapDatabase::new();
        db.register("foo::string_t", Box::new(CharPtrMap));

        let found = db.find_type_map(&ast, &Type::tag(class));
        assert!(found.is_some());
        assert!(db.find_type_map(&ast, &Type::int()).is_none());
    }

    #[test]
    fn typedef_lookup_tries_the_alias_name_first() {
        let mut ast = Ast::new();
        let class = ast.alloc(Declaration::new(
            "string_t",
            DeclKind::Class(Class::new(TagKind::Class)),
        ));
        let alias = ast.alloc(Declaration::new(
            "my_string",
            DeclKind::Typedef {
                ty: QualifiedType::new(Type::tag(class)),
            },
        ));

        let mut db = TypeMapDatabase::new();
        db.register("my_string", Box::new(CharPtrMap));

        assert!(db.find_type_map(&ast, &Type::typedef(alias)).is_some());
        // The underlying tag has no map of its own.
        assert!(db.find_type_map(&ast, &Type::tag(class)).is_none());
    }
}
