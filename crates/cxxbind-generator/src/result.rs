//! Composable string-building values for rendered declarations.
//!
//! A [`TypePrinterResult`] keeps the type side and the declarator (name)
//! side of a rendering apart until the final join, so an enclosing visit
//! can splice pointer modifiers, parentheses, or array suffixes into the
//! right slot. The `Display` impl owns the dialect joining rules.

use crate::context::GeneratorKind;
use crate::strings::append_join_if_needed;
use crate::typemap::TypeMapId;
use std::fmt;

/// A rendered type/declaration fragment.
///
/// Joining contract (default dialects): `type_prefix` (space-terminated if
/// non-empty), then `type_qualifiers` space-joined with
/// `ty + type_modifiers + type_suffix`, then a single space before the
/// declarator when both a name and a type (or name prefix) are present,
/// then `name_prefix + name + name_suffix`. A `{0}` placeholder inside `ty`
/// (function-pointer syntax) short-circuits all of that: the joined
/// declarator is substituted into the placeholder. A TypeScript-destined
/// result joins as `name: type` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypePrinterResult {
    pub type_qualifiers: String,
    pub type_prefix: String,
    pub ty: String,
    pub type_modifiers: String,
    pub type_suffix: String,
    pub name_prefix: String,
    pub name: String,
    pub name_suffix: String,
    /// Set when a user type-map override produced this result; generators
    /// inspect it to skip further structural generation.
    pub type_map: Option<TypeMapId>,
    pub kind: GeneratorKind,
}

impl TypePrinterResult {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            ..Self::default()
        }
    }

    pub fn with_qualifiers(ty: impl Into<String>, qualifiers: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            type_qualifiers: qualifiers.into(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn declarator(&self) -> String {
        format!("{}{}{}", self.name_prefix, self.name, self.name_suffix)
    }
}

impl From<String> for TypePrinterResult {
    fn from(ty: String) -> Self {
        Self::new(ty)
    }
}

impl From<&str> for TypePrinterResult {
    fn from(ty: &str) -> Self {
        Self::new(ty)
    }
}

impl fmt::Display for TypePrinterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == GeneratorKind::TypeScript {
            return write!(f, "{}{}: {}", self.name, self.name_suffix, self.ty);
        }

        if let Some(index) = self.ty.find("{0}") {
            let (before, after) = self.ty.split_at(index);
            return write!(f, "{}{}{}", before, self.declarator(), &after["{0}".len()..]);
        }

        let mut out = String::from(&self.type_prefix);
        if !out.is_empty() && !out.ends_with(' ') {
            out.push(' ');
        }

        let declarator_space = !self.name.is_empty()
            && (!self.name_prefix.is_empty() || !self.ty.is_empty());
        let body = format!(
            "{}{}{}{}{}",
            self.ty,
            self.type_modifiers,
            self.type_suffix,
            if declarator_space { " " } else { "" },
            self.declarator()
        );
        append_join_if_needed(&mut out, ' ', [self.type_qualifiers.as_str(), body.as_str()]);
        // Unnamed declarators can leave a dangling separator behind.
        f.write_str(out.trim_end())
    }
}

/// A parameter rendering: type plus variable name, space-joined.
#[derive(Debug, Clone, Default)]
pub struct NamedTypePrinterResult {
    pub type_qualifiers: String,
    pub ty: String,
    pub type_modifiers: String,
    pub variable_name: String,
}

impl fmt::Display for NamedTypePrinterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        let ty = format!("{}{}", self.ty, self.type_modifiers);
        append_join_if_needed(
            &mut out,
            ' ',
            [
                self.type_qualifiers.as_str(),
                ty.as_str(),
                self.variable_name.as_str(),
            ],
        );
        f.write_str(&out)
    }
}

/// A comma-joined list rendering (parameter lists, argument lists).
#[derive(Debug, Clone, Default)]
pub struct CsvListPrinterResult {
    pub values: Vec<String>,
}

impl fmt::Display for CsvListPrinterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        append_join_if_needed(&mut out, ',', self.values.iter());
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_type_with_name() {
        let result = TypePrinterResult::new("int").named("x");
        assert_eq!(result.to_string(), "int x");
    }

    #[test]
    fn name_prefix_splices_into_the_declarator() {
        let mut result = TypePrinterResult::new("int").named("x");
        result.name_prefix.push_str("*&");
        assert_eq!(result.to_string(), "int *&x");

        result.name.clear();
        assert_eq!(result.to_string(), "int*&");
    }

    #[test]
    fn qualifiers_join_first_without_doubling_spaces() {
        let result = TypePrinterResult::with_qualifiers("Foo", "const");
        assert_eq!(result.to_string(), "const Foo");

        let empty_quals = TypePrinterResult::with_qualifiers("Foo", "");
        assert_eq!(empty_quals.to_string(), "Foo");
    }

    #[test]
    fn placeholder_substitutes_the_declarator() {
        let mut result = TypePrinterResult::new("int ({0})(int, float)").named("x");
        result.name_prefix.push('*');
        assert_eq!(result.to_string(), "int (*x)(int, float)");

        result.name.clear();
        assert_eq!(result.to_string(), "int (*)(int, float)");
    }

    #[test]
    fn array_modifiers_stay_on_the_type_side() {
        let mut result = TypePrinterResult::new("int*").named("x");
        result.type_modifiers.push_str("[3]");
        assert_eq!(result.to_string(), "int*[3] x");
    }

    #[test]
    fn type_prefix_is_space_terminated() {
        let mut result = TypePrinterResult::new("int").named("f");
        result.type_prefix.push_str("virtual ");
        result.name_suffix.push_str("()");
        assert_eq!(result.to_string(), "virtual int f()");
    }

    #[test]
    fn typescript_join_is_name_first() {
        let mut result = TypePrinterResult::new("number").named("x");
        result.kind = GeneratorKind::TypeScript;
        assert_eq!(result.to_string(), "x: number");
    }

    #[test]
    fn named_result_skips_empty_parts() {
        let named = NamedTypePrinterResult {
            type_qualifiers: "const".into(),
            ty: "char".into(),
            type_modifiers: "*".into(),
            variable_name: "s".into(),
        };
        assert_eq!(named.to_string(), "const char* s");

        let unnamed = NamedTypePrinterResult {
            ty: "int".into(),
            ..Default::default()
        };
        assert_eq!(unnamed.to_string(), "int");
    }

    #[test]
    fn csv_join_skips_empty_values() {
        let list = CsvListPrinterResult {
            values: vec!["int".into(), "".into(), "float".into()],
        };
        assert_eq!(list.to_string(), "int,float");
    }
}
