//! Rendering of default-argument expressions.
//!
//! The front-end resolves most default arguments to literals; whatever it
//! could not evaluate arrives as [`Expr::Unevaluable`] and fails here.
//! `visit_parameter` catches that failure, downgrades it to a warning, and
//! still emits the parameter without its default.

use crate::error::PrinterError;
use cxxbind_ast::{Ast, Expr};

pub struct ExpressionPrinter<'a> {
    ast: &'a Ast,
}

impl<'a> ExpressionPrinter<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self { ast }
    }

    pub fn print(&self, expr: &Expr) -> Result<String, PrinterError> {
        match expr {
            Expr::IntegerLiteral(value) => Ok(value.to_string()),
            Expr::FloatLiteral(value) => Ok(value.to_string()),
            Expr::BoolLiteral(value) => Ok(value.to_string()),
            Expr::StringLiteral(value) => Ok(format!("\"{}\"", value.escape_default())),
            Expr::NullPtr => Ok("nullptr".to_string()),
            Expr::DeclRef(decl) => Ok(self.ast.qualified_original_name(*decl)),
            Expr::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.print(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!(
                    "{}({})",
                    self.ast.qualified_original_name(*callee),
                    args.join(", ")
                ))
            }
            Expr::Unevaluable(_) => {
                Err(PrinterError::unsupported("unevaluable default argument"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxbind_ast::{DeclKind, Declaration};
    use pretty_assertions::assert_eq;

    #[test]
    fn literals_and_nullptr() {
        let ast = Ast::new();
        let printer = ExpressionPrinter::new(&ast);
        assert_eq!(printer.print(&Expr::IntegerLiteral(42)).unwrap(), "42");
        assert_eq!(printer.print(&Expr::BoolLiteral(true)).unwrap(), "true");
        assert_eq!(printer.print(&Expr::NullPtr).unwrap(), "nullptr");
        assert_eq!(
            printer.print(&Expr::StringLiteral("hi".into())).unwrap(),
            "\"hi\""
        );
    }

    #[test]
    fn decl_refs_print_qualified() {
        let mut ast = Ast::new();
        let ns = ast.alloc(Declaration::new(
            "color",
            DeclKind::Namespace { is_inline: false },
        ));
        let item = ast.alloc(
            Declaration::new("Red", DeclKind::EnumItem { value: 0 }).in_namespace(ns),
        );

        let printer = ExpressionPrinter::new(&ast);
        assert_eq!(printer.print(&Expr::DeclRef(item)).unwrap(), "color::Red");
    }

    #[test]
    fn unevaluable_is_an_error() {
        let ast = Ast::new();
        let printer = ExpressionPrinter::new(&ast);
        assert!(printer.print(&Expr::Unevaluable("sizeof(T)".into())).is_err());
    }
}
