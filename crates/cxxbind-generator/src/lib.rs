//! Type and declaration printing for the binding generator.
//!
//! The printer walks the `cxxbind-ast` model and renders C, C++, or
//! Objective-C spellings into composable [`TypePrinterResult`] values.
//! User type-map overrides short-circuit structural printing; unsupported
//! constructs surface as [`PrinterError`] so a driving pass can skip one
//! declaration without aborting the translation unit.

mod context;
mod cpp;
mod error;
mod expr;
mod passes;
mod result;
mod strings;
mod typemap;

pub use context::{ContextKind, GeneratorKind, MarshalKind, PrintContext, ScopeKind};
pub use cpp::{CppTypePrintFlavor, CppTypePrinter};
pub use error::PrinterError;
pub use expr::ExpressionPrinter;
pub use passes::IgnoreSystemDeclarationsPass;
pub use result::{CsvListPrinterResult, NamedTypePrinterResult, TypePrinterResult};
pub use strings::{append_if_needed, append_join_if_needed, join_if_needed};
pub use typemap::{TypeMap, TypeMapDatabase, TypeMapId, TypePrinterContext};
