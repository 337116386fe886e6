mod types;
mod decl;
mod ext;

pub use types::*;
pub use decl::*;
