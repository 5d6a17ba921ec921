pub mod parser;
pub use parser::{ast::SqlNode, Casing, ParseError, ParserConfig};

pub mod catalog;
pub use catalog::{Catalog, FieldInfo, SchemaDict, SchemaProvider, SharedCatalog};

pub mod validator;
pub use validator::{FunctionRegistry, FunctionSignature, OutputColumn, ValidationError};

pub mod desugar;
pub use desugar::Desugarer;

pub mod compiler;
pub use compiler::{CompileError, CompiledQuery, CompilerConfig, ConfigError, QueryCompiler};

#[cfg(test)]
mod executor;
