pub mod config_error;
pub use config_error::*;

pub mod compiler_config;
pub use compiler_config::*;

pub mod canonicalizer;
pub use canonicalizer::*;

pub mod projection_filter;
pub use projection_filter::*;

pub mod compile_error;
pub use compile_error::*;

pub mod query_compiler;
pub use query_compiler::*;
