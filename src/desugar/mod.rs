pub mod expr_builder;
pub use expr_builder::*;

pub mod aggregate_expander;
pub use aggregate_expander::*;

pub mod alias_resolver;
pub use alias_resolver::*;

pub mod desugarer;
pub use desugarer::*;
