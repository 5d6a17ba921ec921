pub mod validation_error;
pub use validation_error::*;

pub mod validated_query;
pub use validated_query::*;

pub mod validation_context;
pub use validation_context::*;

pub mod function_registry;
pub use function_registry::*;

pub mod type_inference;
pub use type_inference::*;

pub mod resolvers;
pub use resolvers::*;

pub mod validator;
pub use validator::*;
